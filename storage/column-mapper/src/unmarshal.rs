// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Row -> object fields.

use crate::{
    codec::{decode, decode_name},
    descriptor::MappingDescriptor,
    error::MappingError,
    metrics::DROPPED_COLUMNS,
    object::{FieldSet, FieldValue},
    row::{ColumnEntry, RowColumns, RowData, SuperColumnEntry},
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Rebuilds the fields of one object from a standard row, or from a super
/// row holding exactly one super column.
pub fn unmarshal(
    descriptor: &MappingDescriptor,
    row: &RowData,
    verify_family: bool,
) -> Result<FieldSet, MappingError> {
    check_row(descriptor, row, verify_family)?;

    match &row.columns {
        RowColumns::Standard(columns) => fold_row(descriptor, &row.key, None, columns),
        RowColumns::Super(super_columns) => match super_columns.as_slice() {
            [super_column] => fold_row(
                descriptor,
                &row.key,
                Some(super_column.name.as_slice()),
                &super_column.columns,
            ),
            _ => Err(MappingError::row_shape(
                descriptor.type_name(),
                format!(
                    "expected exactly one super column, found {}",
                    super_columns.len()
                ),
            )),
        },
    }
}

/// Rebuilds one object per super column of a super row, all sharing the row
/// key.
pub fn unmarshal_super(
    descriptor: &MappingDescriptor,
    row: &RowData,
    verify_family: bool,
) -> Result<Vec<FieldSet>, MappingError> {
    check_row(descriptor, row, verify_family)?;
    let super_columns: &[SuperColumnEntry] = row.super_columns().ok_or_else(|| {
        MappingError::row_shape(descriptor.type_name(), "expected a super row")
    })?;

    super_columns
        .iter()
        .map(|super_column| {
            fold_row(
                descriptor,
                &row.key,
                Some(super_column.name.as_slice()),
                &super_column.columns,
            )
        })
        .collect()
}

fn check_row(
    descriptor: &MappingDescriptor,
    row: &RowData,
    verify_family: bool,
) -> Result<(), MappingError> {
    if verify_family && (row.keyspace != descriptor.keyspace() || row.family != descriptor.family())
    {
        let expected = format!("{}/{}", descriptor.keyspace(), descriptor.family());
        let found = format!("{}/{}", row.keyspace, row.family);
        warn!(
            type_name = descriptor.type_name(),
            expected = expected.as_str(),
            found = found.as_str(),
            "Rejected row from a different column family."
        );
        return Err(MappingError::FamilyMismatch { expected, found });
    }

    if descriptor.is_super() != row.is_super() {
        return Err(MappingError::row_shape(
            descriptor.type_name(),
            format!(
                "{} family cannot be read from a {} row",
                if descriptor.is_super() {
                    "super"
                } else {
                    "standard"
                },
                row.kind()
            ),
        ));
    }
    Ok(())
}

fn fold_row(
    descriptor: &MappingDescriptor,
    key: &[u8],
    super_name: Option<&[u8]>,
    columns: &[ColumnEntry],
) -> Result<FieldSet, MappingError> {
    let mut fields = FieldSet::new();

    let key_mapping = descriptor.key();
    fields.insert(
        &key_mapping.field,
        FieldValue::Scalar(decode(key, key_mapping.value_type)?),
    );

    if let (Some(mapping), Some(name)) = (descriptor.super_column(), super_name) {
        fields.insert(
            &mapping.field,
            FieldValue::Scalar(decode(name, mapping.value_type)?),
        );
    }

    // Duplicate names within a row resolve to the last entry.
    let by_name: HashMap<&[u8], &ColumnEntry> = columns
        .iter()
        .map(|column| (column.name.as_slice(), column))
        .collect();
    let mut consumed: HashSet<&[u8]> = HashSet::new();

    for mapping in descriptor.values() {
        let name = mapping.column.as_bytes();
        let column = by_name
            .get(name)
            .ok_or_else(|| MappingError::MissingColumn {
                field: mapping.field.clone(),
                column: mapping.column.clone(),
            })?;
        fields.insert(
            &mapping.field,
            FieldValue::Scalar(decode(&column.value, mapping.value_type)?),
        );
        consumed.insert(name);
    }

    for mapping in descriptor.optionals() {
        let name = mapping.column.as_bytes();
        let value = match by_name.get(name) {
            Some(column) => {
                consumed.insert(name);
                Some(decode(&column.value, mapping.value_type)?)
            },
            None => None,
        };
        fields.insert(&mapping.field, FieldValue::Optional(value));
    }

    let leftovers = columns
        .iter()
        .filter(|column| !consumed.contains(column.name.as_slice()));

    match descriptor.map() {
        Some(mapping) => {
            let entries = leftovers
                .map(|column| -> Result<_, MappingError> {
                    Ok((
                        decode_name(&column.name, mapping.name_type)?,
                        decode(&column.value, mapping.value_type)?,
                    ))
                })
                .collect::<Result<Vec<_>, MappingError>>()?;
            fields.insert(&mapping.field, FieldValue::Map(entries));
        },
        None => {
            let dropped = leftovers.count();
            if dropped > 0 {
                DROPPED_COLUMNS.inc_by(dropped as u64);
                debug!(
                    type_name = descriptor.type_name(),
                    dropped = dropped,
                    "Ignored columns not mapped by any field."
                );
            }
        },
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{descriptor::resolve, metadata::TypeDescription, value::Value};
    use claims::{assert_err_eq, assert_matches, assert_ok};

    fn descriptor() -> MappingDescriptor {
        resolve(
            &TypeDescription::builder("Person")
                .keyspace("Test")
                .family("Standard")
                .key::<String>("id")
                .value::<String>("name", "name")
                .optional::<i64>("age", "age")
                .columns::<String, String>("extra")
                .build(),
        )
        .unwrap()
    }

    fn row(columns: Vec<ColumnEntry>) -> RowData {
        RowData::standard("Test", "Standard", b"k1".to_vec(), columns)
    }

    #[test]
    fn test_named_columns_take_precedence_over_map() {
        let row = row(vec![
            ColumnEntry::new(b"name".to_vec(), b"bob".to_vec(), 1),
            ColumnEntry::new(b"other".to_vec(), b"x".to_vec(), 1),
        ]);
        let fields = assert_ok!(unmarshal(&descriptor(), &row, true));

        assert_eq!(
            fields.get("name"),
            Some(&FieldValue::Scalar(Value::Utf8("bob".to_string())))
        );
        assert_eq!(fields.get("age"), Some(&FieldValue::Optional(None)));
        assert_eq!(
            fields.get("extra"),
            Some(&FieldValue::Map(vec![(
                Value::Utf8("other".to_string()),
                Value::Utf8("x".to_string())
            )]))
        );
    }

    #[test]
    fn test_missing_required_column() {
        let row = row(vec![ColumnEntry::new(b"age".to_vec(), 5i64.to_be_bytes().to_vec(), 1)]);
        assert_err_eq!(
            unmarshal(&descriptor(), &row, true),
            MappingError::MissingColumn {
                field: "name".to_string(),
                column: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_bad_optional_bytes_fail() {
        let row = row(vec![
            ColumnEntry::new(b"name".to_vec(), b"bob".to_vec(), 1),
            ColumnEntry::new(b"age".to_vec(), vec![1, 2], 1),
        ]);
        assert_matches!(unmarshal(&descriptor(), &row, true), Err(MappingError::Codec(_)));
    }

    #[test]
    fn test_family_verification() {
        let mut foreign = row(vec![ColumnEntry::new(b"name".to_vec(), b"bob".to_vec(), 1)]);
        foreign.family = "Other".to_string();
        assert_err_eq!(
            unmarshal(&descriptor(), &foreign, true),
            MappingError::FamilyMismatch {
                expected: "Test/Standard".to_string(),
                found: "Test/Other".to_string(),
            }
        );
        assert_ok!(unmarshal(&descriptor(), &foreign, false));
    }

    #[test]
    fn test_super_row_for_standard_family() {
        let row = RowData::with_super_columns("Test", "Standard", b"k1".to_vec(), vec![]);
        assert_matches!(
            unmarshal(&descriptor(), &row, true),
            Err(MappingError::RowShape { .. })
        );
        assert_matches!(
            unmarshal_super(&descriptor(), &row, true),
            Err(MappingError::RowShape { .. })
        );
    }
}
