// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Object fields -> row.

use crate::{
    codec::{encode, encode_name, encode_str_name},
    descriptor::{FieldMapping, MappingDescriptor},
    error::{CodecError, MappingError},
    object::{FieldSet, FieldValue, shape_error},
    row::{ColumnEntry, RowData, SuperColumnEntry},
    value::Value,
};
use std::collections::HashSet;

/// Builds the row for one object's fields.
///
/// Either the whole row is produced or an error is returned; nothing is
/// emitted for a failed call. Map-derived columns follow the iteration
/// order of the field's entries, which callers must not rely on.
pub fn marshal(
    descriptor: &MappingDescriptor,
    mut fields: FieldSet,
    timestamp: i64,
) -> Result<RowData, MappingError> {
    let key = encode_field(&mut fields, descriptor.key())?;

    let mut columns = Vec::with_capacity(descriptor.values().len() + descriptor.optionals().len());
    for mapping in descriptor.values() {
        let value = take_scalar(&mut fields, &mapping.field)?;
        columns.push(ColumnEntry::new(
            encode_str_name(&mapping.column),
            encode(&value, mapping.value_type)?,
            timestamp,
        ));
    }

    for mapping in descriptor.optionals() {
        match take(&mut fields, &mapping.field)? {
            FieldValue::Optional(Some(value)) => columns.push(ColumnEntry::new(
                encode_str_name(&mapping.column),
                encode(&value, mapping.value_type)?,
                timestamp,
            )),
            FieldValue::Optional(None) => {},
            other => return Err(shape_error(&mapping.field, "optional", &other)),
        }
    }

    if let Some(mapping) = descriptor.map() {
        let entries = match take(&mut fields, &mapping.field)? {
            FieldValue::Map(entries) => entries,
            other => return Err(shape_error(&mapping.field, "map", &other)),
        };

        let mut emitted = HashSet::with_capacity(entries.len());
        for (name, value) in entries {
            if name.value_type() != mapping.name_type {
                return Err(CodecError::TypeMismatch {
                    expected: mapping.name_type,
                    found: name.value_type(),
                }
                .into());
            }
            let name = encode_name(&name)?;
            let column = String::from_utf8_lossy(&name);
            if descriptor.is_named_column(&column) || emitted.contains(&name) {
                return Err(MappingError::DuplicateColumn {
                    field: mapping.field.clone(),
                    column: column.into_owned(),
                });
            }
            let value = encode(&value, mapping.value_type)?;
            emitted.insert(name.clone());
            columns.push(ColumnEntry::new(name, value, timestamp));
        }
    }

    Ok(match descriptor.super_column() {
        Some(mapping) => {
            let super_name = encode_field(&mut fields, mapping)?;
            RowData::with_super_columns(
                descriptor.keyspace(),
                descriptor.family(),
                key,
                vec![SuperColumnEntry::new(super_name, columns)],
            )
        },
        None => RowData::standard(descriptor.keyspace(), descriptor.family(), key, columns),
    })
}

fn encode_field(fields: &mut FieldSet, mapping: &FieldMapping) -> Result<Vec<u8>, MappingError> {
    let value = take_scalar(fields, &mapping.field)?;
    Ok(encode(&value, mapping.value_type)?)
}

fn take_scalar(fields: &mut FieldSet, field: &str) -> Result<Value, MappingError> {
    match take(fields, field)? {
        FieldValue::Scalar(value) => Ok(value),
        other => Err(shape_error(field, "scalar", &other)),
    }
}

fn take(fields: &mut FieldSet, field: &str) -> Result<FieldValue, MappingError> {
    fields.remove(field).ok_or_else(|| MappingError::FieldNotSet {
        field: field.to_string(),
    })
}
