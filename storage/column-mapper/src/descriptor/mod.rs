// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a `TypeDescription` into an immutable `MappingDescriptor`.

use crate::{
    error::MappingError,
    metadata::{FieldMarker, FieldType, TypeDescription},
    value::ValueType,
};
use std::collections::HashSet;
use tracing::debug;

/// A field mapped to a fixed role (row key or super column name).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMapping {
    pub field: String,
    pub value_type: ValueType,
}

/// A field mapped to a named column.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMapping {
    pub field: String,
    pub column: String,
    pub value_type: ValueType,
}

/// The catch-all field absorbing every column not claimed by name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MapMapping {
    pub field: String,
    pub name_type: ValueType,
    pub value_type: ValueType,
}

/// The resolved mapping of one type onto a column family.
///
/// Built once per type by [`resolve`] and never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MappingDescriptor {
    type_name: String,
    keyspace: String,
    family: String,
    key: FieldMapping,
    super_column: Option<FieldMapping>,
    values: Vec<ColumnMapping>,
    optionals: Vec<ColumnMapping>,
    map: Option<MapMapping>,
}

impl MappingDescriptor {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn is_super(&self) -> bool {
        self.super_column.is_some()
    }

    pub fn key(&self) -> &FieldMapping {
        &self.key
    }

    /// Present exactly when the family is a super family.
    pub fn super_column(&self) -> Option<&FieldMapping> {
        self.super_column.as_ref()
    }

    /// Required columns, in declaration order.
    pub fn values(&self) -> &[ColumnMapping] {
        &self.values
    }

    pub fn optionals(&self) -> &[ColumnMapping] {
        &self.optionals
    }

    pub fn map(&self) -> Option<&MapMapping> {
        self.map.as_ref()
    }

    /// Whether `column` is claimed by a value or optional field.
    pub fn is_named_column(&self, column: &str) -> bool {
        self.values
            .iter()
            .chain(self.optionals.iter())
            .any(|mapping| mapping.column == column)
    }
}

/// Resolves a type description, rejecting self-contradictory metadata.
pub fn resolve(description: &TypeDescription) -> Result<MappingDescriptor, MappingError> {
    let type_name = description.type_name.as_str();
    let invalid = |reason: String| MappingError::invalid_mapping(type_name, reason);

    let family = description
        .family
        .clone()
        .ok_or_else(|| invalid("no column family designation".to_string()))?;
    let keyspace = description
        .keyspace
        .clone()
        .ok_or_else(|| invalid("no keyspace designation".to_string()))?;

    let mut keys = Vec::new();
    let mut super_columns = Vec::new();
    let mut values = Vec::new();
    let mut optionals = Vec::new();
    let mut maps = Vec::new();

    for field in &description.fields {
        let marker = match field.markers.as_slice() {
            [] => return Err(invalid(format!("field {} has no mapping marker", field.name))),
            [marker] => marker,
            _ => return Err(invalid(format!("field {} carries more than one role", field.name))),
        };

        match (marker, field.field_type) {
            (FieldMarker::Key, FieldType::Scalar(value_type)) => keys.push(FieldMapping {
                field: field.name.clone(),
                value_type,
            }),
            (FieldMarker::Value { column }, FieldType::Scalar(value_type)) => {
                values.push(ColumnMapping {
                    field: field.name.clone(),
                    column: column.clone(),
                    value_type,
                })
            },
            (FieldMarker::Optional { column, value_type }, FieldType::Optional(inner)) => {
                if *value_type != inner {
                    return Err(invalid(format!(
                        "optional field {} declares {:?} but holds {:?}",
                        field.name, value_type, inner
                    )));
                }
                optionals.push(ColumnMapping {
                    field: field.name.clone(),
                    column: column.clone(),
                    value_type: inner,
                })
            },
            (FieldMarker::SuperColumn, FieldType::Scalar(value_type)) => {
                if !description.is_super {
                    return Err(invalid(format!(
                        "super column field {} on a standard family",
                        field.name
                    )));
                }
                super_columns.push(FieldMapping {
                    field: field.name.clone(),
                    value_type,
                })
            },
            (
                FieldMarker::Columns {
                    name_type,
                    value_type,
                },
                FieldType::Map(field_name_type, field_value_type),
            ) => {
                if (*name_type, *value_type) != (field_name_type, field_value_type) {
                    return Err(invalid(format!(
                        "columns field {} declares {:?} -> {:?} but holds {:?} -> {:?}",
                        field.name, name_type, value_type, field_name_type, field_value_type
                    )));
                }
                if !name_type.has_text_form() {
                    return Err(invalid(format!(
                        "columns field {} uses {:?} names, which have no text form",
                        field.name, name_type
                    )));
                }
                maps.push(MapMapping {
                    field: field.name.clone(),
                    name_type: *name_type,
                    value_type: *value_type,
                })
            },
            (FieldMarker::Columns { .. }, field_type) => {
                return Err(invalid(format!(
                    "columns field {} is not a two-parameter mapping: {:?}",
                    field.name, field_type
                )))
            },
            (marker, field_type) => {
                return Err(invalid(format!(
                    "field {} of type {:?} cannot carry {:?}",
                    field.name, field_type, marker
                )))
            },
        }
    }

    if keys.len() != 1 {
        return Err(invalid(format!(
            "expected exactly one key field, found {}",
            keys.len()
        )));
    }
    if super_columns.len() > 1 {
        return Err(invalid(format!(
            "expected at most one super column field, found {}",
            super_columns.len()
        )));
    }
    if description.is_super && super_columns.is_empty() {
        return Err(invalid("super family without a super column field".to_string()));
    }
    if maps.len() > 1 {
        return Err(invalid(format!(
            "expected at most one columns field, found {}",
            maps.len()
        )));
    }

    {
        let mut seen = HashSet::new();
        for mapping in values.iter().chain(optionals.iter()) {
            if !seen.insert(mapping.column.as_str()) {
                return Err(invalid(format!(
                    "column {:?} is mapped by more than one field",
                    mapping.column
                )));
            }
        }
    }

    let descriptor = MappingDescriptor {
        type_name: type_name.to_string(),
        keyspace,
        family,
        key: keys.remove(0),
        super_column: super_columns.pop(),
        values,
        optionals,
        map: maps.pop(),
    };
    debug!(
        type_name = descriptor.type_name(),
        keyspace = descriptor.keyspace(),
        family = descriptor.family(),
        is_super = descriptor.is_super(),
        values = descriptor.values().len(),
        optionals = descriptor.optionals().len(),
        has_map = descriptor.map().is_some(),
        "Resolved mapping descriptor."
    );
    Ok(descriptor)
}
