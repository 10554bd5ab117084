// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Declarative description of a mapped type.
//!
//! A `TypeDescription` is the unresolved input to descriptor resolution: it
//! records what a type *claims* about itself, including contradictory claims
//! (two keys, a map marker on a scalar field, ...) which resolution rejects.

use crate::value::{ColumnValue, ValueType};

/// The Rust-side shape of a field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Scalar(ValueType),
    Optional(ValueType),
    Map(ValueType, ValueType),
}

impl FieldType {
    pub fn scalar<T: ColumnValue>() -> Self {
        FieldType::Scalar(T::VALUE_TYPE)
    }

    pub fn optional<T: ColumnValue>() -> Self {
        FieldType::Optional(T::VALUE_TYPE)
    }

    pub fn map<K: ColumnValue, V: ColumnValue>() -> Self {
        FieldType::Map(K::VALUE_TYPE, V::VALUE_TYPE)
    }
}

/// Role markers attachable to a field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldMarker {
    /// The field supplies the row key.
    Key,
    /// A required column, named explicitly.
    Value { column: String },
    /// A column which may be absent.
    Optional {
        column: String,
        value_type: ValueType,
    },
    /// The field supplies the super column name.
    SuperColumn,
    /// Catch-all for every column not claimed by a named field.
    Columns {
        name_type: ValueType,
        value_type: ValueType,
    },
}

impl FieldMarker {
    pub fn value(column: impl Into<String>) -> Self {
        FieldMarker::Value {
            column: column.into(),
        }
    }

    pub fn optional(column: impl Into<String>, value_type: ValueType) -> Self {
        FieldMarker::Optional {
            column: column.into(),
            value_type,
        }
    }

    pub fn columns(name_type: ValueType, value_type: ValueType) -> Self {
        FieldMarker::Columns {
            name_type,
            value_type,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDescription {
    pub name: String,
    pub field_type: FieldType,
    pub markers: Vec<FieldMarker>,
}

impl FieldDescription {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            markers: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: FieldMarker) -> Self {
        self.markers.push(marker);
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeDescription {
    pub type_name: String,
    pub keyspace: Option<String>,
    pub family: Option<String>,
    pub is_super: bool,
    pub fields: Vec<FieldDescription>,
}

impl TypeDescription {
    pub fn builder(type_name: impl Into<String>) -> TypeDescriptionBuilder {
        TypeDescriptionBuilder {
            description: TypeDescription {
                type_name: type_name.into(),
                keyspace: None,
                family: None,
                is_super: false,
                fields: Vec::new(),
            },
        }
    }
}

/// Builds a `TypeDescription` one marker at a time.
///
/// The typed helpers (`key`, `value`, ...) derive the field type from the
/// Rust type parameter, so the common case cannot disagree with itself.
/// `field` accepts an arbitrary description for anything else.
pub struct TypeDescriptionBuilder {
    description: TypeDescription,
}

impl TypeDescriptionBuilder {
    pub fn keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.description.keyspace = Some(keyspace.into());
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.description.family = Some(family.into());
        self
    }

    pub fn super_family(mut self) -> Self {
        self.description.is_super = true;
        self
    }

    pub fn key<T: ColumnValue>(self, field: &str) -> Self {
        self.field(
            FieldDescription::new(field, FieldType::scalar::<T>()).with_marker(FieldMarker::Key),
        )
    }

    pub fn value<T: ColumnValue>(self, field: &str, column: &str) -> Self {
        self.field(
            FieldDescription::new(field, FieldType::scalar::<T>())
                .with_marker(FieldMarker::value(column)),
        )
    }

    pub fn optional<T: ColumnValue>(self, field: &str, column: &str) -> Self {
        self.field(
            FieldDescription::new(field, FieldType::optional::<T>())
                .with_marker(FieldMarker::optional(column, T::VALUE_TYPE)),
        )
    }

    pub fn super_column<T: ColumnValue>(self, field: &str) -> Self {
        self.field(
            FieldDescription::new(field, FieldType::scalar::<T>())
                .with_marker(FieldMarker::SuperColumn),
        )
    }

    pub fn columns<K: ColumnValue, V: ColumnValue>(self, field: &str) -> Self {
        self.field(
            FieldDescription::new(field, FieldType::map::<K, V>())
                .with_marker(FieldMarker::columns(K::VALUE_TYPE, V::VALUE_TYPE)),
        )
    }

    pub fn field(mut self, field: FieldDescription) -> Self {
        self.description.fields.push(field);
        self
    }

    pub fn build(self) -> TypeDescription {
        self.description
    }
}
