// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The bridge between application types and the mapping engine.

use crate::{
    error::MappingError,
    metadata::TypeDescription,
    value::{ColumnValue, Value},
};
use std::collections::HashMap;

/// A type that can be marshalled to and from a column family row.
///
/// `describe` supplies the metadata, resolved once per type and cached.
/// `to_fields` and `from_fields` move field values in and out of a
/// [`FieldSet`] keyed by the field names used in the description.
pub trait Mapped: Sized + 'static {
    fn describe() -> TypeDescription;

    fn to_fields(&self) -> FieldSet;

    fn from_fields(fields: FieldSet) -> Result<Self, MappingError>;
}

/// The value held by one field of a mapped object.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    /// `None` is the absent state, distinct from any zero value.
    Optional(Option<Value>),
    Map(Vec<(Value, Value)>),
}

impl FieldValue {
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Scalar(_) => "scalar",
            FieldValue::Optional(_) => "optional",
            FieldValue::Map(_) => "map",
        }
    }
}

/// Field values of one object, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSet {
    fields: HashMap<String, FieldValue>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: ColumnValue>(mut self, field: &str, value: T) -> Self {
        self.insert(field, FieldValue::Scalar(value.into_value()));
        self
    }

    pub fn with_optional<T: ColumnValue>(mut self, field: &str, value: Option<T>) -> Self {
        self.insert(
            field,
            FieldValue::Optional(value.map(ColumnValue::into_value)),
        );
        self
    }

    pub fn with_map<K, V>(mut self, field: &str, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: ColumnValue,
        V: ColumnValue,
    {
        let entries = entries
            .into_iter()
            .map(|(name, value)| (name.into_value(), value.into_value()))
            .collect();
        self.insert(field, FieldValue::Map(entries));
        self
    }

    pub fn insert(&mut self, field: &str, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(field.to_string(), value)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn take<T: ColumnValue>(&mut self, field: &str) -> Result<T, MappingError> {
        match self.take_field(field)? {
            FieldValue::Scalar(value) => Ok(T::from_value(value)?),
            other => Err(shape_error(field, "scalar", &other)),
        }
    }

    pub fn take_optional<T: ColumnValue>(
        &mut self,
        field: &str,
    ) -> Result<Option<T>, MappingError> {
        match self.take_field(field)? {
            FieldValue::Optional(value) => Ok(value.map(T::from_value).transpose()?),
            other => Err(shape_error(field, "optional", &other)),
        }
    }

    /// Takes a map field into any collection of typed pairs.
    pub fn take_map<K, V, M>(&mut self, field: &str) -> Result<M, MappingError>
    where
        K: ColumnValue,
        V: ColumnValue,
        M: FromIterator<(K, V)>,
    {
        match self.take_field(field)? {
            FieldValue::Map(entries) => entries
                .into_iter()
                .map(|(name, value)| -> Result<(K, V), MappingError> {
                    Ok((K::from_value(name)?, V::from_value(value)?))
                })
                .collect(),
            other => Err(shape_error(field, "map", &other)),
        }
    }

    fn take_field(&mut self, field: &str) -> Result<FieldValue, MappingError> {
        self.fields
            .remove(field)
            .ok_or_else(|| MappingError::FieldNotSet {
                field: field.to_string(),
            })
    }
}

pub(crate) fn shape_error(field: &str, expected: &'static str, found: &FieldValue) -> MappingError {
    MappingError::FieldShape {
        field: field.to_string(),
        expected,
        found: found.shape(),
    }
}
