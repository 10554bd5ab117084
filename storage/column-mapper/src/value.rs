// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Typed values carried between application fields and column bytes.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The declared storage type of a column value or column name.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Utf8,
    Bytes,
    Int,
    Long,
    Boolean,
    Float,
    Double,
    Uuid,
}

impl ValueType {
    /// The exact encoded width for fixed-width types, `None` for variable ones.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            ValueType::Utf8 | ValueType::Bytes => None,
            ValueType::Boolean => Some(1),
            ValueType::Int | ValueType::Float => Some(4),
            ValueType::Long | ValueType::Double => Some(8),
            ValueType::Uuid => Some(16),
        }
    }

    /// Whether values of this type can be rendered as a UTF-8 column name.
    pub fn has_text_form(self) -> bool {
        !matches!(self, ValueType::Bytes)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Utf8(String),
    Bytes(Vec<u8>),
    Int(i32),
    Long(i64),
    Boolean(bool),
    Float(f32),
    Double(f64),
    Uuid(Uuid),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Utf8(_) => ValueType::Utf8,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Uuid(_) => ValueType::Uuid,
        }
    }
}

/// Rust types that can live in a mapped field.
///
/// Implemented for the primitive set the codec understands; application
/// types convert through one of these.
pub trait ColumnValue: Sized {
    const VALUE_TYPE: ValueType;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Result<Self, CodecError>;
}

macro_rules! impl_column_value {
    ($ty:ty, $variant:ident) => {
        impl ColumnValue for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Result<Self, CodecError> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(CodecError::TypeMismatch {
                        expected: ValueType::$variant,
                        found: other.value_type(),
                    }),
                }
            }
        }
    };
}

impl_column_value!(String, Utf8);
impl_column_value!(Vec<u8>, Bytes);
impl_column_value!(i32, Int);
impl_column_value!(i64, Long);
impl_column_value!(bool, Boolean);
impl_column_value!(f32, Float);
impl_column_value!(f64, Double);
impl_column_value!(Uuid, Uuid);
