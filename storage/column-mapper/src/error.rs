// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::value::ValueType;
use thiserror::Error;

/// Failures converting a single value to or from its byte representation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Value of type {found:?} cannot be encoded as {expected:?}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },
    #[error("Unexpected data len {found} for {value_type:?}, expected {expected}")]
    InvalidLength {
        value_type: ValueType,
        expected: usize,
        found: usize,
    },
    #[error("Invalid UTF-8 data: {0}")]
    InvalidUtf8(String),
    #[error("Invalid boolean byte: {0:#04x}")]
    InvalidBoolean(u8),
    #[error("{0:?} values have no text form and cannot be used as column names")]
    NoTextForm(ValueType),
    #[error("Cannot parse {text:?} as {value_type:?}")]
    InvalidText { value_type: ValueType, text: String },
}

/// Errors surfaced by descriptor resolution, marshalling and unmarshalling.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Invalid mapping for {type_name}: {reason}")]
    InvalidMapping { type_name: String, reason: String },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("Required column {column:?} for field {field} is missing from the row")]
    MissingColumn { field: String, column: String },
    #[error("Field {field} was not provided by the object")]
    FieldNotSet { field: String },
    #[error("Field {field} holds a {found} value, expected {expected}")]
    FieldShape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Map field {field} produced column {column:?}, already mapped by a named field")]
    DuplicateColumn { field: String, column: String },
    #[error("Malformed row for {type_name}: {reason}")]
    RowShape { type_name: String, reason: String },
    #[error("Row belongs to {found}, expected {expected}")]
    FamilyMismatch { expected: String, found: String },
}

impl MappingError {
    pub(crate) fn invalid_mapping(type_name: &str, reason: impl Into<String>) -> Self {
        MappingError::InvalidMapping {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn row_shape(type_name: &str, reason: impl Into<String>) -> Self {
        MappingError::RowShape {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    /// A short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            MappingError::InvalidMapping { .. } => "invalid_mapping",
            MappingError::Codec(_) => "codec",
            MappingError::MissingColumn { .. } => "missing_column",
            MappingError::FieldNotSet { .. } => "field_not_set",
            MappingError::FieldShape { .. } => "field_shape",
            MappingError::DuplicateColumn { .. } => "duplicate_column",
            MappingError::RowShape { .. } => "row_shape",
            MappingError::FamilyMismatch { .. } => "family_mismatch",
        }
    }
}
