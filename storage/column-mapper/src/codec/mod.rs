// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Byte encodings for column values and column names.
//!
//! ```text
//! | type    | value bytes                | name text         |
//! |---------|----------------------------|-------------------|
//! | utf8    | UTF-8                      | as-is             |
//! | bytes   | identity                   | (none)            |
//! | int     | i32 big-endian, 4 bytes    | decimal           |
//! | long    | i64 big-endian, 8 bytes    | decimal           |
//! | boolean | 0x00 / 0x01                | true / false      |
//! | float   | f32 bits big-endian        | shortest decimal  |
//! | double  | f64 bits big-endian        | shortest decimal  |
//! | uuid    | 16 raw bytes               | hyphenated        |
//! ```

use crate::{
    error::CodecError,
    value::{Value, ValueType},
};
use byteorder::{BigEndian, ReadBytesExt};
use uuid::Uuid;

/// Encodes `value` as a column value of the declared type.
pub fn encode(value: &Value, declared: ValueType) -> Result<Vec<u8>, CodecError> {
    ensure_type(value, declared)?;
    Ok(match value {
        Value::Utf8(text) => text.as_bytes().to_vec(),
        Value::Bytes(bytes) => bytes.clone(),
        Value::Int(v) => v.to_be_bytes().to_vec(),
        Value::Long(v) => v.to_be_bytes().to_vec(),
        Value::Boolean(v) => vec![u8::from(*v)],
        Value::Float(v) => v.to_bits().to_be_bytes().to_vec(),
        Value::Double(v) => v.to_bits().to_be_bytes().to_vec(),
        Value::Uuid(v) => v.as_bytes().to_vec(),
    })
}

/// Decodes column value bytes as the declared type.
pub fn decode(mut data: &[u8], declared: ValueType) -> Result<Value, CodecError> {
    if let Some(width) = declared.fixed_width() {
        ensure_slice_len_eq(data, declared, width)?;
    }
    let found = data.len();
    let short_read = move |_: std::io::Error| CodecError::InvalidLength {
        value_type: declared,
        expected: declared.fixed_width().unwrap_or_default(),
        found,
    };

    Ok(match declared {
        ValueType::Utf8 => Value::Utf8(decode_utf8(data)?),
        ValueType::Bytes => Value::Bytes(data.to_vec()),
        ValueType::Int => Value::Int(data.read_i32::<BigEndian>().map_err(short_read)?),
        ValueType::Long => Value::Long(data.read_i64::<BigEndian>().map_err(short_read)?),
        ValueType::Boolean => match data[0] {
            0 => Value::Boolean(false),
            1 => Value::Boolean(true),
            other => return Err(CodecError::InvalidBoolean(other)),
        },
        ValueType::Float => {
            let bits = data.read_u32::<BigEndian>().map_err(short_read)?;
            Value::Float(f32::from_bits(bits))
        },
        ValueType::Double => {
            let bits = data.read_u64::<BigEndian>().map_err(short_read)?;
            Value::Double(f64::from_bits(bits))
        },
        ValueType::Uuid => {
            let uuid = Uuid::from_slice(data).map_err(|_| CodecError::InvalidLength {
                value_type: declared,
                expected: 16,
                found,
            })?;
            Value::Uuid(uuid)
        },
    })
}

/// Encodes `value` as a column name. Names are always UTF-8 text.
pub fn encode_name(value: &Value) -> Result<Vec<u8>, CodecError> {
    let text = match value {
        Value::Utf8(text) => text.clone(),
        Value::Bytes(_) => return Err(CodecError::NoTextForm(ValueType::Bytes)),
        Value::Int(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::Boolean(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Uuid(v) => v.hyphenated().to_string(),
    };
    Ok(text.into_bytes())
}

/// Encodes a string constant as a column name.
pub fn encode_str_name(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

/// Decodes a UTF-8 column name and parses it as the declared type.
pub fn decode_name(data: &[u8], declared: ValueType) -> Result<Value, CodecError> {
    let text = decode_utf8(data)?;
    let invalid = |text: String| CodecError::InvalidText {
        value_type: declared,
        text,
    };

    Ok(match declared {
        ValueType::Utf8 => Value::Utf8(text),
        ValueType::Bytes => return Err(CodecError::NoTextForm(declared)),
        ValueType::Int => Value::Int(text.parse().map_err(|_| invalid(text))?),
        ValueType::Long => Value::Long(text.parse().map_err(|_| invalid(text))?),
        ValueType::Boolean => Value::Boolean(text.parse().map_err(|_| invalid(text))?),
        ValueType::Float => Value::Float(text.parse().map_err(|_| invalid(text))?),
        ValueType::Double => Value::Double(text.parse().map_err(|_| invalid(text))?),
        ValueType::Uuid => Value::Uuid(Uuid::parse_str(&text).map_err(|_| invalid(text))?),
    })
}

fn ensure_type(value: &Value, declared: ValueType) -> Result<(), CodecError> {
    let found = value.value_type();
    if found != declared {
        return Err(CodecError::TypeMismatch {
            expected: declared,
            found,
        });
    }
    Ok(())
}

fn ensure_slice_len_eq(data: &[u8], value_type: ValueType, len: usize) -> Result<(), CodecError> {
    if data.len() != len {
        return Err(CodecError::InvalidLength {
            value_type,
            expected: len,
            found: data.len(),
        });
    }
    Ok(())
}

fn decode_utf8(data: &[u8]) -> Result<String, CodecError> {
    String::from_utf8(data.to_vec()).map_err(|e| CodecError::InvalidUtf8(e.to_string()))
}
