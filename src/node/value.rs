// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Node state values and the wire codec.
//!
//! Every node declares a [`WireType`]. When a node announces a value to the
//! bus, the value is encoded with the fixed byte layout of that tag:
//!
//! | tag                  | layout                          |
//! |----------------------|---------------------------------|
//! | `bool`               | 1 byte, `0x00` / `0x01`         |
//! | `byte` / `unbyte`    | 1 byte                          |
//! | `int16` / `unint16`  | 2 bytes little-endian           |
//! | `int` / `unint`      | 4 bytes little-endian           |
//! | `int64` / `unint64`  | 8 bytes little-endian           |
//! | `float` / `double`   | IEEE-754, 4 / 8 bytes LE        |
//! | `bytes`              | raw                             |
//! | `utf8`               | raw utf8                        |
//! | `rgb`                | 3 bytes `r, g, b`               |
//! | `json`               | compact json as utf8            |
//!
//! [`decode`] is the exact inverse of [`encode`]; both sides of the bus rely
//! on that.

use crate::errors::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared wire representation of a node's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "byte")]
    I8,
    #[serde(rename = "unbyte")]
    U8,
    #[serde(rename = "int16")]
    I16,
    #[serde(rename = "unint16")]
    U16,
    #[serde(rename = "int")]
    I32,
    #[serde(rename = "unint")]
    U32,
    #[serde(rename = "int64")]
    I64,
    #[serde(rename = "unint64")]
    U64,
    #[serde(rename = "float")]
    F32,
    #[serde(rename = "double")]
    F64,
    #[serde(rename = "bytes")]
    Bytes,
    #[serde(rename = "utf8", alias = "string", alias = "nibble")]
    Utf8,
    #[serde(rename = "rgb")]
    Rgb,
    #[serde(rename = "json", alias = "JSON")]
    Json,
}

impl WireType {
    /// Encoded size for fixed-width tags, `None` for variable-length ones.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            WireType::Bool | WireType::I8 | WireType::U8 => Some(1),
            WireType::I16 | WireType::U16 => Some(2),
            WireType::Rgb => Some(3),
            WireType::I32 | WireType::U32 | WireType::F32 => Some(4),
            WireType::I64 | WireType::U64 | WireType::F64 => Some(8),
            WireType::Bytes | WireType::Utf8 | WireType::Json => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WireType::Bool => "bool",
            WireType::I8 => "byte",
            WireType::U8 => "unbyte",
            WireType::I16 => "int16",
            WireType::U16 => "unint16",
            WireType::I32 => "int",
            WireType::U32 => "unint",
            WireType::I64 => "int64",
            WireType::U64 => "unint64",
            WireType::F32 => "float",
            WireType::F64 => "double",
            WireType::Bytes => "bytes",
            WireType::Utf8 => "utf8",
            WireType::Rgb => "rgb",
            WireType::Json => "json",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The state carried by a node.
///
/// Deserializes untagged so config literals (`10`, `"abc"`, `true`) become
/// values directly; integers land in `I64`, fractions in `F64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    I64(i64),
    F64(f64),
    Text(String),
    #[serde(skip_deserializing)]
    I8(i8),
    #[serde(skip_deserializing)]
    U8(u8),
    #[serde(skip_deserializing)]
    I16(i16),
    #[serde(skip_deserializing)]
    U16(u16),
    #[serde(skip_deserializing)]
    I32(i32),
    #[serde(skip_deserializing)]
    U32(u32),
    #[serde(skip_deserializing)]
    U64(u64),
    #[serde(skip_deserializing)]
    F32(f32),
    #[serde(skip_deserializing)]
    Bytes(Vec<u8>),
    #[serde(skip_deserializing)]
    Rgb([u8; 3]),
    Json(serde_json::Value),
}

impl Value {
    /// The tag this value encodes to without conversion.
    pub fn wire_type(&self) -> WireType {
        match self {
            Value::Bool(_) => WireType::Bool,
            Value::I8(_) => WireType::I8,
            Value::U8(_) => WireType::U8,
            Value::I16(_) => WireType::I16,
            Value::U16(_) => WireType::U16,
            Value::I32(_) => WireType::I32,
            Value::U32(_) => WireType::U32,
            Value::I64(_) => WireType::I64,
            Value::U64(_) => WireType::U64,
            Value::F32(_) => WireType::F32,
            Value::F64(_) => WireType::F64,
            Value::Bytes(_) => WireType::Bytes,
            Value::Text(_) => WireType::Utf8,
            Value::Rgb(_) => WireType::Rgb,
            Value::Json(_) => WireType::Json,
        }
    }

    /// Convert a loosely typed value, such as a config literal, to the variant
    /// `tag` encodes. Values that already match pass through unchanged.
    pub fn coerce(self, tag: WireType) -> Result<Value, CodecError> {
        let found = self.wire_type();
        if found == tag {
            return Ok(self);
        }
        match (tag, self) {
            (WireType::Json, other) => Ok(Value::Json(serde_json::to_value(&other)?)),
            (WireType::Bytes, Value::Text(s)) => Ok(Value::Bytes(s.into_bytes())),
            (WireType::F32, Value::I64(v)) => Ok(Value::F32(v as f32)),
            (WireType::F32, Value::F64(v)) => Ok(Value::F32(v as f32)),
            (WireType::F64, Value::I64(v)) => Ok(Value::F64(v as f64)),
            (_, Value::I64(v)) => narrow(tag, v),
            _ => Err(CodecError::TypeMismatch {
                expected: tag,
                found,
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Bytes(b) => write!(f, "b'{}'", b.escape_ascii()),
            Value::Text(s) => f.write_str(s),
            Value::Rgb([r, g, b]) => write!(f, "rgb({}, {}, {})", r, g, b),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

fn narrow(tag: WireType, v: i64) -> Result<Value, CodecError> {
    let out_of_range = |_| CodecError::OutOfRange { tag, value: v };
    let value = match tag {
        WireType::I8 => Value::I8(i8::try_from(v).map_err(out_of_range)?),
        WireType::U8 => Value::U8(u8::try_from(v).map_err(out_of_range)?),
        WireType::I16 => Value::I16(i16::try_from(v).map_err(out_of_range)?),
        WireType::U16 => Value::U16(u16::try_from(v).map_err(out_of_range)?),
        WireType::I32 => Value::I32(i32::try_from(v).map_err(out_of_range)?),
        WireType::U32 => Value::U32(u32::try_from(v).map_err(out_of_range)?),
        WireType::U64 => Value::U64(u64::try_from(v).map_err(out_of_range)?),
        other => {
            return Err(CodecError::TypeMismatch {
                expected: other,
                found: WireType::I64,
            })
        }
    };
    Ok(value)
}

/// Encode `value` with the byte layout of `tag`.
pub fn encode(value: &Value, tag: WireType) -> Result<Vec<u8>, CodecError> {
    let bytes = match (tag, value) {
        (WireType::Bool, Value::Bool(v)) => vec![u8::from(*v)],
        (WireType::I8, Value::I8(v)) => v.to_le_bytes().to_vec(),
        (WireType::U8, Value::U8(v)) => vec![*v],
        (WireType::I16, Value::I16(v)) => v.to_le_bytes().to_vec(),
        (WireType::U16, Value::U16(v)) => v.to_le_bytes().to_vec(),
        (WireType::I32, Value::I32(v)) => v.to_le_bytes().to_vec(),
        (WireType::U32, Value::U32(v)) => v.to_le_bytes().to_vec(),
        (WireType::I64, Value::I64(v)) => v.to_le_bytes().to_vec(),
        (WireType::U64, Value::U64(v)) => v.to_le_bytes().to_vec(),
        (WireType::F32, Value::F32(v)) => v.to_le_bytes().to_vec(),
        (WireType::F64, Value::F64(v)) => v.to_le_bytes().to_vec(),
        (WireType::Bytes, Value::Bytes(b)) => b.clone(),
        (WireType::Utf8, Value::Text(s)) => s.as_bytes().to_vec(),
        (WireType::Rgb, Value::Rgb(rgb)) => rgb.to_vec(),
        (WireType::Json, Value::Json(v)) => serde_json::to_vec(v)?,
        (expected, other) => {
            return Err(CodecError::TypeMismatch {
                expected,
                found: other.wire_type(),
            })
        }
    };
    Ok(bytes)
}

/// Decode bytes produced by [`encode`] for the same `tag`.
pub fn decode(bytes: &[u8], tag: WireType) -> Result<Value, CodecError> {
    if let Some(expected) = tag.fixed_len() {
        if bytes.len() != expected {
            return Err(CodecError::Length {
                tag,
                expected,
                actual: bytes.len(),
            });
        }
    }

    let value = match tag {
        WireType::Bool => Value::Bool(bytes[0] != 0),
        WireType::I8 => Value::I8(i8::from_le_bytes([bytes[0]])),
        WireType::U8 => Value::U8(bytes[0]),
        WireType::I16 => Value::I16(i16::from_le_bytes([bytes[0], bytes[1]])),
        WireType::U16 => Value::U16(u16::from_le_bytes([bytes[0], bytes[1]])),
        WireType::I32 => Value::I32(i32::from_le_bytes(fixed(bytes))),
        WireType::U32 => Value::U32(u32::from_le_bytes(fixed(bytes))),
        WireType::I64 => Value::I64(i64::from_le_bytes(fixed(bytes))),
        WireType::U64 => Value::U64(u64::from_le_bytes(fixed(bytes))),
        WireType::F32 => Value::F32(f32::from_le_bytes(fixed(bytes))),
        WireType::F64 => Value::F64(f64::from_le_bytes(fixed(bytes))),
        WireType::Bytes => Value::Bytes(bytes.to_vec()),
        WireType::Utf8 => Value::Text(String::from_utf8(bytes.to_vec())?),
        WireType::Rgb => Value::Rgb([bytes[0], bytes[1], bytes[2]]),
        WireType::Json => Value::Json(serde_json::from_slice(bytes)?),
    };
    Ok(value)
}

// Length is checked against `fixed_len` before this is called.
fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}
