//! TypedArray implementation
//!
//! TypedArrays are views over ArrayBuffer, providing typed access to binary data.
//! All 11 types share common implementation via TypedArrayKind.

use crate::array_buffer::{buffer_is_detached, buffer_length, read_buffer, write_buffer};
use crate::error::{ValueError, ValueResult};
use crate::object::ObjectRef;
use crate::value::Value;
use num_bigint::{BigInt, Sign};

/// The kind of TypedArray - determines element size and interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    /// Int8Array - 8-bit signed integers
    Int8,
    /// Uint8Array - 8-bit unsigned integers
    Uint8,
    /// Uint8ClampedArray - 8-bit unsigned integers (clamped)
    Uint8Clamped,
    /// Int16Array - 16-bit signed integers
    Int16,
    /// Uint16Array - 16-bit unsigned integers
    Uint16,
    /// Int32Array - 32-bit signed integers
    Int32,
    /// Uint32Array - 32-bit unsigned integers
    Uint32,
    /// Float32Array - 32-bit floating point
    Float32,
    /// Float64Array - 64-bit floating point
    Float64,
    /// BigInt64Array - 64-bit signed integers (BigInt)
    BigInt64,
    /// BigUint64Array - 64-bit unsigned integers (BigInt)
    BigUint64,
}

impl TypedArrayKind {
    /// Get the byte size of each element
    pub fn element_size(&self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::Float64 | TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => 8,
        }
    }

    /// Get the name of this TypedArray type
    pub fn name(&self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
            TypedArrayKind::BigInt64 => "BigInt64Array",
            TypedArrayKind::BigUint64 => "BigUint64Array",
        }
    }

    /// Check if this is a BigInt typed array
    pub fn is_bigint(&self) -> bool {
        matches!(self, TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64)
    }

    fn decode(&self, bytes: &[u8]) -> Value {
        let mut raw = [0u8; 8];
        raw[..bytes.len()].copy_from_slice(bytes);
        match self {
            TypedArrayKind::Int8 => Value::number(raw[0] as i8 as f64),
            TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => Value::number(raw[0] as f64),
            TypedArrayKind::Int16 => Value::number(i16::from_le_bytes([raw[0], raw[1]]) as f64),
            TypedArrayKind::Uint16 => Value::number(u16::from_le_bytes([raw[0], raw[1]]) as f64),
            TypedArrayKind::Int32 => {
                Value::number(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64)
            }
            TypedArrayKind::Uint32 => {
                Value::number(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64)
            }
            TypedArrayKind::Float32 => {
                Value::number(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64)
            }
            TypedArrayKind::Float64 => Value::number(f64::from_le_bytes(raw)),
            TypedArrayKind::BigInt64 => Value::bigint(BigInt::from(i64::from_le_bytes(raw))),
            TypedArrayKind::BigUint64 => Value::bigint(BigInt::from(u64::from_le_bytes(raw))),
        }
    }

    fn encode(&self, value: &Value) -> Option<[u8; 8]> {
        if self.is_bigint() {
            return value.as_bigint().map(bigint_low_bits);
        }
        let n = value.as_number()?;
        let mut raw = [0u8; 8];
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 => raw[0] = wrap_integer(n) as u8,
            TypedArrayKind::Uint8Clamped => {
                raw[0] = if n.is_nan() {
                    0
                } else {
                    n.clamp(0.0, 255.0).round_ties_even() as u8
                }
            }
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => {
                raw[..2].copy_from_slice(&(wrap_integer(n) as u16).to_le_bytes())
            }
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 => {
                raw[..4].copy_from_slice(&(wrap_integer(n) as u32).to_le_bytes())
            }
            TypedArrayKind::Float32 => raw[..4].copy_from_slice(&(n as f32).to_le_bytes()),
            TypedArrayKind::Float64 => raw = n.to_le_bytes(),
            TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => {}
        }
        Some(raw)
    }
}

/// ToInt32-style modular conversion: truncate, then keep the low bits.
fn wrap_integer(n: f64) -> i64 {
    if !n.is_finite() {
        return 0;
    }
    (n.trunc() % 4_294_967_296.0) as i64
}

/// Low 64 bits of a bigint in two's complement.
fn bigint_low_bits(b: &BigInt) -> [u8; 8] {
    let fill = if b.sign() == Sign::Minus { 0xFF } else { 0x00 };
    let mut raw = [fill; 8];
    let bytes = b.to_signed_bytes_le();
    let n = bytes.len().min(8);
    raw[..n].copy_from_slice(&bytes[..n]);
    raw
}

/// A TypedArray view
///
/// The view does not own bytes; it references an ArrayBuffer object.
#[derive(Debug, Clone)]
pub struct TypedArrayData {
    /// The underlying ArrayBuffer object
    buffer: ObjectRef,
    /// Byte offset into the buffer
    byte_offset: usize,
    /// Number of elements (not bytes)
    length: usize,
    /// The kind of typed array
    kind: TypedArrayKind,
}

impl TypedArrayData {
    /// Create a new TypedArray view over an ArrayBuffer object
    pub fn new(
        buffer: ObjectRef,
        kind: TypedArrayKind,
        byte_offset: usize,
        length: usize,
    ) -> ValueResult<Self> {
        let elem_size = kind.element_size();

        {
            let obj = buffer.read();
            let data = obj
                .as_array_buffer()
                .ok_or_else(|| ValueError::type_error("TypedArray buffer must be an ArrayBuffer"))?;
            if data.is_detached() {
                return Err(ValueError::Detached);
            }
        }

        if byte_offset % elem_size != 0 {
            return Err(ValueError::range_error(
                "byte offset must be aligned to element size",
            ));
        }

        let byte_length = length
            .checked_mul(elem_size)
            .ok_or_else(|| ValueError::range_error("TypedArray length overflow"))?;
        byte_offset
            .checked_add(byte_length)
            .filter(|&end| end <= buffer_length(&buffer))
            .ok_or_else(|| ValueError::range_error("TypedArray would extend past end of buffer"))?;

        Ok(Self {
            buffer,
            byte_offset,
            length,
            kind,
        })
    }

    /// View over the whole of a buffer sized for exactly `length` elements
    pub(crate) fn over_fresh_buffer(buffer: ObjectRef, kind: TypedArrayKind, length: usize) -> Self {
        Self {
            buffer,
            byte_offset: 0,
            length,
            kind,
        }
    }

    /// Same view geometry over another buffer. The caller guarantees
    /// `buffer` has the same byte length as the current one.
    pub fn with_buffer(&self, buffer: ObjectRef) -> Self {
        Self {
            buffer,
            ..self.clone()
        }
    }

    /// Get the underlying ArrayBuffer object
    pub fn buffer(&self) -> &ObjectRef {
        &self.buffer
    }

    /// Get the kind
    pub fn kind(&self) -> TypedArrayKind {
        self.kind
    }

    /// Get the byte offset into the buffer
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Number of elements (0 once the buffer is detached)
    pub fn length(&self) -> usize {
        if buffer_is_detached(&self.buffer) {
            0
        } else {
            self.length
        }
    }

    /// Length of the view in bytes
    pub fn byte_length(&self) -> usize {
        self.length() * self.kind.element_size()
    }

    /// Read element `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        if index >= self.length() {
            return None;
        }
        let size = self.kind.element_size();
        let mut bytes = [0u8; 8];
        read_buffer(
            &self.buffer,
            self.byte_offset + index * size,
            &mut bytes[..size],
        )
        .ok()?;
        Some(self.kind.decode(&bytes[..size]))
    }

    /// Write element `index`. Returns `false` for out-of-range indices and
    /// values of the wrong type (numbers for BigInt arrays or vice versa).
    pub fn set(&self, index: usize, value: &Value) -> bool {
        if index >= self.length() {
            return false;
        }
        let Some(raw) = self.kind.encode(value) else {
            return false;
        };
        let size = self.kind.element_size();
        write_buffer(&self.buffer, self.byte_offset + index * size, &raw[..size]).is_ok()
    }
}
