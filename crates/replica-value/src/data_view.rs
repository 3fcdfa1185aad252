//! DataView implementation
//!
//! DataView provides a low-level interface for reading and writing multiple
//! number types in an ArrayBuffer, with control over byte order (endianness).

use crate::array_buffer::{buffer_is_detached, buffer_length, read_buffer, write_buffer};
use crate::error::{ValueError, ValueResult};
use crate::object::ObjectRef;

/// A DataView over an ArrayBuffer object
#[derive(Debug, Clone)]
pub struct DataViewData {
    /// The underlying ArrayBuffer object
    buffer: ObjectRef,
    /// Byte offset into the buffer
    byte_offset: usize,
    /// Length of the view in bytes
    byte_length: usize,
}

impl DataViewData {
    /// Create a new DataView over an ArrayBuffer object
    pub fn new(
        buffer: ObjectRef,
        byte_offset: usize,
        byte_length: Option<usize>,
    ) -> ValueResult<Self> {
        if buffer.read().as_array_buffer().is_none() {
            return Err(ValueError::type_error(
                "DataView buffer must be an ArrayBuffer",
            ));
        }
        if buffer_is_detached(&buffer) {
            return Err(ValueError::Detached);
        }

        let buf_len = buffer_length(&buffer);

        if byte_offset > buf_len {
            return Err(ValueError::range_error(
                "byte offset is outside the bounds of the buffer",
            ));
        }

        let actual_length = match byte_length {
            Some(len) => {
                byte_offset
                    .checked_add(len)
                    .filter(|&end| end <= buf_len)
                    .ok_or_else(|| ValueError::range_error("byte length extends beyond the buffer"))?;
                len
            }
            None => buf_len - byte_offset,
        };

        Ok(Self {
            buffer,
            byte_offset,
            byte_length: actual_length,
        })
    }

    /// Same view geometry over another buffer of the same length
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

    /// Get the byte offset into the buffer
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Get the byte length of the view (0 once detached)
    pub fn byte_length(&self) -> usize {
        if buffer_is_detached(&self.buffer) {
            0
        } else {
            self.byte_length
        }
    }

    /// Absolute buffer offset of `len` bytes at `offset` within the view
    fn locate(&self, offset: usize, len: usize) -> ValueResult<usize> {
        offset
            .checked_add(len)
            .filter(|&end| end <= self.byte_length())
            .map(|_| self.byte_offset + offset)
            .ok_or_else(|| ValueError::range_error("offset is outside the bounds of the DataView"))
    }

    fn read<const N: usize>(&self, offset: usize) -> ValueResult<[u8; N]> {
        let start = self.locate(offset, N)?;
        let mut bytes = [0u8; N];
        read_buffer(&self.buffer, start, &mut bytes)?;
        Ok(bytes)
    }

    fn write(&self, offset: usize, bytes: &[u8]) -> ValueResult<()> {
        let start = self.locate(offset, bytes.len())?;
        write_buffer(&self.buffer, start, bytes)
    }

    /// Get an unsigned 8-bit integer
    pub fn get_uint8(&self, offset: usize) -> ValueResult<u8> {
        Ok(self.read::<1>(offset)?[0])
    }

    /// Set an unsigned 8-bit integer
    pub fn set_uint8(&self, offset: usize, value: u8) -> ValueResult<()> {
        self.write(offset, &[value])
    }

    /// Get a signed 16-bit integer
    pub fn get_int16(&self, offset: usize, little_endian: bool) -> ValueResult<i16> {
        let bytes = self.read::<2>(offset)?;
        Ok(if little_endian {
            i16::from_le_bytes(bytes)
        } else {
            i16::from_be_bytes(bytes)
        })
    }

    /// Set a signed 16-bit integer
    pub fn set_int16(&self, offset: usize, value: i16, little_endian: bool) -> ValueResult<()> {
        let bytes = if little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write(offset, &bytes)
    }

    /// Get a 64-bit float
    pub fn get_float64(&self, offset: usize, little_endian: bool) -> ValueResult<f64> {
        let bytes = self.read::<8>(offset)?;
        Ok(if little_endian {
            f64::from_le_bytes(bytes)
        } else {
            f64::from_be_bytes(bytes)
        })
    }

    /// Set a 64-bit float
    pub fn set_float64(&self, offset: usize, value: f64, little_endian: bool) -> ValueResult<()> {
        let bytes = if little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write(offset, &bytes)
    }
}
