//! ArrayBuffer storage
//!
//! ArrayBuffer is the foundation for TypedArrays and DataViews. Its bytes
//! can be detached (transferred away), after which it reports length 0.

use crate::error::{ValueError, ValueResult};
use crate::object::ObjectRef;

/// Raw byte storage of an ArrayBuffer
#[derive(Debug, Clone, Default)]
pub struct ArrayBufferData {
    /// The underlying byte data. None if detached.
    data: Option<Vec<u8>>,
}

impl ArrayBufferData {
    /// Create a zero-filled buffer
    pub fn new(byte_length: usize) -> Self {
        Self {
            data: Some(vec![0; byte_length]),
        }
    }

    /// Take ownership of `bytes`
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { data: Some(bytes) }
    }

    /// Check if the buffer is detached
    pub fn is_detached(&self) -> bool {
        self.data.is_none()
    }

    /// Detach the buffer, returning its bytes
    pub fn detach(&mut self) -> Option<Vec<u8>> {
        self.data.take()
    }

    /// Get the byte length (0 if detached)
    pub fn byte_length(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    /// Borrow the bytes (None if detached)
    pub fn bytes(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Byte-for-byte copy of this buffer. A detached buffer copies to a
    /// detached buffer.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Read a byte at the given index
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.as_ref()?.get(index).copied()
    }

    /// Write a byte at the given index
    pub fn set(&mut self, index: usize, value: u8) -> bool {
        match self.data.as_mut().and_then(|d| d.get_mut(index)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Read bytes into a slice
    pub fn read_bytes(&self, offset: usize, dest: &mut [u8]) -> ValueResult<()> {
        let data = self.data.as_ref().ok_or(ValueError::Detached)?;
        let end = offset
            .checked_add(dest.len())
            .filter(|&end| end <= data.len())
            .ok_or_else(|| ValueError::range_error("offset is outside the bounds of the buffer"))?;
        dest.copy_from_slice(&data[offset..end]);
        Ok(())
    }

    /// Write bytes from a slice
    pub fn write_bytes(&mut self, offset: usize, src: &[u8]) -> ValueResult<()> {
        let data = self.data.as_mut().ok_or(ValueError::Detached)?;
        let end = offset
            .checked_add(src.len())
            .filter(|&end| end <= data.len())
            .ok_or_else(|| ValueError::range_error("offset is outside the bounds of the buffer"))?;
        data[offset..end].copy_from_slice(src);
        Ok(())
    }
}

/// Read from the ArrayBuffer behind `buffer`
pub(crate) fn read_buffer(buffer: &ObjectRef, offset: usize, dest: &mut [u8]) -> ValueResult<()> {
    let obj = buffer.read();
    let data = obj
        .as_array_buffer()
        .ok_or_else(|| ValueError::type_error("view is not backed by an ArrayBuffer"))?;
    data.read_bytes(offset, dest)
}

/// Write into the ArrayBuffer behind `buffer`
pub(crate) fn write_buffer(buffer: &ObjectRef, offset: usize, src: &[u8]) -> ValueResult<()> {
    let mut obj = buffer.write();
    let data = obj
        .as_array_buffer_mut()
        .ok_or_else(|| ValueError::type_error("view is not backed by an ArrayBuffer"))?;
    data.write_bytes(offset, src)
}

/// Byte length of the ArrayBuffer behind `buffer` (0 if detached or not a buffer)
pub(crate) fn buffer_length(buffer: &ObjectRef) -> usize {
    buffer
        .read()
        .as_array_buffer()
        .map_or(0, ArrayBufferData::byte_length)
}

/// Check whether the ArrayBuffer behind `buffer` is detached
pub(crate) fn buffer_is_detached(buffer: &ObjectRef) -> bool {
    buffer
        .read()
        .as_array_buffer()
        .is_none_or(ArrayBufferData::is_detached)
}
