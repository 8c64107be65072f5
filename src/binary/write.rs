#![deny(missing_docs)]

//! Write binary data

use crate::binary::{I16Be, I32Be, U16Be, U24Be, U32Be, U8};
use crate::error::WriteError;

/// An in-memory buffer that implements `WriteContext`.
pub struct WriteBuffer {
    data: Vec<u8>,
}

/// Trait that describes a type that can be written to a `WriteContext` in binary form.
pub trait WriteBinary<HostType = Self> {
    /// The type of the value returned by `write`.
    type Output;

    /// Write the binary representation of Self to `ctxt`.
    fn write<C: WriteContext>(ctxt: &mut C, val: HostType) -> Result<Self::Output, WriteError>;
}

/// Trait for types that can have binary data written to them.
pub trait WriteContext {
    /// Write a slice of bytes to a `WriteContext`.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WriteError>;

    /// The total number of bytes written so far.
    fn bytes_written(&self) -> usize;
}

impl<T> WriteBinary<T> for U8
where
    T: Into<u8>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: u8 = t.into();
        ctxt.write_bytes(&[val])
    }
}

impl<T> WriteBinary<T> for I16Be
where
    T: Into<i16>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: i16 = t.into();
        ctxt.write_bytes(&val.to_be_bytes())
    }
}

impl<T> WriteBinary<T> for U16Be
where
    T: Into<u16>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: u16 = t.into();
        ctxt.write_bytes(&val.to_be_bytes())
    }
}

impl<T> WriteBinary<T> for U24Be
where
    T: Into<u32>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: u32 = t.into();
        if val > 0xFF_FFFF {
            return Err(WriteError::BadValue);
        }
        ctxt.write_bytes(&val.to_be_bytes()[1..4])
    }
}

impl<T> WriteBinary<T> for I32Be
where
    T: Into<i32>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: i32 = t.into();
        ctxt.write_bytes(&val.to_be_bytes())
    }
}

impl<T> WriteBinary<T> for U32Be
where
    T: Into<u32>,
{
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, t: T) -> Result<(), WriteError> {
        let val: u32 = t.into();
        ctxt.write_bytes(&val.to_be_bytes())
    }
}

impl WriteContext for WriteBuffer {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WriteError> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn bytes_written(&self) -> usize {
        self.data.len()
    }
}

impl WriteBuffer {
    /// Create a new, empty `WriteBuffer`
    pub fn new() -> Self {
        WriteBuffer { data: Vec::new() }
    }

    /// Create a new, empty `WriteBuffer` that can hold `capacity` bytes without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        WriteBuffer {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Retrieve a slice of the data held by this buffer
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the current size of the data held by this buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been written to this buffer
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume `self` and return the inner buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        WriteBuffer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_big_endian() {
        let mut ctxt = WriteBuffer::new();
        U8::write(&mut ctxt, 1u8).unwrap();
        U16Be::write(&mut ctxt, 0x0203u16).unwrap();
        I16Be::write(&mut ctxt, -2i16).unwrap();
        I32Be::write(&mut ctxt, 100000i32).unwrap();
        U32Be::write(&mut ctxt, 0x0A0B0C0Du32).unwrap();

        assert_eq!(
            ctxt.bytes(),
            &[1, 2, 3, 0xFF, 0xFE, 0x00, 0x01, 0x86, 0xA0, 0x0A, 0x0B, 0x0C, 0x0D]
        );
    }

    #[test]
    fn test_write_u24be() {
        let mut ctxt = WriteBuffer::new();
        U24Be::write(&mut ctxt, 0x10203u32).unwrap();
        assert_eq!(ctxt.bytes(), &[1, 2, 3]);

        // Check out of range value
        match U24Be::write(&mut ctxt, u32::MAX) {
            Err(WriteError::BadValue) => {}
            _ => panic!("Expected WriteError::BadValue"),
        }
    }

    #[test]
    fn test_bytes_written() {
        let mut ctxt = WriteBuffer::with_capacity(4);
        assert!(ctxt.is_empty());
        ctxt.write_bytes(b"CFF").unwrap();
        assert_eq!(ctxt.bytes_written(), 3);
        assert_eq!(ctxt.len(), 3);
        assert_eq!(ctxt.into_inner(), b"CFF".to_vec());
    }
}
