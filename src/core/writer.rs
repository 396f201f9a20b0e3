//! # Wire Writer
//!
//! Append-only byte sink with one call per primitive kind.
//!
//! ## Wire Format
//! ```text
//! i16     [2 bytes LE]
//! i32     [4 bytes LE]
//! i64     [8 bytes LE]
//! bool    [1 byte: 0x00 | 0x01]
//! string  [LEB128 byte length] [UTF-8 bytes]
//! ```
//!
//! A writer is owned by exactly one `serialize` call and handed back to the caller
//! as frozen [`Bytes`] when the call completes.

use crate::core::primitive::Primitive;
use bytes::{BufMut, Bytes, BytesMut};

/// Default capacity for a fresh writer
pub const DEFAULT_CAPACITY: usize = 256;

/// Append-only primitive encoder backed by a `BytesMut`
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Write a signed 16-bit integer (2 bytes, little-endian)
    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16_le(value);
    }

    /// Write a signed 32-bit integer (4 bytes, little-endian)
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    /// Write a signed 64-bit integer (8 bytes, little-endian)
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64_le(value);
    }

    /// Write a boolean as a single byte
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    /// Write a length-prefixed UTF-8 string
    pub fn write_str(&mut self, value: &str) {
        self.write_varint(value.len() as u64);
        self.buf.put_slice(value.as_bytes());
    }

    /// Write any primitive through the dispatch table
    #[inline]
    pub fn write_primitive(&mut self, value: &Primitive<'_>) {
        value.encode(self);
    }

    /// Append raw bytes verbatim. Intended for hooks that emit pre-encoded data.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.put_u8((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buf.put_u8(value as u8);
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Drop everything written after `len`
    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Freeze the written bytes
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}
