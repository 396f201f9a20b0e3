//! # Wire Reader
//!
//! Read-side counterpart of [`WireWriter`](crate::core::writer::WireWriter) for the
//! primitive kinds. It exists so encoded output can be checked against the values
//! that produced it; packet-level decoding is not provided.
//!
//! Every read validates the remaining length before touching the buffer, so malformed
//! input yields `DeserializeError` instead of a panic.

use crate::error::{constants, ProtocolError, Result};
use bytes::Buf;

/// Longest LEB128 prefix accepted for a string length (covers `u32::MAX`)
const MAX_VARINT_BYTES: usize = 5;

/// Cursor over encoded bytes
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(ProtocolError::DeserializeError(format!(
                "{}: need {n} bytes, have {}",
                constants::ERR_UNEXPECTED_EOF,
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.need(2)?;
        Ok(self.buf.get_i16_le())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.need(8)?;
        Ok(self.buf.get_i64_le())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.need(1)?;
        match self.buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::DeserializeError(format!(
                "{}: {other:#04x}",
                constants::ERR_INVALID_BOOL
            ))),
        }
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()?;
        if len > self.buf.remaining() {
            return Err(ProtocolError::DeserializeError(format!(
                "{}: {len} > {}",
                constants::ERR_STRING_TOO_LONG,
                self.buf.remaining()
            )));
        }
        let (head, tail) = self.buf.split_at(len);
        let value = std::str::from_utf8(head)
            .map_err(|e| {
                ProtocolError::DeserializeError(format!("{}: {e}", constants::ERR_INVALID_UTF8))
            })?
            .to_owned();
        self.buf = tail;
        Ok(value)
    }

    fn read_varint(&mut self) -> Result<usize> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_BYTES {
            self.need(1)?;
            let byte = self.buf.get_u8();
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return usize::try_from(value).map_err(|_| {
                    ProtocolError::DeserializeError(constants::ERR_VARINT_OVERFLOW.to_string())
                });
            }
        }
        Err(ProtocolError::DeserializeError(
            constants::ERR_VARINT_OVERFLOW.to_string(),
        ))
    }
}
