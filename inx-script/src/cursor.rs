use inx_nls::TextDecoder;

use crate::error::{InxError, Result};

/// Read position over a borrowed script buffer.
///
/// All multi-byte values are little-endian. Every read is bounds-checked; a
/// failed read leaves the position untouched.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Cursor positioned at `offset`.
    pub fn at(bytes: &'a [u8], offset: usize) -> Result<Self> {
        let mut cursor = Self::new(bytes);
        cursor.seek(offset)?;
        Ok(cursor)
    }

    /// Current position relative to the start of the buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.bytes.len() {
            return Err(InxError::OutOfBounds {
                offset,
                wanted: 0,
                len: self.bytes.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    fn check(&self, wanted: usize) -> Result<()> {
        if self.remaining() < wanted {
            return Err(InxError::OutOfBounds {
                offset: self.pos,
                wanted,
                len: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check(n)?;
        let v = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(v)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn peek_u8(&self) -> Result<u8> {
        self.check(1)?;
        Ok(self.bytes[self.pos])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let v = self.peek_u8()?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let b = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(b);
        Ok(out)
    }

    /// Length-prefixed string: u16 byte count followed by the raw bytes.
    ///
    /// The whole string is bounds-checked before anything is consumed.
    pub fn read_string(&mut self, nls: &dyn TextDecoder) -> Result<String> {
        let start = self.pos;
        let n = self.read_u16()? as usize;
        match self.read_bytes(n) {
            Ok(raw) => Ok(nls.decode(raw).into_owned()),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }
}
