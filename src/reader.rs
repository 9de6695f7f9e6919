//! Little-endian cursor over a borrowed byte slice
//!
//! Every decoder in the crate reads through [`Reader`]. Chunk and frame
//! payloads are handed out as bounded sub-readers via [`Reader::take`], so a
//! decoder can never read past the size its container declared.

use thiserror::Error;

/// Error raised when a structural field runs past the end of its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected end of data: needed {needed} bytes at offset {offset}, {available} available")]
pub struct ReadError {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

/// Result alias for cursor reads.
pub type ReadResult<T> = std::result::Result<T, ReadError>;

#[derive(Debug, Clone, Default)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn bytes(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(ReadError {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read up to `n` bytes, returning fewer if the buffer runs out.
    pub fn bytes_lossy(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.remaining());
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    pub fn skip(&mut self, n: usize) -> ReadResult<()> {
        self.bytes(n).map(|_| ())
    }

    /// Advance by `n` bytes, clamping at the end of the buffer.
    pub fn skip_lossy(&mut self, n: usize) {
        self.pos += n.min(self.remaining());
    }

    /// Split off the next `n` bytes as an independent reader.
    ///
    /// A short buffer yields a shorter sub-reader rather than an error; the
    /// parent cursor always ends up past the taken region.
    pub fn take(&mut self, n: usize) -> Reader<'a> {
        Reader::new(self.bytes_lossy(n))
    }

    /// Everything from the cursor to the end, consuming it.
    pub fn rest(&mut self) -> &'a [u8] {
        self.bytes_lossy(self.remaining())
    }

    pub fn u8(&mut self) -> ReadResult<u8> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16(&mut self) -> ReadResult<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn i16(&mut self) -> ReadResult<i16> {
        let b = self.bytes(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> ReadResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn i32(&mut self) -> ReadResult<i32> {
        let b = self.bytes(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Length-prefixed (u16) UTF-8 string. Invalid sequences are replaced.
    pub fn string(&mut self) -> ReadResult<String> {
        let len = self.u16()? as usize;
        let raw = self.bytes(len)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }
}
