//! Sequential little-endian reader/writer.
//!
//! Every read checks the remaining byte count before touching the buffer and
//! advances only on success, so a failed read leaves the cursor where it was.

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Errors returned by [`ByteReader`] and [`ByteBuffer`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("buffer underrun: requested {requested} bytes, {remaining} remaining")]
    BufferUnderrun { requested: usize, remaining: usize },
    #[error("negative length prefix ({length})")]
    NegativeLength { length: i16 },
    #[error("payload of {length} bytes does not fit a 16-bit length prefix")]
    PayloadTooLong { length: usize },
}

/// Growable output buffer with fixed-width little-endian appends.
#[derive(Clone, Debug, Default)]
pub struct ByteBuffer {
    bytes: BytesMut,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: BytesMut::with_capacity(capacity),
        }
    }

    pub fn append_bool(&mut self, value: bool) {
        self.bytes.put_u8(u8::from(value));
    }

    pub fn append_u8(&mut self, value: u8) {
        self.bytes.put_u8(value);
    }

    pub fn append_i8(&mut self, value: i8) {
        self.bytes.put_i8(value);
    }

    pub fn append_i16(&mut self, value: i16) {
        self.bytes.put_i16_le(value);
    }

    pub fn append_i32(&mut self, value: i32) {
        self.bytes.put_i32_le(value);
    }

    pub fn append_i64(&mut self, value: i64) {
        self.bytes.put_i64_le(value);
    }

    pub fn append_f32(&mut self, value: f32) {
        self.bytes.put_f32_le(value);
    }

    pub fn append_f64(&mut self, value: f64) {
        self.bytes.put_f64_le(value);
    }

    /// Append `data` preceded by its length as a 16-bit integer.
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<(), CursorError> {
        let length = i16::try_from(data.len())
            .map_err(|_| CursorError::PayloadTooLong { length: data.len() })?;
        self.bytes.reserve(2 + data.len());
        self.bytes.put_i16_le(length);
        self.bytes.put_slice(data);
        Ok(())
    }

    /// Append `data` verbatim, without a length prefix.
    pub fn append_raw(&mut self, data: &[u8]) {
        self.bytes.put_slice(data);
    }

    /// Length-prefixed UTF-8 text.
    pub fn append_str(&mut self, text: &str) -> Result<(), CursorError> {
        self.append_bytes(text.as_bytes())
    }

    /// Raw UTF-8 text, as used by the control commands.
    pub fn append_str_raw(&mut self, text: &str) {
        self.append_raw(text.as_bytes());
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
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Reader positioned at the start of the written data.
    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(&self.bytes)
    }

    pub fn freeze(self) -> Bytes {
        self.bytes.freeze()
    }
}

/// Read cursor over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Rewind to the start of the buffer. The buffer itself is untouched.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    fn ensure(&self, requested: usize) -> Result<(), CursorError> {
        let remaining = self.remaining();
        if remaining < requested {
            return Err(CursorError::BufferUnderrun {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    /// Check and consume `width` bytes, returning them.
    fn take(&mut self, width: usize) -> Result<&'a [u8], CursorError> {
        self.ensure(width)?;
        let start = self.pos;
        self.pos += width;
        Ok(&self.data[start..self.pos])
    }

    pub fn read_bool(&mut self) -> Result<bool, CursorError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.take(1)?.get_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8, CursorError> {
        Ok(self.take(1)?.get_i8())
    }

    pub fn read_i16(&mut self) -> Result<i16, CursorError> {
        Ok(self.take(2)?.get_i16_le())
    }

    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        Ok(self.take(4)?.get_i32_le())
    }

    pub fn read_i64(&mut self) -> Result<i64, CursorError> {
        Ok(self.take(8)?.get_i64_le())
    }

    pub fn read_f32(&mut self) -> Result<f32, CursorError> {
        Ok(self.take(4)?.get_f32_le())
    }

    pub fn read_f64(&mut self) -> Result<f64, CursorError> {
        Ok(self.take(8)?.get_f64_le())
    }

    /// Read a 16-bit length prefix followed by that many bytes.
    ///
    /// Both the prefix and the payload are checked before the cursor moves.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], CursorError> {
        self.ensure(2)?;
        let length = (&self.data[self.pos..self.pos + 2]).get_i16_le();
        let payload = usize::try_from(length).map_err(|_| CursorError::NegativeLength { length })?;
        self.ensure(2 + payload)?;
        self.pos += 2;
        self.take(payload)
    }

    /// Length-prefixed text. Invalid UTF-8 is replaced, matching what the
    /// server emits for plain ASCII replies.
    pub fn read_string(&mut self) -> Result<String, CursorError> {
        Ok(String::from_utf8_lossy(self.read_bytes()?).into_owned())
    }
}
