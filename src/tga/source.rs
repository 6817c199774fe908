//! Byte source over a blocking reader.
//!
//! Header fields are read strictly: a short read is an error. Palette and
//! pixel data are read leniently: once the input runs out, the missing bytes
//! read as zero and [`ByteSource::exhausted`] turns true.

use std::io::{ErrorKind, Read};

use crate::error::BitmapError;

pub(crate) struct ByteSource<R> {
    inner: R,
    exhausted: bool,
}

impl<R: Read> ByteSource<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            exhausted: false,
        }
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, BitmapError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub(crate) fn read_u16_le(&mut self) -> Result<u16, BitmapError> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Fill `buf` completely or fail with [`BitmapError::UnexpectedEof`].
    pub(crate) fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BitmapError> {
        self.inner
            .read_exact(buf)
            .map_err(BitmapError::from_header_io)
    }

    /// Fill as much of `buf` as the input allows and zero the rest.
    ///
    /// Returns `false` when the input ended before `buf` was full.
    pub(crate) fn read_lenient(&mut self, buf: &mut [u8]) -> Result<bool, BitmapError> {
        if self.exhausted {
            buf.fill(0);
            return Ok(false);
        }
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(BitmapError::Io(e)),
            }
        }
        if filled < buf.len() {
            buf[filled..].fill(0);
            self.exhausted = true;
            return Ok(false);
        }
        Ok(true)
    }
}
