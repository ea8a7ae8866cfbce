//! C1: sequential reads off a byte stream.
//!
//! Everything here returns raw bytes. Filenames in a locate database may
//! have been recorded under any encoding (or none); decoding this early
//! would either throw information away or fail fatally on data that's
//! perfectly fine to report as-is. Decoding is `safe_decode`'s job alone,
//! and happens only at output boundaries.

use std::io::Read;

use crate::error::{AppError, Result};

/// Wraps any `Read` with the handful of primitives the decoder needs.
pub struct ByteReader<R> {
    inner: R,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads exactly `n` bytes, or fails with `TruncatedInput`.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => AppError::TruncatedInput,
                _ => AppError::Io(e),
            })?;
        Ok(buf)
    }

    /// Like `read_exact`, but returns `Ok(None)` on a clean short read of
    /// zero bytes (used only at directory-header boundaries, where a short
    /// read means "end of stream" rather than corruption).
    pub fn try_read_exact(&mut self, n: usize) -> Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; n];
        let mut read = 0;
        while read < n {
            match self.inner.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(k) => read += k,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(AppError::Io(e)),
            }
        }
        if read == 0 {
            return Ok(None);
        }
        if read < n {
            return Err(AppError::TruncatedInput);
        }
        Ok(Some(buf))
    }

    /// Consumes bytes up to (and excluding) the first `\0`. Fails with
    /// `TruncatedInput` if end-of-stream is reached before a terminator.
    pub fn read_cstring(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Err(AppError::TruncatedInput),
                Ok(_) => {
                    if byte[0] == 0 {
                        return Ok(buf);
                    }
                    buf.push(byte[0]);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(AppError::Io(e)),
            }
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_i32_be(&mut self) -> Result<i32> {
        let buf = self.read_exact(4)?;
        Ok(i32::from_be_bytes(buf.try_into().unwrap()))
    }

    pub fn read_i64_be(&mut self) -> Result<i64> {
        let buf = self.read_exact(8)?;
        Ok(i64::from_be_bytes(buf.try_into().unwrap()))
    }
}
