//! Bounded output cursor shared by the S2 and Snappy encoders.

use crate::error::{ConvertError, Result};
use log::trace;

/// Tag for literal runs.
pub const TAG_LITERAL: u8 = 0x00;

/// Tag for copies with an 11-bit offset (and S2 repeats).
pub const TAG_COPY1: u8 = 0x01;

/// Tag for copies with a 16-bit offset.
pub const TAG_COPY2: u8 = 0x02;

/// Output bytes kept in reserve below the destination capacity.
///
/// Every margin check leaves room for the widest single tag header, so a
/// check that passes can be followed by one header write without overrunning.
pub const MARGIN: usize = 10;

/// Write cursor over a caller-owned destination slice.
#[derive(Debug)]
pub struct TagWriter<'a> {
    dst: &'a mut [u8],
    pos: usize,
    limit: usize,
}

impl<'a> TagWriter<'a> {
    pub fn new(dst: &'a mut [u8]) -> Self {
        let limit = dst.len().saturating_sub(MARGIN);
        Self { dst, pos: 0, limit }
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Fails unless `n` literal bytes fit below the margin-adjusted limit.
    pub fn reserve_literals(&self, n: usize) -> Result<()> {
        if self.pos.saturating_add(n) > self.limit {
            trace!(
                "writer: {} literals at {} exceed limit {}",
                n,
                self.pos,
                self.limit
            );
            return Err(ConvertError::DstTooSmall);
        }
        Ok(())
    }

    /// Fails if the cursor has moved past the margin-adjusted limit.
    pub fn check_limit(&self) -> Result<()> {
        if self.pos > self.limit {
            trace!("writer: position {} past limit {}", self.pos, self.limit);
            return Err(ConvertError::DstTooSmall);
        }
        Ok(())
    }

    /// Fails if the cursor has reached the margin-adjusted limit.
    pub fn check_room(&self) -> Result<()> {
        if self.pos >= self.limit {
            trace!("writer: position {} at limit {}", self.pos, self.limit);
            return Err(ConvertError::DstTooSmall);
        }
        Ok(())
    }

    /// Copies `bytes` to the cursor. Nothing is written if they do not fit.
    pub fn put(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.pos + bytes.len();
        let Some(out) = self.dst.get_mut(self.pos..end) else {
            trace!(
                "writer: {} bytes at {} overrun capacity {}",
                bytes.len(),
                self.pos,
                self.dst.len()
            );
            return Err(ConvertError::DstTooSmall);
        };
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Emits a literal run with its length header.
    pub fn emit_literal(&mut self, lit: &[u8]) -> Result<()> {
        if lit.is_empty() {
            return Ok(());
        }

        let n = lit.len() - 1;
        let mut header = [0u8; 5];
        let header_len = if n < 60 {
            header[0] = (n as u8) << 2 | TAG_LITERAL;
            1
        } else {
            // Codes 60..=63 select a 1..=4 byte little-endian length.
            let extra = match n {
                0..=0xFF => 1,
                0x100..=0xFFFF => 2,
                0x1_0000..=0xFF_FFFF => 3,
                _ => 4,
            };
            if extra == 4 && u32::try_from(n).is_err() {
                trace!("writer: literal run of {} bytes is not encodable", lit.len());
                return Err(ConvertError::Corrupt);
            }
            header[0] = (59 + extra) << 2 | TAG_LITERAL;
            let extra_len = usize::from(extra);
            header[1..=extra_len].copy_from_slice(&n.to_le_bytes()[..extra_len]);
            1 + extra_len
        };

        self.put(&header[..header_len])?;
        self.put(lit)
    }
}
