//! Snappy match encoding.
//!
//! Snappy has no repeat tags, so a long match becomes a train of 64-byte copy2
//! tags followed by one tag for the remainder.

use crate::convert::MatchEncoder;
use crate::error::Result;
use crate::lz4s::Match;
use crate::writer::{TAG_COPY1, TAG_COPY2, TagWriter};

const COPY1_OFFSET_LIMIT: u16 = 2048;

const COPY2_MAX_LEN: usize = 64;

/// Stateless encoder for Snappy output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnappyEncoder;

impl MatchEncoder for SnappyEncoder {
    fn emit_match(&mut self, w: &mut TagWriter<'_>, m: Match) -> Result<()> {
        emit_copy(w, m.offset, m.length)
    }
}

/// Emits a copy of `length` bytes at `offset` using copy1/copy2 tags only.
pub fn emit_copy(w: &mut TagWriter<'_>, offset: u16, length: usize) -> Result<()> {
    let [lo, hi] = offset.to_le_bytes();
    let mut length = length;

    while length > 0 {
        w.check_room()?;

        if length > COPY2_MAX_LEN {
            w.put(&[63 << 2 | TAG_COPY2, lo, hi])?;
            length -= COPY2_MAX_LEN;
            continue;
        }
        if length >= 12 || offset >= COPY1_OFFSET_LIMIT || length < 4 {
            return w.put(&[((length - 1) as u8) << 2 | TAG_COPY2, lo, hi]);
        }
        return w.put(&[
            hi << 5 | ((length - 4) as u8) << 2 | TAG_COPY1,
            lo,
        ]);
    }
    Ok(())
}
