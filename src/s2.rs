//! S2 match encoding.
//!
//! S2 extends the Snappy tag set with repeat copies: a copy1 tag whose offset
//! field is zero reuses the previous offset, and its 3-bit length field selects
//! how many extra length bytes follow. Repeats make long runs cheap, so every
//! long match is expressed as one short copy followed by repeats.

use crate::convert::MatchEncoder;
use crate::error::Result;
use crate::lz4s::Match;
use crate::writer::{TAG_COPY1, TAG_COPY2, TagWriter};

/// Largest value the 3-byte repeat length field can carry.
const MAX_REPEAT: usize = (1 << 24) - 1;

/// Largest offset a copy1 tag can address.
const COPY1_OFFSET_LIMIT: u16 = 2048;

/// Longest copy a single copy2 tag can express.
const COPY2_MAX_LEN: usize = 64;

/// Encoder state for S2 output: the offset of the last non-repeat copy.
#[derive(Debug, Default, Clone)]
pub struct S2Encoder {
    last_offset: u16,
}

impl S2Encoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { last_offset: 0 }
    }

    #[must_use]
    pub const fn last_offset(&self) -> u16 {
        self.last_offset
    }
}

impl MatchEncoder for S2Encoder {
    fn emit_match(&mut self, w: &mut TagWriter<'_>, m: Match) -> Result<()> {
        if m.offset == self.last_offset {
            return emit_repeat(w, m.offset, m.length);
        }
        emit_copy(w, m.offset, m.length)?;
        self.last_offset = m.offset;
        Ok(())
    }
}

/// Emits a repeat of the previous offset covering `length` bytes (`length >= 4`).
///
/// Lengths past the widest repeat field are split into successive repeat tags.
pub fn emit_repeat(w: &mut TagWriter<'_>, offset: u16, length: usize) -> Result<()> {
    debug_assert!(length >= 4);
    let mut length = length;

    loop {
        let n = length - 4;

        if n <= 4 {
            return w.put(&[(n as u8) << 2 | TAG_COPY1, 0]);
        }
        if n < 8 && offset < COPY1_OFFSET_LIMIT {
            // Short enough for a plain copy1; the offset rides along.
            return w.put(&[
                ((offset >> 8) as u8) << 5 | (n as u8) << 2 | TAG_COPY1,
                offset as u8,
            ]);
        }
        if n < (1 << 8) + 4 {
            return w.put(&[5 << 2 | TAG_COPY1, 0, (n - 4) as u8]);
        }
        if n < (1 << 16) + (1 << 8) {
            let v = n - (1 << 8);
            return w.put(&[6 << 2 | TAG_COPY1, 0, v as u8, (v >> 8) as u8]);
        }

        let mut v = n - (1 << 16);
        let mut left = 0;
        if v > MAX_REPEAT {
            left = v - MAX_REPEAT + 4;
            v = MAX_REPEAT - 4;
        }
        w.put(&[
            7 << 2 | TAG_COPY1,
            0,
            v as u8,
            (v >> 8) as u8,
            (v >> 16) as u8,
        ])?;
        if left == 0 {
            return Ok(());
        }
        length = left;
    }
}

/// Emits a copy with an explicit offset, spilling anything past one tag into repeats.
pub fn emit_copy(w: &mut TagWriter<'_>, offset: u16, length: usize) -> Result<()> {
    if length > COPY2_MAX_LEN {
        if offset < COPY1_OFFSET_LIMIT {
            // 8 bytes as copy1, the rest as repeats.
            w.put(&[
                ((offset >> 8) as u8) << 5 | (8 - 4) << 2 | TAG_COPY1,
                offset as u8,
            ])?;
            return emit_repeat(w, offset, length - 8);
        }
        // 60 bytes as copy2, leaving at least 5 for the repeat.
        let [lo, hi] = offset.to_le_bytes();
        w.put(&[59 << 2 | TAG_COPY2, lo, hi])?;
        return emit_repeat(w, offset, length - 60);
    }

    if length >= 12 || offset >= COPY1_OFFSET_LIMIT {
        let [lo, hi] = offset.to_le_bytes();
        return w.put(&[((length - 1) as u8) << 2 | TAG_COPY2, lo, hi]);
    }

    w.put(&[
        ((offset >> 8) as u8) << 5 | ((length - 4) as u8) << 2 | TAG_COPY1,
        offset as u8,
    ])
}
