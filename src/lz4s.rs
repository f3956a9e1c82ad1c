//! LZ4s sequence reader.
//!
//! LZ4s is the intermediate block format produced by Intel QAT hardware. It keeps
//! the LZ4 block layout (token, literal run, 2-byte offset, length extensions) but
//! biases match lengths by 3 instead of 4, and a match nibble of zero means
//! "no match" rather than a 4-byte match.
//!
//! The reader never materializes decompressed data. It only tracks how many bytes
//! the block would decompress to, which is enough to validate every offset.

use crate::error::{ConvertError, Result};
use log::trace;

/// Match length bias of this LZ4s variant: a match nibble `n` means `MIN_MATCH + n`.
pub const MIN_MATCH: usize = 3;

/// Nibble value signalling that a length continues in extension bytes.
const NIBBLE_MAX: u8 = 15;

/// Extension byte value signalling that more extension bytes follow.
const EXT_CONTINUE: u8 = 255;

/// Literal run of one sequence, plus the match nibble from its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literals<'a> {
    pub bytes: &'a [u8],
    pub match_code: u8,
}

/// A back-reference that passed offset validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub offset: u16,
    pub length: usize,
}

/// What follows the literal run of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStep {
    /// Terminal sequence: the block is complete.
    End,
    /// Zero-length match marker; continue with the next token.
    Skip,
    Copy(Match),
}

/// Cursor over one LZ4s block.
#[derive(Debug, Clone)]
pub struct Lz4sReader<'a> {
    src: &'a [u8],
    pos: usize,
    uncompressed: usize,
}

impl<'a> Lz4sReader<'a> {
    #[must_use]
    pub const fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            uncompressed: 0,
        }
    }

    /// Current read position in the source block.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes the block decompresses to so far.
    #[must_use]
    pub const fn uncompressed(&self) -> usize {
        self.uncompressed
    }

    /// Reads a token, its literal-length extension and the literal run.
    pub fn read_literals(&mut self) -> Result<Literals<'a>> {
        let src = self.src;
        if self.pos >= src.len() {
            trace!("lz4s: token read past end at {}", self.pos);
            return Err(ConvertError::Corrupt);
        }

        let token = src[self.pos];
        let mut lit_len = usize::from(token >> 4);

        if token >> 4 == NIBBLE_MAX {
            loop {
                self.pos += 1;
                let Some(&val) = src.get(self.pos) else {
                    trace!("lz4s: literal length extension truncated at {}", self.pos);
                    return Err(ConvertError::Corrupt);
                };
                lit_len = lit_len
                    .checked_add(usize::from(val))
                    .ok_or(ConvertError::Corrupt)?;
                if val != EXT_CONTINUE {
                    break;
                }
            }
        }

        // `pos` still points at the last token/extension byte here, so the run
        // must end strictly before the end of the block.
        let end = self
            .pos
            .checked_add(lit_len)
            .ok_or(ConvertError::Corrupt)?;
        if end >= src.len() {
            trace!(
                "lz4s: literal run overruns input ({} + {} >= {})",
                self.pos,
                lit_len,
                src.len()
            );
            return Err(ConvertError::Corrupt);
        }

        let start = self.pos + 1;
        self.pos = end + 1;
        self.uncompressed += lit_len;

        Ok(Literals {
            bytes: &src[start..self.pos],
            match_code: token & 0x0F,
        })
    }

    /// Reads the match belonging to the sequence whose token carried `match_code`.
    pub fn read_match(&mut self, match_code: u8) -> Result<MatchStep> {
        let src = self.src;

        if match_code == 0 {
            if self.pos == src.len() {
                return Ok(MatchStep::End);
            }
            return Ok(MatchStep::Skip);
        }

        // The offset can never be the last thing in a block.
        if self.pos + 2 >= src.len() {
            trace!(
                "lz4s: offset truncated at {} (len {})",
                self.pos,
                src.len()
            );
            return Err(ConvertError::Corrupt);
        }
        let offset = u16::from_le_bytes([src[self.pos], src[self.pos + 1]]);
        self.pos += 2;

        if offset == 0 {
            trace!("lz4s: zero offset at {}", self.pos - 2);
            return Err(ConvertError::Corrupt);
        }
        if usize::from(offset) > self.uncompressed {
            trace!(
                "lz4s: offset {} reaches before block start (decoded {})",
                offset,
                self.uncompressed
            );
            return Err(ConvertError::Corrupt);
        }

        let mut length = MIN_MATCH + usize::from(match_code);
        if match_code == NIBBLE_MAX {
            loop {
                let Some(&val) = src.get(self.pos) else {
                    trace!("lz4s: match length extension truncated at {}", self.pos);
                    return Err(ConvertError::Corrupt);
                };
                self.pos += 1;
                length = length
                    .checked_add(usize::from(val))
                    .ok_or(ConvertError::Corrupt)?;
                if val != EXT_CONTINUE {
                    if self.pos >= src.len() {
                        trace!("lz4s: block ends inside a match at {}", self.pos);
                        return Err(ConvertError::Corrupt);
                    }
                    break;
                }
            }
        }

        self.uncompressed = self
            .uncompressed
            .checked_add(length)
            .ok_or(ConvertError::Corrupt)?;

        Ok(MatchStep::Copy(Match { offset, length }))
    }
}
