use crate::error::Result;
use crate::lz4s::{Lz4sReader, Match, MatchStep};
use crate::s2::S2Encoder;
use crate::snappy::SnappyEncoder;
use crate::writer::TagWriter;
use alloc::vec::Vec;
use log::{debug, trace};

/// Writes one decoded match in a target format's tag encoding.
pub trait MatchEncoder {
    fn emit_match(&mut self, w: &mut TagWriter<'_>, m: Match) -> Result<()>;
}

/// Outcome of converting one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Converted {
    /// Bytes written to the start of the destination.
    pub written: usize,
    /// Size of the block once decompressed.
    pub uncompressed: usize,
}

/// Output block format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    #[default]
    S2,
    Snappy,
}

/// A block conversion backend.
///
/// The portable implementation is [`Lz4sConverter`]. Alternative backends must
/// produce identical output and report failures through
/// [`ConvertError::from_status`](crate::ConvertError::from_status).
pub trait BlockConverter {
    /// Converts `src` into the start of `dst`, which must be sized for the worst case.
    fn convert_block(&self, dst: &mut [u8], src: &[u8]) -> Result<Converted>;

    /// Appends the converted block to `dst` using only its spare capacity.
    ///
    /// On failure `dst` keeps its original length. Returns the decompressed size.
    fn convert_block_into(&self, dst: &mut Vec<u8>, src: &[u8]) -> Result<usize> {
        let start = dst.len();
        dst.resize(dst.capacity(), 0);
        match self.convert_block(&mut dst[start..], src) {
            Ok(done) => {
                dst.truncate(start + done.written);
                Ok(done.uncompressed)
            }
            Err(e) => {
                dst.truncate(start);
                Err(e)
            }
        }
    }
}

/// Portable LZ4s block converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lz4sConverter {
    target: Target,
}

impl Lz4sConverter {
    #[must_use]
    pub const fn new(target: Target) -> Self {
        Self { target }
    }

    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }
}

impl BlockConverter for Lz4sConverter {
    fn convert_block(&self, dst: &mut [u8], src: &[u8]) -> Result<Converted> {
        match self.target {
            Target::S2 => convert_with(dst, src, S2Encoder::new()),
            Target::Snappy => convert_with(dst, src, SnappyEncoder),
        }
    }
}

/// Converts an LZ4s block into an S2 block (without the length prefix).
pub fn convert_block(dst: &mut [u8], src: &[u8]) -> Result<Converted> {
    convert_with(dst, src, S2Encoder::new())
}

/// Converts an LZ4s block into a Snappy block (without the length prefix).
pub fn convert_block_snappy(dst: &mut [u8], src: &[u8]) -> Result<Converted> {
    convert_with(dst, src, SnappyEncoder)
}

/// Appends an S2 conversion of `src` to `dst` without growing it.
pub fn convert_block_into(dst: &mut Vec<u8>, src: &[u8]) -> Result<usize> {
    Lz4sConverter::new(Target::S2).convert_block_into(dst, src)
}

/// Appends a Snappy conversion of `src` to `dst` without growing it.
pub fn convert_block_snappy_into(dst: &mut Vec<u8>, src: &[u8]) -> Result<usize> {
    Lz4sConverter::new(Target::Snappy).convert_block_into(dst, src)
}

/// Drives the reader and an encoder over one block.
pub fn convert_with<E: MatchEncoder>(
    dst: &mut [u8],
    src: &[u8],
    mut encoder: E,
) -> Result<Converted> {
    if src.is_empty() {
        return Ok(Converted::default());
    }
    debug!(
        "convert block start: src {} bytes, dst {} bytes",
        src.len(),
        dst.len()
    );

    let mut reader = Lz4sReader::new(src);
    let mut w = TagWriter::new(dst);

    loop {
        let lits = reader.read_literals()?;
        if !lits.bytes.is_empty() {
            w.reserve_literals(lits.bytes.len())?;
            w.emit_literal(lits.bytes)?;
        }

        match reader.read_match(lits.match_code)? {
            MatchStep::End => break,
            MatchStep::Skip => continue,
            MatchStep::Copy(m) => {
                trace!("emit match, length: {}, offset: {}", m.length, m.offset);
                encoder.emit_match(&mut w, m)?;
                w.check_limit()?;
            }
        }
    }

    // A trailing literal run is only checked against the limit before its header.
    w.check_limit()?;

    let done = Converted {
        written: w.position(),
        uncompressed: reader.uncompressed(),
    };
    debug!(
        "convert block done: wrote {} bytes, {} bytes uncompressed",
        done.written, done.uncompressed
    );
    Ok(done)
}
