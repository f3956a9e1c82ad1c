//! # LZ4s Block Conversion
//!
//! `lz4s-convert` rewrites LZ4s blocks, the intermediate format emitted by Intel QAT
//! hardware, as S2 or Snappy blocks in a single pass. Literal runs are copied and
//! matches are re-encoded; the decompressed data is never produced, only its size.
//!
//! Output is a raw block body: the uncompressed-length varint and any stream
//! framing are left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use lz4s_convert::{convert_block, convert_block_snappy};
//!
//! // "abcd" as literals, then a 4-byte copy at offset 4, then the terminal token.
//! let lz4s = [0x41, b'a', b'b', b'c', b'd', 0x04, 0x00, 0x00];
//!
//! let mut dst = [0u8; 64];
//! let s2 = convert_block(&mut dst, &lz4s).expect("conversion failed");
//! assert_eq!(s2.uncompressed, 8);
//! assert_eq!(&dst[..s2.written], &[3 << 2, b'a', b'b', b'c', b'd', 0x01, 0x04]);
//!
//! let snappy = convert_block_snappy(&mut dst, &lz4s).expect("conversion failed");
//! assert_eq!(snappy.uncompressed, s2.uncompressed);
//! ```
//!
//! ## Errors
//!
//! [`ConvertError::Corrupt`] means the input can never convert.
//! [`ConvertError::DstTooSmall`] means the destination needs more room; the block
//! can be retried in full with a larger buffer. Bytes written before an error are
//! not meaningful.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod convert;
pub mod error;
pub mod lz4s;
pub mod s2;
pub mod snappy;
pub mod writer;

pub use convert::{
    BlockConverter, Converted, Lz4sConverter, Target, convert_block, convert_block_into,
    convert_block_snappy, convert_block_snappy_into,
};
pub use error::ConvertError;
pub use lz4s::MIN_MATCH;
pub use writer::MARGIN;
