//! crambit: bit-level CRAM codec primitives and random-access index
//!
//! # Overview
//!
//! CRAM compresses alignment data by packing per-column statistics into
//! compact, non-byte-aligned byte streams. crambit implements the
//! intricate core of that format: the bit-level integer/byte codecs,
//! the canonical Huffman code construction, the compression-header base
//! substitution matrix, and the gzip-compressed `.crai` index used to
//! seek directly to the container covering a reference region.
//!
//! The surrounding container/slice/block structure, reference
//! alignment, and textual formats (FASTA/FASTQ/VCF/SAM) are out of
//! scope; a block reader supplies each codec with a [`BitStream`]
//! positioned at the right offset and knows from block metadata which
//! variant and parameters apply.
//!
//! ## Quick Start
//!
//! ```
//! use crambit::{BitStream, Codec};
//! use std::io::SeekFrom;
//!
//! # fn main() -> crambit::Result<()> {
//! // Fixed-width field: read lengths known to sit in 0..256.
//! let codec = Codec::Beta { offset: 0, num_bits: 8 };
//!
//! let mut stream = BitStream::new();
//! codec.encode(151, &mut stream)?;
//! codec.encode(76, &mut stream)?;
//!
//! stream.seek_bits(SeekFrom::Start(0))?;
//! assert_eq!(codec.decode(&mut stream)?, 151);
//! assert_eq!(codec.decode(&mut stream)?, 76);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`bitstream`]: cursor-addressed bit reader/writer, the foundation
//!   for every codec
//! - [`codec`]: Beta, Gamma, Golomb, Golomb-Rice, sub-exponential and
//!   Huffman codecs plus the canonical code computer
//! - [`substitution`]: 2-bit substitution code → nucleotide lookup
//! - [`index`]: `.crai` entries, loader and per-reference query

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bitstream;
pub mod codec;
pub mod error;
pub mod index;
pub mod substitution;

// Re-export commonly used types
pub use bitstream::BitStream;
pub use codec::{Codec, HuffmanCodec, HuffmanSymbol};
pub use error::{CrambitError, Result};
pub use index::{CraiEntry, CraiIndex};
pub use substitution::SubstitutionMatrix;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
