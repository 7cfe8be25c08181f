//! Integer/byte codecs for CRAM core data series
//!
//! CRAM packs per-column statistics (alignment starts, read lengths,
//! substitution codes, quality values) into non-byte-aligned bit
//! streams. Each data series is assigned one codec variant plus its
//! parameters in the compression header; this module implements the
//! bit-level variants, all sharing one contract:
//!
//! - `encode(value, stream)` appends the value's codeword at the
//!   stream's current bit cursor,
//! - `decode(stream)` consumes exactly one codeword and returns the
//!   value.
//!
//! # Offset
//!
//! Every variant is parameterized by an `offset` subtracted from the
//! value before encoding and re-added after decoding. Choosing an
//! offset at or below the minimum expected value makes negative values
//! encodable as non-negative magnitudes and shrinks the dynamic range
//! around an expected center.
//!
//! # Variants
//!
//! | Variant | Parameters | Layout |
//! |---------|-----------|--------|
//! | Beta | `num_bits` | fixed-width binary field |
//! | Gamma | — | zero run of `bit_length(v)`, then `v` in full |
//! | Golomb | `m` | unary quotient, truncated-binary remainder |
//! | Golomb-Rice | `k` | unary quotient, plain `k`-bit remainder |
//! | Sub-exponential | `k` | unary scale prefix, binary remainder |
//! | Huffman | code table | canonical prefix code |
//!
//! # Failure Policy
//!
//! A value outside the configured domain is
//! [`OutOfRange`](crate::CrambitError::OutOfRange) at encode time,
//! never silently truncated. Decoding past the available bits is
//! [`EndOfStream`](crate::CrambitError::EndOfStream); a codeword no
//! valid encoder could have produced is
//! [`InvalidFormat`](crate::CrambitError::InvalidFormat).
//!
//! # Example
//!
//! ```
//! use crambit::{BitStream, Codec};
//! use std::io::SeekFrom;
//!
//! # fn main() -> crambit::Result<()> {
//! // Alignment spans hover near 150; recenter them.
//! let codec = Codec::SubExponential { offset: 100, k: 4 };
//! let mut stream = BitStream::new();
//! for span in [148, 151, 150, 212] {
//!     codec.encode(span, &mut stream)?;
//! }
//! stream.seek_bits(SeekFrom::Start(0))?;
//! assert_eq!(codec.decode(&mut stream)?, 148);
//! # Ok(())
//! # }
//! ```

use crate::bitstream::BitStream;
use crate::error::{CrambitError, Result};

mod huffman;

pub use huffman::{HuffmanCodec, HuffmanSymbol};

/// A configured codec instance.
///
/// Immutable once constructed; each `encode`/`decode` call is
/// independent given the same stream position, so one instance may be
/// shared freely across streams.
#[derive(Debug, Clone)]
pub enum Codec {
    /// Fixed-width binary field of `num_bits` bits. The baseline when
    /// the value range is known exactly.
    Beta {
        /// Subtracted before encoding, re-added after decoding
        offset: i32,
        /// Field width in bits (0 to 32)
        num_bits: u32,
    },
    /// Elias-gamma style code: a zero run announcing the bit length,
    /// then the value in binary.
    Gamma {
        /// Subtracted before encoding, re-added after decoding
        offset: i32,
    },
    /// Golomb code with arbitrary positive divisor `m`: unary quotient,
    /// truncated-binary remainder.
    Golomb {
        /// Subtracted before encoding, re-added after decoding
        offset: i32,
        /// Divisor; must be positive
        m: i32,
    },
    /// Golomb code specialized to `m = 2^k`: the remainder becomes a
    /// plain `k`-bit field.
    GolombRice {
        /// Subtracted before encoding, re-added after decoding
        offset: i32,
        /// Log2 of the divisor (0 to 31)
        k: u32,
    },
    /// Hybrid of Golomb-Rice and Elias-gamma for widely varying
    /// dynamic range: values below `2^k` cost `k + 1` bits, larger
    /// values grow logarithmically.
    SubExponential {
        /// Subtracted before encoding, re-added after decoding
        offset: i32,
        /// Width of the fixed-cost region in bits (0 to 31)
        k: u32,
    },
    /// Canonical Huffman prefix code over an explicit alphabet.
    Huffman(HuffmanCodec),
}

impl Codec {
    /// Encode `value` at the stream's current bit position.
    pub fn encode(&self, value: i32, stream: &mut BitStream) -> Result<()> {
        match *self {
            Codec::Beta { offset, num_bits } => encode_beta(value, offset, num_bits, stream),
            Codec::Gamma { offset } => encode_gamma(value, offset, stream),
            Codec::Golomb { offset, m } => encode_golomb(value, offset, m, stream),
            Codec::GolombRice { offset, k } => encode_rice(value, offset, k, stream),
            Codec::SubExponential { offset, k } => encode_subexp(value, offset, k, stream),
            Codec::Huffman(ref codec) => codec.encode(value, stream),
        }
    }

    /// Decode one value from the stream's current bit position.
    pub fn decode(&self, stream: &mut BitStream) -> Result<i32> {
        match *self {
            Codec::Beta { offset, num_bits } => decode_beta(offset, num_bits, stream),
            Codec::Gamma { offset } => decode_gamma(offset, stream),
            Codec::Golomb { offset, m } => decode_golomb(offset, m, stream),
            Codec::GolombRice { offset, k } => decode_rice(offset, k, stream),
            Codec::SubExponential { offset, k } => decode_subexp(offset, k, stream),
            Codec::Huffman(ref codec) => codec.decode(stream),
        }
    }
}

/// Position of the highest set bit plus one; 0 for 0.
pub fn bit_length(value: u32) -> u32 {
    32 - value.leading_zeros()
}

/// `value - offset` in 64-bit space so the subtraction cannot overflow.
fn apply_offset(value: i32, offset: i32) -> i64 {
    i64::from(value) - i64::from(offset)
}

/// Re-add the offset and narrow back to `i32`.
///
/// A magnitude no valid encoder could have produced for this codec
/// configuration surfaces as `InvalidFormat` rather than wrapping.
fn restore_offset(shifted: u64, offset: i32) -> Result<i32> {
    let value = i128::from(shifted) + i128::from(offset);
    i32::try_from(value).map_err(|_| CrambitError::InvalidFormat {
        msg: format!("decoded value {value} does not fit a 32-bit integer"),
    })
}

fn non_negative(shifted: i64, codec: &str) -> Result<u64> {
    if shifted < 0 {
        return Err(CrambitError::OutOfRange {
            msg: format!("{codec} cannot encode negative offset value {shifted}"),
        });
    }
    Ok(shifted as u64)
}

/// Write `count` zero bits followed by a terminating one bit.
fn write_zero_run(count: u64, stream: &mut BitStream) -> Result<()> {
    for _ in 0..count {
        stream.write_bit(false)?;
    }
    stream.write_bit(true)
}

/// Count zero bits up to the terminating one bit.
fn read_zero_run(stream: &mut BitStream) -> Result<u64> {
    let mut count = 0;
    while !stream.read_bit()? {
        count += 1;
    }
    Ok(count)
}

/// Write `count` one bits followed by a terminating zero bit.
fn write_one_run(count: u32, stream: &mut BitStream) -> Result<()> {
    for _ in 0..count {
        stream.write_bit(true)?;
    }
    stream.write_bit(false)
}

/// Count one bits up to the terminating zero bit.
fn read_one_run(stream: &mut BitStream) -> Result<u32> {
    let mut count = 0;
    while stream.read_bit()? {
        count += 1;
    }
    Ok(count)
}

fn encode_beta(value: i32, offset: i32, num_bits: u32, stream: &mut BitStream) -> Result<()> {
    if num_bits > 32 {
        return Err(CrambitError::OutOfRange {
            msg: format!("beta field width {num_bits} exceeds 32 bits"),
        });
    }
    let shifted = apply_offset(value, offset);
    if shifted < 0 || shifted >= 1i64 << num_bits {
        return Err(CrambitError::OutOfRange {
            msg: format!(
                "value {value} (offset value {shifted}) does not fit {num_bits} bits, \
                 maximum is {}",
                (1i64 << num_bits) - 1
            ),
        });
    }
    stream.write_bits(shifted as u32, num_bits)
}

fn decode_beta(offset: i32, num_bits: u32, stream: &mut BitStream) -> Result<i32> {
    if num_bits > 32 {
        return Err(CrambitError::OutOfRange {
            msg: format!("beta field width {num_bits} exceeds 32 bits"),
        });
    }
    let shifted = u64::from(stream.read_bits(num_bits)?);
    restore_offset(shifted, offset)
}

fn encode_gamma(value: i32, offset: i32, stream: &mut BitStream) -> Result<()> {
    let shifted = apply_offset(value, offset);
    if shifted < 1 {
        return Err(CrambitError::OutOfRange {
            msg: format!("gamma requires an offset value of at least 1, got {shifted}"),
        });
    }
    let shifted = shifted as u32;
    let n = bit_length(shifted);
    stream.write_bits(0, n)?;
    stream.write_bits(shifted, n)
}

fn decode_gamma(offset: i32, stream: &mut BitStream) -> Result<i32> {
    // The terminating one bit of the zero run doubles as the value's
    // most significant bit.
    let zeros = read_zero_run(stream)?;
    if zeros == 0 {
        return Err(CrambitError::InvalidFormat {
            msg: "gamma codeword starts with a one bit".to_string(),
        });
    }
    if zeros > 32 {
        return Err(CrambitError::InvalidFormat {
            msg: format!("gamma codeword announces {zeros} bits, maximum is 32"),
        });
    }
    let suffix_bits = (zeros - 1) as u32;
    let suffix = u64::from(stream.read_bits(suffix_bits)?);
    restore_offset((1u64 << suffix_bits) | suffix, offset)
}

/// `ceil(log2 m)` for `m >= 1`.
fn ceil_log2(m: u64) -> u32 {
    if m <= 1 {
        0
    } else {
        64 - (m - 1).leading_zeros()
    }
}

fn encode_golomb(value: i32, offset: i32, m: i32, stream: &mut BitStream) -> Result<()> {
    if m < 1 {
        return Err(CrambitError::OutOfRange {
            msg: format!("golomb divisor must be positive, got {m}"),
        });
    }
    let m = m as u64;
    let shifted = non_negative(apply_offset(value, offset), "golomb")?;
    let quotient = shifted / m;
    let remainder = shifted % m;

    write_zero_run(quotient, stream)?;

    let b = ceil_log2(m);
    if b == 0 {
        return Ok(());
    }
    // Truncated binary: the first `cutoff` remainders fit one bit short.
    let cutoff = (1u64 << b) - m;
    if remainder < cutoff {
        stream.write_bits(remainder as u32, b - 1)
    } else {
        stream.write_bits((remainder + cutoff) as u32, b)
    }
}

fn decode_golomb(offset: i32, m: i32, stream: &mut BitStream) -> Result<i32> {
    if m < 1 {
        return Err(CrambitError::OutOfRange {
            msg: format!("golomb divisor must be positive, got {m}"),
        });
    }
    let m = m as u64;
    let quotient = read_zero_run(stream)?;

    let b = ceil_log2(m);
    let remainder = if b == 0 {
        0
    } else {
        let cutoff = (1u64 << b) - m;
        let head = u64::from(stream.read_bits(b - 1)?);
        if head < cutoff {
            head
        } else {
            let tail = u64::from(stream.read_bit()?);
            head * 2 + tail - cutoff
        }
    };
    let shifted = quotient
        .checked_mul(m)
        .and_then(|q| q.checked_add(remainder))
        .ok_or_else(|| CrambitError::InvalidFormat {
            msg: format!("golomb quotient {quotient} overflows the value range"),
        })?;
    restore_offset(shifted, offset)
}

fn encode_rice(value: i32, offset: i32, k: u32, stream: &mut BitStream) -> Result<()> {
    if k > 31 {
        return Err(CrambitError::OutOfRange {
            msg: format!("golomb-rice shift {k} exceeds 31"),
        });
    }
    let shifted = non_negative(apply_offset(value, offset), "golomb-rice")?;
    write_zero_run(shifted >> k, stream)?;
    stream.write_bits((shifted & ((1u64 << k) - 1)) as u32, k)
}

fn decode_rice(offset: i32, k: u32, stream: &mut BitStream) -> Result<i32> {
    if k > 31 {
        return Err(CrambitError::OutOfRange {
            msg: format!("golomb-rice shift {k} exceeds 31"),
        });
    }
    let quotient = read_zero_run(stream)?;
    let remainder = u64::from(stream.read_bits(k)?);
    let shifted = quotient
        .checked_mul(1u64 << k)
        .and_then(|q| q.checked_add(remainder))
        .ok_or_else(|| CrambitError::InvalidFormat {
            msg: format!("golomb-rice quotient {quotient} overflows the value range"),
        })?;
    restore_offset(shifted, offset)
}

fn encode_subexp(value: i32, offset: i32, k: u32, stream: &mut BitStream) -> Result<()> {
    if k > 31 {
        return Err(CrambitError::OutOfRange {
            msg: format!("sub-exponential shift {k} exceeds 31"),
        });
    }
    let shifted = non_negative(apply_offset(value, offset), "sub-exponential")?;
    // Below 2^k the codeword is a fixed k-bit field; above, the unary
    // prefix counts doublings and the leading one bit becomes implicit.
    let (prefix, field_bits) = if shifted < 1u64 << k {
        (0, k)
    } else {
        let b = 63 - shifted.leading_zeros();
        (b - k + 1, b)
    };
    write_one_run(prefix, stream)?;
    stream.write_bits((shifted & ((1u64 << field_bits) - 1)) as u32, field_bits)
}

fn decode_subexp(offset: i32, k: u32, stream: &mut BitStream) -> Result<i32> {
    if k > 31 {
        return Err(CrambitError::OutOfRange {
            msg: format!("sub-exponential shift {k} exceeds 31"),
        });
    }
    let prefix = read_one_run(stream)?;
    let shifted = if prefix == 0 {
        u64::from(stream.read_bits(k)?)
    } else {
        let field_bits = prefix + k - 1;
        if field_bits > 32 {
            return Err(CrambitError::InvalidFormat {
                msg: format!("sub-exponential codeword announces {field_bits} bits, maximum is 32"),
            });
        }
        (1u64 << field_bits) | u64::from(stream.read_bits(field_bits)?)
    };
    restore_offset(shifted, offset)
}
