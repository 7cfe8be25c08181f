//! Canonical Huffman coding for CRAM data series
//!
//! CRAM stores a Huffman alphabet as a bare (symbol, code length) list;
//! the actual codewords are canonical, i.e. fully determined by that
//! list independent of whichever tree produced the lengths. This module
//! implements the table ([`HuffmanCodec`]) and the offline code
//! computer that derives code lengths from a sample of observed
//! symbols.
//!
//! # Canonical Assignment
//!
//! Symbols are sorted by (code length ascending, symbol ascending). The
//! first symbol takes the all-zeros code at its length; each subsequent
//! symbol takes `(previous + 1) << (length - previous length)`.
//!
//! With the table `{A:1, B:3, C:3, D:3, E:4, F:4}`:
//!
//! ```text
//! A    0
//! B    100
//! C    101
//! D    110
//! E    1110
//! F    1111
//! ```
//!
//! # Example
//!
//! ```
//! use crambit::{BitStream, HuffmanCodec};
//! use std::io::SeekFrom;
//!
//! # fn main() -> crambit::Result<()> {
//! let codec = HuffmanCodec::from_byte_samples(b"AACGTACGAA")?;
//! let mut stream = BitStream::new();
//! for &base in b"ACGT" {
//!     codec.encode_byte(base, &mut stream)?;
//! }
//! stream.seek_bits(SeekFrom::Start(0))?;
//! assert_eq!(codec.decode_byte(&mut stream)?, b'A');
//! # Ok(())
//! # }
//! ```

use crate::bitstream::BitStream;
use crate::error::{CrambitError, Result};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// One (symbol, code length) pair of a Huffman alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanSymbol {
    /// Symbol value
    pub symbol: i32,
    /// Assigned code length in bits
    pub code_length: u32,
}

impl HuffmanSymbol {
    /// Create a (symbol, code length) pair.
    pub fn new(symbol: i32, code_length: u32) -> Self {
        Self {
            symbol,
            code_length,
        }
    }
}

/// A canonical Huffman codec over an explicit alphabet.
///
/// Both the integer and the byte flavor walk the same canonical table,
/// so they agree bit for bit on identical (symbol, length) lists.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    symbols: Vec<HuffmanSymbol>,
    /// symbol -> (codeword, length)
    encode_map: HashMap<i32, (u32, u32)>,
    /// (codeword, length) -> symbol; keyed on the pair so equal code
    /// values at different lengths cannot collide
    decode_map: HashMap<(u32, u32), i32>,
    max_code_length: u32,
}

impl HuffmanCodec {
    /// Build a codec from a (symbol, code length) table.
    ///
    /// The table must be non-empty, free of duplicate symbols, with
    /// lengths of at most 32 bits satisfying the Kraft inequality;
    /// violations are [`CrambitError::InvalidFormat`]. A single-symbol
    /// table gets code length 0: encoding emits no bits and decoding
    /// consumes none.
    pub fn new(symbols: Vec<HuffmanSymbol>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(CrambitError::InvalidFormat {
                msg: "huffman alphabet is empty".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::with_capacity(symbols.len());
        for entry in &symbols {
            if !seen.insert(entry.symbol) {
                return Err(CrambitError::InvalidFormat {
                    msg: format!("duplicate symbol {} in huffman alphabet", entry.symbol),
                });
            }
        }

        let mut ordered = symbols.clone();
        if ordered.len() == 1 {
            ordered[0].code_length = 0;
        }
        ordered.sort_by_key(|s| (s.code_length, s.symbol));

        if ordered.len() > 1 {
            let mut kraft_sum = 0u64;
            for entry in &ordered {
                if entry.code_length == 0 || entry.code_length > 32 {
                    return Err(CrambitError::InvalidFormat {
                        msg: format!(
                            "code length {} for symbol {} is outside 1..=32",
                            entry.code_length, entry.symbol
                        ),
                    });
                }
                kraft_sum += 1u64 << (32 - entry.code_length);
            }
            if kraft_sum > 1u64 << 32 {
                return Err(CrambitError::InvalidFormat {
                    msg: "huffman code lengths violate the Kraft inequality".to_string(),
                });
            }
        }

        let mut encode_map = HashMap::with_capacity(ordered.len());
        let mut decode_map = HashMap::with_capacity(ordered.len());
        let mut code = 0u32;
        let mut previous_length = ordered[0].code_length;
        for (index, entry) in ordered.iter().enumerate() {
            if index > 0 {
                code = (code + 1) << (entry.code_length - previous_length);
                previous_length = entry.code_length;
            }
            encode_map.insert(entry.symbol, (code, entry.code_length));
            decode_map.insert((code, entry.code_length), entry.symbol);
        }
        let max_code_length = previous_length;

        Ok(Self {
            symbols: ordered,
            encode_map,
            decode_map,
            max_code_length,
        })
    }

    /// Derive a codec from a sample of observed integer symbols.
    ///
    /// Frequencies are counted in first-appearance order; the tree is
    /// built by repeatedly merging the two lowest-frequency nodes, with
    /// ties broken by node creation order so the construction is
    /// deterministic. An empty sample is
    /// [`CrambitError::InvalidInput`].
    pub fn from_samples(values: &[i32]) -> Result<Self> {
        if values.is_empty() {
            return Err(CrambitError::InvalidInput {
                msg: "cannot derive a huffman code from an empty sample".to_string(),
            });
        }
        let mut counts: HashMap<i32, u64> = HashMap::new();
        let mut first_seen: Vec<i32> = Vec::new();
        for &value in values {
            let count = counts.entry(value).or_insert(0);
            if *count == 0 {
                first_seen.push(value);
            }
            *count += 1;
        }

        let lengths = compute_code_lengths(&first_seen, &counts);
        let table = first_seen
            .iter()
            .map(|symbol| HuffmanSymbol::new(*symbol, lengths[symbol]))
            .collect();
        Self::new(table)
    }

    /// Derive a codec from a sample of observed byte symbols.
    pub fn from_byte_samples(values: &[u8]) -> Result<Self> {
        let widened: Vec<i32> = values.iter().map(|&b| i32::from(b)).collect();
        Self::from_samples(&widened)
    }

    /// The (symbol, code length) table, sorted in canonical order.
    pub fn symbols(&self) -> &[HuffmanSymbol] {
        &self.symbols
    }

    /// Longest codeword length in the table.
    pub fn max_code_length(&self) -> u32 {
        self.max_code_length
    }

    /// Write the canonical codeword for `symbol`, MSB first.
    ///
    /// A symbol absent from the alphabet is
    /// [`CrambitError::OutOfRange`].
    pub fn encode(&self, symbol: i32, stream: &mut BitStream) -> Result<()> {
        let (code, length) =
            self.encode_map
                .get(&symbol)
                .copied()
                .ok_or_else(|| CrambitError::OutOfRange {
                    msg: format!("symbol {symbol} is not in the huffman alphabet"),
                })?;
        stream.write_bits(code, length)
    }

    /// Read bits until the running (code, length) pair matches a table
    /// entry and return the matched symbol.
    ///
    /// Exhausting the stream, or passing the table's maximum code
    /// length, without a match is [`CrambitError::InvalidFormat`].
    pub fn decode(&self, stream: &mut BitStream) -> Result<i32> {
        let mut code = 0u32;
        let mut length = 0u32;
        loop {
            if let Some(&symbol) = self.decode_map.get(&(code, length)) {
                return Ok(symbol);
            }
            if length >= self.max_code_length {
                return Err(CrambitError::InvalidFormat {
                    msg: format!(
                        "no huffman codeword match within {} bits",
                        self.max_code_length
                    ),
                });
            }
            let bit = match stream.read_bit() {
                Ok(bit) => bit,
                Err(CrambitError::EndOfStream) => {
                    return Err(CrambitError::InvalidFormat {
                        msg: "bit stream exhausted without a huffman codeword match".to_string(),
                    })
                }
                Err(other) => return Err(other),
            };
            code = (code << 1) | u32::from(bit);
            length += 1;
        }
    }

    /// Byte flavor of [`encode`](Self::encode).
    pub fn encode_byte(&self, symbol: u8, stream: &mut BitStream) -> Result<()> {
        self.encode(i32::from(symbol), stream)
    }

    /// Byte flavor of [`decode`](Self::decode).
    pub fn decode_byte(&self, stream: &mut BitStream) -> Result<u8> {
        let symbol = self.decode(stream)?;
        u8::try_from(symbol).map_err(|_| CrambitError::InvalidFormat {
            msg: format!("decoded huffman symbol {symbol} is not a byte"),
        })
    }
}

#[derive(Debug)]
struct TreeNode {
    symbol: Option<i32>,
    children: Option<(usize, usize)>,
}

/// Standard Huffman construction: leaf per symbol, then repeatedly
/// merge the two lowest-frequency nodes. The heap key includes the
/// node creation sequence so equal frequencies resolve deterministically
/// (earlier-created nodes are considered smaller).
fn compute_code_lengths(order: &[i32], counts: &HashMap<i32, u64>) -> HashMap<i32, u32> {
    let mut nodes: Vec<TreeNode> = Vec::with_capacity(order.len() * 2);
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::with_capacity(order.len());

    for &symbol in order {
        nodes.push(TreeNode {
            symbol: Some(symbol),
            children: None,
        });
        heap.push(Reverse((counts[&symbol], nodes.len() - 1)));
    }

    while heap.len() > 1 {
        let Reverse((low_freq, low)) = heap.pop().expect("heap has two entries");
        let Reverse((high_freq, high)) = heap.pop().expect("heap has two entries");
        nodes.push(TreeNode {
            symbol: None,
            children: Some((low, high)),
        });
        heap.push(Reverse((low_freq + high_freq, nodes.len() - 1)));
    }

    let Reverse((_, root)) = heap.pop().expect("sample is non-empty");

    let mut lengths = HashMap::with_capacity(order.len());
    let mut stack = vec![(root, 0u32)];
    while let Some((index, depth)) = stack.pop() {
        match (nodes[index].symbol, nodes[index].children) {
            (Some(symbol), _) => {
                lengths.insert(symbol, depth);
            }
            (None, Some((left, right))) => {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
            (None, None) => unreachable!("internal node without children"),
        }
    }
    lengths
}
