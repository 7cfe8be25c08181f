//! CRAM index (.crai) support
//!
//! A `.crai` file is a gzip-compressed, newline-delimited text file
//! mapping reference-sequence regions to byte offsets inside the
//! companion `.cram` file, enabling a reader to seek directly to the
//! container covering a region of interest.
//!
//! # Format
//!
//! One entry per line, six tab-separated integer fields:
//!
//! ```text
//! reference sequence id
//! alignment start
//! alignment span
//! absolute container byte offset
//! slice header offset relative to the container
//! slice size in bytes
//! ```
//!
//! # Example
//!
//! ```no_run
//! use crambit::CraiIndex;
//!
//! # fn main() -> crambit::Result<()> {
//! let index = CraiIndex::from_path("alignments.cram.crai")?;
//! println!("Index covers {} slices", index.len());
//!
//! for entry in index.entries_for_reference(1) {
//!     println!(
//!         "container at byte {} covers {}..{}",
//!         entry.container_offset,
//!         entry.alignment_start,
//!         entry.alignment_start + entry.alignment_span
//!     );
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{CrambitError, Result};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One slice of one container, as described by a `.crai` line.
///
/// Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraiEntry {
    /// Reference sequence id (-1 for unmapped reads)
    pub reference_sequence_id: i32,
    /// Alignment start position on the reference (1-based)
    pub alignment_start: i32,
    /// Number of reference bases the slice covers
    pub alignment_span: i32,
    /// Absolute byte offset of the container in the `.cram` file
    pub container_offset: u64,
    /// Byte offset of the slice header relative to the container
    pub slice_offset: i32,
    /// Slice size in bytes
    pub slice_size: i32,
}

/// A loaded `.crai` index, grouped by reference sequence for fast
/// lookup.
///
/// Built once, then safe for unlimited concurrent read-only queries.
#[derive(Debug, Clone, Default)]
pub struct CraiIndex {
    entries_by_reference: HashMap<i32, Vec<CraiEntry>>,
    len: usize,
}

impl CraiIndex {
    /// Group a parsed entry list by reference sequence id, preserving
    /// insertion order within each sequence.
    pub fn new(entries: Vec<CraiEntry>) -> Self {
        let len = entries.len();
        let mut entries_by_reference: HashMap<i32, Vec<CraiEntry>> = HashMap::new();
        for entry in entries {
            entries_by_reference
                .entry(entry.reference_sequence_id)
                .or_default()
                .push(entry);
        }
        Self {
            entries_by_reference,
            len,
        }
    }

    /// Load a gzip-compressed `.crai` file.
    ///
    /// The file is decompressed fully into memory in one shot; index
    /// files scale with the number of slices per reference sequence,
    /// not with the block-level content they point into.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_gzip_reader(file)
    }

    /// Load a gzip-compressed index from any reader.
    pub fn from_gzip_reader<R: Read>(reader: R) -> Result<Self> {
        let mut text = String::new();
        GzDecoder::new(reader)
            .read_to_string(&mut text)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => CrambitError::InvalidFormat {
                    msg: format!("failed to decompress index: {e}"),
                },
                _ => CrambitError::Io(e),
            })?;
        Self::parse(&text)
    }

    /// Parse decompressed index text.
    ///
    /// Empty lines are skipped; any other line must hold exactly six
    /// tab-separated integers or the whole load fails with
    /// [`CrambitError::InvalidIndexFormat`] naming the line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (line_index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            entries.push(parse_line(line, line_index + 1)?);
        }
        Ok(Self::new(entries))
    }

    /// Entries for one reference sequence, in file order.
    ///
    /// A sequence with no entries yields an empty slice, never an
    /// error.
    pub fn entries_for_reference(&self, reference_sequence_id: i32) -> &[CraiEntry] {
        self.entries_by_reference
            .get(&reference_sequence_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every entry across all reference sequences.
    pub fn iter(&self) -> impl Iterator<Item = &CraiEntry> {
        self.entries_by_reference.values().flatten()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reference sequence ids with at least one entry.
    pub fn reference_sequence_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries_by_reference.keys().copied()
    }
}

fn parse_line(line: &str, line_number: usize) -> Result<CraiEntry> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 6 {
        return Err(CrambitError::InvalidIndexFormat {
            line: line_number,
            msg: format!("expected 6 tab-separated fields, found {}", fields.len()),
        });
    }
    Ok(CraiEntry {
        reference_sequence_id: parse_field(fields[0], "reference sequence id", line_number)?,
        alignment_start: parse_field(fields[1], "alignment start", line_number)?,
        alignment_span: parse_field(fields[2], "alignment span", line_number)?,
        container_offset: parse_field(fields[3], "container offset", line_number)?,
        slice_offset: parse_field(fields[4], "slice offset", line_number)?,
        slice_size: parse_field(fields[5], "slice size", line_number)?,
    })
}

fn parse_field<T: std::str::FromStr>(value: &str, field: &str, line_number: usize) -> Result<T> {
    value.parse().map_err(|_| CrambitError::InvalidIndexFormat {
        line: line_number,
        msg: format!("field '{field}' holds invalid integer '{value}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
0\t1\t10000\t377\t281\t5619\n\
0\t10001\t9800\t6277\t281\t4231\n\
2\t1\t20000\t10789\t281\t7143\n";

    #[test]
    fn groups_entries_by_reference_sequence() {
        let index = CraiIndex::parse(SAMPLE).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.entries_for_reference(0).len(), 2);
        assert_eq!(index.entries_for_reference(2).len(), 1);

        let entry = &index.entries_for_reference(2)[0];
        assert_eq!(entry.alignment_span, 20000);
        assert_eq!(entry.container_offset, 10789);
        assert_eq!(entry.slice_offset, 281);
        assert_eq!(entry.slice_size, 7143);
    }

    #[test]
    fn preserves_file_order_within_a_sequence() {
        let index = CraiIndex::parse(SAMPLE).unwrap();
        let starts: Vec<i32> = index
            .entries_for_reference(0)
            .iter()
            .map(|e| e.alignment_start)
            .collect();
        assert_eq!(starts, vec![1, 10001]);
    }

    #[test]
    fn absent_reference_yields_empty_slice() {
        let index = CraiIndex::parse(SAMPLE).unwrap();
        assert!(index.entries_for_reference(7).is_empty());
    }

    #[test]
    fn iter_covers_every_group() {
        let index = CraiIndex::parse(SAMPLE).unwrap();
        let grouped: usize = index
            .reference_sequence_ids()
            .map(|id| index.entries_for_reference(id).len())
            .sum();
        assert_eq!(index.iter().count(), grouped);
        assert_eq!(index.len(), grouped);
    }

    #[test]
    fn skips_empty_lines() {
        let index = CraiIndex::parse("\n0\t1\t10\t20\t30\t40\n\n").unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn unmapped_reads_use_negative_reference_id() {
        let index = CraiIndex::parse("-1\t0\t0\t999\t281\t1024\n").unwrap();
        assert_eq!(index.entries_for_reference(-1).len(), 1);
    }

    #[test]
    fn wrong_field_count_fails_the_load() {
        let err = CraiIndex::parse("0\t1\t10\t20\t30\n").unwrap_err();
        match err {
            CrambitError::InvalidIndexFormat { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unparsable_integer_fails_the_load_with_line_number() {
        let err = CraiIndex::parse("0\t1\t10\t20\t30\t40\n0\t1\tbroken\t20\t30\t40\n").unwrap_err();
        match err {
            CrambitError::InvalidIndexFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn gzip_roundtrip_through_memory() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let index = CraiIndex::from_gzip_reader(&compressed[..]).unwrap();
        assert_eq!(index.len(), 3);
    }
}
