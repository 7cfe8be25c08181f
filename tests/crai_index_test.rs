//! Load .crai index files through the full gzip file path.

use crambit::{CraiIndex, CrambitError};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

fn write_gzipped_index(dir: &tempfile::TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();
    path
}

#[test]
fn loads_gzipped_index_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gzipped_index(
        &dir,
        "test.cram.crai",
        "0\t1\t10000\t377\t281\t5619\n\
         0\t10001\t9800\t6277\t281\t4231\n\
         1\t1\t15000\t10789\t281\t7143\n\
         -1\t0\t0\t18213\t281\t902\n",
    );

    let index = CraiIndex::from_path(&path).unwrap();

    assert_eq!(index.len(), 4);
    assert_eq!(index.entries_for_reference(0).len(), 2);
    assert_eq!(index.entries_for_reference(1).len(), 1);
    assert_eq!(index.entries_for_reference(-1).len(), 1);
    assert!(index.entries_for_reference(99).is_empty());

    // Entries keep file order within their reference sequence.
    let starts: Vec<i32> = index
        .entries_for_reference(0)
        .iter()
        .map(|e| e.alignment_start)
        .collect();
    assert_eq!(starts, vec![1, 10001]);

    let total: usize = index
        .reference_sequence_ids()
        .map(|id| index.entries_for_reference(id).len())
        .sum();
    assert_eq!(total, index.iter().count());
}

#[test]
fn malformed_line_fails_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gzipped_index(
        &dir,
        "broken.cram.crai",
        "0\t1\t10000\t377\t281\t5619\n\
         0\tnot-a-number\t9800\t6277\t281\t4231\n",
    );

    let err = CraiIndex::from_path(&path).unwrap_err();
    match err {
        CrambitError::InvalidIndexFormat { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CraiIndex::from_path(dir.path().join("absent.crai")).unwrap_err();
    assert!(matches!(err, CrambitError::Io(_)));
}

#[test]
fn non_gzip_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.crai");
    std::fs::write(&path, "0\t1\t10000\t377\t281\t5619\n").unwrap();

    assert!(CraiIndex::from_path(&path).is_err());
}
