//! Benchmarks for the bit-level codec family.
//!
//! Codecs sit on the hot path of slice decoding: one codeword per data
//! series per record. These benchmarks track encode and decode
//! throughput per variant over a realistic value distribution.
//!
//! Run with: cargo bench --bench codec_roundtrip

use crambit::{BitStream, Codec, HuffmanCodec};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::SeekFrom;

/// Alignment-position-like values: mostly small deltas, occasional
/// large jumps.
fn generate_values(len: usize) -> Vec<i32> {
    (0..len)
        .map(|i| match i % 16 {
            0 => (i as i32) * 997 % 100_000,
            1..=4 => (i as i32) % 3,
            _ => (i as i32) % 128,
        })
        .collect()
}

fn variants(values: &[i32]) -> Vec<(&'static str, Codec)> {
    vec![
        (
            "beta",
            Codec::Beta {
                offset: 0,
                num_bits: 17,
            },
        ),
        ("gamma", Codec::Gamma { offset: -1 }),
        ("golomb", Codec::Golomb { offset: 0, m: 10 }),
        ("rice", Codec::GolombRice { offset: 0, k: 4 }),
        ("subexp", Codec::SubExponential { offset: 0, k: 2 }),
        (
            "huffman",
            Codec::Huffman(HuffmanCodec::from_samples(values).expect("non-empty sample")),
        ),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let values = generate_values(10_000);
    let mut group = c.benchmark_group("encode");

    for (name, codec) in variants(&values) {
        group.bench_with_input(BenchmarkId::from_parameter(name), &codec, |b, codec| {
            b.iter(|| {
                let mut stream = BitStream::new();
                for &value in &values {
                    codec.encode(black_box(value), &mut stream).unwrap();
                }
                stream
            })
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let values = generate_values(10_000);
    let mut group = c.benchmark_group("decode");

    for (name, codec) in variants(&values) {
        let mut stream = BitStream::new();
        for &value in &values {
            codec.encode(value, &mut stream).unwrap();
        }
        let encoded = stream.into_bytes();

        group.bench_with_input(BenchmarkId::from_parameter(name), &codec, |b, codec| {
            b.iter(|| {
                let mut stream = BitStream::from_bytes(encoded.clone());
                stream.seek_bits(SeekFrom::Start(0)).unwrap();
                let mut sum = 0i64;
                for _ in 0..values.len() {
                    sum += i64::from(codec.decode(&mut stream).unwrap());
                }
                sum
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
