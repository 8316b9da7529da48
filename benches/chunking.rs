//! Benchmarks for tokenization and chunking.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use booksum::chunking::{BpeTokenizer, ChunkConfig, Tokenizer, chunk_text};

fn sample_text() -> String {
    "The lighthouse keeper spoke to no one for eleven winters. ".repeat(5_000)
}

fn bench_encode(c: &mut Criterion) {
    let tokenizer = BpeTokenizer::for_model("gpt-4o-mini").unwrap();
    let text = sample_text();

    c.bench_function("encode_290k_chars", |bench| {
        bench.iter(|| black_box(tokenizer.encode(&text).unwrap()))
    });
}

fn bench_chunk_forced(c: &mut Criterion) {
    let tokenizer = BpeTokenizer::for_model("gpt-4o-mini").unwrap();
    let text = sample_text();
    let config = ChunkConfig {
        chunk_size: 1_000,
        force_chunking: true,
        ..ChunkConfig::default()
    };

    c.bench_function("chunk_forced_1k_windows", |bench| {
        bench.iter(|| black_box(chunk_text(&tokenizer, &text, &config).unwrap()))
    });
}

criterion_group!(benches, bench_encode, bench_chunk_forced);
criterion_main!(benches);
