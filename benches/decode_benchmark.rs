//! Criterion benchmarks for the record decode engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mbus_master::payload::decode::decode;
use mbus_master::mbus::telegram::Telegram;

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.bench_function("integer_4_bytes", |b| {
        let data = [0x2C, 0x01, 0x00, 0x00];
        b.iter(|| decode(black_box(0x04), black_box(0x13), black_box(&data)))
    });

    group.bench_function("integer_8_bytes_negative", |b| {
        let data = [0xFF; 8];
        b.iter(|| decode(black_box(0x07), black_box(0x13), black_box(&data)))
    });

    group.bench_function("bcd_8_digits", |b| {
        let data = [0x78, 0x56, 0x34, 0x12];
        b.iter(|| decode(black_box(0x0C), black_box(0x13), black_box(&data)))
    });

    group.bench_function("cp48_date_time", |b| {
        let data = [0x2D, 0x1E, 0x0C, 0x7B, 0x2B, 0x00];
        b.iter(|| decode(black_box(0x06), black_box(0x6D), black_box(&data)))
    });

    group.finish();
}

fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing");

    group.bench_function("short_telegram", |b| {
        b.iter(|| Telegram::short(black_box(0x7B), black_box(0x02)))
    });

    group.bench_function("long_telegram_64_bytes", |b| {
        let payload = [0xAA; 64];
        b.iter(|| Telegram::long(black_box(0x73), black_box(0x02), black_box(0x51), black_box(&payload)))
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_framing);
criterion_main!(benches);
