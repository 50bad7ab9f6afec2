//! Criterion micro-benchmarks: direct core calls versus the same work
//! through the C ABI.

use std::ffi::{c_char, CString};
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use polyglot_bench::{int_array, text_of_len};
use polyglot_core::OverflowPolicy;
use polyglot_ffi::{
    pg_factorial, pg_free_string, pg_reverse_string, pg_string_handle_release,
    pg_string_reverse_into_handle, pg_sum_array, PgOverflowPolicy,
};

const REJECT: i32 = PgOverflowPolicy::Reject as i32;

/// Benchmark: factorial(20), direct vs boundary.
fn bench_factorial(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorial_20");
    group.bench_function("direct", |b| {
        b.iter(|| polyglot_core::factorial(black_box(20), OverflowPolicy::Reject))
    });
    group.bench_function("boundary", |b| {
        b.iter(|| {
            let mut out = 0u64;
            let s = pg_factorial(black_box(20), REJECT, &mut out);
            black_box((s, out))
        })
    });
    group.finish();
}

/// Benchmark: sum over arrays of increasing size, direct vs boundary.
fn bench_sum_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_array");
    for len in [16usize, 1_024, 65_536] {
        let items = int_array(len);
        group.bench_with_input(BenchmarkId::new("direct", len), &items, |b, items| {
            b.iter(|| polyglot_core::sum_array(black_box(items), OverflowPolicy::Reject))
        });
        group.bench_with_input(BenchmarkId::new("boundary", len), &items, |b, items| {
            b.iter(|| {
                let mut out = 0i32;
                let s = pg_sum_array(black_box(items.as_ptr()), items.len(), REJECT, &mut out);
                black_box((s, out))
            })
        });
    }
    group.finish();
}

/// Benchmark: reverse + release through the raw pointer and handle APIs.
fn bench_reverse(c: &mut Criterion) {
    let text = CString::new(text_of_len(64)).unwrap();
    let plain = text.to_str().unwrap().to_owned();

    let mut group = c.benchmark_group("reverse_64");
    group.bench_function("direct", |b| {
        b.iter(|| polyglot_core::reverse_string(black_box(&plain)))
    });
    group.bench_function("raw_pointer", |b| {
        b.iter(|| {
            let mut out: *mut c_char = std::ptr::null_mut();
            let s = pg_reverse_string(black_box(text.as_ptr()), &mut out);
            black_box(s);
            pg_free_string(out)
        })
    });
    group.bench_function("handle", |b| {
        b.iter(|| {
            let mut h = 0u64;
            let s = pg_string_reverse_into_handle(black_box(text.as_ptr()), &mut h);
            black_box(s);
            pg_string_handle_release(h)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_factorial, bench_sum_array, bench_reverse);
criterion_main!(benches);
