//! Benchmarks for pxl hot loops.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use pxl_color::{apply_color_transform, ColorTransform, ToneCurve};
use pxl_convert::{packed_to_rgba8, rgba8_to_packed, row_kernels, scalar_kernels, u8_to_f16};
use pxl_core::{f16, PixelBuffer};
use pxl_math::{simd, Mat3};
use pxl_resample::{resample, ResamplingKernel};
use pxl_transfer::TransferFunction;

fn gradient(width: usize, height: usize) -> PixelBuffer<u8> {
    let mut buf = PixelBuffer::<u8>::new(width, height, 4).unwrap();
    for y in 0..height {
        for (x, px) in buf.row_mut(y).chunks_exact_mut(4).enumerate() {
            px.copy_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    buf
}

/// Benchmark resampling kernels on a 1080p frame.
fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    group.sample_size(10);

    let src = gradient(1920, 1080);
    group.throughput(Throughput::Elements((1280 * 720) as u64));

    for kernel in [
        ResamplingKernel::Nearest,
        ResamplingKernel::Bilinear,
        ResamplingKernel::CatmullRom,
        ResamplingKernel::Lanczos,
    ] {
        group.bench_with_input(BenchmarkId::new("1080p_to_720p", kernel), &src, |b, s| {
            b.iter(|| resample(black_box(s), 1280, 720, kernel).unwrap())
        });
    }

    group.finish();
}

/// Benchmark pixel-format conversion.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for size in [256usize, 1024] {
        let src = gradient(size, size);
        let packed = rgba8_to_packed(&src).unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("u8_to_f16", size), &src, |b, s| {
            b.iter(|| u8_to_f16(black_box(s)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("rgba8_to_packed", size), &src, |b, s| {
            b.iter(|| rgba8_to_packed(black_box(s)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("packed_to_rgba8_premul", size), &packed, |b, p| {
            b.iter(|| packed_to_rgba8(black_box(p), true).unwrap())
        });
    }

    group.finish();
}

/// Benchmark vectorized row kernels against their scalar twins.
fn bench_simd(c: &mut Criterion) {
    let mut group = c.benchmark_group("simd");

    let bytes: Vec<u8> = (0..4096 * 4).map(|i| (i % 256) as u8).collect();
    let mut halves = vec![f16::ZERO; bytes.len()];
    group.throughput(Throughput::Elements(bytes.len() as u64));

    for kernels in [row_kernels(), scalar_kernels()] {
        group.bench_function(BenchmarkId::new("u8_to_f16_row", kernels.name()), |b| {
            b.iter(|| kernels.u8_to_f16(black_box(&bytes), 1.0 / 255.0, &mut halves))
        });
    }

    let m = Mat3::from_rows([0.627, 0.329, 0.043], [0.069, 0.920, 0.011], [0.016, 0.088, 0.896]);
    let mut rgb: Vec<f32> = (0..4096 * 3).map(|i| (i % 100) as f32 / 100.0).collect();
    group.bench_function("transform_rgb_row", |b| {
        b.iter(|| simd::transform_rgb_row(black_box(&m), &mut rgb))
    });
    group.bench_function("transform_rgb_row_scalar", |b| {
        b.iter(|| simd::transform_rgb_row_scalar(black_box(&m), &mut rgb))
    });

    group.finish();
}

/// Benchmark the color pipeline with and without tone mapping.
fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");
    group.sample_size(20);

    let src = gradient(1024, 1024);
    group.throughput(Throughput::Elements((1024 * 1024) as u64));

    let plain = ColorTransform::default();
    let hdr = ColorTransform::default()
        .with_transfers(TransferFunction::Pq, TransferFunction::Srgb)
        .with_tone_curve(ToneCurve::rec2408(true));

    for (name, transform) in [("srgb_identity", plain), ("pq_rec2408", hdr)] {
        group.bench_function(name, |b| {
            b.iter_batched_ref(
                || src.clone(),
                |buf| apply_color_transform(buf, black_box(&transform)).unwrap(),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resample, bench_convert, bench_simd, bench_color);

criterion_main!(benches);
