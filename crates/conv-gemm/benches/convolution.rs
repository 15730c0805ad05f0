// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks comparing the three convolution algorithms.

use conv_gemm::{convolve, Algorithm, BlockParams};
use conv_tensor::{ConvDims, Tensor};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_algorithms(c: &mut Criterion) {
    let dims = ConvDims::default();
    let x = Tensor::synthetic_input(&dims);
    let f = Tensor::synthetic_filter(&dims);
    let params = BlockParams::default();

    let mut group = c.benchmark_group("convolution");
    for alg in [Algorithm::Direct, Algorithm::Im2col, Algorithm::Packed] {
        group.bench_with_input(BenchmarkId::from_parameter(alg), &alg, |b, &alg| {
            b.iter(|| convolve(&x, &f, &dims, alg, &params).unwrap());
        });
    }
    group.finish();
}

fn bench_block_sizes(c: &mut Criterion) {
    let dims = ConvDims::default();
    let x = Tensor::synthetic_input(&dims);
    let f = Tensor::synthetic_filter(&dims);

    let variants = [
        ("default", BlockParams::default()),
        (
            "small",
            BlockParams {
                mc: 16,
                nc: 256,
                kc: 64,
                mr: 4,
                nr: 4,
            },
        ),
    ];

    let mut group = c.benchmark_group("block_sizes");
    for (name, params) in variants {
        group.bench_function(name, |b| {
            b.iter(|| convolve(&x, &f, &dims, Algorithm::Packed, &params).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_algorithms, bench_block_sizes);
criterion_main!(benches);
