// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `conv-gemm bench` command: time every requested algorithm on the
//! same shape and print a comparison table.

use crate::ShapeArgs;
use conv_gemm::{convolve, Algorithm, BlockParams, RunMetrics};
use conv_tensor::Tensor;

pub fn execute(shape: ShapeArgs, algorithms: String) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            conv-gemm · Benchmark Suite              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let dims = shape.to_dims()?;

    // Parse comma-separated algorithm names.
    let algs: Vec<Algorithm> = algorithms
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<Result<Vec<_>, _>>()?;

    println!("  Shape: {dims}");
    println!();

    let x = Tensor::synthetic_input(&dims);
    let f = Tensor::synthetic_filter(&dims);
    let params = BlockParams::default();

    // ── Results Table ──────────────────────────────────────────
    println!(
        "  {:<10} {:>12} {:>12}",
        "Algorithm", "Latency", "GFLOP/s",
    );
    println!("  {}", "-".repeat(38));

    let mut results: Vec<RunMetrics> = Vec::new();

    for &alg in &algs {
        // Warm up once, then take the timed run.
        let _ = convolve(&x, &f, &dims, alg, &params)?;
        let out = convolve(&x, &f, &dims, alg, &params)?;

        println!(
            "  {:<10} {:>10.3}ms {:>12.2}",
            alg.to_string(),
            out.metrics.elapsed.as_secs_f64() * 1000.0,
            out.metrics.gflops(),
        );
        results.push(out.metrics);
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    if let Some(fastest) = results.iter().min_by_key(|m| m.elapsed) {
        println!(
            "  Fastest: {} ({:.3}ms)",
            fastest.algorithm,
            fastest.elapsed.as_secs_f64() * 1000.0,
        );
    }
    println!();

    Ok(())
}
