// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `conv-gemm run` command: execute one convolution, optionally
//! verifying against the direct reference.

use crate::ShapeArgs;
use conv_gemm::{compare, convolve, Algorithm, BlockParams, RunConfig};
use conv_tensor::{ConvDims, Tensor};
use std::path::PathBuf;

pub fn execute(
    config: Option<PathBuf>,
    shape: ShapeArgs,
    algorithm: String,
    check: bool,
    block: BlockParams,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            conv-gemm · Convolution Runner           ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Configuration ──────────────────────────────────────────
    // A TOML file, when given, wins over the shape flags.
    let (dims, algorithm, params, check) = match config {
        Some(path) => {
            let cfg = RunConfig::from_file(&path)?;
            (
                cfg.to_dims()?,
                cfg.parse_algorithm()?,
                cfg.to_params(),
                cfg.check,
            )
        }
        None => {
            let alg: Algorithm = algorithm.parse()?;
            (shape.to_dims()?, alg, block, check)
        }
    };

    tracing::debug!("resolved config: {dims}, algorithm={algorithm}, check={check}");

    println!("  Config:");
    println!("   Shape:     {dims}");
    println!("   Algorithm: {algorithm}");
    if algorithm == Algorithm::Packed {
        println!(
            "   Blocks:    MC={} NC={} KC={} MR={} NR={}",
            params.mc, params.nc, params.kc, params.mr, params.nr,
        );
    }
    println!();

    // ── Compute ────────────────────────────────────────────────
    println!("  [1/2] Running {algorithm} convolution...");
    let x = Tensor::synthetic_input(&dims);
    let f = Tensor::synthetic_filter(&dims);
    let result = convolve(&x, &f, &dims, algorithm, &params)?;

    println!("        {}", result.metrics.summary());
    println!();

    // ── Verification ───────────────────────────────────────────
    if check && algorithm != Algorithm::Direct {
        println!("  [2/2] Verifying against the direct reference...");
        verify(&dims, &x, &f, &result.output, &params)?;
    } else {
        println!("  [2/2] Verification skipped.");
    }
    println!();

    Ok(())
}

fn verify(
    dims: &ConvDims,
    x: &Tensor,
    f: &Tensor,
    actual: &Tensor,
    params: &BlockParams,
) -> anyhow::Result<()> {
    let reference = convolve(x, f, dims, Algorithm::Direct, params)?;
    let report = compare(
        reference.output.as_slice(),
        actual.as_slice(),
        dims,
        f32::EPSILON,
    );

    println!("        {report}");
    if !report.passed() {
        anyhow::bail!("verification failed: {} mismatches", report.total_mismatches);
    }
    Ok(())
}
