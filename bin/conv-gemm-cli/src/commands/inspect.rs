// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `conv-gemm inspect` command: display derived dimensions, the GEMM
//! view, and the memory im2col would have materialized.

use crate::ShapeArgs;
use conv_gemm::BlockParams;

pub fn execute(shape: ShapeArgs) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            conv-gemm · Shape Inspector              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let dims = shape.to_dims()?;
    let params = BlockParams::default();

    // ── Tensors ────────────────────────────────────────────────
    println!("  Convolution: {dims}");
    println!();
    println!("  {:<22} {:>14} {:>12}", "Tensor", "Elements", "Size");
    println!("  {}", "-".repeat(50));
    println!(
        "  {:<22} {:>14} {:>12}",
        "input  [N][C][H][W]",
        dims.input_len(),
        fmt_bytes(dims.input_len() * 4),
    );
    println!(
        "  {:<22} {:>14} {:>12}",
        "filter [K][C][R][S]",
        dims.filter_len(),
        fmt_bytes(dims.filter_len() * 4),
    );
    println!(
        "  {:<22} {:>14} {:>12}",
        "output [N][K][P][Q]",
        dims.output_len(),
        fmt_bytes(dims.output_len() * 4),
    );
    println!();

    // ── GEMM View ──────────────────────────────────────────────
    println!("  GEMM view:");
    println!("   M (filters):        {}", dims.gemm_m());
    println!("   N (output columns): {}", dims.gemm_n());
    println!("   K (reduction):      {}", dims.gemm_k());
    println!("   FLOPs:              {:.3} GFLOP", dims.flops() as f64 / 1e9);
    println!();

    // ── Memory Comparison ──────────────────────────────────────
    // The packed driver holds one MCxKC A tile and one KCxNC B tile;
    // explicit im2col materializes the entire virtual matrix.
    let virt = dims.gemm_k() * dims.gemm_n() * 4;
    let a_pack = params.mc.min(dims.gemm_m()) * params.kc.min(dims.gemm_k()) * 4;
    let b_pack = params.kc.min(dims.gemm_k()) * params.nc.min(dims.gemm_n()) * 4;
    let packed = a_pack + b_pack;

    println!("  Workspace:");
    println!("   Materialized im2col matrix: {}", fmt_bytes(virt));
    println!("   Packed tile buffers:        {}", fmt_bytes(packed));
    println!(
        "   Saved:                      {} ({:.1}x smaller)",
        fmt_bytes(virt.saturating_sub(packed)),
        virt as f64 / packed as f64,
    );
    println!();

    Ok(())
}

fn fmt_bytes(bytes: usize) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= 1024.0 {
        format!("{:.1} KB", b / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
