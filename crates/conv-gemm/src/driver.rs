// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The blocked multiply driver.
//!
//! Partitions the convolution's GEMM view — M = K filters,
//! N = P·Q·N output columns, depth = C·R·S — into cache-sized blocks
//! and orchestrates the packing engine and the micro-kernel:
//!
//! ```text
//! for jc in 0..N step NC          (B columns, outermost reuse level)
//!   for pc in 0..depth step KC    (reduction blocking)
//!     pack_input_tile  → b_pack   (kc × nc slice of the virtual matrix)
//!     for ic in 0..M step MC      (A rows)
//!       pack_filter    → a_pack   (mc × kc block of the filter matrix)
//!       for jr in 0..nc step NR   (register tiles)
//!         for ir in 0..mc step MR
//!           microkernel(mr × nr)
//! ```
//!
//! Every level tolerates a partial final block. Packed scratch buffers
//! are allocated once per call and overwritten each block iteration.

use crate::microkernel::microkernel;
use crate::packing::{pack_filter, pack_input_tile};
use crate::ConvError;
use conv_tensor::ConvDims;

/// Cache and register blocking parameters for the blocked multiply.
///
/// MC/NC/KC size the cache-level blocks of the M, N, and reduction
/// dimensions; MR/NR size the register tiles the micro-kernel works
/// on. These are performance tunables only — any sizes accepted by
/// [`BlockParams::validate`] produce the same result up to
/// floating-point summation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlockParams {
    /// A-block rows (L2-sized).
    pub mc: usize,
    /// B-block columns (L3-sized).
    pub nc: usize,
    /// Reduction depth per block.
    pub kc: usize,
    /// Micro-kernel rows.
    pub mr: usize,
    /// Micro-kernel columns.
    pub nr: usize,
}

impl BlockParams {
    /// Checks the blocking invariants.
    ///
    /// # Errors
    /// Returns [`ConvError::InvalidBlockParams`] when any size is zero,
    /// or a register tile exceeds its cache block.
    pub fn validate(&self) -> Result<(), ConvError> {
        if self.mc == 0 || self.nc == 0 || self.kc == 0 || self.mr == 0 || self.nr == 0 {
            return Err(ConvError::InvalidBlockParams(format!(
                "all block sizes must be positive, got {self:?}"
            )));
        }
        if self.mr > self.mc {
            return Err(ConvError::InvalidBlockParams(format!(
                "mr ({}) must not exceed mc ({})",
                self.mr, self.mc
            )));
        }
        if self.nr > self.nc {
            return Err(ConvError::InvalidBlockParams(format!(
                "nr ({}) must not exceed nc ({})",
                self.nr, self.nc
            )));
        }
        Ok(())
    }
}

/// Defaults sized for typical L1/L2/L3 capacities.
impl Default for BlockParams {
    fn default() -> Self {
        Self {
            mc: 96,
            nc: 6144,
            kc: 512,
            mr: 8,
            nr: 12,
        }
    }
}

/// Runs the blocked, implicit-im2col multiply.
///
/// `output` is the GEMM result in row-major `M × N` layout — rows are
/// filters, columns are `(image, out_row, out_col)` in that nesting —
/// and must be zeroed before the first call. Partial products over the
/// reduction dimension accumulate read-modify-write into it; the
/// reduction (`pc`) loop traverses ascending and completes every chunk
/// for a `(jc, ic)` region before moving on, which fixes the summation
/// order.
///
/// Callers validate `params` and buffer lengths; see
/// [`convolve`](crate::convolve).
pub fn convolve_packed(
    output: &mut [f32],
    input: &[f32],
    filter: &[f32],
    dims: &ConvDims,
    params: &BlockParams,
) {
    let m = dims.gemm_m();
    let n = dims.gemm_n();
    let depth = dims.gemm_k();

    let lda = depth;
    let ldc = n;

    // Scratch tiles, reused across all block iterations.
    let mut a_pack = vec![0.0f32; params.mc.min(m) * params.kc.min(depth)];
    let mut b_pack = vec![0.0f32; params.kc.min(depth) * params.nc.min(n)];

    for jc in (0..n).step_by(params.nc) {
        let nc = params.nc.min(n - jc);

        for pc in (0..depth).step_by(params.kc) {
            let kc = params.kc.min(depth - pc);

            pack_input_tile(&mut b_pack[..kc * nc], input, dims, pc, kc, jc, nc);

            for ic in (0..m).step_by(params.mc) {
                let mc = params.mc.min(m - ic);

                pack_filter(&mut a_pack[..mc * kc], filter, lda, ic, pc, mc, kc);

                for jr in (0..nc).step_by(params.nr) {
                    let nr = params.nr.min(nc - jr);

                    for ir in (0..mc).step_by(params.mr) {
                        let mr = params.mr.min(mc - ir);

                        let c0 = (ic + ir) * ldc + jc + jr;
                        microkernel(
                            &mut output[c0..],
                            &a_pack[ir * kc..],
                            &b_pack[jr..],
                            mr,
                            nr,
                            kc,
                            nc,
                            ldc,
                        );
                    }
                }
            }
        }

        tracing::debug!(
            "packed block jc={jc} nc={nc}: {} reduction chunks, {} row blocks",
            depth.div_ceil(params.kc),
            m.div_ceil(params.mc),
        );
    }
}

/// Reorders the GEMM result into the `[n][k][p][q]` output tensor.
///
/// The multiply produces rows per filter and columns per
/// `(image, out_row, out_col)`, i.e. a `[k][n][p][q]` layout; the
/// convolution contract wants the batch outermost. Each `(k, n)` pair
/// moves one contiguous `p·q` slab.
pub fn fold_gemm_output(dst: &mut [f32], gemm_out: &[f32], dims: &ConvDims) {
    let pq = dims.p() * dims.q();
    let (n, k) = (dims.n(), dims.k());

    for kf in 0..k {
        for img in 0..n {
            let src = &gemm_out[(kf * n + img) * pq..][..pq];
            dst[(img * k + kf) * pq..][..pq].copy_from_slice(src);
        }
    }
}
