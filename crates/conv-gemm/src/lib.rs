// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # conv-gemm
//!
//! Batched 2D convolution as a matrix multiplication, without the
//! im2col memory blow-up.
//!
//! Three interchangeable algorithms compute `y[N,K,P,Q] =
//! x[N,C,H,W] * f[K,C,R,S]`:
//!
//! - [`Algorithm::Direct`] — the 7-loop reference, ground truth.
//! - [`Algorithm::Im2col`] — explicit per-image expansion matrix plus
//!   a naive GEMM; the memory-hungry classical formulation.
//! - [`Algorithm::Packed`] — BLIS-style blocked multiply that packs
//!   cache-sized tiles of the *virtual* expansion matrix on the fly;
//!   the reason this crate exists.
//!
//! # Example
//! ```
//! use conv_gemm::{convolve, Algorithm, BlockParams};
//! use conv_tensor::{ConvDims, Tensor};
//!
//! let dims = ConvDims::new(1, 1, 1, 4, 4, 2, 2, 1, 1)?;
//! let x = Tensor::synthetic_input(&dims);
//! let f = Tensor::synthetic_filter(&dims);
//!
//! let out = convolve(&x, &f, &dims, Algorithm::Packed, &BlockParams::default())?;
//! assert_eq!(out.output.len(), dims.output_len());
//! # Ok::<(), conv_gemm::ConvError>(())
//! ```

pub mod config;
mod driver;
mod error;
mod im2col;
mod metrics;
mod microkernel;
mod packing;
mod reference;
mod verify;

pub use config::RunConfig;
pub use driver::{convolve_packed, fold_gemm_output, BlockParams};
pub use error::ConvError;
pub use im2col::{convolve_im2col, im2col};
pub use metrics::RunMetrics;
pub use microkernel::microkernel;
pub use packing::{pack_filter, pack_input_tile, virtual_input_at};
pub use reference::convolve_direct;
pub use verify::{compare, Mismatch, VerifyReport, MAX_REPORTED};

use conv_tensor::{ConvDims, Tensor, TensorError};
use std::time::Instant;

/// Which convolution implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// 7-loop direct convolution.
    Direct,
    /// Explicit im2col + naive GEMM.
    Im2col,
    /// Blocked multiply with on-the-fly packing.
    Packed,
}

impl Algorithm {
    /// Stable lowercase name, used in configs and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Direct => "direct",
            Algorithm::Im2col => "im2col",
            Algorithm::Packed => "packed",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Algorithm::Direct),
            "im2col" => Ok(Algorithm::Im2col),
            "packed" | "blis" => Ok(Algorithm::Packed),
            other => Err(ConvError::Config(format!(
                "unknown algorithm '{other}'; expected 'direct', 'im2col', or 'packed'"
            ))),
        }
    }
}

/// A convolution result plus its run metrics.
#[derive(Debug, Clone)]
pub struct ConvOutput {
    /// The `[n][k][p][q]` output tensor.
    pub output: Tensor,
    /// Timing for the compute call.
    pub metrics: RunMetrics,
}

/// Runs one convolution with the chosen algorithm.
///
/// Validates buffer lengths against `dims` and, for the packed
/// algorithm, the block parameters. The output tensor is freshly
/// zero-allocated; the packed GEMM result is reordered from its
/// natural filter-major layout into `[n][k][p][q]` before returning.
///
/// # Errors
/// - [`ConvError::Tensor`] if a tensor length disagrees with `dims`.
/// - [`ConvError::InvalidBlockParams`] if `params` fails validation
///   (packed algorithm only).
pub fn convolve(
    input: &Tensor,
    filter: &Tensor,
    dims: &ConvDims,
    algorithm: Algorithm,
    params: &BlockParams,
) -> Result<ConvOutput, ConvError> {
    check_len(input.len(), dims.input_len())?;
    check_len(filter.len(), dims.filter_len())?;

    let mut output = Tensor::zeros(&[dims.n(), dims.k(), dims.p(), dims.q()]);
    let x = input.as_slice();
    let f = filter.as_slice();

    let start = Instant::now();
    match algorithm {
        Algorithm::Direct => convolve_direct(output.as_mut_slice(), x, f, dims),
        Algorithm::Im2col => convolve_im2col(output.as_mut_slice(), x, f, dims),
        Algorithm::Packed => {
            params.validate()?;
            let mut gemm_out = vec![0.0f32; dims.gemm_m() * dims.gemm_n()];
            convolve_packed(&mut gemm_out, x, f, dims, params);
            fold_gemm_output(output.as_mut_slice(), &gemm_out, dims);
        }
    }
    let elapsed = start.elapsed();

    let metrics = RunMetrics {
        algorithm,
        elapsed,
        flops: dims.flops(),
    };
    tracing::info!("{} done: {}", dims, metrics.summary());

    Ok(ConvOutput { output, metrics })
}

fn check_len(actual: usize, expected: usize) -> Result<(), ConvError> {
    if actual != expected {
        return Err(ConvError::Tensor(TensorError::BufferSizeMismatch {
            expected,
            actual,
        }));
    }
    Ok(())
}
