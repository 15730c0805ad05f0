// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the convolution kernels.

/// Errors that can occur when setting up or running a convolution.
#[derive(Debug, thiserror::Error)]
pub enum ConvError {
    /// Block-size parameters are inconsistent (zero, or a register tile
    /// larger than its cache block).
    #[error("invalid block parameters: {0}")]
    InvalidBlockParams(String),

    /// A shape or buffer validation failed in the tensor layer.
    #[error("tensor error: {0}")]
    Tensor(#[from] conv_tensor::TensorError),

    /// Configuration error (unknown algorithm name, TOML parse failure).
    #[error("configuration error: {0}")]
    Config(String),
}
