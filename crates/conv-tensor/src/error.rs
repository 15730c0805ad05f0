// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensors and dimension validation.

/// Errors that can occur when building shapes or tensors.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// A convolution configuration produces an impossible geometry.
    #[error("invalid shape: {detail}")]
    InvalidShape { detail: String },

    /// The provided buffer length does not match the expected element count.
    #[error("buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}
