// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # conv-tensor
//!
//! Dimension model and dense tensor storage for GEMM-based convolution.
//!
//! This crate provides:
//! - [`ConvDims`] — the immutable shape record for one convolution
//!   problem, with derived output dimensions and the GEMM view.
//! - [`Tensor`] — an owned, contiguous, row-major `f32` buffer.
//! - [`TensorError`] — shape and buffer validation errors.
//!
//! # Design Goals
//! - All shape state lives in one immutable struct passed by reference;
//!   no free-standing dimension globals.
//! - No heap allocation in hot paths (kernels work on pre-allocated
//!   buffers).
//! - Clean error types via `thiserror`.

mod dims;
mod error;
mod tensor;

pub use dims::ConvDims;
pub use error::TensorError;
pub use tensor::Tensor;
