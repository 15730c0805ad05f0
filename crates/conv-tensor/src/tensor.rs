// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense tensor storage.

use crate::{ConvDims, TensorError};

/// An owned, contiguous, row-major `f32` tensor.
///
/// `Tensor` is a flat buffer plus its logical dimension list; kernels
/// index it with explicitly computed strides. The whole pipeline is
/// single-precision, so the element type is fixed at `f32`.
///
/// # Examples
/// ```
/// use conv_tensor::Tensor;
/// let t = Tensor::zeros(&[2, 3]);
/// assert_eq!(t.len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dims: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a tensor of the given dimensions filled with zeros.
    pub fn zeros(dims: &[usize]) -> Self {
        let len = dims.iter().product();
        Self {
            dims: dims.to_vec(),
            data: vec![0.0; len],
        }
    }

    /// Creates a tensor from an existing buffer.
    ///
    /// # Errors
    /// Returns [`TensorError::BufferSizeMismatch`] if the buffer length
    /// does not equal the product of the dimensions.
    pub fn from_vec(dims: &[usize], data: Vec<f32>) -> Result<Self, TensorError> {
        let expected: usize = dims.iter().product();
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dims: dims.to_vec(),
            data,
        })
    }

    /// Synthetic `[n][c][h][w]` input: element `i` holds `(i % h) as f32`.
    ///
    /// Integral values keep results exactly representable, so reference
    /// comparisons are not polluted by rounding differences.
    pub fn synthetic_input(dims: &ConvDims) -> Self {
        let h = dims.h();
        let data = (0..dims.input_len()).map(|i| (i % h) as f32).collect();
        Self {
            dims: vec![dims.n(), dims.c(), dims.h(), dims.w()],
            data,
        }
    }

    /// Synthetic `[k][c][r][s]` filter: element `i` holds `(i % s) as f32`.
    pub fn synthetic_filter(dims: &ConvDims) -> Self {
        let s = dims.s();
        let data = (0..dims.filter_len()).map(|i| (i % s) as f32).collect();
        Self {
            dims: vec![dims.k(), dims.c(), dims.r(), dims.s()],
            data,
        }
    }

    /// Returns the logical dimensions.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the flat element buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the flat element buffer mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Fills the tensor with a constant value.
    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|x| *x = value);
    }
}
