// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The convolution dimension model.
//!
//! [`ConvDims`] is the single carrier of shape state for one convolution
//! problem: `y(N·K·P·Q) = x(N·C·H·W) * f(K·C·R·S)`. It is validated on
//! construction and immutable afterwards; every other component receives
//! it by shared reference.

use crate::TensorError;
use std::fmt;

/// Immutable shape record for a batched 2D convolution.
///
/// The output dimensions are derived on construction:
/// `p = (h - r) / stride_h + 1` and `q = (w - s) / stride_w + 1`.
///
/// # Examples
/// ```
/// use conv_tensor::ConvDims;
/// let dims = ConvDims::new(16, 4, 4, 32, 32, 3, 3, 1, 1).unwrap();
/// assert_eq!(dims.p(), 30);
/// assert_eq!(dims.q(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConvDims {
    /// Batch size.
    n: usize,
    /// Input channels.
    c: usize,
    /// Output channels (number of filters).
    k: usize,
    /// Input height.
    h: usize,
    /// Input width.
    w: usize,
    /// Filter height.
    r: usize,
    /// Filter width.
    s: usize,
    /// Height-wise stride.
    stride_h: usize,
    /// Width-wise stride.
    stride_w: usize,
    /// Derived output height.
    p: usize,
    /// Derived output width.
    q: usize,
}

impl ConvDims {
    /// Builds a dimension record, deriving the output height and width.
    ///
    /// # Errors
    /// Returns [`TensorError::InvalidShape`] when any dimension is zero,
    /// a stride is zero, the filter exceeds the input, or a derived
    /// output dimension would be non-positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n: usize,
        c: usize,
        k: usize,
        h: usize,
        w: usize,
        r: usize,
        s: usize,
        stride_h: usize,
        stride_w: usize,
    ) -> Result<Self, TensorError> {
        let invalid = |detail: String| TensorError::InvalidShape { detail };

        if n == 0 || c == 0 || k == 0 || h == 0 || w == 0 || r == 0 || s == 0 {
            return Err(invalid(format!(
                "all dimensions must be positive, got n={n} c={c} k={k} h={h} w={w} r={r} s={s}"
            )));
        }
        if stride_h == 0 || stride_w == 0 {
            return Err(invalid(format!(
                "strides must be positive, got stride_h={stride_h} stride_w={stride_w}"
            )));
        }
        if r > h || s > w {
            return Err(invalid(format!(
                "filter {r}x{s} does not fit input {h}x{w}"
            )));
        }

        let p = (h - r) / stride_h + 1;
        let q = (w - s) / stride_w + 1;
        if p == 0 || q == 0 {
            return Err(invalid(format!("derived output {p}x{q} is empty")));
        }

        Ok(Self {
            n,
            c,
            k,
            h,
            w,
            r,
            s,
            stride_h,
            stride_w,
            p,
            q,
        })
    }

    /// Batch size.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Input channels.
    pub fn c(&self) -> usize {
        self.c
    }

    /// Output channels (number of filters).
    pub fn k(&self) -> usize {
        self.k
    }

    /// Input height.
    pub fn h(&self) -> usize {
        self.h
    }

    /// Input width.
    pub fn w(&self) -> usize {
        self.w
    }

    /// Filter height.
    pub fn r(&self) -> usize {
        self.r
    }

    /// Filter width.
    pub fn s(&self) -> usize {
        self.s
    }

    /// Height-wise stride.
    pub fn stride_h(&self) -> usize {
        self.stride_h
    }

    /// Width-wise stride.
    pub fn stride_w(&self) -> usize {
        self.stride_w
    }

    /// Derived output height.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Derived output width.
    pub fn q(&self) -> usize {
        self.q
    }

    /// Element count of the input tensor `[n][c][h][w]`.
    pub fn input_len(&self) -> usize {
        self.n * self.c * self.h * self.w
    }

    /// Element count of the filter tensor `[k][c][r][s]`.
    pub fn filter_len(&self) -> usize {
        self.k * self.c * self.r * self.s
    }

    /// Element count of the output tensor `[n][k][p][q]`.
    pub fn output_len(&self) -> usize {
        self.n * self.k * self.p * self.q
    }

    /// Rows of the GEMM: one per filter.
    pub fn gemm_m(&self) -> usize {
        self.k
    }

    /// Columns of the GEMM: one per output element per image.
    pub fn gemm_n(&self) -> usize {
        self.p * self.q * self.n
    }

    /// Reduction depth of the GEMM: one per filter weight per channel.
    pub fn gemm_k(&self) -> usize {
        self.c * self.r * self.s
    }

    /// Floating-point operations for one full convolution
    /// (one multiply and one add per accumulation step).
    pub fn flops(&self) -> u64 {
        2 * (self.n * self.k * self.p * self.q * self.c * self.r * self.s) as u64
    }
}

/// Defaults match the classic CIFAR-sized study configuration.
impl Default for ConvDims {
    fn default() -> Self {
        Self::new(16, 4, 4, 32, 32, 3, 3, 1, 1).expect("default dims are valid")
    }
}

impl fmt::Display for ConvDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y({}·{}·{}·{}) = x({}·{}·{}·{}) * f({}·{}·{}·{})",
            self.n, self.k, self.p, self.q, self.n, self.c, self.h, self.w, self.k, self.c,
            self.r, self.s,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_output() {
        let d = ConvDims::new(1, 1, 1, 4, 4, 2, 2, 1, 1).unwrap();
        assert_eq!(d.p(), 3);
        assert_eq!(d.q(), 3);
        assert_eq!(d.output_len(), 9);
    }

    #[test]
    fn test_strided_output() {
        let d = ConvDims::new(1, 1, 1, 7, 9, 3, 3, 2, 2).unwrap();
        assert_eq!(d.p(), 3);
        assert_eq!(d.q(), 4);
    }

    #[test]
    fn test_gemm_view() {
        let d = ConvDims::default();
        assert_eq!(d.gemm_m(), 4);
        assert_eq!(d.gemm_n(), 30 * 30 * 16);
        assert_eq!(d.gemm_k(), 4 * 3 * 3);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(ConvDims::new(0, 1, 1, 4, 4, 2, 2, 1, 1).is_err());
        assert!(ConvDims::new(1, 1, 1, 4, 0, 2, 2, 1, 1).is_err());
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(ConvDims::new(1, 1, 1, 4, 4, 2, 2, 0, 1).is_err());
        assert!(ConvDims::new(1, 1, 1, 4, 4, 2, 2, 1, 0).is_err());
    }

    #[test]
    fn test_oversized_filter_rejected() {
        let err = ConvDims::new(1, 1, 1, 4, 4, 5, 2, 1, 1).unwrap_err();
        assert!(matches!(err, TensorError::InvalidShape { .. }));
        assert!(ConvDims::new(1, 1, 1, 4, 4, 2, 5, 1, 1).is_err());
    }

    #[test]
    fn test_filter_equal_to_input() {
        // R == H and S == W is a 1x1 output, not an error.
        let d = ConvDims::new(1, 1, 1, 4, 4, 4, 4, 1, 1).unwrap();
        assert_eq!(d.p(), 1);
        assert_eq!(d.q(), 1);
    }

    #[test]
    fn test_flops() {
        let d = ConvDims::new(1, 1, 1, 4, 4, 2, 2, 1, 1).unwrap();
        // 9 outputs, 4 accumulations each, 2 flops per accumulation.
        assert_eq!(d.flops(), 72);
    }

    #[test]
    fn test_display() {
        let d = ConvDims::default();
        assert_eq!(
            format!("{d}"),
            "y(16·4·30·30) = x(16·4·32·32) * f(4·4·3·3)"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let d = ConvDims::default();
        let json = toml::to_string(&d).unwrap();
        let back: ConvDims = toml::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
