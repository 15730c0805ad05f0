// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The explicit im2col variant.
//!
//! Materializes the expansion matrix one image at a time and multiplies
//! it against the filter matrix with a naive GEMM. This is the memory-
//! hungry baseline the packed driver exists to avoid: the workspace is
//! `(c·r·s) × (p·q)` per image, reused across the batch.

use conv_tensor::ConvDims;

/// Expands one image's `[c][h][w]` data into the `(c·r·s) × (p·q)`
/// im2col matrix.
///
/// Row `chan·r·s + fr·s + fs` and column `op·q + oq` receive the input
/// element under filter offset `(fr, fs)` at output position
/// `(op, oq)`.
pub fn im2col(dst: &mut [f32], image: &[f32], dims: &ConvDims) {
    let (w, q) = (dims.w(), dims.q());
    let hw = dims.h() * w;
    let pq = dims.p() * q;
    let rspq = dims.r() * dims.s() * pq;

    for chan in 0..dims.c() {
        let x_off = chan * hw;
        let y_off = chan * rspq;

        for fr in 0..dims.r() {
            for fs in 0..dims.s() {
                let row = fr * dims.s() + fs;

                for op in 0..dims.p() {
                    let ih = op * dims.stride_h() + fr;

                    for oq in 0..q {
                        let iw = oq * dims.stride_w() + fs;
                        let col = op * q + oq;

                        dst[y_off + row * pq + col] = image[x_off + ih * w + iw];
                    }
                }
            }
        }
    }
}

/// im2col transformation + naive matrix multiplication, per image.
///
/// `output` is the `[n][k][p][q]` tensor and must be zeroed before the
/// call; each image's `K × (p·q)` product accumulates into its slab.
pub fn convolve_im2col(output: &mut [f32], input: &[f32], filter: &[f32], dims: &ConvDims) {
    let chw = dims.c() * dims.h() * dims.w();
    let pq = dims.p() * dims.q();
    let kpq = dims.k() * pq;
    let crs = dims.gemm_k();

    let mut workspace = vec![0.0f32; crs * pq];
    for img in 0..dims.n() {
        im2col(&mut workspace, &input[img * chw..][..chw], dims);
        matmul(
            &mut output[img * kpq..][..kpq],
            filter,
            &workspace,
            dims.k(),
            pq,
            crs,
        );
    }
}

/// Naive row-major GEMM, `C += A·B`, i-k-j order.
fn matmul(c: &mut [f32], a: &[f32], b: &[f32], m: usize, n: usize, k: usize) {
    for i in 0..m {
        for kk in 0..k {
            let a_ik = a[i * k + kk];
            let b_row = &b[kk * n..][..n];
            let c_row = &mut c[i * n..][..n];
            for j in 0..n {
                c_row[j] += a_ik * b_row[j];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::virtual_input_at;
    use conv_tensor::Tensor;

    #[test]
    fn test_im2col_matches_virtual_matrix() {
        // For a single image, the im2col matrix is exactly the
        // virtual expanded-input matrix.
        let dims = ConvDims::new(1, 2, 1, 4, 5, 2, 3, 1, 1).unwrap();
        let input = Tensor::synthetic_input(&dims);
        let x = input.as_slice();

        let (rows, cols) = (dims.gemm_k(), dims.p() * dims.q());
        let mut mat = vec![0.0; rows * cols];
        im2col(&mut mat, x, &dims);

        for row in 0..rows {
            for col in 0..cols {
                assert_eq!(
                    mat[row * cols + col],
                    virtual_input_at(x, &dims, row, col),
                    "mismatch at ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn test_im2col_strided() {
        let dims = ConvDims::new(1, 1, 1, 5, 5, 3, 3, 2, 2).unwrap();
        let input = Tensor::synthetic_input(&dims);
        let x = input.as_slice();

        let (rows, cols) = (dims.gemm_k(), dims.p() * dims.q());
        let mut mat = vec![0.0; rows * cols];
        im2col(&mut mat, x, &dims);

        for row in 0..rows {
            for col in 0..cols {
                assert_eq!(mat[row * cols + col], virtual_input_at(x, &dims, row, col));
            }
        }
    }

    #[test]
    fn test_matmul_known_values() {
        // A = [[1, 2, 3], [4, 5, 6]], B = [[7, 8], [9, 10], [11, 12]]
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let mut c = [0.0; 4];
        matmul(&mut c, &a, &b, 2, 2, 3);
        assert_eq!(c, [58.0, 64.0, 139.0, 154.0]);
    }
}
