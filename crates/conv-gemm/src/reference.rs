// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The direct reference convolution.
//!
//! Seven nested loops, no blocking, no cleverness. This is the ground
//! truth the GEMM-based variants are verified against.

use conv_tensor::ConvDims;

/// Direct convolution: `y[n][k][p][q] += Σ x[n][c][h][w] · f[k][c][r][s]`
/// with `h = p·stride_h + r`, `w = q·stride_w + s`.
///
/// `output` must be zeroed before the call.
pub fn convolve_direct(output: &mut [f32], input: &[f32], filter: &[f32], dims: &ConvDims) {
    let (w_dim, q_dim, s_dim) = (dims.w(), dims.q(), dims.s());
    let hw = dims.h() * w_dim;
    let rs = dims.r() * s_dim;
    let pq = dims.p() * q_dim;
    let chw = dims.c() * hw;
    let crs = dims.c() * rs;
    let kpq = dims.k() * pq;

    for img in 0..dims.n() {
        let n_chw = img * chw;
        let n_kpq = img * kpq;

        for kf in 0..dims.k() {
            let k_crs = kf * crs;
            let y_off = n_kpq + kf * pq;

            for chan in 0..dims.c() {
                let x_off = n_chw + chan * hw;
                let f_off = k_crs + chan * rs;

                for op in 0..dims.p() {
                    for oq in 0..q_dim {
                        let mut acc = output[y_off + op * q_dim + oq];

                        for fr in 0..dims.r() {
                            let ih = op * dims.stride_h() + fr;
                            for fs in 0..s_dim {
                                let iw = oq * dims.stride_w() + fs;
                                acc += input[x_off + ih * w_dim + iw]
                                    * filter[f_off + fr * s_dim + fs];
                            }
                        }

                        output[y_off + op * q_dim + oq] = acc;
                    }
                }
            }
        }
    }
}
