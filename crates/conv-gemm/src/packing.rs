// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The packing engine: tile synthesis for the blocked multiply.
//!
//! The classical im2col approach materializes the expanded input matrix
//! — `(c·r·s)` rows by `(p·q·n)` columns — before multiplying. That
//! matrix is never built here. Instead, [`pack_input_tile`] synthesizes
//! just the rectangular slice the multiply kernel is about to consume,
//! mapping each virtual-matrix coordinate back to the original
//! `[n][c][h][w]` tensor on the fly. The filter side needs no remapping:
//! the `[k][c][r][s]` layout already *is* the row-major `K × (C·R·S)`
//! A-matrix, so [`pack_filter`] is a plain strided block copy.
//!
//! # Virtual matrix mapping
//!
//! Element `(row, col)` of the virtual expanded-input matrix comes from
//! input element `[img][chan][ih][iw]` where:
//!
//! ```text
//! chan = row / (r·s)          img = col / (p·q)
//! fr   = (row % (r·s)) / s    op  = (col % (p·q)) / q
//! fs   = (row % (r·s)) % s    oq  = (col % (p·q)) % q
//! ih   = op·stride_h + fr     iw  = oq·stride_w + fs
//! ```
//!
//! The row decomposition divides and reduces by the filter *width* `s`,
//! and the column decomposition by the output *width* `q`, consistent
//! with the row-major layouts of the filter and output tensors. A
//! computed `(ih, iw)` outside the input bounds means the caller's
//! block/offset bookkeeping is broken, so both packers assert rather
//! than clamp.

use conv_tensor::ConvDims;

/// Packs a `rows × cols` block of the `K × (C·R·S)` filter matrix.
///
/// Copies the block starting at `(row0, col0)` of `filter` (row stride
/// `lda`) into `dst`, which is row-major with row stride `cols`.
pub fn pack_filter(
    dst: &mut [f32],
    filter: &[f32],
    lda: usize,
    row0: usize,
    col0: usize,
    rows: usize,
    cols: usize,
) {
    for i in 0..rows {
        let src = &filter[(row0 + i) * lda + col0..][..cols];
        dst[i * cols..][..cols].copy_from_slice(src);
    }
}

/// Packs a `rows × cols` tile of the virtual expanded-input matrix.
///
/// `row0`/`col0` are absolute virtual-matrix coordinates; `dst` is
/// row-major with row stride `cols`. Each destination element is read
/// from `input` via the mapping documented at module level.
///
/// # Panics
/// Panics if a computed input coordinate falls outside the tensor —
/// an invariant violation in the caller's block bookkeeping.
pub fn pack_input_tile(
    dst: &mut [f32],
    input: &[f32],
    dims: &ConvDims,
    row0: usize,
    rows: usize,
    col0: usize,
    cols: usize,
) {
    let (h, w) = (dims.h(), dims.w());
    let rs = dims.r() * dims.s();
    let pq = dims.p() * dims.q();
    let hw = h * w;
    let chw = dims.c() * hw;

    for i in 0..rows {
        let row = row0 + i;
        let chan = row / rs;
        let rem = row % rs;
        let fr = rem / dims.s();
        let fs = rem % dims.s();
        let dst_row = &mut dst[i * cols..][..cols];

        for (j, out) in dst_row.iter_mut().enumerate() {
            let col = col0 + j;
            let img = col / pq;
            let rem2 = col % pq;
            let op = rem2 / dims.q();
            let oq = rem2 % dims.q();

            let ih = op * dims.stride_h() + fr;
            let iw = oq * dims.stride_w() + fs;
            assert!(
                ih < h && iw < w,
                "packed coordinate ({ih}, {iw}) outside input {h}x{w} \
                 for virtual element ({row}, {col})"
            );

            *out = input[img * chw + chan * hw + ih * w + iw];
        }
    }
}

/// Reads one element of the virtual expanded-input matrix directly.
///
/// Brute-force single-element version of the [`pack_input_tile`]
/// mapping; used to validate packed tiles cell-for-cell.
///
/// # Panics
/// Panics if `(row, col)` maps outside the input tensor.
pub fn virtual_input_at(input: &[f32], dims: &ConvDims, row: usize, col: usize) -> f32 {
    let mut cell = [0.0f32];
    pack_input_tile(&mut cell, input, dims, row, 1, col, 1);
    cell[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use conv_tensor::Tensor;

    fn dims_2x2_on_4x4() -> ConvDims {
        ConvDims::new(2, 2, 1, 4, 4, 2, 2, 1, 1).unwrap()
    }

    #[test]
    fn test_pack_filter_copies_block() {
        // 3x4 "filter matrix", pack the middle 2x2 block.
        let filter: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let mut dst = vec![0.0; 4];
        pack_filter(&mut dst, &filter, 4, 1, 1, 2, 2);
        assert_eq!(dst, vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_pack_filter_full_matrix() {
        let filter: Vec<f32> = (0..6).map(|v| v as f32).collect();
        let mut dst = vec![0.0; 6];
        pack_filter(&mut dst, &filter, 3, 0, 0, 2, 3);
        assert_eq!(dst, filter);
    }

    #[test]
    fn test_virtual_matrix_first_column() {
        // Column 0 is the first output position of image 0: the filter
        // window anchored at (0, 0), walked channel-major then
        // row-major over the window.
        let dims = dims_2x2_on_4x4();
        let input = Tensor::synthetic_input(&dims);
        let x = input.as_slice();

        // rows: (chan, fr, fs) = (0,0,0) (0,0,1) (0,1,0) (0,1,1) (1,0,0) ...
        assert_eq!(virtual_input_at(x, &dims, 0, 0), x[0]);
        assert_eq!(virtual_input_at(x, &dims, 1, 0), x[1]);
        assert_eq!(virtual_input_at(x, &dims, 2, 0), x[4]);
        assert_eq!(virtual_input_at(x, &dims, 3, 0), x[5]);
        assert_eq!(virtual_input_at(x, &dims, 4, 0), x[16]);
    }

    #[test]
    fn test_virtual_matrix_second_image() {
        let dims = dims_2x2_on_4x4();
        let input = Tensor::synthetic_input(&dims);
        let x = input.as_slice();
        let pq = dims.p() * dims.q();
        let chw = dims.c() * dims.h() * dims.w();

        // First column of image 1 starts at that image's offset.
        assert_eq!(virtual_input_at(x, &dims, 0, pq), x[chw]);
    }

    #[test]
    fn test_pack_input_tile_matches_direct_mapping() {
        let dims = dims_2x2_on_4x4();
        let input = Tensor::synthetic_input(&dims);
        let x = input.as_slice();

        let (rows, cols) = (dims.gemm_k(), dims.gemm_n());
        let mut tile = vec![0.0; rows * cols];
        pack_input_tile(&mut tile, x, &dims, 0, rows, 0, cols);

        for row in 0..rows {
            for col in 0..cols {
                assert_eq!(
                    tile[row * cols + col],
                    virtual_input_at(x, &dims, row, col),
                    "mismatch at virtual ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn test_pack_input_tile_interior_offsets() {
        // A tile that starts mid-matrix must honor absolute offsets.
        let dims = ConvDims::new(2, 3, 1, 5, 6, 2, 3, 1, 1).unwrap();
        let input = Tensor::synthetic_input(&dims);
        let x = input.as_slice();

        let (row0, rows, col0, cols) = (2, 3, 5, 7);
        let mut tile = vec![0.0; rows * cols];
        pack_input_tile(&mut tile, x, &dims, row0, rows, col0, cols);

        for i in 0..rows {
            for j in 0..cols {
                assert_eq!(
                    tile[i * cols + j],
                    virtual_input_at(x, &dims, row0 + i, col0 + j),
                );
            }
        }
    }

    #[test]
    fn test_pack_input_tile_strided() {
        let dims = ConvDims::new(1, 1, 1, 6, 6, 2, 2, 2, 2).unwrap();
        let input = Tensor::synthetic_input(&dims);
        let x = input.as_slice();

        // Output is 3x3; column 4 is output (1, 1), anchored at input
        // (2, 2) for virtual row 0.
        assert_eq!(virtual_input_at(x, &dims, 0, 4), x[2 * 6 + 2]);
        // Virtual row 3 is window offset (1, 1) -> input (3, 3).
        assert_eq!(virtual_input_at(x, &dims, 3, 4), x[3 * 6 + 3]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_range_row_panics() {
        let dims = dims_2x2_on_4x4();
        let input = Tensor::synthetic_input(&dims);
        // Rows past the virtual matrix land in a nonexistent channel;
        // the read must abort, never wrap or clamp.
        virtual_input_at(input.as_slice(), &dims, dims.gemm_k() * 2, 0);
    }
}
