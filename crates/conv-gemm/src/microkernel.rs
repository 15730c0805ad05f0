// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The innermost dense multiply-accumulate kernel.
//!
//! Operates purely on matrix coordinates; it has no idea the operands
//! were packed out of a convolution. Loop order is fixed at i-k-j:
//! the inner loop is a saxpy over a row of C, sequential in memory for
//! both B and C. Floating-point summation is not associative, so this
//! order is part of the kernel's contract — callers relying on
//! bit-exact reproducibility get it only because the order never
//! changes.

/// Computes `C[i][j] += Σ_k A[i][k] · B[k][j]` over an `mr × nr` tile.
///
/// - `a`: packed A tile, row-major, row stride `kc`.
/// - `b`: packed B tile region, row-major, row stride `ldb`.
/// - `c`: destination region embedded in a larger row-major buffer
///   with row stride `ldc`; read-modify-write.
pub fn microkernel(
    c: &mut [f32],
    a: &[f32],
    b: &[f32],
    mr: usize,
    nr: usize,
    kc: usize,
    ldb: usize,
    ldc: usize,
) {
    for i in 0..mr {
        let a_row = &a[i * kc..][..kc];
        for (kk, &a_ik) in a_row.iter().enumerate() {
            let b_row = &b[kk * ldb..][..nr];
            let c_row = &mut c[i * ldc..][..nr];
            for j in 0..nr {
                c_row[j] += a_ik * b_row[j];
            }
        }
    }
}
