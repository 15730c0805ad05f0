// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise verification against the reference convolution.

use conv_tensor::ConvDims;
use std::fmt;

/// Mismatches reported in detail before the comparison cuts off.
pub const MAX_REPORTED: usize = 4;

/// One element where the result diverged from the reference.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Mismatch {
    /// Output coordinate `(n, k, p, q)`.
    pub coord: (usize, usize, usize, usize),
    /// Reference value.
    pub expected: f32,
    /// Computed value.
    pub actual: f32,
}

/// The outcome of comparing a result tensor against the reference.
///
/// Carries at most [`MAX_REPORTED`] detailed mismatches plus the total
/// count; `Display` renders the pass/fail report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifyReport {
    /// First few mismatching elements.
    pub mismatches: Vec<Mismatch>,
    /// Total number of mismatching elements.
    pub total_mismatches: usize,
    /// Absolute tolerance used for the comparison.
    pub tolerance: f32,
}

impl VerifyReport {
    /// Returns `true` when every element matched within tolerance.
    pub fn passed(&self) -> bool {
        self.total_mismatches == 0
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.mismatches {
            let (n, k, p, q) = m.coord;
            writeln!(
                f,
                "fail: y({n}·{k}·{p}·{q}) expected {}, but found {}",
                m.expected, m.actual,
            )?;
        }
        if self.passed() {
            write!(f, "success: the results are correct")
        } else {
            write!(f, "fail: {} elements mismatch", self.total_mismatches)
        }
    }
}

/// Compares `actual` against `expected` element-wise with an absolute
/// tolerance.
///
/// Both slices are `[n][k][p][q]` tensors of `dims.output_len()`
/// elements; a length disagreement is a caller bug and panics rather
/// than comparing a truncated prefix. Pass `f32::EPSILON` to reproduce
/// the strict machine-epsilon check; a looser tolerance (e.g. `1e-6`)
/// absorbs summation-order differences between blocked and direct
/// accumulation.
pub fn compare(expected: &[f32], actual: &[f32], dims: &ConvDims, tolerance: f32) -> VerifyReport {
    assert_eq!(expected.len(), dims.output_len(), "expected-slice length");
    assert_eq!(actual.len(), dims.output_len(), "actual-slice length");

    let (k, p, q) = (dims.k(), dims.p(), dims.q());
    let mut mismatches = Vec::new();
    let mut total = 0;

    for (i, (&e, &a)) in expected.iter().zip(actual.iter()).enumerate() {
        if (e - a).abs() >= tolerance {
            total += 1;
            if mismatches.len() < MAX_REPORTED {
                mismatches.push(Mismatch {
                    coord: (i / (k * p * q), (i / (p * q)) % k, (i / q) % p, i % q),
                    expected: e,
                    actual: a,
                });
            }
        }
    }

    VerifyReport {
        mismatches,
        total_mismatches: total,
        tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims_2x2x2x2() -> ConvDims {
        // n=2, k=2, p=2, q=2 output.
        ConvDims::new(2, 1, 2, 3, 3, 2, 2, 1, 1).unwrap()
    }

    #[test]
    fn test_identical_passes() {
        let dims = dims_2x2x2x2();
        let a = vec![1.5; dims.output_len()];
        let report = compare(&a, &a, &dims, f32::EPSILON);
        assert!(report.passed());
        assert!(report.mismatches.is_empty());
        assert!(format!("{report}").contains("success"));
    }

    #[test]
    fn test_single_mismatch_coordinates() {
        let dims = dims_2x2x2x2();
        let expected = vec![0.0; dims.output_len()];
        let mut actual = expected.clone();
        // Flat index 13 = n·8 + k·4 + p·2 + q with n=1, k=1, p=0, q=1.
        actual[13] = 9.0;

        let report = compare(&expected, &actual, &dims, f32::EPSILON);
        assert!(!report.passed());
        assert_eq!(report.total_mismatches, 1);
        assert_eq!(report.mismatches[0].coord, (1, 1, 0, 1));
        assert_eq!(report.mismatches[0].actual, 9.0);
    }

    #[test]
    fn test_report_caps_at_four() {
        let dims = dims_2x2x2x2();
        let expected = vec![0.0; dims.output_len()];
        let actual = vec![1.0; dims.output_len()];

        let report = compare(&expected, &actual, &dims, f32::EPSILON);
        assert_eq!(report.mismatches.len(), MAX_REPORTED);
        assert_eq!(report.total_mismatches, dims.output_len());
        assert!(format!("{report}").contains("16 elements mismatch"));
    }

    #[test]
    #[should_panic(expected = "actual-slice length")]
    fn test_short_actual_rejected() {
        let dims = dims_2x2x2x2();
        let expected = vec![0.0; dims.output_len()];
        let actual = vec![0.0; dims.output_len() - 1];
        compare(&expected, &actual, &dims, f32::EPSILON);
    }

    #[test]
    fn test_tolerance_absorbs_small_differences() {
        let dims = dims_2x2x2x2();
        let expected = vec![1.0; dims.output_len()];
        let actual = vec![1.0 + 1e-7; dims.output_len()];

        assert!(compare(&expected, &actual, &dims, 1e-6).passed());
        assert!(!compare(&expected, &actual, &dims, 1e-8).passed());
    }
}
