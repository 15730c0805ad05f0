// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run timing metrics.

use crate::Algorithm;
use std::time::Duration;

/// Timing and throughput data for one convolution run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunMetrics {
    /// Which algorithm produced the result.
    pub algorithm: Algorithm,
    /// Wall-clock time of the compute call.
    pub elapsed: Duration,
    /// Total floating-point operations performed.
    pub flops: u64,
}

impl RunMetrics {
    /// Returns achieved GFLOP/s, or 0 for a degenerate duration.
    pub fn gflops(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.flops as f64 / secs / 1e9
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.3}ms, {:.3} GFLOP ({:.2} GFLOP/s)",
            self.algorithm,
            self.elapsed.as_secs_f64() * 1000.0,
            self.flops as f64 / 1e9,
            self.gflops(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gflops() {
        let m = RunMetrics {
            algorithm: Algorithm::Packed,
            elapsed: Duration::from_secs(2),
            flops: 4_000_000_000,
        };
        assert!((m.gflops() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration() {
        let m = RunMetrics {
            algorithm: Algorithm::Direct,
            elapsed: Duration::ZERO,
            flops: 100,
        };
        assert_eq!(m.gflops(), 0.0);
    }

    #[test]
    fn test_summary_format() {
        let m = RunMetrics {
            algorithm: Algorithm::Im2col,
            elapsed: Duration::from_millis(5),
            flops: 1_000_000,
        };
        let s = m.summary();
        assert!(s.contains("im2col"));
        assert!(s.contains("GFLOP/s"));
    }
}
