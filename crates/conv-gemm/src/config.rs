// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! n = 16
//! c = 4
//! k = 4
//! h = 32
//! w = 32
//! r = 3
//! s = 3
//! algorithm = "packed"
//! check = true
//!
//! [block]
//! mc = 96
//! nc = 6144
//! kc = 512
//! mr = 8
//! nr = 12
//! ```

use crate::{Algorithm, BlockParams, ConvError};
use conv_tensor::ConvDims;
use std::path::Path;

/// Configuration for one convolution run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RunConfig {
    /// Batch size.
    pub n: usize,
    /// Input channels.
    pub c: usize,
    /// Output channels (number of filters).
    pub k: usize,
    /// Input height.
    pub h: usize,
    /// Input width.
    pub w: usize,
    /// Filter height.
    pub r: usize,
    /// Filter width.
    pub s: usize,
    /// Height-wise stride.
    #[serde(default = "default_stride")]
    pub stride_h: usize,
    /// Width-wise stride.
    #[serde(default = "default_stride")]
    pub stride_w: usize,
    /// Algorithm name: `"direct"`, `"im2col"`, `"packed"`.
    pub algorithm: String,
    /// Whether to verify the result against the direct reference.
    #[serde(default = "default_true")]
    pub check: bool,
    /// Block-size overrides for the packed algorithm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockParams>,
}

fn default_stride() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl RunConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConvError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConvError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConvError> {
        toml::from_str(toml_str).map_err(|e| ConvError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConvError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConvError::Config(format!("TOML serialise error: {e}")))
    }

    /// Builds the validated dimension model.
    pub fn to_dims(&self) -> Result<ConvDims, ConvError> {
        Ok(ConvDims::new(
            self.n,
            self.c,
            self.k,
            self.h,
            self.w,
            self.r,
            self.s,
            self.stride_h,
            self.stride_w,
        )?)
    }

    /// Resolves the block parameters, falling back to defaults.
    pub fn to_params(&self) -> BlockParams {
        self.block.unwrap_or_default()
    }

    /// Parses the configured algorithm name.
    pub fn parse_algorithm(&self) -> Result<Algorithm, ConvError> {
        self.algorithm.parse()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        let dims = ConvDims::default();
        Self {
            n: dims.n(),
            c: dims.c(),
            k: dims.k(),
            h: dims.h(),
            w: dims.w(),
            r: dims.r(),
            s: dims.s(),
            stride_h: 1,
            stride_w: 1,
            algorithm: "packed".to_string(),
            check: true,
            block: None,
        }
    }
}
