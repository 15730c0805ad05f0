// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # conv-gemm
//!
//! Command-line interface for the conv-gemm convolution kernels.
//!
//! ## Usage
//! ```bash
//! # Run the packed algorithm and verify against the direct reference
//! conv-gemm run --algorithm packed --check
//!
//! # Custom shape: N C K H W R S
//! conv-gemm run -n 8 -c 3 -k 16 --height 64 --width 64 -r 5 -s 5
//!
//! # Compare all algorithms on one shape
//! conv-gemm bench --algorithms direct,im2col,packed
//!
//! # Show the GEMM view and the memory im2col would have burned
//! conv-gemm inspect
//! ```

mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "conv-gemm",
    about = "GEMM-based convolution without the im2col memory blow-up",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (overrides shape arguments).
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Convolution shape arguments, shared by all subcommands.
#[derive(Args, Clone, Copy)]
struct ShapeArgs {
    /// Batch size.
    #[arg(short = 'n', long, default_value_t = 16)]
    batch: usize,

    /// Input channels.
    #[arg(short = 'c', long, default_value_t = 4)]
    channels: usize,

    /// Output channels (number of filters).
    #[arg(short = 'k', long, default_value_t = 4)]
    filters: usize,

    /// Input height.
    #[arg(long, default_value_t = 32)]
    height: usize,

    /// Input width.
    #[arg(long, default_value_t = 32)]
    width: usize,

    /// Filter height.
    #[arg(short = 'r', long, default_value_t = 3)]
    filter_height: usize,

    /// Filter width.
    #[arg(short = 's', long, default_value_t = 3)]
    filter_width: usize,

    /// Height-wise stride.
    #[arg(long, default_value_t = 1)]
    stride_h: usize,

    /// Width-wise stride.
    #[arg(long, default_value_t = 1)]
    stride_w: usize,
}

impl ShapeArgs {
    fn to_dims(self) -> anyhow::Result<conv_tensor::ConvDims> {
        Ok(conv_tensor::ConvDims::new(
            self.batch,
            self.channels,
            self.filters,
            self.height,
            self.width,
            self.filter_height,
            self.filter_width,
            self.stride_h,
            self.stride_w,
        )?)
    }
}

/// Block-size overrides for the packed algorithm.
#[derive(Args, Clone, Copy)]
struct BlockArgs {
    /// Row-panel block size (MC).
    #[arg(long)]
    mc: Option<usize>,

    /// Column-panel block size (NC).
    #[arg(long)]
    nc: Option<usize>,

    /// Reduction block size (KC).
    #[arg(long)]
    kc: Option<usize>,

    /// Micro-tile rows (MR).
    #[arg(long)]
    mr: Option<usize>,

    /// Micro-tile columns (NR).
    #[arg(long)]
    nr: Option<usize>,
}

impl BlockArgs {
    fn to_params(self) -> conv_gemm::BlockParams {
        let d = conv_gemm::BlockParams::default();
        conv_gemm::BlockParams {
            mc: self.mc.unwrap_or(d.mc),
            nc: self.nc.unwrap_or(d.nc),
            kc: self.kc.unwrap_or(d.kc),
            mr: self.mr.unwrap_or(d.mr),
            nr: self.nr.unwrap_or(d.nr),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one convolution and optionally verify it.
    Run {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Algorithm: direct, im2col, packed.
        #[arg(short, long, default_value = "packed")]
        algorithm: String,

        /// Verify the result against the direct reference.
        #[arg(long)]
        check: bool,

        #[command(flatten)]
        block: BlockArgs,
    },

    /// Time every requested algorithm on the same shape.
    Bench {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Algorithms to compare (comma-separated).
        #[arg(long, default_value = "direct,im2col,packed")]
        algorithms: String,
    },

    /// Print the derived dimensions, GEMM view, and memory footprints.
    Inspect {
        #[command(flatten)]
        shape: ShapeArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            shape,
            algorithm,
            check,
            block,
        } => commands::run::execute(cli.config, shape, algorithm, check, block.to_params()),
        Commands::Bench { shape, algorithms } => commands::bench::execute(shape, algorithms),
        Commands::Inspect { shape } => commands::inspect::execute(shape),
    }
}
