//! CLI argument parsing for patmat

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::errors::{PatError, Result};

/// Analysis mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Compute the on-node fraction of the metric per rank
    Ratio,
    /// Export the mosaic as a dense matrix for plotting
    Plot,
    /// Export the difference of two mosaics
    Delta,
}

/// Rendering format for the ratio report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text layout (default)
    Text,
    /// JSON for machine parsing
    Json,
    /// CSV for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "patmat")]
#[command(version)]
#[command(
    about = "Compute on-node/off-node communication ratios from an Apprentice2 mosaic",
    long_about = None
)]
pub struct Cli {
    /// The mosaic file to parse (CrayPAT/Apprentice2 csv export)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// The number of ranks per node of the system
    #[arg(short = 'n', long = "node-ranks", value_name = "N")]
    pub node_ranks: usize,

    /// The mode - ratio computes the on-node fraction of the metric, plot
    /// exports the mosaic matrix, delta exports the difference of two mosaics
    #[arg(short = 'm', long = "mode", value_enum, default_value = "ratio")]
    pub mode: Mode,

    /// A second mosaic to compare against the input, for use with delta mode
    #[arg(short = 's', long = "secondary", value_name = "FILE")]
    pub secondary: Option<PathBuf>,

    /// The file the exported matrix should be saved to (plot/delta modes)
    #[arg(short = 'o', long = "outfile", value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Coarsen the comms graph to the per-node level before analysis
    #[arg(short = 'c', long = "coarsen")]
    pub coarsen: bool,

    /// Ratio report output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Validate parameter combinations, before any file I/O
    pub fn validate(&self) -> Result<()> {
        if self.node_ranks == 0 {
            return Err(PatError::Config(
                "node-ranks must be a positive integer".to_string(),
            ));
        }
        if self.coarsen && self.mode == Mode::Ratio {
            return Err(PatError::Config(
                "ratio mode does not support coarsening".to_string(),
            ));
        }
        if self.mode == Mode::Delta && self.secondary.is_none() {
            return Err(PatError::Config(
                "delta mode requires a secondary mosaic (-s)".to_string(),
            ));
        }
        if matches!(self.mode, Mode::Plot | Mode::Delta) && self.outfile.is_none() {
            return Err(PatError::Config(
                "plot and delta modes require an outfile (-o)".to_string(),
            ));
        }
        Ok(())
    }
}
