//! Patmat - CrayPAT/Apprentice2 communication mosaic analyzer
//!
//! This library parses the sparse rank-to-rank communication mosaic exported
//! by Apprentice2, aggregates traffic to compute-node granularity, computes
//! on-node/total-node ratios with per-node summary statistics, and computes
//! delta matrices between two mosaics for comparative analysis.

pub mod aggregate;
pub mod cli;
pub mod delta;
pub mod errors;
pub mod export;
pub mod mosaic;
pub mod ratio;
pub mod report;
