//! Sparse communication mosaic parsing
//!
//! Apprentice2 exports the rank-to-rank communication mosaic for a metric as
//! a CSV: one header line, then `source,destination,metric` records. The
//! mosaic is held as a ragged sparse structure with one destination list per
//! source rank.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::{PatError, Result};

/// A single rank-pair traffic record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficRecord {
    pub source: usize,
    pub dest: usize,
    pub metric: f64,
}

/// Sparse rank-to-rank communication matrix
///
/// Rows are keyed by source rank; each row holds (destination, accumulated
/// metric) pairs with at most one entry per destination. Sources grow on
/// demand: referencing rank `s` creates empty rows for every missing rank up
/// to and including `s`, so `len()` is always `max(source seen) + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mosaic {
    rows: Vec<Vec<(usize, f64)>>,
}

impl Mosaic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of source rows (max source rank seen + 1)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Full rank universe: covers destinations as well as sources
    ///
    /// Dense materialization must be able to hold every destination, even
    /// ones larger than any source.
    pub fn rank_count(&self) -> usize {
        let max_dest = self
            .rows
            .iter()
            .flat_map(|row| row.iter().map(|&(dest, _)| dest + 1))
            .max()
            .unwrap_or(0);
        self.rows.len().max(max_dest)
    }

    /// Destination pairs for a source rank (empty for never-referenced ranks)
    pub fn row(&self, source: usize) -> &[(usize, f64)] {
        self.rows.get(source).map_or(&[], Vec::as_slice)
    }

    /// Iterate (source rank, destination pairs) over all rows
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[(usize, f64)])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(source, row)| (source, row.as_slice()))
    }

    /// Fold one record into the mosaic
    ///
    /// Repeated (source, destination) pairs accumulate the metric. Lookup is
    /// a linear scan of the source row: per-source fan-out is small relative
    /// to total ranks in the target workloads.
    pub fn accumulate(&mut self, record: TrafficRecord) {
        if record.source >= self.rows.len() {
            self.rows.resize_with(record.source + 1, Vec::new);
        }
        let row = &mut self.rows[record.source];
        match row.iter_mut().find(|(dest, _)| *dest == record.dest) {
            Some((_, metric)) => *metric += record.metric,
            None => row.push((record.dest, record.metric)),
        }
    }
}

/// Read a mosaic from a traffic-record stream
///
/// The first line is a header and is discarded. Every further line must be
/// exactly `source,destination,metric`; a malformed line fails the whole
/// read with the offending line context, no partial recovery.
///
/// With `coarsen` set, both endpoints are integer-divided by `node_ranks`
/// first, building the mosaic directly at node granularity.
pub fn read_mosaic<R: BufRead>(reader: R, node_ranks: usize, coarsen: bool) -> Result<Mosaic> {
    if coarsen && node_ranks == 0 {
        return Err(PatError::Config(
            "node-ranks must be a positive integer".to_string(),
        ));
    }

    let mut mosaic = Mosaic::new();
    let mut records = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if idx == 0 {
            // Header line
            continue;
        }

        let mut record = parse_record(&line, idx + 1)?;
        if coarsen {
            record.source /= node_ranks;
            record.dest /= node_ranks;
        }
        mosaic.accumulate(record);
        records += 1;
    }

    tracing::debug!(records, sources = mosaic.len(), "mosaic read complete");
    Ok(mosaic)
}

/// Open and read a mosaic file
pub fn read_mosaic_file(path: &Path, node_ranks: usize, coarsen: bool) -> Result<Mosaic> {
    let file = File::open(path)?;
    read_mosaic(BufReader::new(file), node_ranks, coarsen)
}

/// Parse one `source,destination,metric` line (`line_no` is 1-based)
fn parse_record(line: &str, line_no: usize) -> Result<TrafficRecord> {
    let malformed = |reason: &str| PatError::Parse {
        line: line_no,
        reason: reason.to_string(),
        content: line.to_string(),
    };

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return Err(malformed("expected 3 comma-separated fields"));
    }

    let source = fields[0]
        .trim()
        .parse::<usize>()
        .map_err(|_| malformed("source rank is not a non-negative integer"))?;
    let dest = fields[1]
        .trim()
        .parse::<usize>()
        .map_err(|_| malformed("destination rank is not a non-negative integer"))?;
    let metric = fields[2]
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed("metric is not a number"))?;

    Ok(TrafficRecord {
        source,
        dest,
        metric,
    })
}
