use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use patmat::cli::{Cli, Mode, ReportFormat};
use patmat::export::{CsvMatrixExporter, MatrixExporter};
use patmat::{aggregate, delta, mosaic, ratio, report};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Compute on-node/total-node ratios and print the per-node report
fn run_ratio(args: &Cli) -> Result<()> {
    let mosaic = mosaic::read_mosaic_file(&args.input, args.node_ranks, false)?;
    let (onnode, totnode) = aggregate::aggregate(&mosaic, args.node_ranks);
    let table = ratio::compute_ratios(&onnode, &totnode);
    let stats = ratio::node_statistics(&table);

    let rendered = match args.format {
        ReportFormat::Text => report::render_text(&stats),
        ReportFormat::Csv => report::render_csv(&stats),
        ReportFormat::Json => report::render_json(&stats)?,
    };
    print!("{rendered}");
    Ok(())
}

/// Export the (optionally coarsened) mosaic as a dense matrix
fn run_plot(args: &Cli, outfile: &Path) -> Result<()> {
    let mosaic = mosaic::read_mosaic_file(&args.input, args.node_ranks, args.coarsen)?;
    let matrix = delta::DenseMatrix::from_mosaic(&mosaic);

    let mut out = BufWriter::new(File::create(outfile)?);
    CsvMatrixExporter::shifted().export(&matrix, &mut out)?;
    Ok(())
}

/// Export the reference-minus-test difference of two mosaics
fn run_delta(args: &Cli, secondary: &Path, outfile: &Path) -> Result<()> {
    let reference = mosaic::read_mosaic_file(&args.input, args.node_ranks, args.coarsen)?;
    let test = mosaic::read_mosaic_file(secondary, args.node_ranks, args.coarsen)?;
    let matrix = delta::delta(&reference, &test)?;

    let mut out = BufWriter::new(File::create(outfile)?);
    CsvMatrixExporter::plain().export(&matrix, &mut out)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);
    args.validate()?;

    match args.mode {
        Mode::Ratio => run_ratio(&args)?,
        Mode::Plot => {
            let Some(outfile) = args.outfile.clone() else {
                anyhow::bail!("plot mode requires an outfile (-o)");
            };
            run_plot(&args, &outfile)?;
        }
        Mode::Delta => {
            let (Some(secondary), Some(outfile)) = (args.secondary.clone(), args.outfile.clone())
            else {
                anyhow::bail!("delta mode requires a secondary mosaic (-s) and an outfile (-o)");
            };
            run_delta(&args, &secondary, &outfile)?;
        }
    }

    Ok(())
}
