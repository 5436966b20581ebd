//! Stats command implementation.
//!
//! The stats command:
//! 1. Expands the input paths into trace files
//! 2. Parses and aggregates each file on its own
//! 3. Optionally renders the per-file breakdown
//! 4. Merges every file into the global table
//! 5. Ranks and renders the global totals
//!
//! Only a failure to build the file list aborts the run. Unreadable files
//! are reported and skipped, and the output stays parseable because
//! diagnostics go to the log (stderr).

use super::models::StatsOptions;
use crate::aggregator::{aggregate, AggregateTable};
use crate::files::find_trace_files;
use crate::output::{rank, records, write_json, write_text, FileTotals, RenderOptions, StatsDocument};
use crate::parser::read_trace;
use anyhow::{Context, Result};
use log::{debug, log, warn, Level};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// What a stats run saw
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub total_calls: u64,
    pub global: AggregateTable,

    /// The run stopped early on request
    pub interrupted: bool,
}

/// Execute the stats command, writing to stdout
///
/// **Public** - main entry point called from main.rs
pub fn execute_stats(paths: &[PathBuf], options: &StatsOptions) -> Result<StatsSummary> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_stats(paths, options, None, &mut out)?;
    out.flush().context("Failed to flush output")?;
    Ok(summary)
}

/// Run the statistics engine over `paths`
///
/// # Arguments
/// * `paths` - Files and directories to scan
/// * `options` - Stats options
/// * `interrupt` - Checked between files; when set the run renders what it has so far
/// * `out` - Primary output stream
///
/// # Errors
/// Only when the input file list can't be established.
pub fn run_stats<W: Write>(
    paths: &[PathBuf],
    options: &StatsOptions,
    interrupt: Option<&AtomicBool>,
    out: &mut W,
) -> Result<StatsSummary> {
    let progress = if options.verbose { Level::Info } else { Level::Debug };
    let render = options.render_options();

    let fnames = find_trace_files(paths, &[]).context("Failed finding AppMaps")?;
    log!(progress, "Found {} appmap(s)", fnames.len());

    let mut summary = StatsSummary {
        files_found: fnames.len(),
        ..Default::default()
    };
    let mut per_file: Vec<FileTotals> = Vec::new();

    for fname in &fnames {
        if interrupt.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            warn!("Interrupted, showing results for {} file(s)", summary.files_processed);
            summary.interrupted = true;
            break;
        }

        log!(progress, "Processing {}", fname.display());
        let Some((table, calls)) = process_file(fname, progress) else {
            summary.files_skipped += 1;
            continue;
        };

        if options.files {
            let name = fname.display().to_string();
            if options.json {
                let totals = records(&rank(&table), &render);
                per_file.push(FileTotals { name, totals });
            } else {
                report(write_block(&mut *out, Some(&name), calls, &table, &render));
            }
        }

        summary.global.merge(&table);
        summary.total_calls += calls;
        summary.files_processed += 1;
    }

    if options.json {
        let document = StatsDocument {
            files: options.files.then_some(per_file),
            totals: records(&rank(&summary.global), &render),
        };
        match write_json(&mut *out, &document) {
            Ok(()) => report(writeln!(out)),
            Err(e) => warn!("{}", e),
        }
    } else {
        if options.files {
            report(out.write_all(b"\n\n"));
        }
        report(write_block(&mut *out, None, summary.total_calls, &summary.global, &render));
    }

    debug!(
        "Processed {} file(s), skipped {}, {} call(s)",
        summary.files_processed, summary.files_skipped, summary.total_calls
    );
    Ok(summary)
}

/// Parse and aggregate one file; `None` if it contributes nothing
fn process_file(fname: &Path, progress: Level) -> Option<(AggregateTable, u64)> {
    let trace = match read_trace(fname) {
        Ok(trace) => trace,
        Err(e) => {
            warn!("{}: {}", fname.display(), e);
            return None;
        }
    };

    if !trace.has_events() {
        log!(progress, "{}, events is missing", fname.display());
        return None;
    }

    log!(progress, "{}: {} event(s)", fname.display(), trace.events().len());
    let (table, calls) = aggregate(trace.events());
    if calls == 0 {
        warn!("No call events in {}", fname.display());
    }

    Some((table, calls))
}

fn write_block(
    mut out: impl Write,
    prefix: Option<&str>,
    total_calls: u64,
    table: &AggregateTable,
    render: &RenderOptions,
) -> io::Result<()> {
    if let Some(prefix) = prefix {
        write!(out, "{}: ", prefix)?;
    }
    write_text(out, total_calls, &rank(table), render)
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        warn!("Failed to write statistics: {}", e);
    }
}
