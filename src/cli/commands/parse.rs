//! Parse command implementation
//!
//! Reads every resolved input concurrently, parses each file on the blocking
//! pool, optionally stores the result through a sink and reports in input
//! order.

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{HumanDuration, ProgressBar};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::shared::{RunSummary, create_progress_bar, load_configuration, resolve_inputs, setup_logging};
use crate::app::models::{DexReadResult, IssueKind};
use crate::app::services::dex_parser::{DexParser, ParseStats, read_source};
use crate::app::services::persistence::{ReadSink, SourceRead, StoredRead, create_sink};
use crate::cli::args::{OutputFormat, ParseArgs};
use crate::config::Config;
use crate::{Error, Result};

/// Outcome for one input file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ParseStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DexReadResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the parse command
pub async fn run_parse(args: ParseArgs) -> Result<RunSummary> {
    let start_time = Instant::now();

    args.validate()?;
    setup_logging(args.get_log_level())?;

    let mut config = load_configuration(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, &args);
    config.validate()?;

    let files = resolve_inputs(&args.inputs)?;
    if files.is_empty() {
        return Err(Error::configuration("No DEX files matched the given inputs"));
    }

    let parser = Arc::new(DexParser::new(config.parse_options()?));
    let sink: Option<Arc<dyn ReadSink>> = config
        .output
        .store_dir
        .as_deref()
        .map(|dir| Arc::from(create_sink(config.output.store_format, dir)));
    let workers = config.effective_workers();

    info!(
        "Parsing {} files with {} workers{}",
        files.len(),
        workers,
        sink.as_ref()
            .map(|s| format!(", storing as {}", s.name()))
            .unwrap_or_default()
    );

    let progress = args
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, "Parsing DEX files"));

    let reports = parse_files(
        files,
        parser,
        sink,
        args.device.clone(),
        workers,
        progress.as_ref(),
    )
    .await;

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let summary = summarize(&reports, start_time);

    match args.format {
        OutputFormat::Human => print_human_report(&reports, &summary, args.show_issues),
        OutputFormat::Json => print_json_report(&reports, &summary)?,
    }

    Ok(summary)
}

/// Apply parse command flags on top of the loaded configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ParseArgs) {
    if let Some(columns) = args.columns {
        config.parsing.column_hint = Some(columns);
    }
    if let Some(store_dir) = &args.store_dir {
        config.output.store_dir = Some(store_dir.clone());
    }
    if let Some(store_format) = args.store_format {
        config.output.store_format = store_format;
    }
    if let Some(workers) = args.workers {
        config.processing.workers = workers;
    }
}

/// Parse files concurrently and return reports in input order
pub async fn parse_files(
    files: Vec<PathBuf>,
    parser: Arc<DexParser>,
    sink: Option<Arc<dyn ReadSink>>,
    device: Option<String>,
    workers: usize,
    progress: Option<&ProgressBar>,
) -> Vec<FileReport> {
    let mut indexed: Vec<(usize, FileReport)> = stream::iter(files.into_iter().enumerate())
        .map(|(index, path)| {
            let parser = Arc::clone(&parser);
            let sink = sink.clone();
            let device = device.clone();
            async move {
                let report = parse_one(path, parser, sink, device).await;
                (index, report)
            }
        })
        .buffer_unordered(workers.max(1))
        .inspect(|(_, report)| {
            if let Some(pb) = progress {
                pb.inc(1);
                pb.set_message(
                    report
                        .path
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_default(),
                );
            }
        })
        .collect()
        .await;

    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, report)| report).collect()
}

async fn parse_one(
    path: PathBuf,
    parser: Arc<DexParser>,
    sink: Option<Arc<dyn ReadSink>>,
    device: Option<String>,
) -> FileReport {
    let mut report = FileReport {
        path: path.clone(),
        read_id: None,
        stats: None,
        result: None,
        error: None,
    };

    let text = match read_source(&path).await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            report.error = Some(e.to_string());
            return report;
        }
    };

    let task_path = path.clone();
    let joined = tokio::task::spawn_blocking(move || -> Result<(DexReadResult, Option<StoredRead>)> {
        let result = parser.parse_str(&text);
        let stored = match sink {
            Some(sink) => {
                let mut source = SourceRead::new(text).with_path(task_path);
                if let Some(device) = device {
                    source = source.with_device(device);
                }
                Some(sink.store(&source, &result)?)
            }
            None => None,
        };
        Ok((result, stored))
    })
    .await;

    match joined {
        Ok(Ok((result, stored))) => {
            debug!(
                "Parsed {}: {} records, {} selections, {} issues",
                path.display(),
                result.records.len(),
                result.selections.len(),
                result.issues.len()
            );
            if !result.success {
                warn!("No DEX segments found in {}", path.display());
            }
            report.read_id = stored.map(|s| s.read_id);
            report.stats = Some(result.stats());
            report.result = Some(result);
        }
        Ok(Err(e)) => {
            error!("Failed to store read for {}: {}", path.display(), e);
            report.error = Some(e.to_string());
        }
        Err(e) => {
            error!("Parse task for {} failed: {}", path.display(), e);
            report.error = Some(format!("parse task failed: {}", e));
        }
    }

    report
}

fn summarize(reports: &[FileReport], start_time: Instant) -> RunSummary {
    let mut summary = RunSummary::default();

    for report in reports {
        if report.error.is_some() {
            summary.files_failed += 1;
        }
        if let Some(result) = &report.result {
            summary.files_parsed += 1;
            summary.selections += result.selections.len();
            summary.issues += result.issues.len();
            if !result.success {
                summary.reads_failed += 1;
            }
        }
        if report.read_id.is_some() {
            summary.reads_stored += 1;
        }
    }

    summary.processing_time = start_time.elapsed();
    summary
}

fn print_human_report(reports: &[FileReport], summary: &RunSummary, show_issues: bool) {
    for report in reports {
        println!("\n{}", report.path.display().to_string().bright_white().bold());

        if let Some(error) = &report.error {
            println!("   {} {}", "✗".bright_red(), error.red());
            continue;
        }

        let (Some(result), Some(stats)) = (&report.result, &report.stats) else {
            continue;
        };

        if !result.success {
            println!("   {} no DEX segments found", "✗".bright_red());
        }

        println!(
            "   • Dialect: {}{}",
            result.dialect.to_string().cyan(),
            result
                .manufacturer_code
                .as_ref()
                .map(|code| format!(" ({})", code))
                .unwrap_or_default()
        );
        println!(
            "   • Records: {} mapped, {} failed, {} unknown ({:.1}% success)",
            stats.records_mapped, stats.records_failed, stats.unknown_records,
            stats.success_rate()
        );
        println!(
            "   • Selections: {} in a {}x{} grid ({})",
            stats.selections,
            result.grid.rows,
            result.grid.columns,
            result.grid.convention.description()
        );
        if let Some(read_id) = &report.read_id {
            println!("   • Stored as: {}", read_id);
        }

        print_issues(result, show_issues);
    }

    println!("\n{}", "DEX Parsing Summary".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Files parsed: {}", summary.files_parsed);
    if summary.files_failed > 0 {
        println!(
            "   • Files failed: {}",
            summary.files_failed.to_string().bright_red().bold()
        );
    }
    println!("   • Selections: {}", summary.selections);
    println!("   • Issues: {}", summary.issues);
    if summary.reads_stored > 0 {
        println!("   • Reads stored: {}", summary.reads_stored);
    }
    println!("   • Processing time: {}", HumanDuration(summary.processing_time));
    println!();
}

fn print_issues(result: &DexReadResult, show_issues: bool) {
    if result.issues.is_empty() {
        return;
    }

    if show_issues {
        for issue in &result.issues {
            let line = issue.to_string();
            if issue.kind.is_warning() {
                println!("     {}", line.yellow());
            } else {
                println!("     {}", line.red());
            }
        }
        return;
    }

    let mut kinds: Vec<IssueKind> = result.issues.iter().map(|issue| issue.kind).collect();
    kinds.sort();
    kinds.dedup();

    let counts: Vec<String> = kinds
        .iter()
        .map(|kind| format!("{} {}", result.issue_count(*kind), kind))
        .collect();
    println!("   • Issues: {}", counts.join(", ").yellow());
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    files: &'a [FileReport],
}

fn print_json_report(reports: &[FileReport], summary: &RunSummary) -> Result<()> {
    let report = JsonReport {
        summary,
        files: reports,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| Error::serialization("Failed to serialize parse report", e))?;
    println!("{}", json);
    Ok(())
}
