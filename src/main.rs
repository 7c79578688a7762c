//! todoport
//!
//! Converts Microsoft To Do task exports into Super Productivity backup
//! files that the app can restore from its settings screen.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use todoport::backup::Backup;
use todoport::cli::convert::ConvertArgs;
use todoport::cli::info::InfoArgs;
use todoport::cli::{Cli, Command};
use todoport::config::ConvertConfig;
use todoport::convert::convert;
use todoport::report::ConversionSummary;
use todoport::source::TodoExport;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // Explicit --config must load; the default locations may silently
    // fall through to defaults.
    let config = match &cli.config {
        Some(path) => ConvertConfig::load(path)
            .with_context(|| format!("Failed to load config file {}", path))?,
        None => ConvertConfig::load_or_default(),
    };

    match cli.command {
        Command::Convert(args) => {
            run_convert(&config, args)?;
        }
        Command::Info(args) => {
            run_info(args)?;
        }
    }

    Ok(())
}

/// Run the convert command
fn run_convert(config: &ConvertConfig, args: ConvertArgs) -> Result<()> {
    let export = TodoExport::from_file(&args.input)
        .with_context(|| format!("Failed to read export file {}", args.input.display()))?;

    let (backup, summary) = convert(&export, config);

    // Serialize to JSON
    let json_output = if args.compact {
        backup.to_json()?
    } else {
        backup.to_json_pretty()?
    };
    let json_bytes = json_output.as_bytes();

    // Determine if we should compress
    let should_compress = args.should_compress(Some(json_bytes.len() as u64));

    if args.dry_run {
        println!("Dry run results:");
        print_summary(&summary);
        println!("  Output size: {} bytes", json_bytes.len());
        println!("  Would compress: {}", should_compress);
        return Ok(());
    }

    // Write output
    if let Some(ref path) = args.output {
        if should_compress {
            // Write gzipped
            use flate2::Compression;
            use flate2::write::GzEncoder;

            let file = std::fs::File::create(path)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(json_bytes)?;
            encoder.finish()?;
            eprintln!("Converted to {} (gzipped)", path.display());
        } else {
            // Write plain JSON
            std::fs::write(path, &json_output)?;
            eprintln!("Converted to {}", path.display());
        }

        println!("Conversion complete:");
        print_summary(&summary);
    } else {
        // Write to stdout; the summary would corrupt the stream, so it
        // only goes to the log here
        if should_compress {
            use flate2::Compression;
            use flate2::write::GzEncoder;

            let stdout = std::io::stdout();
            let mut encoder = GzEncoder::new(stdout.lock(), Compression::default());
            encoder.write_all(json_bytes)?;
            let _ = encoder.finish()?;
        } else {
            print!("{}", json_output);
        }
    }

    Ok(())
}

fn print_summary(summary: &ConversionSummary) {
    println!("  Projects: {}", summary.projects);
    println!("  Tasks: {}", summary.tasks);
    println!("  Subtasks: {}", summary.sub_tasks);
    println!("  Tags: {}", summary.tags);
    println!("  Repeat configs: {}", summary.repeat_cfgs);
    println!("  Reminders: {}", summary.reminders);
    if summary.skipped_tasks > 0 {
        println!("  Skipped tasks: {}", summary.skipped_tasks);
    }
    if !summary.warnings.is_empty() {
        println!("  Warnings:");
        for warning in &summary.warnings {
            println!("    - {}", warning);
        }
    }
}

/// Run the info command
fn run_info(args: InfoArgs) -> Result<()> {
    let backup = Backup::from_file(&args.file)
        .with_context(|| format!("Failed to read backup file {}", args.file.display()))?;

    let created = chrono::DateTime::from_timestamp_millis(backup.timestamp)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| backup.timestamp.to_string());

    println!("Backup info:");
    println!(
        "  File: {}{}",
        args.file.display(),
        if args.is_gzipped() { " (gzipped)" } else { "" }
    );
    println!("  Created: {}", created);
    println!("  Model version: {}", backup.cross_model_version);
    println!("  Projects: {}", backup.data.project.len());
    println!("  Tasks: {}", backup.data.task.len());
    println!("  Tags: {}", backup.data.tag.len());
    println!("  Repeat configs: {}", backup.data.task_repeat_cfg.len());
    println!("  Reminders: {}", backup.data.reminders.len());

    Ok(())
}
