//! Convert subcommand for the todoport CLI
//!
//! Converts a To Do export file into a backup file the destination app
//! can restore from its settings screen.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the convert subcommand
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Export file to convert (plain JSON or gzip)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Force gzip compression (auto-detected from .gz extension otherwise)
    #[arg(long)]
    pub gzip: bool,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Parse and convert, report what would be written, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Automatically compress if output exceeds this size
    ///
    /// Accepts human-readable sizes: 100KB, 1MB, etc.
    /// If the uncompressed output exceeds this threshold, the output
    /// will be gzip compressed.
    #[arg(long, value_name = "SIZE")]
    pub compress_threshold: Option<String>,
}

impl ConvertArgs {
    /// Parse the compress threshold into bytes
    pub fn compress_threshold_bytes(&self) -> Option<u64> {
        self.compress_threshold.as_ref().and_then(|s| parse_size(s))
    }

    /// Determine if output should be compressed based on args and filename
    pub fn should_compress(&self, output_size: Option<u64>) -> bool {
        // Explicit --gzip flag always wins
        if self.gzip {
            return true;
        }

        // Check if output filename ends with .gz
        if let Some(ref path) = self.output
            && path.extension().is_some_and(|ext| ext == "gz")
        {
            return true;
        }

        // Check against threshold if provided
        if let (Some(threshold), Some(size)) = (self.compress_threshold_bytes(), output_size) {
            return size > threshold;
        }

        false
    }
}

/// Parse a human-readable size string into bytes
///
/// Supports: B, KB, MB, GB (case-insensitive)
fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();

    if let Some(num) = s.strip_suffix("GB") {
        num.trim()
            .parse::<u64>()
            .ok()
            .map(|n| n * 1024 * 1024 * 1024)
    } else if let Some(num) = s.strip_suffix("MB") {
        num.trim().parse::<u64>().ok().map(|n| n * 1024 * 1024)
    } else if let Some(num) = s.strip_suffix("KB") {
        num.trim().parse::<u64>().ok().map(|n| n * 1024)
    } else if let Some(num) = s.strip_suffix('B') {
        num.trim().parse::<u64>().ok()
    } else {
        // Try parsing as plain number (bytes)
        s.parse::<u64>().ok()
    }
}
