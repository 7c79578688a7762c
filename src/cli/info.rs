//! Info subcommand for the todoport CLI
//!
//! Prints summary information about a previously written backup file
//! without converting anything.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the info subcommand
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the backup file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl InfoArgs {
    /// Check if this is a gzipped file based on extension
    pub fn is_gzipped(&self) -> bool {
        self.file.extension().is_some_and(|ext| ext == "gz")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gzipped() {
        let args = InfoArgs {
            file: PathBuf::from("backup.json"),
        };
        assert!(!args.is_gzipped());

        let args = InfoArgs {
            file: PathBuf::from("backup.json.gz"),
        };
        assert!(args.is_gzipped());
    }
}
