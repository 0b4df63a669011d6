//! Data loader for discovering and parsing CDR export files
//!
//! The self-service portal lets subscribers download their call-detail
//! records as JSON exports. Each export file holds the portal's response
//! envelope (`{ "cdrData": [ ... ] }`). Settled records live in files named
//! `settled*.json`, provisional records in `provisional*.json`.
//!
//! # Discovery
//!
//! Export directories are searched in this order:
//! - the `CDRSTAT_EXPORT_PATH` environment variable,
//! - `~/.cdrstat/exports`,
//! - the platform data directory (e.g. `~/.local/share/cdrstat/exports`).
//!
//! # Examples
//!
//! ```no_run
//! use cdrstat_provider_export::ExportDataLoader;
//! use cdrstat_core::{filters::Period, source::CdrSource};
//!
//! # async fn example() -> cdrstat_core::Result<()> {
//! let loader = ExportDataLoader::new().await?;
//! let settled = loader.fetch_settled(&Period::new()).await?;
//! println!("{} settled records", settled.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use cdrstat_core::error::{CdrstatError, Result};
use cdrstat_core::filters::Period;
use cdrstat_core::source::CdrSource;
use cdrstat_core::types::{CdrRecord, ProvisionalCdrRecord};
use futures::StreamExt;
use futures::stream;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File name prefix for settled record exports
const SETTLED_PREFIX: &str = "settled";
/// File name prefix for provisional record exports
const PROVISIONAL_PREFIX: &str = "provisional";
/// Number of export files read concurrently
const READ_CONCURRENCY: usize = 4;

/// Portal response envelope wrapped around every export file
#[derive(Debug, Deserialize)]
struct ExportEnvelope<T> {
    #[serde(rename = "cdrData")]
    cdr_data: Vec<T>,
}

/// Data loader for CDR export directories
///
/// Implements [`CdrSource`] over JSON export files, standing in for the
/// portal's GraphQL endpoint. Records are returned in file order (files
/// sorted by path, records in file order within each file) so that repeated
/// loads of the same exports produce identical snapshots.
pub struct ExportDataLoader {
    /// Discovered export directories
    export_paths: Vec<PathBuf>,
    /// Whether to show a progress spinner while reading files
    show_progress: bool,
}

impl ExportDataLoader {
    /// Create a new loader by discovering export directories
    ///
    /// # Errors
    ///
    /// Returns [`CdrstatError::NoExportDirectory`] when no export directory
    /// exists in any of the searched locations.
    pub async fn new() -> Result<Self> {
        let paths = Self::discover_export_paths();
        if paths.is_empty() {
            return Err(CdrstatError::NoExportDirectory);
        }

        debug!("Discovered {} CDR export directories", paths.len());
        Ok(Self {
            export_paths: paths,
            show_progress: false,
        })
    }

    /// Create a loader over an explicit export directory, bypassing discovery
    pub fn with_root(path: impl Into<PathBuf>) -> Self {
        Self {
            export_paths: vec![path.into()],
            show_progress: false,
        }
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The export directories this loader reads from
    pub fn paths(&self) -> &[PathBuf] {
        &self.export_paths
    }

    /// Discover export directories on the system
    fn discover_export_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Environment variable override wins
        if let Ok(custom_path) = std::env::var("CDRSTAT_EXPORT_PATH") {
            let path = PathBuf::from(custom_path);
            if path.exists() {
                paths.push(path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".cdrstat").join("exports");
            if path.exists() {
                paths.push(path);
            }
        }

        if let Some(data_dir) = dirs::data_dir() {
            let path = data_dir.join("cdrstat").join("exports");
            if path.exists() {
                paths.push(path);
            }
        }

        paths
    }

    /// Collect export files matching a name prefix, sorted by path
    fn export_files(&self, prefix: &str) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in &self.export_paths {
            for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && Self::matches_prefix(entry.path(), prefix) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
        files.sort();
        files
    }

    fn matches_prefix(path: &Path, prefix: &str) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.starts_with(prefix) && name.ends_with(".json")
    }

    /// Read and parse all export files for a prefix
    ///
    /// A file that cannot be read or parsed is skipped with a warning;
    /// exports are carrier downloads and a single truncated file must not
    /// hide the rest of the history.
    async fn load_records<T: DeserializeOwned>(&self, prefix: &str) -> Vec<T> {
        let files = self.export_files(prefix);
        debug!(count = files.len(), prefix, "loading CDR export files");

        let progress = if self.show_progress && !files.is_empty() {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} {pos}/{len} files")
                    .unwrap(),
            );
            pb.set_message(format!("Reading {prefix} exports"));
            Some(pb)
        } else {
            None
        };

        // Read files concurrently, but keep file order deterministic
        let contents: Vec<(PathBuf, std::io::Result<Vec<u8>>)> = stream::iter(files)
            .map(|file| async move {
                let bytes = tokio::fs::read(&file).await;
                (file, bytes)
            })
            .buffered(READ_CONCURRENCY)
            .collect()
            .await;

        let mut records = Vec::new();
        for (file, bytes) in contents {
            match bytes {
                Ok(bytes) => match serde_json::from_slice::<ExportEnvelope<T>>(&bytes) {
                    Ok(envelope) => {
                        debug!(
                            file = %file.display(),
                            records = envelope.cdr_data.len(),
                            "parsed CDR export file"
                        );
                        records.extend(envelope.cdr_data);
                    }
                    Err(error) => {
                        warn!(file = %file.display(), %error, "skipping unparseable CDR export file");
                    }
                },
                Err(error) => {
                    warn!(file = %file.display(), %error, "skipping unreadable CDR export file");
                }
            }
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        records
    }
}

#[async_trait]
impl CdrSource for ExportDataLoader {
    async fn fetch_settled(&self, period: &Period) -> Result<Vec<CdrRecord>> {
        let mut records: Vec<CdrRecord> = self.load_records(SETTLED_PREFIX).await;
        records.retain(|r| period.matches_start_date(&r.start_date));
        Ok(records)
    }

    async fn fetch_provisional(&self, period: &Period) -> Result<Vec<ProvisionalCdrRecord>> {
        let mut records: Vec<ProvisionalCdrRecord> = self.load_records(PROVISIONAL_PREFIX).await;
        records.retain(|r| period.matches_start_date(&r.start_date));
        Ok(records)
    }
}
