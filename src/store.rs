use crate::error::ReportError;
use crate::types::ReportFile;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use globset::{Glob, GlobMatcher};
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

const REPORT_EXTENSION: &str = ".json";
const API_PREFIX: &str = "/api/reports";

/// A report file found in the data directory
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub filename: String,
    /// Filename without the `.json` extension
    pub name: String,
    /// Size in bytes
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// API path serving this report
    pub path: String,
}

/// Read-only access to the report files in one directory
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
    matcher: GlobMatcher,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>, pattern: &str) -> anyhow::Result<Self> {
        let matcher = Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid report pattern '{}': {}", pattern, e))?
            .compile_matcher();
        Ok(Self {
            dir: dir.into(),
            matcher,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List report files, most recently modified first
    pub async fn list(&self) -> Result<Vec<ReportEntry>, ReportError> {
        debug!("Listing reports in {}", self.dir.display());
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        let mut candidates = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if filename.ends_with(REPORT_EXTENSION) && self.matcher.is_match(&filename) {
                candidates.push((filename, entry.path()));
            } else {
                trace!("Skipping {}", filename);
            }
        }

        let stats = join_all(
            candidates
                .iter()
                .map(|(_, path)| tokio::fs::metadata(path)),
        )
        .await;

        let mut entries = Vec::with_capacity(candidates.len());
        for ((filename, path), meta) in candidates.into_iter().zip(stats) {
            let meta = match meta {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Failed to stat {}: {}", path.display(), e);
                    continue;
                }
            };
            let modified = meta.modified().map(DateTime::<Utc>::from)?;
            entries.push(ReportEntry {
                name: filename
                    .strip_suffix(REPORT_EXTENSION)
                    .unwrap_or(&filename)
                    .to_string(),
                path: format!("{}/{}", API_PREFIX, filename),
                size: meta.len(),
                modified,
                filename,
            });
        }

        entries.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        debug!("Found {} reports", entries.len());
        Ok(entries)
    }

    /// Read a report as raw JSON after validating its minimal shape
    pub async fn read(&self, filename: &str) -> Result<Value, ReportError> {
        let path = self.resolve(filename)?;
        let not_found = || ReportError::NotFound(format!("No report named {}", filename));
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(not_found()),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        }
        let content = match tokio::fs::read(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        let value: Value = serde_json::from_slice(&content).map_err(|e| {
            ReportError::InvalidReport(format!("{} is not valid JSON: {}", filename, e))
        })?;
        validate_shape(&value).map_err(|missing| {
            ReportError::InvalidReport(format!("{} is missing {}", filename, missing))
        })?;
        Ok(value)
    }

    /// Read a report into the typed model
    pub async fn read_typed(&self, filename: &str) -> Result<ReportFile, ReportError> {
        let value = self.read(filename).await?;
        serde_json::from_value(value).map_err(|e| {
            ReportError::InvalidReport(format!("{} has malformed violations: {}", filename, e))
        })
    }

    /// Most recently modified report with its content
    pub async fn latest(&self) -> Result<(ReportEntry, Value), ReportError> {
        let entry = self
            .list()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::NotFound("No reports available".to_string()))?;
        let data = self.read(&entry.filename).await?;
        Ok((entry, data))
    }

    /// Name of the most recently modified report
    pub async fn latest_filename(&self) -> Result<String, ReportError> {
        self.list()
            .await?
            .into_iter()
            .next()
            .map(|e| e.filename)
            .ok_or_else(|| ReportError::NotFound("No reports available".to_string()))
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, ReportError> {
        if !is_safe_filename(filename) {
            return Err(ReportError::InvalidFilename(format!(
                "{} is not a report filename",
                filename
            )));
        }
        Ok(self.dir.join(filename))
    }
}

fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
        && filename.ends_with(REPORT_EXTENSION)
}

/// Require `report.metadata` to be an object and `report.violations` an array,
/// returning the first key that is missing or of the wrong type
fn validate_shape(value: &Value) -> Result<(), &'static str> {
    let report = value
        .get("report")
        .filter(|r| r.is_object())
        .ok_or("report object")?;
    report
        .get("metadata")
        .and_then(Value::as_object)
        .ok_or("report.metadata object")?;
    report
        .get("violations")
        .and_then(Value::as_array)
        .ok_or("report.violations array")?;
    Ok(())
}
