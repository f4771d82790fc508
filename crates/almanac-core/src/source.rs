// Shared plumbing for the secondary (non-roster) data sources.
//
// Every secondary load is fault-isolated: it either produces its payload or a
// `Diagnostic`, and the pipeline substitutes an empty payload for the latter.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::warn;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// The secondary datasets the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Batting,
    Pitching,
    HallOfFame,
    Awards,
    AllStars,
    TeamRecords,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Batting => "batting stats",
            SourceKind::Pitching => "pitching stats",
            SourceKind::HallOfFame => "hall of fame",
            SourceKind::Awards => "player awards",
            SourceKind::AllStars => "all-star appearances",
            SourceKind::TeamRecords => "team records",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Problems with the contents of a table, independent of where it came from.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed table {path}: {source}")]
    Malformed { path: PathBuf, source: TableError },
}

// ---------------------------------------------------------------------------
// Fault isolation
// ---------------------------------------------------------------------------

/// A non-fatal problem with one source, kept for the end-of-run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: SourceKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Outcome of loading one secondary source.
#[derive(Debug)]
pub enum Loaded<T> {
    Ready(T),
    Unavailable(Diagnostic),
}

impl<T: Default> Loaded<T> {
    /// Wrap a loader result, logging a warning when the source is unusable.
    pub fn from_result(source: SourceKind, result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => Loaded::Ready(value),
            Err(e) => {
                warn!("{source} unavailable, continuing without it: {e}");
                Loaded::Unavailable(Diagnostic {
                    source,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Take the payload, or an empty one, recording the diagnostic if any.
    pub fn or_empty(self, diagnostics: &mut Vec<Diagnostic>) -> T {
        match self {
            Loaded::Ready(value) => value,
            Loaded::Unavailable(diagnostic) => {
                diagnostics.push(diagnostic);
                T::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Table helpers
// ---------------------------------------------------------------------------

/// Open a CSV file and hand it to `parse`, attaching the path to any failure.
pub fn load_table<T>(
    path: &Path,
    parse: impl FnOnce(File) -> Result<T, TableError>,
) -> Result<T, SourceError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    parse(file).map_err(|e| SourceError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fail fast when a table lacks a column its loader depends on.
pub fn require_columns(
    headers: &csv::StringRecord,
    columns: &[&'static str],
) -> Result<(), TableError> {
    for &column in columns {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(TableError::MissingColumn(column));
        }
    }
    Ok(())
}

/// Parse a counting-stat cell. Empty, unparseable, negative and non-finite
/// values read as zero; decimals are truncated.
pub fn parse_count(cell: &str) -> u32 {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.trunc() as u32,
        _ => 0,
    }
}

/// Parse a season cell. `None` when empty or not a year.
pub fn parse_season(cell: &str) -> Option<u16> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(year) = cell.parse::<u16>() {
        return Some(year);
    }
    // Some exports write integer columns as floats ("1927.0").
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && (1.0..10000.0).contains(&v) => Some(v as u16),
        _ => None,
    }
}

/// Serde adapter for counting-stat columns; never fails on cell content.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<String>::deserialize(deserializer)?;
    Ok(cell.as_deref().map(parse_count).unwrap_or(0))
}

/// Like `lenient_count`, but keeps "empty" distinct from zero so that
/// alternate column spellings can fall back to each other.
pub(crate) fn lenient_count_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<String>::deserialize(deserializer)?;
    Ok(cell
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(parse_count))
}

/// Serde adapter for text key columns: trims, missing reads as empty.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<String>::deserialize(deserializer)?;
    Ok(cell.map(|c| c.trim().to_string()).unwrap_or_default())
}
