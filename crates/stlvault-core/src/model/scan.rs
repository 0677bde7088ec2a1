/// Scan job records as reported by the backend.
///
/// A scan is an asynchronous server-side job; the client only ever reads it.
use super::nullable;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of a scan job.
///
/// Monotonic on the server: once `Completed` or `Failed`, a scan never moves
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl ScanStatus {
    /// `true` for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Parse the wire spelling. Unknown values map to `Pending`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<ScanStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(ScanStatus::parse).unwrap_or_default())
}

/// A scan job as returned by `GET /scans/{id}`.
///
/// Integer fields are normalised from the backend's nullable wrappers at the
/// deserialisation boundary, so the rest of the crate only sees plain `u64`s.
/// `processed <= found` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: ScanStatus,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub found: u64,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub processed: u64,
    /// Server-computed percentage. Not clamped client-side.
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub progress: u64,
    #[serde(default, deserialize_with = "nullable::deserialize_text")]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ScanRecord {
    /// A bare record with zeroed counters, mostly useful in tests and fakes.
    pub fn new(id: impl Into<String>, status: ScanStatus) -> Self {
        Self {
            id: id.into(),
            status,
            found: 0,
            processed: 0,
            progress: 0,
            error: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Files found but not yet processed, or `None` when nothing remains
    /// (including the `processed > found` case the server may report).
    pub fn remaining(&self) -> Option<u64> {
        match self.found.checked_sub(self.processed) {
            Some(0) | None => None,
            Some(n) => Some(n),
        }
    }
}

/// Response of `POST /scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScanResponse {
    pub scan_id: String,
}

/// One page of `GET /scans`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanList {
    #[serde(default)]
    pub items: Vec<ScanRecord>,
    #[serde(default)]
    pub total: u64,
}

/// Per-root-path result of a completed scan (`GET /scans/{id}/paths`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPath {
    pub id: String,
    #[serde(default)]
    pub scan_id: String,
    pub root_path: String,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub files_found: u64,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub files_inserted: u64,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub files_updated: u64,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub folders_found: u64,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub folders_inserted: u64,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub folders_updated: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Column sums over a set of [`ScanPath`] rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanPathTotals {
    pub files_found: u64,
    pub files_inserted: u64,
    pub folders_found: u64,
    pub folders_inserted: u64,
}

impl ScanPathTotals {
    pub fn from_paths(paths: &[ScanPath]) -> Self {
        paths.iter().fold(Self::default(), |acc, p| Self {
            files_found: acc.files_found.saturating_add(p.files_found),
            files_inserted: acc.files_inserted.saturating_add(p.files_inserted),
            folders_found: acc.folders_found.saturating_add(p.folders_found),
            folders_inserted: acc.folders_inserted.saturating_add(p.folders_inserted),
        })
    }
}
