//! Best-effort removal of temp files
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::PhotocastError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupStatus {
    Removed,
    /// Nothing to delete
    Missing,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: CleanupStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub outcomes: Vec<CleanupOutcome>,
}

impl CleanupReport {
    pub fn removed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == CleanupStatus::Removed)
            .count()
    }

    pub fn failures(&self) -> Vec<PhotocastError> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                CleanupStatus::Failed { reason } => Some(PhotocastError::FileCleanupFailed {
                    path: o.path.clone(),
                    reason: reason.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| !matches!(o.status, CleanupStatus::Failed { .. }))
    }

    /// One warn line for all failures; silent when everything went away
    pub fn log(&self) {
        let failures = self.failures();
        if failures.is_empty() {
            debug!(removed = self.removed(), "temp files cleaned up");
            return;
        }
        let detail = failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        warn!(
            failed = failures.len(),
            removed = self.removed(),
            "temp file cleanup incomplete: {}",
            detail
        );
    }
}

/// Deletes every path, never stopping at the first failure.
pub async fn remove_files(paths: &[PathBuf]) -> CleanupReport {
    let mut outcomes = Vec::with_capacity(paths.len());
    for path in paths {
        outcomes.push(CleanupOutcome {
            path: path.clone(),
            status: remove_one(path).await,
        });
    }
    CleanupReport { outcomes }
}

async fn remove_one(path: &Path) -> CleanupStatus {
    match tokio::fs::remove_file(path).await {
        Ok(()) => CleanupStatus::Removed,
        Err(e) if e.kind() == ErrorKind::NotFound => CleanupStatus::Missing,
        Err(e) => CleanupStatus::Failed {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_removes_existing_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.jpg");
        std::fs::write(&present, b"jpeg").unwrap();
        let absent = dir.path().join("b.jpg");

        let report = remove_files(&[present.clone(), absent.clone()]).await;

        assert!(!present.exists());
        assert_eq!(report.removed(), 1);
        assert_eq!(report.outcomes[1].status, CleanupStatus::Missing);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be removed with remove_file
        let not_a_file = dir.path().join("nested");
        std::fs::create_dir(&not_a_file).unwrap();
        let after = dir.path().join("c.jpg");
        std::fs::write(&after, b"jpeg").unwrap();

        let report = remove_files(&[not_a_file.clone(), after.clone()]).await;

        assert!(!after.exists());
        assert!(!report.is_clean());
        assert_eq!(report.failures().len(), 1);
        assert!(matches!(
            &report.failures()[0],
            PhotocastError::FileCleanupFailed { path, .. } if path == &not_a_file
        ));
    }
}
