//! Writing run artifacts to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Enriched input table.
pub const ENRICHED_FILE: &str = "emails_enriched.csv";
/// Category and priority totals.
pub const SUMMARY_FILE: &str = "summary_by_category_priority.csv";
/// Per-sender totals.
pub const SENDER_FILE: &str = "summary_by_sender.csv";
/// Rendered report.
pub const REPORT_FILE: &str = "report.md";

/// Serialized contents of every artifact produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `emails_enriched.csv` contents.
    pub enriched: Vec<u8>,
    /// `summary_by_category_priority.csv` contents.
    pub summary: Vec<u8>,
    /// `summary_by_sender.csv` contents.
    pub senders: Vec<u8>,
    /// `report.md` contents.
    pub report: String,
}

/// Where each artifact was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Enriched table path.
    pub enriched: PathBuf,
    /// Category summary path.
    pub summary: PathBuf,
    /// Sender summary path.
    pub senders: PathBuf,
    /// Report path.
    pub report: PathBuf,
}

impl ArtifactPaths {
    /// Paths of the four artifacts inside `out_dir`.
    #[must_use]
    pub fn in_dir(out_dir: &Path) -> Self {
        Self {
            enriched: out_dir.join(ENRICHED_FILE),
            summary: out_dir.join(SUMMARY_FILE),
            senders: out_dir.join(SENDER_FILE),
            report: out_dir.join(REPORT_FILE),
        }
    }
}

impl Artifacts {
    /// Writes all four artifacts into `out_dir`, creating it if needed.
    ///
    /// Targets that cannot be replaced (such as directories) are rejected
    /// before anything is written. Every file is then staged as a temporary
    /// file in `out_dir` and renamed into place only once all four are
    /// staged. If a rename still fails, the targets already renamed are
    /// restored to their previous contents, or removed if they are new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateDir`] or [`Error::WriteArtifact`] naming the
    /// path that failed.
    pub fn write_to(&self, out_dir: &Path) -> Result<ArtifactPaths> {
        std::fs::create_dir_all(out_dir).map_err(|e| Error::CreateDir {
            path: out_dir.to_path_buf(),
            source: e,
        })?;

        let paths = ArtifactPaths::in_dir(out_dir);
        for target in [&paths.enriched, &paths.summary, &paths.senders, &paths.report] {
            ensure_replaceable(target)?;
        }

        let staged = [
            (stage(out_dir, &paths.enriched, &self.enriched)?, &paths.enriched),
            (stage(out_dir, &paths.summary, &self.summary)?, &paths.summary),
            (stage(out_dir, &paths.senders, &self.senders)?, &paths.senders),
            (stage(out_dir, &paths.report, self.report.as_bytes())?, &paths.report),
        ];

        let mut renamed: Vec<(&Path, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
        for (file, target) in staged {
            let previous = std::fs::read(target).ok();
            if let Err(e) = file.persist(target) {
                roll_back(&renamed);
                return Err(Error::WriteArtifact {
                    path: target.clone(),
                    source: e.error,
                });
            }
            debug!("Wrote {}", target.display());
            renamed.push((target.as_path(), previous));
        }

        Ok(paths)
    }
}

fn ensure_replaceable(target: &Path) -> Result<()> {
    match std::fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => Err(Error::WriteArtifact {
            path: target.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::IsADirectory,
                "a directory is in the way",
            ),
        }),
        _ => Ok(()),
    }
}

// Undoes renames in reverse order: old contents are put back, new files removed.
fn roll_back(renamed: &[(&Path, Option<Vec<u8>>)]) {
    for (target, previous) in renamed.iter().rev() {
        let restored = match previous {
            Some(contents) => std::fs::write(target, contents),
            None => std::fs::remove_file(target),
        };
        if let Err(e) = restored {
            warn!("Could not roll back {}: {e}", target.display());
        }
    }
}

fn stage(out_dir: &Path, target: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let write_err = |source: std::io::Error| Error::WriteArtifact {
        path: target.to_path_buf(),
        source,
    };
    let mut file = NamedTempFile::new_in(out_dir).map_err(write_err)?;
    file.write_all(contents).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    Ok(file)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn artifacts() -> Artifacts {
        Artifacts {
            enriched: b"sender\n".to_vec(),
            summary: b"categories,priority,count\n".to_vec(),
            senders: b"sender,categories,priority,count\n".to_vec(),
            report: "# Support Triage Report".to_string(),
        }
    }

    #[test]
    fn test_write_creates_directory_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("outputs");

        let paths = artifacts().write_to(&out).unwrap();

        assert_eq!(paths, ArtifactPaths::in_dir(&out));
        assert_eq!(std::fs::read(&paths.enriched).unwrap(), b"sender\n");
        assert_eq!(
            std::fs::read_to_string(&paths.report).unwrap(),
            "# Support Triage Report"
        );
        // Only the four artifacts remain; staging files are gone.
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 4);
    }

    #[test]
    fn test_write_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        artifacts().write_to(dir.path()).unwrap();

        let mut second = artifacts();
        second.report = "# Second".to_string();
        let paths = second.write_to(dir.path()).unwrap();

        assert_eq!(std::fs::read_to_string(paths.report).unwrap(), "# Second");
    }

    #[test]
    fn test_blocked_target_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join(REPORT_FILE);
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), "x").unwrap();

        let err = artifacts().write_to(dir.path()).unwrap_err();

        assert!(matches!(err, Error::WriteArtifact { ref path, .. } if path == &blocked));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, [REPORT_FILE]);
    }

    #[test]
    fn test_blocked_target_keeps_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let first = artifacts().write_to(dir.path()).unwrap();
        std::fs::remove_file(&first.report).unwrap();
        std::fs::create_dir(&first.report).unwrap();

        let mut second = artifacts();
        second.enriched = b"changed\n".to_vec();
        assert!(second.write_to(dir.path()).is_err());

        assert_eq!(std::fs::read(&first.enriched).unwrap(), b"sender\n");
    }

    #[test]
    fn test_roll_back_restores_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let replaced = dir.path().join(SUMMARY_FILE);
        let created = dir.path().join(SENDER_FILE);
        std::fs::write(&replaced, "new summary").unwrap();
        std::fs::write(&created, "new senders").unwrap();

        roll_back(&[
            (replaced.as_path(), Some(b"old summary".to_vec())),
            (created.as_path(), None),
        ]);

        assert_eq!(std::fs::read_to_string(&replaced).unwrap(), "old summary");
        assert!(!created.exists());
    }

    #[test]
    fn test_write_fails_when_out_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("outputs");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = artifacts().write_to(&blocker).unwrap_err();
        assert!(matches!(err, Error::CreateDir { path, .. } if path == blocker));
    }
}
