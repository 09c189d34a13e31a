//! Batch application of staged tag values.
//!
//! Files are written strictly one after another. A failed save is recorded
//! and the batch moves on; nothing is retried.

use crate::cancel::CancelToken;
use crate::tags::TagHandle;
use crate::ui::output;
use crate::utils::progress::create_progress_bar;
use crate::workset::{UnreadableFile, WorkingSet};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Applied,
    SkippedUnreadable(String),
    SkippedByUser,
    SaveFailed(String),
    /// Left untouched because the batch was interrupted before reaching it
    NotReached,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub results: Vec<FileResult>,
    /// The batch stopped early on an interrupt
    pub interrupted: bool,
}

impl BatchReport {
    pub fn from_unreadable(unreadable: &[UnreadableFile]) -> Self {
        Self {
            results: unreadable
                .iter()
                .map(|u| FileResult {
                    path: u.path.clone(),
                    status: FileStatus::SkippedUnreadable(u.reason.clone()),
                })
                .collect(),
            interrupted: false,
        }
    }

    pub fn push(&mut self, path: PathBuf, status: FileStatus) {
        self.results.push(FileResult { path, status });
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }

    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Applied))
    }

    pub fn skipped_unreadable(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::SkippedUnreadable(_)))
    }

    pub fn skipped_by_user(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::SkippedByUser))
    }

    pub fn save_failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::SaveFailed(_)))
    }

    pub fn not_reached(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::NotReached))
    }

    pub fn status_of(&self, path: &std::path::Path) -> Option<&FileStatus> {
        self.results
            .iter()
            .find(|r| r.path == path)
            .map(|r| &r.status)
    }
}

/// Write and commit every file that has pending values.
///
/// Consumes the working set so no handle outlives its batch. The cancel
/// token is polled between files only; a commit in progress always finishes.
pub fn apply_batch<H: TagHandle>(set: WorkingSet<H>, cancel: &CancelToken) -> BatchReport {
    let WorkingSet { files, unreadable } = set;
    let mut report = BatchReport::from_unreadable(&unreadable);

    let pb = create_progress_bar(files.len() as u64);

    for mut file in files {
        if cancel.is_cancelled() {
            if !report.interrupted {
                log::info!("Batch interrupted before {}", file.path.display());
                report.interrupted = true;
            }
            report.push(file.path, FileStatus::NotReached);
            pb.inc(1);
            continue;
        }

        pb.set_message(file.file_name());

        if !file.has_pending() {
            report.push(file.path, FileStatus::SkippedByUser);
            pb.inc(1);
            continue;
        }

        for (field, value) in &file.pending {
            file.handle.write(*field, value);
        }
        if let Some(cover) = &file.pending_cover {
            file.handle.set_cover(cover);
        }

        let status = match file.handle.commit() {
            Ok(()) => FileStatus::Applied,
            Err(err) => {
                log::error!("{err}");
                FileStatus::SaveFailed(err.to_string())
            }
        };
        pb.println(output::format_file_result(&file.path, &status));
        report.push(file.path, status);
        pb.inc(1);
    }

    pb.finish_and_clear();
    report
}
