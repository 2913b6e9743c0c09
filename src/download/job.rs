//! Per-job state and temporary file lifecycle

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use teloxide::types::MessageId;
use uuid::Uuid;

use crate::core::error::AppResult;
use crate::download::progress::ProgressTracker;

/// Scoped temporary directory for one job.
///
/// Every job downloads into `<root>/<job-id>/`, so two jobs fetching videos
/// with the same title never share a file. The directory is removed by
/// [`cleanup`](Self::cleanup), or on drop if cleanup never ran.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: PathBuf,
    released: bool,
}

impl JobWorkspace {
    /// Reserves the directory path; nothing is created until [`prepare`](Self::prepare).
    pub fn new(root: &Path, id: Uuid) -> Self {
        Self {
            dir: root.join(id.to_string()),
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory (and the download root if missing).
    pub async fn prepare(&self) -> AppResult<()> {
        fs_err::tokio::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Removes the directory and everything in it. Safe to call repeatedly.
    pub async fn cleanup(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        log_removal(&self.dir, fs_err::tokio::remove_dir_all(&self.dir).await);
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        // Backstop for a job dropped before cleanup; no runtime to await on here
        if !self.released {
            self.released = true;
            log_removal(&self.dir, fs_err::remove_dir_all(&self.dir));
        }
    }
}

fn log_removal(dir: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => log::debug!("Removed job directory {}", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove job directory: {}", e),
    }
}

/// Everything one download job carries from start to cleanup.
#[derive(Debug)]
pub struct DownloadJob {
    pub id: Uuid,
    pub source_url: String,
    /// Deliverable file, known once extraction succeeds
    pub target_path: Option<PathBuf>,
    pub status_message: MessageId,
    pub tracker: ProgressTracker,
    workspace: JobWorkspace,
}

impl DownloadJob {
    pub fn new(source_url: impl Into<String>, status_message: MessageId, download_dir: &Path) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            source_url: source_url.into(),
            target_path: None,
            status_message,
            tracker: ProgressTracker::new(),
            workspace: JobWorkspace::new(download_dir, id),
        }
    }

    pub fn workspace(&self) -> &JobWorkspace {
        &self.workspace
    }

    /// Deletes the downloaded file (if any) and the job directory.
    pub async fn release_files(&mut self) {
        if let Some(path) = self.target_path.take() {
            match fs_err::tokio::remove_file(&path).await {
                Ok(()) => log::info!("Job {}: removed {}", self.id, path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => log::warn!("Job {}: {}", self.id, e),
            }
        }
        self.workspace.cleanup().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_workspace_is_per_job() {
        let root = TempDir::new().unwrap();
        let a = JobWorkspace::new(root.path(), Uuid::new_v4());
        let b = JobWorkspace::new(root.path(), Uuid::new_v4());
        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(root.path()));
    }

    #[tokio::test]
    async fn test_prepare_creates_missing_root() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("downloads");
        let workspace = JobWorkspace::new(&nested, Uuid::new_v4());
        workspace.prepare().await.unwrap();
        assert!(workspace.path().is_dir());
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let root = TempDir::new().unwrap();
        let dir = {
            let workspace = JobWorkspace::new(root.path(), Uuid::new_v4());
            workspace.prepare().await.unwrap();
            std::fs::write(workspace.path().join("partial.webm.part"), b"data").unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_release_files_removes_target_and_directory() {
        let root = TempDir::new().unwrap();
        let mut job = DownloadJob::new("https://example.com/v", MessageId(1), root.path());
        job.workspace().prepare().await.unwrap();
        let file = job.workspace().path().join("Title.mp4");
        std::fs::write(&file, b"video").unwrap();
        job.target_path = Some(file.clone());

        job.release_files().await;
        assert!(!file.exists());
        assert!(!job.workspace().path().exists());
        assert!(job.workspace().is_released());

        // Second call is a no-op
        job.release_files().await;
    }

    #[tokio::test]
    async fn test_release_without_directory_is_quiet() {
        let root = TempDir::new().unwrap();
        let mut job = DownloadJob::new("bad input", MessageId(7), root.path());
        job.release_files().await;
        assert!(job.target_path.is_none());
        assert!(job.workspace().is_released());
    }

    #[tokio::test]
    async fn test_drop_after_cleanup_leaves_recreated_dir_alone() {
        let root = TempDir::new().unwrap();
        let mut workspace = JobWorkspace::new(root.path(), Uuid::new_v4());
        workspace.prepare().await.unwrap();
        workspace.cleanup().await;
        assert!(!workspace.path().exists());

        // Only one removal per workspace: the drop backstop must not run again
        let dir = workspace.path().to_path_buf();
        std::fs::create_dir(&dir).unwrap();
        drop(workspace);
        assert!(dir.exists());
    }
}
