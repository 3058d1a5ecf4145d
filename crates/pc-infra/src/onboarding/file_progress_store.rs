//! File-based onboarding progress store
//!
//! Persists the whole `WorkflowProgress` aggregate as one JSON document in the
//! application data directory. Writes go to a sibling temp file that is
//! synced and renamed over the target, so a crash mid-write never leaves a
//! half-written record behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use pc_core::config::PROGRESS_FILE_NAME;
use pc_core::onboarding::WorkflowProgress;
use pc_core::ports::{ProgressStoreError, ProgressStorePort};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const DEFAULT_PROGRESS_FILE: &str = PROGRESS_FILE_NAME;

pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    /// Create store with custom file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create store with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            path: base_dir.join(DEFAULT_PROGRESS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create progress dir failed: {}", parent.display()))?;
        }
        Ok(())
    }

    async fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir().await?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)
            .await
            .with_context(|| format!("create temp progress failed: {}", tmp_path.display()))?;
        file.write_all(content.as_bytes())
            .await
            .with_context(|| format!("write temp progress failed: {}", tmp_path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("sync temp progress failed: {}", tmp_path.display()))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp progress to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl ProgressStorePort for FileProgressStore {
    async fn load(&self) -> Result<Option<WorkflowProgress>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read progress failed: {}", self.path.display()))
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let progress: WorkflowProgress = serde_json::from_str(&content).map_err(|e| {
            anyhow::Error::new(ProgressStoreError::Corrupt(format!(
                "Failed to parse onboarding progress: {e}"
            )))
        })?;

        Ok(Some(progress))
    }

    async fn save(&self, progress: &WorkflowProgress) -> Result<()> {
        let json =
            serde_json::to_string_pretty(progress).context("serialize onboarding progress failed")?;
        self.atomic_write(&json).await?;
        debug!(path = %self.path.display(), step = %progress.current_step, "onboarding progress saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("remove progress failed: {}", self.path.display()))
            }
        }
    }
}
