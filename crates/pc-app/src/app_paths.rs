use std::path::PathBuf;

use pc_core::app_dirs::AppDirs;
use pc_core::config::PROGRESS_FILE_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub progress_path: PathBuf,
    pub config_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            progress_path: dirs.app_data_root.join(PROGRESS_FILE_NAME),
            config_path: dirs.app_data_root.join("config.toml"),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }

    /// Apply a configured progress file; an empty path keeps the default.
    pub fn with_progress_override(mut self, progress_file: &std::path::Path) -> Self {
        if !progress_file.as_os_str().is_empty() {
            self.progress_path = progress_file.to_path_buf();
        }
        self
    }
}
