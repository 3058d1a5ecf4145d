use std::path::PathBuf;

/// Per-user application directories, resolved by an `AppDirsPort`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}
