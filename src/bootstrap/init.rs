use anyhow::Context;
use pc_app::AppPaths;
use pc_core::config::AppConfig;
use pc_core::ports::AppDirsPort;
use pc_infra::DirsAppDirsAdapter;

use crate::bootstrap::config::load_config_or_default;
use crate::cli::Cli;

/// Everything resolved before logging and wiring start.
#[derive(Debug, Clone)]
pub struct Startup {
    pub config: AppConfig,
    pub paths: AppPaths,
}

pub fn prepare(cli: &Cli) -> anyhow::Result<Startup> {
    let adapter = match &cli.data_dir {
        Some(dir) => DirsAppDirsAdapter::with_base_data_local_dir(dir.clone()),
        None => DirsAppDirsAdapter::new(),
    };
    let app_dirs = adapter
        .get_app_dirs()
        .context("Failed to resolve application data directory")?;
    let default_paths = AppPaths::from_app_dirs(&app_dirs);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_paths.config_path.clone());
    let config = load_config_or_default(&config_path, &app_dirs.app_data_root)?;
    let paths = default_paths.with_progress_override(&config.progress_file);

    Ok(Startup { config, paths })
}
