use std::fs::File;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;

/// Initialize the logger. The terminal is owned by the dashboard, so records
/// are only written when a log file is configured.
pub fn init_logger(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        log::set_max_level(log::LevelFilter::Off);
        return Ok(());
    };

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let file = File::create(path)?;

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
    Ok(())
}

pub fn log_config_info(config: &Config) {
    info!(
        "Configuration: raw={}, clean={}, index_column={:?}",
        config.raw_data.display(),
        config.clean_data.display(),
        config.index_column
    );
    debug!(
        "Heatmap preselects {} columns, tick rate {}ms",
        config.heatmap_default_columns, config.tick_rate_ms
    );
}

pub fn log_dataset_loaded(path: &Path, rows: usize, columns: usize, numeric: usize) {
    debug!(
        "Loaded {}: {rows} rows, {columns} columns ({numeric} numeric)",
        path.display()
    );
}

pub fn log_load_failure(path: &Path, err: &dyn std::fmt::Display) {
    warn!("Could not load {}: {err}", path.display());
}
