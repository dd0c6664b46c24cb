//! Configuration management
//!
//! Settings come from an optional `carseda.toml` and are overridden by
//! command-line flags.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const CONFIG_FILE_NAME: &str = "carseda.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listings as scraped
    pub raw_data: PathBuf,

    /// Listings after cleaning
    pub clean_data: PathBuf,

    /// Leftover index column dropped from the cleaned file
    pub index_column: String,

    /// File format override; derived from the extension when unset
    pub format: Option<String>,

    /// How many numeric columns the heatmap preselects
    pub heatmap_default_columns: usize,

    /// Categorical columns listed with value counts on the Insights page
    pub value_count_columns: Vec<String>,

    pub name_column: String,
    pub brand_column: String,
    pub price_column: String,
    pub mileage_column: String,

    /// Rows shown in "Top Most Driven Cars"
    pub top_driven: usize,

    /// Input poll interval in milliseconds
    pub tick_rate_ms: u64,

    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("Cars (1).csv"),
            clean_data: PathBuf::from("Cars_cleaned.csv"),
            index_column: "Unnamed: 0".to_string(),
            format: None,
            heatmap_default_columns: 5,
            value_count_columns: ["Fuel_Type", "Transmission", "Owner_Type", "Colour", "Brand"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            name_column: "Name".to_string(),
            brand_column: "Brand".to_string(),
            price_column: "Price".to_string(),
            mileage_column: "Kilometers_Driven".to_string(),
            top_driven: 5,
            tick_rate_ms: 100,
            log_file: None,
            verbose: false,
        }
    }
}

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub raw_data: Option<PathBuf>,
    pub clean_data: Option<PathBuf>,
    pub format: Option<String>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path if given, else `carseda.toml` in the working directory
    /// when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None if Path::new(CONFIG_FILE_NAME).exists() => Self::load_from_file(CONFIG_FILE_NAME),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(&mut self, cli: &CliConfig) {
        if let Some(ref raw) = cli.raw_data {
            self.raw_data = raw.clone();
        }
        if let Some(ref clean) = cli.clean_data {
            self.clean_data = clean.clone();
        }
        if let Some(ref format) = cli.format {
            self.format = Some(format.clone());
        }
        if let Some(ref log_file) = cli.log_file {
            self.log_file = Some(log_file.clone());
        }
        if cli.verbose {
            self.verbose = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(AppError::Config("tick_rate_ms must be positive".into()));
        }
        if self.top_driven == 0 {
            return Err(AppError::Config("top_driven must be positive".into()));
        }
        Ok(())
    }
}
