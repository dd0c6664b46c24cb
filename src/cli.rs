// Command-line interface definitions for carseda

use std::path::PathBuf;

use clap::Parser;

use crate::config::CliConfig;
use crate::tui_app::Page;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Raw listings CSV (default: "Cars (1).csv")
    #[arg(long, value_name = "PATH", help_heading = "Data")]
    pub raw: Option<PathBuf>,

    /// Cleaned listings CSV (default: Cars_cleaned.csv)
    #[arg(long, value_name = "PATH", help_heading = "Data")]
    pub clean: Option<PathBuf>,

    /// Force the input format instead of using the file extension
    #[arg(short = 'b', long = "backend", value_name = "FORMAT", help_heading = "Data")]
    pub format: Option<String>,

    /// Configuration file (default: ./carseda.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page shown at start-up
    #[arg(long, value_name = "PAGE", default_value = "home", value_parser = parse_page)]
    pub page: Page,

    /// Enable debug logging
    #[arg(short = 'v', long, help_heading = "Logging")]
    pub verbose: bool,

    /// Write log records to this file
    #[arg(long, value_name = "PATH", help_heading = "Logging")]
    pub log_file: Option<PathBuf>,
}

fn parse_page(value: &str) -> Result<Page, String> {
    Page::from_slug(value).ok_or_else(|| {
        format!("unknown page '{value}' (expected home, overview, insights, visualizations or about)")
    })
}

pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        raw_data: cli.raw.clone(),
        clean_data: cli.clean.clone(),
        format: cli.format.clone(),
        log_file: cli.log_file.clone(),
        verbose: cli.verbose,
    }
}
