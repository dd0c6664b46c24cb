// src/error.rs

use std::fmt;

/// Errors raised while loading data, reading configuration or building charts.
#[derive(Debug)]
pub enum AppError {
    /// IO error (terminal, log file, config file)
    Io(std::io::Error),

    /// CSV decoding error
    Csv(csv::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// Invalid configuration value
    Config(String),

    /// No loader exists for the requested file format
    UnsupportedFormat(String),

    /// A requested column is not part of the dataset
    ColumnNotFound(String),

    /// The chosen columns cannot be drawn with the chosen chart
    Plot(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "IO error: {err}"),
            AppError::Csv(err) => write!(f, "CSV error: {err}"),
            AppError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            AppError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppError::UnsupportedFormat(ext) => {
                write!(f, "File format '{ext}' is not supported")
            }
            AppError::ColumnNotFound(name) => write!(f, "Column not found: {name}"),
            AppError::Plot(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::TomlParsing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Csv(err)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::TomlParsing(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
