use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Config directory not found at {0}. Run 'ilume-report init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Unsupported format: {0}. Use .csv, .xls, .xlsx, .xlsb or .ods")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Spreadsheet {0} contains no sheets")]
    EmptyWorkbook(PathBuf),

    #[error("Invalid --{flag} date '{value}'. Expected YYYY-MM-DD")]
    InvalidDate { flag: &'static str, value: String },

    #[error("Invalid color '{0}'. Expected #RRGGBB")]
    InvalidColor(String),

    #[error("No rows left after applying filters. Nothing to report.")]
    NoData,

    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
