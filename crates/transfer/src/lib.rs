pub mod export;
pub mod parse;
pub mod session;

pub use export::{export_filename, to_csv, write_export, EXPORT_HEADERS};
pub use parse::{parse_csv, tokenize_line, REQUIRED_HEADER};
pub use session::{ImportSession, SessionState};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    /// Structural: the file has no header row or no data rows.
    #[error("CSV needs a header row and at least one data row")]
    TooFewLines,
    /// Structural: a required column is missing from the header row.
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
