use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O failure while writing output: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected table schema: {0}")]
    Schema(String),
}
