use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Failed to read workbook: {0}")]
    Decode(#[from] calamine::XlsxError),

    #[error("Workbook has no sheets")]
    NoSheet,

    #[error("File does not contain enough data")]
    NotEnoughRows,
}
