use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("download needs a file name")]
    EmptyFilename,
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("row has {found} cells, table has {expected} columns")]
    RowLength { expected: usize, found: usize },
    #[error("expected a DataArray node, found {0}")]
    NotADataArray(String),
    #[error("text download produced invalid UTF-8")]
    NotUtf8,
}
