use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Error: Metrics file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Error reading metrics file: line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("No metrics data found")]
    EmptyDataset,

    #[error("Error reading metrics file: {0}")]
    Io(#[from] std::io::Error),
}
