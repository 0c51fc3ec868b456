use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CheckResult<T> = Result<T, CheckError>;
