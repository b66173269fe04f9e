use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodonforgeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not all k-mers are of length {expected}: got {kmer}, which is of length {actual}")]
    LengthMismatch {
        expected: usize,
        kmer: String,
        actual: usize,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown genetic code: {0}")]
    UnknownGeneticCode(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodonforgeError>;
