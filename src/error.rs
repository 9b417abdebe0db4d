use thiserror::Error;

/// Failures while constructing or encoding a transaction.
/// Validation itself never fails, it only rejects.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("input index {index} is out of range, the transaction has {len} inputs")]
    InputOutOfRange { index: usize, len: usize },

    #[error("failed to encode transaction data: {0}")]
    Encoding(#[from] bincode::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{name} must be within [0, 1], got: {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{name} must be at most {max}, got: {value}")]
    TooLarge {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("unknown malicious behavior: {0}")]
    UnknownBehavior(String),
}
