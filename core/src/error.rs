use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid month '{value}': expected YYYY-MM")]
    InvalidMonth { value: String },

    #[error("Invalid rate {value}%: must be between 0 and 100")]
    InvalidRate { value: f64 },

    #[error("Config error in {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("No ledger stored for month {month}")]
    MonthNotFound { month: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PayoutResult<T> = Result<T, PayoutError>;
