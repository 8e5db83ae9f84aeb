use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Invalid skip pattern '{pattern}': {source}")]
    InvalidSkipPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type DiffResult<T> = Result<T, DiffError>;
