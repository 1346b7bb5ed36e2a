use thiserror::Error;

/// Errors that abort a lint run.
///
/// Integrity problems found in well-formed input are not errors in this
/// sense; they accumulate as [`Finding`](crate::types::Finding)s instead so
/// a single run surfaces every problem at once.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("parse error in '{document}': {message}")]
    Parse { document: String, message: String },

    #[error("file too large: '{document}' is {size} bytes (limit {limit})")]
    FileTooLarge {
        document: String,
        size: u64,
        limit: u64,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error reading '{document}': {source}")]
    Io {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `LintError`.
pub type Result<T> = std::result::Result<T, LintError>;
