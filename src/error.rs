use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors raised by grid construction, tile edits and selection commits.
///
/// Only `Configuration` and `Config` are fatal, and only at startup. The rest
/// are reduced to no-ops by the editor store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("invalid configuration: {what} must be positive (got {width}x{height})")]
    Configuration {
        what: &'static str,
        width: f64,
        height: f64,
    },

    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("no tile is selected")]
    NoSelection,

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Config(err.to_string())
    }
}
