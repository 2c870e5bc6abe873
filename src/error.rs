use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced at the edges of the engine: parsing input, loading
/// files, reading configuration. Search itself never returns these.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("FEN error: {0}")]
    Fen(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed book {path}: {reason}")]
    BookFormat { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("invalid piece-square tables: {0}")]
    Tables(String),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
