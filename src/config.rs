use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::book::openings::get_chess_openings;
use crate::book::{Book, BookPolicy};
use crate::error::{EngineError, Result};
use crate::search::eval::Evaluator;
use crate::search::tables::PieceSquareTables;

pub const DEFAULT_DEPTH: u32 = 4;
pub const DEFAULT_BOOK_FILE: &str = "Cerebellum3Merge.bin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search depth in plies for every decision.
    pub depth: u32,
    /// Book file; a missing file means "no book".
    pub book_path: Option<PathBuf>,
    /// Use the bundled opening lines when no book file is loaded.
    pub use_builtin_book: bool,
    pub book_policy: BookPolicy,
    /// JSON piece-square tables replacing the built-in ones.
    pub tables_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            book_path: Some(PathBuf::from(DEFAULT_BOOK_FILE)),
            use_builtin_book: false,
            book_policy: BookPolicy::default(),
            tables_path: None,
        }
    }
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(EngineError::Config("depth must be at least 1".into()));
        }
        Ok(())
    }

    pub fn build_evaluator(&self) -> Result<Evaluator> {
        let tables = match &self.tables_path {
            Some(p) => Arc::new(PieceSquareTables::from_json_file(p)?),
            None => PieceSquareTables::shared(),
        };
        Ok(Evaluator::new(tables))
    }

    /// Opens the configured book. An unreadable file is logged and treated
    /// as an empty book so play can continue.
    pub fn build_book(&self) -> Result<Option<Book>> {
        if let Some(path) = &self.book_path {
            match Book::open(path) {
                Ok(book) => return Ok(Some(book.with_policy(self.book_policy))),
                Err(EngineError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                    log::warn!("book {} not found, continuing without it", path.display());
                }
                Err(e) => return Err(e),
            }
        }
        if self.use_builtin_book {
            return Ok(Some(Book::from_openings(&get_chess_openings())?.with_policy(self.book_policy)));
        }
        Ok(None)
    }
}
