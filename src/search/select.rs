use cozy_chess::Move;
use log::{debug, info};

use crate::board::Position;
use crate::book::Book;
use crate::config::{EngineConfig, DEFAULT_DEPTH};
use crate::error::Result;
use crate::search::minimax::Searcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Book,
    Search,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub mv: Move,
    pub source: MoveSource,
    /// White-positive search score; `None` for book moves.
    pub score: Option<i32>,
    pub nodes: u64,
}

/// Per-turn driver: book first, otherwise a fixed-depth search.
#[derive(Debug, Clone)]
pub struct MoveSelector {
    book: Option<Book>,
    searcher: Searcher,
    depth: u32,
}

impl Default for MoveSelector {
    fn default() -> Self { Self::new(None, Searcher::default(), DEFAULT_DEPTH) }
}

impl MoveSelector {
    pub fn new(book: Option<Book>, searcher: Searcher, depth: u32) -> Self {
        assert!(depth >= 1, "search depth must be at least one ply");
        Self { book, searcher, depth }
    }

    pub fn from_config(cfg: &EngineConfig) -> Result<Self> {
        cfg.validate()?;
        let searcher = Searcher::new(cfg.build_evaluator()?);
        Ok(Self::new(cfg.build_book()?, searcher, cfg.depth))
    }

    pub fn depth(&self) -> u32 { self.depth }

    pub fn set_depth(&mut self, depth: u32) {
        assert!(depth >= 1, "search depth must be at least one ply");
        self.depth = depth;
    }

    pub fn has_book(&self) -> bool { self.book.is_some() }

    /// Chooses a move for the side to move. The position must have at least
    /// one legal move; it is handed back unchanged.
    pub fn select_move(&mut self, pos: &mut Position) -> Selection {
        self.select_move_at(pos, self.depth)
    }

    /// Like [`MoveSelector::select_move`], searching `depth` plies this once
    /// without touching the configured depth.
    pub fn select_move_at(&mut self, pos: &mut Position, depth: u32) -> Selection {
        assert!(depth >= 1, "search depth must be at least one ply");
        if let Some(book) = self.book.as_mut() {
            if let Some(mv) = book.probe(pos) {
                info!("book move: {}", pos.move_to_uci(mv));
                return Selection { mv, source: MoveSource::Book, score: None, nodes: 0 };
            }
        }

        let result = self.searcher.search_root(pos, depth);
        let mv = result.best_move.expect("move requested in a position with no legal moves");
        debug!("search d{depth} best {} score {} nodes {}", pos.move_to_uci(mv), result.score, result.nodes);
        Selection { mv, source: MoveSource::Search, score: Some(result.score), nodes: result.nodes }
    }

    pub fn best_move(&mut self, pos: &mut Position) -> Move { self.select_move(pos).mv }
}
