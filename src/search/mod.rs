pub mod eval;
pub mod minimax;
pub mod select;
pub mod tables;

pub use eval::Evaluator;
pub use minimax::{SearchResult, Searcher};
pub use select::{MoveSelector, MoveSource, Selection};
