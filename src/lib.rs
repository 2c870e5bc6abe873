// Fixed-depth alpha-beta bot: book lookup, then minimax over PST evaluation
pub mod board;
pub mod book;
pub mod config;
pub mod error;
pub mod perft;
pub mod search;
pub mod uci;

pub use board::Position;
pub use config::EngineConfig;
pub use error::EngineError;
pub use search::{MoveSelector, MoveSource, Selection};
