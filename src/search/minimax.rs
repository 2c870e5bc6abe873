use cozy_chess::Move;

use crate::board::Position;
use crate::search::eval::{Evaluator, BLACK_MATED, DRAW_SCORE, SCORE_MAX, SCORE_MIN, WHITE_MATED};

#[derive(Default, Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// White-positive score of the chosen line.
    pub score: i32,
    pub nodes: u64,
}

/// Fixed-depth minimax with alpha-beta pruning. Moves are searched in the
/// generator's order; no reordering, no transposition table, no
/// quiescence.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    evaluator: Evaluator,
    pub(crate) nodes: u64,
}

impl Searcher {
    pub fn new(evaluator: Evaluator) -> Self { Self { evaluator, nodes: 0 } }

    pub fn evaluator(&self) -> &Evaluator { &self.evaluator }

    /// Nodes visited since the last [`Searcher::search_root`].
    pub fn nodes(&self) -> u64 { self.nodes }

    /// Scores `pos` to `depth` plies. `maximizing` is true when White is to
    /// move. Bounds are taken by value so sibling subtrees never share them.
    /// `pos` is returned in the state it was passed in.
    pub fn search(&mut self, pos: &mut Position, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.nodes += 1;

        if pos.is_checkmate() {
            return if maximizing { WHITE_MATED } else { BLACK_MATED };
        }
        if pos.is_draw() {
            return DRAW_SCORE;
        }
        if depth == 0 {
            return self.evaluator.evaluate(pos);
        }

        let moves = pos.legal_moves();
        debug_assert!(!moves.is_empty(), "no legal moves in a non-terminal position: {}", pos.fen());

        if maximizing {
            let mut best = SCORE_MIN;
            for m in moves {
                pos.play(m);
                let score = self.search(pos, depth - 1, alpha, beta, false);
                pos.undo(m);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha { break; }
            }
            best
        } else {
            let mut best = SCORE_MAX;
            for m in moves {
                pos.play(m);
                let score = self.search(pos, depth - 1, alpha, beta, true);
                pos.undo(m);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha { break; }
            }
            best
        }
    }

    /// Picks the best root move at `depth` plies. Every root move gets a
    /// full window; ties keep the move generated first.
    pub fn search_root(&mut self, pos: &mut Position, depth: u32) -> SearchResult {
        self.nodes = 0;
        let maximizing = pos.side_to_move_is_white();
        let mut best_move: Option<Move> = None;
        let mut best_score = if maximizing { SCORE_MIN } else { SCORE_MAX };

        for m in pos.legal_moves() {
            pos.play(m);
            let score = self.search(pos, depth.saturating_sub(1), SCORE_MIN, SCORE_MAX, !maximizing);
            pos.undo(m);

            let better = if maximizing { score > best_score } else { score < best_score };
            if better {
                best_score = score;
                best_move = Some(m);
            }
        }

        SearchResult { best_move, score: best_score, nodes: self.nodes }
    }
}
