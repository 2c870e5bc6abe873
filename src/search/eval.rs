use cozy_chess::{Color, Piece};
use std::sync::Arc;

use crate::board::Position;
use crate::search::tables::{mirror_square, PieceSquareTables};

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

const SCORED_PIECES: [Piece; 5] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

// Score scale: positive favours White. The mate values sit one unit inside
// the i32 range so they never collide with the search's open bounds.
pub const SCORE_MIN: i32 = i32::MIN;
pub const SCORE_MAX: i32 = i32::MAX;
pub const WHITE_MATED: i32 = i32::MIN + 1;
pub const BLACK_MATED: i32 = i32::MAX - 1;
pub const DRAW_SCORE: i32 = 0;

pub const fn material_value(kind: Piece) -> i32 {
    match kind {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => 0,
    }
}

/// King tables switch to the endgame set once the board has drained:
/// no queens and at most four other pieces, or at most one piece overall
/// besides queens. Pawns and kings are not counted.
pub fn is_endgame(queens: u32, other_pieces: u32) -> bool {
    (queens == 0 && other_pieces <= 4) || other_pieces <= 1
}

/// Static evaluator: material plus piece-square bonuses, with a king term
/// that changes tables as material comes off.
#[derive(Debug, Clone)]
pub struct Evaluator {
    tables: Arc<PieceSquareTables>,
}

impl Default for Evaluator {
    fn default() -> Self { Self::new(PieceSquareTables::shared()) }
}

impl Evaluator {
    pub fn new(tables: Arc<PieceSquareTables>) -> Self { Self { tables } }

    /// Side-agnostic score in centipawns: positive means White is better.
    pub fn evaluate(&self, pos: &Position) -> i32 {
        let mut score = 0;
        let mut queens = 0u32;
        let mut others = 0u32;

        for kind in SCORED_PIECES {
            let table = self.tables.for_piece(kind);
            let value = material_value(kind);
            for sq in pos.pieces(kind, Color::White) {
                score += value + table[mirror_square(sq as usize)];
            }
            for sq in pos.pieces(kind, Color::Black) {
                score -= value + table[sq as usize];
            }
            let count = pos.pieces(kind, Color::White).len() + pos.pieces(kind, Color::Black).len();
            match kind {
                Piece::Queen => queens += count,
                Piece::Pawn => {}
                _ => others += count,
            }
        }

        let king_table = self.tables.king(is_endgame(queens, others));
        score += king_table[mirror_square(pos.king(Color::White) as usize)];
        score -= king_table[pos.king(Color::Black) as usize];
        score
    }
}

/// Evaluates with the built-in tables.
pub fn eval_cp(pos: &Position) -> i32 {
    Evaluator::default().evaluate(pos)
}
