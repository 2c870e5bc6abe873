use cozy_chess::{BitBoard, Board as CozyBoard, Color, Move, Piece, Square};
use std::fmt;

use crate::error::{EngineError, Result};

#[derive(Clone, Debug)]
struct Frame {
    board: CozyBoard,
    mv: Move,
}

/// Mutable game state shared by the whole search.
///
/// Moves are applied with [`Position::play`] and reverted with
/// [`Position::undo`]; the previous board is kept on a stack, so an undo
/// restores the exact prior state. The stack also doubles as the game
/// history used for repetition detection.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    stack: Vec<Frame>,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), stack: Vec::with_capacity(128) }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen.trim(), false)
            .map(|b| Self { board: b, stack: Vec::with_capacity(128) })
            .map_err(|e| EngineError::Fen(format!("{fen}: {e:?}")))
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    /// Number of moves played since this position was created.
    pub fn ply_count(&self) -> usize { self.stack.len() }

    /// Plays a move given in UCI notation. Castling is accepted both as
    /// king-to-destination (`e1g1`) and king-takes-rook (`e1h1`).
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        let found = self.find_move_uci(mv_uci)
            .ok_or_else(|| EngineError::IllegalMove(mv_uci.to_string()))?;
        self.play(found);
        Ok(())
    }

    pub fn find_move_uci(&self, mv_uci: &str) -> Option<Move> {
        self.legal_moves().into_iter().find(|&m| {
            format!("{}", m) == mv_uci || to_uci(&self.board, m) == mv_uci
        })
    }

    /// UCI text for a move in this position (standard castling notation).
    pub fn move_to_uci(&self, mv: Move) -> String { to_uci(&self.board, mv) }

    /// All legal moves, in the board's generator order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|ml| !ml.is_empty())
    }

    pub fn in_check(&self) -> bool { !self.board.checkers().is_empty() }

    pub fn is_checkmate(&self) -> bool { self.in_check() && !self.has_legal_moves() }

    pub fn is_stalemate(&self) -> bool { !self.in_check() && !self.has_legal_moves() }

    /// Draw by rule: stalemate, fifty-move rule, insufficient material, or
    /// a repetition of an earlier position.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw()
            || self.is_insufficient_material()
            || self.is_repetition()
            || self.is_stalemate()
    }

    pub fn is_fifty_move_draw(&self) -> bool { self.board.halfmove_clock() >= 100 }

    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if knights.len() + bishops.len() <= 1 { return true; }
        // K+B vs K+B with both bishops on the same square colour
        if knights.is_empty() && bishops.len() == 2 {
            let white = b.colored_pieces(Color::White, Piece::Bishop);
            let black = b.colored_pieces(Color::Black, Piece::Bishop);
            if let (Some(w), Some(k)) = (first_square(white), first_square(black)) {
                return is_light(w) == is_light(k);
            }
        }
        false
    }

    /// True when the current position already occurred earlier in the game
    /// (same side to move), looking back no further than the last
    /// capture or pawn move.
    pub fn is_repetition(&self) -> bool {
        let key = self.board.hash();
        let window = (self.board.halfmove_clock() as usize).min(self.stack.len());
        self.stack.iter().rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .any(|f| f.board.hash() == key)
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn side_to_move_is_white(&self) -> bool { self.board.side_to_move() == Color::White }

    /// Squares holding pieces of `kind` owned by `color`.
    pub fn pieces(&self, kind: Piece, color: Color) -> BitBoard {
        self.board.colored_pieces(color, kind)
    }

    pub fn king(&self, color: Color) -> Square { self.board.king(color) }

    /// Applies a legal move. Panics if the move is illegal here.
    pub fn play(&mut self, mv: Move) {
        let prev = self.board.clone();
        self.board.play(mv);
        self.stack.push(Frame { board: prev, mv });
    }

    /// Reverts the most recent [`Position::play`], which must have been `mv`.
    pub fn undo(&mut self, mv: Move) {
        let frame = self.stack.pop().expect("undo without a matching play");
        assert_eq!(frame.mv, mv, "undo out of order");
        self.board = frame.board;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.board) }
}

fn first_square(bb: BitBoard) -> Option<Square> { bb.into_iter().next() }

fn is_light(sq: Square) -> bool { (sq.file() as usize + sq.rank() as usize) % 2 == 1 }

/// Castling is stored as king-takes-rook; UCI wants the king's landing square.
fn to_uci(board: &CozyBoard, mv: Move) -> String {
    let stm = board.side_to_move();
    let is_castle = board.piece_on(mv.from) == Some(Piece::King)
        && board.colored_pieces(stm, Piece::Rook).has(mv.to);
    if is_castle {
        let file = if mv.to.file() as usize > mv.from.file() as usize { cozy_chess::File::G } else { cozy_chess::File::C };
        let to = Square::new(file, mv.from.rank());
        return format!("{}{}", mv.from, to);
    }
    format!("{}", mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_restores_board_and_history() {
        let mut pos = Position::startpos();
        let before = pos.board().clone();
        let moves = pos.legal_moves();
        for m in moves {
            pos.play(m);
            pos.undo(m);
            assert_eq!(pos.board(), &before);
            assert_eq!(pos.ply_count(), 0);
        }
    }

    #[test]
    #[should_panic(expected = "undo out of order")]
    fn mismatched_undo_fails_fast() {
        let mut pos = Position::startpos();
        let moves = pos.legal_moves();
        pos.play(moves[0]);
        pos.undo(moves[1]);
    }

    #[test]
    fn knight_shuffle_repeats() {
        let mut pos = Position::startpos();
        for m in ["g1f3", "g8f6", "f3g1"] { pos.make_move_uci(m).unwrap(); }
        assert!(!pos.is_repetition());
        pos.make_move_uci("f6g8").unwrap();
        assert!(pos.is_repetition());
        assert!(pos.is_draw());
    }

    #[test]
    fn castling_uses_standard_uci() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let ucis: Vec<String> = pos.legal_moves().into_iter().map(|m| pos.move_to_uci(m)).collect();
        assert!(ucis.contains(&"e1g1".to_string()));
        assert!(ucis.contains(&"e1c1".to_string()));
        assert!(pos.find_move_uci("e1g1").is_some());
        assert_eq!(pos.find_move_uci("e1g1"), pos.find_move_uci("e1h1"));
    }

    #[test]
    fn insufficient_material_cases() {
        let kk = Position::from_fen("k7/8/8/8/8/8/8/7K w - - 0 1").unwrap();
        let kn = Position::from_fen("k7/8/8/8/8/8/8/6NK w - - 0 1").unwrap();
        let kbkb_same = Position::from_fen("k7/8/8/8/8/8/1b6/6BK w - - 0 1").unwrap();
        let kbkb_diff = Position::from_fen("k7/8/8/8/8/8/b7/6BK w - - 0 1").unwrap();
        let kr = Position::from_fen("k7/8/8/8/8/8/8/6RK w - - 0 1").unwrap();
        assert!(kk.is_insufficient_material());
        assert!(kn.is_insufficient_material());
        assert!(kbkb_same.is_insufficient_material());
        assert!(!kbkb_diff.is_insufficient_material());
        assert!(!kr.is_insufficient_material());
    }

    #[test]
    fn bad_fen_is_an_error() {
        assert!(matches!(Position::from_fen("not a fen"), Err(EngineError::Fen(_))));
    }
}
