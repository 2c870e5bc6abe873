use crate::board::Position;

// Leaf count through the play/undo stack, exercising the same paths the search uses
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = pos.legal_moves();
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for m in moves {
        pos.play(m);
        nodes += perft(pos, depth - 1);
        pos.undo(m);
    }
    nodes
}

/// Per-root-move leaf counts, in generator order.
pub fn divide(pos: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let mut out = Vec::new();
    for m in pos.legal_moves() {
        let uci = pos.move_to_uci(m);
        pos.play(m);
        let n = perft(pos, depth.saturating_sub(1));
        pos.undo(m);
        out.push((uci, n));
    }
    out
}
