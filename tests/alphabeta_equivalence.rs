use cozy_chess::Move;
use pretty_assertions::assert_eq;
use pstbot::search::eval::{Evaluator, BLACK_MATED, DRAW_SCORE, WHITE_MATED};
use pstbot::search::Searcher;
use pstbot::Position;

// Plain minimax over the same tree, no pruning.
fn full_minimax(pos: &mut Position, ev: &Evaluator, depth: u32, maximizing: bool, nodes: &mut u64) -> i32 {
    *nodes += 1;
    if pos.is_checkmate() { return if maximizing { WHITE_MATED } else { BLACK_MATED }; }
    if pos.is_draw() { return DRAW_SCORE; }
    if depth == 0 { return ev.evaluate(pos); }
    let mut scores = Vec::new();
    for m in pos.legal_moves() {
        pos.play(m);
        scores.push(full_minimax(pos, ev, depth - 1, !maximizing, nodes));
        pos.undo(m);
    }
    if maximizing { scores.into_iter().max().unwrap() } else { scores.into_iter().min().unwrap() }
}

fn full_root(pos: &mut Position, ev: &Evaluator, depth: u32) -> (Option<Move>, i32, u64) {
    let maximizing = pos.side_to_move_is_white();
    let mut best: Option<(Move, i32)> = None;
    let mut nodes = 0;
    for m in pos.legal_moves() {
        pos.play(m);
        let s = full_minimax(pos, ev, depth - 1, !maximizing, &mut nodes);
        pos.undo(m);
        let better = match best {
            None => true,
            Some((_, b)) => if maximizing { s > b } else { s < b },
        };
        if better { best = Some((m, s)); }
    }
    (best.map(|b| b.0), best.map(|b| b.1).unwrap_or_default(), nodes)
}

const CASES: &[(&str, u32)] = &[
    ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4),
    ("k7/8/8/8/8/8/3qQ3/7K w - - 0 1", 3),
    ("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", 2),
    ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 3 3", 3),
];

#[test]
fn pruning_never_changes_root_choice_or_score() {
    for &(fen, depth) in CASES {
        let mut pos = Position::from_fen(fen).unwrap();
        let mut s = Searcher::default();
        let pruned = s.search_root(&mut pos, depth);
        let (mv, score, full_nodes) = full_root(&mut pos, s.evaluator(), depth);
        assert_eq!((pruned.best_move, pruned.score), (mv, score), "{fen} d{depth}");
        assert!(pruned.nodes <= full_nodes, "{fen}: {} > {}", pruned.nodes, full_nodes);
    }
}

#[test]
fn pruning_never_changes_interior_scores() {
    for &(fen, depth) in CASES {
        let mut pos = Position::from_fen(fen).unwrap();
        let maximizing = pos.side_to_move_is_white();
        let mut s = Searcher::default();
        let pruned = s.search(&mut pos, depth - 1, i32::MIN, i32::MAX, maximizing);
        let mut nodes = 0;
        let full = full_minimax(&mut pos, s.evaluator(), depth - 1, maximizing, &mut nodes);
        assert_eq!(pruned, full, "{fen} d{}", depth - 1);
    }
}
