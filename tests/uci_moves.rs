use cozy_chess::Color;
use pstbot::search::{MoveSelector, Searcher};
use pstbot::uci::UciEngine;
use pstbot::Position;

#[test]
fn apply_startpos_moves_sequence() {
    let moves = vec!["e2e4".to_string(), "e7e5".to_string(), "g1f3".to_string()];
    let pos = Position::set_from_start_and_moves(&moves).expect("legal move sequence");
    assert_eq!(pos.side_to_move(), Color::Black, "expected black to move after 3 plies");
}

#[test]
fn position_fen_with_moves() {
    let mut e = UciEngine::new(MoveSelector::new(None, Searcher::default(), 1));
    let mut out = Vec::new();
    e.handle_line("position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1 moves e1g1", &mut out).unwrap();
    assert_eq!(e.position().fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
}

#[test]
fn go_with_clock_still_answers() {
    let mut e = UciEngine::new(MoveSelector::new(None, Searcher::default(), 2));
    let mut out = Vec::new();
    e.handle_line("position startpos moves e2e4 e7e5", &mut out).unwrap();
    e.handle_line("go wtime 60000 btime 60000 winc 0 binc 0", &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let best = text.lines().find_map(|l| l.strip_prefix("bestmove ")).expect("bestmove line");
    assert!(e.position().find_move_uci(best).is_some(), "{best}");
}

#[test]
fn quit_stops_the_loop() {
    let mut e = UciEngine::new(MoveSelector::default());
    let mut out = Vec::new();
    assert!(!e.handle_line("quit", &mut out).unwrap());
}
