use pstbot::book::openings::get_chess_openings;
use pstbot::book::{encode_move, zobrist, Book, BookEntry, BookPolicy};
use pstbot::{EngineError, Position};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("pstbot-{}-{name}", std::process::id()))
}

#[test]
fn written_book_reads_back() {
    let book = Book::from_openings(&get_chess_openings()).unwrap();
    let path = temp_path("roundtrip.bin");
    book.write_to(&path).unwrap();
    let mut loaded = Book::open(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.len(), book.len());
    let pos = Position::startpos();
    assert_eq!(loaded.probe(&pos).map(|m| pos.move_to_uci(m)), Some("e2e4".to_string()));
}

#[test]
fn truncated_file_is_a_format_error() {
    let path = temp_path("short.bin");
    std::fs::write(&path, [0u8; 20]).unwrap();
    let res = Book::open(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(res, Err(EngineError::BookFormat { .. })));
}

#[test]
fn illegal_stored_move_is_a_miss() {
    let pos = Position::startpos();
    let key = zobrist::compute(pos.board());
    // e2e5 is not a legal pawn move
    let raw = (12u16 << 6) | 36;
    let mut book = Book::from_entries(vec![BookEntry { key, mv: raw, weight: 10, learn: 0 }]);
    assert_eq!(book.probe(&pos), None);
}

#[test]
fn best_weight_prefers_heavier_entry_then_first() {
    let pos = Position::startpos();
    let key = zobrist::compute(pos.board());
    let d4 = pos.find_move_uci("d2d4").unwrap();
    let e4 = pos.find_move_uci("e2e4").unwrap();
    let c4 = pos.find_move_uci("c2c4").unwrap();
    let entry = |m, weight| BookEntry { key, mv: encode_move(m), weight, learn: 0 };

    let mut book = Book::from_entries(vec![entry(d4, 3), entry(e4, 5), entry(c4, 5)]);
    assert_eq!(book.probe(&pos), Some(e4));
}

#[test]
fn weighted_policy_is_reproducible_and_in_book() {
    let pos = Position::startpos();
    let lines = get_chess_openings();
    let firsts: Vec<String> = lines.iter().map(|o| o.moves[0].clone()).collect();
    let picks = |seed| {
        let mut book = Book::from_openings(&lines).unwrap().with_policy(BookPolicy::Weighted { seed });
        (0..8).map(|_| pos.move_to_uci(book.probe(&pos).unwrap())).collect::<Vec<_>>()
    };
    let a = picks(42);
    assert_eq!(a, picks(42));
    assert!(a.iter().all(|m| firsts.contains(m)), "{a:?}");
}

#[test]
fn transposed_line_hits_the_book() {
    let mut book = Book::from_openings(&get_chess_openings()).unwrap();
    let off_book = Position::set_from_start_and_moves(&["g1f3", "g8f6"].map(String::from)).unwrap();
    assert_eq!(book.probe(&off_book), None);
    // Queen's Gambit Declined reached by a different move order
    let pos = Position::set_from_start_and_moves(
        &["c2c4", "e7e6", "d2d4", "d7d5", "b1c3", "g8f6"].map(String::from),
    ).unwrap();
    let mv = book.probe(&pos).expect("transposition should be in book");
    assert_eq!(pos.move_to_uci(mv), "c1g5");
}

#[test]
fn polyglot_record_for_startpos_hits() {
    // Record as another Polyglot tool writes it: startpos key, e2e4
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x463b96181691fc9cu64.to_be_bytes());
    bytes.extend_from_slice(&((12u16 << 6) | 28).to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    let path = temp_path("polyglot.bin");
    std::fs::write(&path, &bytes).unwrap();
    let mut book = Book::open(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let pos = Position::startpos();
    assert_eq!(book.probe(&pos).map(|m| pos.move_to_uci(m)), Some("e2e4".to_string()));
}

#[test]
fn castling_record_uses_king_takes_rook() {
    let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let key = zobrist::compute(pos.board());
    // e1h1: from 4, to 7
    let mut book = Book::from_entries(vec![BookEntry { key, mv: (4 << 6) | 7, weight: 1, learn: 0 }]);
    let mv = book.probe(&pos).expect("castling entry");
    assert_eq!(pos.move_to_uci(mv), "e1g1");
}
