//! Named opening lines in UCI notation, used to seed the bundled book.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessOpening {
    pub name: String,
    pub moves: Vec<String>,
}

const LINES: &[(&str, &str)] = &[
    ("Italian Game", "e2e4 e7e5 g1f3 b8c6 f1c4 f8c5 e1g1 g8f6"),
    ("Ruy Lopez", "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6 b5a4 g8f6"),
    ("Queen's Gambit Declined", "d2d4 d7d5 c2c4 e7e6 b1c3 g8f6 c1g5 f8e7"),
    ("Sicilian Defense - Dragon Variation", "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4 g8f6"),
    ("French Defense", "e2e4 e7e6 d2d4 d7d5 b1c3 f8b4 e4e5 c7c5"),
    ("King's Indian Defense", "d2d4 g8f6 c2c4 g7g6 b1c3 f8g7 e2e4 d7d6"),
    ("English Opening", "c2c4 e7e5 b1c3 g8f6 g2g3 d7d5 c4d5 f6d5"),
    ("Caro-Kann Defense", "e2e4 c7c6 d2d4 d7d5 b1c3 d5e4 c3e4 c8f5"),
    ("Scotch Game", "e2e4 e7e5 g1f3 b8c6 d2d4 e5d4 f3d4 f8c5"),
    ("Queen's Indian Defense", "d2d4 g8f6 c2c4 e7e6 g1f3 b7b6 g2g3 c8b7"),
    ("Nimzo-Indian Defense", "d2d4 g8f6 c2c4 e7e6 b1c3 f8b4 e2e3 e8g8"),
    ("Pirc Defense", "e2e4 d7d6 d2d4 g8f6 b1c3 g7g6 f2f4 f8g7"),
    ("Alekhine's Defense", "e2e4 g8f6 e4e5 f6d5 d2d4 d7d6 g1f3 c8g4"),
    ("Benoni Defense", "d2d4 g8f6 c2c4 c7c5 d4d5 e7e6 b1c3 e6d5"),
    ("Dutch Defense", "d2d4 f7f5 g2g3 g8f6 f1g2 e7e6 g1f3 f8e7"),
    ("Scandinavian Defense", "e2e4 d7d5 e4d5 d8d5 b1c3 d5a5 d2d4 g8f6"),
    ("Vienna Game", "e2e4 e7e5 b1c3 g8f6 f2f4 d7d5 f4e5 f6e4"),
    ("King's Gambit", "e2e4 e7e5 f2f4 e5f4 g1f3 g7g5 h2h4 g5g4"),
    ("London System", "d2d4 d7d5 g1f3 g8f6 c1f4 c7c5 e2e3 b8c6"),
    ("Catalan Opening", "d2d4 g8f6 c2c4 e7e6 g2g3 d7d5 f1g2 f8e7"),
];

pub fn get_chess_openings() -> Vec<ChessOpening> {
    LINES.iter()
        .map(|(name, line)| ChessOpening {
            name: name.to_string(),
            moves: line.split_whitespace().map(String::from).collect(),
        })
        .collect()
}

/// Reads extra lines from a JSON array of `{ "name", "moves" }` objects.
pub fn load_openings_json(text: &str) -> serde_json::Result<Vec<ChessOpening>> {
    serde_json::from_str(text)
}
