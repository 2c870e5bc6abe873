//! Piece-square tables.
//!
//! Every table is written the way a board diagram reads: the first row is
//! rank 8 seen from White's side. Indexed directly with a square index
//! (a1 = 0) the tables score Black's pieces; White's squares are flipped
//! with [`mirror_square`] before lookup.

use cozy_chess::Piece;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::{EngineError, Result};

pub type Table = [i32; 64];

/// Flips a square index vertically: a1 <-> a8, e2 <-> e7.
#[inline]
pub const fn mirror_square(index: usize) -> usize {
    let rank = index / 8;
    let file = index % 8;
    (7 - rank) * 8 + file
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSquareTables {
    pub pawn: Table,
    pub knight: Table,
    pub bishop: Table,
    pub rook: Table,
    pub queen: Table,
    pub king_midgame: Table,
    pub king_endgame: Table,
}

/// On-disk shape of a table set; each field must hold 64 entries.
#[derive(Debug, Serialize, Deserialize)]
struct TablesFile {
    pawn: Vec<i32>,
    knight: Vec<i32>,
    bishop: Vec<i32>,
    rook: Vec<i32>,
    queen: Vec<i32>,
    king_midgame: Vec<i32>,
    king_endgame: Vec<i32>,
}

fn to_table(name: &str, v: Vec<i32>) -> Result<Table> {
    let len = v.len();
    v.try_into().map_err(|_| EngineError::Tables(format!("{name}: expected 64 entries, got {len}")))
}

impl PieceSquareTables {
    pub fn builtin() -> &'static PieceSquareTables { &BUILTIN }

    /// The built-in set behind one process-wide `Arc`, copied on first use.
    pub fn shared() -> Arc<PieceSquareTables> {
        static SHARED: OnceLock<Arc<PieceSquareTables>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(BUILTIN.clone())).clone()
    }

    /// Table for a non-king piece. Kings go through [`Self::king`].
    pub fn for_piece(&self, kind: Piece) -> &Table {
        match kind {
            Piece::Pawn => &self.pawn,
            Piece::Knight => &self.knight,
            Piece::Bishop => &self.bishop,
            Piece::Rook => &self.rook,
            Piece::Queen => &self.queen,
            Piece::King => &self.king_midgame,
        }
    }

    pub fn king(&self, endgame: bool) -> &Table {
        if endgame { &self.king_endgame } else { &self.king_midgame }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: TablesFile = serde_json::from_str(s).map_err(|e| EngineError::Tables(e.to_string()))?;
        Ok(Self {
            pawn: to_table("pawn", raw.pawn)?,
            knight: to_table("knight", raw.knight)?,
            bishop: to_table("bishop", raw.bishop)?,
            rook: to_table("rook", raw.rook)?,
            queen: to_table("queen", raw.queen)?,
            king_midgame: to_table("king_midgame", raw.king_midgame)?,
            king_endgame: to_table("king_endgame", raw.king_endgame)?,
        })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> String {
        let raw = TablesFile {
            pawn: self.pawn.to_vec(),
            knight: self.knight.to_vec(),
            bishop: self.bishop.to_vec(),
            rook: self.rook.to_vec(),
            queen: self.queen.to_vec(),
            king_midgame: self.king_midgame.to_vec(),
            king_endgame: self.king_endgame.to_vec(),
        };
        serde_json::to_string_pretty(&raw).unwrap_or_default()
    }
}

#[rustfmt::skip]
static BUILTIN: PieceSquareTables = PieceSquareTables {
    pawn: [
          0,   0,   0,   0,   0,   0,   0,   0,
         50,  50,  50,  50,  50,  50,  50,  50,
         10,  10,  20,  30,  30,  20,  10,  10,
          5,   5,  10,  25,  25,  10,   5,   5,
          0,   0,   0,  20,  20,   0,   0,   0,
          5,  -5, -10,   0,   0, -10,  -5,   5,
          5,  10,  10, -20, -20,  10,  10,   5,
          0,   0,   0,   0,   0,   0,   0,   0,
    ],
    knight: [
        -50, -40, -30, -30, -30, -30, -40, -50,
        -40, -20,   0,   0,   0,   0, -20, -40,
        -30,   0,  10,  15,  15,  10,   0, -30,
        -30,   5,  15,  20,  20,  15,   5, -30,
        -30,   0,  15,  20,  20,  15,   0, -30,
        -30,   5,  10,  15,  15,  10,   5, -30,
        -40, -20,   0,   5,   5,   0, -20, -40,
        -50, -40, -30, -30, -30, -30, -40, -50,
    ],
    bishop: [
        -20, -10, -10, -10, -10, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,  10,  10,   5,   0, -10,
        -10,   5,   5,  10,  10,   5,   5, -10,
        -10,   0,  10,  10,  10,  10,   0, -10,
        -10,  10,  10,  10,  10,  10,  10, -10,
        -10,   5,   0,   0,   0,   0,   5, -10,
        -20, -10, -10, -10, -10, -10, -10, -20,
    ],
    rook: [
          0,   0,   0,   0,   0,   0,   0,   0,
          5,  10,  10,  10,  10,  10,  10,   5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
          0,   0,   0,   5,   5,   0,   0,   0,
    ],
    queen: [
        -20, -10, -10,  -5,  -5, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,   5,   5,   5,   0, -10,
         -5,   0,   5,   5,   5,   5,   0,  -5,
          0,   0,   5,   5,   5,   5,   0,  -5,
        -10,   5,   5,   5,   5,   5,   0, -10,
        -10,   0,   5,   0,   0,   0,   0, -10,
        -20, -10, -10,  -5,  -5, -10, -10, -20,
    ],
    king_midgame: [
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -20, -30, -30, -40, -40, -30, -30, -20,
        -10, -20, -20, -20, -20, -20, -20, -10,
         20,  20,   0,   0,   0,   0,  20,  20,
         20,  30,  10,   0,   0,  10,  30,  20,
    ],
    king_endgame: [
        -50, -40, -30, -20, -20, -30, -40, -50,
        -30, -20, -10,   0,   0, -10, -20, -30,
        -30, -10,  20,  30,  30,  20, -10, -30,
        -30, -10,  30,  40,  40,  30, -10, -30,
        -30, -10,  30,  40,  40,  30, -10, -30,
        -30, -10,  20,  30,  30,  20, -10, -30,
        -30, -30,   0,   0,   0,   0, -30, -30,
        -50, -30, -30, -30, -30, -30, -30, -50,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_flips_rank_only() {
        assert_eq!(mirror_square(0), 56); // a1 -> a8
        assert_eq!(mirror_square(12), 52); // e2 -> e7
        for i in 0..64 { assert_eq!(mirror_square(mirror_square(i)), i); }
    }

    #[test]
    fn json_round_trip_keeps_tables() {
        let text = PieceSquareTables::builtin().to_json_string();
        let back = PieceSquareTables::from_json_str(&text).unwrap();
        assert_eq!(&back, PieceSquareTables::builtin());
    }

    #[test]
    fn short_table_rejected() {
        let mut v: serde_json::Value = serde_json::from_str(&PieceSquareTables::builtin().to_json_string()).unwrap();
        v["rook"] = serde_json::json!([0, 0, 0]);
        let err = PieceSquareTables::from_json_str(&v.to_string()).unwrap_err();
        assert!(err.to_string().contains("rook"), "{err}");
    }
}
