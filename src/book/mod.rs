//! Opening book: a sorted list of 16-byte big-endian records
//! (`key u64`, `move u16`, `weight u16`, `learn u32`), looked up by the
//! position's Polyglot key.

pub mod openings;
pub mod zobrist;

use cozy_chess::{Move, Piece, Square};
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::board::Position;
use crate::book::openings::ChessOpening;
use crate::error::{EngineError, Result};

const ENTRY_BYTES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    pub key: u64,
    pub mv: u16,
    pub weight: u16,
    pub learn: u32,
}

impl BookEntry {
    fn from_bytes(b: &[u8]) -> Self {
        Self {
            key: u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
            mv: u16::from_be_bytes([b[8], b[9]]),
            weight: u16::from_be_bytes([b[10], b[11]]),
            learn: u32::from_be_bytes([b[12], b[13], b[14], b[15]]),
        }
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.key.to_be_bytes());
        out.extend_from_slice(&self.mv.to_be_bytes());
        out.extend_from_slice(&self.weight.to_be_bytes());
        out.extend_from_slice(&self.learn.to_be_bytes());
    }
}

/// Packs a move: bits 0-5 destination, 6-11 origin, 12-14 promotion
/// (1 knight .. 4 queen). Castling stays king-takes-rook.
pub fn encode_move(mv: Move) -> u16 {
    let promo: u16 = match mv.promotion {
        Some(Piece::Knight) => 1,
        Some(Piece::Bishop) => 2,
        Some(Piece::Rook) => 3,
        Some(Piece::Queen) => 4,
        _ => 0,
    };
    (promo << 12) | ((mv.from as u16) << 6) | mv.to as u16
}

pub fn decode_move(raw: u16) -> Option<Move> {
    let to = Square::index((raw & 0x3f) as usize);
    let from = Square::index(((raw >> 6) & 0x3f) as usize);
    let promotion = match (raw >> 12) & 0x7 {
        0 => None,
        1 => Some(Piece::Knight),
        2 => Some(Piece::Bishop),
        3 => Some(Piece::Rook),
        4 => Some(Piece::Queen),
        _ => return None,
    };
    Some(Move { from, to, promotion })
}

/// How to choose among several book moves for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BookPolicy {
    /// Highest weight; the earlier record wins a tie.
    #[default]
    BestWeight,
    /// Random pick proportional to weight, from a seeded generator.
    Weighted { seed: u64 },
}

#[derive(Debug, Clone)]
pub struct Book {
    entries: Vec<BookEntry>,
    policy: BookPolicy,
    rng: SmallRng,
}

impl Book {
    pub fn from_entries(mut entries: Vec<BookEntry>) -> Self {
        entries.sort_by_key(|e| e.key);
        Self { entries, policy: BookPolicy::default(), rng: SmallRng::seed_from_u64(0) }
    }

    pub fn with_policy(mut self, policy: BookPolicy) -> Self {
        if let BookPolicy::Weighted { seed } = policy { self.rng = SmallRng::seed_from_u64(seed); }
        self.policy = policy;
        self
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| EngineError::io(path, e))?;
        if bytes.len() % ENTRY_BYTES != 0 {
            return Err(EngineError::BookFormat {
                path: path.to_path_buf(),
                reason: format!("{} bytes is not a whole number of {ENTRY_BYTES}-byte entries", bytes.len()),
            });
        }
        let entries: Vec<BookEntry> = bytes.chunks_exact(ENTRY_BYTES).map(BookEntry::from_bytes).collect();
        debug!("loaded {} book entries from {}", entries.len(), path.display());
        Ok(Self::from_entries(entries))
    }

    /// Builds a book from opening lines: every position along each line
    /// points at the next move, weighted by how many lines share it.
    pub fn from_openings(openings: &[ChessOpening]) -> Result<Self> {
        let mut counts: BTreeMap<(u64, u16), u16> = BTreeMap::new();
        for opening in openings {
            let mut pos = Position::startpos();
            for uci in &opening.moves {
                let mv = pos.find_move_uci(uci)
                    .ok_or_else(|| EngineError::IllegalMove(format!("{uci} in {}", opening.name)))?;
                let key = zobrist::compute(pos.board());
                let w = counts.entry((key, encode_move(mv))).or_insert(0);
                *w = w.saturating_add(1);
                pos.play(mv);
            }
        }
        let entries = counts.into_iter()
            .map(|((key, mv), weight)| BookEntry { key, mv, weight, learn: 0 })
            .collect();
        Ok(Self::from_entries(entries))
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut out = Vec::with_capacity(self.entries.len() * ENTRY_BYTES);
        for e in &self.entries { e.write_bytes(&mut out); }
        std::fs::write(path, out).map_err(|e| EngineError::io(path, e))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries_for(&self, key: u64) -> &[BookEntry] {
        let start = self.entries.partition_point(|e| e.key < key);
        let end = self.entries.partition_point(|e| e.key <= key);
        &self.entries[start..end]
    }

    /// Book move for `pos`, or `None` when the position is not covered.
    /// Stored moves that are not legal here are skipped.
    pub fn probe(&mut self, pos: &Position) -> Option<Move> {
        let key = zobrist::compute(pos.board());
        let legal = pos.legal_moves();
        let candidates: Vec<(Move, u16)> = self.entries_for(key).iter()
            .filter_map(|e| {
                let mv = decode_move(e.mv).filter(|m| legal.contains(m));
                if mv.is_none() { warn!("book entry {:#06x} for key {key:#018x} is not legal here", e.mv); }
                mv.map(|m| (m, e.weight))
            })
            .collect();
        if candidates.is_empty() { return None; }

        match self.policy {
            BookPolicy::BestWeight => {
                let mut best = candidates[0];
                for &c in &candidates[1..] { if c.1 > best.1 { best = c; } }
                Some(best.0)
            }
            BookPolicy::Weighted { .. } => {
                let total: u32 = candidates.iter().map(|c| c.1 as u32).sum();
                if total == 0 { return Some(candidates[0].0); }
                let mut pick = self.rng.gen_range(0..total);
                for &(m, w) in &candidates {
                    if pick < w as u32 { return Some(m); }
                    pick -= w as u32;
                }
                Some(candidates[candidates.len() - 1].0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_encoding_covers_promotions() {
        let pos = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        for m in pos.legal_moves() {
            assert_eq!(decode_move(encode_move(m)), Some(m));
        }
    }

    #[test]
    fn entry_bytes_are_big_endian() {
        let e = BookEntry { key: 0x0102030405060708, mv: 0x090a, weight: 0x0b0c, learn: 0x0d0e0f10 };
        let mut out = Vec::new();
        e.write_bytes(&mut out);
        assert_eq!(out, (1u8..=16).collect::<Vec<_>>());
        assert_eq!(BookEntry::from_bytes(&out), e);
    }

    #[test]
    fn entries_for_returns_only_matching_key() {
        let mk = |key, mv| BookEntry { key, mv, weight: 1, learn: 0 };
        let book = Book::from_entries(vec![mk(5, 1), mk(3, 2), mk(5, 3), mk(9, 4)]);
        let hits: Vec<u16> = book.entries_for(5).iter().map(|e| e.mv).collect();
        assert_eq!(hits, vec![1, 3]);
        assert!(book.entries_for(4).is_empty());
    }
}
