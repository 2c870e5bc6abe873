use log::{debug, warn};
use std::io::{self, BufRead, Write};

use crate::board::Position;
use crate::search::eval::{BLACK_MATED, WHITE_MATED};
use crate::search::select::MoveSelector;

/// Minimal UCI host around a [`MoveSelector`].
pub struct UciEngine {
    pos: Position,
    selector: MoveSelector,
}

impl UciEngine {
    pub fn new(selector: MoveSelector) -> Self { Self { pos: Position::startpos(), selector } }

    pub fn position(&self) -> &Position { &self.pos }

    fn cmd_uci(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name PstBot")?;
        writeln!(out, "id author PieBot Team")?;
        writeln!(out, "option name Depth type spin default {} min 1 max 16", self.selector.depth())?;
        writeln!(out, "uciok")
    }

    fn cmd_setoption(&mut self, args: &str) {
        // setoption name Depth value N
        let mut tokens = args.split_whitespace();
        let (mut name, mut value) = (None, None);
        while let Some(tok) = tokens.next() {
            match tok {
                "name" => name = tokens.next(),
                "value" => value = tokens.next(),
                _ => {}
            }
        }
        match (name, value.and_then(|v| v.parse::<u32>().ok())) {
            (Some(n), Some(d)) if n.eq_ignore_ascii_case("depth") && d >= 1 => self.selector.set_depth(d),
            _ => warn!("ignoring setoption {args}"),
        }
    }

    /// Handles `position startpos|fen <fen> [moves ...]`. Malformed input
    /// leaves the current position in place.
    pub fn cmd_position(&mut self, args: &str) {
        let mut tokens = args.split_whitespace().peekable();
        let base = match tokens.next() {
            Some("startpos") => Ok(Position::startpos()),
            Some("fen") => {
                let mut fields = Vec::with_capacity(6);
                while let Some(&t) = tokens.peek() {
                    if t == "moves" { break; }
                    fields.push(t);
                    tokens.next();
                }
                Position::from_fen(&fields.join(" "))
            }
            _ => return,
        };
        let mut pos = match base {
            Ok(p) => p,
            Err(e) => { warn!("{e}"); return; }
        };
        if let Some("moves") = tokens.next() {
            for m in tokens {
                if let Err(e) = pos.make_move_uci(m) { warn!("{e}"); return; }
            }
        }
        self.pos = pos;
    }

    fn cmd_go(&mut self, args: &str, out: &mut impl Write) -> io::Result<()> {
        // Clock fields are read for the log only; the search depth is fixed.
        // `depth N` overrides it for this search alone.
        let mut depth = self.selector.depth();
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            match tok {
                "depth" => {
                    if let Some(d) = tokens.next().and_then(|s| s.parse::<u32>().ok()).filter(|&d| d >= 1) {
                        depth = d;
                    }
                }
                "wtime" | "btime" | "winc" | "binc" | "movetime" => {
                    if let Some(v) = tokens.next() { debug!("{tok} {v} (not used)"); }
                }
                _ => {}
            }
        }
        if !self.pos.has_legal_moves() { return writeln!(out, "bestmove 0000"); }
        let sel = self.selector.select_move_at(&mut self.pos, depth);
        if let Some(score) = sel.score {
            writeln!(out, "info depth {depth} score {} nodes {}", uci_score(score, &self.pos), sel.nodes)?;
        }
        writeln!(out, "bestmove {}", self.pos.move_to_uci(sel.mv))
    }

    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() { return Ok(true); }
        match line {
            "uci" => self.cmd_uci(out)?,
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.pos = Position::startpos(),
            "quit" => return Ok(false),
            "stop" => {}
            _ => {
                if let Some(rest) = line.strip_prefix("position ") { self.cmd_position(rest); }
                else if let Some(rest) = line.strip_prefix("setoption ") { self.cmd_setoption(rest); }
                else if line == "go" { self.cmd_go("", out)?; }
                else if let Some(rest) = line.strip_prefix("go ") { self.cmd_go(rest, out)?; }
                else { debug!("unknown command: {line}"); }
            }
        }
        out.flush()?;
        Ok(true)
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in stdin.lock().lines() {
            if !self.handle_line(&line?, &mut out)? { break; }
        }
        Ok(())
    }
}

// UCI scores are from the side to move's point of view. Mate sentinels carry
// no distance, so they are reported as mate in one either way.
fn uci_score(white_score: i32, pos: &Position) -> String {
    let white = pos.side_to_move_is_white();
    match white_score {
        BLACK_MATED => format!("mate {}", if white { 1 } else { -1 }),
        WHITE_MATED => format!("mate {}", if white { -1 } else { 1 }),
        s => format!("cp {}", if white { s } else { -s }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(engine: &mut UciEngine, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for l in lines { engine.handle_line(l, &mut out).unwrap(); }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn handshake() {
        let mut e = UciEngine::new(MoveSelector::default());
        let out = run(&mut e, &["uci", "isready"]);
        assert!(out.contains("uciok"));
        assert!(out.ends_with("readyok\n"));
    }

    #[test]
    fn bad_move_keeps_previous_position() {
        let mut e = UciEngine::new(MoveSelector::default());
        run(&mut e, &["position startpos moves e2e4"]);
        let fen = e.position().fen();
        run(&mut e, &["position startpos moves e2e5"]);
        assert_eq!(e.position().fen(), fen);
    }

    #[test]
    fn go_depth_applies_to_one_search_only() {
        let mut e = UciEngine::new(MoveSelector::default());
        let first = run(&mut e, &["position fen k7/8/8/8/8/8/3qQ3/7K w - - 0 1", "go depth 1"]);
        assert!(first.contains("info depth 1 "), "{first}");
        let second = run(&mut e, &["go wtime 1000 btime 1000"]);
        assert!(second.contains("info depth 4 "), "{second}");
        assert_eq!(e.selector.depth(), 4);
    }

    #[test]
    fn mate_is_reported_as_mate() {
        let mut e = UciEngine::new(MoveSelector::default());
        // Qc8 mates
        let out = run(&mut e, &["position fen k7/8/1K6/8/8/8/8/2Q5 w - - 0 1", "go depth 1"]);
        assert!(out.contains("score mate 1 "), "{out}");
    }

    #[test]
    fn mated_side_sees_negative_mate() {
        let pos = Position::from_fen("k7/8/8/8/8/8/8/K7 b - - 0 1").unwrap();
        assert_eq!(uci_score(BLACK_MATED, &pos), "mate -1");
        assert_eq!(uci_score(WHITE_MATED, &pos), "mate 1");
        assert_eq!(uci_score(150, &pos), "cp -150");
    }

    #[test]
    fn go_reports_a_legal_move() {
        let mut e = UciEngine::new(MoveSelector::default());
        let out = run(&mut e, &["position fen k7/8/8/8/8/8/3qQ3/7K w - - 0 1", "go depth 1"]);
        assert!(out.contains("bestmove e2d2"), "{out}");
    }
}
