use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pstbot::{EngineConfig, MoveSelector, MoveSource, Position};
use pstbot::book::BookPolicy;
use pstbot::uci::UciEngine;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fixed-depth alpha-beta chess bot with an opening book", long_about = None)]
struct Args {
    /// JSON engine config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search depth in plies (overrides the config)
    #[arg(long)]
    depth: Option<u32>,

    /// Opening book file (overrides the config)
    #[arg(long)]
    book: Option<PathBuf>,

    /// Run without any opening book
    #[arg(long, default_value_t = false)]
    no_book: bool,

    /// Fall back to the bundled opening lines when no book file is loaded
    #[arg(long, default_value_t = false)]
    builtin_book: bool,

    /// Pick book moves at random by weight, using this seed
    #[arg(long)]
    book_seed: Option<u64>,

    /// JSON piece-square tables (overrides the config)
    #[arg(long)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Speak UCI on stdin/stdout (default)
    Uci,
    /// Print the chosen move for one position and exit
    Bestmove {
        /// FEN string or "startpos"
        #[arg(long, default_value = "startpos")]
        fen: String,
        /// Moves (UCI) to play from the given position first
        #[arg(long, num_args = 0..)]
        moves: Vec<String>,
    },
}

fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut cfg = match &args.config {
        Some(p) => EngineConfig::load(p).with_context(|| format!("loading config {}", p.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(d) = args.depth { cfg.depth = d; }
    if let Some(b) = &args.book { cfg.book_path = Some(b.clone()); }
    if args.no_book { cfg.book_path = None; cfg.use_builtin_book = false; }
    else if args.builtin_book { cfg.use_builtin_book = true; }
    if let Some(seed) = args.book_seed { cfg.book_policy = BookPolicy::Weighted { seed }; }
    if let Some(t) = &args.tables { cfg.tables_path = Some(t.clone()); }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = build_config(&args)?;
    let selector = MoveSelector::from_config(&cfg).context("building engine")?;
    log::info!("depth {} book {}", cfg.depth, if selector.has_book() { "on" } else { "off" });

    match args.command.unwrap_or(Command::Uci) {
        Command::Uci => UciEngine::new(selector).run_loop()?,
        Command::Bestmove { fen, moves } => {
            let mut pos = if fen == "startpos" { Position::startpos() } else { Position::from_fen(&fen)? };
            for m in &moves { pos.make_move_uci(m)?; }
            if !pos.has_legal_moves() { anyhow::bail!("no legal moves in {}", pos.fen()); }
            let mut selector = selector;
            let sel = selector.select_move(&mut pos);
            match sel.source {
                MoveSource::Book => println!("bestmove {} (book)", pos.move_to_uci(sel.mv)),
                MoveSource::Search => println!(
                    "bestmove {} score {} nodes {}",
                    pos.move_to_uci(sel.mv),
                    sel.score.unwrap_or_default(),
                    sel.nodes
                ),
            }
        }
    }
    Ok(())
}
