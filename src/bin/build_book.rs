use anyhow::{Context, Result};
use pstbot::book::openings::{get_chess_openings, load_openings_json};
use pstbot::book::Book;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "build_book", about = "Write a Polyglot opening book from opening lines")]
struct Args {
    /// Output book file
    #[arg(value_name = "OUT", default_value = "book.bin")]
    out: PathBuf,
    /// Extra lines as a JSON array of {"name", "moves"} objects
    #[arg(long)]
    openings: Option<PathBuf>,
    /// Leave out the bundled opening lines
    #[arg(long, default_value_t = false)]
    no_builtin: bool,
}

fn main() -> Result<()> {
    use clap::Parser;

    env_logger::init();
    let args = Args::parse();
    let mut lines = if args.no_builtin { Vec::new() } else { get_chess_openings() };
    if let Some(path) = &args.openings {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        lines.extend(load_openings_json(&text).with_context(|| format!("parsing {}", path.display()))?);
    }
    if lines.is_empty() { anyhow::bail!("no opening lines to build from"); }

    let book = Book::from_openings(&lines)?;
    book.write_to(&args.out)?;
    log::info!("{} lines", lines.len());
    println!("wrote {} entries to {}", book.len(), args.out.display());
    Ok(())
}
