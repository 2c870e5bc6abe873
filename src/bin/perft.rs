use anyhow::{Context, Result};
use pstbot::perft::{divide, perft};
use pstbot::Position;

#[derive(clap::Parser, Debug)]
#[command(name = "perft", about = "Perft driver for PstBot")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Print per-move counts
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> Result<()> {
    use clap::Parser;
    use rayon::prelude::*;
    use std::time::Instant;

    env_logger::init();
    let args = Args::parse();
    let mut base = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).context("parsing FEN")?
    };

    if args.divide {
        let rows = divide(&mut base, args.depth);
        let total: u64 = rows.iter().map(|(_, n)| n).sum();
        for (mv, n) in rows { println!("{mv}: {n}"); }
        println!("nodes: {total}");
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build().context("thread pool")?;
    let depth = args.depth;
    let (nodes, dt) = pool.install(|| {
        let t0 = Instant::now();
        let nodes = if args.threads <= 1 || depth < 2 {
            perft(&mut base.clone(), depth)
        } else {
            base.legal_moves().par_iter().map(|&mv| {
                let mut p = base.clone();
                p.play(mv);
                perft(&mut p, depth - 1)
            }).sum()
        };
        (nodes, t0.elapsed().as_secs_f64())
    });

    if args.nps { println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON)); }
    else { println!("nodes: {nodes}"); }
    Ok(())
}
