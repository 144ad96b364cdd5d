use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use paddock::{Board, Connectivity, SolveConfig};

/// Find the best-scoring walled enclosure around the horse on a map.
#[derive(Parser)]
struct Args {
    /// Path to the map text file.
    #[arg(long)]
    map: PathBuf,
    /// Maximum number of walls to place.
    #[arg(long, default_value_t = 13)]
    max_walls: u32,
    /// Connectivity encoding.
    #[arg(long, value_enum, default_value = "reachability")]
    encoding: Encoding,
    /// Extra score for each enclosed cherry.
    #[arg(long, default_value_t = 3)]
    cherry_bonus: i64,
    /// Wall-clock limit for the solve, in seconds.
    #[arg(long)]
    time_limit: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Encoding {
    Flow,
    Reachability,
}

impl From<Encoding> for Connectivity {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::Flow => Connectivity::Flow,
            Encoding::Reachability => Connectivity::Reachability,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let text = fs::read_to_string(&args.map)
        .with_context(|| format!("reading map {}", args.map.display()))?;
    let board: Board = text.parse()?;

    let mut config = SolveConfig::new(args.max_walls)
        .with_connectivity(args.encoding.into())
        .with_cherry_bonus(args.cherry_bonus);
    if let Some(seconds) = args.time_limit {
        config = config.with_time_limit(Duration::from_secs_f64(seconds));
    }

    let start = Instant::now();
    let enclosure = board.solve(&config)?;
    let elapsed = start.elapsed();

    println!("Solved in {:.2} seconds.", elapsed.as_secs_f64());
    println!("Status: {}", enclosure.status());
    println!("Objective (score): {}", enclosure.score());
    println!("Walls used: {} / {}", enclosure.walls_used(), args.max_walls);
    println!("Pasture tiles: {}", enclosure.pasture_tiles());
    println!("{enclosure}");

    Ok(())
}
