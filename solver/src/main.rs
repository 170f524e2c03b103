//! Solve a puzzle file and print the result.
//!
//! Usage:
//!   solver [FILE] [options]
//!
//! Without a file the bundled 5x5 warp puzzle is solved.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use flowpath::render::export_png;
use flowpath::{Board, PuzzleConfig, SolveStats, SolverConfig};

const BUNDLED: &str = include_str!("../../demos/minimal.json");

#[derive(Parser)]
#[command(name = "solver")]
#[command(about = "Solve Numberlink / Flow Free puzzles, warps included")]
#[command(version)]
struct Cli {
    /// Puzzle JSON file; the bundled example if omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write the solved board to this PNG
    #[arg(long, value_name = "PATH")]
    png: Option<PathBuf>,

    /// Write the board as given, before solving, to this PNG
    #[arg(long, value_name = "PATH")]
    puzzle_png: Option<PathBuf>,

    /// Skip the check that later flows stay joinable
    #[arg(long)]
    no_forward_checking: bool,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Give up after expanding this many search states
    #[arg(long)]
    max_states: Option<usize>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    solved: bool,
    elapsed_ms: f64,
    stats: SolveStats,
    board: Vec<String>,
}

fn label(index: usize) -> char {
    // cycles after Z; wide boards repeat letters
    char::from(b'A' + (index % 26) as u8)
}

fn text<A>(board: &Board<A>) -> String {
    board.to_text(|index, _| label(index))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.file {
        Some(path) => PuzzleConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => PuzzleConfig::from_json(BUNDLED).context("parsing the bundled puzzle")?,
    };
    let mut board = config.build()?;

    if let Some(path) = &cli.puzzle_png {
        export_png(&board, path).with_context(|| format!("writing {}", path.display()))?;
    }

    let timeout = cli.timeout
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("timeout must be a non-negative number of seconds")?;
    let solver_config = SolverConfig {
        forward_checking: !cli.no_forward_checking,
        timeout,
        max_states: cli.max_states,
    };

    if !cli.json {
        print!("{}", text(&board));
        println!();
    }

    let report = board.solve_with(0, &solver_config)?;

    if let Some(path) = &cli.png {
        export_png(&board, path).with_context(|| format!("writing {}", path.display()))?;
    }

    if cli.json {
        let report = Report {
            solved: report.solved,
            elapsed_ms: report.elapsed.as_secs_f64() * 1000.0,
            stats: report.stats,
            board: text(&board).lines().map(str::to_owned).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if report.solved {
            print!("{}", text(&board));
        } else {
            println!("no solution");
        }
        let stats = report.stats;
        println!(
            "{} states, {} probes, {} candidates, {} backtracks, deepest flow {} in {:?}",
            stats.states_expanded, stats.probes, stats.candidates, stats.backtracks, stats.deepest_level, report.elapsed,
        );
    }

    Ok(if report.solved { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
