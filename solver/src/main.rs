//! Solve a Numberlink puzzle described by a JSON definition.
//!
//! Usage:
//!   fluxsat <puzzle.json> [options]
//!   fluxsat --stdin [options]
//!
//! The definition looks like `{"length": 5, "colors": 5, "nodes": [[row, col, color], ...]}`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use log::info;

use fluxsat::{Outcome, Puzzle, PuzzleDefinition, PuzzleSolver, SolveOptions, SolveResponse};

#[derive(Parser)]
#[command(name = "fluxsat")]
#[command(about = "Boolean SAT solver for Numberlink and Flow Free puzzles")]
#[command(version)]
struct Cli {
    /// Path to puzzle JSON file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read puzzle from stdin instead of file
    #[arg(long)]
    stdin: bool,

    /// Give up after excluding this many closed loops
    #[arg(long)]
    max_refinements: Option<usize>,

    /// Print the answer as a JSON response instead of a board
    #[arg(long)]
    json: bool,

    /// Log more; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_input(cli: &Cli) -> color_eyre::Result<String> {
    if cli.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).wrap_err("failed to read stdin")?;
        return Ok(buffer);
    }

    match &cli.file {
        Some(path) => fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display())),
        None => bail!("no puzzle given; pass a FILE or --stdin"),
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => simplelog::LevelFilter::Warn,
        1 => simplelog::LevelFilter::Info,
        2 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let definition: PuzzleDefinition = serde_json::from_str(&read_input(&cli)?)
        .wrap_err("malformed puzzle definition")?;
    let puzzle = Puzzle::try_from(&definition)?;
    info!("read a {}x{} puzzle with {} colors", puzzle.length(), puzzle.length(), puzzle.num_colors());

    let options = SolveOptions { max_refinements: cli.max_refinements };
    let outcome = PuzzleSolver::new(&puzzle).with_options(options).solve()?;

    if cli.json {
        println!("{}", serde_json::to_string(&SolveResponse::from(&outcome))?);
        return Ok(());
    }

    println!("{}", puzzle);
    match outcome {
        Outcome::Solved(solution) => {
            println!("{}", solution);
            print!("{}", solution.to_rows_string());
            info!("{} loops excluded", solution.refinements());
        }
        Outcome::Unsatisfiable => println!("UNSAT"),
    }

    Ok(())
}
