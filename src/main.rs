//! Two-Phase Cube Solver
//!
//! Command line front end: solves facelet strings, generates scrambles,
//! prebuilds the table cache and prints cube nets.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use env_logger::TimestampPrecision;
use log::{info, warn, LevelFilter};

use twophase::moves::scramble;
use twophase::solver::{DEFAULT_MAX_LENGTH, DEFAULT_TIMEOUT};
use twophase::{
    format_sequence, persistence, CubieCube, FaceCube, Outcome, Solver, SolverConfig, Tables,
};

/// Default location of the table cache.
const DEFAULT_TABLES_PATH: &str = "twophase_tables.bin";

/// Solves the 3x3x3 cube with the two-phase algorithm.
#[derive(Parser)]
#[command(name = "twophase")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logging verbosity: -v info, -vv debug, -vvv trace.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    log_level: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a cube given as 54 facelet letters in U R F D L B order.
    Solve {
        facelets: String,
        /// Longest solution to accept.
        #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,
        /// Give up after this many seconds.
        #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout_secs: u64,
        /// Table cache file, created on first use.
        #[arg(long, default_value = DEFAULT_TABLES_PATH)]
        tables: PathBuf,
    },
    /// Print a random scramble and the facelet string it produces.
    Scramble {
        #[arg(long, default_value_t = 25)]
        moves: usize,
        /// Seed for a reproducible scramble.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build the move and pruning tables and write the cache.
    Tables {
        #[arg(long, default_value = DEFAULT_TABLES_PATH)]
        tables: PathBuf,
    },
    /// Print a facelet string as an unfolded net.
    Show { facelets: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Command::Solve {
            facelets,
            max_length,
            timeout_secs,
            tables,
        } => run_solve(&facelets, max_length, timeout_secs, &tables),
        Command::Scramble { moves, seed } => {
            run_scramble(moves, seed);
            ExitCode::SUCCESS
        }
        Command::Tables { tables } => {
            run_tables(&tables);
            ExitCode::SUCCESS
        }
        Command::Show { facelets } => run_show(&facelets),
    }
}

/// Loads the shared tables from the cache, warning when they must be built.
fn load_tables(path: &Path) -> &'static Tables {
    if !persistence::is_cached(path) {
        warn!(
            "No table cache at {}, building tables (this takes a while)",
            path.display()
        );
    }
    Tables::global_from_cache(path)
}

/// Solves one cube and prints the move sequence.
fn run_solve(
    facelets: &str,
    max_length: usize,
    timeout_secs: u64,
    tables_path: &Path,
) -> ExitCode {
    let cube: FaceCube = match facelets.parse() {
        Ok(cube) => cube,
        Err(e) => {
            eprintln!("Invalid cube: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cubie = match CubieCube::from_facelets(&cube) {
        Ok(cubie) => cubie,
        Err(e) => {
            eprintln!("Invalid cube: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = SolverConfig {
        max_length,
        timeout: Duration::from_secs(timeout_secs),
    };
    let solver = Solver::new(load_tables(tables_path));

    let (outcome, stats) = match solver.solve_cubie(&cubie, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Invalid cube: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Searched {} phase 1 and {} phase 2 nodes in {:.2?}",
        stats.phase1_nodes, stats.phase2_nodes, stats.elapsed
    );

    match outcome {
        Outcome::Solved(moves) => {
            println!("{}", format_sequence(&moves));
            info!("{} moves", moves.len());
            ExitCode::SUCCESS
        }
        Outcome::Exhausted => {
            eprintln!("No solution with at most {max_length} moves");
            ExitCode::FAILURE
        }
        Outcome::TimedOut => {
            eprintln!("No solution found within {timeout_secs}s");
            ExitCode::FAILURE
        }
    }
}

/// Prints a scramble and the cube it produces.
fn run_scramble(length: usize, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let moves = scramble(&mut rng, length);
    let cube = CubieCube::SOLVED.apply_sequence(&moves);

    println!("{}", format_sequence(&moves));
    println!("{}", cube.to_facelets());
}

/// Builds (or loads) the tables and reports where they are cached.
fn run_tables(path: &Path) {
    let tables = load_tables(path);
    println!("Tables ready at {}", path.display());
    for (name, table) in [
        ("udslice x twist", &tables.udslice_twist_prune),
        ("udslice x flip", &tables.udslice_flip_prune),
        ("edge4 x edge8", &tables.edge4_edge8_prune),
        ("edge4 x corner", &tables.edge4_corner_prune),
    ] {
        println!(
            "  {name}: {} entries, max depth {}",
            table.depths().len(),
            table.max_depth()
        );
    }
}

/// Prints the net of a facelet string.
fn run_show(facelets: &str) -> ExitCode {
    match facelets.parse::<FaceCube>() {
        Ok(cube) => {
            print!("{}", cube.net());
            if let Err(e) = CubieCube::from_facelets(&cube) {
                eprintln!("Not a solvable cube: {e}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid cube: {e}");
            ExitCode::FAILURE
        }
    }
}
