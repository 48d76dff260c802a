//! Two-Phase Cube Solver Library
//!
//! Solves the 3x3x3 cube with Kociemba's two-phase algorithm: precomputed
//! move and pruning tables over six integer coordinates drive an IDA* search
//! that first reaches the subgroup generated by U, D, R2, L2, F2 and B2 and
//! then finishes inside it.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let outcome = twophase::solve(
//!     "DUUBULDBFRBFRRULLLBRDFFFBLURDBFDFDRFRULBLUFDURRBLBDUDL",
//!     25,
//!     Duration::from_secs(10),
//! )
//! .unwrap();
//! println!("{outcome:?}");
//! ```

pub mod coord;
pub mod cubie;
pub mod error;
pub mod facelet;
pub mod move_table;
pub mod moves;
pub mod persistence;
pub mod pruning;
pub mod solver;
pub mod tables;

use std::time::Duration;

pub use cubie::CubieCube;
pub use error::{CubeError, ParseMoveError};
pub use facelet::{Face, FaceCube};
pub use moves::{format_sequence, parse_sequence, Move};
pub use solver::{Outcome, SearchStats, Solver, SolverConfig};
pub use tables::Tables;

/// Solves a 54-character facelet string using the process-wide tables.
///
/// Builds the tables on first use. Fails only if the string does not
/// describe a reachable cube; running out of moves or time is reported
/// through the returned `Outcome`.
pub fn solve(facelets: &str, max_length: usize, timeout: Duration) -> Result<Outcome, CubeError> {
    let cube: FaceCube = facelets.parse()?;
    let config = SolverConfig {
        max_length,
        timeout,
    };
    Solver::new(Tables::global()).solve(&cube, &config)
}
