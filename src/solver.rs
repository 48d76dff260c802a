//! Two-phase IDA* search.
//!
//! Phase 1 brings the cube into the subgroup generated by
//! U, D, R2, L2, F2 and B2, searching over (udslice, twist, flip). Phase 2
//! solves the cube inside that subgroup, searching over (edge4, edge8,
//! corner) with only those six generators.
//!
//! Key optimizations:
//! - Per-depth frames in one preallocated `Vec` instead of cloning cubes
//! - Coordinates advance through move tables, never through `CubieCube`
//! - Phase-2 starts that already failed are remembered in an `FxHashMap`

use std::time::{Duration, Instant};

use log::debug;
use rustc_hash::FxHashMap;

use crate::cubie::CubieCube;
use crate::error::CubeError;
use crate::facelet::FaceCube;
use crate::moves::{Move, ALL_MOVES};
use crate::tables::Tables;

/// Longest sequence the search will return unless told otherwise.
pub const DEFAULT_MAX_LENGTH: usize = 25;

/// Wall-clock budget unless told otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Face placeholder for "no previous move".
const NO_FACE: u8 = u8::MAX;

/// Limits for a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Upper bound on the length of the returned sequence.
    pub max_length: usize,
    /// Wall-clock budget, measured from the start of the search.
    pub timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A sequence of at most `max_length` moves that solves the cube.
    Solved(Vec<Move>),
    /// Every sequence up to `max_length` was ruled out.
    Exhausted,
    /// The deadline passed before a solution was found.
    TimedOut,
}

/// Counters collected while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub phase1_nodes: u64,
    pub phase2_nodes: u64,
    /// Phase-1 solutions handed to phase 2.
    pub phase2_starts: u64,
    /// Phase-2 starts skipped because the same state already failed.
    pub phase2_skipped: u64,
    pub elapsed: Duration,
}

/// Search state at one depth.
///
/// `face` and `power` are the move taken from this frame to the next one.
/// Phase-1 coordinates are filled during phase 1; phase-2 coordinates from
/// the phase-1 length onward.
#[derive(Clone, Copy, Debug)]
struct Frame {
    face: u8,
    power: u8,
    twist: u16,
    flip: u16,
    udslice: u16,
    edge4: u16,
    edge8: u16,
    corner: u16,
}

impl Frame {
    const EMPTY: Frame = Frame {
        face: NO_FACE,
        power: 0,
        twist: 0,
        flip: 0,
        udslice: 0,
        edge4: 0,
        edge8: 0,
        corner: 0,
    };

    fn last_move(&self) -> Move {
        Move::from_index(3 * self.face as usize + self.power as usize - 1)
    }
}

/// Result of one recursive call.
enum Step {
    /// Solved with this many moves in total.
    Found(usize),
    NotFound,
    TimedOut,
}

/// True if `face` may not follow a turn of `previous`.
///
/// Turning the same face twice in a row is never useful, and of two opposite
/// faces (which commute) only the order with the lower face first is kept.
#[inline(always)]
fn is_blocked(previous: u8, face: u8) -> bool {
    previous == face || previous == face + 3
}

/// Two-phase solver reading a shared set of tables.
#[derive(Clone, Copy, Debug)]
pub struct Solver<'t> {
    tables: &'t Tables,
}

impl<'t> Solver<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        Self { tables }
    }

    /// Validates the sticker layout and searches for a solution.
    pub fn solve(&self, cube: &FaceCube, config: &SolverConfig) -> Result<Outcome, CubeError> {
        let cubie = CubieCube::from_facelets(cube)?;
        let (outcome, _) = self.solve_cubie(&cubie, config)?;
        Ok(outcome)
    }

    /// Searches for a solution of a cubie-level cube, also returning
    /// counters describing the search.
    pub fn solve_cubie(
        &self,
        cube: &CubieCube,
        config: &SolverConfig,
    ) -> Result<(Outcome, SearchStats), CubeError> {
        cube.verify()?;
        let start = Instant::now();

        if cube.is_solved() {
            return Ok((Outcome::Solved(Vec::new()), SearchStats::default()));
        }

        let mut search = Search::new(self.tables, cube, config, start);
        let outcome = search.run();
        search.stats.elapsed = start.elapsed();
        debug!("Search finished: {:?}", search.stats);

        Ok((outcome, search.stats))
    }
}

/// Mutable state of a single search.
struct Search<'t> {
    tables: &'t Tables,
    start: CubieCube,
    max_length: usize,
    deadline: Option<Instant>,
    frames: Vec<Frame>,
    /// Length of the phase-1 prefix phase 2 is currently extending.
    phase1_length: usize,
    /// Phase-2 start (corner, edge4, edge8, last phase-1 move) -> largest
    /// budget it was searched with and failed.
    failed_phase2: FxHashMap<(u16, u16, u16, u8), usize>,
    stats: SearchStats,
}

impl<'t> Search<'t> {
    fn new(tables: &'t Tables, cube: &CubieCube, config: &SolverConfig, start: Instant) -> Self {
        let mut frames = vec![Frame::EMPTY; config.max_length + 1];
        frames[0].twist = cube.twist();
        frames[0].flip = cube.flip();
        frames[0].udslice = cube.udslice();

        Self {
            tables,
            start: *cube,
            max_length: config.max_length,
            // a timeout too large to represent means no deadline
            deadline: start.checked_add(config.timeout),
            frames,
            phase1_length: 0,
            failed_phase2: FxHashMap::default(),
            stats: SearchStats::default(),
        }
    }

    #[inline(always)]
    fn timed_out(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Tries phase-1 lengths 0, 1, ... up to `max_length`.
    fn run(&mut self) -> Outcome {
        for depth in 0..=self.max_length {
            debug!("Phase 1 depth {depth}");
            match self.phase1(0, depth) {
                Step::Found(length) => return Outcome::Solved(self.moves(length)),
                Step::TimedOut => return Outcome::TimedOut,
                Step::NotFound => {}
            }
        }
        Outcome::Exhausted
    }

    fn phase1_bound(&self, frame: &Frame) -> usize {
        let tables = self.tables;
        tables
            .udslice_twist_prune
            .get(frame.udslice, frame.twist)
            .max(tables.udslice_flip_prune.get(frame.udslice, frame.flip)) as usize
    }

    fn phase2_bound(&self, frame: &Frame) -> usize {
        let tables = self.tables;
        tables
            .edge4_edge8_prune
            .get(frame.edge4, frame.edge8)
            .max(tables.edge4_corner_prune.get(frame.edge4, frame.corner)) as usize
    }

    fn previous_face(&self, n: usize) -> u8 {
        if n == 0 {
            NO_FACE
        } else {
            self.frames[n - 1].face
        }
    }

    /// Explores phase-1 sequences of exactly `n + remaining` moves.
    fn phase1(&mut self, n: usize, remaining: usize) -> Step {
        if self.timed_out() {
            return Step::TimedOut;
        }
        self.stats.phase1_nodes += 1;

        let frame = self.frames[n];
        let bound = self.phase1_bound(&frame);
        if remaining == 0 {
            if bound != 0 {
                return Step::NotFound;
            }
            // ending on a phase-2 move means a shorter phase 1 already got here
            if n > 0 && self.frames[n - 1].last_move().is_phase_two() {
                return Step::NotFound;
            }
            return self.start_phase2(n);
        }
        if bound > remaining {
            return Step::NotFound;
        }

        let previous = self.previous_face(n);
        let tables = self.tables;
        for mv in ALL_MOVES {
            let face = mv.face() as u8;
            if is_blocked(previous, face) {
                continue;
            }
            let index = mv.index();

            self.frames[n].face = face;
            self.frames[n].power = mv.power();
            self.frames[n + 1] = Frame {
                twist: tables.twist_move.get(frame.twist, index),
                flip: tables.flip_move.get(frame.flip, index),
                udslice: tables.udslice_move.get(frame.udslice, index),
                ..Frame::EMPTY
            };

            match self.phase1(n + 1, remaining - 1) {
                Step::NotFound => {}
                step => return step,
            }
        }
        Step::NotFound
    }

    /// Runs phase 2 from the cube reached by the first `n` moves.
    fn start_phase2(&mut self, n: usize) -> Step {
        let budget = self.max_length - n;

        let mut cube = self.start;
        for frame in &self.frames[..n] {
            cube = cube.apply_move(frame.last_move());
        }

        let last_move = if n == 0 {
            NO_FACE
        } else {
            self.frames[n - 1].last_move().index() as u8
        };
        let key = (cube.corner(), cube.edge4(), cube.edge8(), last_move);
        if self
            .failed_phase2
            .get(&key)
            .is_some_and(|&failed| failed >= budget)
        {
            self.stats.phase2_skipped += 1;
            return Step::NotFound;
        }
        self.stats.phase2_starts += 1;
        self.phase1_length = n;

        let frame = &mut self.frames[n];
        frame.corner = key.0;
        frame.edge4 = key.1;
        frame.edge8 = key.2;

        let bound = self.phase2_bound(&self.frames[n]);
        for depth in bound..=budget {
            match self.phase2(n, depth) {
                Step::NotFound => {}
                step => return step,
            }
        }

        self.failed_phase2.insert(key, budget);
        Step::NotFound
    }

    /// Explores phase-2 sequences of at most `remaining` further moves.
    fn phase2(&mut self, n: usize, remaining: usize) -> Step {
        if self.timed_out() {
            return Step::TimedOut;
        }
        self.stats.phase2_nodes += 1;

        let frame = self.frames[n];
        let bound = self.phase2_bound(&frame);
        // only the all-zero state has a zero bound
        if bound == 0 {
            return Step::Found(n);
        }
        if bound > remaining {
            return Step::NotFound;
        }

        let previous = self.previous_face(n);
        // Phase 1 may end on R, F, L or B or on their inverses. Letting the
        // clockwise ending be followed by a half turn of the same face covers
        // both, and the pair is merged into one move afterwards.
        let merges = n == self.phase1_length && n > 0 && self.frames[n - 1].power == 1;
        let tables = self.tables;
        for mv in ALL_MOVES {
            let face = mv.face() as u8;
            if !mv.is_phase_two() {
                continue;
            }
            if is_blocked(previous, face) && !(merges && face == previous) {
                continue;
            }
            let index = mv.index();

            self.frames[n].face = face;
            self.frames[n].power = mv.power();
            self.frames[n + 1] = Frame {
                edge4: tables.edge4_move.get(frame.edge4, index),
                edge8: tables.edge8_move.get(frame.edge8, index),
                corner: tables.corner_move.get(frame.corner, index),
                ..Frame::EMPTY
            };

            match self.phase2(n + 1, remaining - 1) {
                Step::NotFound => {}
                step => return step,
            }
        }
        Step::NotFound
    }

    /// The moves of the first `length` frames, with a quarter turn and a
    /// following half turn of the same face merged.
    fn moves(&self, length: usize) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::with_capacity(length);
        for mv in self.frames[..length].iter().map(Frame::last_move) {
            match moves.last() {
                Some(&last) if last.face() == mv.face() => {
                    moves.pop();
                    // turns that cancel out leave nothing behind
                    moves.extend(Move::new(mv.face(), (last.power() + mv.power()) % 4));
                }
                _ => moves.push(mv),
            }
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelet::Face;
    use crate::moves::{parse_sequence, scramble};

    fn solve_scramble(moves: &[Move], config: &SolverConfig) -> (CubieCube, Outcome) {
        let cube = CubieCube::SOLVED.apply_sequence(moves);
        let (outcome, _) = Solver::new(Tables::global())
            .solve_cubie(&cube, config)
            .unwrap();
        (cube, outcome)
    }

    fn assert_solves(cube: &CubieCube, outcome: &Outcome, max_length: usize) {
        let Outcome::Solved(solution) = outcome else {
            panic!("Expected a solution, got {outcome:?}");
        };
        assert!(
            solution.len() <= max_length,
            "Solution has {} moves, limit was {max_length}",
            solution.len()
        );
        assert!(
            cube.apply_sequence(solution).is_solved(),
            "Solution does not solve the cube"
        );
    }

    #[test]
    fn test_solved_cube() {
        let solver = Solver::new(Tables::global());
        let outcome = solver
            .solve(&FaceCube::SOLVED, &SolverConfig::default())
            .unwrap();
        assert_eq!(outcome, Outcome::Solved(Vec::new()));
    }

    #[test]
    fn test_random_scrambles() {
        let mut rng = fastrand::Rng::with_seed(2024);
        let config = SolverConfig {
            timeout: Duration::from_secs(120),
            ..SolverConfig::default()
        };

        for length in [1, 5, 15, 25] {
            for _ in 0..3 {
                let moves = scramble(&mut rng, length);
                let (cube, outcome) = solve_scramble(&moves, &config);
                assert_solves(&cube, &outcome, config.max_length);
            }
        }
    }

    #[test]
    fn test_single_move_is_undone() {
        for mv in ALL_MOVES {
            let (_, outcome) = solve_scramble(&[mv], &SolverConfig::default());
            assert_eq!(outcome, Outcome::Solved(vec![mv.inverse()]));
        }
    }

    #[test]
    fn test_phase_two_scramble_uses_phase_two_moves() {
        let moves = parse_sequence("U R2 D' F2 L2 U2 B2 D").unwrap();
        let (cube, outcome) = solve_scramble(&moves, &SolverConfig::default());
        assert_solves(&cube, &outcome, DEFAULT_MAX_LENGTH);

        let Outcome::Solved(solution) = outcome else {
            unreachable!();
        };
        assert!(
            solution.iter().all(|mv| mv.is_phase_two()),
            "Unexpected quarter turn in {solution:?}"
        );
    }

    #[test]
    fn test_solution_respects_max_length() {
        let moves = parse_sequence("R U R' U' F2 D L' B").unwrap();
        let config = SolverConfig {
            max_length: 12,
            timeout: Duration::from_secs(60),
        };
        let (cube, outcome) = solve_scramble(&moves, &config);
        assert_solves(&cube, &outcome, 12);
    }

    #[test]
    fn test_superflip_exhausts_short_budget() {
        let mut cube = CubieCube::SOLVED;
        cube.edge_orientation = [1; 12];
        let (outcome, stats) = Solver::new(Tables::global())
            .solve_cubie(
                &cube,
                &SolverConfig {
                    max_length: 5,
                    timeout: Duration::from_secs(60),
                },
            )
            .unwrap();
        assert_eq!(outcome, Outcome::Exhausted);
        assert!(stats.phase1_nodes > 0);
    }

    #[test]
    fn test_zero_timeout() {
        let moves = parse_sequence("R U F D L B").unwrap();
        let config = SolverConfig {
            timeout: Duration::ZERO,
            ..SolverConfig::default()
        };
        let (_, outcome) = solve_scramble(&moves, &config);
        assert_eq!(outcome, Outcome::TimedOut);
    }

    #[test]
    fn test_invalid_cube_is_rejected() {
        let mut cube = CubieCube::SOLVED;
        cube.corner_orientation[0] = 1;
        let result = Solver::new(Tables::global()).solve_cubie(&cube, &SolverConfig::default());
        assert_eq!(result.unwrap_err(), CubeError::InvalidCornerTwist);
    }

    #[test]
    fn test_blocked_faces() {
        let (u, d) = (Face::U as u8, Face::D as u8);
        assert!(is_blocked(u, u));
        assert!(is_blocked(d, u));
        assert!(!is_blocked(u, d));
        assert!(!is_blocked(NO_FACE, u));
    }
}
