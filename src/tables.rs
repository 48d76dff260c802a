//! The complete set of move and pruning tables used by the search.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use log::info;

use crate::coord::{Corner, Edge4, Edge8, Flip, Twist, UdSlice};
use crate::move_table::MoveTable;
use crate::persistence;
use crate::pruning::PruningTable;

/// Process-wide tables, built or loaded at most once.
static TABLES: OnceLock<Tables> = OnceLock::new();

/// Immutable search context: six move tables and four pruning tables.
///
/// Cheap to share by reference; any number of searches may read it at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tables {
    pub twist_move: MoveTable,
    pub flip_move: MoveTable,
    pub udslice_move: MoveTable,
    pub edge4_move: MoveTable,
    pub edge8_move: MoveTable,
    pub corner_move: MoveTable,

    /// Phase 1: indexed `udslice * N_TWIST + twist`.
    pub udslice_twist_prune: PruningTable,
    /// Phase 1: indexed `udslice * N_FLIP + flip`.
    pub udslice_flip_prune: PruningTable,
    /// Phase 2: indexed `edge4 * N_EDGE8 + edge8`.
    pub edge4_edge8_prune: PruningTable,
    /// Phase 2: indexed `edge4 * N_CORNER + corner`.
    pub edge4_corner_prune: PruningTable,
}

impl Tables {
    /// Builds every table from scratch. CPU bound; takes seconds.
    pub fn build() -> Self {
        let start = Instant::now();

        let twist_move = MoveTable::build::<Twist>();
        let flip_move = MoveTable::build::<Flip>();
        let udslice_move = MoveTable::build::<UdSlice>();
        let edge4_move = MoveTable::build::<Edge4>();
        let edge8_move = MoveTable::build::<Edge8>();
        let corner_move = MoveTable::build::<Corner>();
        info!("Built move tables in {:.2?}", start.elapsed());

        let udslice_twist_prune = PruningTable::build(&udslice_move, &twist_move);
        let udslice_flip_prune = PruningTable::build(&udslice_move, &flip_move);
        let edge4_edge8_prune = PruningTable::build(&edge4_move, &edge8_move);
        let edge4_corner_prune = PruningTable::build(&edge4_move, &corner_move);
        info!("Built all tables in {:.2?}", start.elapsed());

        Self {
            twist_move,
            flip_move,
            udslice_move,
            edge4_move,
            edge8_move,
            corner_move,
            udslice_twist_prune,
            udslice_flip_prune,
            edge4_edge8_prune,
            edge4_corner_prune,
        }
    }

    /// The shared tables, building them on first use.
    ///
    /// Concurrent first callers block until the single build finishes.
    pub fn global() -> &'static Tables {
        TABLES.get_or_init(Tables::build)
    }

    /// The shared tables, loading them from the cache at `path` on first use
    /// (rebuilding and rewriting the cache if it is missing or unreadable).
    ///
    /// Has no effect on the path if the tables were already initialized.
    pub fn global_from_cache(path: &Path) -> &'static Tables {
        TABLES.get_or_init(|| persistence::load_or_build(path))
    }

    pub(crate) fn move_tables(&self) -> [&MoveTable; 6] {
        [
            &self.twist_move,
            &self.flip_move,
            &self.udslice_move,
            &self.edge4_move,
            &self.edge8_move,
            &self.corner_move,
        ]
    }

    pub(crate) fn pruning_tables(&self) -> [&PruningTable; 4] {
        [
            &self.udslice_twist_prune,
            &self.udslice_flip_prune,
            &self.edge4_edge8_prune,
            &self.edge4_corner_prune,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{N_CORNER, N_EDGE4, N_EDGE8, N_FLIP, N_TWIST, N_UDSLICE};
    use crate::cubie::CubieCube;
    use crate::moves::scramble;

    #[test]
    fn test_pruning_tables_are_complete() {
        let tables = Tables::global();
        for table in tables.pruning_tables() {
            assert!(table.is_complete(), "A pruning table has unvisited entries");
            assert_eq!(table.get(0, 0), 0);
            assert_eq!(table.depths().iter().filter(|&&d| d == 0).count(), 1);
        }
    }

    #[test]
    fn test_table_sizes() {
        let tables = Tables::global();
        let sizes: Vec<usize> = tables.move_tables().iter().map(|t| t.len()).collect();
        assert_eq!(sizes, [N_TWIST, N_FLIP, N_UDSLICE, N_EDGE4, N_EDGE8, N_CORNER]);
        assert_eq!(
            tables.udslice_twist_prune.depths().len(),
            N_UDSLICE * N_TWIST
        );
        assert_eq!(tables.edge4_corner_prune.stride(), N_CORNER);
    }

    #[test]
    fn test_pruning_values_bound_scramble_length() {
        let tables = Tables::global();
        let mut rng = fastrand::Rng::with_seed(11);

        for length in 0..12 {
            let moves = scramble(&mut rng, length);
            let cube = CubieCube::SOLVED.apply_sequence(&moves);
            let bound = tables
                .udslice_twist_prune
                .get(cube.udslice(), cube.twist())
                .max(tables.udslice_flip_prune.get(cube.udslice(), cube.flip()));
            assert!(bound as usize <= length, "Phase 1 bound {bound} exceeds {length}");

            let phase_two: Vec<_> = moves.into_iter().filter(|mv| mv.is_phase_two()).collect();
            let cube = CubieCube::SOLVED.apply_sequence(&phase_two);
            let bound = tables
                .edge4_edge8_prune
                .get(cube.edge4(), cube.edge8())
                .max(tables.edge4_corner_prune.get(cube.edge4(), cube.corner()));
            assert!(bound as usize <= phase_two.len());
        }
    }

    #[test]
    fn test_single_moves_have_distance_one() {
        let tables = Tables::global();
        for mv in crate::moves::ALL_MOVES {
            let cube = CubieCube::SOLVED.apply_move(mv);
            let phase_one = tables
                .udslice_twist_prune
                .get(cube.udslice(), cube.twist())
                .max(tables.udslice_flip_prune.get(cube.udslice(), cube.flip()));
            let expected = if mv.is_phase_two() { 0 } else { 1 };
            assert_eq!(phase_one, expected, "Unexpected phase 1 distance for {mv}");
        }
    }
}
