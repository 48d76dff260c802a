//! Precomputed coordinate transitions for the 18 face turns.
//!
//! A move table turns "apply a move, then re-derive the coordinate" into one
//! array lookup: `table.get(value, move_index)`.

use log::debug;

use crate::coord::Coordinate;
use crate::cubie::{CubieCube, FACE_TURNS};
use crate::facelet::Face;
use crate::moves::{Move, NUM_MOVES};

/// Marks a quarter turn of R, F, L or B in a phase-2 table. The phase-2
/// search never takes these moves, so no real value is stored.
pub const DISALLOWED: u16 = u16::MAX;

/// One row of move results per coordinate value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTable {
    entries: Vec<[u16; NUM_MOVES]>,
}

impl MoveTable {
    /// Builds the table for coordinate `C`.
    ///
    /// For every value, a cube with that coordinate is turned through each
    /// face four times (quarter, half, three-quarter, back to the start),
    /// reading the coordinate after each of the first three turns.
    pub fn build<C: Coordinate>() -> Self {
        let mut entries = Vec::with_capacity(C::SIZE);
        let mut cube = CubieCube::SOLVED;

        for value in 0..C::SIZE {
            C::set(&mut cube, value as u16);
            let mut row = [0u16; NUM_MOVES];

            for face in Face::ALL {
                let quarter_turn = &FACE_TURNS[face as usize];
                for power in 1..=3 {
                    cube = cube.multiply(quarter_turn);
                    let mv = Move::from_index(3 * face as usize + power - 1);
                    row[mv.index()] = if C::PHASE_TWO && !mv.is_phase_two() {
                        DISALLOWED
                    } else {
                        C::get(&cube)
                    };
                }
                // fourth turn restores the cube for the next face
                cube = cube.multiply(quarter_turn);
            }

            entries.push(row);
        }

        debug!("Built {} move table with {} rows", C::NAME, entries.len());
        Self { entries }
    }

    /// Wraps rows read from elsewhere (the table cache, or small tables in tests).
    pub(crate) fn from_entries(entries: Vec<[u16; NUM_MOVES]>) -> Self {
        Self { entries }
    }

    /// Coordinate value after applying move `mv` (a move table column) to `value`.
    #[inline(always)]
    pub fn get(&self, value: u16, mv: usize) -> u16 {
        self.entries[value as usize][mv]
    }

    /// Number of coordinate values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[[u16; NUM_MOVES]] {
        &self.entries
    }
}
