//! Lower bounds on the number of moves needed to zero a pair of coordinates.

use log::debug;

use crate::move_table::{MoveTable, DISALLOWED};
use crate::moves::NUM_MOVES;

/// Depth of an entry the breadth-first fill has not reached.
pub const UNVISITED: u8 = u8::MAX;

/// Flattened `primary * stride + secondary` table of exact move distances
/// from the (0, 0) pair within the coordinate pair's own state space.
///
/// Since every cube move induces a move on the pair, each entry is an
/// admissible lower bound for the cube as a whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PruningTable {
    stride: usize,
    depths: Vec<u8>,
}

impl PruningTable {
    /// Fills the table layer by layer: every entry at the current depth
    /// labels its unvisited neighbours with depth + 1.
    ///
    /// Moves marked `DISALLOWED` in either table are skipped, so a pair of
    /// phase-2 tables is expanded over phase-2 moves only. Stops once every
    /// entry is labelled or a layer discovers nothing new.
    pub fn build(primary: &MoveTable, secondary: &MoveTable) -> Self {
        let stride = secondary.len();
        let total = primary.len() * stride;

        let mut depths = vec![UNVISITED; total];
        depths[0] = 0;
        let mut filled = 1;
        let mut depth = 0u8;

        while filled < total {
            let mut discovered = 0;

            for index in 0..total {
                if depths[index] != depth {
                    continue;
                }
                let first = (index / stride) as u16;
                let second = (index % stride) as u16;

                for mv in 0..NUM_MOVES {
                    let next_first = primary.get(first, mv);
                    let next_second = secondary.get(second, mv);
                    if next_first == DISALLOWED || next_second == DISALLOWED {
                        continue;
                    }
                    let next = next_first as usize * stride + next_second as usize;
                    if depths[next] == UNVISITED {
                        depths[next] = depth + 1;
                        discovered += 1;
                    }
                }
            }

            if discovered == 0 {
                break;
            }
            filled += discovered;
            depth += 1;
            debug!("Pruning depth {depth}: {discovered} entries, {filled}/{total} filled");
        }

        Self { stride, depths }
    }

    /// Wraps depths read from the table cache.
    pub(crate) fn from_depths(stride: usize, depths: Vec<u8>) -> Self {
        Self { stride, depths }
    }

    /// Minimum number of moves to bring (`primary`, `secondary`) to (0, 0).
    #[inline(always)]
    pub fn get(&self, primary: u16, secondary: u16) -> u8 {
        self.depths[primary as usize * self.stride + secondary as usize]
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn depths(&self) -> &[u8] {
        &self.depths
    }

    /// True once every entry has been reached.
    pub fn is_complete(&self) -> bool {
        !self.depths.contains(&UNVISITED)
    }

    /// Largest labelled depth.
    pub fn max_depth(&self) -> u8 {
        self.depths
            .iter()
            .copied()
            .filter(|&d| d != UNVISITED)
            .max()
            .unwrap_or(0)
    }
}
