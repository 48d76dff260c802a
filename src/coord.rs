//! Integer coordinates projecting a cube state onto bounded ranges.
//!
//! Every coordinate is 0 for the solved cube. Phase 1 works on `twist`,
//! `flip` and `udslice`; phase 2 works on `corner`, `edge8` and `edge4`, which
//! are only meaningful once the four UD-slice edges are back in the slice.

use crate::cubie::{CubieCube, FR, NUM_CORNERS, NUM_EDGES};

/// 3^7 corner orientations (the eighth is determined by the others).
pub const N_TWIST: usize = 2187;
/// 2^11 edge orientations.
pub const N_FLIP: usize = 2048;
/// C(12, 4) placements of the four UD-slice edges.
pub const N_UDSLICE: usize = 495;
/// 4! orderings of the UD-slice edges inside the slice.
pub const N_EDGE4: usize = 24;
/// 8! orderings of the U and D layer edges.
pub const N_EDGE8: usize = 40320;
/// 8! corner permutations.
pub const N_CORNER: usize = 40320;

/// Number of edges in the UD slice.
const SLICE_EDGES: usize = 4;

/// Binomial coefficient, zero when `k > n`.
const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let mut result = 1;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

/// Lehmer rank of a sequence of distinct values.
///
/// Entry `j` contributes `j!` times the number of earlier entries larger than
/// it, so the sorted sequence ranks 0.
fn permutation_rank(pieces: &[u8]) -> u16 {
    let mut rank = 0usize;
    for j in (1..pieces.len()).rev() {
        let larger_before = pieces[..j].iter().filter(|&&p| p > pieces[j]).count();
        rank = (rank + larger_before) * j;
    }
    rank as u16
}

/// Inverse of `permutation_rank` for the values `first..first + pieces.len()`.
fn permutation_unrank(rank: u16, first: u8, pieces: &mut [u8]) {
    let n = pieces.len();
    let mut larger_before = [0usize; NUM_EDGES];
    let mut rest = rank as usize;
    for (j, digit) in larger_before.iter_mut().enumerate().take(n).skip(1) {
        *digit = rest % (j + 1);
        rest /= j + 1;
    }

    // values not placed yet, ascending
    let mut remaining = [0u8; NUM_EDGES];
    for (i, value) in remaining.iter_mut().enumerate().take(n) {
        *value = first + i as u8;
    }
    let mut remaining_len = n;

    for j in (0..n).rev() {
        let pick = remaining_len - 1 - larger_before[j];
        pieces[j] = remaining[pick];
        remaining.copy_within(pick + 1..remaining_len, pick);
        remaining_len -= 1;
    }
}

impl CubieCube {
    /// Orientation of the first seven corners in base 3.
    pub fn twist(&self) -> u16 {
        self.corner_orientation[..NUM_CORNERS - 1]
            .iter()
            .fold(0, |acc, &o| 3 * acc + o as u16)
    }

    /// Sets all corner orientations; the last one makes the sum divisible by 3.
    pub fn set_twist(&mut self, twist: u16) {
        let mut rest = twist;
        let mut sum = 0;
        for i in (0..NUM_CORNERS - 1).rev() {
            let orientation = (rest % 3) as u8;
            self.corner_orientation[i] = orientation;
            sum += orientation;
            rest /= 3;
        }
        self.corner_orientation[NUM_CORNERS - 1] = (3 - sum % 3) % 3;
    }

    /// Orientation of the first eleven edges in base 2.
    pub fn flip(&self) -> u16 {
        self.edge_orientation[..NUM_EDGES - 1]
            .iter()
            .fold(0, |acc, &o| 2 * acc + o as u16)
    }

    /// Sets all edge orientations; the last one makes the sum even.
    pub fn set_flip(&mut self, flip: u16) {
        let mut rest = flip;
        let mut sum = 0;
        for i in (0..NUM_EDGES - 1).rev() {
            let orientation = (rest % 2) as u8;
            self.edge_orientation[i] = orientation;
            sum += orientation;
            rest /= 2;
        }
        self.edge_orientation[NUM_EDGES - 1] = sum % 2;
    }

    /// Combinatorial rank of the positions holding FR, FL, BL and BR,
    /// ignoring their order.
    pub fn udslice(&self) -> u16 {
        let mut udslice = 0;
        let mut seen = 0;
        for position in (0..NUM_EDGES).rev() {
            if self.edge_permutation[position] >= FR {
                seen += 1;
                udslice += binomial(NUM_EDGES - 1 - position, seen);
            }
        }
        udslice as u16
    }

    /// Places the slice edges (in FR FL BL BR order) at the positions encoded
    /// by `udslice` and fills the rest with the other edges in order.
    pub fn set_udslice(&mut self, udslice: u16) {
        let mut rest = udslice as usize;
        let mut slice_left = SLICE_EDGES;
        let mut next_slice = FR;
        let mut next_other = 0;

        for position in 0..NUM_EDGES {
            let weight = binomial(NUM_EDGES - 1 - position, slice_left);
            if slice_left > 0 && rest >= weight {
                self.edge_permutation[position] = next_slice;
                next_slice += 1;
                slice_left -= 1;
                rest -= weight;
            } else {
                self.edge_permutation[position] = next_other;
                next_other += 1;
            }
        }
    }

    /// Rank of the corner permutation.
    pub fn corner(&self) -> u16 {
        permutation_rank(&self.corner_permutation)
    }

    pub fn set_corner(&mut self, corner: u16) {
        permutation_unrank(corner, 0, &mut self.corner_permutation);
    }

    /// Rank of the permutation of the eight U and D layer edge positions.
    pub fn edge8(&self) -> u16 {
        permutation_rank(&self.edge_permutation[..8])
    }

    pub fn set_edge8(&mut self, edge8: u16) {
        permutation_unrank(edge8, 0, &mut self.edge_permutation[..8]);
    }

    /// Rank of the permutation of the four UD-slice positions.
    pub fn edge4(&self) -> u16 {
        permutation_rank(&self.edge_permutation[8..])
    }

    pub fn set_edge4(&mut self, edge4: u16) {
        permutation_unrank(edge4, FR, &mut self.edge_permutation[8..]);
    }
}

/// A projection of `CubieCube` that gets its own move table.
pub trait Coordinate {
    const NAME: &'static str;
    /// Number of distinct values.
    const SIZE: usize;
    /// Whether the move table marks quarter turns of R, F, L and B as
    /// `DISALLOWED`, because the coordinate is only defined inside phase 2.
    const PHASE_TWO: bool = false;

    fn get(cube: &CubieCube) -> u16;
    fn set(cube: &mut CubieCube, value: u16);
}

macro_rules! coordinate {
    ($name:ident, $label:literal, $size:expr, $phase_two:literal, $get:ident, $set:ident) => {
        pub struct $name;

        impl Coordinate for $name {
            const NAME: &'static str = $label;
            const SIZE: usize = $size;
            const PHASE_TWO: bool = $phase_two;

            #[inline]
            fn get(cube: &CubieCube) -> u16 {
                cube.$get()
            }

            #[inline]
            fn set(cube: &mut CubieCube, value: u16) {
                cube.$set(value)
            }
        }
    };
}

coordinate!(Twist, "twist", N_TWIST, false, twist, set_twist);
coordinate!(Flip, "flip", N_FLIP, false, flip, set_flip);
coordinate!(UdSlice, "udslice", N_UDSLICE, false, udslice, set_udslice);
coordinate!(Edge4, "edge4", N_EDGE4, true, edge4, set_edge4);
coordinate!(Edge8, "edge8", N_EDGE8, true, edge8, set_edge8);
coordinate!(Corner, "corner", N_CORNER, true, corner, set_corner);
