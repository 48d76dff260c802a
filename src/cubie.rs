//! Cube state as permutations and orientations of the 20 movable pieces.
//!
//! Permutations use the "is replaced by" convention: `corner_permutation[i]`
//! names the corner that currently sits in position `i`, and
//! `corner_orientation[i]` is the twist of that corner relative to the
//! position's reference facelet (the U or D sticker).

use crate::error::CubeError;
use crate::moves::Move;

/// Number of corner pieces.
pub const NUM_CORNERS: usize = 8;
/// Number of edge pieces.
pub const NUM_EDGES: usize = 12;

// corner positions
pub const URF: u8 = 0;
pub const UFL: u8 = 1;
pub const ULB: u8 = 2;
pub const UBR: u8 = 3;
pub const DFR: u8 = 4;
pub const DLF: u8 = 5;
pub const DBL: u8 = 6;
pub const DRB: u8 = 7;

// edge positions
pub const UR: u8 = 0;
pub const UF: u8 = 1;
pub const UL: u8 = 2;
pub const UB: u8 = 3;
pub const DR: u8 = 4;
pub const DF: u8 = 5;
pub const DL: u8 = 6;
pub const DB: u8 = 7;
pub const FR: u8 = 8;
pub const FL: u8 = 9;
pub const BL: u8 = 10;
pub const BR: u8 = 11;

/// A cube state on the level of corner and edge pieces.
///
/// Centers never move relative to each other and are not modeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubieCube {
    pub corner_permutation: [u8; NUM_CORNERS],
    /// Each entry in `0..3`.
    pub corner_orientation: [u8; NUM_CORNERS],
    pub edge_permutation: [u8; NUM_EDGES],
    /// Each entry in `0..2`.
    pub edge_orientation: [u8; NUM_EDGES],
}

impl CubieCube {
    /// The solved cube.
    pub const SOLVED: Self = Self {
        corner_permutation: [URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB],
        corner_orientation: [0; NUM_CORNERS],
        edge_permutation: [UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR],
        edge_orientation: [0; NUM_EDGES],
    };

    /// Composes two cube states: the result is `self` followed by `other`.
    pub fn multiply(&self, other: &CubieCube) -> CubieCube {
        let mut result = CubieCube::SOLVED;

        for position in 0..NUM_CORNERS {
            let source = other.corner_permutation[position] as usize;
            result.corner_permutation[position] = self.corner_permutation[source];
            result.corner_orientation[position] =
                (self.corner_orientation[source] + other.corner_orientation[position]) % 3;
        }

        for position in 0..NUM_EDGES {
            let source = other.edge_permutation[position] as usize;
            result.edge_permutation[position] = self.edge_permutation[source];
            result.edge_orientation[position] =
                (self.edge_orientation[source] + other.edge_orientation[position]) % 2;
        }

        result
    }

    /// Returns the state after turning `mv.face()` by `mv.power()` quarter turns.
    pub fn apply_move(&self, mv: Move) -> CubieCube {
        let quarter_turn = &FACE_TURNS[mv.face() as usize];
        let mut result = *self;
        for _ in 0..mv.power() {
            result = result.multiply(quarter_turn);
        }
        result
    }

    /// Applies each move of `moves` in order.
    pub fn apply_sequence(&self, moves: &[Move]) -> CubieCube {
        moves.iter().fold(*self, |cube, &mv| cube.apply_move(mv))
    }

    /// Returns true for the identity permutation with zero orientation.
    pub fn is_solved(&self) -> bool {
        *self == CubieCube::SOLVED
    }

    /// Parity of the corner permutation (0 even, 1 odd).
    pub fn corner_parity(&self) -> u8 {
        permutation_parity(&self.corner_permutation)
    }

    /// Parity of the edge permutation (0 even, 1 odd).
    pub fn edge_parity(&self) -> u8 {
        permutation_parity(&self.edge_permutation)
    }

    /// Checks that this state is reachable from the solved cube.
    ///
    /// Checks run in a fixed order so the reported error is deterministic:
    /// edge presence, edge flip, corner presence, corner twist, parity.
    pub fn verify(&self) -> Result<(), CubeError> {
        if !is_permutation(&self.edge_permutation) {
            return Err(CubeError::InvalidEdge);
        }
        let flip_sum: u32 = self.edge_orientation.iter().map(|&o| o as u32).sum();
        if flip_sum % 2 != 0 {
            return Err(CubeError::InvalidEdgeFlip);
        }

        if !is_permutation(&self.corner_permutation) {
            return Err(CubeError::InvalidCorner);
        }
        let twist_sum: u32 = self.corner_orientation.iter().map(|&o| o as u32).sum();
        if twist_sum % 3 != 0 {
            return Err(CubeError::InvalidCornerTwist);
        }

        if self.edge_parity() != self.corner_parity() {
            return Err(CubeError::InvalidEdgeParity);
        }

        Ok(())
    }
}

impl Default for CubieCube {
    fn default() -> Self {
        CubieCube::SOLVED
    }
}

/// True if `pieces` contains each value in `0..pieces.len()` exactly once.
fn is_permutation(pieces: &[u8]) -> bool {
    let mut seen = 0u32;
    for &piece in pieces {
        if piece as usize >= pieces.len() || seen & (1 << piece) != 0 {
            return false;
        }
        seen |= 1 << piece;
    }
    true
}

/// Parity of a permutation by counting inversions.
fn permutation_parity(pieces: &[u8]) -> u8 {
    let mut inversions = 0u32;
    for j in 1..pieces.len() {
        for i in 0..j {
            if pieces[i] > pieces[j] {
                inversions += 1;
            }
        }
    }
    (inversions % 2) as u8
}

/// Clockwise quarter turns of U, R, F, D, L, B on the cubie level.
pub const FACE_TURNS: [CubieCube; 6] = [
    // U
    CubieCube {
        corner_permutation: [UBR, URF, UFL, ULB, DFR, DLF, DBL, DRB],
        corner_orientation: [0, 0, 0, 0, 0, 0, 0, 0],
        edge_permutation: [UB, UR, UF, UL, DR, DF, DL, DB, FR, FL, BL, BR],
        edge_orientation: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    },
    // R
    CubieCube {
        corner_permutation: [DFR, UFL, ULB, URF, DRB, DLF, DBL, UBR],
        corner_orientation: [2, 0, 0, 1, 1, 0, 0, 2],
        edge_permutation: [FR, UF, UL, UB, BR, DF, DL, DB, DR, FL, BL, UR],
        edge_orientation: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    },
    // F
    CubieCube {
        corner_permutation: [UFL, DLF, ULB, UBR, URF, DFR, DBL, DRB],
        corner_orientation: [1, 2, 0, 0, 2, 1, 0, 0],
        edge_permutation: [UR, FL, UL, UB, DR, FR, DL, DB, UF, DF, BL, BR],
        edge_orientation: [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
    },
    // D
    CubieCube {
        corner_permutation: [URF, UFL, ULB, UBR, DLF, DBL, DRB, DFR],
        corner_orientation: [0, 0, 0, 0, 0, 0, 0, 0],
        edge_permutation: [UR, UF, UL, UB, DF, DL, DB, DR, FR, FL, BL, BR],
        edge_orientation: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    },
    // L
    CubieCube {
        corner_permutation: [URF, ULB, DBL, UBR, DFR, UFL, DLF, DRB],
        corner_orientation: [0, 1, 2, 0, 0, 2, 1, 0],
        edge_permutation: [UR, UF, BL, UB, DR, DF, FL, DB, FR, UL, DL, BR],
        edge_orientation: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    },
    // B
    CubieCube {
        corner_permutation: [URF, UFL, UBR, DRB, DFR, DLF, ULB, DBL],
        corner_orientation: [0, 0, 1, 2, 0, 0, 2, 1],
        edge_permutation: [UR, UF, UL, BR, DR, DF, DL, BL, FR, FL, UB, DB],
        edge_orientation: [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelet::Face;
    use crate::moves::{parse_sequence, ALL_MOVES};

    #[test]
    fn test_face_turns_are_valid_states() {
        for (face, turn) in FACE_TURNS.iter().enumerate() {
            assert_eq!(turn.verify(), Ok(()), "Face turn {face} is not a legal state");
        }
    }

    #[test]
    fn test_four_quarter_turns_restore() {
        let start = CubieCube::SOLVED.apply_sequence(&parse_sequence("R U F' D2 L B").unwrap());
        for face in Face::ALL {
            let mut cube = start;
            for _ in 0..4 {
                cube = cube.apply_move(Move::new(face, 1).unwrap());
            }
            assert_eq!(cube, start, "Four {face} turns should restore the cube");
        }
    }

    #[test]
    fn test_move_then_inverse_restores() {
        let start = CubieCube::SOLVED.apply_sequence(&parse_sequence("F2 U' R L2 B D'").unwrap());
        for mv in ALL_MOVES {
            let cube = start.apply_move(mv).apply_move(mv.inverse());
            assert_eq!(cube, start, "{mv} followed by its inverse should restore the cube");
        }
    }

    #[test]
    fn test_multiply_is_associative() {
        let a = FACE_TURNS[1];
        let b = FACE_TURNS[2];
        let c = FACE_TURNS[0];
        assert_eq!(a.multiply(&b).multiply(&c), a.multiply(&b.multiply(&c)));
    }

    #[test]
    fn test_sexy_move_has_order_six() {
        let sexy = parse_sequence("R U R' U'").unwrap();
        let mut cube = CubieCube::SOLVED;
        for i in 1..=6 {
            cube = cube.apply_sequence(&sexy);
            assert_eq!(cube.is_solved(), i == 6, "Unexpected state after {i} repetitions");
        }
    }

    #[test]
    fn test_verify_detects_single_swap() {
        let mut cube = CubieCube::SOLVED;
        cube.edge_permutation.swap(UR as usize, UF as usize);
        assert_eq!(cube.verify(), Err(CubeError::InvalidEdgeParity));
    }

    #[test]
    fn test_verify_detects_single_twist() {
        let mut cube = CubieCube::SOLVED;
        cube.corner_orientation[DRB as usize] = 1;
        assert_eq!(cube.verify(), Err(CubeError::InvalidCornerTwist));
    }

    #[test]
    fn test_verify_detects_single_flip() {
        let mut cube = CubieCube::SOLVED;
        cube.edge_orientation[BL as usize] = 1;
        assert_eq!(cube.verify(), Err(CubeError::InvalidEdgeFlip));
    }

    #[test]
    fn test_verify_detects_duplicate_pieces() {
        let mut cube = CubieCube::SOLVED;
        cube.edge_permutation[UR as usize] = UF;
        assert_eq!(cube.verify(), Err(CubeError::InvalidEdge));

        let mut cube = CubieCube::SOLVED;
        cube.corner_permutation[URF as usize] = DRB;
        assert_eq!(cube.verify(), Err(CubeError::InvalidCorner));
    }

    #[test]
    fn test_quarter_turn_is_odd_on_both_orbits() {
        let cube = CubieCube::SOLVED.apply_move(Move::new(Face::R, 1).unwrap());
        assert_eq!(cube.corner_parity(), 1);
        assert_eq!(cube.edge_parity(), 1);
        assert_eq!(cube.verify(), Ok(()));
    }
}
