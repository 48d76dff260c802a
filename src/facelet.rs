//! Cube state as 54 stickers, the representation used for input and output.
//!
//! Facelets are stored face by face in U, R, F, D, L, B order. Each face is
//! read row by row from the top-left corner as seen looking straight at it,
//! with U on top for the four side faces, B on top for U and F on top for D:
//!
//! ```text
//!              |************|
//!              |*U1**U2**U3*|
//!              |*U4**U5**U6*|
//!              |*U7**U8**U9*|
//! |************|************|************|************|
//! |*L1**L2**L3*|*F1**F2**F3*|*R1**R2**R3*|*B1**B2**B3*|
//! |*L4**L5**L6*|*F4**F5**F6*|*R4**R5**R6*|*B4**B5**B6*|
//! |*L7**L8**L9*|*F7**F8**F9*|*R7**R8**R9*|*B7**B8**B9*|
//! |************|************|************|************|
//!              |*D1**D2**D3*|
//!              |*D4**D5**D6*|
//!              |*D7**D8**D9*|
//! ```
//!
//! Stickers are named by the face whose center they match, so the solver
//! never depends on a particular color scheme.

use std::fmt;
use std::str::FromStr;

use crate::cubie::{CubieCube, NUM_CORNERS, NUM_EDGES};
use crate::error::CubeError;

/// Number of stickers on a cube.
pub const NUM_FACELETS: usize = 54;

/// A face of the cube, also used as the sticker color matching that face's center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Face {
    U = 0,
    R = 1,
    F = 2,
    D = 3,
    L = 4,
    B = 5,
}

impl Face {
    /// All faces in facelet order.
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    /// Parses a face letter, ignoring case.
    pub fn from_letter(letter: char) -> Option<Face> {
        match letter.to_ascii_uppercase() {
            'U' => Some(Face::U),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'B' => Some(Face::B),
            _ => None,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    /// R, F, L and B may only be turned by half turns during phase 2.
    pub const fn is_half_turn_only(self) -> bool {
        !matches!(self, Face::U | Face::D)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

use Face::{B, D, F, L, R, U};

/// Facelet indices of each corner position, starting with the U or D sticker
/// and continuing clockwise.
const CORNER_FACELETS: [[usize; 3]; NUM_CORNERS] = [
    [8, 9, 20],   // URF: U9 R1 F3
    [6, 18, 38],  // UFL: U7 F1 L3
    [0, 36, 47],  // ULB: U1 L1 B3
    [2, 45, 11],  // UBR: U3 B1 R3
    [29, 26, 15], // DFR: D3 F9 R7
    [27, 44, 24], // DLF: D1 L9 F7
    [33, 53, 42], // DBL: D7 B9 L7
    [35, 17, 51], // DRB: D9 R9 B7
];

/// Sticker colors of each corner piece, in the same order as `CORNER_FACELETS`.
const CORNER_COLORS: [[Face; 3]; NUM_CORNERS] = [
    [U, R, F],
    [U, F, L],
    [U, L, B],
    [U, B, R],
    [D, F, R],
    [D, L, F],
    [D, B, L],
    [D, R, B],
];

/// Facelet indices of each edge position, reference sticker first.
const EDGE_FACELETS: [[usize; 2]; NUM_EDGES] = [
    [5, 10],  // UR
    [7, 19],  // UF
    [3, 37],  // UL
    [1, 46],  // UB
    [32, 16], // DR
    [28, 25], // DF
    [30, 43], // DL
    [34, 52], // DB
    [23, 12], // FR
    [21, 41], // FL
    [50, 39], // BL
    [48, 14], // BR
];

const EDGE_COLORS: [[Face; 2]; NUM_EDGES] = [
    [U, R],
    [U, F],
    [U, L],
    [U, B],
    [D, R],
    [D, F],
    [D, L],
    [D, B],
    [F, R],
    [F, L],
    [B, L],
    [B, R],
];

/// A full sticker assignment. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceCube {
    facelets: [Face; NUM_FACELETS],
}

impl FaceCube {
    /// The solved sticker layout.
    pub const SOLVED: Self = {
        let mut facelets = [U; NUM_FACELETS];
        let mut i = 0;
        while i < NUM_FACELETS {
            facelets[i] = Face::ALL[i / 9];
            i += 1;
        }
        Self { facelets }
    };

    /// Builds a cube from a `[face][row][col]` grid of sticker colors.
    pub fn from_grid(grid: &[[[Face; 3]; 3]; 6]) -> FaceCube {
        let mut facelets = [U; NUM_FACELETS];
        for (face, rows) in grid.iter().enumerate() {
            for (row, cols) in rows.iter().enumerate() {
                for (col, &color) in cols.iter().enumerate() {
                    facelets[facelet_index(Face::ALL[face], row, col)] = color;
                }
            }
        }
        FaceCube { facelets }
    }

    /// The sticker at `row`, `col` (both in `0..3`) of `face`.
    #[inline]
    pub fn get(&self, face: Face, row: usize, col: usize) -> Face {
        self.facelets[facelet_index(face, row, col)]
    }

    pub fn facelets(&self) -> &[Face; NUM_FACELETS] {
        &self.facelets
    }

    /// Number of stickers of each color, indexed by face.
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for &color in &self.facelets {
            counts[color as usize] += 1;
        }
        counts
    }

    /// Renders the cube as an unfolded net with `.` for empty space.
    ///
    /// The U face sits above F, D below F, and the middle band reads L F R B.
    pub fn net(&self) -> String {
        let mut output = String::new();

        let push_row = |output: &mut String, faces: &[Option<Face>], row: usize| {
            for face in faces {
                match face {
                    Some(face) => {
                        for col in 0..3 {
                            output.push(self.get(*face, row, col).letter());
                        }
                    }
                    None => output.push_str("..."),
                }
            }
            output.push('\n');
        };

        for row in 0..3 {
            push_row(&mut output, &[None, Some(U), None, None], row);
        }
        for row in 0..3 {
            push_row(&mut output, &[Some(L), Some(F), Some(R), Some(B)], row);
        }
        for row in 0..3 {
            push_row(&mut output, &[None, Some(D), None, None], row);
        }

        output
    }
}

impl Default for FaceCube {
    fn default() -> Self {
        FaceCube::SOLVED
    }
}

/// Flat index of a sticker.
#[inline]
pub const fn facelet_index(face: Face, row: usize, col: usize) -> usize {
    9 * face as usize + 3 * row + col
}

impl FromStr for FaceCube {
    type Err = CubeError;

    /// Parses 54 face letters in U R F D L B order, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length != NUM_FACELETS {
            return Err(CubeError::InvalidLength(length));
        }

        let mut facelets = [U; NUM_FACELETS];
        for (index, found) in s.chars().enumerate() {
            facelets[index] =
                Face::from_letter(found).ok_or(CubeError::InvalidFacelet { index, found })?;
        }
        Ok(FaceCube { facelets })
    }
}

impl fmt::Display for FaceCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for face in &self.facelets {
            write!(f, "{face}")?;
        }
        Ok(())
    }
}

impl CubieCube {
    /// Reads the piece layout off a sticker assignment and validates it.
    pub fn from_facelets(face_cube: &FaceCube) -> Result<CubieCube, CubeError> {
        let counts = face_cube.color_counts();
        if let Some(face) = Face::ALL.into_iter().find(|&face| counts[face as usize] != 9) {
            return Err(CubeError::InvalidColorCounts {
                face,
                count: counts[face as usize],
            });
        }

        // stickers are named after the centers, so each center must name its own face
        if let Some(face) = Face::ALL
            .into_iter()
            .find(|&face| face_cube.get(face, 1, 1) != face)
        {
            return Err(CubeError::InvalidCenter {
                face,
                found: face_cube.get(face, 1, 1),
            });
        }

        let f = &face_cube.facelets;
        let mut cube = CubieCube::SOLVED;

        for (position, stickers) in EDGE_FACELETS.iter().enumerate() {
            let first = f[stickers[0]];
            let second = f[stickers[1]];
            let (piece, orientation) = EDGE_COLORS
                .iter()
                .enumerate()
                .find_map(|(piece, colors)| {
                    if colors[0] == first && colors[1] == second {
                        Some((piece, 0))
                    } else if colors[0] == second && colors[1] == first {
                        Some((piece, 1))
                    } else {
                        None
                    }
                })
                .ok_or(CubeError::InvalidEdge)?;
            cube.edge_permutation[position] = piece as u8;
            cube.edge_orientation[position] = orientation;
        }

        for (position, stickers) in CORNER_FACELETS.iter().enumerate() {
            // the orientation is the index of the U/D sticker within the position
            let orientation = (0..3)
                .find(|&ori| matches!(f[stickers[ori]], U | D))
                .ok_or(CubeError::InvalidCorner)?;
            let clockwise = f[stickers[(orientation + 1) % 3]];
            let anticlockwise = f[stickers[(orientation + 2) % 3]];
            let piece = CORNER_COLORS
                .iter()
                .position(|colors| colors[1] == clockwise && colors[2] == anticlockwise)
                .ok_or(CubeError::InvalidCorner)?;
            cube.corner_permutation[position] = piece as u8;
            cube.corner_orientation[position] = orientation as u8;
        }

        cube.verify()?;
        Ok(cube)
    }

    /// Paints the stickers of this piece layout. Total for any permutation.
    pub fn to_facelets(&self) -> FaceCube {
        let mut facelets = FaceCube::SOLVED.facelets;

        for (position, stickers) in CORNER_FACELETS.iter().enumerate() {
            let piece = self.corner_permutation[position] as usize;
            let orientation = self.corner_orientation[position] as usize;
            for n in 0..3 {
                facelets[stickers[(n + orientation) % 3]] = CORNER_COLORS[piece][n];
            }
        }

        for (position, stickers) in EDGE_FACELETS.iter().enumerate() {
            let piece = self.edge_permutation[position] as usize;
            let orientation = self.edge_orientation[position] as usize;
            for n in 0..2 {
                facelets[stickers[(n + orientation) % 2]] = EDGE_COLORS[piece][n];
            }
        }

        FaceCube { facelets }
    }
}
