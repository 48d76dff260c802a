//! Face turns in standard cube notation.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseMoveError;
use crate::facelet::Face;

/// Number of elementary moves: 6 faces times 3 turn amounts.
pub const NUM_MOVES: usize = 18;

/// A turn of one face by `power` clockwise quarter turns (1, 2 or 3).
///
/// Only built through `Move::new`, `Move::from_index`, `ALL_MOVES` or
/// parsing, so `power` is always in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    face: Face,
    power: u8,
}

/// All 18 moves in table order (`index = 3 * face + power - 1`).
pub const ALL_MOVES: [Move; NUM_MOVES] = {
    let mut moves = [Move {
        face: Face::U,
        power: 1,
    }; NUM_MOVES];
    let mut i = 0;
    while i < NUM_MOVES {
        moves[i] = Move {
            face: Face::ALL[i / 3],
            power: (i % 3) as u8 + 1,
        };
        i += 1;
    }
    moves
};

impl Move {
    /// Turns `face` by `power` clockwise quarter turns, `None` unless
    /// `power` is 1, 2 or 3.
    pub const fn new(face: Face, power: u8) -> Option<Move> {
        match power {
            1..=3 => Some(Move { face, power }),
            _ => None,
        }
    }

    #[inline]
    pub const fn face(self) -> Face {
        self.face
    }

    /// Number of clockwise quarter turns, in `1..=3`.
    #[inline]
    pub const fn power(self) -> u8 {
        self.power
    }

    /// The move stored at column `index` of a move table.
    #[inline]
    pub const fn from_index(index: usize) -> Move {
        ALL_MOVES[index]
    }

    /// Column of this move in a move table.
    #[inline]
    pub const fn index(self) -> usize {
        3 * self.face as usize + self.power as usize - 1
    }

    /// The move undoing this one.
    pub const fn inverse(self) -> Move {
        Move {
            face: self.face,
            power: 4 - self.power,
        }
    }

    /// True if the move keeps a cube inside the phase-2 subgroup
    /// `<U, D, R2, L2, F2, B2>`.
    #[inline]
    pub const fn is_phase_two(self) -> bool {
        !self.face.is_half_turn_only() || self.power == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.power {
            1 => "",
            2 => "2",
            _ => "'",
        };
        write!(f, "{}{}", self.face, suffix)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(ParseMoveError::Empty)?;
        let face = Face::from_letter(letter).ok_or(ParseMoveError::UnknownFace(letter))?;
        let power = match chars.as_str() {
            "" => 1,
            "2" | "2'" => 2,
            "'" => 3,
            other => return Err(ParseMoveError::UnknownSuffix(other.to_string())),
        };
        Ok(Move { face, power })
    }
}

/// Parses a whitespace separated move sequence such as `"R U2 F'"`.
pub fn parse_sequence(s: &str) -> Result<Vec<Move>, ParseMoveError> {
    s.split_whitespace().map(str::parse).collect()
}

/// Formats moves separated by single spaces. Empty input gives `""`.
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generates `length` random moves, never turning the same face twice in a row.
pub fn scramble(rng: &mut fastrand::Rng, length: usize) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(length);
    while moves.len() < length {
        let mv = Move::from_index(rng.usize(..NUM_MOVES));
        if moves.last().is_some_and(|last| last.face == mv.face) {
            continue;
        }
        moves.push(mv);
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for index in 0..NUM_MOVES {
            assert_eq!(Move::from_index(index).index(), index);
        }
    }

    #[test]
    fn test_new_rejects_out_of_range_power() {
        assert_eq!(Move::new(Face::R, 0), None);
        assert_eq!(Move::new(Face::R, 4), None);
        let mv = Move::new(Face::R, 3).unwrap();
        assert_eq!((mv.face(), mv.power()), (Face::R, 3));
        assert_eq!(mv.index(), 5);
        assert_eq!(mv.to_string(), "R'");
    }

    #[test]
    fn test_parse_and_format() {
        let err = parse_sequence("R U2  F' d").unwrap_err();
        assert_eq!(err, ParseMoveError::UnknownFace('d'));

        let moves = parse_sequence(" R U2\tF'  ").unwrap();
        assert_eq!(
            moves,
            vec![
                Move { face: Face::R, power: 1 },
                Move { face: Face::U, power: 2 },
                Move { face: Face::F, power: 3 },
            ]
        );
        assert_eq!(format_sequence(&moves), "R U2 F'");
        assert_eq!(format_sequence(&[]), "");
    }

    #[test]
    fn test_parse_rejects_bad_suffix() {
        assert_eq!(
            "R3".parse::<Move>(),
            Err(ParseMoveError::UnknownSuffix("3".to_string()))
        );
        assert_eq!("".parse::<Move>(), Err(ParseMoveError::Empty));
    }

    #[test]
    fn test_phase_two_moves() {
        let phase_two: Vec<String> = ALL_MOVES
            .iter()
            .filter(|mv| mv.is_phase_two())
            .map(Move::to_string)
            .collect();
        assert_eq!(
            phase_two,
            ["U", "U2", "U'", "R2", "F2", "D", "D2", "D'", "L2", "B2"]
        );
    }

    #[test]
    fn test_scramble_never_repeats_a_face() {
        let mut rng = fastrand::Rng::with_seed(7);
        let moves = scramble(&mut rng, 200);
        assert_eq!(moves.len(), 200);
        for pair in moves.windows(2) {
            assert_ne!(pair[0].face, pair[1].face);
        }
    }
}
