//! Error types for cube input validation and move parsing.

use thiserror::Error;

use crate::facelet::Face;

/// Reasons a facelet assignment cannot be solved.
///
/// All of these are detected before any search starts. None of them are
/// transient, so retrying the same input always fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("Expected 54 facelets but got {0}")]
    InvalidLength(usize),
    #[error("Invalid facelet {found:?} at index {index}, expected one of U R F D L B")]
    InvalidFacelet { index: usize, found: char },
    #[error("Each color should appear exactly 9 times, but {face} appears {count} times")]
    InvalidColorCounts { face: Face, count: usize },
    #[error("The center of the {face} face is {found}")]
    InvalidCenter { face: Face, found: Face },
    #[error("Not all edges exist exactly once")]
    InvalidEdge,
    #[error("One edge should be flipped")]
    InvalidEdgeFlip,
    #[error("Not all corners exist exactly once")]
    InvalidCorner,
    #[error("One corner should be twisted")]
    InvalidCornerTwist,
    #[error("Two corners or two edges should be exchanged")]
    InvalidEdgeParity,
}

/// Failure to read a move in standard cube notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("Empty move")]
    Empty,
    #[error("Unknown face {0:?}")]
    UnknownFace(char),
    #[error("Unknown turn suffix {0:?}")]
    UnknownSuffix(String),
}
