//! JSON shapes for handing puzzles to the solver and answers back.
//!
//! A definition looks like
//! ```json
//! {"length": 2, "colors": 2, "nodes": [[0, 0, 1], [0, 1, 1], [1, 0, 2], [1, 1, 2]]}
//! ```
//! where every node is a `[row, col, color]` endpoint, and the response to it is
//! ```json
//! {"nodes": [[1, 1], [2, 2]]}
//! ```
//! or `{"nodes": "UNSAT"}` when no solution exists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::InvalidPuzzle;
use crate::cell::ColorID;
use crate::location::Coord;
use crate::puzzle::Puzzle;
use crate::solver::{Outcome, SolveError};

/// What [`SolveResponse::nodes`] holds when the puzzle has no solution.
pub const UNSATISFIABLE: &str = "UNSAT";

/// A puzzle as written in JSON.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    /// The side length of the board.
    pub length: Coord,
    /// The number of colors, numbered from 1.
    pub colors: ColorID,
    /// Endpoints as `[row, col, color]`.
    pub nodes: Vec<[usize; 3]>,
}

impl TryFrom<&PuzzleDefinition> for Puzzle {
    type Error = InvalidPuzzle;

    fn try_from(definition: &PuzzleDefinition) -> Result<Self, Self::Error> {
        let endpoints = definition.nodes.iter()
            .map(|[row, col, color]| (*row, *col, *color))
            .collect::<Vec<_>>();
        Puzzle::from_endpoints(definition.length, definition.colors, &endpoints)
    }
}

/// Either the solved colors, one list per row, or [`UNSATISFIABLE`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseNodes {
    /// The color of every cell, one list per row.
    Grid(Vec<Vec<ColorID>>),
    /// A verdict in place of a grid.
    Verdict(String),
}

/// The answer to a [`PuzzleDefinition`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// The solved board, or the reason there is none.
    pub nodes: ResponseNodes,
}

impl From<&Outcome> for SolveResponse {
    fn from(outcome: &Outcome) -> Self {
        let nodes = match outcome {
            Outcome::Solved(solution) => ResponseNodes::Grid(solution.rows()),
            Outcome::Unsatisfiable => ResponseNodes::Verdict(UNSATISFIABLE.to_string()),
        };
        Self { nodes }
    }
}

/// Reasons [`solve_json`] may fail.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The input is not a well-formed definition.
    #[error("malformed puzzle definition: {0}")]
    Json(#[from] serde_json::Error),
    /// The definition describes an invalid puzzle.
    #[error("invalid puzzle: {0}")]
    Invalid(#[from] InvalidPuzzle),
    /// Solving failed.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Solve a puzzle given as a JSON [`PuzzleDefinition`], answering with a JSON [`SolveResponse`].
pub fn solve_json(state: &str) -> Result<String, AdapterError> {
    let definition: PuzzleDefinition = serde_json::from_str(state)?;
    let puzzle = Puzzle::try_from(&definition)?;
    let outcome = puzzle.solve()?;
    Ok(serde_json::to_string(&SolveResponse::from(&outcome))?)
}
