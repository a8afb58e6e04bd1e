#![warn(missing_docs)]

//! # `fluxsat`
//!
//! A solver for [Numberlink](https://en.wikipedia.org/wiki/Numberlink) as posited in the mobile game Flow Free, on square boards.
//! Begin by building a puzzle using [`SquarePuzzleBuilder`] or [`Puzzle::from_endpoints`],
//! then call [`solve()`](Puzzle::solve) to get an [`Outcome`]: either a [`Solution`] or a proof that none exists.
//!
//! A solution colors every cell so that the cells of each color form one simple path between that color's two endpoints.
//!
//! # Internals
//! This crate is driven by expressing the problem as a Boolean satisfiability problem (a "SAT") in the "path shape" style
//! of [Matt Zucker's solution](https://mzucker.github.io/2016/09/02/eating-sat-flavored-crow.html).
//!
//! A high level overview is as follows:
//!
//! For every cell and color we ask whether that cell has that color; for every cell and each of the six
//! [`PathShape`]s we ask whether the path runs through that cell in that shape. We then assert, in SAT form:
//! 1. Every cell has exactly one color. An endpoint has its given color, and exactly one neighbor shares it.
//! 2. Every other cell has exactly one shape. The two neighbors that shape points at share the cell's color; no other neighbor does.
//!
//! These clauses do not rule out a closed loop of one color floating free of its endpoints.
//! So the solver checks each assignment for such a loop, forbids that loop with one more clause, and solves again
//! until it finds a loop-free assignment or the formula becomes unsatisfiable.
//! See [`PuzzleSolver`] for details.

pub use builder::{InvalidPuzzle, SquarePuzzleBuilder};
pub use cell::ColorID;
pub use cycle::{detect_cycle, CycleCheck};
pub use definition::{solve_json, AdapterError, PuzzleDefinition, ResponseNodes, SolveResponse};
pub use encoder::{EncodedVar, VariableEncoder};
pub use extract::Solution;
pub use location::{Coord, Location};
pub use puzzle::Puzzle;
pub use shape::{PathShape, SquareStep};
pub use solver::{Outcome, PuzzleSolver, SatEngine, SolveError, SolveOptions, VarisatEngine};

mod tests;
pub(crate) mod location;
pub(crate) mod logic;
pub mod shape;
pub(crate) mod cell;
pub mod builder;
pub(crate) mod puzzle;
pub mod encoder;
pub mod clauses;
pub mod extract;
pub mod cycle;
pub mod solver;
pub mod definition;
#[cfg(feature = "wasm")]
mod wasm;
