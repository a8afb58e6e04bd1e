use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;
use unordered_pair::UnorderedPair;

use crate::builder::{InvalidPuzzle, SquarePuzzleBuilder};
use crate::cell::{Cell, ColorID};
use crate::location::{Coord, Dimension, Location};
use crate::shape::SquareStep;
use crate::solver::{Outcome, PuzzleSolver, SolveError};

/// A validated square puzzle: its side length, its colors, and what is fixed about each cell.
///
/// [`Puzzle`]s should be built using [`SquarePuzzleBuilder`] or [`Puzzle::from_endpoints`].
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub(crate) length: Dimension,
    pub(crate) colors: ColorID,
    pub(crate) cells: Array2<Cell>,
    pub(crate) color_displays: Vec<char>,
}

impl Puzzle {
    /// Build a puzzle from `(row, col, color)` endpoint triples.
    /// Every color in `1..=colors` must appear in exactly two triples.
    pub fn from_endpoints(length: Coord, colors: ColorID, endpoints: &[(Coord, Coord, ColorID)]) -> Result<Self, InvalidPuzzle> {
        let mut builder = SquarePuzzleBuilder::with_colors(length, colors);
        for (row, col, color) in endpoints {
            builder.add_endpoint(Location(*row, *col), *color);
        }
        builder.build()
    }

    /// The side length of the board.
    pub fn length(&self) -> Coord {
        self.length.get()
    }

    /// The number of colors.
    pub fn num_colors(&self) -> ColorID {
        self.colors
    }

    /// All colors of this puzzle, `1..=num_colors()`.
    pub fn colors(&self) -> RangeInclusive<ColorID> {
        1..=self.colors
    }

    /// The color fixed at `location` by the puzzle, if any.
    pub fn color_at(&self, location: Location) -> Option<ColorID> {
        self.cells.get(location.as_index()).and_then(Cell::color)
    }

    /// Whether `location` holds an endpoint.
    pub fn is_terminus(&self, location: Location) -> bool {
        matches!(self.cells.get(location.as_index()), Some(Cell::Terminus { .. }))
    }

    /// The two endpoints of `color`.
    pub fn termini(&self, color: ColorID) -> Option<UnorderedPair<Location>> {
        self.cells.indexed_iter()
            .filter(|(_, cell)| **cell == Cell::Terminus { color })
            .map(|(index, _)| Location::from(index))
            .collect_tuple::<(Location, Location)>()
            .map(UnorderedPair::from)
    }

    pub(crate) fn cell(&self, location: Location) -> Cell {
        self.cells[location.as_index()]
    }

    pub(crate) fn locations(&self) -> impl Iterator<Item=Location> + '_ {
        self.cells.indexed_iter().map(|(index, _)| Location::from(index))
    }

    /// Every neighbor of `location` that lies on the board, with the step leading to it.
    pub(crate) fn neighbors_of(&self, location: Location) -> Vec<(SquareStep, Location)> {
        SquareStep::VARIANTS.iter()
            .map(|step| (*step, step.attempt_from(location)))
            .filter(|(_, neighbor)| neighbor.within(self.length))
            .collect_vec()
    }

    pub(crate) fn display_of(&self, color: ColorID) -> char {
        self.color_displays.get(color).copied().unwrap_or('?')
    }

    /// Solve this puzzle with the default engine and options.
    /// See [`PuzzleSolver`] for finer control.
    pub fn solve(&self) -> Result<Outcome, SolveError> {
        PuzzleSolver::new(self).solve()
    }
}

/// Lay out one character per cell, one line per row.
pub(crate) fn print(board: Array2<char>) -> String {
    let mut out = String::with_capacity(board.nrows() * (board.ncols() + 1));

    for row in board.rows() {
        for col in row {
            out.push(*col);
        }
        out.push('\n');
    }

    out
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(self.cells.map(|cell| match cell {
            Cell::Terminus { color } => self.display_of(*color).to_ascii_uppercase(),
            Cell::Path { color } => self.display_of(*color).to_ascii_lowercase(),
            Cell::Empty => '.',
        })))
    }
}
