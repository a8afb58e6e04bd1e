use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use varisat::{Lit, Var};

use crate::builder::{InvalidPuzzle, SquarePuzzleBuilder};
use crate::cell::{Cell, ColorID};
use crate::encoder::VariableEncoder;
use crate::location::{Dimension, Location};
use crate::puzzle::{print, Puzzle};
use crate::solver::SolveError;

/// Reads a cell to color grid back out of a satisfying assignment.
pub struct SolutionExtractor<'a> {
    puzzle: &'a Puzzle,
    encoder: &'a VariableEncoder,
}

impl<'a> SolutionExtractor<'a> {
    /// Prepare to read assignments of variables numbered by `encoder` for `puzzle`.
    pub fn new(puzzle: &'a Puzzle, encoder: &'a VariableEncoder) -> Self {
        Self { puzzle, encoder }
    }

    /// Map `model` to the color of every cell, indexed `[row, col]`.
    ///
    /// Fails with [`SolveError::Encoding`] if any cell holds no color or several, which a model of a formula
    /// from [`ClauseBuilder`](crate::clauses::ClauseBuilder) never does.
    pub fn extract(&self, model: &[Lit]) -> Result<Array2<ColorID>, SolveError> {
        let truths = model.iter()
            .filter(|lit| lit.is_positive())
            .map(|lit| lit.var())
            .collect::<HashSet<Var>>();

        let length = self.puzzle.length();
        let mut grid = Array2::zeros((length, length));
        for location in self.puzzle.locations() {
            let held = self.puzzle.colors()
                .filter(|color| truths.contains(&self.encoder.cell_var(location, *color)))
                .collect_vec();

            match held.as_slice() {
                [color] => grid[location.as_index()] = *color,
                _ => return Err(SolveError::Encoding(format!(
                    "cell ({}, {}) holds {} colors in the assignment", location.0, location.1, held.len()
                ))),
            }
        }

        Ok(grid)
    }
}

/// A solved puzzle: every cell holds exactly one color and every color forms one simple path between its endpoints.
#[derive(Clone, Debug)]
pub struct Solution {
    pub(crate) length: Dimension,
    pub(crate) grid: Array2<ColorID>,
    pub(crate) cells: Array2<Cell>,
    pub(crate) color_displays: Vec<char>,
    pub(crate) refinements: usize,
}

impl Solution {
    pub(crate) fn new(puzzle: &Puzzle, grid: Array2<ColorID>, refinements: usize) -> Self {
        Self {
            length: puzzle.length,
            grid,
            cells: puzzle.cells.clone(),
            color_displays: puzzle.color_displays.clone(),
            refinements,
        }
    }

    /// The side length of the board.
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// The color at `location`, or [`None`] off the board.
    pub fn color_at(&self, location: Location) -> Option<ColorID> {
        self.grid.get(location.as_index()).copied()
    }

    /// The colors of every cell, indexed `[row, col]`.
    pub fn grid(&self) -> &Array2<ColorID> {
        &self.grid
    }

    /// The colors of every cell, one [`Vec`] per row.
    pub fn rows(&self) -> Vec<Vec<ColorID>> {
        self.grid.rows().into_iter().map(|row| row.to_vec()).collect_vec()
    }

    /// How many closed loops were excluded before this solution was found.
    pub fn refinements(&self) -> usize {
        self.refinements
    }

    /// The same board with every endpoint kept and every other cell fixed to its solved color.
    /// Solving it reproduces this solution.
    pub fn as_given_puzzle(&self) -> Result<Puzzle, InvalidPuzzle> {
        let mut builder = SquarePuzzleBuilder::with_colors(self.length(), self.color_displays.len() - 1);
        for (index, cell) in self.cells.indexed_iter() {
            let location = Location::from(index);
            match cell {
                Cell::Terminus { color } => builder.add_endpoint(location, *color),
                _ => builder.add_given(location, self.grid[index]),
            };
        }

        let mut puzzle = builder.build()?;
        puzzle.color_displays = self.color_displays.clone();
        Ok(puzzle)
    }

    /// One bracketed list of colors per row, e.g. `[1, 1, 2]`.
    pub fn to_rows_string(&self) -> String {
        self.grid.rows().into_iter()
            .map(|row| format!("[{}]\n", row.iter().join(", ")))
            .collect()
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let board = Array2::from_shape_fn(self.grid.raw_dim(), |index| {
            let display = self.color_displays.get(self.grid[index]).copied().unwrap_or('?');
            match self.cells[index] {
                Cell::Terminus { .. } => display.to_ascii_uppercase(),
                _ => display.to_ascii_lowercase(),
            }
        });

        write!(f, "{}", print(board))
    }
}
