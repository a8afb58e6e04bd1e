use strum::VariantArray;
use varisat::Var;

use crate::cell::ColorID;
use crate::location::{Coord, Dimension, Location};
use crate::shape::PathShape;

/// What a SAT variable produced by [`VariableEncoder`] stands for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EncodedVar {
    /// True iff the cell at `location` has `color`.
    CellColor {
        /// The cell.
        location: Location,
        /// The color it may hold.
        color: ColorID,
    },
    /// True iff the path through the cell at `location` has `shape`.
    Direction {
        /// The cell.
        location: Location,
        /// The shape the path may take through it.
        shape: PathShape,
    },
}

/// Numbers the variables of one puzzle.
///
/// Cell color variables take the first `L * L * C` indices, cell by cell in row-major order and color by color within a cell.
/// Direction variables take the next `L * L * 6`, laid out the same way over [`PathShape::VARIANTS`].
/// DIMACS ids are one more than the index, so every id is strictly positive.
///
/// Inputs off the board or outside `1..=C` are a caller error and panic.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct VariableEncoder {
    length: Coord,
    colors: ColorID,
}

impl VariableEncoder {
    /// An encoder for a `length` by `length` board with `colors` colors.
    pub fn new(length: Dimension, colors: ColorID) -> Self {
        assert!(colors > 0, "an encoder needs at least one color");

        Self {
            length: length.get(),
            colors,
        }
    }

    fn cell_index(&self, location: Location) -> usize {
        assert!(
            location.0 < self.length && location.1 < self.length,
            "location {:?} is off a {}x{} board", location, self.length, self.length,
        );
        location.0 * self.length + location.1
    }

    /// The variable stating the cell at `location` has `color`.
    pub fn cell_var(&self, location: Location, color: ColorID) -> Var {
        assert!((1..=self.colors).contains(&color), "color {} is outside 1..={}", color, self.colors);
        Var::from_index(self.cell_index(location) * self.colors + (color - 1))
    }

    /// The variable stating the path through the cell at `location` has `shape`.
    pub fn dir_var(&self, location: Location, shape: PathShape) -> Var {
        // highest possible cell var, then the shape block of this cell
        Var::from_index(self.num_cell_vars()
            + self.cell_index(location) * PathShape::VARIANTS.len()
            + shape.index())
    }

    /// The number of cell color variables.
    pub fn num_cell_vars(&self) -> usize {
        self.length * self.length * self.colors
    }

    /// The total number of variables of both families.
    pub fn num_vars(&self) -> usize {
        self.num_cell_vars() + self.length * self.length * PathShape::VARIANTS.len()
    }

    /// Invert [`cell_var`](Self::cell_var) and [`dir_var`](Self::dir_var).
    /// Returns [`None`] for variables beyond [`num_vars`](Self::num_vars).
    pub fn decode(&self, var: Var) -> Option<EncodedVar> {
        let index = var.index();
        if index < self.num_cell_vars() {
            let cell = index / self.colors;
            Some(EncodedVar::CellColor {
                location: Location(cell / self.length, cell % self.length),
                color: index % self.colors + 1,
            })
        } else if index < self.num_vars() {
            let offset = index - self.num_cell_vars();
            let cell = offset / PathShape::VARIANTS.len();
            Some(EncodedVar::Direction {
                location: Location(cell / self.length, cell % self.length),
                shape: PathShape::VARIANTS[offset % PathShape::VARIANTS.len()],
            })
        } else {
            None
        }
    }
}
