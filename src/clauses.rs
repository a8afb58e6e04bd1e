use itertools::Itertools;
use log::debug;
use strum::VariantArray;
use varisat::{CnfFormula, ExtendFormula, Lit};

use crate::cell::{Cell, ColorID};
use crate::encoder::VariableEncoder;
use crate::location::Location;
use crate::logic::{exactly_one, implies_equal};
use crate::puzzle::Puzzle;
use crate::shape::PathShape;

/// Produces the complete CNF formula for one [`Puzzle`].
///
/// # Logical setup
/// Every cell C has exactly one color.
///
/// If C is an endpoint, its color is known and all other colors are incorrect.
/// Exactly one neighbor of C shares its color (the neighbor by which the path leaves this endpoint).
///
/// Otherwise C has exactly one [`PathShape`] S, and S names the two neighbors continuing the path.
/// Both of those neighbors share the color of C, and no other neighbor does.
/// A shape leaving the board is impossible.
///
/// This says nothing about closed loops: a cycle of path cells satisfies every clause above.
/// Those are excluded afterwards, one at a time, by [`exclude_loop`].
pub struct ClauseBuilder<'a> {
    puzzle: &'a Puzzle,
    encoder: VariableEncoder,
    formula: CnfFormula,
}

impl<'a> ClauseBuilder<'a> {
    /// Prepare to encode `puzzle` with the variables of `encoder`.
    pub fn new(puzzle: &'a Puzzle, encoder: VariableEncoder) -> Self {
        let mut formula = CnfFormula::new();
        // make sure variables never mentioned in any clause still appear in the model
        formula.set_var_count(encoder.num_vars());

        Self {
            puzzle,
            encoder,
            formula,
        }
    }

    /// Encode every cell, consuming the builder and returning the formula it owns.
    pub fn build(mut self) -> CnfFormula {
        for location in self.puzzle.locations() {
            match self.puzzle.cell(location) {
                Cell::Terminus { color } => self.add_terminus_clauses(location, color),
                Cell::Path { color } => {
                    self.add_fixed_color(location, color);
                    self.add_path_clauses(location);
                }
                Cell::Empty => self.add_path_clauses(location),
            }
        }

        debug!(
            "encoded {}x{} board with {} colors: {} variables, {} clauses",
            self.puzzle.length(), self.puzzle.length(), self.puzzle.num_colors(),
            self.formula.var_count(), self.formula.len(),
        );

        self.formula
    }

    fn add_clauses(&mut self, clauses: impl IntoIterator<Item=Vec<Lit>>) {
        for clause in clauses {
            self.formula.add_clause(&clause);
        }
    }

    // the cell has `color` and no other
    fn add_fixed_color(&mut self, location: Location, color: ColorID) {
        let encoder = self.encoder;
        self.add_clauses(self.puzzle.colors()
            .map(|other| vec![encoder.cell_var(location, other).lit(other == color)])
            .collect_vec());
    }

    fn add_terminus_clauses(&mut self, location: Location, color: ColorID) {
        self.add_fixed_color(location, color);

        let same_colored_neighbors = self.puzzle.neighbors_of(location).into_iter()
            .map(|(_, neighbor)| self.encoder.cell_var(neighbor, color).positive())
            .collect_vec();

        // there exists exactly one neighbor with the same color
        self.add_clauses(exactly_one(same_colored_neighbors));
    }

    fn add_path_clauses(&mut self, location: Location) {
        let encoder = self.encoder;

        // this cell has exactly one color
        self.add_clauses(exactly_one(
            self.puzzle.colors()
                .map(|color| encoder.cell_var(location, color).positive())
                .collect_vec()
        ));

        // this cell has exactly one shape
        self.add_clauses(exactly_one(
            PathShape::VARIANTS.iter()
                .map(|shape| encoder.dir_var(location, *shape).positive())
                .collect_vec()
        ));

        let neighbors = self.puzzle.neighbors_of(location);

        // for every possible path shape S on this cell A...
        for shape in PathShape::VARIANTS {
            // let X be the statement "cell A has shape S"
            let x = encoder.dir_var(location, *shape).positive();

            let on_board = shape.steps().iter()
                .all(|step| neighbors.iter().any(|(neighbor_step, _)| neighbor_step == step));
            if !on_board {
                // this shape would connect A with a cell off the board; impossible!
                self.formula.add_clause(&[!x]);
                continue;
            }

            // for each color A may hold...
            for color in self.puzzle.colors() {
                // let Y be the statement "cell A has color K"
                let y = encoder.cell_var(location, color).positive();

                // for each neighbor B of A, let Z be the statement "cell B has color K"
                for (step, neighbor) in &neighbors {
                    let z = encoder.cell_var(*neighbor, color).positive();
                    if shape.contains(*step) {
                        // B continues the path, so Y must equal Z
                        self.add_clauses(implies_equal(x, y, z));
                    } else {
                        // B is not on S, so it must not touch A in A's color: X => !Y + !Z
                        self.formula.add_clause(&[!x, !y, !z]);
                    }
                }
            }
        }
    }
}

/// Forbid every cell in `cells` from keeping `color` at once, appending one clause to `formula`.
///
/// Used on a closed loop found in a candidate solution; any valid solution changes at least one of those cells,
/// since a valid solution never colors a whole cycle of the board alike.
pub fn exclude_loop(formula: &mut CnfFormula, encoder: &VariableEncoder, color: ColorID, cells: &[Location]) {
    let clause = cells.iter()
        .map(|cell| encoder.cell_var(*cell, color).negative())
        .collect_vec();
    formula.add_clause(&clause);
}
