use log::{debug, info};
use thiserror::Error;
use varisat::{CnfFormula, Lit, Solver};

use crate::clauses::{exclude_loop, ClauseBuilder};
use crate::cycle::{detect_cycle, CycleCheck};
use crate::encoder::VariableEncoder;
use crate::extract::{Solution, SolutionExtractor};
use crate::puzzle::Puzzle;

/// Reasons a [`PuzzleSolver`] may fail.
///
/// An unsatisfiable puzzle is not a failure; see [`Outcome::Unsatisfiable`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SolveError {
    /// A satisfying assignment could not be read back as a board.
    /// This should probably never happen.
    #[error("internal encoding error: {0}")]
    Encoding(String),
    /// The satisfiability engine itself failed.
    #[error("satisfiability engine failed: {0}")]
    Engine(String),
    /// Every assignment found within the allowed number of refinements contained a closed loop.
    #[error("no loop-free assignment found within {limit} refinements")]
    RefinementLimit {
        /// The number of refinements allowed.
        limit: usize,
    },
}

/// The result of a completed solve.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Every cell is colored and every color forms a single simple path.
    Solved(Solution),
    /// No such coloring exists.
    Unsatisfiable,
}

impl Outcome {
    /// The solution, if there is one.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::Unsatisfiable => None,
        }
    }
}

/// Knobs for [`PuzzleSolver`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SolveOptions {
    /// Give up with [`SolveError::RefinementLimit`] after excluding this many loops. [`None`] never gives up.
    pub max_refinements: Option<usize>,
}

/// A sound and complete decision procedure for CNF formulae.
pub trait SatEngine {
    /// Find an assignment to every variable of `formula` satisfying all of its clauses.
    ///
    /// Returns `Ok(None)` if none exists.
    fn solve(&mut self, formula: &CnfFormula) -> Result<Option<Vec<Lit>>, SolveError>;
}

/// [`SatEngine`] backed by [`varisat`], using a fresh solver for every call.
#[derive(Copy, Clone, Debug, Default)]
pub struct VarisatEngine;

impl SatEngine for VarisatEngine {
    fn solve(&mut self, formula: &CnfFormula) -> Result<Option<Vec<Lit>>, SolveError> {
        let mut solver = Solver::new();
        solver.add_formula(formula);

        let satisfiable = solver.solve()
            .map_err(|err| SolveError::Engine(format!("{:?}", err)))?;
        if !satisfiable {
            return Ok(None);
        }

        solver.model()
            .map(Some)
            .ok_or_else(|| SolveError::Engine("no model after a satisfiable result".to_string()))
    }
}

/// Solves one [`Puzzle`].
///
/// The puzzle is encoded once. Each round asks the engine for an assignment, reads it back as a board and
/// looks for a closed loop of one color. A loop-free board is the solution; otherwise a clause forbidding
/// that loop is appended and the next round starts. Each exclusion removes at least one assignment and there
/// are finitely many, so the loop terminates.
pub struct PuzzleSolver<'a> {
    puzzle: &'a Puzzle,
    encoder: VariableEncoder,
    options: SolveOptions,
}

impl<'a> PuzzleSolver<'a> {
    /// Prepare to solve `puzzle` with default options.
    pub fn new(puzzle: &'a Puzzle) -> Self {
        Self {
            puzzle,
            encoder: VariableEncoder::new(puzzle.length, puzzle.num_colors()),
            options: SolveOptions::default(),
        }
    }

    /// Replace the options of this solver.
    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Solve with [`VarisatEngine`].
    pub fn solve(&self) -> Result<Outcome, SolveError> {
        self.solve_with(&mut VarisatEngine)
    }

    /// Solve with any [`SatEngine`].
    pub fn solve_with<E: SatEngine>(&self, engine: &mut E) -> Result<Outcome, SolveError> {
        let mut formula = ClauseBuilder::new(self.puzzle, self.encoder).build();
        let extractor = SolutionExtractor::new(self.puzzle, &self.encoder);
        let mut refinements = 0;

        loop {
            debug!("round {}: solving {} clauses", refinements, formula.len());
            let Some(model) = engine.solve(&formula)? else {
                info!("unsatisfiable after {} refinements", refinements);
                return Ok(Outcome::Unsatisfiable);
            };

            let grid = extractor.extract(&model)?;
            match detect_cycle(&grid) {
                CycleCheck::NoCycle => {
                    info!("solved after {} refinements", refinements);
                    return Ok(Outcome::Solved(Solution::new(self.puzzle, grid, refinements)));
                }
                CycleCheck::CycleIn { color, cells } => {
                    if let Some(limit) = self.options.max_refinements {
                        if refinements >= limit {
                            return Err(SolveError::RefinementLimit { limit });
                        }
                    }

                    info!("excluding a loop of {} cells in color {}", cells.len(), color);
                    exclude_loop(&mut formula, &self.encoder, color, &cells);
                    refinements += 1;
                }
            }
        }
    }
}
