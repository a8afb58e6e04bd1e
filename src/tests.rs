#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use ndarray::{array, Array2};
    use test_log::test;
    use varisat::{CnfFormula, Lit, Var};

    use crate::builder::SquarePuzzleBuilder;
    use crate::cycle::{detect_cycle, CycleCheck};
    use crate::encoder::{EncodedVar, VariableEncoder};
    use crate::extract::Solution;
    use crate::location::Location;
    use crate::puzzle::Puzzle;
    use crate::solver::{Outcome, PuzzleSolver, SatEngine, SolveError, SolveOptions, VarisatEngine};

    /// Replays canned assignments, then defers to varisat. Records the size of every formula it is asked about.
    struct ScriptedEngine {
        script: VecDeque<Vec<Lit>>,
        formula_lens: Vec<usize>,
    }

    impl ScriptedEngine {
        fn new(script: impl IntoIterator<Item=Vec<Lit>>) -> Self {
            Self {
                script: script.into_iter().collect(),
                formula_lens: Vec::new(),
            }
        }
    }

    impl SatEngine for ScriptedEngine {
        fn solve(&mut self, formula: &CnfFormula) -> Result<Option<Vec<Lit>>, SolveError> {
            self.formula_lens.push(formula.len());
            match self.script.pop_front() {
                Some(model) => Ok(Some(model)),
                None => VarisatEngine.solve(formula),
            }
        }
    }

    // an assignment giving each cell the color in `grid`; every shape variable is false
    fn model_of(puzzle: &Puzzle, grid: &Array2<usize>) -> Vec<Lit> {
        let encoder = VariableEncoder::new(puzzle.length, puzzle.num_colors());
        (0..encoder.num_vars())
            .map(|index| {
                let var = Var::from_index(index);
                let truth = match encoder.decode(var).unwrap() {
                    EncodedVar::CellColor { location, color } => grid[location.as_index()] == color,
                    EncodedVar::Direction { .. } => false,
                };
                var.lit(truth)
            })
            .collect()
    }

    fn solved(puzzle: &Puzzle) -> Solution {
        match puzzle.solve().unwrap() {
            Outcome::Solved(solution) => solution,
            Outcome::Unsatisfiable => panic!("puzzle should be solvable:\n{}", puzzle),
        }
    }

    /// Check every rule of the game directly against the grid.
    fn assert_valid(puzzle: &Puzzle, solution: &Solution) {
        assert_eq!(solution.length(), puzzle.length());

        for location in puzzle.locations() {
            let color = solution.color_at(location).unwrap();
            assert!(puzzle.colors().contains(&color));
            if let Some(fixed) = puzzle.color_at(location) {
                assert_eq!(color, fixed, "fixed color changed at {:?}", location);
            }

            let same_colored = puzzle.neighbors_of(location).into_iter()
                .filter(|(_, neighbor)| solution.color_at(*neighbor) == Some(color))
                .count();
            let expected = if puzzle.is_terminus(location) { 1 } else { 2 };
            assert_eq!(same_colored, expected, "wrong degree at {:?}", location);
        }

        assert_eq!(detect_cycle(solution.grid()), CycleCheck::NoCycle);
    }

    // three colors on a 5x5 board; some assignments of the loop-blind encoding close a loop, exactly one does not
    fn loop_prone() -> Puzzle {
        Puzzle::from_endpoints(5, 3, &[
            (4, 0, 1), (4, 4, 1),
            (1, 2, 2), (3, 3, 2),
            (3, 2, 3), (1, 3, 3),
        ]).unwrap()
    }

    const LOOP_PRONE_SOLVED: &str = "aaaaa
abBCa
abcca
abCBa
AbbbA
";

    #[test]
    fn solve_two_by_two() {
        let puzzle = Puzzle::from_endpoints(2, 2, &[(0, 0, 1), (0, 1, 1), (1, 0, 2), (1, 1, 2)]).unwrap();

        let solution = solved(&puzzle);
        assert_eq!(solution.rows(), vec![vec![1, 1], vec![2, 2]]);
        assert_eq!(format!("{}", solution), "AA
BB
");
        assert_valid(&puzzle, &solution);
    }

    #[test]
    fn endpoint_with_two_forced_neighbors_is_unsatisfiable() {
        // a single color must fill the board, so each endpoint touches two cells of its own color
        let puzzle = Puzzle::from_endpoints(2, 1, &[(0, 0, 1), (1, 1, 1)]).unwrap();
        assert!(matches!(puzzle.solve(), Ok(Outcome::Unsatisfiable)));
    }

    #[test]
    fn crossing_paths_are_unsatisfiable() {
        let puzzle = Puzzle::from_endpoints(2, 2, &[(0, 0, 1), (1, 1, 1), (0, 1, 2), (1, 0, 2)]).unwrap();

        let outcome = puzzle.solve().unwrap();
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn solve_most_basic() {
        // flow free classic pack level 1
        let puzzle = SquarePuzzleBuilder::with_length(5)
            .add_termini('A', (Location(0, 0), Location(4, 1)))
            .add_termini('B', (Location(0, 2), Location(3, 1)))
            .add_termini('C', (Location(1, 2), Location(4, 2)))
            .add_termini('D', (Location(0, 4), Location(3, 3)))
            .add_termini('E', (Location(1, 4), Location(4, 3)))
            .build()
            .unwrap();

        assert_eq!(format!("{}", puzzle), "A.B.D
..C.E
.....
.B.D.
.ACE.
");

        let solution = solved(&puzzle);
        assert_eq!(format!("{}", solution), "AbBdD
abCdE
abcde
aBcDe
aACEe
");
        assert_eq!(solution.to_rows_string(), "[1, 2, 2, 4, 4]
[1, 2, 3, 4, 5]
[1, 2, 3, 4, 5]
[1, 2, 3, 4, 5]
[1, 1, 3, 5, 5]
");
        assert_valid(&puzzle, &solution);
    }

    #[test]
    fn solve_large_simple_square() {
        // flow free extreme pack 2 12x12 level 13
        let puzzle = SquarePuzzleBuilder::with_length(12)
            .add_termini('A', (Location(4, 7), Location(11, 4)))
            .add_termini('B', (Location(4, 6), Location(11, 5)))
            .add_termini('C', (Location(6, 6), Location(11, 0)))
            .add_termini('D', (Location(2, 2), Location(3, 7)))
            .add_termini('E', (Location(4, 5), Location(11, 7)))
            .add_termini('F', (Location(2, 7), Location(8, 3)))
            .add_termini('G', (Location(8, 2), Location(10, 5)))
            .build()
            .unwrap();

        assert_eq!(format!("{}", puzzle), "............
............
..D....F....
.......D....
.....EBA....
............
......C.....
............
..GF........
............
.....G......
C...AB.E....
");

        let solution = solved(&puzzle);
        assert_valid(&puzzle, &solution);
    }

    #[test]
    fn loops_are_refined_away() {
        let puzzle = loop_prone();

        let solution = solved(&puzzle);
        assert_eq!(format!("{}", solution), LOOP_PRONE_SOLVED);
        assert_valid(&puzzle, &solution);
    }

    #[test]
    fn looped_assignment_is_excluded_and_solved_again() {
        let puzzle = loop_prone();
        // handed to the loop check as is; the top left corner is a closed loop of color 1
        let looped = array![
            [1, 1, 2, 2, 2],
            [1, 1, 2, 3, 2],
            [2, 2, 3, 3, 2],
            [2, 2, 3, 2, 2],
            [1, 1, 1, 1, 1],
        ];
        assert!(matches!(detect_cycle(&looped), CycleCheck::CycleIn { color: 1, .. }));

        let mut engine = ScriptedEngine::new([model_of(&puzzle, &looped)]);
        let outcome = PuzzleSolver::new(&puzzle).solve_with(&mut engine).unwrap();

        let solution = outcome.solution().unwrap();
        assert!(solution.refinements() >= 1);
        assert_eq!(solution.refinements(), engine.formula_lens.len() - 1);
        assert_eq!(format!("{}", solution), LOOP_PRONE_SOLVED);

        // each round adds exactly one clause
        for pair in engine.formula_lens.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
    }

    #[test]
    fn refinement_limit_is_respected() {
        let puzzle = loop_prone();
        let looped = array![
            [1, 1, 2, 2, 2],
            [1, 1, 2, 3, 2],
            [2, 2, 3, 3, 2],
            [2, 2, 3, 2, 2],
            [1, 1, 1, 1, 1],
        ];

        let mut engine = ScriptedEngine::new([model_of(&puzzle, &looped)]);
        let err = PuzzleSolver::new(&puzzle)
            .with_options(SolveOptions { max_refinements: Some(0) })
            .solve_with(&mut engine)
            .unwrap_err();

        assert_eq!(err, SolveError::RefinementLimit { limit: 0 });
        assert_eq!(engine.formula_lens.len(), 1);
    }

    #[test]
    fn solving_a_solution_reproduces_it() {
        let puzzle = SquarePuzzleBuilder::with_length(5)
            .add_termini('A', (Location(0, 0), Location(4, 1)))
            .add_termini('B', (Location(0, 2), Location(3, 1)))
            .add_termini('C', (Location(1, 2), Location(4, 2)))
            .add_termini('D', (Location(0, 4), Location(3, 3)))
            .add_termini('E', (Location(1, 4), Location(4, 3)))
            .build()
            .unwrap();
        let first = solved(&puzzle);

        let given = first.as_given_puzzle().unwrap();
        // a given puzzle renders like its solution
        assert_eq!(format!("{}", given), format!("{}", first));

        let second = solved(&given);
        assert_eq!(second.grid(), first.grid());
        assert_valid(&given, &second);
    }

    #[test]
    fn given_cells_constrain_the_solution() {
        // a lone path cell of color 1 cannot sit between two color 2 endpoints
        let puzzle = SquarePuzzleBuilder::with_colors(3, 2)
            .add_endpoint(Location(0, 0), 1)
            .add_endpoint(Location(0, 2), 1)
            .add_endpoint(Location(2, 0), 2)
            .add_endpoint(Location(2, 2), 2)
            .add_given(Location(2, 1), 1)
            .build()
            .unwrap();

        assert_eq!(format!("{}", puzzle), "A.A
...
BaB
");
        assert!(matches!(puzzle.solve(), Ok(Outcome::Unsatisfiable)));
    }
}
