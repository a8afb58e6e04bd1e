use std::collections::HashMap;
use std::mem::size_of;
use std::num::NonZero;
use std::ops::IndexMut;

use ndarray::{Array2, AssignElem};
use thiserror::Error;

use crate::cell::{Cell, ColorID};
use crate::location::{Coord, Location};
use crate::puzzle::Puzzle;

/// Reasons a puzzle may be rejected while being built.
///
/// Each variant names the constraint the input violated; nothing is silently corrected.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum InvalidPuzzle {
    /// The side length of the board is zero.
    #[error("the board must have a nonzero side length")]
    ZeroLength,
    /// The board has more cells than can be held in memory.
    #[error("a {length}x{length} board is too large")]
    TooLarge {
        /// The requested side length.
        length: Coord,
    },
    /// The puzzle declares no colors.
    #[error("the puzzle must use at least one color")]
    NoColors,
    /// A feature was placed outside the board.
    #[error("location ({}, {}) lies outside a {length}x{length} board", location.0, location.1)]
    OutOfBounds {
        /// Where the feature was placed.
        location: Location,
        /// The side length of the board.
        length: Coord,
    },
    /// A color is not in `1..=colors`.
    #[error("color {color} is outside the range 1..={colors}")]
    ColorOutOfRange {
        /// The offending color.
        color: ColorID,
        /// The highest color this puzzle can hold.
        colors: ColorID,
    },
    /// Two features were placed on the same cell.
    #[error("location ({}, {}) is assigned more than once", location.0, location.1)]
    DuplicateCell {
        /// The cell assigned twice.
        location: Location,
    },
    /// A color does not have exactly two endpoints.
    #[error("color {color} has {found} endpoints, expected exactly 2")]
    EndpointCount {
        /// The color with the wrong count.
        color: ColorID,
        /// How many endpoints it has.
        found: usize,
    },
}

/// A builder for square boards, as found in Numberlink puzzles and Flow Free.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// The first problem encountered puts the builder in an invalid state, after which further calls do nothing
/// and [`build`](Self::build) reports that problem.
#[derive(Clone, Debug)]
pub struct SquarePuzzleBuilder {
    length: Coord,
    // fixed by the caller, or else the number of colors seen
    colors: Option<ColorID>,
    cells: Array2<Cell>,
    color_displays: Vec<char>,
    invalid_reasons: Vec<InvalidPuzzle>,
}

impl Default for SquarePuzzleBuilder {
    fn default() -> Self {
        Self::with_length(5)
    }
}

/// The display used for `color` when none was given: `A` for color 1, `B` for color 2, and so on.
pub(crate) fn default_display(color: ColorID) -> char {
    char::from_u32('A' as u32 + (color as u32).saturating_sub(1) % 26).unwrap_or('?')
}

impl SquarePuzzleBuilder {
    /// Construct a new [`Self`] for a `length` by `length` board.
    /// The number of colors is inferred from the termini added.
    pub fn with_length(length: Coord) -> Self {
        let mut invalid_reasons = Vec::new();
        if length == 0 {
            invalid_reasons.push(InvalidPuzzle::ZeroLength);
        }

        // the cell array must fit in an isize worth of bytes
        let fits = length.checked_mul(length)
            .and_then(|cells| cells.checked_mul(size_of::<Cell>()))
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        let side = if fits {
            length
        } else {
            invalid_reasons.push(InvalidPuzzle::TooLarge { length });
            0
        };

        Self {
            length,
            colors: None,
            cells: Array2::from_shape_simple_fn((side, side), Cell::default),
            color_displays: Default::default(),
            invalid_reasons,
        }
    }

    /// Construct a new [`Self`] for a `length` by `length` board using exactly `colors` colors.
    pub fn with_colors(length: Coord, colors: ColorID) -> Self {
        let mut builder = Self::with_length(length);
        if colors == 0 {
            builder.invalid_reasons.push(InvalidPuzzle::NoColors);
        }
        builder.colors = Some(colors);
        builder
    }

    fn check_free(&mut self, location: Location) -> bool {
        if location.0 >= self.length || location.1 >= self.length {
            self.invalid_reasons.push(InvalidPuzzle::OutOfBounds { location, length: self.length });
            return false;
        }

        if self.cells[location.as_index()] != Cell::Empty {
            self.invalid_reasons.push(InvalidPuzzle::DuplicateCell { location });
            return false;
        }

        true
    }

    // a color beyond the declared count, or beyond what the board has room for, is rejected before any
    // per-color state is grown to hold it
    fn check_color(&mut self, color: ColorID) -> bool {
        // every color needs two cells
        let room = self.length.saturating_mul(self.length) / 2;
        let colors = self.colors.map_or(room, |colors| colors.min(room));
        if color == 0 || color > colors {
            self.invalid_reasons.push(InvalidPuzzle::ColorOutOfRange { color, colors });
            return false;
        }

        true
    }

    fn ensure_display(&mut self, color: ColorID) {
        while self.color_displays.len() < color {
            self.color_displays.push(default_display(self.color_displays.len() + 1));
        }
    }

    /// Add termini, or "flow endpoints", for a new color shown as `display`. The order in which `locations` are specified does not matter.
    ///
    /// Colors are numbered in the order their termini are added, starting at 1.
    pub fn add_termini(&mut self, display: char, locations: (Location, Location)) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if locations.0 == locations.1 {
            self.invalid_reasons.push(InvalidPuzzle::DuplicateCell { location: locations.0 });
            return self;
        }

        for location in [locations.0, locations.1] {
            if !self.check_free(location) {
                return self;
            }
        }

        // colors start at 1
        let color = self.color_displays.len() + 1;
        self.color_displays.push(display);
        for location in [locations.0, locations.1] {
            self.cells.index_mut(location.as_index()).assign_elem(Cell::Terminus { color })
        }

        self
    }

    /// Add a single endpoint of `color`. Its partner must be added separately.
    pub fn add_endpoint(&mut self, location: Location, color: ColorID) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.check_color(color) && self.check_free(location) {
            self.ensure_display(color);
            self.cells.index_mut(location.as_index()).assign_elem(Cell::Terminus { color });
        }

        self
    }

    /// Fix a non-endpoint cell at `location` to `color`.
    /// The cell must still continue the path of `color` in exactly two directions.
    pub fn add_given(&mut self, location: Location, color: ColorID) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.check_color(color) && self.check_free(location) {
            self.ensure_display(color);
            self.cells.index_mut(location.as_index()).assign_elem(Cell::Path { color });
        }

        self
    }

    /// Remove the termini of the most recently added color.
    ///
    /// If the builder is in an invalid state or no colors are present, this function does nothing.
    pub fn pop_termini(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let color_to_remove = self.color_displays.len();
        if self.color_displays.pop().is_some() {
            self.cells.map_inplace(|cell| {
                if let Cell::Terminus { color } = cell {
                    if *color == color_to_remove {
                        cell.assign_elem(Cell::Empty);
                    }
                }
            })
        }

        self
    }

    /// Check the validity of this builder so far.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<InvalidPuzzle>)` otherwise.
    /// Endpoint counts are only checked by [`build`](Self::build).
    pub fn is_valid(&self) -> Option<&Vec<InvalidPuzzle>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Puzzle`], validating it once.
    pub fn build(&self) -> Result<Puzzle, InvalidPuzzle> {
        if let Some(reason) = self.invalid_reasons.first() {
            return Err(reason.clone());
        }

        let length = NonZero::new(self.length).ok_or(InvalidPuzzle::ZeroLength)?;
        let colors = self.colors.unwrap_or(self.color_displays.len());
        if colors == 0 {
            return Err(InvalidPuzzle::NoColors);
        }

        let mut termini_found: HashMap<ColorID, usize> = HashMap::with_capacity(colors.min(self.cells.len()));
        for cell in self.cells.iter() {
            if let Some(color) = cell.color() {
                if color > colors {
                    return Err(InvalidPuzzle::ColorOutOfRange { color, colors });
                }
            }
            if let Cell::Terminus { color } = cell {
                *termini_found.entry(*color).or_default() += 1;
            }
        }

        for color in 1..=colors {
            let found = termini_found.get(&color).copied().unwrap_or(0);
            if found != 2 {
                return Err(InvalidPuzzle::EndpointCount { color, found });
            }
        }

        // display 0 is for empty cells
        let mut color_displays = Vec::with_capacity(colors + 1);
        color_displays.push('.');
        color_displays.extend((1..=colors).map(|color| self.color_displays.get(color - 1)
            .copied()
            .unwrap_or_else(|| default_display(color))));

        Ok(Puzzle {
            length,
            colors,
            cells: self.cells.clone(),
            color_displays,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{InvalidPuzzle, SquarePuzzleBuilder};
    use crate::location::Location;

    #[test]
    fn remove_termini() {
        let puzzle = SquarePuzzleBuilder::with_length(5)
            .add_termini('A', (Location(0, 0), Location(4, 1)))
            .add_termini('B', (Location(0, 2), Location(3, 1)))
            .pop_termini()
            .build()
            .unwrap();

        assert_eq!(format!("{}", puzzle), "A....
.....
.....
.....
.A...
");
    }

    #[test]
    fn zero_length_is_rejected() {
        assert_eq!(SquarePuzzleBuilder::with_length(0).build().unwrap_err(), InvalidPuzzle::ZeroLength);
    }

    #[test]
    fn no_colors_is_rejected() {
        assert_eq!(SquarePuzzleBuilder::with_length(3).build().unwrap_err(), InvalidPuzzle::NoColors);
        assert_eq!(SquarePuzzleBuilder::with_colors(3, 0).build().unwrap_err(), InvalidPuzzle::NoColors);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut builder = SquarePuzzleBuilder::with_length(3);
        builder.add_termini('A', (Location(0, 0), Location(3, 1)));

        assert_eq!(builder.is_valid(), Some(&vec![InvalidPuzzle::OutOfBounds { location: Location(3, 1), length: 3 }]));
        // an invalid builder ignores further features
        builder.add_termini('B', (Location(1, 1), Location(2, 2)));
        assert_eq!(builder.is_valid().map(Vec::len), Some(1));
        assert!(builder.build().is_err());
    }

    #[test]
    fn overlapping_termini_are_rejected() {
        let err = SquarePuzzleBuilder::with_length(3)
            .add_termini('A', (Location(0, 0), Location(2, 2)))
            .add_termini('B', (Location(2, 2), Location(1, 0)))
            .build()
            .unwrap_err();

        assert_eq!(err, InvalidPuzzle::DuplicateCell { location: Location(2, 2) });
    }

    #[test]
    fn endpoint_counts_are_checked() {
        let err = SquarePuzzleBuilder::with_colors(3, 2)
            .add_endpoint(Location(0, 0), 1)
            .add_endpoint(Location(0, 2), 1)
            .add_endpoint(Location(2, 0), 2)
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidPuzzle::EndpointCount { color: 2, found: 1 });

        let err = SquarePuzzleBuilder::with_colors(3, 1)
            .add_endpoint(Location(0, 0), 1)
            .add_endpoint(Location(0, 2), 1)
            .add_endpoint(Location(2, 0), 1)
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidPuzzle::EndpointCount { color: 1, found: 3 });
    }

    #[test]
    fn colors_beyond_the_declared_count_are_rejected() {
        let err = SquarePuzzleBuilder::with_colors(3, 1)
            .add_endpoint(Location(0, 0), 1)
            .add_endpoint(Location(0, 2), 1)
            .add_endpoint(Location(2, 0), 2)
            .add_endpoint(Location(2, 2), 2)
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidPuzzle::ColorOutOfRange { color: 2, colors: 1 });

        let err = SquarePuzzleBuilder::with_colors(3, 1)
            .add_endpoint(Location(0, 0), 0)
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidPuzzle::ColorOutOfRange { color: 0, colors: 1 });
    }

    #[test]
    fn huge_colors_are_rejected_before_use() {
        let mut builder = SquarePuzzleBuilder::with_colors(3, 1);
        builder.add_endpoint(Location(0, 0), 1)
            .add_endpoint(Location(2, 2), 1)
            .add_given(Location(1, 1), 1 << 40);
        assert_eq!(builder.is_valid(), Some(&vec![InvalidPuzzle::ColorOutOfRange { color: 1 << 40, colors: 1 }]));

        // without a declared count, no color can exceed half the cells
        let err = SquarePuzzleBuilder::with_length(3)
            .add_endpoint(Location(0, 0), 1 << 40)
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidPuzzle::ColorOutOfRange { color: 1 << 40, colors: 4 });

        // nor with an absurd declared count
        let err = SquarePuzzleBuilder::with_colors(3, 1 << 41)
            .add_endpoint(Location(0, 0), 1 << 40)
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidPuzzle::ColorOutOfRange { color: 1 << 40, colors: 4 });

        // a declared count far beyond the endpoints given is a missing endpoint, not an allocation
        let err = SquarePuzzleBuilder::with_colors(3, 1 << 41)
            .add_endpoint(Location(0, 0), 1)
            .add_endpoint(Location(2, 2), 1)
            .build()
            .unwrap_err();
        assert_eq!(err, InvalidPuzzle::EndpointCount { color: 2, found: 0 });
    }

    #[test]
    fn oversized_board_is_rejected() {
        let length = 1 << 33;
        let mut builder = SquarePuzzleBuilder::with_colors(length, 1);
        builder.add_endpoint(Location(0, 0), 1).add_endpoint(Location(1, 1), 1);

        assert_eq!(builder.build().unwrap_err(), InvalidPuzzle::TooLarge { length });
        assert_eq!(SquarePuzzleBuilder::with_length(usize::MAX).build().unwrap_err(), InvalidPuzzle::TooLarge { length: usize::MAX });
    }

    #[test]
    fn errors_describe_the_violation() {
        assert_eq!(
            InvalidPuzzle::OutOfBounds { location: Location(3, 1), length: 3 }.to_string(),
            "location (3, 1) lies outside a 3x3 board"
        );
        assert_eq!(
            InvalidPuzzle::EndpointCount { color: 2, found: 1 }.to_string(),
            "color 2 has 1 endpoints, expected exactly 2"
        );
    }
}
