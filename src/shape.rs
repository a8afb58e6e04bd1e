use strum::VariantArray;

use crate::location::Location;

/// The four axis-aligned steps between neighboring cells of a square board.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    Up,
    Down,
    Left,
    Right,
}

impl SquareStep {
    /// The steps which, in row-major order, lead from a cell to a higher indexed cell.
    /// Walking only these visits every adjacency of the board exactly once.
    pub const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    /// Attempt the step from `location` and return the resultant [`Location`], which may lie off the board.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((-1, 0)),
            Self::Down => location.offset_by((1, 0)),
            Self::Left => location.offset_by((0, -1)),
            Self::Right => location.offset_by((0, 1)),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// The shape a path takes through a non-endpoint cell, i.e. which two of its four neighbors continue the path.
///
/// The variant order is fixed; it determines the direction variable numbering in
/// [`VariableEncoder`](crate::encoder::VariableEncoder).
#[derive(Copy, Clone, Debug, VariantArray, Eq, PartialEq, Hash)]
pub enum PathShape {
    LeftRight,
    UpDown,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl PathShape {
    /// The two steps leading out of a cell with this shape.
    pub fn steps(&self) -> [SquareStep; 2] {
        match self {
            Self::LeftRight => [SquareStep::Right, SquareStep::Left],
            Self::UpDown => [SquareStep::Down, SquareStep::Up],
            Self::UpLeft => [SquareStep::Up, SquareStep::Left],
            Self::UpRight => [SquareStep::Up, SquareStep::Right],
            Self::DownLeft => [SquareStep::Down, SquareStep::Left],
            Self::DownRight => [SquareStep::Down, SquareStep::Right],
        }
    }

    /// Whether the path through a cell of this shape leaves by `step`.
    pub fn contains(&self, step: SquareStep) -> bool {
        self.steps().contains(&step)
    }

    /// The shape leaving by exactly the two given steps, in either order.
    pub fn from_steps(a: SquareStep, b: SquareStep) -> Option<Self> {
        Self::VARIANTS.iter()
            .find(|shape| a != b && shape.contains(a) && shape.contains(b))
            .copied()
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}
