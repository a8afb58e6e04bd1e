/// A color, numbered from 1.
pub type ColorID = usize;

/// What a puzzle fixes about a single cell before solving.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Cell {
    /// One end of the path of `color`; exactly one neighbor continues the path.
    Terminus { color: ColorID },
    /// A cell known to lie in the middle of the path of `color`.
    Path { color: ColorID },
    #[default]
    Empty,
}

impl Cell {
    pub(crate) fn color(&self) -> Option<ColorID> {
        match self {
            Cell::Terminus { color } | Cell::Path { color } => Some(*color),
            Cell::Empty => None,
        }
    }
}
