use std::collections::{HashMap, HashSet, VecDeque};

use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;

use crate::cell::ColorID;
use crate::location::Location;
use crate::shape::SquareStep;

/// The verdict of [`detect_cycle`] on a candidate grid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CycleCheck {
    /// Every same-colored component is acyclic.
    NoCycle,
    /// The component made of `cells` is colored `color` and closes on itself.
    CycleIn {
        /// The color of the loop.
        color: ColorID,
        /// Every cell of the component, in traversal order.
        cells: Vec<Location>,
    },
}

/// Join every pair of adjacent, identically colored cells. Edge weights are the shared color.
pub(crate) fn same_color_graph(grid: &Array2<ColorID>) -> UnGraphMap<Location, ColorID> {
    let mut graph = UnGraphMap::with_capacity(grid.len(), 2 * grid.len());

    for (index, color) in grid.indexed_iter() {
        let location = Location::from(index);
        graph.add_node(location);

        // add edges down and to the right, if possible
        for step in SquareStep::FORWARD_VARIANTS {
            let neighbor = step.attempt_from(location);
            if grid.get(neighbor.as_index()) == Some(color) {
                graph.add_edge(location, neighbor, *color);
            }
        }
    }

    graph
}

/// Breadth-first search of the component around `start`, marking it in `visited`.
///
/// Returns the component and whether some cell reached an already visited neighbor other than the one it was
/// discovered from, which happens exactly when the component contains a cycle.
fn traverse(
    graph: &UnGraphMap<Location, ColorID>,
    start: Location,
    visited: &mut HashSet<Location>,
) -> (Vec<Location>, bool) {
    let mut parents: HashMap<Location, Location> = HashMap::new();
    let mut component = vec![start];
    let mut queue = VecDeque::from([start]);
    let mut closed = false;
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in graph.neighbors(current) {
            if visited.insert(neighbor) {
                parents.insert(neighbor, current);
                component.push(neighbor);
                queue.push_back(neighbor);
            } else if parents.get(&current) != Some(&neighbor) {
                closed = true;
            }
        }
    }

    (component, closed)
}

/// Find a closed loop of one color in `grid`, indexed `[row, col]`.
///
/// Components are visited in row-major order of their first cell and the first cyclic one is reported whole.
/// A simple path, such as one running between the two endpoints of its color, is never reported.
/// No state is kept between calls.
pub fn detect_cycle(grid: &Array2<ColorID>) -> CycleCheck {
    let graph = same_color_graph(grid);
    let mut visited = HashSet::with_capacity(grid.len());

    for (index, color) in grid.indexed_iter() {
        let start = Location::from(index);
        if visited.contains(&start) {
            continue;
        }

        let (cells, closed) = traverse(&graph, start, &mut visited);
        if closed {
            return CycleCheck::CycleIn { color: *color, cells };
        }
    }

    CycleCheck::NoCycle
}
