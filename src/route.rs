use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::config::Params;
use crate::grid::{Cell, Grid, neighbors4};

/// Home-to-destination cell sequence; consecutive cells share an edge.
pub type Path = Vec<Cell>;

/// A destination and the path that reaches it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoutedPath {
    pub destination: String,
    pub cells: Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUnreachable {
    pub destination: String,
}

impl fmt::Display for PathUnreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no path from home to '{}'", self.destination)
    }
}

impl std::error::Error for PathUnreachable {}

/// L-shaped walk: horizontal to the target column, then vertical.
/// Ignores obstacles.
pub fn find_simple_path(start: Cell, end: Cell) -> Path {
    let mut path = vec![start];
    let (mut x, mut y) = (start.x, start.y);

    while x != end.x {
        x = if end.x > x { x + 1 } else { x - 1 };
        path.push(Cell::new(x, y));
    }
    while y != end.y {
        y = if end.y > y { y + 1 } else { y - 1 };
        path.push(Cell::new(x, y));
    }

    path
}

/// Breadth-first shortest path over the 4-connected grid.
///
/// Neighbors are expanded right, left, down, up. With a non-empty
/// `preferred` set, neighbors in it are enqueued first (stable), which
/// steers ties toward cells earlier paths already use without changing
/// the path length. Returns `None` if `end` cannot be reached.
pub fn find_path(
    start: Cell,
    end: Cell,
    cols: usize,
    rows: usize,
    blocked: &HashSet<Cell>,
    preferred: Option<&HashSet<Cell>>,
) -> Option<Path> {
    if start.x >= cols || start.y >= rows || end.x >= cols || end.y >= rows {
        return None;
    }
    if start == end {
        return Some(vec![start]);
    }

    let preferred = preferred.filter(|p| !p.is_empty());

    // Predecessor index per cell; doubles as the visited set. Start points at itself.
    let mut came_from = Grid::<Option<u32>>::new(cols, rows);
    let start_idx = came_from.idx(start.x, start.y);
    came_from.data[start_idx] = Some(start_idx as u32);

    let mut queue = VecDeque::from([start]);
    let mut neighbors: Vec<Cell> = Vec::with_capacity(4);

    while let Some(current) = queue.pop_front() {
        if current == end {
            break;
        }

        neighbors.clear();
        neighbors.extend(
            neighbors4(current, cols, rows)
                .filter(|n| !blocked.contains(n) && came_from.at(*n).is_none()),
        );
        if let Some(pref) = preferred {
            // Stable partition: preferred first, direction order kept in both halves.
            neighbors.sort_by_key(|n| !pref.contains(n));
        }

        let current_idx = came_from.idx(current.x, current.y) as u32;
        for &n in &neighbors {
            came_from.put(n, Some(current_idx));
            queue.push_back(n);
        }
    }

    came_from.at(end)?;
    Some(reconstruct_path(&came_from, end, start_idx))
}

fn reconstruct_path(came_from: &Grid<Option<u32>>, end: Cell, start_idx: usize) -> Path {
    let mut path = Vec::new();
    let mut idx = came_from.idx(end.x, end.y);
    loop {
        path.push(came_from.cell_of(idx));
        if idx == start_idx {
            break;
        }
        match came_from.data[idx] {
            Some(parent) => idx = parent as usize,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Route home to every destination, in order.
///
/// With `avoid_other_destinations`, each search treats every other
/// destination's cell as a wall (home never is). With
/// `prefer_existing_paths`, cells of already routed paths are preferred.
/// The first unreachable destination fails the whole pass.
pub fn route_all(
    home: Cell,
    destinations: &[(&str, Cell)],
    cols: usize,
    rows: usize,
    params: &Params,
) -> Result<Vec<RoutedPath>, PathUnreachable> {
    let mut preferred: HashSet<Cell> = HashSet::new();
    let mut paths = Vec::with_capacity(destinations.len());

    for (i, &(key, end)) in destinations.iter().enumerate() {
        let cells = if params.uses_search() {
            let blocked: HashSet<Cell> = if params.avoid_other_destinations {
                destinations
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &(_, c))| c)
                    .collect()
            } else {
                HashSet::new()
            };
            let pref = params.prefer_existing_paths.then_some(&preferred);
            find_path(home, end, cols, rows, &blocked, pref)
        } else {
            Some(find_simple_path(home, end))
        };

        let Some(cells) = cells else {
            return Err(PathUnreachable {
                destination: key.to_string(),
            });
        };

        if params.prefer_existing_paths {
            preferred.extend(cells.iter().copied());
        }
        paths.push(RoutedPath {
            destination: key.to_string(),
            cells,
        });
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: usize, y: usize) -> Cell {
        Cell::new(x, y)
    }

    fn assert_well_formed(path: &[Cell], start: Cell, end: Cell) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent4(w[1]), "{} -> {}", w[0], w[1]);
        }
        let unique: HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }

    #[test]
    fn start_equals_end_is_a_single_cell() {
        let p = find_path(c(2, 2), c(2, 2), 5, 5, &HashSet::new(), None).unwrap();
        assert_eq!(p, vec![c(2, 2)]);
    }

    #[test]
    fn open_grid_prefers_horizontal_first() {
        // Right is expanded before down, so the tie resolves along the top row.
        let p = find_path(c(0, 0), c(2, 1), 3, 3, &HashSet::new(), None).unwrap();
        assert_eq!(p, vec![c(0, 0), c(1, 0), c(2, 0), c(2, 1)]);
    }

    #[test]
    fn routes_around_blocked_cells() {
        let blocked: HashSet<_> = [c(1, 0), c(1, 1)].into_iter().collect();
        let p = find_path(c(0, 0), c(2, 0), 3, 3, &blocked, None).unwrap();
        assert_eq!(p.len(), 7);
        assert_well_formed(&p, c(0, 0), c(2, 0));
        assert!(p.iter().all(|x| !blocked.contains(x)));
    }

    #[test]
    fn walled_off_target_is_unreachable() {
        let blocked: HashSet<_> = [c(1, 0), c(1, 1), c(1, 2)].into_iter().collect();
        assert_eq!(find_path(c(0, 0), c(2, 2), 3, 3, &blocked, None), None);
        assert_eq!(find_path(c(0, 0), c(5, 0), 3, 3, &HashSet::new(), None), None);
    }

    #[test]
    fn preferred_cells_pick_among_equal_length_paths() {
        let preferred: HashSet<_> = [c(0, 1), c(0, 2), c(1, 2)].into_iter().collect();
        let p = find_path(c(0, 0), c(2, 2), 3, 3, &HashSet::new(), Some(&preferred)).unwrap();
        assert_eq!(p, vec![c(0, 0), c(0, 1), c(0, 2), c(1, 2), c(2, 2)]);

        let plain = find_path(c(0, 0), c(2, 2), 3, 3, &HashSet::new(), None).unwrap();
        assert_eq!(plain.len(), p.len());
        assert_eq!(plain, vec![c(0, 0), c(1, 0), c(2, 0), c(2, 1), c(2, 2)]);
    }

    #[test]
    fn empty_preferred_set_behaves_like_none() {
        let empty = HashSet::new();
        let a = find_path(c(4, 4), c(0, 1), 5, 5, &HashSet::new(), Some(&empty));
        let b = find_path(c(4, 4), c(0, 1), 5, 5, &HashSet::new(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn simple_path_is_l_shaped() {
        let p = find_simple_path(c(3, 0), c(1, 2));
        assert_eq!(p, vec![c(3, 0), c(2, 0), c(1, 0), c(1, 1), c(1, 2)]);
        assert_eq!(find_simple_path(c(1, 1), c(1, 1)), vec![c(1, 1)]);
    }

    #[test]
    fn route_all_avoids_other_destinations() {
        let dests = [("a", c(4, 0)), ("b", c(2, 0))];
        let paths = route_all(c(0, 0), &dests, 5, 5, &Params::default()).unwrap();
        assert_eq!(paths[0].destination, "a");
        assert!(!paths[0].cells.contains(&c(2, 0)));
        assert_well_formed(&paths[0].cells, c(0, 0), c(4, 0));
        assert_well_formed(&paths[1].cells, c(0, 0), c(2, 0));
    }

    #[test]
    fn route_all_reports_first_unreachable_destination() {
        // (1,0) and (0,1) wall home into the corner for the third destination.
        let dests = [("a", c(1, 0)), ("b", c(0, 1)), ("c", c(3, 3))];
        let err = route_all(c(0, 0), &dests, 4, 4, &Params::default()).unwrap_err();
        assert_eq!(err.destination, "c");
    }

    #[test]
    fn route_all_without_heuristics_uses_l_paths() {
        let params = Params {
            avoid_other_destinations: false,
            prefer_existing_paths: false,
            ..Params::default()
        };
        let dests = [("a", c(2, 2)), ("b", c(1, 0))];
        let paths = route_all(c(0, 0), &dests, 3, 3, &params).unwrap();
        assert_eq!(paths[0].cells, find_simple_path(c(0, 0), c(2, 2)));
        // L-path to "a" runs straight through "b" since nothing is blocked.
        assert!(paths[0].cells.contains(&c(1, 0)));
    }
}
