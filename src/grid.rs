use std::fmt;

use serde::Serialize;

/// Integer grid coordinate. Equality is structural.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// True if `other` shares an edge with this cell.
    pub fn is_adjacent4(&self, other: Cell) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }

    /// True if `other` touches this cell by edge or corner.
    pub fn is_adjacent8(&self, other: Cell) -> bool {
        *self != other && self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Row-major flat grid. No per-cell objects.
#[derive(Clone, Debug, Serialize)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn at(&self, c: Cell) -> T {
        self.get(c.x, c.y)
    }

    #[inline]
    pub fn put(&mut self, c: Cell, v: T) {
        self.set(c.x, c.y, v);
    }

    #[inline]
    pub fn cell_of(&self, i: usize) -> Cell {
        Cell::new(i % self.w, i / self.w)
    }
}

#[inline]
pub fn in_bounds(x: i64, y: i64, w: usize, h: usize) -> bool {
    x >= 0 && y >= 0 && x < w as i64 && y < h as i64
}

/// Right, left, down, up. Order decides which of several equally short
/// paths BFS returns.
pub const DIRS4: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const DIAGONALS: [(i64, i64); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn offset_cells<const N: usize>(
    c: Cell,
    offsets: [(i64, i64); N],
    w: usize,
    h: usize,
) -> impl Iterator<Item = Cell> {
    let mut out = [Cell::default(); N];
    let mut n = 0;
    for (dx, dy) in offsets {
        let nx = c.x as i64 + dx;
        let ny = c.y as i64 + dy;
        if in_bounds(nx, ny, w, h) {
            out[n] = Cell::new(nx as usize, ny as usize);
            n += 1;
        }
    }
    out.into_iter().take(n)
}

/// In-bounds 4-connected neighbors in `DIRS4` order. No wrapping.
pub fn neighbors4(c: Cell, w: usize, h: usize) -> impl Iterator<Item = Cell> {
    offset_cells(c, DIRS4, w, h)
}

/// In-bounds diagonal neighbors.
pub fn diagonals(c: Cell, w: usize, h: usize) -> impl Iterator<Item = Cell> {
    offset_cells(c, DIAGONALS, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_x_comma_y() {
        assert_eq!(Cell::new(3, 7).to_string(), "3,7");
    }

    #[test]
    fn neighbors4_follow_right_left_down_up() {
        let got: Vec<_> = neighbors4(Cell::new(1, 1), 3, 3).collect();
        assert_eq!(
            got,
            vec![Cell::new(2, 1), Cell::new(0, 1), Cell::new(1, 2), Cell::new(1, 0)]
        );
    }

    #[test]
    fn neighbors_are_clipped_at_corners() {
        let got: Vec<_> = neighbors4(Cell::new(0, 0), 2, 2).collect();
        assert_eq!(got, vec![Cell::new(1, 0), Cell::new(0, 1)]);
        let diag: Vec<_> = diagonals(Cell::new(0, 0), 2, 2).collect();
        assert_eq!(diag, vec![Cell::new(1, 1)]);
        assert_eq!(neighbors4(Cell::new(0, 0), 1, 1).count(), 0);
    }

    #[test]
    fn adjacency_predicates() {
        let c = Cell::new(2, 2);
        assert!(c.is_adjacent4(Cell::new(2, 3)));
        assert!(!c.is_adjacent4(Cell::new(3, 3)));
        assert!(c.is_adjacent8(Cell::new(3, 3)));
        assert!(!c.is_adjacent8(c));
        assert!(!c.is_adjacent8(Cell::new(4, 2)));
    }
}
