use std::fmt;

use serde::Serialize;

use crate::config::Params;
use crate::grid::{Cell, Grid, diagonals, neighbors4};
use crate::rng::Rng;
use crate::section::Section;

/// A section index and the cell it landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Placed {
    pub section: usize,
    pub cell: Cell,
}

/// Section cells in input order.
pub type Placement = Vec<Placed>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementExhausted {
    pub section: String,
}

impl fmt::Display for PlacementExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no free cell for section '{}' within budget", self.section)
    }
}

impl std::error::Error for PlacementExhausted {}

/// Mark `c` taken, and its neighborhood too when adjacency blocking is on.
fn mark_forbidden_around(used: &mut Grid<bool>, c: Cell, params: &Params) {
    used.put(c, true);
    if !params.block_adjacent_sections {
        return;
    }
    for n in neighbors4(c, used.w, used.h) {
        used.put(n, true);
    }
    if params.block_diagonal_adjacency {
        for n in diagonals(c, used.w, used.h) {
            used.put(n, true);
        }
    }
}

/// Uniformly sample cells until one is free. `None` after `budget` tries.
fn sample_free(used: &Grid<bool>, budget: usize, rng: &mut Rng) -> Option<Cell> {
    if used.data.is_empty() {
        return None;
    }
    (0..budget)
        .map(|_| Cell::new(rng.range_usize(used.w), rng.range_usize(used.h)))
        .find(|c| !used.at(*c))
}

/// Place `sections` in input order on a `cols x rows` grid.
///
/// Earlier sections constrain later ones; there is no backtracking. The
/// first section that exhausts `params.placement_budget` fails the whole
/// placement.
pub fn place(
    sections: &[Section],
    cols: usize,
    rows: usize,
    params: &Params,
    rng: &mut Rng,
) -> Result<Placement, PlacementExhausted> {
    let mut used = Grid::<bool>::new(cols, rows);
    let mut placement = Vec::with_capacity(sections.len());

    for (section, s) in sections.iter().enumerate() {
        let cell = sample_free(&used, params.placement_budget, rng).ok_or_else(|| {
            PlacementExhausted {
                section: s.key.clone(),
            }
        })?;
        mark_forbidden_around(&mut used, cell, params);
        placement.push(Placed { section, cell });
    }

    Ok(placement)
}
