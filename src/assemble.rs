use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::config::Params;
use crate::grid::{Cell, Grid};
use crate::pipes::{PipeShape, build_connections};
use crate::placement::{self, Placement};
use crate::rng::Rng;
use crate::route::{self, RoutedPath};
use crate::section::Section;
use crate::sizing::GridDimensions;

const SALT_PLACE: u64 = 0x9A1D_0000_CE11_0001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    MissingHome,
    MultipleHomes { count: usize },
    DuplicateSection { key: String },
    AssemblyExhausted { attempts: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHome => f.write_str("section list has no home section"),
            Self::MultipleHomes { count } => {
                write!(f, "section list has {count} home sections, expected one")
            }
            Self::DuplicateSection { key } => write!(f, "duplicate section key '{key}'"),
            Self::AssemblyExhausted { attempts } => {
                write!(f, "no valid layout found in {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// What one grid cell shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellKind {
    #[default]
    Empty,
    Home,
    /// Index into the section list.
    Destination(usize),
    Pipe(PipeShape),
}

/// A consistent placement with every destination routed.
#[derive(Clone, Debug, Serialize)]
pub struct Layout {
    pub dims: GridDimensions,
    pub sections: Vec<Section>,
    pub placement: Placement,
    pub paths: Vec<RoutedPath>,
    pub cells: Grid<CellKind>,
    /// 1-based attempt that succeeded.
    pub attempt: usize,
}

impl Layout {
    pub fn cell_of(&self, key: &str) -> Option<Cell> {
        self.placement
            .iter()
            .find(|p| self.sections[p.section].key == key)
            .map(|p| p.cell)
    }

    pub fn home_cell(&self) -> Option<Cell> {
        self.placement
            .iter()
            .find(|p| self.sections[p.section].is_home)
            .map(|p| p.cell)
    }
}

/// Reject section lists no attempt could satisfy.
pub fn validate_sections(sections: &[Section]) -> Result<(), LayoutError> {
    let homes = sections.iter().filter(|s| s.is_home).count();
    match homes {
        0 => return Err(LayoutError::MissingHome),
        1 => {}
        count => return Err(LayoutError::MultipleHomes { count }),
    }
    let mut seen = HashSet::new();
    for s in sections {
        if !seen.insert(s.key.as_str()) {
            return Err(LayoutError::DuplicateSection { key: s.key.clone() });
        }
    }
    Ok(())
}

/// Place and route until one attempt fully succeeds.
///
/// A failed placement or any unreachable destination discards the whole
/// attempt; the next one re-places every section from scratch. Nothing
/// carries over between attempts except the RNG stream.
pub fn assemble(
    dims: GridDimensions,
    sections: &[Section],
    params: &Params,
    seed: u64,
) -> Result<(Placement, Vec<RoutedPath>, usize), LayoutError> {
    validate_sections(sections)?;

    let (cols, rows) = (dims.cols, dims.rows);
    let mut rng = Rng::new(seed ^ SALT_PLACE);

    for attempt in 1..=params.max_attempts {
        let placement = match placement::place(sections, cols, rows, params, &mut rng) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("attempt {attempt}: {e}");
                continue;
            }
        };

        let mut home = None;
        let mut destinations = Vec::with_capacity(placement.len());
        for p in &placement {
            let s = &sections[p.section];
            if s.is_home {
                home = Some(p.cell);
            } else {
                destinations.push((s.key.as_str(), p.cell));
            }
        }
        let Some(home) = home else {
            return Err(LayoutError::MissingHome);
        };

        match route::route_all(home, &destinations, cols, rows, params) {
            Ok(paths) => {
                log::info!("valid layout on attempt {attempt} ({cols}x{rows})");
                return Ok((placement, paths, attempt));
            }
            Err(e) => log::debug!("attempt {attempt}: {e}"),
        }
    }

    log::warn!(
        "no valid layout for {} sections on {cols}x{rows} after {} attempts",
        sections.len(),
        params.max_attempts
    );
    Err(LayoutError::AssemblyExhausted {
        attempts: params.max_attempts,
    })
}

/// Tag every cell: sections first, then pipe tiles from the merged
/// connection masks. Section cells never show a pipe.
pub fn tag_cells(
    cols: usize,
    rows: usize,
    sections: &[Section],
    placement: &Placement,
    paths: &[RoutedPath],
) -> Grid<CellKind> {
    let connections = build_connections(paths.iter().map(|p| p.cells.as_slice()), cols, rows);

    let mut cells = Grid::<CellKind>::new(cols, rows);
    for (i, mask) in connections.data.iter().enumerate() {
        if let Some(shape) = PipeShape::from_mask(*mask) {
            cells.data[i] = CellKind::Pipe(shape);
        }
    }
    for p in placement {
        let kind = if sections[p.section].is_home {
            CellKind::Home
        } else {
            CellKind::Destination(p.section)
        };
        cells.put(p.cell, kind);
    }
    cells
}
