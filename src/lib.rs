pub mod assemble;
pub mod config;
pub mod grid;
pub mod pipes;
pub mod placement;
pub mod render;
pub mod rng;
pub mod route;
pub mod section;
pub mod sizing;

use std::time::Instant;

use assemble::{Layout, LayoutError};
use config::Params;
use section::Section;

#[derive(Debug)]
pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Container size in CSS pixels plus the device class.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub is_mobile: bool,
}

/// Run the whole pipeline for one viewport. Every call starts from fresh
/// working sets; only `seed` ties two runs together.
pub fn generate(
    seed: u64,
    viewport: Viewport,
    sections: &[Section],
    params: &Params,
) -> Result<(Layout, Vec<Timing>), LayoutError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Fit the grid to the container
    let t = Instant::now();
    let dims = sizing::size(viewport.width, viewport.height, viewport.is_mobile, params);
    timings.push(Timing {
        name: "sizing",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });
    log::debug!(
        "grid {}x{} cells of {}x{} px",
        dims.cols,
        dims.rows,
        dims.cell_width,
        dims.cell_height
    );

    // 2. Place sections and route every destination (retried as a unit)
    let t = Instant::now();
    let (placement, paths, attempt) = assemble::assemble(dims, sections, params, seed)?;
    timings.push(Timing {
        name: "place_and_route",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 3. Merge paths into pipe tiles
    let t = Instant::now();
    let cells = assemble::tag_cells(dims.cols, dims.rows, sections, &placement, &paths);
    timings.push(Timing {
        name: "pipes",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    let layout = Layout {
        dims,
        sections: sections.to_vec(),
        placement,
        paths,
        cells,
        attempt,
    };

    Ok((layout, timings))
}
