use rayon::prelude::*;

use crate::assemble::{CellKind, Layout};
use crate::pipes::{Dirs, PipeShape};

const BACKGROUND: [u8; 4] = [246, 244, 238, 255];
const GRID_LINE: [u8; 4] = [222, 218, 208, 255];
const HOME: [u8; 4] = [214, 86, 62, 255];
const DESTINATION: [u8; 4] = [52, 96, 150, 255];
const PIPE: [u8; 4] = [60, 60, 64, 255];

/// Raster size in pixels for `cell_px` square cells.
pub fn raster_size(layout: &Layout, cell_px: usize) -> (usize, usize) {
    (layout.cells.w * cell_px.max(1), layout.cells.h * cell_px.max(1))
}

#[inline]
fn pipe_pixel(mask: Dirs, lx: usize, ly: usize, cell_px: usize) -> bool {
    let half = cell_px / 2;
    let th = (cell_px / 6).max(1);
    let in_h = ly + th >= half && ly <= half + th;
    let in_v = lx + th >= half && lx <= half + th;

    (in_h && in_v)
        || (in_h && lx >= half && mask.contains(Dirs::RIGHT))
        || (in_h && lx <= half && mask.contains(Dirs::LEFT))
        || (in_v && ly >= half && mask.contains(Dirs::DOWN))
        || (in_v && ly <= half && mask.contains(Dirs::UP))
}

/// Diagnostic RGBA8 raster: sections as filled squares, pipes as strokes
/// from the cell center toward each connected side.
pub fn render_rgba(layout: &Layout, cell_px: usize) -> Vec<u8> {
    let cell_px = cell_px.max(1);
    let (w, h) = raster_size(layout, cell_px);
    let inset = cell_px / 8;
    let mut rgba = vec![0u8; w * h * 4];

    if w == 0 {
        return rgba;
    }

    rgba.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(py, row)| {
            let cy = py / cell_px;
            let ly = py % cell_px;
            for px in 0..w {
                let cx = px / cell_px;
                let lx = px % cell_px;
                let inside = lx >= inset
                    && ly >= inset
                    && lx + inset < cell_px
                    && ly + inset < cell_px;

                let color = match layout.cells.get(cx, cy) {
                    CellKind::Home if inside => HOME,
                    CellKind::Destination(_) if inside => DESTINATION,
                    CellKind::Pipe(shape) if pipe_pixel(shape.mask(), lx, ly, cell_px) => PIPE,
                    _ if lx == 0 || ly == 0 => GRID_LINE,
                    _ => BACKGROUND,
                };

                row[px * 4..px * 4 + 4].copy_from_slice(&color);
            }
        });

    rgba
}

pub fn pipe_glyph(shape: PipeShape) -> char {
    match shape {
        PipeShape::EndUp => '╵',
        PipeShape::EndRight => '╶',
        PipeShape::EndDown => '╷',
        PipeShape::EndLeft => '╴',
        PipeShape::StraightH => '─',
        PipeShape::StraightV => '│',
        PipeShape::CurveTr => '┌',
        PipeShape::CurveBr => '└',
        PipeShape::CurveTl => '┐',
        PipeShape::CurveBl => '┘',
        PipeShape::TUp => '┴',
        PipeShape::TDown => '┬',
        PipeShape::TLeft => '┤',
        PipeShape::TRight => '├',
        PipeShape::Cross => '┼',
    }
}

/// One line per row: `H` home, `D` destination, box glyphs for pipes, `.` empty.
pub fn render_text(layout: &Layout) -> String {
    let w = layout.cells.w;
    let mut out = String::with_capacity((w + 1) * layout.cells.h * 3);
    for row in layout.cells.data.chunks(w.max(1)) {
        for kind in row {
            out.push(match kind {
                CellKind::Empty => '.',
                CellKind::Home => 'H',
                CellKind::Destination(_) => 'D',
                CellKind::Pipe(shape) => pipe_glyph(*shape),
            });
        }
        out.push('\n');
    }
    out
}
