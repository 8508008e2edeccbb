use serde::Serialize;

use crate::config::{Params, SizingPolicy};

/// Discrete grid fitted to a container. Cell sizes are whole pixels so
/// adjacent tiles meet without seams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GridDimensions {
    pub cols: usize,
    pub rows: usize,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridDimensions {
    pub fn pixel_width(&self) -> u64 {
        (self.cols as u64).saturating_mul(self.cell_width as u64)
    }

    pub fn pixel_height(&self) -> u64 {
        (self.rows as u64).saturating_mul(self.cell_height as u64)
    }
}

/// Fit a grid to `width x height` pixels using `params.sizing`.
pub fn size(width: f64, height: f64, is_mobile: bool, params: &Params) -> GridDimensions {
    let n = params.cells_per_axis(is_mobile);
    match params.sizing {
        SizingPolicy::MaxDimension => size_max_dimension(width, height, n),
        SizingPolicy::EqualAxis => size_equal_axis(width, height, n),
    }
}

/// `n x n` grid; each axis divides its own length.
pub fn size_equal_axis(width: f64, height: f64, n: usize) -> GridDimensions {
    let n = n.max(1);
    GridDimensions {
        cols: n,
        rows: n,
        cell_width: floor_px(width / n as f64),
        cell_height: floor_px(height / n as f64),
    }
}

/// Longer axis gets `n` cells; the shorter axis fits as many square cells
/// as it can, clamped to `[1, n]`. A square container counts as portrait.
pub fn size_max_dimension(width: f64, height: f64, n: usize) -> GridDimensions {
    let n = n.max(1);
    let max_dim = width.max(height);
    let min_dim = width.min(height);
    let cell = floor_px(max_dim / n as f64);
    let cells_in_min = ((min_dim / cell as f64).floor().max(0.0) as usize).clamp(1, n);
    let (cols, rows) = if width > height {
        (n, cells_in_min)
    } else {
        (cells_in_min, n)
    };
    GridDimensions {
        cols,
        rows,
        cell_width: cell,
        cell_height: cell,
    }
}

#[inline]
fn floor_px(v: f64) -> u32 {
    if v.is_finite() { v.floor().max(1.0) as u32 } else { 1 }
}
