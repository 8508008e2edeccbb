use serde::{Serialize, Serializer};

use crate::grid::{Cell, Grid};

bitflags::bitflags! {
    /// Directions a path leaves or enters a cell by.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Dirs: u8 {
        const UP = 1;
        const RIGHT = 2;
        const DOWN = 4;
        const LEFT = 8;
    }
}

/// Pipe tile for a connection mask. Fifteen shapes, one per non-empty mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipeShape {
    EndUp,
    EndRight,
    EndDown,
    EndLeft,
    StraightH,
    StraightV,
    /// right + down
    CurveTr,
    /// up + right
    CurveBr,
    /// left + down
    CurveTl,
    /// up + left
    CurveBl,
    /// all but down
    TUp,
    /// all but up
    TDown,
    /// all but right
    TLeft,
    /// all but left
    TRight,
    Cross,
}

impl PipeShape {
    pub const ALL: [PipeShape; 15] = [
        Self::EndUp,
        Self::EndRight,
        Self::EndDown,
        Self::EndLeft,
        Self::StraightH,
        Self::StraightV,
        Self::CurveTr,
        Self::CurveBr,
        Self::CurveTl,
        Self::CurveBl,
        Self::TUp,
        Self::TDown,
        Self::TLeft,
        Self::TRight,
        Self::Cross,
    ];

    pub fn from_mask(mask: Dirs) -> Option<Self> {
        const U: u8 = Dirs::UP.bits();
        const R: u8 = Dirs::RIGHT.bits();
        const D: u8 = Dirs::DOWN.bits();
        const L: u8 = Dirs::LEFT.bits();

        let shape = match mask.bits() {
            U => Self::EndUp,
            R => Self::EndRight,
            D => Self::EndDown,
            L => Self::EndLeft,
            m if m == L | R => Self::StraightH,
            m if m == U | D => Self::StraightV,
            m if m == R | D => Self::CurveTr,
            m if m == U | R => Self::CurveBr,
            m if m == L | D => Self::CurveTl,
            m if m == U | L => Self::CurveBl,
            m if m == U | L | R => Self::TUp,
            m if m == D | L | R => Self::TDown,
            m if m == U | D | L => Self::TLeft,
            m if m == U | D | R => Self::TRight,
            m if m == U | R | D | L => Self::Cross,
            _ => return None,
        };
        Some(shape)
    }

    pub fn mask(self) -> Dirs {
        match self {
            Self::EndUp => Dirs::UP,
            Self::EndRight => Dirs::RIGHT,
            Self::EndDown => Dirs::DOWN,
            Self::EndLeft => Dirs::LEFT,
            Self::StraightH => Dirs::LEFT | Dirs::RIGHT,
            Self::StraightV => Dirs::UP | Dirs::DOWN,
            Self::CurveTr => Dirs::RIGHT | Dirs::DOWN,
            Self::CurveBr => Dirs::UP | Dirs::RIGHT,
            Self::CurveTl => Dirs::LEFT | Dirs::DOWN,
            Self::CurveBl => Dirs::UP | Dirs::LEFT,
            Self::TUp => Dirs::UP | Dirs::LEFT | Dirs::RIGHT,
            Self::TDown => Dirs::DOWN | Dirs::LEFT | Dirs::RIGHT,
            Self::TLeft => Dirs::UP | Dirs::DOWN | Dirs::LEFT,
            Self::TRight => Dirs::UP | Dirs::DOWN | Dirs::RIGHT,
            Self::Cross => Dirs::all(),
        }
    }

    /// Stylesheet class of the tile.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::EndUp => "pipe-end-up",
            Self::EndRight => "pipe-end-right",
            Self::EndDown => "pipe-end-down",
            Self::EndLeft => "pipe-end-left",
            Self::StraightH => "pipe-straight-h",
            Self::StraightV => "pipe-straight-v",
            Self::CurveTr => "pipe-curve-tr",
            Self::CurveBr => "pipe-curve-br",
            Self::CurveTl => "pipe-curve-tl",
            Self::CurveBl => "pipe-curve-bl",
            Self::TUp => "pipe-t-up",
            Self::TDown => "pipe-t-down",
            Self::TLeft => "pipe-t-left",
            Self::TRight => "pipe-t-right",
            Self::Cross => "pipe-cross",
        }
    }
}

impl Serialize for PipeShape {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.class_name())
    }
}

/// Direction of a single 4-adjacent step `from -> to`, or `None` if the
/// cells are equal.
fn step_dir(from: Cell, to: Cell) -> Option<Dirs> {
    if to.x > from.x {
        Some(Dirs::RIGHT)
    } else if to.x < from.x {
        Some(Dirs::LEFT)
    } else if to.y > from.y {
        Some(Dirs::DOWN)
    } else if to.y < from.y {
        Some(Dirs::UP)
    } else {
        None
    }
}

fn opposite(d: Dirs) -> Dirs {
    let mut out = Dirs::empty();
    for (a, b) in [
        (Dirs::UP, Dirs::DOWN),
        (Dirs::DOWN, Dirs::UP),
        (Dirs::LEFT, Dirs::RIGHT),
        (Dirs::RIGHT, Dirs::LEFT),
    ] {
        if d.contains(a) {
            out |= b;
        }
    }
    out
}

/// OR every path's step directions into one mask per cell.
///
/// Each step sets its outgoing bit on the source cell and the opposite
/// bit on the target. Paths shorter than two cells contribute nothing.
pub fn build_connections<'a, I>(paths: I, cols: usize, rows: usize) -> Grid<Dirs>
where
    I: IntoIterator<Item = &'a [Cell]>,
{
    let mut connections = Grid::<Dirs>::new(cols, rows);

    for path in paths {
        for w in path.windows(2) {
            let (curr, next) = (w[0], w[1]);
            let Some(dir) = step_dir(curr, next) else {
                continue;
            };
            connections.put(curr, connections.at(curr) | dir);
            connections.put(next, connections.at(next) | opposite(dir));
        }
    }

    connections
}
