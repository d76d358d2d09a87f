use crate::geometry::{PanBounds, Size};

const WIDE_MARGIN_X: f64 = 200.0;
const WIDE_MARGIN_Y: f64 = 100.0;
const TIGHT_MARGIN: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub x: f64,
    pub y: f64,
}

impl Margins {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The two margin regimes the pan bounds are derived under: `Wide` for the
/// initial drag setup, `Tight` after any resize or zoom change. The asymmetry
/// is deliberate and load-bearing for how far the grid overshoots its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginPolicy {
    Wide,
    Tight,
}

impl MarginPolicy {
    pub const fn default_margins(self) -> Margins {
        match self {
            Self::Wide => Margins::new(WIDE_MARGIN_X, WIDE_MARGIN_Y),
            Self::Tight => Margins::new(TIGHT_MARGIN, TIGHT_MARGIN),
        }
    }
}

/// Translation bounds for a grid of `grid` size rendered at `scale` inside
/// `window`. Recomputed whole whenever window size or scale changes.
pub fn compute_bounds(grid: Size, window: Size, scale: f64, margins: Margins) -> PanBounds {
    PanBounds::new(
        -(grid.width * scale - window.width) - margins.x,
        margins.x,
        -(grid.height * scale - window.height) - margins.y,
        margins.y,
    )
}
