//! Shared viewport transform: the grid's translation/scale and the bounds all
//! pan inputs clamp against.

pub mod bounds;
pub mod zoom;

use crate::geometry::{PanBounds, Point, Size};

pub use bounds::{compute_bounds, MarginPolicy, Margins};
pub use zoom::{ZoomController, ZoomLevel};

/// Owned exclusively by the root controller; mutated only through the pan
/// aggregator and the zoom path so every input source observes one truth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    translation: Point,
    scale: f64,
    bounds: PanBounds,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportTransform {
    pub const fn new() -> Self {
        Self {
            translation: Point::ZERO,
            scale: 1.0,
            bounds: PanBounds::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    pub const fn translation(&self) -> Point {
        self.translation
    }

    pub const fn scale(&self) -> f64 {
        self.scale
    }

    pub const fn bounds(&self) -> PanBounds {
        self.bounds
    }

    /// Raw translation write used while an external drag owns the position;
    /// the drag primitive has already applied bounds and edge resistance.
    pub fn set_translation(&mut self, translation: Point) {
        self.translation = translation;
    }

    /// Clamp `requested` against the current bounds and adopt the result.
    pub fn settle(&mut self, requested: Point) -> Point {
        let settled = self.bounds.clamp(requested);
        self.translation = settled;
        settled
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Bounds are replaced wholesale, never adjusted incrementally.
    pub fn set_bounds(&mut self, bounds: PanBounds) {
        self.bounds = bounds;
    }

    /// Translation that centers a grid of `grid` size inside `window`.
    pub fn center_in(&mut self, grid: Size, window: Size) -> Point {
        self.translation = Point::new(
            (window.width - grid.width) / 2.0,
            (window.height - grid.height) / 2.0,
        );
        self.translation
    }
}
