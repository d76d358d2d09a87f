use super::bounds::{compute_bounds, Margins};
use crate::geometry::{PanBounds, Size};

/// The two discrete zoom levels of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomLevel {
    Near,
    Far,
}

impl ZoomLevel {
    pub const fn scale(self) -> f64 {
        match self {
            Self::Near => 1.0,
            Self::Far => 0.5,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Near => Self::Far,
            Self::Far => Self::Near,
        }
    }

    /// Label for the zoom control; always the completed state.
    pub const fn control_label(self) -> &'static str {
        match self {
            Self::Near => "out",
            Self::Far => "in",
        }
    }
}

/// Binary zoom toggle. The stored level flips synchronously on `toggle`; the
/// scale animation is purely visual and owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomController {
    level: ZoomLevel,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomController {
    pub const fn new() -> Self {
        Self {
            level: ZoomLevel::Near,
        }
    }

    pub const fn level(&self) -> ZoomLevel {
        self.level
    }

    pub const fn scale(&self) -> f64 {
        self.level.scale()
    }

    pub fn toggle(&mut self) -> ZoomLevel {
        self.level = self.level.toggled();
        tracing::debug!(level = ?self.level, scale = self.level.scale(), "zoom toggled");
        self.level
    }

    /// Bounds for the current level; the caller writes these into the shared
    /// transform and the live drag bounds.
    pub fn bounds_for(&self, grid: Size, window: Size, margins: Margins) -> PanBounds {
        compute_bounds(grid, window, self.scale(), margins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::MarginPolicy;

    #[test]
    fn toggle_flips_between_the_two_discrete_scales() {
        let mut zoom = ZoomController::new();
        assert_eq!(zoom.scale(), 1.0);

        assert_eq!(zoom.toggle(), ZoomLevel::Far);
        assert_eq!(zoom.scale(), 0.5);

        assert_eq!(zoom.toggle(), ZoomLevel::Near);
        assert_eq!(zoom.scale(), 1.0);
    }

    #[test]
    fn double_toggle_restores_scale_and_bounds() {
        let mut zoom = ZoomController::new();
        let grid = Size::new(3000.0, 2000.0);
        let window = Size::new(1200.0, 800.0);
        let margins = MarginPolicy::Tight.default_margins();
        let original = zoom.bounds_for(grid, window, margins);

        zoom.toggle();
        let zoomed_out = zoom.bounds_for(grid, window, margins);
        assert_ne!(zoomed_out, original);

        zoom.toggle();
        assert_eq!(zoom.bounds_for(grid, window, margins), original);
    }

    #[test]
    fn control_label_reflects_the_completed_level() {
        let mut zoom = ZoomController::new();
        assert_eq!(zoom.level().control_label(), "out");
        zoom.toggle();
        assert_eq!(zoom.level().control_label(), "in");
    }
}
