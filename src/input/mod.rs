//! Pan input aggregation: drag-gesture reports and wheel deltas funnel into
//! one bounded translation update on the shared viewport transform.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::animation::{AnimationEngine, Ease, Property, PropertyValue, Tween};
use crate::dragging::SharedBounds;
use crate::geometry::{PanBounds, Point, Size};
use crate::scene::{ElementId, SceneGraph, SceneResult};
use crate::viewport::{compute_bounds, Margins, ViewportTransform};

pub const DRAGGING_CLASS: &str = "--is-dragging";

/// Result of a wheel event. `default_prevented` tells the host to suppress
/// native scrolling for the event this came from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct WheelResponse {
    pub target: Point,
    pub default_prevented: bool,
}

pub struct PanAggregator {
    transform: Rc<RefCell<ViewportTransform>>,
    engine: Rc<dyn AnimationEngine>,
    scene: Rc<dyn SceneGraph>,
    grid: ElementId,
    live_bounds: SharedBounds,
    dragging: Cell<bool>,
    wheel_factor: f64,
    wheel_tween: Tween,
    tight_margins: Margins,
}

impl PanAggregator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transform: Rc<RefCell<ViewportTransform>>,
        engine: Rc<dyn AnimationEngine>,
        scene: Rc<dyn SceneGraph>,
        grid: ElementId,
        live_bounds: SharedBounds,
        wheel_factor: f64,
        wheel_duration_s: f64,
        tight_margins: Margins,
    ) -> Self {
        Self {
            transform,
            engine,
            scene,
            grid,
            live_bounds,
            dragging: Cell::new(false),
            wheel_factor,
            wheel_tween: Tween::new(wheel_duration_s, Ease::Out),
            tight_margins,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    /// Invert and amplify the native wheel delta, clamp against the current
    /// bounds, then tween to the clamped target so wheel input keeps the same
    /// kinetic feel as a drag release.
    pub fn on_wheel(&self, delta: Point) -> WheelResponse {
        let target = {
            let mut transform = self.transform.borrow_mut();
            let current = transform.translation();
            let requested = Point::new(
                current.x - delta.x * self.wheel_factor,
                current.y - delta.y * self.wheel_factor,
            );
            transform.settle(requested)
        };

        let _ = self.engine.animate(
            self.grid,
            vec![
                (Property::X, PropertyValue::Px(target.x)),
                (Property::Y, PropertyValue::Px(target.y)),
            ],
            self.wheel_tween,
        );

        WheelResponse {
            target,
            default_prevented: true,
        }
    }

    pub fn drag_started(&self) -> SceneResult<()> {
        self.dragging.set(true);
        self.scene.add_class(self.grid, DRAGGING_CLASS)
    }

    pub fn drag_ended(&self) -> SceneResult<()> {
        self.dragging.set(false);
        self.scene.remove_class(self.grid, DRAGGING_CLASS)
    }

    /// Continuous position report from the drag primitive, already bounded
    /// and edge-resisted there; mirror it into the shared transform.
    pub fn drag_position(&self, position: Point) {
        self.transform.borrow_mut().set_translation(position);
    }

    /// Recompute tight-policy bounds for the current scale and write them
    /// into both the shared transform and the drag primitive's live bounds,
    /// so no input path can observe a stale range.
    pub fn refresh_bounds(&self, grid: Size, window: Size) -> PanBounds {
        let bounds = {
            let mut transform = self.transform.borrow_mut();
            let bounds = compute_bounds(grid, window, transform.scale(), self.tight_margins);
            transform.set_bounds(bounds);
            bounds
        };
        *self.live_bounds.borrow_mut() = bounds;
        tracing::debug!(?bounds, "pan bounds refreshed");
        bounds
    }
}
