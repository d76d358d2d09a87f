//! Pointer-drag capture seam. The physics (inertia, edge resistance) live in
//! the host primitive; this crate configures it, shares a live bounds object
//! with it, and consumes its start/end/position reports.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{PanBounds, Point};
use crate::scene::ElementId;

/// Bounds object shared between the controller and the drag primitive.
/// Resize and zoom write through it so an in-progress or future drag
/// immediately respects new limits.
pub type SharedBounds = Rc<RefCell<PanBounds>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAxis {
    X,
    Y,
    Both,
}

#[derive(Clone)]
pub struct DragConfig {
    pub axis: DragAxis,
    pub bounds: SharedBounds,
    pub inertia: bool,
    pub edge_resistance: f64,
}

/// Callbacks the primitive fires back into the controller.
pub struct DragHooks {
    pub on_drag_start: Box<dyn Fn()>,
    pub on_drag_end: Box<dyn Fn()>,
    /// Continuous position reports, already bounded by the primitive.
    pub on_position: Box<dyn Fn(Point)>,
}

/// Handle to one created draggable; keeps the live bounds reachable.
pub struct DragHandle {
    bounds: SharedBounds,
}

impl DragHandle {
    pub fn new(bounds: SharedBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> PanBounds {
        *self.bounds.borrow()
    }

    pub fn set_bounds(&self, bounds: PanBounds) {
        *self.bounds.borrow_mut() = bounds;
    }

    pub fn shared_bounds(&self) -> SharedBounds {
        Rc::clone(&self.bounds)
    }
}

pub trait DragBackend {
    fn create_draggable(
        &self,
        target: ElementId,
        config: DragConfig,
        hooks: DragHooks,
    ) -> DragHandle;
}

struct ManualSession {
    config: DragConfig,
    hooks: DragHooks,
}

/// Scriptable [`DragBackend`] for tests and headless hosts: gestures are
/// driven explicitly and position reports are clamped against whatever the
/// shared bounds hold at report time.
#[derive(Default)]
pub struct ManualDrag {
    sessions: RefCell<Vec<ManualSession>>,
}

impl ManualDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.borrow().len()
    }

    pub fn begin_drag(&self) {
        if let Some(session) = self.sessions.borrow().last() {
            (session.hooks.on_drag_start)();
        }
    }

    /// Report a pointer position for the most recent draggable.
    pub fn drag_to(&self, requested: Point) {
        let sessions = self.sessions.borrow();
        if let Some(session) = sessions.last() {
            let bounded = session.config.bounds.borrow().clamp(requested);
            (session.hooks.on_position)(bounded);
        }
    }

    pub fn end_drag(&self) {
        if let Some(session) = self.sessions.borrow().last() {
            (session.hooks.on_drag_end)();
        }
    }
}

impl DragBackend for ManualDrag {
    fn create_draggable(
        &self,
        target: ElementId,
        config: DragConfig,
        hooks: DragHooks,
    ) -> DragHandle {
        tracing::debug!(target = target.raw(), axis = ?config.axis, "draggable created");
        let handle = DragHandle::new(Rc::clone(&config.bounds));
        self.sessions.borrow_mut().push(ManualSession { config, hooks });
        handle
    }
}
