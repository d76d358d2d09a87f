//! Root controller: owns the viewport transform, wires the injected
//! collaborators together and sequences startup before any input is live.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::animation::{
    AnimationEngine, Ease, Property, PropertyValue, StaggerOrder, StaggerSpec, Tween,
};
use crate::config::AppConfig;
use crate::detail::{DetailStage, DetailTransitionEngine, TransitionOutcome};
use crate::dragging::{DragAxis, DragBackend, DragConfig, DragHandle, DragHooks, SharedBounds};
use crate::error::AppResult;
use crate::flip::FlipEngine;
use crate::geometry::{PanBounds, Point, Size};
use crate::input::{PanAggregator, WheelResponse};
use crate::observer::VisibilityObserver;
use crate::preload::ImagePreloader;
use crate::product::{DetailContentMap, ProductCatalog};
use crate::scene::{ElementId, SceneGraph};
use crate::viewport::{compute_bounds, MarginPolicy, ViewportTransform, ZoomController, ZoomLevel};

/// Set on the stage container once the entrance sequence has finished.
pub const LOADED_CLASS: &str = "--is-loaded";
/// Selector handed to the image preloader at startup.
pub const GRID_IMAGE_SELECTOR: &str = "img";

/// External collaborators, all injected so hosts and tests decide the
/// concrete engines.
pub struct Collaborators {
    pub scene: Rc<dyn SceneGraph>,
    pub engine: Rc<dyn AnimationEngine>,
    pub flip: Rc<dyn FlipEngine>,
    pub drag: Rc<dyn DragBackend>,
    pub observer: Rc<dyn VisibilityObserver>,
    pub preloader: Rc<dyn ImagePreloader>,
}

/// Fixed stage elements resolved from the host tree once at startup.
#[derive(Debug, Clone, Copy)]
pub struct StageElements {
    pub container: ElementId,
    pub grid: ElementId,
    pub panel: ElementId,
    pub thumb_slot: ElementId,
    pub action: ElementId,
    pub follower: ElementId,
}

pub struct GridController {
    scene: Rc<dyn SceneGraph>,
    engine: Rc<dyn AnimationEngine>,
    drag: Rc<dyn DragBackend>,
    observer: Rc<dyn VisibilityObserver>,
    preloader: Rc<dyn ImagePreloader>,
    stage: StageElements,
    config: AppConfig,
    transform: Rc<RefCell<ViewportTransform>>,
    live_bounds: SharedBounds,
    pan: PanAggregator,
    zoom: RefCell<ZoomController>,
    detail: DetailTransitionEngine,
    window: Cell<Size>,
    active: Cell<bool>,
    drag_handle: RefCell<Option<DragHandle>>,
}

impl GridController {
    pub fn new(
        collaborators: Collaborators,
        stage: StageElements,
        catalog: ProductCatalog,
        content: DetailContentMap,
        config: AppConfig,
        window: Size,
    ) -> Rc<Self> {
        let Collaborators {
            scene,
            engine,
            flip,
            drag,
            observer,
            preloader,
        } = collaborators;

        let transform = Rc::new(RefCell::new(ViewportTransform::new()));
        let live_bounds: SharedBounds = Rc::new(RefCell::new(PanBounds::default()));

        let pan = PanAggregator::new(
            Rc::clone(&transform),
            Rc::clone(&engine),
            Rc::clone(&scene),
            stage.grid,
            Rc::clone(&live_bounds),
            config.motion.wheel_factor,
            config.motion.wheel_duration_s,
            config.interaction.margins(MarginPolicy::Tight),
        );

        let detail = DetailTransitionEngine::new(
            Rc::clone(&scene),
            Rc::clone(&engine),
            flip,
            Rc::clone(&observer),
            DetailStage {
                container: stage.container,
                panel: stage.panel,
                thumb_slot: stage.thumb_slot,
                action: stage.action,
                follower: stage.follower,
            },
            catalog,
            content,
            config.motion,
        );

        Rc::new(Self {
            scene,
            engine,
            drag,
            observer,
            preloader,
            stage,
            config,
            transform,
            live_bounds,
            pan,
            zoom: RefCell::new(ZoomController::new()),
            detail,
            window: Cell::new(window),
            active: Cell::new(false),
            drag_handle: RefCell::new(None),
        })
    }

    /// Center the grid, preload the images, run the entrance sequence and
    /// only then go live. Interaction arriving before activation is ignored.
    pub fn init(self: &Rc<Self>) {
        self.center_grid();
        let controller = Rc::clone(self);
        self.preloader
            .preload(GRID_IMAGE_SELECTOR)
            .then(move || controller.run_intro());
    }

    /// Place the grid so it is centered in the window, before any bounds
    /// exist to clamp against.
    pub fn center_grid(&self) -> Point {
        let centered = self
            .transform
            .borrow_mut()
            .center_in(self.grid_size(), self.window.get());
        self.engine.set_immediate(
            self.stage.grid,
            vec![
                (Property::X, PropertyValue::Px(centered.x)),
                (Property::Y, PropertyValue::Px(centered.y)),
            ],
        );
        centered
    }

    fn run_intro(self: &Rc<Self>) {
        let products = self.detail.catalog().elements();
        tracing::debug!(products = products.len(), "entrance sequence started");

        self.engine.set_immediate(
            self.stage.container,
            vec![(Property::Scale, PropertyValue::Scale(0.5))],
        );
        for product in &products {
            self.engine.set_immediate(
                *product,
                vec![
                    (Property::Scale, PropertyValue::Scale(0.5)),
                    (Property::Opacity, PropertyValue::Opacity(0.0)),
                ],
            );
        }

        let items_done = self.engine.animate_staggered(
            &products,
            vec![
                (Property::Scale, PropertyValue::Scale(1.0)),
                (Property::Opacity, PropertyValue::Opacity(1.0)),
            ],
            Tween::new(self.config.motion.intro_item_duration_s, Ease::Out),
            StaggerSpec {
                amount_s: self.config.motion.intro_stagger_s,
                order: StaggerOrder::Random,
            },
        );
        let container_done = self.engine.animate(
            self.stage.container,
            vec![(Property::Scale, PropertyValue::Scale(1.0))],
            Tween::new(self.config.motion.intro_container_duration_s, Ease::InOut),
        );

        // Go live once both the item stagger and the container scale are done,
        // whichever finishes last.
        let controller = Rc::clone(self);
        items_done.then(move || {
            container_done.then(move || controller.activate());
        });
    }

    fn activate(self: &Rc<Self>) {
        if let Err(err) = self.scene.add_class(self.stage.container, LOADED_CLASS) {
            tracing::error!(%err, "failed to mark the stage as loaded");
        }

        // Initial drag setup uses the wide margin policy; every later
        // recomputation (resize, zoom) is tight.
        let bounds = {
            let mut transform = self.transform.borrow_mut();
            let bounds = compute_bounds(
                self.grid_size(),
                self.window.get(),
                transform.scale(),
                self.config.interaction.margins(MarginPolicy::Wide),
            );
            transform.set_bounds(bounds);
            bounds
        };
        *self.live_bounds.borrow_mut() = bounds;

        let handle = self.drag.create_draggable(
            self.stage.grid,
            DragConfig {
                axis: DragAxis::Both,
                bounds: Rc::clone(&self.live_bounds),
                inertia: self.config.interaction.inertia,
                edge_resistance: self.config.interaction.edge_resistance,
            },
            self.drag_hooks(),
        );
        *self.drag_handle.borrow_mut() = Some(handle);

        for product in self.detail.catalog().elements() {
            self.observer.observe(product);
        }

        self.active.set(true);
        tracing::info!(
            products = self.detail.catalog().len(),
            ?bounds,
            "grid interaction activated"
        );
    }

    fn drag_hooks(self: &Rc<Self>) -> DragHooks {
        let on_start = Rc::downgrade(self);
        let on_end = Rc::downgrade(self);
        let on_position = Rc::downgrade(self);
        DragHooks {
            on_drag_start: Box::new(move || {
                if let Some(controller) = on_start.upgrade() {
                    if let Err(err) = controller.pan.drag_started() {
                        tracing::error!(%err, "drag start bookkeeping failed");
                    }
                }
            }),
            on_drag_end: Box::new(move || {
                if let Some(controller) = on_end.upgrade() {
                    if let Err(err) = controller.pan.drag_ended() {
                        tracing::error!(%err, "drag end bookkeeping failed");
                    }
                }
            }),
            on_position: Box::new(move |point| {
                if let Some(controller) = on_position.upgrade() {
                    controller.pan.drag_position(point);
                }
            }),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn viewport(&self) -> ViewportTransform {
        *self.transform.borrow()
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.zoom.borrow().level()
    }

    pub fn detail(&self) -> &DetailTransitionEngine {
        &self.detail
    }

    pub fn drag_bounds(&self) -> PanBounds {
        *self.live_bounds.borrow()
    }

    /// Wheel input pans the grid; `None` means the event was not consumed
    /// and native scrolling may proceed.
    pub fn on_wheel(&self, delta: Point) -> Option<WheelResponse> {
        if !self.active.get() || self.detail.state().detail_engaged() {
            return None;
        }
        Some(self.pan.on_wheel(delta))
    }

    /// Window resizes recompute bounds wholesale with the tight policy.
    pub fn on_resize(&self, window: Size) {
        self.window.set(window);
        if !self.active.get() {
            return;
        }
        let _ = self.pan.refresh_bounds(self.grid_size(), window);
    }

    /// A click on a product thumbnail. Clicks that land while a drag is in
    /// progress are the tail of the gesture, not a selection.
    pub fn on_product_click(&self, product: ElementId) -> AppResult<TransitionOutcome> {
        if !self.active.get() || self.pan.is_dragging() {
            return Ok(TransitionOutcome::Ignored);
        }
        Ok(self.detail.open(product)?)
    }

    /// A close request from the panel's dismiss affordances.
    pub fn on_close_requested(&self) -> AppResult<TransitionOutcome> {
        if !self.active.get() {
            return Ok(TransitionOutcome::Ignored);
        }
        Ok(self.detail.close()?)
    }

    /// Toggle the discrete zoom level. The stored level and the bounds flip
    /// synchronously; only the scale interpolation is asynchronous, so the
    /// control's label always reflects the completed state.
    pub fn on_zoom_toggle(&self) -> ZoomLevel {
        if !self.active.get() || self.detail.state().detail_engaged() {
            return self.zoom.borrow().level();
        }
        let level = self.zoom.borrow_mut().toggle();
        self.transform.borrow_mut().set_scale(level.scale());
        let _ = self.engine.animate(
            self.stage.grid,
            vec![(Property::Scale, PropertyValue::Scale(level.scale()))],
            Tween::new(self.config.motion.zoom_duration_s, Ease::InOut),
        );
        let _ = self.pan.refresh_bounds(self.grid_size(), self.window.get());
        level
    }

    fn grid_size(&self) -> Size {
        match self.scene.rect_of(self.stage.grid) {
            Ok(rect) => rect.size(),
            Err(err) => {
                tracing::error!(%err, "grid measurement failed");
                Size::default()
            }
        }
    }
}
