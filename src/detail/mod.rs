//! Detail transition engine: the state machine that morphs a grid thumbnail
//! into the detail panel and back.
//!
//! The open transition hands a product element from its grid parent to the
//! panel's thumbnail slot with a FLIP; the close transition replays it in
//! reverse. Both read and write geometry relative to the panel container's
//! own box during the reverse leg, because the product is still a descendant
//! of that container when the absolute positioning is applied.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::animation::{AnimationEngine, Ease, Property, PropertyValue, Tween};
use crate::config::MotionConfig;
use crate::flip::{FlipEngine, FlipSequence, ReplayOptions};
use crate::observer::VisibilityObserver;
use crate::product::{DetailContentMap, ProductCatalog, ProductError, ProductKey};
use crate::scene::{ElementId, SceneError, SceneGraph};
use crate::state::{GridEvent, GridState, StateError, StateMachine};

/// Set on the detail panel while it is engaged.
pub const SHOWING_CLASS: &str = "showing";
/// Set on the grid container while a detail view is open.
pub const DETAILS_OPEN_CLASS: &str = "details-open";

pub type DetailResult<T> = std::result::Result<T, DetailError>;

#[derive(Debug, Error)]
pub enum DetailError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("element {0:?} is not a catalogued product")]
    UnknownProduct(ElementId),
    #[error("no product registered for key {0:?}")]
    UnknownKey(String),
    #[error("detail session missing while {0:?}")]
    SessionMissing(GridState),
}

/// Whether a requested transition actually started. Requests rejected by the
/// state-machine guard are reported, not errors: overlapping gestures are an
/// expected input pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Started,
    Ignored,
}

/// Bookkeeping for the one product currently in (or between) detail views.
/// Non-`None` exactly while a detail view is open or mid-transition.
#[derive(Debug, Clone)]
pub struct DetailSession {
    pub product: ElementId,
    pub key: ProductKey,
    pub original_parent: ElementId,
    pub original_index: usize,
}

/// Fixed stage elements resolved once at startup.
#[derive(Debug, Clone, Copy)]
pub struct DetailStage {
    pub container: ElementId,
    pub panel: ElementId,
    pub thumb_slot: ElementId,
    pub action: ElementId,
    pub follower: ElementId,
}

pub struct DetailTransitionEngine {
    scene: Rc<dyn SceneGraph>,
    engine: Rc<dyn AnimationEngine>,
    flip: Rc<dyn FlipEngine>,
    observer: Rc<dyn VisibilityObserver>,
    stage: DetailStage,
    catalog: ProductCatalog,
    content: DetailContentMap,
    motion: MotionConfig,
    machine: Rc<RefCell<StateMachine>>,
    session: Rc<RefCell<Option<DetailSession>>>,
}

impl DetailTransitionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scene: Rc<dyn SceneGraph>,
        engine: Rc<dyn AnimationEngine>,
        flip: Rc<dyn FlipEngine>,
        observer: Rc<dyn VisibilityObserver>,
        stage: DetailStage,
        catalog: ProductCatalog,
        content: DetailContentMap,
        motion: MotionConfig,
    ) -> Self {
        Self {
            scene,
            engine,
            flip,
            observer,
            stage,
            catalog,
            content,
            motion,
            machine: Rc::new(RefCell::new(StateMachine::new())),
            session: Rc::new(RefCell::new(None)),
        }
    }

    pub fn state(&self) -> GridState {
        self.machine.borrow().state()
    }

    pub fn current_product(&self) -> Option<ElementId> {
        self.session.borrow().as_ref().map(|session| session.product)
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Open the detail view for a product addressed by its raw key. A key
    /// that does not parse aborts the interaction before any visual effect.
    pub fn open_by_key(&self, raw_key: &str) -> DetailResult<TransitionOutcome> {
        let key = ProductKey::parse(raw_key)?;
        let product = self
            .catalog
            .element_for(key.raw())
            .ok_or_else(|| DetailError::UnknownKey(raw_key.to_string()))?;
        self.open(product)
    }

    /// Open the detail view for a clicked product element.
    pub fn open(&self, product: ElementId) -> DetailResult<TransitionOutcome> {
        let key = self
            .catalog
            .key_for(product)
            .ok_or(DetailError::UnknownProduct(product))?
            .clone();

        if !self.machine.borrow().can_transition(GridEvent::SelectProduct) {
            tracing::warn!(
                key = key.raw(),
                state = ?self.state(),
                "select ignored while a detail transition is engaged"
            );
            return Ok(TransitionOutcome::Ignored);
        }

        // Where the product goes back to, recorded before anything moves.
        let original_parent = self
            .scene
            .parent_of(product)?
            .ok_or(SceneError::Detached(product))?;
        let original_index = self.scene.index_in_parent(product)?;

        self.machine.borrow_mut().transition(GridEvent::SelectProduct)?;

        self.scene.add_class(self.stage.panel, SHOWING_CLASS)?;
        self.scene
            .add_class(self.stage.container, DETAILS_OPEN_CLASS)?;

        let slide = Tween::new(self.motion.transition_duration_s, Ease::InOut);
        let _ = self.engine.animate(
            self.stage.container,
            vec![(
                Property::X,
                PropertyValue::ViewportWidthPercent(self.motion.container_shift_vw),
            )],
            slide,
        );
        let _ = self.engine.animate(
            self.stage.panel,
            vec![(Property::X, PropertyValue::Px(0.0))],
            slide,
        );

        // Capture, reparent and replay as one synchronous unit.
        let thumb_slot = self.stage.thumb_slot;
        let sequence = FlipSequence::capture(self.flip.as_ref(), self.scene.as_ref(), product)?;
        let mutated = sequence.mutate(|tree| tree.reparent(product, thumb_slot))?;
        let flip_done = mutated.replay(ReplayOptions {
            tween: slide,
            absolute: false,
        })?;

        self.reveal_panel_content(&key);

        let _ = self.engine.animate(
            self.stage.follower,
            vec![(Property::Scale, PropertyValue::Scale(1.0))],
            Tween::delayed(
                self.motion.follower_duration_s,
                Ease::Out,
                self.motion.follower_delay_s,
            ),
        );

        // The visibility-driven fade must not fight the FLIP while the
        // product lives in the panel.
        self.observer.unobserve(product);

        *self.session.borrow_mut() = Some(DetailSession {
            product,
            key: key.clone(),
            original_parent,
            original_index,
        });

        let machine = Rc::clone(&self.machine);
        flip_done.then(move || {
            if let Err(err) = machine.borrow_mut().transition(GridEvent::OpenComplete) {
                // A close requested mid-open already moved the view on.
                tracing::debug!(%err, "stale open completion dropped");
            }
        });

        tracing::info!(key = key.raw(), "detail opened");
        Ok(TransitionOutcome::Started)
    }

    /// Close the open detail view, reversing the FLIP back into the grid.
    pub fn close(&self) -> DetailResult<TransitionOutcome> {
        if !self
            .machine
            .borrow()
            .can_transition(GridEvent::CloseRequested)
        {
            tracing::debug!(state = ?self.state(), "close ignored with no detail engaged");
            return Ok(TransitionOutcome::Ignored);
        }
        let session = self
            .session
            .borrow()
            .clone()
            .ok_or_else(|| DetailError::SessionMissing(self.state()))?;

        self.machine
            .borrow_mut()
            .transition(GridEvent::CloseRequested)?;

        self.scene
            .remove_class(self.stage.container, DETAILS_OPEN_CLASS)?;

        // Panel content fades first; the slide-back starts after the delay.
        let slide = Tween::delayed(
            self.motion.transition_duration_s,
            Ease::InOut,
            self.motion.close_delay_s,
        );
        let _ = self.engine.animate(
            self.stage.container,
            vec![(Property::X, PropertyValue::Px(0.0))],
            slide,
        );
        let _ = self.engine.animate(
            self.stage.panel,
            vec![(
                Property::X,
                PropertyValue::ViewportWidthPercent(self.motion.panel_offscreen_vw),
            )],
            slide,
        );

        self.hide_panel_content(&session.key);

        let _ = self.engine.animate(
            self.stage.follower,
            vec![(Property::Scale, PropertyValue::Scale(0.0))],
            Tween::new(self.motion.follower_duration_s, Ease::Out),
        );

        // Reverse FLIP. Both rectangles are read in the panel container's
        // frame: the product is still its descendant when pinned.
        let current = self
            .scene
            .rect_relative_to(session.product, self.stage.panel)?;
        let target = self
            .scene
            .rect_relative_to(session.original_parent, self.stage.panel)?;
        self.scene.set_absolute_rect(session.product, current)?;
        let travel = self.engine.animate(
            session.product,
            vec![
                (Property::Left, PropertyValue::Px(target.x)),
                (Property::Top, PropertyValue::Px(target.y)),
                (Property::Width, PropertyValue::Px(target.width)),
                (Property::Height, PropertyValue::Px(target.height)),
            ],
            slide,
        );

        let scene = Rc::clone(&self.scene);
        let observer = Rc::clone(&self.observer);
        let machine = Rc::clone(&self.machine);
        let session_slot = Rc::clone(&self.session);
        let stage = self.stage;
        travel.then(move || {
            let restored = (|| -> DetailResult<()> {
                scene.reparent_at(
                    session.product,
                    session.original_parent,
                    session.original_index,
                )?;
                scene.clear_positioning(session.product)?;
                scene.remove_class(stage.panel, SHOWING_CLASS)?;
                Ok(())
            })();
            if let Err(err) = restored {
                tracing::error!(%err, key = session.key.raw(), "product restore failed");
            }
            observer.observe(session.product);
            *session_slot.borrow_mut() = None;
            if let Err(err) = machine.borrow_mut().transition(GridEvent::CloseComplete) {
                tracing::warn!(%err, "close completion rejected");
            }
            tracing::info!(key = session.key.raw(), "detail closed");
        });

        Ok(TransitionOutcome::Started)
    }

    fn reveal_panel_content(&self, key: &ProductKey) {
        let fade = Tween::new(self.motion.content_fade_s, Ease::Out);
        let mut targets: Vec<ElementId> = self
            .content
            .resolve_all(key.scent())
            .into_iter()
            .map(|(_, element)| element)
            .collect();
        targets.push(self.stage.action);
        for element in targets {
            self.engine.set_immediate(
                element,
                vec![(Property::Display, PropertyValue::Keyword("block"))],
            );
            let _ = self.engine.animate(
                element,
                vec![(Property::Opacity, PropertyValue::Opacity(1.0))],
                fade,
            );
        }
    }

    fn hide_panel_content(&self, key: &ProductKey) {
        let fade = Tween::new(self.motion.content_fade_s, Ease::Out);
        let mut targets: Vec<ElementId> = self
            .content
            .resolve_all(key.scent())
            .into_iter()
            .map(|(_, element)| element)
            .collect();
        targets.push(self.stage.action);
        for element in targets {
            let faded = self.engine.animate(
                element,
                vec![(Property::Opacity, PropertyValue::Opacity(0.0))],
                fade,
            );
            let engine = Rc::clone(&self.engine);
            faded.then(move || {
                engine.set_immediate(
                    element,
                    vec![(Property::Display, PropertyValue::Keyword("none"))],
                );
            });
        }
    }
}
