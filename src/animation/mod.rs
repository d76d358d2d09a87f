//! Animation engine seam. The real interpolator lives in the host; this crate
//! only describes what to animate and chains work off completions.

mod manual;

use std::cell::RefCell;
use std::rc::Rc;

use crate::scene::ElementId;

pub use manual::{AnimationRecord, ManualEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Decelerating ease, used for kinetic-feel settles.
    Out,
    /// Symmetric ease, used for the view transitions.
    InOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    X,
    Y,
    Top,
    Left,
    Width,
    Height,
    Scale,
    Opacity,
    Display,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Px(f64),
    Scale(f64),
    Opacity(f64),
    /// Percentage of the viewport width, e.g. `-33.0` for `-33vw`.
    ViewportWidthPercent(f64),
    Keyword(&'static str),
}

/// Ordered property set for one animation request.
pub type PropertyMap = Vec<(Property, PropertyValue)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub duration_s: f64,
    pub ease: Ease,
    pub delay_s: f64,
}

impl Tween {
    pub const fn new(duration_s: f64, ease: Ease) -> Self {
        Self {
            duration_s,
            ease,
            delay_s: 0.0,
        }
    }

    pub const fn delayed(duration_s: f64, ease: Ease, delay_s: f64) -> Self {
        Self {
            duration_s,
            ease,
            delay_s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerOrder {
    Sequential,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerSpec {
    /// Total window over which the batch's start times are distributed.
    pub amount_s: f64,
    pub order: StaggerOrder,
}

/// One-shot completion slot with a single resolution point.
///
/// Dependent work is chained with [`Completion::then`]; resolving twice is a
/// no-op. Continuations registered after resolution run immediately.
#[derive(Clone, Default)]
pub struct Completion {
    slot: Rc<RefCell<CompletionSlot>>,
}

#[derive(Default)]
struct CompletionSlot {
    resolved: bool,
    continuations: Vec<Box<dyn FnOnce()>>,
}

impl Completion {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn resolved() -> Self {
        let completion = Self::default();
        completion.slot.borrow_mut().resolved = true;
        completion
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().resolved
    }

    pub fn then(&self, continuation: impl FnOnce() + 'static) {
        {
            let mut slot = self.slot.borrow_mut();
            if !slot.resolved {
                slot.continuations.push(Box::new(continuation));
                return;
            }
        }
        continuation();
    }

    /// Resolve the slot. Continuations run outside the borrow so they may
    /// start further animations or chain onto this same completion.
    pub fn resolve(&self) {
        let continuations = {
            let mut slot = self.slot.borrow_mut();
            if slot.resolved {
                return;
            }
            slot.resolved = true;
            std::mem::take(&mut slot.continuations)
        };
        for continuation in continuations {
            continuation();
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Opaque scheduler of property interpolations.
pub trait AnimationEngine {
    fn animate(&self, target: ElementId, props: PropertyMap, tween: Tween) -> Completion;

    /// Apply property values without interpolation.
    fn set_immediate(&self, target: ElementId, props: PropertyMap);

    /// One batch animation across `targets`, start times spread per `stagger`.
    /// The returned completion resolves once the whole batch has finished.
    fn animate_staggered(
        &self,
        targets: &[ElementId],
        props: PropertyMap,
        tween: Tween,
        stagger: StaggerSpec,
    ) -> Completion;
}
