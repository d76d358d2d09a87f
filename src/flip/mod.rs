//! Geometry capture/replay (FLIP) seam.
//!
//! A layout change is animated by snapshotting pre-mutation geometry,
//! applying the tree mutation, then interpolating from the old rectangle to
//! the element's new one. Snapshot and mutation must land in the same
//! synchronous tick — [`FlipSequence`] makes that protocol the only thing the
//! type system lets you write.

use std::rc::Rc;

use crate::animation::{AnimationEngine, Completion, Property, PropertyValue, Tween};
use crate::geometry::Rect;
use crate::scene::{ElementId, SceneGraph, SceneResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    pub element: ElementId,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    pub tween: Tween,
    /// Replay with the element taken out of layout flow.
    pub absolute: bool,
}

pub trait FlipEngine {
    fn capture_state(&self, scene: &dyn SceneGraph, element: ElementId)
        -> SceneResult<LayoutSnapshot>;

    /// Animate the element from its snapshotted geometry to wherever layout
    /// has it now. The completion resolves when the interpolation finishes.
    fn replay_from(
        &self,
        scene: &dyn SceneGraph,
        snapshot: LayoutSnapshot,
        options: ReplayOptions,
    ) -> SceneResult<Completion>;
}

/// First-Last-Invert-Play on top of a property-interpolation engine: the
/// element is offset back to its old geometry immediately, then tweened to
/// identity.
pub struct TweenFlip {
    engine: Rc<dyn AnimationEngine>,
}

impl TweenFlip {
    pub fn new(engine: Rc<dyn AnimationEngine>) -> Self {
        Self { engine }
    }
}

impl FlipEngine for TweenFlip {
    fn capture_state(
        &self,
        scene: &dyn SceneGraph,
        element: ElementId,
    ) -> SceneResult<LayoutSnapshot> {
        Ok(LayoutSnapshot {
            element,
            rect: scene.rect_of(element)?,
        })
    }

    fn replay_from(
        &self,
        scene: &dyn SceneGraph,
        snapshot: LayoutSnapshot,
        options: ReplayOptions,
    ) -> SceneResult<Completion> {
        let current = scene.rect_of(snapshot.element)?;
        let old = snapshot.rect;
        tracing::debug!(
            element = snapshot.element.raw(),
            ?old,
            new = ?current,
            absolute = options.absolute,
            "flip replay"
        );

        // Invert: jump back to the captured geometry without interpolation.
        let mut invert = vec![
            (Property::X, PropertyValue::Px(old.x - current.x)),
            (Property::Y, PropertyValue::Px(old.y - current.y)),
        ];
        let mut play = vec![
            (Property::X, PropertyValue::Px(0.0)),
            (Property::Y, PropertyValue::Px(0.0)),
        ];
        if old.width != current.width || old.height != current.height {
            invert.push((Property::Width, PropertyValue::Px(old.width)));
            invert.push((Property::Height, PropertyValue::Px(old.height)));
            play.push((Property::Width, PropertyValue::Px(current.width)));
            play.push((Property::Height, PropertyValue::Px(current.height)));
        }

        self.engine.set_immediate(snapshot.element, invert);
        Ok(self.engine.animate(snapshot.element, play, options.tween))
    }
}

/// Typestate wrapper for the capture -> mutate -> replay protocol. Capturing
/// yields a [`FlipSequence`]; only a mutation can advance it, and only the
/// mutated form can replay, so no layout-affecting work can slip between the
/// snapshot and the tree change.
pub struct FlipSequence<'a> {
    flip: &'a dyn FlipEngine,
    scene: &'a dyn SceneGraph,
    snapshot: LayoutSnapshot,
}

pub struct MutatedFlip<'a> {
    flip: &'a dyn FlipEngine,
    scene: &'a dyn SceneGraph,
    snapshot: LayoutSnapshot,
}

impl std::fmt::Debug for MutatedFlip<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutatedFlip")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl<'a> FlipSequence<'a> {
    pub fn capture(
        flip: &'a dyn FlipEngine,
        scene: &'a dyn SceneGraph,
        element: ElementId,
    ) -> SceneResult<Self> {
        let snapshot = flip.capture_state(scene, element)?;
        Ok(Self {
            flip,
            scene,
            snapshot,
        })
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        self.snapshot
    }

    pub fn mutate(
        self,
        apply: impl FnOnce(&dyn SceneGraph) -> SceneResult<()>,
    ) -> SceneResult<MutatedFlip<'a>> {
        apply(self.scene)?;
        Ok(MutatedFlip {
            flip: self.flip,
            scene: self.scene,
            snapshot: self.snapshot,
        })
    }
}

impl MutatedFlip<'_> {
    pub fn replay(self, options: ReplayOptions) -> SceneResult<Completion> {
        self.flip.replay_from(self.scene, self.snapshot, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Ease, ManualEngine};
    use crate::scene::MemoryScene;

    fn tween() -> Tween {
        Tween::new(1.2, Ease::InOut)
    }

    #[test]
    fn replay_inverts_to_the_captured_rect_then_plays_to_identity() {
        let scene = MemoryScene::new();
        let grid = scene.add_root(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let slot = scene.add_root(Rect::new(700.0, 100.0, 300.0, 400.0));
        let product = scene
            .add_child(grid, Rect::new(40.0, 60.0, 120.0, 120.0))
            .unwrap();

        let engine = Rc::new(ManualEngine::new());
        let flip = TweenFlip::new(engine.clone());

        let sequence = FlipSequence::capture(&flip, &scene, product).unwrap();
        let mutated = sequence
            .mutate(|tree| {
                tree.reparent(product, slot)?;
                // The host layout pass lands the product in its detail slot.
                scene.set_rect(product, Rect::new(740.0, 160.0, 240.0, 240.0))
            })
            .unwrap();
        let handle = mutated
            .replay(ReplayOptions {
                tween: tween(),
                absolute: false,
            })
            .unwrap();

        let records = engine.records_for(product);
        assert_eq!(records.len(), 2);

        // Invert set: old minus new.
        assert!(records[0].tween.is_none());
        assert_eq!(
            records[0].props,
            vec![
                (Property::X, PropertyValue::Px(-700.0)),
                (Property::Y, PropertyValue::Px(-100.0)),
                (Property::Width, PropertyValue::Px(120.0)),
                (Property::Height, PropertyValue::Px(120.0)),
            ]
        );

        // Play tween back to identity and final size.
        assert_eq!(records[1].tween, Some(tween()));
        assert_eq!(
            records[1].props,
            vec![
                (Property::X, PropertyValue::Px(0.0)),
                (Property::Y, PropertyValue::Px(0.0)),
                (Property::Width, PropertyValue::Px(240.0)),
                (Property::Height, PropertyValue::Px(240.0)),
            ]
        );

        assert!(!handle.is_resolved());
        engine.complete_all();
        assert!(handle.is_resolved());
    }

    #[test]
    fn replay_omits_size_props_when_only_position_changed() {
        let scene = MemoryScene::new();
        let root = scene.add_root(Rect::new(0.0, 0.0, 500.0, 500.0));
        let item = scene
            .add_child(root, Rect::new(10.0, 10.0, 50.0, 50.0))
            .unwrap();

        let engine = Rc::new(ManualEngine::new());
        let flip = TweenFlip::new(engine.clone());
        let sequence = FlipSequence::capture(&flip, &scene, item).unwrap();
        let mutated = sequence
            .mutate(|_| scene.set_rect(item, Rect::new(200.0, 10.0, 50.0, 50.0)))
            .unwrap();
        let _ = mutated
            .replay(ReplayOptions {
                tween: tween(),
                absolute: false,
            })
            .unwrap();

        let records = engine.records_for(item);
        assert_eq!(records[0].props.len(), 2);
        assert_eq!(records[1].props.len(), 2);
    }

    #[test]
    fn failed_mutation_surfaces_the_scene_error() {
        let scene = MemoryScene::new();
        let root = scene.add_root(Rect::default());
        let item = scene.add_child(root, Rect::default()).unwrap();

        let engine = Rc::new(ManualEngine::new());
        let flip = TweenFlip::new(engine.clone());
        let sequence = FlipSequence::capture(&flip, &scene, item).unwrap();
        let err = sequence
            .mutate(|tree| tree.reparent(item, ElementId::new(999)))
            .expect_err("reparent to an unknown element should fail");
        assert!(matches!(
            err,
            crate::scene::SceneError::UnknownElement(element) if element == ElementId::new(999)
        ));
        // No animation may have been issued for the failed protocol run.
        assert!(engine.records_for(item).is_empty());
    }
}
