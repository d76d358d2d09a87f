use std::cell::RefCell;
use std::collections::VecDeque;

use crate::scene::ElementId;

use super::{AnimationEngine, Completion, PropertyMap, StaggerSpec, Tween};

/// What one engine call asked for, kept for assertions and host playback.
#[derive(Debug, Clone)]
pub struct AnimationRecord {
    pub targets: Vec<ElementId>,
    pub props: PropertyMap,
    pub tween: Option<Tween>,
    pub stagger: Option<StaggerSpec>,
}

struct PendingAnimation {
    record: AnimationRecord,
    completion: Completion,
}

/// Deterministic [`AnimationEngine`]: records every request and resolves
/// completions when the host drains the queue. This is the engine the test
/// suites drive, and a valid embedding for hosts that tick animations
/// themselves.
#[derive(Default)]
pub struct ManualEngine {
    queue: RefCell<VecDeque<PendingAnimation>>,
    log: RefCell<Vec<AnimationRecord>>,
}

impl ManualEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// The request a host ticking its own playback should service next.
    pub fn peek_next(&self) -> Option<AnimationRecord> {
        self.queue
            .borrow()
            .front()
            .map(|animation| animation.record.clone())
    }

    /// Finish the oldest in-flight animation. Returns false when idle.
    pub fn complete_next(&self) -> bool {
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(animation) => {
                animation.completion.resolve();
                true
            }
            None => false,
        }
    }

    /// Drain until idle. Continuations may enqueue further animations; those
    /// are completed too.
    pub fn complete_all(&self) {
        while self.complete_next() {}
    }

    /// Every request seen so far, including immediate sets (tween `None`).
    pub fn records(&self) -> Vec<AnimationRecord> {
        self.log.borrow().clone()
    }

    pub fn records_for(&self, target: ElementId) -> Vec<AnimationRecord> {
        self.log
            .borrow()
            .iter()
            .filter(|record| record.targets.contains(&target))
            .cloned()
            .collect()
    }

    fn push(&self, record: AnimationRecord, animated: bool) -> Completion {
        self.log.borrow_mut().push(record.clone());
        if !animated {
            return Completion::resolved();
        }
        let completion = Completion::pending();
        self.queue.borrow_mut().push_back(PendingAnimation {
            record,
            completion: completion.clone(),
        });
        completion
    }
}

impl AnimationEngine for ManualEngine {
    fn animate(&self, target: ElementId, props: PropertyMap, tween: Tween) -> Completion {
        self.push(
            AnimationRecord {
                targets: vec![target],
                props,
                tween: Some(tween),
                stagger: None,
            },
            true,
        )
    }

    fn set_immediate(&self, target: ElementId, props: PropertyMap) {
        let _ = self.push(
            AnimationRecord {
                targets: vec![target],
                props,
                tween: None,
                stagger: None,
            },
            false,
        );
    }

    fn animate_staggered(
        &self,
        targets: &[ElementId],
        props: PropertyMap,
        tween: Tween,
        stagger: StaggerSpec,
    ) -> Completion {
        self.push(
            AnimationRecord {
                targets: targets.to_vec(),
                props,
                tween: Some(tween),
                stagger: Some(stagger),
            },
            true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Ease, Property, PropertyValue};
    use std::cell::Cell;
    use std::rc::Rc;

    fn element(raw: u64) -> ElementId {
        ElementId::new(raw)
    }

    #[test]
    fn animate_queues_and_complete_next_resolves_in_request_order() {
        let engine = ManualEngine::new();
        let first = engine.animate(
            element(1),
            vec![(Property::X, PropertyValue::Px(10.0))],
            Tween::new(0.3, Ease::Out),
        );
        let second = engine.animate(
            element(2),
            vec![(Property::Opacity, PropertyValue::Opacity(1.0))],
            Tween::new(0.6, Ease::InOut),
        );

        assert_eq!(engine.pending(), 2);
        assert!(engine.complete_next());
        assert!(first.is_resolved());
        assert!(!second.is_resolved());

        engine.complete_all();
        assert!(second.is_resolved());
        assert!(!engine.complete_next());
    }

    #[test]
    fn set_immediate_is_logged_but_never_pending() {
        let engine = ManualEngine::new();
        engine.set_immediate(element(3), vec![(Property::Scale, PropertyValue::Scale(0.5))]);

        assert_eq!(engine.pending(), 0);
        let records = engine.records_for(element(3));
        assert_eq!(records.len(), 1);
        assert!(records[0].tween.is_none());
    }

    #[test]
    fn complete_all_drains_animations_enqueued_by_continuations() {
        let engine = Rc::new(ManualEngine::new());
        let chained_done = Rc::new(Cell::new(false));

        let handle = engine.animate(
            element(1),
            vec![(Property::X, PropertyValue::Px(0.0))],
            Tween::new(0.3, Ease::Out),
        );
        let engine_for_chain = Rc::clone(&engine);
        let flag = Rc::clone(&chained_done);
        handle.then(move || {
            let follow_up = engine_for_chain.animate(
                element(1),
                vec![(Property::Y, PropertyValue::Px(0.0))],
                Tween::new(0.3, Ease::Out),
            );
            follow_up.then(move || flag.set(true));
        });

        engine.complete_all();
        assert!(chained_done.get());
    }

    #[test]
    fn staggered_batch_records_all_targets_and_one_completion() {
        let engine = ManualEngine::new();
        let targets = [element(1), element(2), element(3)];
        let handle = engine.animate_staggered(
            &targets,
            vec![(Property::Opacity, PropertyValue::Opacity(1.0))],
            Tween::new(0.6, Ease::Out),
            StaggerSpec {
                amount_s: 1.2,
                order: crate::animation::StaggerOrder::Random,
            },
        );

        assert_eq!(engine.pending(), 1);
        let records = engine.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].targets, targets);
        assert!(records[0].stagger.is_some());

        engine.complete_all();
        assert!(handle.is_resolved());
    }
}
