//! Visibility-driven thumbnail fading lives in the host; this seam only
//! controls which elements it watches, so a product can be taken out of
//! observation while a FLIP owns its transform.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::scene::ElementId;

pub trait VisibilityObserver {
    fn observe(&self, element: ElementId);
    fn unobserve(&self, element: ElementId);
}

/// Bookkeeping-only observer used by tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    observed: RefCell<BTreeSet<ElementId>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.observed.borrow().contains(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.borrow().len()
    }
}

impl VisibilityObserver for RecordingObserver {
    fn observe(&self, element: ElementId) {
        self.observed.borrow_mut().insert(element);
    }

    fn unobserve(&self, element: ElementId) {
        self.observed.borrow_mut().remove(&element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_and_unobserve_track_membership() {
        let observer = RecordingObserver::new();
        let element = ElementId::new(7);

        observer.observe(element);
        assert!(observer.is_observed(element));
        assert_eq!(observer.observed_count(), 1);

        observer.unobserve(element);
        assert!(!observer.is_observed(element));

        // Unobserving twice is harmless.
        observer.unobserve(element);
        assert_eq!(observer.observed_count(), 0);
    }
}
