//! Image preloading gate. The host loads everything matching a selector and
//! resolves one completion; startup sequencing hangs off that signal.

use std::cell::RefCell;

use crate::animation::Completion;

pub trait ImagePreloader {
    /// Begin loading all images matching `selector`; the returned completion
    /// resolves once every one of them has finished.
    fn preload(&self, selector: &str) -> Completion;
}

/// Preloader double whose completion is resolved explicitly.
#[derive(Default)]
pub struct ManualPreloader {
    requests: RefCell<Vec<(String, Completion)>>,
}

impl ManualPreloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested_selectors(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(selector, _)| selector.clone())
            .collect()
    }

    /// Signal that every pending preload has finished.
    pub fn finish_all(&self) {
        // Continuations may issue further preloads; resolve outside the borrow.
        let completions: Vec<Completion> = self
            .requests
            .borrow()
            .iter()
            .map(|(_, completion)| completion.clone())
            .collect();
        for completion in completions {
            completion.resolve();
        }
    }
}

impl ImagePreloader for ManualPreloader {
    fn preload(&self, selector: &str) -> Completion {
        let completion = Completion::pending();
        self.requests
            .borrow_mut()
            .push((selector.to_string(), completion.clone()));
        completion
    }
}
