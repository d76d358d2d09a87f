use super::error::{StateError, StateResult};
use super::event::{GridEvent, StateTransition};
use super::model::GridState;

/// Guarded state machine for the grid/detail transition. The absence of a
/// `SelectProduct` row outside `Grid` is the at-most-one-open-detail guard:
/// overlapping triggers are rejected here, not by cancelling animations.
#[derive(Debug)]
pub struct StateMachine {
    state: GridState,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: GridState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn can_transition(&self, event: GridEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: GridEvent) -> Option<GridState> {
        use GridEvent::*;
        match (self.state, event) {
            (GridState::Grid, SelectProduct) => Some(GridState::Opening),
            (GridState::Opening, OpenComplete) => Some(GridState::DetailOpen),
            (GridState::Opening, CloseRequested) => Some(GridState::Closing),
            (GridState::DetailOpen, CloseRequested) => Some(GridState::Closing),
            (GridState::Closing, CloseComplete) => Some(GridState::Grid),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: GridEvent) -> StateResult<GridState> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }
}

#[cfg(test)]
impl StateMachine {
    fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GridState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_product_is_only_valid_from_grid() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(GridEvent::SelectProduct));
        assert!(!machine.can_transition(GridEvent::CloseRequested));

        let _ = machine
            .transition(GridEvent::SelectProduct)
            .expect("grid -> opening should transition");

        // At-most-one open detail: a second select is rejected in every
        // non-grid state.
        assert!(!machine.can_transition(GridEvent::SelectProduct));
        let _ = machine
            .transition(GridEvent::OpenComplete)
            .expect("opening -> detail-open should transition");
        assert!(!machine.can_transition(GridEvent::SelectProduct));
        let _ = machine
            .transition(GridEvent::CloseRequested)
            .expect("detail-open -> closing should transition");
        assert!(!machine.can_transition(GridEvent::SelectProduct));
    }

    #[test]
    fn close_may_interrupt_an_opening_transition() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(GridEvent::SelectProduct)
            .expect("select should work");
        let state = machine
            .transition(GridEvent::CloseRequested)
            .expect("opening -> closing should transition");
        assert_eq!(state, GridState::Closing);

        // The stale open completion arriving later is rejected.
        assert!(!machine.can_transition(GridEvent::OpenComplete));
    }

    #[test]
    fn full_round_trip_returns_to_grid_with_ordered_history() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(GridEvent::SelectProduct)
            .expect("select should work");
        let _ = machine
            .transition(GridEvent::OpenComplete)
            .expect("open complete should work");
        let _ = machine
            .transition(GridEvent::CloseRequested)
            .expect("close request should work");
        let _ = machine
            .transition(GridEvent::CloseComplete)
            .expect("close complete should work");

        assert_eq!(machine.state(), GridState::Grid);
        assert_eq!(machine.history().len(), 4);
        assert_eq!(
            machine.history()[0],
            StateTransition::new(
                Some(GridState::Grid),
                GridEvent::SelectProduct,
                GridState::Opening
            )
        );
        assert_eq!(
            machine.history()[3],
            StateTransition::new(
                Some(GridState::Closing),
                GridEvent::CloseComplete,
                GridState::Grid
            )
        );
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(GridEvent::CloseRequested)
            .expect_err("grid -> close should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: GridState::Grid,
                event: GridEvent::CloseRequested
            }
        ));
        assert_eq!(machine.state(), GridState::Grid);
        assert!(machine.history().is_empty());
    }
}
