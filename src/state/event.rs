use super::model::GridState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    SelectProduct,
    OpenComplete,
    CloseRequested,
    CloseComplete,
}

/// One recorded transition, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<GridState>,
    pub event: GridEvent,
    pub to: GridState,
}

impl StateTransition {
    pub const fn new(from: Option<GridState>, event: GridEvent, to: GridState) -> Self {
        Self { from, event, to }
    }
}
