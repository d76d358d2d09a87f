/// The interaction surface's view state. `Grid` is both initial and terminal;
/// `Opening` and `Closing` are transient while a detail transition plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridState {
    #[default]
    Grid,
    Opening,
    DetailOpen,
    Closing,
}

impl GridState {
    /// True while a detail view is open or mid-transition in either direction.
    pub const fn detail_engaged(self) -> bool {
        !matches!(self, Self::Grid)
    }
}
