//! Vertical-motion state machine.
use log::debug;

/// Whether the actor is supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalState {
    /// Standing on a block top or the floor plane.
    #[default]
    Grounded,
    /// Rising or falling.
    Airborne,
}

/// Tracks Grounded/Airborne transitions driven by vertical resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroundedStateMachine {
    state: VerticalState,
}

impl GroundedStateMachine {
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> VerticalState {
        self.state
    }

    /// Returns `true` while grounded.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        matches!(self.state, VerticalState::Grounded)
    }

    /// Enters [`VerticalState::Grounded`].
    pub fn land(&mut self) {
        self.transition(VerticalState::Grounded);
    }

    /// Enters [`VerticalState::Airborne`].
    pub fn leave_ground(&mut self) {
        self.transition(VerticalState::Airborne);
    }

    fn transition(&mut self, next: VerticalState) {
        if self.state != next {
            debug!("vertical state {:?} -> {next:?}", self.state);
            self.state = next;
        }
    }
}
