// Loop state machine types

use std::fmt;

/// Position of a prioritization loop in its turn cycle
///
/// Init → AwaitingResponse → PresentingTask → AwaitingUserInput →
/// AwaitingResponse → … → Done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Init,
    AwaitingResponse,
    PresentingTask,
    AwaitingUserInput,
    Done,
}

impl LoopState {
    /// Whether `next` may follow `self`
    pub fn can_transition_to(self, next: LoopState) -> bool {
        use LoopState::*;
        matches!(
            (self, next),
            (Init, AwaitingResponse)
                | (AwaitingResponse, PresentingTask)
                | (AwaitingResponse, Done)
                | (PresentingTask, AwaitingUserInput)
                | (AwaitingUserInput, AwaitingResponse)
                | (AwaitingUserInput, Done)
        )
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::Init => "init",
            LoopState::AwaitingResponse => "awaiting-response",
            LoopState::PresentingTask => "presenting-task",
            LoopState::AwaitingUserInput => "awaiting-user-input",
            LoopState::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a loop run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOutcome {
    /// Collaborator round-trips made
    pub turns: usize,
    /// True when every task was finished; false when the user closed input
    pub finished: bool,
}

/// Track state transitions, logging each one
#[derive(Debug)]
pub(crate) struct StateTracker {
    state: LoopState,
}

impl StateTracker {
    pub(crate) fn new() -> Self {
        Self {
            state: LoopState::Init,
        }
    }

    pub(crate) fn state(&self) -> LoopState {
        self.state
    }

    pub(crate) fn go(&mut self, next: LoopState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid loop transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("Loop state {} -> {}", self.state, next);
        self.state = next;
    }
}
