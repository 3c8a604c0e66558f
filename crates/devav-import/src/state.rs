//! Pipeline state machine
//!
//! ```text
//! NotStarted -> StageRunning(0) -> StageCommitting(0) -> StageRunning(1) -> ... -> Completed
//! ```
//!
//! Any `StageRunning` or `StageCommitting` state may move to the terminal
//! `Failed` state.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

/// Where a migration run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PipelineState {
    /// No stage has started
    #[default]
    NotStarted,
    /// Import tasks of the stage are running
    StageRunning(usize),
    /// The stage's creations are being committed
    StageCommitting(usize),
    /// Every stage committed
    Completed,
    /// A stage failed; terminal
    Failed,
}

impl PipelineState {
    /// Whether no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::StageRunning(level) => write!(f, "running stage {level}"),
            Self::StageCommitting(level) => write!(f, "committing stage {level}"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Illegal pipeline transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal pipeline transition: {from} -> {to}")]
pub struct StateError {
    /// State before the attempted transition
    pub from: PipelineState,
    /// Requested state
    pub to: PipelineState,
}

/// Validates a state transition
///
/// # Errors
/// [`StateError`] when `to` is not reachable from `from` in one step
pub fn validate_transition(from: PipelineState, to: PipelineState) -> Result<(), StateError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(StateError { from, to })
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: PipelineState) -> Vec<PipelineState> {
    use PipelineState::*;
    match from {
        NotStarted => vec![StageRunning(0), Completed],
        StageRunning(level) => vec![StageCommitting(level), Failed],
        StageCommitting(level) => vec![StageRunning(level + 1), Completed, Failed],
        Completed | Failed => vec![],
    }
}

/// Current state of one run, guarded for shared access
#[derive(Debug, Default)]
pub struct StateTracker {
    state: Mutex<PipelineState>,
}

impl StateTracker {
    /// Tracker in [`PipelineState::NotStarted`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub fn current(&self) -> PipelineState {
        *self.state.lock()
    }

    /// Move to `to` if the transition is legal
    ///
    /// # Errors
    /// [`StateError`] for illegal transitions; the state is left unchanged
    pub fn advance(&self, to: PipelineState) -> Result<(), StateError> {
        let mut state = self.state.lock();
        validate_transition(*state, to)?;
        tracing::trace!(from = %*state, to = %to, "pipeline transition");
        *state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineState::*;

    #[test]
    fn happy_path_is_legal() {
        let path = [
            NotStarted,
            StageRunning(0),
            StageCommitting(0),
            StageRunning(1),
            StageCommitting(1),
            Completed,
        ];
        for pair in path.windows(2) {
            assert!(validate_transition(pair[0], pair[1]).is_ok(), "{pair:?}");
        }
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(validate_transition(StageCommitting(0), StageRunning(2)).is_err());
        assert!(validate_transition(StageRunning(1), StageRunning(2)).is_err());
        assert!(validate_transition(StageRunning(1), StageCommitting(0)).is_err());
    }

    #[test]
    fn failure_only_from_active_states() {
        assert!(validate_transition(StageRunning(3), Failed).is_ok());
        assert!(validate_transition(StageCommitting(3), Failed).is_ok());
        assert!(validate_transition(NotStarted, Failed).is_err());
        assert!(allowed_transitions(Failed).is_empty());
        assert!(allowed_transitions(Completed).is_empty());
    }

    #[test]
    fn tracker_rejects_illegal_moves() {
        let tracker = StateTracker::new();
        tracker.advance(StageRunning(0)).unwrap();
        let err = tracker.advance(Completed).unwrap_err();
        assert_eq!(err.from, StageRunning(0));
        assert_eq!(tracker.current(), StageRunning(0));
        assert!(!tracker.current().is_terminal());
    }
}
