//! Per-invocation state machine.

use tracing::trace;

/// Lifecycle of a single task invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationState {
    /// Not started.
    #[default]
    Idle,
    /// Resolving parameters and building the command and environment.
    Composing,
    /// A shell process has been started.
    Spawned,
    /// The shell exited with code 0.
    Succeeded,
    /// The shell exited non-zero or could not be started.
    FailedExitCode,
    /// No command could be resolved; nothing was spawned.
    FailedConfig,
}

impl InvocationState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Composing
    /// - Composing -> Spawned
    /// - Composing -> FailedConfig
    /// - Spawned -> Succeeded
    /// - Spawned -> FailedExitCode
    pub fn can_transition_to(&self, target: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (*self, target),
            (Idle, Composing)
                | (Composing, Spawned)
                | (Composing, FailedConfig)
                | (Spawned, Succeeded)
                | (Spawned, FailedExitCode)
        )
    }

    /// Attempt to transition to a new state.
    pub fn transition_to(&mut self, target: InvocationState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            trace!(from = ?*self, to = ?target, "invocation state");
            *self = target;
            Ok(())
        } else {
            Err(crate::error::ShellTaskError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationState::Succeeded
                | InvocationState::FailedExitCode
                | InvocationState::FailedConfig
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path() {
        let mut state = InvocationState::Idle;
        assert!(state.transition_to(InvocationState::Composing).is_ok());
        assert!(state.transition_to(InvocationState::Spawned).is_ok());
        assert!(state.transition_to(InvocationState::Succeeded).is_ok());
        assert!(state.is_terminal());
    }

    #[test]
    fn test_config_failure_path() {
        let mut state = InvocationState::Idle;
        state.transition_to(InvocationState::Composing).unwrap();
        assert!(state.transition_to(InvocationState::FailedConfig).is_ok());
        assert!(state.is_terminal());
    }

    #[test]
    fn test_config_failure_after_spawn_is_invalid() {
        let mut state = InvocationState::Spawned;
        assert!(state.transition_to(InvocationState::FailedConfig).is_err());
        assert_eq!(state, InvocationState::Spawned);
    }

    #[test]
    fn test_no_transitions_from_terminal() {
        for terminal in [
            InvocationState::Succeeded,
            InvocationState::FailedExitCode,
            InvocationState::FailedConfig,
        ] {
            let mut state = terminal;
            assert!(state.transition_to(InvocationState::Idle).is_err());
            assert!(state.transition_to(InvocationState::Spawned).is_err());
        }
    }

    #[test]
    fn test_cannot_skip_composing() {
        let mut state = InvocationState::Idle;
        assert!(state.transition_to(InvocationState::Spawned).is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(InvocationState::default(), InvocationState::Idle);
        assert!(!InvocationState::Idle.is_terminal());
    }
}
