//! Observable pipeline state
//!
//! One snapshot per attempt, owned by the orchestrator and published over a
//! watch channel. The presentation layer reads snapshots; it never mutates
//! pipeline state directly.

use serde::{Deserialize, Serialize};

use crate::outcome::UploadOutcome;

/// Where an attempt currently is in the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Validating,
    Loading,
    Uploading,
    Resolving,
    Succeeded,
    Failed,
}

impl Phase {
    /// Coarse progress fraction for this phase.
    ///
    /// Derived from the phase only, not from bytes transferred; real
    /// byte-level progress would need a chunked store API.
    pub fn progress(self) -> f32 {
        match self {
            Phase::Idle => 0.0,
            Phase::Validating => 0.1,
            Phase::Loading => 0.3,
            Phase::Uploading => 0.6,
            Phase::Resolving => 0.9,
            Phase::Succeeded | Phase::Failed => 1.0,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// Read-only view of the latest attempt's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    /// Monotonic attempt id; 0 until the first run starts.
    pub attempt: u64,
    pub phase: Phase,
    pub progress: f32,
    /// Present once the attempt reaches a terminal phase.
    pub outcome: Option<UploadOutcome>,
}

impl PipelineSnapshot {
    pub(crate) fn idle() -> Self {
        PipelineSnapshot {
            attempt: 0,
            phase: Phase::Idle,
            progress: 0.0,
            outcome: None,
        }
    }

    pub(crate) fn at(attempt: u64, phase: Phase) -> Self {
        PipelineSnapshot {
            attempt,
            phase,
            progress: phase.progress(),
            outcome: None,
        }
    }

    pub(crate) fn terminal(attempt: u64, outcome: UploadOutcome) -> Self {
        let phase = if outcome.is_success() {
            Phase::Succeeded
        } else {
            Phase::Failed
        };
        PipelineSnapshot {
            attempt,
            phase,
            progress: phase.progress(),
            outcome: Some(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotonic_across_phases() {
        let order = [
            Phase::Idle,
            Phase::Validating,
            Phase::Loading,
            Phase::Uploading,
            Phase::Resolving,
            Phase::Succeeded,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].progress() < pair[1].progress() || pair[1].is_terminal());
            assert!(pair[0].progress() <= pair[1].progress());
        }
    }

    #[test]
    fn terminal_snapshot_reflects_the_outcome() {
        let snapshot = PipelineSnapshot::terminal(
            3,
            UploadOutcome::Failed {
                message: "unsupported type".to_string(),
            },
        );
        assert_eq!(snapshot.attempt, 3);
        assert_eq!(snapshot.phase, Phase::Failed);
        assert_eq!(snapshot.progress, 1.0);
    }
}
