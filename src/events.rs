use crate::grid::Occupant;
use crate::session::Outcome;

/// One-way notifications from the session to views and other collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started {
        goal: u32,
        time_limit: u32,
    },
    /// Back to idle with a fresh configuration
    Reset {
        goal: u32,
        time_limit: u32,
    },
    ScoreChanged {
        score: u32,
    },
    Tick {
        time_remaining: u32,
    },
    LowTimeWarning {
        seconds_left: u32,
    },
    CellChanged {
        index: usize,
        occupant: Occupant,
    },
    Milestone {
        threshold: u32,
        message: &'static str,
    },
    MilestoneCleared,
    Ended {
        outcome: Outcome,
        final_score: u32,
        message: &'static str,
    },
}

/// Consumer of session notifications. Implementations must not fail loudly:
/// any error stays on their side of the boundary.
pub trait SessionObserver {
    fn notify(&mut self, event: &SessionEvent);
}
