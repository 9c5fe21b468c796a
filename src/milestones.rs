use std::collections::BTreeSet;
use std::time::Duration;

use crate::random::Randomness;

/// How long a milestone message stays on screen
pub const MILESTONE_DISPLAY: Duration = Duration::from_millis(2000);

pub const MILESTONES: [(u32, &[&str]); 3] = [
    (5, &["Nice start!", "Keep it flowing!"]),
    (10, &["Halfway hero!", "Ten cans strong!"]),
    (15, &["Making waves!", "The village is cheering!"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneReached {
    pub threshold: u32,
    pub message: &'static str,
}

/// Tracks which score thresholds have been announced in the current session
#[derive(Debug, Clone, Default)]
pub struct MilestoneEvaluator {
    crossed: BTreeSet<u32>,
}

impl MilestoneEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crossed(&self) -> &BTreeSet<u32> {
        &self.crossed
    }

    /// Fires once per threshold, on the exact score, for the rest of the session.
    pub fn evaluate<R: Randomness + ?Sized>(
        &mut self,
        score: u32,
        rng: &mut R,
    ) -> Option<MilestoneReached> {
        let (threshold, messages) = MILESTONES.iter().find(|(t, _)| *t == score)?;
        if !self.crossed.insert(*threshold) {
            return None;
        }
        let message = messages[rng.pick_index(messages.len())];
        Some(MilestoneReached {
            threshold: *threshold,
            message,
        })
    }
}
