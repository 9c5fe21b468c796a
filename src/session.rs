use std::time::Duration;

use rand::rngs::StdRng;

use crate::difficulty::{Difficulty, SessionConfig};
use crate::events::SessionEvent;
use crate::grid::{CellChange, Grid, Occupant};
use crate::milestones::{MilestoneEvaluator, MILESTONE_DISPLAY};
use crate::random::{Randomness, RngRandomness};
use crate::scheduler::{Fired, Scheduler, TaskId};

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);
pub const LOW_TIME_WARNINGS: [u32; 2] = [10, 5];

pub const WIN_MESSAGES: [&str; 5] = [
    "Amazing! You brought water to the village!",
    "Victory! Clean water for everyone!",
    "You did it! Every drop counts!",
    "Champion! You made a difference!",
    "Incredible! You changed lives today!",
];

pub const LOSE_MESSAGES: [&str; 5] = [
    "Try again! The village still needs water.",
    "Almost! Give it another shot.",
    "Don't give up! The cans are waiting.",
    "Keep going! You can do it next time.",
    "So close! Try once more.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub fn from_score(score: u32, goal: u32) -> Self {
        if score >= goal {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }

    fn messages(&self) -> &'static [&'static str] {
        match self {
            Outcome::Win => &WIN_MESSAGES,
            Outcome::Lose => &LOSE_MESSAGES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub score: u32,
    pub time_remaining: u32,
    pub active: bool,
    pub milestones: MilestoneEvaluator,
}

impl SessionState {
    fn idle(config: &SessionConfig) -> Self {
        Self {
            score: 0,
            time_remaining: config.time_limit_secs,
            active: false,
            milestones: MilestoneEvaluator::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Spawn,
    Countdown,
    FeedbackClear,
}

/// Owns one game session at a time: state, grid, timers and the events they produce.
///
/// All input arrives through [`start`](Self::start), [`reset`](Self::reset),
/// [`activate`](Self::activate) and [`advance`](Self::advance); every call
/// completes its state changes before returning.
#[derive(Debug)]
pub struct SessionController<R: Randomness = RngRandomness<StdRng>> {
    difficulty: Difficulty,
    config: SessionConfig,
    state: SessionState,
    grid: Grid,
    rng: R,
    scheduler: Scheduler<Timer>,
    generation: u64,
    spawn_task: Option<TaskId>,
    countdown_task: Option<TaskId>,
    feedback_task: Option<TaskId>,
    last_outcome: Option<Outcome>,
    events: Vec<SessionEvent>,
}

impl<R: Randomness> SessionController<R> {
    pub fn new(difficulty: Difficulty, rng: R) -> Self {
        let config = difficulty.config();
        Self {
            difficulty,
            config,
            state: SessionState::idle(&config),
            grid: Grid::new(),
            rng,
            scheduler: Scheduler::new(),
            generation: 0,
            spawn_task: None,
            countdown_task: None,
            feedback_task: None,
            last_outcome: None,
            events: Vec::new(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    /// Virtual time elapsed since the controller was created
    pub fn clock(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of live timers (spawn, countdown, pending milestone clear)
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a session. Ignored while one is already running.
    pub fn start(&mut self, difficulty: Difficulty) {
        if self.state.active {
            log::debug!("start ignored: session already active");
            return;
        }

        self.cancel_all_timers();
        self.generation += 1;
        self.difficulty = difficulty;
        self.config = difficulty.config();
        self.state = SessionState::idle(&self.config);
        self.state.active = true;
        self.last_outcome = None;
        let cleared = self.grid.clear();
        self.emit_cells(cleared);

        self.spawn_task = Some(self.scheduler.schedule_repeating(
            Timer::Spawn,
            self.generation,
            self.config.spawn_interval(),
        ));
        self.countdown_task = Some(self.scheduler.schedule_repeating(
            Timer::Countdown,
            self.generation,
            COUNTDOWN_PERIOD,
        ));

        log::info!(
            "session started: {} (goal {}, {}s, spawn every {}ms)",
            difficulty,
            self.config.goal,
            self.config.time_limit_secs,
            self.config.spawn_interval_ms
        );
        self.events.push(SessionEvent::Started {
            goal: self.config.goal,
            time_limit: self.config.time_limit_secs,
        });
    }

    /// Stop everything and return to idle with the given tier's configuration.
    /// Safe to call at any time.
    pub fn reset(&mut self, difficulty: Difficulty) {
        self.cancel_all_timers();
        self.generation += 1;
        self.difficulty = difficulty;
        self.config = difficulty.config();
        self.state = SessionState::idle(&self.config);
        self.last_outcome = None;
        let cleared = self.grid.clear();
        self.emit_cells(cleared);

        log::info!("session reset to {}", difficulty);
        self.events.push(SessionEvent::Reset {
            goal: self.config.goal,
            time_limit: self.config.time_limit_secs,
        });
    }

    /// Player selected a cell. Returns what was collected, if anything.
    pub fn activate(&mut self, index: usize) -> Option<Occupant> {
        if !self.state.active {
            return None;
        }
        let occupant = self.grid.take(index)?;

        self.events.push(SessionEvent::CellChanged {
            index,
            occupant: Occupant::None,
        });

        match occupant {
            Occupant::Can => {
                self.state.score += 1;
                self.events.push(SessionEvent::ScoreChanged {
                    score: self.state.score,
                });
                self.evaluate_milestone();
            }
            Occupant::Rock => {
                self.state.score = self.state.score.saturating_sub(1);
                self.events.push(SessionEvent::ScoreChanged {
                    score: self.state.score,
                });
            }
            Occupant::None => {}
        }

        log::debug!(
            "activated cell {index}: {occupant:?}, score {}",
            self.state.score
        );
        Some(occupant)
    }

    /// Move the clock forward, running every timer that comes due on the way
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.on_timer(fired);
        }
    }

    fn on_timer(&mut self, fired: Fired<Timer>) {
        if fired.generation != self.generation {
            log::debug!("dropping stale {:?} timer", fired.kind);
            return;
        }

        match fired.kind {
            Timer::Spawn => self.spawn(),
            Timer::Countdown => self.countdown(),
            Timer::FeedbackClear => {
                self.feedback_task = None;
                if self.state.active {
                    self.events.push(SessionEvent::MilestoneCleared);
                }
            }
        }
    }

    fn spawn(&mut self) {
        if !self.state.active {
            return;
        }
        let changes = self.grid.spawn(&mut self.rng);
        if let Some(placed) = changes.last() {
            log::debug!("spawned {:?} at {}", placed.occupant, placed.index);
        }
        self.emit_cells(changes);
    }

    fn countdown(&mut self) {
        if !self.state.active {
            return;
        }
        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        let remaining = self.state.time_remaining;
        self.events.push(SessionEvent::Tick {
            time_remaining: remaining,
        });

        if LOW_TIME_WARNINGS.contains(&remaining) {
            self.events.push(SessionEvent::LowTimeWarning {
                seconds_left: remaining,
            });
        }

        if remaining == 0 {
            self.stop();
        }
    }

    fn evaluate_milestone(&mut self) {
        let Some(reached) = self
            .state
            .milestones
            .evaluate(self.state.score, &mut self.rng)
        else {
            return;
        };

        log::debug!("milestone {} reached", reached.threshold);
        if let Some(id) = self.feedback_task.take() {
            self.scheduler.cancel(id);
        }
        self.feedback_task = Some(self.scheduler.schedule_once(
            Timer::FeedbackClear,
            self.generation,
            MILESTONE_DISPLAY,
        ));
        self.events.push(SessionEvent::Milestone {
            threshold: reached.threshold,
            message: reached.message,
        });
    }

    /// End the running session and report the outcome
    fn stop(&mut self) {
        if !self.state.active {
            return;
        }
        self.state.active = false;
        self.cancel_all_timers();
        let cleared = self.grid.clear();
        self.emit_cells(cleared);

        let outcome = Outcome::from_score(self.state.score, self.config.goal);
        let messages = outcome.messages();
        let message = messages[self.rng.pick_index(messages.len())];
        self.last_outcome = Some(outcome);

        log::info!(
            "session ended: {:?} with {}/{}",
            outcome,
            self.state.score,
            self.config.goal
        );
        self.events.push(SessionEvent::Ended {
            outcome,
            final_score: self.state.score,
            message,
        });
    }

    fn cancel_all_timers(&mut self) {
        for id in [
            self.spawn_task.take(),
            self.countdown_task.take(),
            self.feedback_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.scheduler.cancel(id);
        }
    }

    fn emit_cells(&mut self, changes: Vec<CellChange>) {
        self.events
            .extend(changes.into_iter().map(|c| SessionEvent::CellChanged {
                index: c.index,
                occupant: c.occupant,
            }));
    }
}
