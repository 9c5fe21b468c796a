use std::time::Duration;

use rand::rngs::StdRng;

use crate::difficulty::Difficulty;
use crate::events::{SessionEvent, SessionObserver};
use crate::grid::CELL_COUNT;
use crate::input::{move_cursor, Action};
use crate::random::{Randomness, RngRandomness};
use crate::session::{Outcome, SessionController};

/// Transient message shown under the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Milestone(&'static str),
    Finished {
        outcome: Outcome,
        final_score: u32,
        message: &'static str,
    },
}

/// Front-end state around one [`SessionController`]: tier selection,
/// keyboard cursor, and the feedback line. Views read it, never the controller directly.
pub struct App<R: Randomness = RngRandomness<StdRng>> {
    pub session: SessionController<R>,
    /// Tier used by the next start/reset
    pub selected: Difficulty,
    pub cursor: usize,
    pub feedback: Option<Feedback>,
    pub should_quit: bool,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<R: Randomness> App<R> {
    pub fn new(difficulty: Difficulty, rng: R) -> Self {
        Self {
            session: SessionController::new(difficulty, rng),
            selected: difficulty,
            cursor: CELL_COUNT / 2,
            feedback: None,
            should_quit: false,
            observers: Vec::new(),
        }
    }

    /// Register a collaborator that receives every session event
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Start => self.session.start(self.selected),
            Action::Reset => self.session.reset(self.selected),
            Action::Activate(index) => {
                self.cursor = index.min(CELL_COUNT - 1);
                self.session.activate(index);
            }
            Action::Select => {
                if self.session.is_active() {
                    self.session.activate(self.cursor);
                } else {
                    self.session.start(self.selected);
                }
            }
            Action::Move(direction) => self.cursor = move_cursor(self.cursor, direction),
            Action::CycleDifficulty => self.selected = self.selected.next(),
        }
        self.pump();
    }

    /// Let `elapsed` of game time pass
    pub fn on_tick(&mut self, elapsed: Duration) {
        self.session.advance(elapsed);
        self.pump();
    }

    fn pump(&mut self) {
        for event in self.session.drain_events() {
            self.apply(&event);
            for observer in self.observers.iter_mut() {
                observer.notify(&event);
            }
        }
    }

    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Started { .. } | SessionEvent::Reset { .. } => self.feedback = None,
            SessionEvent::Milestone { message, .. } => {
                self.feedback = Some(Feedback::Milestone(*message))
            }
            SessionEvent::MilestoneCleared => {
                if matches!(self.feedback, Some(Feedback::Milestone(_))) {
                    self.feedback = None;
                }
            }
            SessionEvent::Ended {
                outcome,
                final_score,
                message,
            } => {
                self.feedback = Some(Feedback::Finished {
                    outcome: *outcome,
                    final_score: *final_score,
                    message: *message,
                })
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Occupant;
    use crate::input::Direction;
    use crate::random::ScriptedRandomness;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Shared(Rc<RefCell<Vec<SessionEvent>>>);

    impl SessionObserver for Shared {
        fn notify(&mut self, event: &SessionEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn app() -> App<ScriptedRandomness> {
        App::new(Difficulty::Normal, ScriptedRandomness::new())
    }

    #[test]
    fn select_starts_when_idle_then_activates_cursor() {
        let mut app = app();
        app.cursor = 0;
        app.handle(Action::Select);
        assert!(app.session.is_active());

        app.on_tick(Duration::from_secs(1));
        assert_eq!(app.session.grid().get(0), Some(Occupant::Can));
        app.handle(Action::Select);
        assert_eq!(app.session.state().score, 1);
    }

    #[test]
    fn digit_activation_moves_cursor() {
        let mut app = app();
        app.handle(Action::Start);
        app.handle(Action::Activate(7));
        assert_eq!(app.cursor, 7);
        app.handle(Action::Move(Direction::Up));
        assert_eq!(app.cursor, 4);
    }

    #[test]
    fn difficulty_change_waits_for_next_start() {
        let mut app = app();
        app.handle(Action::Start);
        app.handle(Action::CycleDifficulty);
        assert_eq!(app.selected, Difficulty::Hard);
        assert_eq!(app.session.difficulty(), Difficulty::Normal);

        app.handle(Action::Reset);
        assert_eq!(app.session.difficulty(), Difficulty::Hard);
        assert_eq!(app.session.state().time_remaining, 25);
    }

    #[test]
    fn milestone_feedback_shows_then_clears() {
        let mut app = app();
        app.cursor = 0;
        app.handle(Action::Start);
        for _ in 0..5 {
            app.on_tick(Duration::from_secs(1));
            app.handle(Action::Select);
        }
        assert_matches::assert_matches!(app.feedback, Some(Feedback::Milestone(_)));
        app.on_tick(Duration::from_secs(2));
        assert_eq!(app.feedback, None);
    }

    #[test]
    fn end_of_session_leaves_outcome_feedback() {
        let mut app = app();
        app.handle(Action::Start);
        app.on_tick(Duration::from_secs(30));
        assert!(!app.session.is_active());
        assert_matches::assert_matches!(
            app.feedback,
            Some(Feedback::Finished {
                outcome: Outcome::Lose,
                final_score: 0,
                ..
            })
        );
    }

    #[test]
    fn observers_see_every_event() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut app = app().with_observer(Box::new(Shared(Rc::clone(&seen))));
        app.handle(Action::Start);
        app.on_tick(Duration::from_secs(1));
        let seen = seen.borrow();
        assert_matches::assert_matches!(seen.first(), Some(SessionEvent::Started { .. }));
        assert!(seen
            .iter()
            .any(|e| matches!(e, SessionEvent::Tick { time_remaining: 29 })));
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = app();
        app.handle(Action::Quit);
        assert!(app.should_quit);
    }
}
