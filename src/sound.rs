use std::io::Write;

use crate::events::{SessionEvent, SessionObserver};

const BELL: &[u8] = b"\x07";

/// Rings the terminal bell on can pickups, milestones, low-time warnings
/// and the final whistle.
///
/// Write errors are logged and dropped; the game carries on silently.
pub struct Chime<W: Write> {
    out: W,
    failed: bool,
    /// Last score seen, so a rise (a can) can be told from a rock
    score: u32,
}

impl<W: Write> Chime<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            failed: false,
            score: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self) {
        if self.failed {
            return;
        }
        if let Err(err) = self.out.write_all(BELL).and_then(|_| self.out.flush()) {
            log::warn!("sound disabled: {err}");
            self.failed = true;
        }
    }
}

impl<W: Write> SessionObserver for Chime<W> {
    fn notify(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Started { .. } | SessionEvent::Reset { .. } => self.score = 0,
            SessionEvent::ScoreChanged { score } => {
                let picked_up = *score > self.score;
                self.score = *score;
                if picked_up {
                    self.ring();
                }
            }
            SessionEvent::Milestone { .. }
            | SessionEvent::LowTimeWarning { .. }
            | SessionEvent::Ended { .. } => self.ring(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Outcome;
    use std::io;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "no audio"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rings_on_notable_events_only() {
        let mut chime = Chime::new(Vec::new());
        chime.notify(&SessionEvent::Tick { time_remaining: 12 });
        chime.notify(&SessionEvent::LowTimeWarning { seconds_left: 5 });
        chime.notify(&SessionEvent::Ended {
            outcome: Outcome::Win,
            final_score: 20,
            message: "ok",
        });
        assert_eq!(chime.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn rings_on_can_pickup_but_not_on_rock() {
        let mut chime = Chime::new(Vec::new());
        chime.notify(&SessionEvent::ScoreChanged { score: 1 });
        assert_eq!(chime.out, b"\x07".to_vec());

        // rock
        chime.notify(&SessionEvent::ScoreChanged { score: 0 });
        // rock at zero
        chime.notify(&SessionEvent::ScoreChanged { score: 0 });
        assert_eq!(chime.out, b"\x07".to_vec());

        chime.notify(&SessionEvent::ScoreChanged { score: 1 });
        assert_eq!(chime.out, b"\x07\x07".to_vec());
    }

    #[test]
    fn new_session_starts_counting_from_zero() {
        let mut chime = Chime::new(Vec::new());
        chime.notify(&SessionEvent::ScoreChanged { score: 3 });
        chime.notify(&SessionEvent::Reset {
            goal: 20,
            time_limit: 30,
        });
        chime.notify(&SessionEvent::Started {
            goal: 20,
            time_limit: 30,
        });
        chime.notify(&SessionEvent::ScoreChanged { score: 1 });
        assert_eq!(chime.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn write_failures_are_swallowed() {
        let mut chime = Chime::new(Broken);
        chime.notify(&SessionEvent::LowTimeWarning { seconds_left: 10 });
        chime.notify(&SessionEvent::LowTimeWarning { seconds_left: 5 });
        assert!(chime.failed);
    }
}
