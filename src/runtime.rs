use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Interval between runner steps when no input arrives
pub const TICK_RATE_MS: u64 = 100;

/// Everything the front-end loop reacts to
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Where input events come from
pub trait GameEventSource: Send + 'static {
    /// Wait up to `timeout` for the next event; `Err(Timeout)` when none arrived.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Reads the real terminal on a background thread
pub struct TerminalEventSource {
    rx: Receiver<GameEvent>,
}

impl TerminalEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // Only presses; release/repeat would double-activate cells on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(GameEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => Some(GameEvent::Resize),
                Ok(_) => None,
                Err(err) => {
                    log::warn!("terminal input closed: {err}");
                    break;
                }
            };
            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for TerminalEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for TerminalEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for headless tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Hands the game loop one event at a time, synthesising `Tick` when input is quiet
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn step(&self) -> GameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GameEvent::Tick,
        }
    }
}

/// Source of elapsed time between runner steps
pub trait Clock {
    /// Time since the previous call (zero on the first call)
    fn lap(&mut self) -> Duration;
}

/// Wall clock used by the terminal front end
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Option<Instant>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for MonotonicClock {
    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        elapsed
    }
}

/// Reports the same step on every lap, for headless tests
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    step: Duration,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl Clock for ManualClock {
    fn lap(&mut self) -> Duration {
        self.step
    }
}
