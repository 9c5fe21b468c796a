// Library surface for headless/integration tests; the binary only adds the terminal.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod events;
pub mod grid;
pub mod input;
pub mod milestones;
pub mod random;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod sound;
pub mod ui;

pub use difficulty::{Difficulty, SessionConfig};
pub use error::GameError;
pub use events::SessionEvent;
pub use session::{Outcome, SessionController};
