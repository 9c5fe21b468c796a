use canrun::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    input::action_for,
    random::RngRandomness,
    runtime::{Clock, FixedTicker, GameEvent, MonotonicClock, Runner, TerminalEventSource},
    sound::Chime,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
};

/// timed water-can catching game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Grab the water cans that pop up on a 3x3 grid, dodge the rocks, and reach the goal before the clock runs out."
)]
pub struct Cli {
    /// difficulty tier for the first game (defaults to the last one you played)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seed the random source for a reproducible game
    #[clap(long)]
    seed: Option<u64>,

    /// ring the terminal bell on can pickups, milestones, low time and game over
    #[clap(long)]
    sound: bool,

    /// do not remember difficulty changes made in the game
    #[clap(long)]
    no_save: bool,
}

impl Cli {
    /// Merge command line flags over stored preferences
    fn to_config(&self, stored: &Config) -> Config {
        Config {
            difficulty: self.difficulty.unwrap_or(stored.difficulty),
            sound: self.sound || stored.sound,
        }
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let stored = store.load();
    let config = cli.to_config(&stored);

    let rng = match cli.seed {
        Some(seed) => RngRandomness::seeded(seed),
        None => RngRandomness::from_entropy(),
    };
    let mut app = App::new(config.difficulty, rng);
    if config.sound {
        app = app.with_observer(Box::new(Chime::new(io::stdout())));
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if !cli.no_save {
        let updated = Config {
            difficulty: app.selected,
            ..config
        };
        if updated != stored {
            if let Err(err) = store.save(&updated) {
                log::warn!("could not save preferences to {}: {err}", store.path().display());
            }
        }
    }

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(TerminalEventSource::new(), FixedTicker::default());
    let mut clock = MonotonicClock::new();
    clock.lap();

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        let event = runner.step();
        app.on_tick(clock.lap());

        match event {
            GameEvent::Key(key) => {
                if let Some(action) = action_for(key) {
                    app.handle(action);
                }
            }
            GameEvent::Resize | GameEvent::Tick => {}
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["canrun"]);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.seed, None);
        assert!(!cli.sound);
        assert!(!cli.no_save);
    }

    #[test]
    fn cli_difficulty_flag() {
        let cli = Cli::parse_from(["canrun", "-d", "hard"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));

        let cli = Cli::parse_from(["canrun", "--difficulty", "easy"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn cli_rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["canrun", "-d", "nightmare"]).is_err());
    }

    #[test]
    fn cli_seed_and_switches() {
        let cli = Cli::parse_from(["canrun", "--seed", "42", "--sound", "--no-save"]);
        assert_eq!(cli.seed, Some(42));
        assert!(cli.sound);
        assert!(cli.no_save);
    }

    #[test]
    fn flags_override_stored_preferences() {
        let stored = Config {
            difficulty: Difficulty::Easy,
            sound: false,
        };
        let cli = Cli::parse_from(["canrun"]);
        assert_eq!(cli.to_config(&stored), stored);

        let cli = Cli::parse_from(["canrun", "-d", "hard", "--sound"]);
        assert_eq!(
            cli.to_config(&stored),
            Config {
                difficulty: Difficulty::Hard,
                sound: true
            }
        );
    }
}
