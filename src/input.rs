use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::grid::{CELL_COUNT, GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Reset,
    /// Activate a cell by number (0-based)
    Activate(usize),
    /// Enter/Space: start when idle, activate the cursor cell when playing
    Select,
    Move(Direction),
    CycleDifficulty,
    Quit,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Select),
        KeyCode::Char('s') => Some(Action::Start),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('d') => Some(Action::CycleDifficulty),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(Direction::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(Direction::Right)),
        KeyCode::Char(c @ '1'..='9') => Some(Action::Activate(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Move a grid cursor one step, clamped at the edges
pub fn move_cursor(cursor: usize, direction: Direction) -> usize {
    let (row, col) = (cursor / GRID_SIZE, cursor % GRID_SIZE);
    let (row, col) = match direction {
        Direction::Up => (row.saturating_sub(1), col),
        Direction::Down => ((row + 1).min(GRID_SIZE - 1), col),
        Direction::Left => (row, col.saturating_sub(1)),
        Direction::Right => (row, (col + 1).min(GRID_SIZE - 1)),
    };
    (row * GRID_SIZE + col).min(CELL_COUNT - 1)
}
