use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Feedback},
    grid::{Occupant, GRID_SIZE},
    random::Randomness,
    session::Outcome,
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const CELL_HEIGHT: u16 = 3;

const CAN_LABEL: &str = "CAN";
const ROCK_LABEL: &str = "ROCK";

fn cell_width() -> u16 {
    // room for the widest label, its cell number and the borders
    let widest = CAN_LABEL.width().max(ROCK_LABEL.width()) as u16;
    widest + 6
}

impl<R: Randomness> Widget for &App<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let grid_height = CELL_HEIGHT * GRID_SIZE as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),           // title
                Constraint::Length(1),           // hud
                Constraint::Length(1),           // padding
                Constraint::Length(grid_height), // grid
                Constraint::Length(1),           // padding
                Constraint::Min(1),              // feedback
                Constraint::Length(1),           // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "Bring water to the village",
            bold_style.fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let state = session.state();
        let config = session.config();
        let timer_style = if session.is_active() && state.time_remaining <= 5 {
            bold_style.fg(Color::Red)
        } else if session.is_active() && state.time_remaining <= 10 {
            bold_style.fg(Color::Yellow)
        } else {
            bold_style
        };
        let hud = Line::from(vec![
            Span::styled(format!("cans {}/{}", state.score, config.goal), bold_style),
            Span::raw("   "),
            Span::styled(format!("{}s", state.time_remaining), timer_style),
            Span::raw("   "),
            Span::styled(format!("{}", session.difficulty()), dim_style),
        ]);
        Paragraph::new(hud)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        render_grid(self, chunks[3], buf);

        if let Some(feedback) = &self.feedback {
            let (text, style) = match feedback {
                Feedback::Milestone(message) => {
                    (message.to_string(), bold_style.fg(Color::Magenta))
                }
                Feedback::Finished {
                    outcome,
                    final_score,
                    message,
                } => {
                    let color = match outcome {
                        Outcome::Win => Color::Green,
                        Outcome::Lose => Color::Red,
                    };
                    (
                        format!("{message} ({final_score} cans)"),
                        bold_style.fg(color),
                    )
                }
            };
            Paragraph::new(Span::styled(text, style))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[5], buf);
        }

        let legend = if session.is_active() {
            "(1-9) grab / (arrows) move / (enter) grab / (r)eset / (esc)ape".to_string()
        } else {
            format!(
                "(s)tart / (d)ifficulty: {} / (r)eset / (esc)ape",
                self.selected
            )
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}

fn render_grid<R: Randomness>(app: &App<R>, area: Rect, buf: &mut Buffer) {
    let width = cell_width() * GRID_SIZE as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let grid_area = Rect::new(x, area.y, width.min(area.width), area.height);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CELL_HEIGHT); GRID_SIZE])
        .split(grid_area);

    let cells = app.session.grid().cells();
    for (row, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(cell_width()); GRID_SIZE])
            .split(*row_area);

        for (col, cell_area) in cols.iter().enumerate() {
            let index = row * GRID_SIZE + col;
            let (label, style) = match cells[index] {
                Occupant::Can => (CAN_LABEL, Style::default().fg(Color::Blue)),
                Occupant::Rock => (ROCK_LABEL, Style::default().fg(Color::DarkGray)),
                Occupant::None => ("", Style::default()),
            };

            let border_style = if index == app.cursor && app.session.is_active() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(Span::styled(
                    (index + 1).to_string(),
                    Style::default().add_modifier(Modifier::DIM),
                ));

            Paragraph::new(Span::styled(label, style.add_modifier(Modifier::BOLD)))
                .alignment(Alignment::Center)
                .block(block)
                .render(*cell_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::input::Action;
    use crate::random::ScriptedRandomness;
    use std::time::Duration;

    fn render_to_string<R: Randomness>(app: &App<R>, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn idle_screen_shows_difficulty_and_prompt() {
        let app = App::new(Difficulty::Easy, ScriptedRandomness::new());
        let rendered = render_to_string(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("cans 0/15"));
        assert!(rendered.contains("40s"));
        assert!(rendered.contains("(s)tart"));
    }

    #[test]
    fn spawned_can_is_drawn() {
        let mut app = App::new(
            Difficulty::Normal,
            ScriptedRandomness::new().with_indices([4]),
        );
        app.handle(Action::Start);
        app.on_tick(Duration::from_secs(1));
        let rendered = render_to_string(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains(CAN_LABEL));
        assert!(rendered.contains("29s"));
    }

    #[test]
    fn outcome_message_is_drawn_after_the_session() {
        let mut app = App::new(Difficulty::Normal, ScriptedRandomness::new());
        app.handle(Action::Start);
        app.on_tick(Duration::from_secs(30));
        let rendered = render_to_string(&app, Rect::new(0, 0, 100, 24));
        assert!(rendered.contains("(0 cans)"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let app = App::new(Difficulty::Normal, ScriptedRandomness::new());
        let _ = render_to_string(&app, Rect::new(0, 0, 10, 4));
    }
}
