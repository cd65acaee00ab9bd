use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::game::{Difficulty, GameSnapshot, Position, SessionState, GRID_COUNT};
use crate::metrics::GameMetrics;

/// Columns taken by the stats panel
const HUD_WIDTH: u16 = 26;
/// Two columns per cell plus the border
const BOARD_WIDTH: u16 = GRID_COUNT as u16 * 2 + 2;
const BOARD_HEIGHT: u16 = GRID_COUNT as u16 + 2;

/// Smallest terminal that shows the whole board next to the stats panel
pub const MIN_WIDTH: u16 = HUD_WIDTH + BOARD_WIDTH;
pub const MIN_HEIGHT: u16 = BOARD_HEIGHT;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame. `highlighted` is the menu entry under the cursor.
    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &GameSnapshot,
        metrics: &GameMetrics,
        highlighted: Difficulty,
    ) {
        if snapshot.state == SessionState::Menu {
            let menu = self.render_menu(highlighted);
            frame.render_widget(menu, frame.area());
            return;
        }

        let area = frame.area();
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let notice = self.render_too_small(area);
            frame.render_widget(notice, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(HUD_WIDTH), // HUD
                Constraint::Min(0),            // Board
            ])
            .split(area);

        let hud = self.render_hud(snapshot, metrics);
        frame.render_widget(hud, chunks[0]);

        let grid = self.render_grid(snapshot);
        frame.render_widget(grid, chunks[1]);

        match snapshot.state {
            SessionState::Paused => {
                let area = centered(chunks[1], 30, 6);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_paused(), area);
            }
            SessionState::GameOver => {
                let area = centered(chunks[1], 36, 8);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_game_over(snapshot, metrics), area);
            }
            SessionState::Menu | SessionState::Playing => {}
        }
    }

    fn render_too_small(&self, area: Rect) -> Paragraph<'_> {
        let mut lines = vec![Line::from(""); (area.height.saturating_sub(2) / 2) as usize];
        lines.push(Line::from(Span::styled(
            "Terminal too small",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!(
            "need {}x{}, have {}x{}",
            MIN_WIDTH, MIN_HEIGHT, area.width, area.height
        )));

        Paragraph::new(lines).alignment(Alignment::Center)
    }

    fn render_menu(&self, highlighted: Difficulty) -> Paragraph<'_> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Snake Game",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (index, difficulty) in Difficulty::ALL.iter().enumerate() {
            let style = if *difficulty == highlighted {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Gray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!(" {}. {:<12} ", index + 1, difficulty.label()),
                style,
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled("↑↓", Style::default().fg(Color::Cyan)),
            Span::raw(" + "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("1-3", Style::default().fg(Color::Cyan)),
            Span::raw(" to choose | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]));

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Difficulty "),
        )
    }

    fn render_grid(&self, snapshot: &GameSnapshot) -> Paragraph<'_> {
        let head = snapshot.head();
        let power_up = snapshot.power_up.map(|p| p.position);
        let mut lines = Vec::with_capacity(GRID_COUNT as usize);

        for y in 0..GRID_COUNT {
            let mut spans = Vec::with_capacity(GRID_COUNT as usize);

            for x in 0..GRID_COUNT {
                let pos = Position::new(x, y);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("■ ", Style::default().fg(Color::LightGreen))
                } else if pos == snapshot.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if Some(pos) == power_up {
                    Span::styled(
                        "? ",
                        Style::default()
                            .fg(Color::White)
                            .bg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("  ", Style::default())
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_hud(&self, snapshot: &GameSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(snapshot.score.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Level: ", label),
                Span::styled(snapshot.level.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Difficulty: ", label),
                Span::styled(snapshot.difficulty_label(), value),
            ]),
            Line::from(vec![
                Span::styled("Speed: ", label),
                Span::styled(format!("{:.1}", snapshot.speed), value),
            ]),
        ];

        if let Some(active) = snapshot.active_power_up_label() {
            lines.push(Line::from(vec![
                Span::styled("Power-up: ", Style::default().fg(Color::Blue)),
                Span::styled(active, Style::default().fg(Color::Blue)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Time: ", label),
            Span::raw(metrics.format_time()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Best: ", label),
            Span::raw(metrics.best_score.to_string()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("WASD/↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" move"),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Esc/P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause"),
        ]));
        lines.push(Line::from(vec![
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart  "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]));

        Paragraph::new(lines).block(Block::default().borders(Borders::ALL))
    }

    fn render_paused(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press R to restart"),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, snapshot: &GameSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  (best {})", metrics.best_score),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
