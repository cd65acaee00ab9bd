use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::game::{Control, Difficulty, Direction, GameConfig, GameSession, SessionState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

pub struct HumanMode {
    config: GameConfig,
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Origin of the millisecond clock handed to the session
    clock: Instant,
    /// Menu entry under the cursor
    highlighted: Difficulty,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let session = GameSession::new(&config, 0);

        Self {
            config,
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            clock: Instant::now(),
            highlighted: Difficulty::Recommended,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            best_score = self.metrics.best_score,
            best_level = self.metrics.best_level,
            "leaving game"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One simulation update per rendered frame; the session decides
        // whether the snake actually moves.
        let mut frame_timer = interval(Duration::from_millis(self.config.frame_millis()));
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(error)) => {
                            return Err(error).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Simulate and render
                _ = frame_timer.tick() => {
                    self.update_game();
                    self.metrics.update();
                    let snapshot = self.session.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, self.highlighted);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        let now = self.now_ms();

        if self.session.state() == SessionState::Menu {
            match action {
                KeyAction::Move(Direction::Up) => self.highlighted = self.step_highlight(-1),
                KeyAction::Move(Direction::Down) => self.highlighted = self.step_highlight(1),
                KeyAction::Confirm => self.start(self.highlighted, now),
                KeyAction::Select(difficulty) => self.start(difficulty, now),
                KeyAction::Control(Control::Quit) => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match action {
            KeyAction::Move(direction) => self.session.handle_direction(direction),
            KeyAction::Control(Control::Quit) => self.should_quit = true,
            KeyAction::Control(Control::Reset) => {
                // An abandoned run still counts; a finished one is already recorded
                self.metrics
                    .on_game_over(self.session.score(), self.session.level());
                self.session.handle_control(Control::Reset, now);
                self.metrics.on_game_start();
            }
            KeyAction::Control(control) => self.session.handle_control(control, now),
            KeyAction::Select(_) | KeyAction::Confirm | KeyAction::None => {}
        }
    }

    fn step_highlight(&self, offset: isize) -> Difficulty {
        let all = Difficulty::ALL;
        let current = all
            .iter()
            .position(|d| *d == self.highlighted)
            .unwrap_or(0) as isize;
        let next = (current + offset).rem_euclid(all.len() as isize) as usize;
        all[next]
    }

    fn start(&mut self, difficulty: Difficulty, now_ms: u64) {
        self.session.select_difficulty(difficulty, now_ms);
        self.metrics.on_game_start();
    }

    fn update_game(&mut self) {
        self.session.update(self.now_ms());

        // Track game over
        if self.session.is_game_over() {
            self.metrics
                .on_game_over(self.session.score(), self.session.level());
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
