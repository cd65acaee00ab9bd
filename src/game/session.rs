use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    action::{Control, Direction},
    config::{Difficulty, GameConfig, GRID_COUNT, MIN_SPEED, POINTS_PER_LEVEL, POWER_UP_SCORE_INTERVAL},
    power_up::{PowerUp, PowerUpKind},
    snapshot::{GameSnapshot, SessionState},
    state::{Position, Snake},
};

/// One play session: the snake, the board items, scoring and the movement clock.
///
/// The host calls [`GameSession::update`] once per rendered frame with a
/// monotonic millisecond timestamp. The snake only advances when enough time
/// has passed for the current speed, so the simulation rate is independent of
/// the frame rate.
pub struct GameSession {
    snake: Snake,
    food: Position,
    power_up: Option<PowerUp>,
    score: u32,
    level: u32,
    difficulty: Option<Difficulty>,
    paused: bool,
    game_over: bool,
    /// Kind shown in the HUD until the next score increase
    active_power_up: Option<PowerUpKind>,
    last_move_ms: u64,
    /// Score seen by the previous update, for edge detection
    last_score: u32,
    rng: StdRng,
}

impl GameSession {
    /// Create a session. Without a preset difficulty it starts in the menu.
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut session = Self {
            snake: Snake::new(),
            food: Position::center(),
            power_up: None,
            score: 0,
            level: 1,
            difficulty: None,
            paused: false,
            game_over: false,
            active_power_up: None,
            last_move_ms: now_ms,
            last_score: 0,
            rng,
        };
        session.reset(now_ms);

        if let Some(difficulty) = config.difficulty {
            session.select_difficulty(difficulty, now_ms);
        }

        session
    }

    pub fn state(&self) -> SessionState {
        if self.difficulty.is_none() {
            SessionState::Menu
        } else if self.game_over {
            SessionState::GameOver
        } else if self.paused {
            SessionState::Paused
        } else {
            SessionState::Playing
        }
    }

    /// Leave the menu at the given difficulty. Ignored once a tier is set.
    pub fn select_difficulty(&mut self, difficulty: Difficulty, now_ms: u64) {
        if self.difficulty.is_some() {
            return;
        }

        info!(%difficulty, "difficulty selected");
        self.difficulty = Some(difficulty);
        self.reset(now_ms);
    }

    /// Start over, keeping the chosen difficulty
    pub fn reset(&mut self, now_ms: u64) {
        self.snake = Snake::new();
        self.power_up = None;
        self.food = self.snake.head();
        self.food = self.random_free_cell();
        self.score = 0;
        self.level = 1;
        self.paused = false;
        self.game_over = false;
        self.active_power_up = None;
        self.last_move_ms = now_ms;
        self.last_score = 0;

        debug!(food = ?self.food, "session reset");
    }

    pub fn toggle_pause(&mut self) {
        match self.state() {
            SessionState::Playing => self.paused = true,
            SessionState::Paused => self.paused = false,
            SessionState::Menu | SessionState::GameOver => {}
        }
    }

    /// Steer the snake; only honoured while playing
    pub fn handle_direction(&mut self, direction: Direction) {
        if self.state() == SessionState::Playing {
            self.snake.set_heading(direction);
        }
    }

    /// Apply a host command. `Quit` is left to the host.
    pub fn handle_control(&mut self, control: Control, now_ms: u64) {
        match control {
            Control::TogglePause => self.toggle_pause(),
            Control::Reset => {
                if self.difficulty.is_some() {
                    self.reset(now_ms);
                }
            }
            Control::Quit => {}
        }
    }

    /// Advance the simulation to `now_ms`
    pub fn update(&mut self, now_ms: u64) {
        if self.state() != SessionState::Playing {
            return;
        }

        if self.score > 0
            && self.score % POWER_UP_SCORE_INTERVAL == 0
            && self.power_up.is_none()
            && self.score != self.last_score
        {
            self.spawn_power_up();
        }

        // Effects last exactly until the next score increase
        if self.score > self.last_score && self.active_power_up.is_some() {
            self.expire_power_up();
        }

        self.last_score = self.score;

        let move_delay_ms = 1000.0 / self.current_speed();
        if now_ms.saturating_sub(self.last_move_ms) as f64 >= move_delay_ms {
            self.snake.advance();
            self.last_move_ms = now_ms;
        }

        if self.snake.collided_with_self() {
            self.game_over = true;
            info!(score = self.score, level = self.level, "game over");
            return;
        }

        let head = self.snake.head();

        if head == self.food {
            self.eat_food();
        }

        if let Some(power_up) = self.power_up {
            if head == power_up.position {
                self.collect_power_up(power_up);
            }
        }
    }

    /// Cells per second for the current difficulty, level and power-up
    pub fn current_speed(&self) -> f64 {
        let Some(difficulty) = self.difficulty else {
            return MIN_SPEED;
        };

        let speed = difficulty.base_speed() + difficulty.level_bonus(self.level);
        (speed * self.snake.speed_mult).max(MIN_SPEED)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state(),
            snake: self.snake.body.clone(),
            food: self.food,
            power_up: self.power_up,
            score: self.score,
            level: self.level,
            difficulty: self.difficulty,
            speed: self.current_speed(),
            active_power_up: self.active_power_up,
            paused: self.paused,
            game_over: self.game_over,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn power_up(&self) -> Option<PowerUp> {
        self.power_up
    }

    pub fn active_power_up(&self) -> Option<PowerUpKind> {
        self.active_power_up
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn eat_food(&mut self) {
        let gained = if self.snake.double_growth { 2 } else { 1 };
        let previous_level = self.level;

        self.score += gained;
        self.level = self.score / POINTS_PER_LEVEL + 1;
        // A single pending growth: double growth doubles the points, not the length
        self.snake.grow = true;
        self.snake.double_growth = false;
        self.food = self.random_free_cell();

        debug!(score = self.score, gained, food = ?self.food, "food eaten");
        if self.level != previous_level {
            info!(level = self.level, speed = self.current_speed(), "level up");
        }
    }

    fn spawn_power_up(&mut self) {
        let Some(difficulty) = self.difficulty else {
            return;
        };
        let Some(&kind) = difficulty.power_up_pool().choose(&mut self.rng) else {
            return;
        };

        let position = self.random_free_cell();
        self.power_up = Some(PowerUp::new(kind, position));

        debug!(%kind, ?position, score = self.score, "power-up spawned");
    }

    fn collect_power_up(&mut self, power_up: PowerUp) {
        self.active_power_up = Some(power_up.kind);

        match power_up.kind {
            PowerUpKind::HalfSpeed => self.snake.speed_mult = 0.5,
            PowerUpKind::DoubleSpeed => self.snake.speed_mult = 2.0,
            PowerUpKind::DoubleGrowth => self.snake.double_growth = true,
            PowerUpKind::Confusion => self.snake.confused = true,
        }
        self.power_up = None;

        debug!(kind = %power_up.kind, "power-up collected");
    }

    fn expire_power_up(&mut self) {
        self.snake.confused = false;
        self.snake.double_growth = false;
        self.snake.speed_mult = 1.0;

        if let Some(kind) = self.active_power_up.take() {
            debug!(%kind, "power-up expired");
        }
    }

    fn is_free(&self, pos: Position) -> bool {
        !self.snake.occupies(pos)
            && pos != self.food
            && self.power_up.map_or(true, |p| p.position != pos)
    }

    /// Uniformly random cell not covered by the snake, the food or a power-up
    fn random_free_cell(&mut self) -> Position {
        let cells = (GRID_COUNT * GRID_COUNT) as usize;
        let taken = self.snake.len() + 2;

        // Guessing is cheap until the board gets crowded
        if taken * 5 < cells * 4 {
            loop {
                let pos = Position::new(
                    self.rng.gen_range(0..GRID_COUNT),
                    self.rng.gen_range(0..GRID_COUNT),
                );
                if self.is_free(pos) {
                    return pos;
                }
            }
        }

        let free: Vec<Position> = (0..GRID_COUNT)
            .flat_map(|y| (0..GRID_COUNT).map(move |x| Position::new(x, y)))
            .filter(|&pos| self.is_free(pos))
            .collect();
        assert!(!free.is_empty(), "no free cell left on the grid");

        free[self.rng.gen_range(0..free.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(difficulty: Difficulty) -> GameSession {
        let config = GameConfig {
            difficulty: Some(difficulty),
            seed: Some(7),
            ..Default::default()
        };
        GameSession::new(&config, 0)
    }

    #[test]
    fn test_starts_in_menu() {
        let mut session = GameSession::new(&GameConfig::seeded(1), 0);
        assert_eq!(session.state(), SessionState::Menu);

        // Nothing moves or pauses before a difficulty is chosen
        let head = session.snake().head();
        session.update(10_000);
        session.toggle_pause();
        session.handle_control(Control::Reset, 10_000);
        assert_eq!(session.snake().head(), head);
        assert_eq!(session.state(), SessionState::Menu);

        session.select_difficulty(Difficulty::Expert, 10_000);
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.difficulty(), Some(Difficulty::Expert));
    }

    #[test]
    fn test_difficulty_is_chosen_once() {
        let mut session = playing(Difficulty::Beginner);
        session.select_difficulty(Difficulty::Expert, 0);
        assert_eq!(session.difficulty(), Some(Difficulty::Beginner));
    }

    #[test]
    fn test_initial_board() {
        let session = playing(Difficulty::Recommended);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.snake().len(), 1);
        assert_eq!(session.snake().head(), Position::center());
        assert!(!session.snake().occupies(session.food()));
        assert!(session.power_up().is_none());
    }

    #[test]
    fn test_speed_calculation() {
        let mut session = playing(Difficulty::Beginner);
        assert_eq!(session.current_speed(), 5.0);

        let mut session_expert = playing(Difficulty::Expert);
        assert_eq!(session_expert.current_speed(), 12.5);

        session_expert.level = 10;
        assert_eq!(session_expert.current_speed(), 17.0);

        session_expert.level = 100;
        assert_eq!(session_expert.current_speed(), 20.0);

        session.snake.speed_mult = 0.5;
        assert_eq!(session.current_speed(), 2.5);

        session.snake.speed_mult = 0.1;
        assert_eq!(session.current_speed(), MIN_SPEED);
    }

    #[test]
    fn test_movement_cadence() {
        // Beginner: 5 cells per second, one step every 200ms
        let mut session = playing(Difficulty::Beginner);
        session.food = Position::new(0, 0);
        let start = session.snake().head();

        session.update(16);
        session.update(199);
        assert_eq!(session.snake().head(), start);

        session.update(200);
        assert_eq!(session.snake().head(), Position::new(start.x + 1, start.y));

        session.update(350);
        assert_eq!(session.snake().head(), Position::new(start.x + 1, start.y));

        session.update(400);
        assert_eq!(session.snake().head(), Position::new(start.x + 2, start.y));
    }

    #[test]
    fn test_food_collision() {
        let mut session = playing(Difficulty::Recommended);
        session.snake = Snake::at(Position::new(5, 5));
        session.food = Position::new(5, 5);

        session.update(0);

        assert_eq!(session.score(), 1);
        assert!(session.snake().grow);
        assert_ne!(session.food(), Position::new(5, 5));
        assert!(!session.snake().occupies(session.food()));
    }

    #[test]
    fn test_level_calculation() {
        let mut session = playing(Difficulty::Expert);

        session.snake = Snake::at(Position::new(5, 5));
        session.food = Position::new(5, 5);
        session.score = 4;
        session.update(0);
        assert_eq!(session.level(), 2);

        session.snake = Snake::at(Position::new(6, 6));
        session.food = Position::new(6, 6);
        session.score = 9;
        session.update(0);
        assert_eq!(session.level(), 3);
    }

    #[test]
    fn test_double_growth_scores_two() {
        let mut session = playing(Difficulty::Recommended);
        session.snake = Snake::at(Position::new(5, 5));
        session.snake.double_growth = true;
        session.food = Position::new(5, 5);

        session.update(0);

        assert_eq!(session.score(), 2);
        assert!(session.snake().grow);
        assert!(!session.snake().double_growth);

        // One segment of growth on the next step
        session.food = Position::new(0, 0);
        session.update(1000);
        assert_eq!(session.snake().len(), 2);
    }

    #[test]
    fn test_power_up_effects() {
        let cases = [
            (PowerUpKind::HalfSpeed, 0.5, false, false),
            (PowerUpKind::DoubleSpeed, 2.0, false, false),
            (PowerUpKind::DoubleGrowth, 1.0, true, false),
            (PowerUpKind::Confusion, 1.0, false, true),
        ];

        for (kind, speed_mult, double_growth, confused) in cases {
            let mut session = playing(Difficulty::Recommended);
            session.snake = Snake::at(Position::new(5, 5));
            session.food = Position::new(0, 0);
            session.power_up = Some(PowerUp::new(kind, Position::new(5, 5)));

            session.update(0);

            assert_eq!(session.snake().speed_mult, speed_mult, "{kind}");
            assert_eq!(session.snake().double_growth, double_growth, "{kind}");
            assert_eq!(session.snake().confused, confused, "{kind}");
            assert_eq!(session.active_power_up(), Some(kind));
            assert!(session.power_up().is_none());
        }
    }

    #[test]
    fn test_power_up_duration() {
        let mut session = playing(Difficulty::Recommended);
        session.active_power_up = Some(PowerUpKind::HalfSpeed);
        session.snake.speed_mult = 0.5;
        session.score = 5;
        session.last_score = 4;

        session.update(0);

        assert!(session.active_power_up().is_none());
        assert_eq!(session.snake().speed_mult, 1.0);
    }

    #[test]
    fn test_effect_survives_until_score_changes() {
        let mut session = playing(Difficulty::Recommended);
        session.snake = Snake::at(Position::new(5, 5));
        session.food = Position::new(0, 0);
        session.power_up = Some(PowerUp::new(PowerUpKind::Confusion, Position::new(5, 5)));
        session.update(0);
        assert!(session.snake().confused);

        session.update(1);
        session.update(2);
        assert!(session.snake().confused);
        assert_eq!(session.active_power_up(), Some(PowerUpKind::Confusion));
    }

    #[test]
    fn test_power_up_spawns_once_per_multiple() {
        let mut session = playing(Difficulty::Recommended);
        session.food = Position::new(0, 0);
        session.score = 5;
        session.last_score = 4;

        session.update(0);
        let spawned = session.power_up().expect("power-up should spawn at score 5");
        assert_ne!(spawned.position, session.food());
        assert!(!session.snake().occupies(spawned.position));

        // Level-triggered spawning would bring a new one right back
        session.power_up = None;
        session.update(1);
        assert!(session.power_up().is_none());
    }

    #[test]
    fn test_no_power_up_at_zero() {
        let mut session = playing(Difficulty::Expert);
        session.food = Position::new(0, 0);
        session.update(0);
        assert!(session.power_up().is_none());
    }

    #[test]
    fn test_beginner_spawns_only_gentle_power_ups() {
        let mut session = playing(Difficulty::Beginner);
        for _ in 0..500 {
            session.power_up = None;
            session.spawn_power_up();
            let kind = session.power_up().map(|p| p.kind);
            assert!(matches!(
                kind,
                Some(PowerUpKind::HalfSpeed) | Some(PowerUpKind::DoubleGrowth)
            ));
        }
    }

    #[test]
    fn test_expert_spawns_every_kind() {
        let mut session = playing(Difficulty::Expert);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            session.power_up = None;
            session.spawn_power_up();
            if let Some(power_up) = session.power_up() {
                seen.insert(power_up.kind);
            }
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_game_over_collision() {
        let mut session = playing(Difficulty::Beginner);
        session.snake.body = vec![Position::new(5, 5), Position::new(6, 5), Position::new(5, 5)];
        session.food = Position::new(0, 0);

        session.update(0);

        assert!(session.is_game_over());
        assert_eq!(session.state(), SessionState::GameOver);

        // Frozen until reset
        let body = session.snake().body.clone();
        session.update(10_000);
        session.handle_direction(Direction::Up);
        session.toggle_pause();
        assert_eq!(session.snake().body, body);
        assert_eq!(session.state(), SessionState::GameOver);
    }

    #[test]
    fn test_collision_skips_food_check() {
        let mut session = playing(Difficulty::Beginner);
        session.snake.body = vec![Position::new(5, 5), Position::new(6, 5), Position::new(5, 5)];
        session.food = Position::new(5, 5);

        session.update(0);

        assert!(session.is_game_over());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_pause_toggle() {
        let mut session = playing(Difficulty::Beginner);
        session.food = Position::new(0, 0);
        let head = session.snake().head();

        session.handle_control(Control::TogglePause, 0);
        assert_eq!(session.state(), SessionState::Paused);
        assert!(session.is_paused());

        session.update(5_000);
        session.handle_direction(Direction::Up);
        assert_eq!(session.snake().head(), head);
        assert_eq!(session.snake().next_direction, Direction::Right);

        session.handle_control(Control::TogglePause, 5_000);
        assert_eq!(session.state(), SessionState::Playing);
        assert!(!session.is_paused());
    }

    #[test]
    fn test_confused_input() {
        let mut session = playing(Difficulty::Expert);
        session.snake.confused = true;
        session.handle_direction(Direction::Up);
        assert_eq!(session.snake().next_direction, Direction::Down);
    }

    #[test]
    fn test_game_reset() {
        let mut session = playing(Difficulty::Expert);
        session.score = 10;
        session.level = 3;
        session.snake.body = vec![Position::new(5, 5), Position::new(6, 5), Position::new(7, 5)];
        session.active_power_up = Some(PowerUpKind::Confusion);
        session.snake.confused = true;
        session.game_over = true;

        session.handle_control(Control::Reset, 500);

        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.snake().len(), 1);
        assert_eq!(session.difficulty(), Some(Difficulty::Expert));
        assert!(session.active_power_up().is_none());
        assert!(!session.snake().confused);
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = playing(Difficulty::Recommended);
        session.score = 7;

        session.reset(100);
        let once = session.snapshot();
        session.reset(100);
        let twice = session.snapshot();

        assert_eq!(once.score, twice.score);
        assert_eq!(once.level, twice.level);
        assert_eq!(once.snake, twice.snake);
        assert_eq!(once.difficulty, twice.difficulty);
        assert_eq!(once.state, twice.state);
        assert_eq!(once.power_up, twice.power_up);
        assert_eq!(once.active_power_up, twice.active_power_up);
    }

    #[test]
    fn test_free_cell_on_crowded_board() {
        let mut session = playing(Difficulty::Recommended);
        let mut body: Vec<Position> = (0..GRID_COUNT)
            .flat_map(|y| (0..GRID_COUNT).map(move |x| Position::new(x, y)))
            .collect();
        let last = body.pop().expect("grid has cells");
        session.snake.body = body;
        session.food = Position::new(0, 0);

        assert_eq!(session.random_free_cell(), last);
    }

    #[test]
    fn test_food_avoids_pending_power_up() {
        // Two cells left: one holds the power-up, so the food must take the other
        let mut session = playing(Difficulty::Recommended);
        let power_up_cell = Position::new(GRID_COUNT - 1, GRID_COUNT - 1);
        let open_cell = Position::new(GRID_COUNT - 2, GRID_COUNT - 1);
        let body: Vec<Position> = (0..GRID_COUNT)
            .flat_map(|y| (0..GRID_COUNT).map(move |x| Position::new(x, y)))
            .filter(|&pos| pos != power_up_cell && pos != open_cell)
            .collect();
        let head = body[0];
        session.snake.body = body;
        session.food = head;
        session.power_up = Some(PowerUp::new(PowerUpKind::HalfSpeed, power_up_cell));

        session.update(0);

        assert_eq!(session.score(), 1);
        assert_eq!(session.food(), open_cell);
        assert_eq!(session.power_up().map(|p| p.position), Some(power_up_cell));
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let mut session = playing(Difficulty::Expert);
        session.active_power_up = Some(PowerUpKind::DoubleGrowth);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, SessionState::Playing);
        assert_eq!(snapshot.head(), Some(Position::center()));
        assert_eq!(snapshot.food, session.food());
        assert_eq!(snapshot.speed, 12.5);
        assert_eq!(snapshot.difficulty_label(), "Expert");
        assert_eq!(snapshot.active_power_up_label(), Some("x2"));
        assert!(!snapshot.paused);
        assert!(!snapshot.game_over);

        let json = serde_json::to_value(&snapshot).expect("snapshot serializes");
        assert_eq!(json["score"], 0);
        assert_eq!(json["difficulty"], "Expert");
    }
}
