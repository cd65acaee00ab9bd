use std::time::{Duration, Instant};

/// Per-process play statistics. Nothing here outlives the process.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub best_level: u32,
    pub games_played: u32,
    /// Set once the current run has been counted
    finished: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            best_level: 0,
            games_played: 0,
            finished: false,
        }
    }

    /// Refresh the run timer; it stops once the run has ended
    pub fn update(&mut self) {
        if !self.finished {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.finished = false;
    }

    /// Record a finished run. Repeated calls for the same run are ignored.
    pub fn on_game_over(&mut self, final_score: u32, final_level: u32) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
        self.best_level = self.best_level.max(final_level);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
