use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ruleset variant
///
/// The three variants share movement, food, and scoring; they differ in
/// whether leveling (obstacles + speed-up) and timed bonus food are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameVariant {
    /// Food and score only, constant speed
    Classic,
    /// Adds levels: obstacles appear and the game speeds up
    Progressive,
    /// Progressive plus a time-limited bonus food
    Bonus,
}

impl GameVariant {
    /// Whether eating food can trigger level-ups (obstacles, speed scaling)
    pub fn has_levels(&self) -> bool {
        !matches!(self, GameVariant::Classic)
    }

    /// Whether timed bonus food can spawn
    pub fn has_bonus_food(&self) -> bool {
        matches!(self, GameVariant::Bonus)
    }
}

/// Configuration for a game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Active ruleset
    pub variant: GameVariant,
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Points awarded per food
    pub food_points: u32,
    /// Points awarded per bonus food
    pub bonus_points: u32,
    /// Foods to eat per level-up
    pub foods_per_level: u32,
    /// A bonus food spawns every this many foods (when none is active)
    pub bonus_food_every: u32,
    /// Ticks a bonus food stays on the grid
    pub bonus_lifetime_ticks: u32,

    /// Tick interval at level 1, in milliseconds
    pub base_tick_ms: u64,
    /// Interval reduction per level, in milliseconds
    pub tick_speedup_per_level_ms: u64,
    /// Interval never drops below this, in milliseconds
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: GameVariant::Classic,
            grid_width: 25,
            grid_height: 25,
            initial_snake_length: 1,
            food_points: 10,
            bonus_points: 25,
            foods_per_level: 5,
            bonus_food_every: 3,
            bonus_lifetime_ticks: 30,
            base_tick_ms: 160,
            tick_speedup_per_level_ms: 10,
            min_tick_ms: 60,
        }
    }
}

impl GameConfig {
    /// Create a configuration for a variant with a custom grid size
    pub fn new(variant: GameVariant, width: usize, height: usize) -> Self {
        Self {
            variant,
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Classic rules on the default grid
    pub fn classic() -> Self {
        Self::default()
    }

    /// Progressive rules on the default grid
    pub fn progressive() -> Self {
        Self {
            variant: GameVariant::Progressive,
            ..Default::default()
        }
    }

    /// Bonus rules on the default grid
    pub fn bonus() -> Self {
        Self {
            variant: GameVariant::Bonus,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small(variant: GameVariant) -> Self {
        Self::new(variant, 10, 10)
    }

    /// Tick interval at the given level
    ///
    /// Shrinks linearly per level and clamps at `min_tick_ms`. Classic games
    /// stay at level 1, so their interval is constant.
    pub fn tick_interval(&self, level: u32) -> Duration {
        let speedup = self.tick_speedup_per_level_ms * u64::from(level.saturating_sub(1));
        let ms = self.base_tick_ms.saturating_sub(speedup).max(self.min_tick_ms);
        Duration::from_millis(ms)
    }
}
