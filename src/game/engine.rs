use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{BonusFood, CollisionType, GameState, Position, Snake},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the game has ended (either on this step or earlier)
    pub terminated: bool,
    /// Whether the snake ate regular food this step
    pub ate_food: bool,
    /// Whether the snake ate the bonus food this step
    pub ate_bonus: bool,
    /// Whether this step crossed a level boundary; the tick interval should
    /// be recomputed when this is set
    pub leveled_up: bool,
    /// What ended the game, when it ended on this step
    pub collision: Option<CollisionType>,
}

impl StepResult {
    fn game_over(collision: Option<CollisionType>) -> Self {
        Self {
            terminated: true,
            ate_food: false,
            ate_bonus: false,
            leveled_up: false,
            collision,
        }
    }
}

/// The game engine that handles all game logic
///
/// Holds the configuration and the RNG used for spawning; all per-session
/// state lives in [`GameState`], which the caller owns and passes into
/// [`step`](Self::step).
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine with a fixed RNG seed
    ///
    /// Identical seeds produce identical spawn sequences, which makes games
    /// reproducible in tests and via the `--seed` flag.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self.random_cell(|pos| !snake.occupies(pos));

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Execute one step of the game
    ///
    /// A step on a finished game mutates nothing and reports `terminated`.
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult::game_over(None);
        }

        // Expire the bonus first so a stale one cannot be eaten this tick
        if let Some(bonus) = state.bonus_food {
            if state.steps >= bonus.expires_at {
                state.bonus_food = None;
            }
        }

        // A turn is accepted only across axes, which blocks 180-degree turns
        if let Action::Move(new_direction) = action {
            if new_direction.axis() != state.snake.direction.axis() {
                state.snake.direction = new_direction;
            }
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(collision) = self.check_collision(state, new_head) {
            state.is_alive = false;
            state.end_reason = Some(collision);
            state.steps += 1;
            return StepResult::game_over(Some(collision));
        }

        let ate_food = new_head == state.food;
        let ate_bonus = state
            .bonus_food
            .map_or(false, |bonus| bonus.pos == new_head);

        state.snake.advance(ate_food);

        let mut leveled_up = false;

        if ate_food {
            state.score += self.config.food_points;
            state.food_eaten += 1;

            if self.config.variant.has_levels()
                && state.food_eaten % self.config.foods_per_level == 0
            {
                state.level += 1;
                let obstacle = self.spawn_free_cell(state);
                state.obstacles.push(obstacle);
                leveled_up = true;
            }

            if self.config.variant.has_bonus_food()
                && state.bonus_food.is_none()
                && state.food_eaten % self.config.bonus_food_every == 0
            {
                state.bonus_food = Some(BonusFood {
                    pos: self.spawn_free_cell(state),
                    expires_at: state.steps + self.config.bonus_lifetime_ticks,
                });
            }

            state.food = self.spawn_free_cell(state);
        }

        // Bonus consumption is independent of the food branch: extra score,
        // one obstacle removed, no growth
        if ate_bonus {
            state.score += self.config.bonus_points;
            state.obstacles.pop();
            state.bonus_food = None;
        }

        state.steps += 1;

        StepResult {
            terminated: false,
            ate_food,
            ate_bonus,
            leveled_up,
            collision: None,
        }
    }

    /// Check if the new head position causes a collision
    ///
    /// Checked in order: wall, own body (tail included), obstacle.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if state.obstacles.contains(&pos) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    /// Spawn on a random cell not occupied by snake, food, obstacles, or bonus
    fn spawn_free_cell(&mut self, state: &GameState) -> Position {
        self.random_cell(|pos| state.is_cell_free(pos))
    }

    /// Rejection-sample a grid cell satisfying the predicate
    ///
    /// Deliberately uncapped: resampling degrades as the board fills up, and
    /// loops forever if no free cell exists.
    fn random_cell<F>(&mut self, is_free: F) -> Position
    where
        F: Fn(Position) -> bool,
    {
        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if is_free(pos) {
                return pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameVariant;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::with_seed(config, 42)
    }

    /// State with a single-segment snake heading Right, food out of the way
    fn single_segment_state(head: Position, width: usize, height: usize) -> GameState {
        GameState::new(
            Snake::new(head, Direction::Right, 1),
            Position::new(0, 0),
            width,
            height,
        )
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(GameConfig::progressive());
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.food_eaten, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(12, 12));
        assert!(state.obstacles.is_empty());
        assert!(state.bonus_food.is_none());
        assert!(state.is_in_bounds(state.food));
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_seeded_engines_agree() {
        let config = GameConfig::bonus();
        let mut a = GameEngine::with_seed(config.clone(), 7);
        let mut b = GameEngine::with_seed(config, 7);

        assert_eq!(a.reset(), b.reset());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::small(GameVariant::Classic));
        let mut state = engine.reset();
        state.food = Position::new(0, 0);
        let initial_head = state.snake.head();

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert!(!result.ate_food);
        assert_eq!(state.steps, 1);
        assert_ne!(state.snake.head(), initial_head);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::small(GameVariant::Classic));
        let mut state = engine.reset();

        // Place food directly in front of the snake
        let head = state.snake.head();
        state.food = head.moved_in_direction(state.snake.direction);
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.ate_food);
        assert_eq!(state.score, 10);
        assert_eq!(state.food_eaten, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        // Regenerated food landed on a free cell
        assert!(!state.snake.occupies(state.food));
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_eating_prepends_head_and_keeps_tail() {
        // 25x25 grid, snake [(10,10)] heading Right, food at (11,10)
        let mut engine = engine(GameConfig::classic());
        let mut state = GameState::new(
            Snake::new(Position::new(10, 10), Direction::Right, 1),
            Position::new(11, 10),
            25,
            25,
        );

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.ate_food);
        assert_eq!(
            state.snake.body,
            vec![Position::new(11, 10), Position::new(10, 10)]
        );
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.score, 10);
        assert_ne!(state.food, Position::new(11, 10));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine(GameConfig::small(GameVariant::Classic));
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Position::new(5, 5),
            10,
            10,
        );

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(result.collision, Some(CollisionType::Wall));
        assert_eq!(state.end_reason, Some(CollisionType::Wall));
    }

    #[test]
    fn test_dead_game_ticks_are_noops() {
        // Head would move to (-1, 10): terminal, then nothing changes
        let mut engine = engine(GameConfig::classic());
        let mut state = single_segment_state(Position::new(0, 10), 25, 25);
        state.snake.direction = Direction::Left;

        let result = engine.step(&mut state, Action::Continue);
        assert!(result.terminated);
        assert!(!state.is_alive);

        let frozen = state.clone();
        let result = engine.step(&mut state, Action::Continue);
        assert!(result.terminated);
        assert_eq!(result.collision, None);
        assert_eq!(state, frozen);

        // Direction changes are ignored while stopped too
        engine.step(&mut state, Action::Move(Direction::Up));
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::small(GameVariant::Classic));

        // Snake at (5, 5) going Right with length 4
        // Body: (5,5), (4,5), (3,5), (2,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        // Walk a tight square back into the body:
        // Right: (6,5), (5,5), (4,5), (3,5)
        engine.step(&mut state, Action::Continue);
        // Down: (6,6), (6,5), (5,5), (4,5)
        engine.step(&mut state, Action::Move(Direction::Down));
        // Left: (5,6), (6,6), (6,5), (5,5)
        engine.step(&mut state, Action::Move(Direction::Left));
        // Up into (5,5), still occupied
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert!(result.terminated);
        assert_eq!(result.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_obstacle_collision() {
        let mut engine = engine(GameConfig::small(GameVariant::Progressive));
        let mut state = single_segment_state(Position::new(5, 5), 10, 10);
        state.obstacles.push(Position::new(6, 5));

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(result.collision, Some(CollisionType::Obstacle));
    }

    #[test]
    fn test_same_axis_turn_ignored() {
        let mut engine = engine(GameConfig::small(GameVariant::Classic));
        let mut state = engine.reset();
        state.snake.direction = Direction::Right;

        // Reversal onto the same axis is ignored
        engine.step(&mut state, Action::Move(Direction::Left));
        assert_eq!(state.snake.direction, Direction::Right);

        // So is "turning" into the current direction
        engine.step(&mut state, Action::Move(Direction::Right));
        assert_eq!(state.snake.direction, Direction::Right);

        // A perpendicular turn takes effect
        engine.step(&mut state, Action::Move(Direction::Up));
        assert_eq!(state.snake.direction, Direction::Up);
    }

    /// Feed the snake `count` foods by dropping each one in front of the head
    fn eat_foods(engine: &mut GameEngine, state: &mut GameState, count: u32) -> Vec<StepResult> {
        (0..count)
            .map(|_| {
                state.food = state.snake.head().moved_in_direction(state.snake.direction);
                engine.step(state, Action::Continue)
            })
            .collect()
    }

    #[test]
    fn test_level_up_adds_one_obstacle() {
        let mut engine = engine(GameConfig::new(GameVariant::Progressive, 30, 10));
        let mut state = single_segment_state(Position::new(2, 5), 30, 10);

        let results = eat_foods(&mut engine, &mut state, 4);
        assert!(results.iter().all(|r| !r.leveled_up));
        assert_eq!(state.level, 1);
        assert!(state.obstacles.is_empty());

        let results = eat_foods(&mut engine, &mut state, 1);
        assert!(results[0].leveled_up);
        assert_eq!(state.level, 2);
        assert_eq!(state.obstacles.len(), 1);

        let obstacle = state.obstacles[0];
        assert!(state.is_in_bounds(obstacle));
        assert!(!state.snake.occupies(obstacle));
        assert_ne!(obstacle, state.food);
    }

    #[test]
    fn test_classic_never_levels() {
        let mut engine = engine(GameConfig::new(GameVariant::Classic, 30, 10));
        let mut state = single_segment_state(Position::new(2, 5), 30, 10);

        let results = eat_foods(&mut engine, &mut state, 6);

        assert!(results.iter().all(|r| !r.leveled_up));
        assert_eq!(state.level, 1);
        assert!(state.obstacles.is_empty());
        assert!(state.bonus_food.is_none());
        assert_eq!(state.score, 60);
    }

    #[test]
    fn test_bonus_food_spawns_on_cadence() {
        let mut engine = engine(GameConfig::new(GameVariant::Bonus, 30, 10));
        let mut state = single_segment_state(Position::new(2, 5), 30, 10);

        eat_foods(&mut engine, &mut state, 2);
        assert!(state.bonus_food.is_none());

        // Third food triggers the bonus
        let steps_before = state.steps;
        eat_foods(&mut engine, &mut state, 1);

        let bonus = state.bonus_food.expect("bonus food should have spawned");
        assert_eq!(bonus.expires_at, steps_before + 30);
        assert!(state.is_in_bounds(bonus.pos));
        assert!(!state.snake.occupies(bonus.pos));
        assert_ne!(bonus.pos, state.food);
    }

    #[test]
    fn test_bonus_consumption() {
        let mut engine = engine(GameConfig::new(GameVariant::Bonus, 30, 10));
        let mut state = single_segment_state(Position::new(5, 5), 30, 10);
        state.obstacles.push(Position::new(20, 8));
        state.bonus_food = Some(BonusFood {
            pos: Position::new(6, 5),
            expires_at: 100,
        });

        let length_before = state.snake.len();
        let result = engine.step(&mut state, Action::Continue);

        assert!(result.ate_bonus);
        assert!(!result.ate_food);
        assert_eq!(state.score, 25);
        assert!(state.obstacles.is_empty());
        assert!(state.bonus_food.is_none());
        // Bonus food does not grow the snake
        assert_eq!(state.snake.len(), length_before);
    }

    #[test]
    fn test_bonus_expires() {
        let mut engine = engine(GameConfig::new(GameVariant::Bonus, 30, 10));
        let mut state = single_segment_state(Position::new(2, 5), 30, 10);
        state.bonus_food = Some(BonusFood {
            pos: Position::new(25, 8),
            expires_at: 2,
        });

        engine.step(&mut state, Action::Continue);
        assert!(state.bonus_food.is_some());

        engine.step(&mut state, Action::Continue);
        assert!(state.bonus_food.is_some());

        // steps has reached expires_at; the bonus clears before movement
        engine.step(&mut state, Action::Continue);
        assert!(state.bonus_food.is_none());
    }

    #[test]
    fn test_expired_bonus_cannot_be_eaten() {
        let mut engine = engine(GameConfig::new(GameVariant::Bonus, 30, 10));
        let mut state = single_segment_state(Position::new(5, 5), 30, 10);
        state.steps = 10;
        state.bonus_food = Some(BonusFood {
            pos: Position::new(6, 5),
            expires_at: 10,
        });

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.ate_bonus);
        assert_eq!(state.score, 0);
        assert!(state.bonus_food.is_none());
    }

    #[test]
    fn test_length_changes_by_at_most_one() {
        let mut engine = engine(GameConfig::new(GameVariant::Bonus, 30, 10));
        let mut state = single_segment_state(Position::new(2, 5), 30, 10);

        let mut prev_len = state.snake.len();
        for i in 0..20 {
            // Alternate growth and plain-translation ticks
            if i % 2 == 0 {
                state.food = state.snake.head().moved_in_direction(state.snake.direction);
            }
            let result = engine.step(&mut state, Action::Continue);
            if result.terminated {
                break;
            }

            let len = state.snake.len();
            assert!(len >= prev_len);
            assert!(len - prev_len <= 1);
            prev_len = len;
        }
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::small(GameVariant::Classic));
        let mut state = engine.reset();
        state.is_alive = false;
        let steps_before = state.steps;

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(state.steps, steps_before);
    }
}
