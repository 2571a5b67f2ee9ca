use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::haptics::Pulse;
use crate::snake::{
    Coords, Direction, Grid,
    MoveResult::{HitSelf, HitWall, Moved},
    Snake,
};
use crate::speed::Speed;
use crate::store::ScoreStore;
use crate::timer::IntervalTimer;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rules {
    pub grid: Grid,
    pub initial_length: usize,
    pub food_reward: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules { grid: Grid::new(20, 20), initial_length: 3, food_reward: 10 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ending {
    Wall,
    SelfCollision,
    /// No free cell left for food. The player won.
    BoardFull,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    GameOver(Ending),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped,
    Moved,
    Ate,
    Ended(Ending),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub direction: Direction,
    /// Direction the next tick will try to apply.
    pub pending: Direction,
    /// `None` only once the board is full.
    pub food: Option<Coords>,
    pub score: u32,
    pub high_score: u32,
    pub run: RunState,
    pub speed: Speed,
}

pub struct Game<S, R = ThreadRng> {
    rules: Rules,
    state: GameState,
    timer: IntervalTimer,
    store: S,
    rng: R,
    pulses: Vec<Pulse>,
}

impl<S: ScoreStore> Game<S, ThreadRng> {
    pub fn new(rules: Rules, speed: Speed, store: S) -> Self {
        Game::with_rng(rules, speed, store, rand::thread_rng())
    }
}

impl<S: ScoreStore, R: Rng> Game<S, R> {
    pub fn with_rng(rules: Rules, speed: Speed, store: S, mut rng: R) -> Self {
        let snake = initial_snake(&rules);
        let food = spawn_food(&mut rng, &rules.grid, &snake);
        let state = GameState {
            grid: rules.grid,
            snake,
            direction: Direction::Right,
            pending: Direction::Right,
            food,
            score: 0,
            high_score: 0,
            run: RunState::Idle,
            speed,
        };

        let mut game = Game { rules, state, timer: IntervalTimer::new(), store, rng, pulses: vec![] };
        game.state.high_score = game.stored_high_score();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    pub fn take_pulses(&mut self) -> Vec<Pulse> {
        std::mem::take(&mut self.pulses)
    }

    pub fn start(&mut self) {
        match self.state.run {
            RunState::Running => return,
            RunState::GameOver(_) => self.reset(),
            RunState::Idle | RunState::Paused => {}
        }

        self.state.run = RunState::Running;
        self.timer.start(self.state.speed.interval());
        self.pulses.push(Pulse::Start);
        tracing::info!(speed = %self.state.speed, "game running");
    }

    pub fn pause(&mut self) {
        if self.state.run != RunState::Running {
            return;
        }

        self.state.run = RunState::Paused;
        self.timer.stop();
        self.pulses.push(Pulse::Pause);
        tracing::info!(score = self.state.score, "game paused");
    }

    pub fn toggle(&mut self) {
        if self.state.run == RunState::Running {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn restart(&mut self) {
        self.reset();
        tracing::info!("game restarted");
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.state.speed = speed;
        if self.state.run == RunState::Running {
            self.timer.replace(speed.interval());
        }
        tracing::debug!(%speed, interval_ms = speed.interval().as_millis() as u64, "speed changed");
    }

    pub fn cycle_speed(&mut self) {
        self.set_speed(self.state.speed.next());
    }

    /// Queues a turn for the next tick. Reversals and repeats of the applied
    /// direction are dropped; a later accepted turn overwrites an earlier one.
    pub fn steer(&mut self, direction: Direction) -> bool {
        let applied = self.state.direction;
        if direction == applied || direction.is_opposite(applied) {
            return false;
        }
        self.state.pending = direction;
        true
    }

    pub fn poll_tick(&mut self, now: std::time::Instant) -> TickOutcome {
        if self.timer.poll_due(now) {
            self.tick()
        } else {
            TickOutcome::Skipped
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state.run != RunState::Running {
            return TickOutcome::Skipped;
        }

        let state = &mut self.state;
        if !state.pending.is_opposite(state.direction) {
            state.direction = state.pending;
        }

        let food = state.food;
        match state.snake.move_step(state.direction, &state.grid, |head| Some(head) == food) {
            HitWall => self.end(Ending::Wall),
            HitSelf => self.end(Ending::SelfCollision),
            Moved { new_head, .. } if Some(new_head) == food => self.eat(),
            Moved { .. } => TickOutcome::Moved,
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn eat(&mut self) -> TickOutcome {
        self.state.score += self.rules.food_reward;
        self.record_score();
        self.pulses.push(Pulse::Food);

        self.state.food = spawn_food(&mut self.rng, &self.state.grid, &self.state.snake);
        match self.state.food {
            Some(food) => {
                tracing::debug!(?food, score = self.state.score, "food eaten");
                TickOutcome::Ate
            }
            None => self.end(Ending::BoardFull),
        }
    }

    fn end(&mut self, ending: Ending) -> TickOutcome {
        self.state.run = RunState::GameOver(ending);
        self.timer.stop();
        self.pulses.push(Pulse::GameOver);
        tracing::info!(?ending, score = self.state.score, length = self.state.snake.len(), "game over");
        TickOutcome::Ended(ending)
    }

    fn reset(&mut self) {
        self.timer.stop();

        let snake = initial_snake(&self.rules);
        self.state.food = spawn_food(&mut self.rng, &self.rules.grid, &snake);
        self.state.snake = snake;
        self.state.direction = Direction::Right;
        self.state.pending = Direction::Right;
        self.state.score = 0;
        self.state.run = RunState::Idle;
        self.state.high_score = self.stored_high_score();
    }

    fn record_score(&mut self) {
        let stored = self.stored_high_score();
        let score = self.state.score;

        if score > stored {
            if let Err(e) = self.store.set_high_score(score) {
                tracing::warn!("could not save high score {}: {:#}", score, e);
            }
        }
        self.state.high_score = stored.max(score);
    }

    fn stored_high_score(&self) -> u32 {
        match self.store.high_score() {
            Ok(high) => high,
            Err(e) => {
                tracing::warn!("could not read high score: {:#}", e);
                self.state.high_score
            }
        }
    }
}

fn initial_snake(rules: &Rules) -> Snake {
    Snake::new(rules.grid.center(), rules.initial_length, Direction::Right)
}

/// Uniformly random free cell. Rejection sampling first; if that keeps
/// missing, pick from the explicit list of free cells. `None` when the
/// snake covers the whole grid.
pub fn spawn_food<R: Rng>(rng: &mut R, grid: &Grid, snake: &Snake) -> Option<Coords> {
    for _ in 0..grid.cell_count() * 4 {
        let cell = (rng.gen_range(0..grid.width), rng.gen_range(0..grid.height));
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }

    let free: Vec<Coords> = grid.cells().filter(|cell| !snake.occupies(*cell)).collect();
    free.choose(rng).copied()
}
