use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::Event;
use rand::Rng;

use crate::game::{Game, TickOutcome};
use crate::haptics::{Haptics, Pulse};
use crate::input::{self, Command, Input};
use crate::render::Renderer;
use crate::store::ScoreStore;

/// How long to block for input while no timer is running.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct App<S, G, R, H> {
    game: Game<S, G>,
    renderer: R,
    haptics: H,
    should_quit: bool,
}

impl<S, G, R, H> App<S, G, R, H>
where
    S: ScoreStore,
    G: Rng,
    R: Renderer,
    H: Haptics,
{
    pub fn new(game: Game<S, G>, renderer: R, haptics: H) -> Self {
        App { game, renderer, haptics, should_quit: false }
    }

    pub fn game(&self) -> &Game<S, G> {
        &self.game
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Runs until the player quits. `next_event` blocks for at most the given
    /// timeout and returns `None` if nothing arrived.
    pub fn run<E>(&mut self, mut next_event: E) -> Result<()>
    where
        E: FnMut(Duration) -> Result<Option<Event>>,
    {
        self.renderer.draw(self.game.state())?;

        while !self.should_quit {
            let timeout = self.game.timer().time_until_due(Instant::now()).unwrap_or(IDLE_POLL);

            if let Some(event) = next_event(timeout)? {
                if let Some(input) = input::translate(&event, self.renderer.layout()) {
                    self.handle(input)?;
                }
            }

            if !self.should_quit {
                self.on_timer(Instant::now())?;
            }
        }

        tracing::info!(score = self.game.state().score, "quitting");
        Ok(())
    }

    pub fn handle(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Resize(cols, rows) => self.renderer.resize(cols, rows)?,
            Input::Key(command) => self.apply(command),
            Input::Click(command) => {
                if matches!(command, Command::Steer(_)) {
                    self.haptics.pulse(Pulse::Button);
                }
                self.apply(command);
            }
        }

        self.flush_pulses();
        self.renderer.draw(self.game.state())
    }

    pub fn on_timer(&mut self, now: Instant) -> Result<()> {
        if self.game.poll_tick(now) == TickOutcome::Skipped {
            return Ok(());
        }

        self.flush_pulses();
        self.renderer.draw(self.game.state())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn apply(&mut self, command: Command) {
        match command {
            Command::Steer(direction) => {
                self.game.steer(direction);
            }
            Command::Toggle => self.game.toggle(),
            Command::Start => self.game.start(),
            Command::Pause => self.game.pause(),
            Command::Restart => self.game.restart(),
            Command::CycleSpeed => self.game.cycle_speed(),
            Command::Quit => self.should_quit = true,
        }
    }

    fn flush_pulses(&mut self) {
        for pulse in self.game.take_pulses() {
            self.haptics.pulse(pulse);
        }
    }
}
