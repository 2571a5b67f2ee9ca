use std::io::{Stdout, Write};

use anyhow::Result;
use crossterm::style::Color;

use crate::game::{Ending, GameState, RunState};
use crate::layout::{Button, Layout, TermInt};
use crate::snake::{Coords, Direction};
use crate::term::{Style, TermManager};

const HEAD_CHAR: char = '█';
const BODY_CHAR: char = '▓';
const DEAD_SNAKE_CHAR: char = 'X';
const FOOD_CHAR: char = '●';
const GRID_CHAR: char = '·';

pub trait Renderer {
    fn draw(&mut self, state: &GameState) -> Result<()>;

    fn resize(&mut self, _cols: u16, _rows: u16) -> Result<()> {
        Ok(())
    }

    fn layout(&self) -> Option<&Layout> {
        None
    }
}

pub struct TermRenderer<W: Write = Stdout> {
    term: TermManager<W>,
    layout: Option<Layout>,
    grid_size: (i32, i32),
}

impl<W: Write> TermRenderer<W> {
    pub fn new(term: TermManager<W>) -> Self {
        TermRenderer { term, layout: None, grid_size: (0, 0) }
    }

    pub fn term_mut(&mut self) -> &mut TermManager<W> {
        &mut self.term
    }

    fn refresh_layout(&mut self, state: &GameState) {
        let grid_size = (state.grid.width, state.grid.height);
        if self.grid_size != grid_size || self.layout.is_none() {
            self.grid_size = grid_size;
            self.layout = Layout::compute(self.term.size(), &state.grid);
        }
    }

    fn draw_too_small(&mut self, state: &GameState) {
        let (cols, rows) = self.term.size();
        let need = format!("need {}x{}", state.grid.width + 2, state.grid.height + 3);
        self.term.show_message((cols / 2, rows / 2), &["Terminal too small", need.as_str()], Style::fg(Color::Yellow));
    }

    fn draw_header(&mut self, layout: &Layout, state: &GameState) {
        let text = format!(
            "Score: {}   High: {}   Speed: {}",
            state.score, state.high_score, state.speed
        );
        self.term.print_centered(layout.header_row, &text, Style::fg(Color::White).bold());
    }

    fn draw_board(&mut self, layout: &Layout, state: &GameState) {
        let board = layout.board;
        self.term.draw_borders((board.x, board.y), (board.width, board.height), Style::fg(Color::DarkBlue));

        for cell in state.grid.cells() {
            let (col, row) = layout.cell_origin(cell);
            self.term.print_at((col, row), GRID_CHAR, Style::fg(Color::DarkGrey));
        }

        if let Some(food) = state.food {
            self.fill_cell(layout, food, FOOD_CHAR, Style::fg(Color::Red).bold());
        }

        let dead = matches!(state.run, RunState::GameOver(Ending::Wall | Ending::SelfCollision));
        for (i, &pos) in state.snake.body().enumerate() {
            let (ch, style) = match (dead, i) {
                (true, _) => (DEAD_SNAKE_CHAR, Style::fg(Color::Red)),
                (false, 0) => (HEAD_CHAR, Style::fg(Color::Green).bold()),
                (false, _) => (BODY_CHAR, Style::fg(Color::DarkGreen)),
            };
            self.fill_cell(layout, pos, ch, style);
        }

        // Direction marker on the head.
        if !dead && layout.cell_width > 1 {
            let (col, row) = layout.cell_origin(state.snake.head());
            self.term.print_at((col, row), head_char(state.direction), Style::fg(Color::Black).bold());
        }
    }

    fn draw_buttons(&mut self, layout: &Layout, state: &GameState) {
        for placed in &layout.buttons {
            let active = match placed.button {
                Button::Start => state.run != RunState::Running,
                Button::Pause => state.run == RunState::Running,
                _ => true,
            };
            let style = if active { Style::fg(Color::Cyan) } else { Style::fg(Color::DarkGrey) };
            let label = placed.button.label(state.speed);
            self.term.print_str_at((placed.area.x, placed.area.y), &label, style);
        }
    }

    fn draw_overlay(&mut self, layout: &Layout, state: &GameState) {
        let score = format!("Score: {}", state.score);
        let lines: Vec<&str> = match state.run {
            RunState::Running => return,
            RunState::Idle => vec!["Press Start", "Space or Enter to begin"],
            RunState::Paused => vec!["Paused", "Space to resume"],
            RunState::GameOver(Ending::BoardFull) => vec!["You filled the board!", score.as_str()],
            RunState::GameOver(_) => vec!["Game Over - Press Restart", score.as_str()],
        };

        let board = layout.board;
        let center = (board.x + board.width / 2, board.y + board.height / 2);
        self.term.show_message(center, &lines, Style::fg(Color::White).bold());
    }

    fn fill_cell(&mut self, layout: &Layout, pos: Coords, ch: char, style: Style) {
        let (col, row) = layout.cell_origin(pos);
        for dx in 0..layout.cell_width {
            self.term.print_at((col + dx as TermInt, row), ch, style);
        }
    }
}

impl<W: Write> Renderer for TermRenderer<W> {
    fn draw(&mut self, state: &GameState) -> Result<()> {
        self.refresh_layout(state);
        self.term.begin_frame();

        match self.layout.take() {
            Some(layout) => {
                self.draw_header(&layout, state);
                self.draw_board(&layout, state);
                self.draw_buttons(&layout, state);
                self.draw_overlay(&layout, state);
                self.layout = Some(layout);
            }
            None => self.draw_too_small(state),
        }

        self.term.present()
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Result<()> {
        self.term.resize(cols, rows)?;
        self.layout = None;
        Ok(())
    }

    fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }
}

fn head_char(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, Rules};
    use crate::speed::Speed;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn renderer(cols: u16, rows: u16) -> TermRenderer<Vec<u8>> {
        TermRenderer::new(TermManager::new(Vec::new(), cols, rows))
    }

    fn state() -> GameState {
        let game = Game::with_rng(Rules::default(), Speed::Normal, MemoryStore::default(), StdRng::seed_from_u64(9));
        game.state().clone()
    }

    #[test]
    fn drawing_twice_is_idempotent() {
        let mut renderer = renderer(80, 30);
        let state = state();

        renderer.draw(&state).unwrap();
        renderer.term_mut().out_mut().clear();
        renderer.draw(&state).unwrap();
        assert!(renderer.term_mut().out_mut().is_empty());
    }

    #[test]
    fn layout_is_exposed_after_draw() {
        let mut renderer = renderer(80, 30);
        assert!(renderer.layout().is_none());
        renderer.draw(&state()).unwrap();
        assert_eq!(renderer.layout().unwrap().buttons.len(), 8);
    }

    #[test]
    fn resize_recomputes_layout() {
        let mut renderer = renderer(80, 30);
        let state = state();
        renderer.draw(&state).unwrap();

        renderer.resize(10, 10).unwrap();
        renderer.draw(&state).unwrap();
        assert!(renderer.layout().is_none());

        renderer.resize(30, 30).unwrap();
        renderer.draw(&state).unwrap();
        assert_eq!(renderer.layout().unwrap().cell_width, 1);
    }

    #[test]
    fn head_char_points_along_direction() {
        assert_eq!(head_char(Direction::Left), '<');
        assert_eq!(head_char(Direction::Up), '^');
    }
}
