use crate::input::Command;
use crate::snake::{Coords, Direction, Grid};
use crate::speed::Speed;

pub type TermInt = u16;
pub type TermCoords = (TermInt, TermInt);

const MAX_CELL_WIDTH: TermInt = 2;
const BUTTON_GAP: TermInt = 1;
const SPEED_BUTTON_WIDTH: TermInt = 15;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: TermInt,
    pub y: TermInt,
    pub width: TermInt,
    pub height: TermInt,
}

impl Rect {
    pub fn contains(&self, (col, row): TermCoords) -> bool {
        col >= self.x && col < self.x + self.width && row >= self.y && row < self.y + self.height
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Start,
    Pause,
    Restart,
    Speed,
}

impl Button {
    const DPAD: [Button; 4] = [Button::Up, Button::Down, Button::Left, Button::Right];
    const ACTIONS: [Button; 4] = [Button::Start, Button::Pause, Button::Restart, Button::Speed];

    pub fn command(self) -> Command {
        match self {
            Button::Up => Command::Steer(Direction::Up),
            Button::Down => Command::Steer(Direction::Down),
            Button::Left => Command::Steer(Direction::Left),
            Button::Right => Command::Steer(Direction::Right),
            Button::Start => Command::Start,
            Button::Pause => Command::Pause,
            Button::Restart => Command::Restart,
            Button::Speed => Command::CycleSpeed,
        }
    }

    pub fn label(self, speed: Speed) -> String {
        match self {
            Button::Up => "[^]".to_string(),
            Button::Down => "[v]".to_string(),
            Button::Left => "[<]".to_string(),
            Button::Right => "[>]".to_string(),
            Button::Start => "[Start]".to_string(),
            Button::Pause => "[Pause]".to_string(),
            Button::Restart => "[Restart]".to_string(),
            Button::Speed => {
                let text = format!("Speed: {}", speed);
                format!("[{:^width$}]", text, width = SPEED_BUTTON_WIDTH as usize - 2)
            }
        }
    }

    fn width(self) -> TermInt {
        match self {
            Button::Up | Button::Down | Button::Left | Button::Right => 3,
            Button::Start | Button::Pause => 7,
            Button::Restart => 9,
            Button::Speed => SPEED_BUTTON_WIDTH,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placed {
    pub button: Button,
    pub area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Board including its border.
    pub board: Rect,
    pub cell_width: TermInt,
    pub header_row: TermInt,
    /// Empty when the terminal is too short or narrow for them.
    pub buttons: Vec<Placed>,
}

impl Layout {
    /// `None` when the board does not fit even at one column per cell.
    pub fn compute(terminal: TermCoords, grid: &Grid) -> Option<Layout> {
        let (cols, rows) = terminal;
        let grid_w = grid.width as TermInt;
        let grid_h = grid.height as TermInt;

        let cell_width = (1..=MAX_CELL_WIDTH).rev().find(|cw| grid_w * cw + 2 <= cols)?;
        let board_w = grid_w * cell_width + 2;
        let board_h = grid_h + 2;

        // header + board
        if board_h + 1 > rows {
            return None;
        }

        let dpad_row_w = row_width(&Button::DPAD);
        let action_row_w = row_width(&Button::ACTIONS);
        // header + board + gap + two button rows
        let with_buttons = board_h + 4 <= rows && dpad_row_w.max(action_row_w) <= cols;

        let used_h = if with_buttons { board_h + 4 } else { board_h + 1 };
        let top = (rows - used_h) / 2;
        let board = Rect { x: (cols - board_w) / 2, y: top + 1, width: board_w, height: board_h };

        let mut buttons = vec![];
        if with_buttons {
            let first_row = board.y + board.height + 1;
            place_row(&mut buttons, &Button::DPAD, (cols - dpad_row_w) / 2, first_row);
            place_row(&mut buttons, &Button::ACTIONS, (cols - action_row_w) / 2, first_row + 1);
        }

        Some(Layout { board, cell_width, header_row: top, buttons })
    }

    pub fn cell_origin(&self, (x, y): Coords) -> TermCoords {
        (self.board.x + 1 + x as TermInt * self.cell_width, self.board.y + 1 + y as TermInt)
    }

    pub fn button_at(&self, pos: TermCoords) -> Option<Button> {
        self.buttons.iter().find(|p| p.area.contains(pos)).map(|p| p.button)
    }
}

fn row_width(buttons: &[Button]) -> TermInt {
    let gaps = BUTTON_GAP * (buttons.len() as TermInt - 1);
    buttons.iter().map(|b| b.width()).sum::<TermInt>() + gaps
}

fn place_row(out: &mut Vec<Placed>, buttons: &[Button], mut x: TermInt, y: TermInt) {
    for &button in buttons {
        let width = button.width();
        out.push(Placed { button, area: Rect { x, y, width, height: 1 } });
        x += width + BUTTON_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(20, 20)
    }

    #[test]
    fn wide_terminal_gets_double_width_cells() {
        let layout = Layout::compute((80, 30), &grid()).unwrap();
        assert_eq!(layout.cell_width, 2);
        assert_eq!(layout.board.width, 42);
        assert_eq!(layout.board.x, 19);
        assert_eq!(layout.buttons.len(), 8);
    }

    #[test]
    fn narrow_terminal_falls_back_to_single_width() {
        let layout = Layout::compute((30, 30), &grid()).unwrap();
        assert_eq!(layout.cell_width, 1);
        assert_eq!(layout.board.width, 22);
        // Action row is wider than 30 columns.
        assert!(layout.buttons.is_empty());
    }

    #[test]
    fn short_terminal_hides_buttons() {
        let layout = Layout::compute((80, 23), &grid()).unwrap();
        assert!(layout.buttons.is_empty());
        assert_eq!(layout.header_row, 0);
        assert_eq!(layout.board.y, 1);
    }

    #[test]
    fn tiny_terminal_does_not_fit() {
        assert_eq!(Layout::compute((21, 30), &grid()), None);
        assert_eq!(Layout::compute((80, 22), &grid()), None);
    }

    #[test]
    fn cells_map_inside_the_border() {
        let layout = Layout::compute((80, 30), &grid()).unwrap();
        let (x0, y0) = layout.cell_origin((0, 0));
        let (x1, y1) = layout.cell_origin((19, 19));
        assert_eq!((x0, y0), (layout.board.x + 1, layout.board.y + 1));
        assert_eq!(x1 + layout.cell_width, layout.board.x + layout.board.width - 1);
        assert_eq!(y1 + 1, layout.board.y + layout.board.height - 1);
    }

    #[test]
    fn clicks_hit_the_right_button() {
        let layout = Layout::compute((80, 30), &grid()).unwrap();
        for placed in &layout.buttons {
            let last_col = placed.area.x + placed.area.width - 1;
            assert_eq!(layout.button_at((placed.area.x, placed.area.y)), Some(placed.button));
            assert_eq!(layout.button_at((last_col, placed.area.y)), Some(placed.button));
        }
        assert_eq!(layout.button_at((0, 0)), None);
    }

    #[test]
    fn speed_label_fits_its_button() {
        for speed in Speed::ALL {
            assert_eq!(Button::Speed.label(speed).len(), SPEED_BUTTON_WIDTH as usize);
        }
        assert_eq!(Button::Speed.command(), Command::CycleSpeed);
    }
}
