use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::layout::Layout;
use crate::snake::Direction;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Toggle,
    Start,
    Pause,
    Restart,
    CycleSpeed,
    Quit,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Input {
    Key(Command),
    Click(Command),
    Resize(u16, u16),
}

pub fn translate(event: &Event, layout: Option<&Layout>) -> Option<Input> {
    match event {
        Event::Key(key) => command_for_key(key).map(Input::Key),
        Event::Mouse(mouse) => command_for_click(mouse, layout?).map(Input::Click),
        Event::Resize(cols, rows) => Some(Input::Resize(*cols, *rows)),
        _ => None,
    }
}

pub fn command_for_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_ctrl_c(key) {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Up => Command::Steer(Direction::Up),
        KeyCode::Down => Command::Steer(Direction::Down),
        KeyCode::Left => Command::Steer(Direction::Left),
        KeyCode::Right => Command::Steer(Direction::Right),
        KeyCode::Char(' ') => Command::Toggle,
        KeyCode::Enter => Command::Start,
        KeyCode::Tab => Command::CycleSpeed,
        KeyCode::Esc => Command::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Command::Steer(Direction::Up),
            'a' => Command::Steer(Direction::Left),
            's' => Command::Steer(Direction::Down),
            'd' => Command::Steer(Direction::Right),
            'p' => Command::Pause,
            'r' => Command::Restart,
            'v' => Command::CycleSpeed,
            'q' => Command::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}

pub fn command_for_click(mouse: &MouseEvent, layout: &Layout) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            layout.button_at((mouse.column, mouse.row)).map(|b| b.command())
        }
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
