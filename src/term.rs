use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::layout::{TermCoords, TermInt};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bold: bool,
}

impl Style {
    pub const PLAIN: Style = Style { fg: Color::Reset, bold: false };

    pub fn fg(fg: Color) -> Self {
        Style { fg, bold: false }
    }

    pub fn bold(self) -> Self {
        Style { bold: true, ..self }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Cell {
    ch: char,
    style: Style,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', style: Style::PLAIN };
    /// Never drawn; forces a cell to be re-emitted on the next present.
    const UNKNOWN: Cell = Cell { ch: '\0', style: Style::PLAIN };
}

/// Owns the terminal. Frames are composed off-screen and only the cells that
/// differ from what is already displayed get written.
pub struct TermManager<W: Write = Stdout> {
    width: TermInt,
    height: TermInt,
    out: W,
    screen: Vec<Cell>,
    frame: Vec<Cell>,
}

impl TermManager {
    pub fn stdout() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        Ok(TermManager::new(stdout(), width, height))
    }
}

impl<W: Write> TermManager<W> {
    pub fn new(out: W, width: TermInt, height: TermInt) -> Self {
        let cells = width as usize * height as usize;
        TermManager {
            width,
            height,
            out,
            screen: vec![Cell::UNKNOWN; cells],
            frame: vec![Cell::BLANK; cells],
        }
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.out, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking, EnableMouseCapture)
            .context("Error configuring cursor and mouse")?;
        self.clear()
    }

    /// Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        let raw = terminal::disable_raw_mode().context("Error disabling raw mode");
        let screen = execute!(
            self.out,
            DisableMouseCapture,
            SetAttribute(Attribute::Reset),
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
        .context("Error leaving alt screen");
        raw.and(screen)
    }

    pub fn size(&self) -> TermCoords {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: TermInt, height: TermInt) -> Result<()> {
        let cells = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.frame = vec![Cell::BLANK; cells];
        self.screen = vec![Cell::UNKNOWN; cells];
        self.clear()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.out, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen.fill(Cell::BLANK);
        Ok(())
    }

    pub fn begin_frame(&mut self) {
        self.frame.fill(Cell::BLANK);
    }

    /// Out-of-bounds writes are clipped.
    pub fn print_at(&mut self, pos: TermCoords, ch: char, style: Style) {
        if let Some(i) = self.index(pos) {
            self.frame[i] = Cell { ch, style };
        }
    }

    pub fn print_str_at(&mut self, pos: TermCoords, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0.saturating_add(i as TermInt), pos.1), ch, style);
        }
    }

    pub fn print_centered(&mut self, row: TermInt, text: &str, style: Style) {
        let len = text.chars().count() as TermInt;
        self.print_str_at((self.width.saturating_sub(len) / 2, row), text, style);
    }

    pub fn draw_borders(&mut self, top_left: TermCoords, size: TermCoords, style: Style) {
        let (x0, y0) = top_left;
        let (width, height) = size;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x { '+' } else { '-' };
            self.print_at((x, y0), ch, style);
            self.print_at((x, end_y), ch, style);
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|', style);
            self.print_at((end_x, y), '|', style);
        }
    }

    pub fn show_message(&mut self, center: TermCoords, lines: &[&str], style: Style) {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4) as TermInt;
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        for y_diff in 0..msg_height {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, top_left.1 + y_diff), ' ', style);
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            self.print_str_at((top_left.0, y), &padded, style);
        }
    }

    pub fn present(&mut self) -> Result<()> {
        let mut current_style = None;

        for i in 0..self.frame.len() {
            let cell = self.frame[i];
            if self.screen[i] == cell {
                continue;
            }

            let x = (i % self.width as usize) as TermInt;
            let y = (i / self.width as usize) as TermInt;
            queue!(self.out, cursor::MoveTo(x, y))?;

            if current_style != Some(cell.style) {
                let weight = if cell.style.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                queue!(self.out, SetAttribute(weight), SetForegroundColor(cell.style.fg))?;
                current_style = Some(cell.style);
            }

            queue!(self.out, Print(cell.ch))?;
            self.screen[i] = cell;
        }

        self.out.flush().context("Error flushing")
    }

    fn index(&self, (x, y): TermCoords) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(self.width as usize * y as usize + x as usize)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    #[cfg(test)]
    fn char_at(&self, pos: TermCoords) -> char {
        self.index(pos).map(|i| self.frame[i].ch).unwrap_or('\0')
    }
}

pub fn next_event(timeout: Duration) -> Result<Option<Event>> {
    if poll(timeout).context("Error polling events")? {
        Ok(Some(read().context("Error reading event")?))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term() -> TermManager<Vec<u8>> {
        TermManager::new(Vec::new(), 20, 6)
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let mut term = term();
        term.begin_frame();
        term.print_str_at((2, 2), "snake", Style::fg(Color::Green));
        term.present().unwrap();
        assert!(!term.out.is_empty());

        term.out.clear();
        term.begin_frame();
        term.print_str_at((2, 2), "snake", Style::fg(Color::Green));
        term.present().unwrap();
        assert!(term.out.is_empty());
    }

    #[test]
    fn only_changed_cells_are_rewritten() {
        let mut term = term();
        term.begin_frame();
        term.print_str_at((0, 0), "abc", Style::PLAIN);
        term.present().unwrap();

        term.out.clear();
        term.begin_frame();
        term.print_str_at((0, 0), "abd", Style::PLAIN);
        term.present().unwrap();
        let written = String::from_utf8_lossy(&term.out).to_string();
        assert!(written.contains('d'));
        assert!(!written.contains('a'));
    }

    #[test]
    fn writes_outside_are_clipped() {
        let mut term = term();
        term.begin_frame();
        term.print_str_at((18, 0), "wxyz", Style::PLAIN);
        term.print_at((0, 6), '!', Style::PLAIN);
        assert_eq!(term.char_at((19, 0)), 'x');
        term.present().unwrap();
    }

    #[test]
    fn borders_and_messages() {
        let mut term = term();
        term.begin_frame();
        term.draw_borders((0, 0), (20, 6), Style::PLAIN);
        assert_eq!(term.char_at((0, 0)), '+');
        assert_eq!(term.char_at((5, 0)), '-');
        assert_eq!(term.char_at((0, 3)), '|');
        assert_eq!(term.char_at((19, 5)), '+');

        term.show_message((10, 3), &["Paused"], Style::PLAIN);
        let row: String = (0..20).map(|x| term.char_at((x, 3))).collect();
        assert!(row.contains("Paused"));
    }
}
