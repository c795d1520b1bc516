//! ratatui-backed [`Surface`].
//!
//! Draw calls are collected between `clear` and `refresh`, then written into one frame.

use coin_monitor::{DisplayColor, Surface, SurfaceError};
use ratatui::{
    Terminal,
    backend::Backend,
    style::{Color, Style},
};
use tracing::debug;

/// Terminal color for a configured [`DisplayColor`].
pub fn terminal_color(color: DisplayColor) -> Color {
    match color {
        DisplayColor::Black => Color::Black,
        DisplayColor::Blue => Color::Blue,
        DisplayColor::Cyan => Color::Cyan,
        DisplayColor::Green => Color::Green,
        DisplayColor::Magenta => Color::Magenta,
        DisplayColor::Red => Color::Red,
        DisplayColor::White => Color::White,
        DisplayColor::Yellow => Color::Yellow,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    row: u16,
    col: u16,
    text: String,
    color: Color,
}

/// [`Surface`] drawing into a ratatui [`Terminal`].
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    cells: Vec<Cell>,
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            cells: Vec::new(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Surface for TerminalSurface<B> {
    fn clear(&mut self) {
        self.cells.clear();
    }

    fn put(
        &mut self,
        row: u16,
        col: u16,
        text: &str,
        color: DisplayColor,
    ) -> Result<(), SurfaceError> {
        let (height, width) = self.size();
        if row >= height || col >= width {
            return Err(SurfaceError::OutOfBounds { row, col });
        }

        self.cells.push(Cell {
            row,
            col,
            text: text.to_string(),
            color: terminal_color(color),
        });
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        match self.terminal.size() {
            Ok(size) => (size.height, size.width),
            Err(error) => {
                debug!(%error, "Failed to query terminal size");
                (0, 0)
            }
        }
    }

    fn refresh(&mut self) -> Result<(), SurfaceError> {
        let cells = &self.cells;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let buffer = frame.buffer_mut();
            // Terminal may have shrunk since the cell was accepted
            for cell in cells
                .iter()
                .filter(|cell| cell.row < area.height && cell.col < area.width)
            {
                buffer.set_string(
                    cell.col,
                    cell.row,
                    &cell.text,
                    Style::default().fg(cell.color),
                );
            }
        })?;
        Ok(())
    }
}
