use std::io::Write;

use crossterm::{QueueableCommand, cursor, terminal};
use elevator_traits::Terminal;

use crate::error::HwError;

/// Crossterm-driven terminal over any writer.
///
/// The `Terminal` trait uses 1-based cells; crossterm's `MoveTo` is 0-based.
pub struct AnsiTerminal<W: Write> {
    out: W,
}

impl<W: Write> AnsiTerminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Clear the screen and home the cursor.
    pub fn clear(&mut self) -> crate::error::Result<()> {
        self.out
            .queue(terminal::Clear(terminal::ClearType::All))?
            .queue(cursor::MoveTo(0, 0))?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Terminal for AnsiTerminal<W> {
    fn move_cursor(
        &mut self,
        col: u16,
        row: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.out
            .queue(cursor::MoveTo(col.saturating_sub(1), row.saturating_sub(1)))
            .map_err(HwError::from)?;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.out.write_all(text.as_bytes()).map_err(HwError::from)?;
        self.out.flush().map_err(HwError::from)?;
        Ok(())
    }
}

/// In-memory text screen. Printing overwrites cells from the cursor onward,
/// the same way a real terminal would, so stale text past the new string
/// stays visible unless the caller pads it.
#[derive(Debug, Default, Clone)]
pub struct TextGrid {
    rows: Vec<Vec<char>>,
    col: usize,
    row: usize,
    writes: usize,
}

impl TextGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row `row` (1-based) with trailing spaces trimmed.
    pub fn line(&self, row: u16) -> String {
        let idx = usize::from(row.max(1)) - 1;
        self.rows
            .get(idx)
            .map(|r| r.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    /// Number of `print` calls seen so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Terminal for TextGrid {
    fn move_cursor(
        &mut self,
        col: u16,
        row: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.col = usize::from(col.max(1)) - 1;
        self.row = usize::from(row.max(1)) - 1;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        while self.rows.len() <= self.row {
            self.rows.push(Vec::new());
        }
        let line = &mut self.rows[self.row];
        for c in text.chars() {
            if line.len() <= self.col {
                line.resize(self.col + 1, ' ');
            }
            line[self.col] = c;
            self.col += 1;
        }
        self.writes += 1;
        Ok(())
    }
}
