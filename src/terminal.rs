// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl Pen {
    fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            bold: cell.bold,
        }
    }
}

pub struct Terminal {
    stdout: Stdout,
    shown: Vec<Cell>,
    shown_size: Option<(u16, u16)>,
    run: String,
}

fn leave(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Terminal {
    /// Takes over the terminal: raw mode, alternate screen, hidden cursor.
    /// On failure whatever was already switched is switched back.
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let entered: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = entered {
            leave(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            shown: Vec::new(),
            shown_size: None,
            run: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn apply_pen(&mut self, pen: Pen, cur: &mut Option<Pen>) -> Result<()> {
        let prev = *cur;
        if prev.map(|p| p.fg) != Some(pen.fg) {
            self.stdout
                .queue(SetForegroundColor(pen.fg.unwrap_or(Color::Reset)))?;
        }
        if prev.map(|p| p.bg) != Some(pen.bg) {
            self.stdout
                .queue(SetBackgroundColor(pen.bg.unwrap_or(Color::Reset)))?;
        }
        if prev.map(|p| p.bold) != Some(pen.bold) {
            self.stdout.queue(SetAttribute(if pen.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
        }
        *cur = Some(pen);
        Ok(())
    }

    /// Writes the cells that changed since the previous call, batching
    /// neighbours that share a pen. A new grid size repaints everything.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let size = (frame.cols, frame.rows);
        let full = self.shown_size != Some(size);
        if full {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.shown = vec![Cell::EMPTY; size.0 as usize * size.1 as usize];
            self.shown_size = Some(size);
        }

        let width = frame.cols as usize;
        let mut pen: Option<Pen> = None;
        let mut cursor_at: Option<(u16, u16)> = None;

        for row in 0..frame.rows {
            let base = row as usize * width;
            let mut col = 0usize;
            while col < width {
                let cell = frame.cell_at_index(base + col);
                if !full && self.shown[base + col] == cell {
                    col += 1;
                    continue;
                }

                let run_pen = Pen::of(&cell);
                let start = col;
                self.run.clear();
                while col < width {
                    let next = frame.cell_at_index(base + col);
                    let changed = full || self.shown[base + col] != next;
                    if !changed || Pen::of(&next) != run_pen {
                        break;
                    }
                    self.run.push(next.ch);
                    self.shown[base + col] = next;
                    col += 1;
                }

                let at = (start as u16, row);
                if cursor_at != Some(at) {
                    self.stdout.queue(cursor::MoveTo(at.0, at.1))?;
                }
                self.apply_pen(run_pen, &mut pen)?;
                self.stdout.queue(Print(self.run.as_str()))?;
                cursor_at = Some((col as u16, row));
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        leave(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    leave(&mut stdout());
}
