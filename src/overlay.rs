// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Cell;
use crate::frame::Frame;

const PAD_X: u16 = 2;
const PAD_Y: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayChar {
    pub col: u16,
    pub row: u16,
    pub ch: char,
}

/// Centred host content painted above the particle field.
#[derive(Clone, Debug)]
pub struct Overlay {
    text: String,
    border: bool,
    fg: Option<Color>,
    laid_out: Vec<OverlayChar>,
    grid: (u16, u16),
}

fn wrap_lines(text: &str, max_w: usize, max_h: usize) -> Vec<Vec<char>> {
    let mut out: Vec<Vec<char>> = Vec::new();
    for raw in text.split('\n') {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            out.push(Vec::new());
        } else {
            out.extend(chars.chunks(max_w).map(|c| c.to_vec()));
        }
        if out.len() >= max_h {
            break;
        }
    }
    out.truncate(max_h);
    if out.is_empty() {
        out.push(Vec::new());
    }
    out
}

impl Overlay {
    pub fn new(text: &str, border: bool, fg: Option<Color>) -> Self {
        Self {
            text: text.to_string(),
            border,
            fg,
            laid_out: Vec::new(),
            grid: (0, 0),
        }
    }

    #[cfg(test)]
    pub fn chars(&self) -> &[OverlayChar] {
        &self.laid_out
    }

    /// Recomputes the box for a `cols` x `rows` grid. A grid too small for
    /// the border and padding leaves the overlay empty.
    pub fn layout(&mut self, cols: u16, rows: u16) {
        self.grid = (cols, rows);
        self.laid_out.clear();

        let border: u16 = if self.border { 1 } else { 0 };
        let frame_w = 2 * border + 2 * PAD_X;
        let frame_h = 2 * border + 2 * PAD_Y;
        if cols <= frame_w || rows <= frame_h {
            return;
        }

        let lines = wrap_lines(
            &self.text,
            (cols - frame_w) as usize,
            (rows - frame_h) as usize,
        );
        let content_w = lines.iter().map(Vec::len).max().unwrap_or(0).max(1) as u16;
        let content_h = lines.len() as u16;

        let box_w = content_w + frame_w;
        let box_h = content_h + frame_h;
        let left = (cols - box_w) / 2;
        let top = (rows - box_h) / 2;
        let inner_x = border + PAD_X;
        let inner_y = border + PAD_Y;

        for y in 0..box_h {
            for x in 0..box_w {
                let mut ch = ' ';
                if self.border {
                    let edge_y = y == 0 || y + 1 == box_h;
                    let edge_x = x == 0 || x + 1 == box_w;
                    ch = match (edge_x, edge_y) {
                        (true, true) => '+',
                        (false, true) => '-',
                        (true, false) => '|',
                        (false, false) => ' ',
                    };
                }

                if y >= inner_y && y < inner_y + content_h && x >= inner_x && x < inner_x + content_w
                {
                    let line = &lines[(y - inner_y) as usize];
                    let pad = (content_w as usize - line.len()) / 2;
                    let ix = (x - inner_x) as usize;
                    if ix >= pad && ix < pad + line.len() {
                        ch = line[ix - pad];
                    }
                }

                self.laid_out.push(OverlayChar {
                    col: left + x,
                    row: top + y,
                    ch,
                });
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        if self.grid != (frame.cols, frame.rows) {
            self.layout(frame.cols, frame.rows);
        }
        for oc in &self.laid_out {
            let bg = frame.background_at(oc.col, oc.row);
            let cell = if oc.ch == ' ' {
                Cell::blank(bg)
            } else {
                Cell::glyph(oc.ch, self.fg, bg, true)
            };
            frame.set(oc.col, oc.row, cell);
        }
    }
}
