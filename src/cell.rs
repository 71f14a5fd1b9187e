// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        ch: ' ',
        fg: None,
        bg: None,
        bold: false,
    };

    pub fn blank(bg: Option<Color>) -> Self {
        Self { bg, ..Self::EMPTY }
    }

    pub fn glyph(ch: char, fg: Option<Color>, bg: Option<Color>, bold: bool) -> Self {
        Self { ch, fg, bg, bold }
    }
}
