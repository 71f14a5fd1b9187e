// Copyright (c) 2026 rezky_nightky

use std::str::FromStr;

use crate::cell::Cell;
use crate::palette::{blend, quantize, Backdrop};
use crate::runtime::ColorMode;
use crate::surface::{Surface, TextStyle};

/// Glyphs at or above this size are drawn bold.
const BOLD_FONT_PX: f64 = 13.0;

/// Pixel footprint of one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellMetrics {
    pub width: u16,
    pub height: u16,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

impl CellMetrics {
    pub fn pixels(&self, cols: u16, rows: u16) -> (u32, u32) {
        (
            cols as u32 * self.width.max(1) as u32,
            rows as u32 * self.height.max(1) as u32,
        )
    }

    fn cells(&self, width_px: u32, height_px: u32) -> (u16, u16) {
        let cols = width_px / self.width.max(1) as u32;
        let rows = height_px / self.height.max(1) as u32;
        (
            cols.min(u16::MAX as u32) as u16,
            rows.min(u16::MAX as u32) as u16,
        )
    }
}

impl FromStr for CellMetrics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected: WIDTHxHEIGHT".to_string())?;
        let width: u16 = a
            .trim()
            .parse()
            .map_err(|_| "invalid cell width".to_string())?;
        let height: u16 = b
            .trim()
            .parse()
            .map_err(|_| "invalid cell height".to_string())?;
        if width == 0 || height == 0 {
            return Err("cell size must be > 0".to_string());
        }
        Ok(Self { width, height })
    }
}

/// Terminal cell grid exposed as a pixel surface.
#[derive(Clone, Debug)]
pub struct Frame {
    pub cols: u16,
    pub rows: u16,
    width_px: u32,
    height_px: u32,
    metrics: CellMetrics,
    backdrop: Backdrop,
    color_mode: ColorMode,
    cells: Vec<Cell>,
    blank: Vec<Cell>,
}

impl Frame {
    pub fn new(
        cols: u16,
        rows: u16,
        metrics: CellMetrics,
        backdrop: Backdrop,
        color_mode: ColorMode,
    ) -> Self {
        let (width_px, height_px) = metrics.pixels(cols, rows);
        let mut frame = Self {
            cols,
            rows,
            width_px,
            height_px,
            metrics,
            backdrop,
            color_mode,
            cells: Vec::new(),
            blank: Vec::new(),
        };
        frame.rebuild();
        frame
    }

    pub fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    #[cfg(test)]
    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(Cell::EMPTY)
    }

    pub fn set(&mut self, col: u16, row: u16, cell: Cell) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }

    /// Background the host page shows at a cell.
    pub fn background_at(&self, col: u16, row: u16) -> Option<crossterm::style::Color> {
        self.index(col, row).and_then(|i| self.blank[i].bg)
    }

    fn rebuild(&mut self) {
        let len = self.cols as usize * self.rows as usize;
        self.blank.clear();
        self.blank.reserve(len);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let bg = self
                    .backdrop
                    .background(col, row, self.cols, self.rows, self.color_mode);
                self.blank.push(Cell::blank(bg));
            }
        }
        self.cells.clone_from(&self.blank);
    }
}

impl Surface for Frame {
    fn width(&self) -> u32 {
        self.width_px
    }

    fn height(&self) -> u32 {
        self.height_px
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (cols, rows) = self.metrics.cells(width, height);
        self.width_px = width;
        self.height_px = height;
        if cols != self.cols || rows != self.rows || self.cells.len() != self.blank.len() {
            self.cols = cols;
            self.rows = rows;
            self.rebuild();
        }
    }

    fn clear(&mut self) {
        self.cells.copy_from_slice(&self.blank);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let cw = self.metrics.width.max(1) as f64;
        let ch = self.metrics.height.max(1) as f64;

        let row = (y / ch).ceil() as i64 - 1;
        if row < 0 || row >= self.rows as i64 {
            return;
        }
        let row = row as u16;
        let first_col = (x / cw).floor() as i64;
        let under = blend(style.fill.rgb, style.fill.alpha, self.backdrop.base());
        let bold = style.font_px >= BOLD_FONT_PX;

        for (i, c) in text.chars().enumerate() {
            let col = first_col + i as i64;
            if col >= self.cols as i64 {
                break;
            }
            if col < 0 || c.is_whitespace() {
                continue;
            }
            let col = col as u16;
            let composed = self
                .backdrop
                .compose(under, col, row, self.cols, self.rows);
            let fg = quantize(composed, self.color_mode);
            let bg = self.background_at(col, row);
            self.set(col, row, Cell::glyph(c, fg, bg, bold));
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;

    use super::*;
    use crate::palette::{Rgb, Rgba};

    fn style(px: f64) -> TextStyle {
        TextStyle {
            font_px: px,
            font_family: "monospace",
            fill: Rgba::new(Rgb::new(59, 130, 246), 0.4),
        }
    }

    fn frame(cols: u16, rows: u16) -> Frame {
        Frame::new(
            cols,
            rows,
            CellMetrics::default(),
            Backdrop::Black,
            ColorMode::TrueColor,
        )
    }

    fn row_text(f: &Frame, row: u16) -> String {
        (0..f.cols)
            .map(|c| f.get(c, row).map(|cell| cell.ch).unwrap_or('?'))
            .collect()
    }

    #[test]
    fn pixel_size_follows_metrics() {
        let f = frame(10, 4);
        assert_eq!((f.width(), f.height()), (80, 64));
    }

    #[test]
    fn text_lands_on_the_baseline_row() {
        let mut f = frame(10, 4);
        f.fill_text("ab", 16.0, 32.0, &style(12.0));
        assert_eq!(row_text(&f, 1), "  ab      ");
        f.fill_text("c", 0.0, 33.0, &style(12.0));
        assert_eq!(f.get(0, 2).map(|c| c.ch), Some('c'));
    }

    #[test]
    fn whitespace_keeps_what_is_underneath() {
        let mut f = frame(10, 2);
        f.fill_text("xxxx", 0.0, 16.0, &style(12.0));
        f.fill_text("a  b", 0.0, 16.0, &style(12.0));
        assert_eq!(row_text(&f, 0), "axxb      ");
    }

    #[test]
    fn clips_left_right_and_vertical() {
        let mut f = frame(4, 2);
        f.fill_text("abcdef", -16.0, 16.0, &style(12.0));
        assert_eq!(row_text(&f, 0), "cdef");
        f.fill_text("zz", 0.0, -5.0, &style(12.0));
        f.fill_text("zz", 0.0, 650.0, &style(12.0));
        f.fill_text("zz", f64::NAN, 16.0, &style(12.0));
        assert_eq!(row_text(&f, 1), "    ");
    }

    #[test]
    fn clear_restores_backdrop() {
        let mut f = frame(4, 2);
        f.fill_text("abcd", 0.0, 16.0, &style(12.0));
        f.clear();
        assert!(f.get(0, 0).is_some_and(|c| c.ch == ' '));
        assert_eq!(f.get(0, 0).and_then(|c| c.bg), Some(Color::Rgb { r: 0, g: 0, b: 0 }));
    }

    #[test]
    fn glyph_colour_is_blended_and_large_text_is_bold() {
        let mut f = frame(4, 2);
        f.fill_text("a", 0.0, 16.0, &style(13.5));
        f.fill_text("b", 8.0, 16.0, &style(10.0));
        let a = f.get(0, 0).copied().expect("in range");
        let b = f.get(1, 0).copied().expect("in range");
        assert_eq!(
            a.fg,
            Some(Color::Rgb {
                r: 24,
                g: 52,
                b: 98
            })
        );
        assert!(a.bold);
        assert!(!b.bold);
    }

    #[test]
    fn resize_regrids_without_touching_metrics() {
        let mut f = frame(10, 4);
        f.resize(40, 33);
        assert_eq!((f.cols, f.rows), (5, 2));
        assert_eq!((f.width(), f.height()), (40, 33));
        f.clear();
        f.fill_text("hello!", 0.0, 16.0, &style(12.0));
        assert_eq!(row_text(&f, 0), "hello");
    }

    #[test]
    fn cell_metrics_parse() {
        assert_eq!(
            "8x16".parse::<CellMetrics>(),
            Ok(CellMetrics {
                width: 8,
                height: 16
            })
        );
        assert_eq!(
            " 10 X 20 ".parse::<CellMetrics>(),
            Ok(CellMetrics {
                width: 10,
                height: 20
            })
        );
        assert!("0x16".parse::<CellMetrics>().is_err());
        assert!("816".parse::<CellMetrics>().is_err());
    }
}
