// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const SLATE_900: Rgb = Rgb::new(15, 23, 42);
pub const BLUE_900: Rgb = Rgb::new(30, 58, 138);
pub const PURPLE_900: Rgb = Rgb::new(88, 28, 135);

/// A colour with canvas-style alpha in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    pub const fn new(rgb: Rgb, alpha: f64) -> Self {
        Self { rgb, alpha }
    }
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let a = a as f64;
    let b = b as f64;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

/// Source-over compositing of `top` at `alpha` onto an opaque `under`.
pub fn blend(top: Rgb, alpha: f64, under: Rgb) -> Rgb {
    let a = if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Rgb {
        r: lerp_u8(under.r, top.r, a),
        g: lerp_u8(under.g, top.g, a),
        b: lerp_u8(under.b, top.b, a),
    }
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = (a.r as i32) - (b.r as i32);
    let dg = (a.g as i32) - (b.g as i32);
    let db = (a.b as i32) - (b.b as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| (((v as u16 * 5) + 127) / 255) as u8;
    let (r6, g6, b6) = (level(c.r), level(c.g), level(c.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + (36 * r6) + (6 * g6) + b6;

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = if avg < 8 {
        (16, BLACK)
    } else if avg > 238 {
        (231, Rgb::new(255, 255, 255))
    } else {
        let idx = 232 + ((avg - 8) / 10);
        let v = 8 + 10 * (idx - 232);
        (idx, Rgb::new(v, v, v))
    };

    if dist2(c, gray) < dist2(c, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, Rgb::new(0, 0, 0)),
        (Color::DarkGrey, Rgb::new(128, 128, 128)),
        (Color::Grey, Rgb::new(192, 192, 192)),
        (Color::White, Rgb::new(255, 255, 255)),
        (Color::DarkRed, Rgb::new(128, 0, 0)),
        (Color::Red, Rgb::new(255, 0, 0)),
        (Color::DarkGreen, Rgb::new(0, 128, 0)),
        (Color::Green, Rgb::new(0, 255, 0)),
        (Color::DarkBlue, Rgb::new(0, 0, 128)),
        (Color::Blue, Rgb::new(0, 0, 255)),
        (Color::DarkCyan, Rgb::new(0, 128, 128)),
        (Color::Cyan, Rgb::new(0, 255, 255)),
        (Color::DarkMagenta, Rgb::new(128, 0, 128)),
        (Color::Magenta, Rgb::new(255, 0, 255)),
        (Color::DarkYellow, Rgb::new(128, 128, 0)),
        (Color::Yellow, Rgb::new(255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2(c, *rgb))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}

/// Maps a composed colour onto what the terminal can show. Mono terminals
/// get no colour at all.
pub fn quantize(c: Rgb, mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::Color16 => Some(rgb_to_color16(c)),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }),
    }
}

/// What sits behind (and, for `Slate`, in front of) the particle canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    /// slate-900 page with the diagonal slate/blue/purple tint layered on top.
    Slate,
    Black,
    /// Leave the terminal's own background alone; blend as if it were black.
    DefaultBackground,
}

const OVERLAY_STOPS: [(Rgb, f64); 3] = [(SLATE_900, 0.4), (BLUE_900, 0.2), (PURPLE_900, 0.4)];

/// Tint colour and alpha of the top-left to bottom-right gradient at a cell.
fn overlay_at(col: u16, row: u16, cols: u16, rows: u16) -> (Rgb, f64) {
    let fx = (col as f64 + 0.5) / cols.max(1) as f64;
    let fy = (row as f64 + 0.5) / rows.max(1) as f64;
    let t = ((fx + fy) * 0.5).clamp(0.0, 1.0);

    let segs = OVERLAY_STOPS.len() - 1;
    let pos = t * segs as f64;
    let seg = (pos.floor() as usize).min(segs - 1);
    let lt = pos - seg as f64;
    let (c0, a0) = OVERLAY_STOPS[seg];
    let (c1, a1) = OVERLAY_STOPS[seg + 1];
    let tint = Rgb::new(
        lerp_u8(c0.r, c1.r, lt),
        lerp_u8(c0.g, c1.g, lt),
        lerp_u8(c0.b, c1.b, lt),
    );
    (tint, a0 + (a1 - a0) * lt)
}

impl Backdrop {
    pub fn base(self) -> Rgb {
        match self {
            Backdrop::Slate => SLATE_900,
            Backdrop::Black | Backdrop::DefaultBackground => BLACK,
        }
    }

    /// Applies whatever is layered above the canvas to a colour already
    /// composed over `base()`.
    pub fn compose(self, under: Rgb, col: u16, row: u16, cols: u16, rows: u16) -> Rgb {
        match self {
            Backdrop::Slate => {
                let (tint, alpha) = overlay_at(col, row, cols, rows);
                blend(tint, alpha, under)
            }
            Backdrop::Black | Backdrop::DefaultBackground => under,
        }
    }

    pub fn background(
        self,
        col: u16,
        row: u16,
        cols: u16,
        rows: u16,
        mode: ColorMode,
    ) -> Option<Color> {
        match self {
            Backdrop::DefaultBackground => None,
            _ => quantize(self.compose(self.base(), col, row, cols, rows), mode),
        }
    }
}
