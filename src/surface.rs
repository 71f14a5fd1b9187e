// Copyright (c) 2026 rezky_nightky

use crate::palette::Rgba;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_px: f64,
    /// CSS-style family list. Terminal surfaces draw in whatever monospace
    /// face the terminal uses.
    pub font_family: &'static str,
    pub fill: Rgba,
}

/// A 2D drawing target measured in pixels.
///
/// `fill_text` uses canvas conventions: `(x, y)` is the left end of the
/// text baseline, and anything outside the surface is clipped silently.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
}

#[cfg(test)]
pub mod testing {
    use super::{Surface, TextStyle};

    #[derive(Clone, Debug, PartialEq)]
    pub struct DrawCall {
        pub text: String,
        pub x: f64,
        pub y: f64,
        pub style: TextStyle,
    }

    /// Counts every call so lifecycle tests can prove silence.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub clears: usize,
        pub resizes: Vec<(u32, u32)>,
        pub draws: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ..Self::default()
            }
        }

        pub fn ops(&self) -> usize {
            self.clears + self.draws.len()
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.width = width;
            self.height = height;
            self.resizes.push((width, height));
        }

        fn clear(&mut self) {
            self.clears += 1;
        }

        fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
            self.draws.push(DrawCall {
                text: text.to_string(),
                x,
                y,
                style: *style,
            });
        }
    }
}
