// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::frame::CellMetrics;
use crate::palette::Backdrop;
use crate::runtime::ColorMode;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  codedrift --fps 60 --color-bg slate --cell-size 8x16";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if !color_enabled_stdout() {
        return DEFAULT_PARAMS_USAGE.to_string();
    }
    let mut out = String::with_capacity(DEFAULT_PARAMS_USAGE.len() + 32);
    for (i, line) in DEFAULT_PARAMS_USAGE.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match line.strip_prefix("  codedrift") {
            Some(rest) => {
                out.push_str("  \x1b[1;34mcodedrift\x1b[0m");
                out.push_str(rest);
            }
            None => {
                out.push_str("\x1b[1;36m");
                out.push_str(line);
                out.push_str("\x1b[0m");
            }
        }
    }
    out
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "slate")]
    Slate,
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

impl From<ColorBg> for Backdrop {
    fn from(bg: ColorBg) -> Self {
        match bg {
            ColorBg::Slate => Backdrop::Slate,
            ColorBg::Black => Backdrop::Black,
            ColorBg::DefaultBackground => Backdrop::DefaultBackground,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "codedrift", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "GENERAL",
        help = "Display refresh rate driving the animation (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the particle generator for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on any keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        short = 'm',
        long = "message",
        help_heading = "GENERAL",
        help = "Text shown centred above the background"
    )]
    pub message: Option<String>,

    #[arg(
        long = "message-no-border",
        help_heading = "GENERAL",
        help = "Draw message box without border (use with --message; shorthand: -mB)"
    )]
    pub message_no_border: bool,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Slate,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Page behind the particles (slate, black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "cell-size",
        default_value = "8x16",
        help_heading = "APPEARANCE",
        help = "Pixel size of one terminal cell: WIDTHxHEIGHT (min 1 max 64 each)"
    )]
    pub cell_size: CellMetrics,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-snippets",
        help_heading = "HELP",
        help = "List the code fragments the particles carry and exit"
    )]
    pub list_snippets: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Validated run settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub fps: f64,
    pub duration: Option<Duration>,
    pub seed: Option<u64>,
    pub screensaver: bool,
    pub color_mode: ColorMode,
    pub backdrop: Backdrop,
    pub cell: CellMetrics,
    pub message: Option<String>,
    pub message_border: bool,
}

fn require_f64_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { name, value });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn require_u16_range(name: &'static str, value: u16, min: u16, max: u16) -> Result<u16, ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(value)
}

pub fn color_mode_from_env(colorterm: &str, term: &str) -> ColorMode {
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    if term.eq_ignore_ascii_case("dumb") {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = std::env::var("COLORTERM").unwrap_or_default();
    let term = std::env::var("TERM").unwrap_or_default();
    color_mode_from_env(&colorterm, &term)
}

pub fn color_mode_from_flag(m: u16) -> Result<ColorMode, ConfigError> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        other => Err(ConfigError::ColorMode(other)),
    }
}

pub fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

impl Args {
    pub fn color_mode(&self) -> Result<ColorMode, ConfigError> {
        match self.colormode {
            Some(m) => color_mode_from_flag(m),
            None => Ok(detect_color_mode_auto()),
        }
    }

    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let fps = require_f64_range("--fps", self.fps, 1.0, 240.0)?;

        let duration = match self.duration {
            Some(s) if !s.is_finite() => {
                return Err(ConfigError::NotFinite {
                    name: "--duration",
                    value: s,
                })
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };

        let cell = CellMetrics {
            width: require_u16_range("--cell-size width", self.cell_size.width, 1, 64)?,
            height: require_u16_range("--cell-size height", self.cell_size.height, 1, 64)?,
        };

        Ok(Settings {
            fps,
            duration,
            seed: self.seed,
            screensaver: self.screensaver,
            color_mode: self.color_mode()?,
            backdrop: self.color_bg.into(),
            cell,
            message: self.message.clone(),
            message_border: !self.message_no_border,
        })
    }
}
