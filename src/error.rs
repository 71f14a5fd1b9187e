// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("failed to apply {name} {value} (must be a finite number)")]
    NotFinite { name: &'static str, value: f64 },

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid --colormode: {0} (allowed: 0,16,8,256,24,32)")]
    ColorMode(u16),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
