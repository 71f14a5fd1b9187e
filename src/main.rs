// Copyright (c) 2026 rezky_nightky

mod catalog;
mod cell;
mod config;
mod error;
mod field;
mod frame;
mod overlay;
mod palette;
mod particle;
mod renderer;
mod runtime;
mod surface;
mod terminal;

use std::env;
use std::fs::OpenOptions;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::catalog::print_list_snippets;
use crate::config::{
    color_enabled_stdout, color_mode_label, default_params_usage_for_help,
    detect_color_mode_auto, Args, Settings,
};
use crate::error::Error;
use crate::frame::Frame;
use crate::overlay::Overlay;
use crate::palette::{quantize, Rgb};
use crate::renderer::RenderHandle;
use crate::surface::Surface;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

/// blue-400, the accent the host content is written in.
const MESSAGE_FG: Rgb = Rgb::new(96, 165, 250);

/// Poll interval while no frame is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(100);

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

/// Logs go to a file: the alternate screen owns the terminal.
fn init_logging() {
    let path = env::var_os("CODEDRIFT_LOG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("codedrift.log"));
    let Ok(file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
    else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn install_restore_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            log::warn!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    cmd = cmd.help_template(if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    });
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let mut argv: Vec<std::ffi::OsString> = env::args_os().collect();
    for arg in argv.iter_mut().skip(1) {
        if arg == "-mB" || arg == "-mb" {
            *arg = "--message-no-border".into();
        }
    }

    let matches = cmd.get_matches_from(argv);
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn is_quit_key(k: &KeyEvent) -> bool {
    matches!(
        (k.code, k.modifiers),
        (KeyCode::Esc, _)
            | (KeyCode::Char('q'), _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
    )
}

/// Applies every queued event before the next frame is considered, so a
/// burst of input never starves rendering. Returns true when the run ends.
fn drain_events<S, F>(
    mut next: F,
    settings: &Settings,
    handle: &mut RenderHandle<S>,
) -> std::io::Result<bool>
where
    S: Surface,
    F: FnMut() -> std::io::Result<Option<Event>>,
{
    while let Some(ev) = next()? {
        match ev {
            Event::Resize(nc, nr) => {
                let (w, h) = settings.cell.pixels(nc, nr);
                handle.on_resize(w, h);
            }
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                if settings.screensaver || is_quit_key(&k) {
                    return Ok(true);
                }
            }
            _ => {}
        }
    }
    Ok(false)
}

fn print_bitcolor(args: &Args) {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let or_unset = |s: &str| {
        if s.is_empty() {
            "(unset)".to_string()
        } else {
            s.to_string()
        }
    };

    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", or_unset(&colorterm));
    println!("  TERM: {}", or_unset(&term));
    println!("  auto_detected: {}", color_mode_label(detect_color_mode_auto()));
    match args.color_mode() {
        Ok(m) => {
            if args.colormode.is_some() {
                println!("  forced: {}", color_mode_label(m));
            }
            println!("  effective: {}", color_mode_label(m));
        }
        Err(e) => println!("  effective: {}", e),
    }
}

fn run(settings: &Settings) -> Result<(), Error> {
    let mut term = match Terminal::new() {
        Ok(t) => t,
        Err(e) => {
            // Nothing to draw on; the background is decoration only.
            info!("no terminal surface available ({}), nothing to render", e);
            return Ok(());
        }
    };

    let (cols, rows) = term.size()?;
    let (width, height) = settings.cell.pixels(cols, rows);
    let frame = Frame::new(cols, rows, settings.cell, settings.backdrop, settings.color_mode);
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let Some(mut handle) = renderer::mount(Some(frame), width, height, rng) else {
        return Ok(());
    };
    handle.set_frame_rate(settings.fps);

    let mut overlay = settings.message.as_deref().map(|text| {
        Overlay::new(
            text,
            settings.message_border,
            quantize(MESSAGE_FG, settings.color_mode),
        )
    });

    let end_time = settings.duration.map(|d| Instant::now() + d);

    loop {
        let now = Instant::now();
        if end_time.is_some_and(|end| now >= end) {
            break;
        }

        let mut timeout = handle.timeout(now).unwrap_or(IDLE_POLL);
        if let Some(end) = end_time {
            timeout = timeout.min(end.saturating_duration_since(now));
        }

        if Terminal::poll_event(timeout)? {
            let mut first = true;
            let pending = || -> std::io::Result<Option<Event>> {
                if first || Terminal::poll_event(Duration::ZERO)? {
                    first = false;
                    return Terminal::read_event().map(Some);
                }
                Ok(None)
            };
            if drain_events(pending, settings, &mut handle)? {
                break;
            }
        }

        if handle.pump(Instant::now()) {
            if let Some(ov) = overlay.as_mut() {
                ov.draw(handle.surface_mut());
            }
            term.draw(handle.surface())?;
        }
    }

    handle.unmount();
    Ok(())
}

/// Handles the flags that print something and exit. Returns true when one
/// of them ran.
fn run_query(args: &Args) -> bool {
    if args.list_snippets {
        print_list_snippets();
        return true;
    }

    if args.check_bitcolor {
        print_bitcolor(args);
        return true;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return true;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("CODEDRIFT_BUILD"));
        let sha = env!("CODEDRIFT_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return true;
    }

    false
}

fn start(args: &Args) -> Result<(), Error> {
    let settings = args.resolve()?;

    init_logging();
    info!(
        "starting: fps={} mode={} backdrop={:?} cell={}x{}",
        settings.fps,
        color_mode_label(settings.color_mode),
        settings.backdrop,
        settings.cell.width,
        settings.cell.height
    );

    run(&settings)
}

fn main() {
    install_restore_handlers();

    let args = parse_args();
    if run_query(&args) {
        return;
    }

    if let Err(e) = start(&args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
