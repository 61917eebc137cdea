//! # mirrordash CLI Entry Point
//!
//! ## Overview
//!
//! mirrordash shows a full-screen dashboard composed from pluggable modules.
//! A profile decides which modules appear, how they are arranged, and how
//! often they are refreshed. The header animates on every tick; the body is
//! rebuilt on the profile's refresh interval.
//!
//! ## Usage
//!
//! ```bash
//! # Show the default profile
//! mirrordash
//!
//! # Show a specific profile
//! mirrordash --profile deep-work
//!
//! # List the available profiles
//! mirrordash --list
//!
//! # Render one frame and exit (pipes print plain text)
//! mirrordash --once | less
//! ```
//!
//! ## Key Bindings
//!
//! - `q` / `Esc` / `Ctrl+C` - Quit

use mirrordash::dashboard::Scheduler;
use mirrordash::modules::{self, ModuleRegistry};
use mirrordash::profile::{ProfileError, ProfileStore, ProfileSummary};
use mirrordash::ui::{BufferSurface, Config, CrosstermEventReader, Palette, TerminalSurface};
use mirrordash::{dashboard::DisplaySurface, logging};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use std::future::Future;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Size of the off-screen buffer used by `--once` when stdout is not a terminal.
const ONCE_WIDTH: u16 = 120;
const ONCE_HEIGHT: u16 = 40;

/// How long exit waits for renders still running on the blocking pool.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// mirrordash - a modular terminal dashboard
#[derive(Parser, Debug)]
#[command(name = "mirrordash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A modular terminal dashboard", long_about = None)]
struct Args {
    /// Profile to show (defaults to `default_profile` from the user config)
    #[arg(short, long, value_name = "NAME")]
    profile: Option<String>,

    /// List the available profiles and exit
    #[arg(short, long, conflicts_with = "once")]
    list: bool,

    /// Render a single frame and exit
    #[arg(long)]
    once: bool,

    /// Directory holding `<name>.toml` profiles
    #[arg(long, value_name = "DIR")]
    profiles_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Module renders run on blocking-pool threads; only a panic on the main
    // thread means the terminal is about to be abandoned.
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if std::thread::current().name() == Some("main") {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
            original_hook(panic_info);
        } else {
            tracing::error!(%panic_info, "panic in worker thread");
        }
    }));

    let result = block_on(run_application(args));

    let _ = panic::take_hook();

    result?
}

/// Drive `future` on a multi-threaded runtime, then shut the runtime down
/// without waiting more than [`SHUTDOWN_GRACE`] for module renders that
/// overran their budget.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    Ok(output)
}

async fn run_application(args: Args) -> Result<()> {
    let config = Config::load()?;
    let data_dir = modules::data_dir();
    if let Some(path) = logging::init(&config, &data_dir) {
        tracing::debug!(log = %path.display(), "logging initialized");
    }

    let store = ProfileStore::resolve(args.profiles_dir.as_deref(), config.profiles_dir.as_deref());

    if args.list {
        print_profiles(&store);
        return Ok(());
    }

    let name = args
        .profile
        .unwrap_or_else(|| config.default_profile.clone());
    let profile = match store.load(&name) {
        Ok(profile) => profile,
        Err(ProfileError::NotFound { name, available }) => {
            eprintln!("Profile not found: {name}");
            if available.is_empty() {
                eprintln!("No profiles in {}", store.dir().display());
            } else {
                eprintln!("Available: {}", available.join(", "));
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to load profile"),
    };

    let palette = Palette::new(profile.theme.as_deref(), &profile.color);
    let registry = ModuleRegistry::with_builtins(&data_dir).with_budget(profile.module_timeout);
    let mut scheduler = Scheduler::new(Arc::new(profile), registry, config.tick());

    if args.once {
        run_once(&mut scheduler, palette).await
    } else {
        run_live(&mut scheduler, palette).await
    }
}

fn print_profiles(store: &ProfileStore) {
    let profiles = store.list();
    if profiles.is_empty() {
        println!("No profiles in {}", store.dir().display());
        return;
    }
    for summary in &profiles {
        println!("{}", summary_line(summary));
    }
}

fn summary_line(summary: &ProfileSummary) -> String {
    let mut line = summary.stem.clone();
    if !summary.name.is_empty() {
        line.push_str("  ");
        line.push_str(&summary.name);
    }
    if !summary.description.is_empty() {
        line.push_str(" — ");
        line.push_str(&summary.description);
    }
    line
}

/// Draw a single frame and leave it on screen (or print it as text).
async fn run_once(scheduler: &mut Scheduler, palette: Palette) -> Result<()> {
    let screen = scheduler.render_once().await;

    if io::stdout().is_terminal() {
        let height = crossterm::terminal::size()
            .map(|(_, rows)| rows.saturating_sub(1).max(1))
            .unwrap_or(ONCE_HEIGHT);
        let terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )
        .context("Failed to create terminal")?;
        let mut surface = TerminalSurface::new(terminal, palette);
        surface.paint(&screen)?;
        println!();
    } else {
        let mut surface = BufferSurface::new(ONCE_WIDTH, ONCE_HEIGHT, palette);
        surface.paint(&screen)?;
        println!("{}", surface.to_plain());
    }
    Ok(())
}

async fn run_live(scheduler: &mut Scheduler, palette: Palette) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    let mut surface = TerminalSurface::new(terminal, palette);

    // Run the dashboard and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = scheduler.run(&mut surface, &mut event_reader).await;

    let cleanup_result = cleanup_terminal(surface.terminal_mut());

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .context("Failed to restore terminal")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["mirrordash"]).unwrap();
        assert_eq!(args.profile, None);
        assert!(!args.list);
        assert!(!args.once);
        assert_eq!(args.profiles_dir, None);
    }

    #[test]
    fn test_args_parsing_with_profile() {
        let args = Args::try_parse_from(["mirrordash", "-p", "deep-work", "--once"]).unwrap();
        assert_eq!(args.profile.as_deref(), Some("deep-work"));
        assert!(args.once);

        let args = Args::try_parse_from(["mirrordash", "--profile", "ops"]).unwrap();
        assert_eq!(args.profile.as_deref(), Some("ops"));
    }

    #[test]
    fn test_args_parsing_with_profiles_dir() {
        let args =
            Args::try_parse_from(["mirrordash", "--profiles-dir", "/some/dir", "-l"]).unwrap();
        assert_eq!(args.profiles_dir, Some(PathBuf::from("/some/dir")));
        assert!(args.list);
    }

    #[test]
    fn test_list_conflicts_with_once() {
        assert!(Args::try_parse_from(["mirrordash", "--list", "--once"]).is_err());
    }

    #[test]
    fn test_block_on_does_not_wait_for_stuck_renders() {
        let started = std::time::Instant::now();
        let value = block_on(async {
            drop(tokio::task::spawn_blocking(|| {
                std::thread::sleep(Duration::from_secs(3));
            }));
            7
        })
        .unwrap();
        assert_eq!(value, 7);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_summary_line() {
        let summary = ProfileSummary {
            stem: "deep".to_string(),
            name: "Deep Work".to_string(),
            description: "one task, no noise".to_string(),
        };
        assert_eq!(summary_line(&summary), "deep  Deep Work — one task, no noise");

        let broken = ProfileSummary {
            stem: "broken".to_string(),
            name: String::new(),
            description: String::new(),
        };
        assert_eq!(summary_line(&broken), "broken");
    }
}
