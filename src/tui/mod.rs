//! Interactive terminal player.
//!
//! Plays a loaded [`Project`] against a simulated video clock using
//! `ratatui` and `crossterm`. The entry point is [`run_tui`], which takes
//! over the terminal, runs the event loop, and restores the terminal on exit
//! (including panics).

pub mod app;
pub mod event;
pub mod ui;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::cli::PlayArgs;
use crate::config::AppConfig;
use crate::project::Project;
use app::App;
use event::{poll_crossterm_event, AppEvent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How long to wait for a crossterm event before sampling the clock.
const TICK_RATE: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Terminal setup / teardown
// ---------------------------------------------------------------------------

/// Set up the terminal for TUI mode: raw mode and alternate screen.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the
/// panic message. Without this, a panic leaves the terminal in raw mode
/// and the alternate screen, making the shell unusable.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore; ignore errors.
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

// ---------------------------------------------------------------------------
// Signal handling
// ---------------------------------------------------------------------------

/// Set up a shared shutdown flag that is set to `true` when SIGINT or
/// SIGTERM is received from an external source (e.g. `kill -2`, `kill -15`).
///
/// Returns an `Arc<AtomicBool>` that the event loop checks each tick.
/// The flag is set by a background thread that listens for OS signals
/// using `tokio::signal` via a one-shot tokio runtime.
///
/// Note: When crossterm raw mode is active, Ctrl+C is intercepted as a
/// key event and does NOT generate SIGINT. This handler catches external
/// signals (e.g. `kill -2 <pid>`) that bypass the TUI input handling.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    std::thread::spawn(move || {
        // Build a minimal tokio runtime just for signal listening.
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(_) => return, // Best-effort: if runtime fails, skip signal handling.
        };

        rt.block_on(async {
            // Wait for either SIGINT or SIGTERM.
            tokio::select! {
                _ = async {
                    if let Ok(mut s) = tokio::signal::unix::signal(
                        tokio::signal::unix::SignalKind::interrupt(),
                    ) {
                        s.recv().await;
                    }
                } => {}
                _ = async {
                    if let Ok(mut s) = tokio::signal::unix::signal(
                        tokio::signal::unix::SignalKind::terminate(),
                    ) {
                        s.recv().await;
                    }
                } => {}
            }
            shutdown_clone.store(true, Ordering::SeqCst);
        });
    });

    shutdown
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Play `project` in the terminal.
///
/// Takes over the terminal, enters the event loop, and restores the
/// terminal on exit. This is the main entry point called from `main()`.
pub fn run_tui(config: &AppConfig, project: Project, args: &PlayArgs) -> io::Result<()> {
    install_panic_hook();

    // Set up signal handler before entering raw mode so that external
    // SIGINT/SIGTERM triggers a clean shutdown.
    let shutdown_flag = setup_signal_handler();

    let mut terminal = setup_terminal()?;
    let mut app = App::new(project, config, args);

    let result = run_event_loop(&mut terminal, &mut app, &shutdown_flag);

    // Always restore terminal, even if the event loop returned an error.
    restore_terminal(&mut terminal)?;

    if config.verbose {
        eprintln!("testreel: stopped at {:.3}s", app.video_time);
    }

    result
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// The core event loop: sample, draw, poll, handle, repeat.
///
/// Checks the `shutdown_flag` each tick. When set by the signal handler,
/// the loop performs a force-quit to ensure clean terminal restoration.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    shutdown_flag: &Arc<AtomicBool>,
) -> io::Result<()> {
    loop {
        // Check for external signal (SIGINT/SIGTERM): force quit.
        if shutdown_flag.load(Ordering::SeqCst) {
            app.should_quit = true;
            return Ok(());
        }

        // Advance to the clock's current time; no-op while paused.
        app.on_tick();

        // Draw only when state has changed.
        if app.needs_redraw {
            terminal.draw(|frame| ui::draw(frame, app))?;
            app.needs_redraw = false;
        }

        if let Some(event) = poll_crossterm_event(TICK_RATE) {
            match event {
                AppEvent::Key(key) => app.on_key(key),
                AppEvent::Resize(_, _) => {
                    // ratatui handles resize automatically on next draw.
                    app.needs_redraw = true;
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
