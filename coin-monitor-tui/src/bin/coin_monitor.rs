/// Coin Monitor
///
/// Live exchange rates for the configured coins, colored by trend, with percentage change
/// since the first run. Press any key to exit.
use std::{
    error::Error,
    io::{self, Stdout},
    path::Path,
};

use coin_monitor::{
    CancelSignal, Dashboard, JsonBaselineStore, Settings,
    config::{BASELINE_FILE, config_dir},
};
use coin_monitor_tui::{TerminalSurface, init_logging, log_path, spawn_keypress_listener};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let dir = config_dir();
    if let Err(error) = init_logging(&log_path(&dir)) {
        eprintln!("coin-monitor: logging disabled: {}", error);
    }

    // Settings problems are reported before the terminal is taken over
    let settings = match Settings::load_or_init(&dir) {
        Ok(settings) => settings,
        Err(error) => {
            error!(%error, "Failed to load settings");
            eprintln!("coin-monitor: {}", error);
            std::process::exit(1);
        }
    };
    info!(
        coins = settings.coins.len(),
        api = %settings.api,
        "Starting coin-monitor"
    );

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let mut surface = TerminalSurface::new(Terminal::new(CrosstermBackend::new(stdout))?);

    let result = run_dashboard(&mut surface, settings, &dir).await;

    restore_terminal(surface.terminal_mut())?;

    if let Err(error) = result {
        error!(%error, "Dashboard failed");
        eprintln!("coin-monitor: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run_dashboard(
    surface: &mut TerminalSurface<CrosstermBackend<Stdout>>,
    settings: Settings,
    dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let cancel = CancelSignal::new();
    let listener = spawn_keypress_listener(cancel.clone())?;

    let store = JsonBaselineStore::new(dir.join(BASELINE_FILE));
    let mut dashboard = Dashboard::from_settings(settings, store, cancel.clone());
    let result = dashboard.run(surface).await;

    // Stop the listener when the dashboard ended on an error
    cancel.cancel();
    if listener.join().is_err() {
        error!("Keypress listener panicked");
    }

    Ok(result?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()
}
