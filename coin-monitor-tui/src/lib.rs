/// Coin Monitor TUI - Terminal Front-End
///
/// Glue between the `coin-monitor` dashboard and a real terminal:
/// - surface: ratatui/crossterm implementation of the dashboard's drawing surface
/// - keypress: background thread that stops the dashboard on the first key press
/// - logging: tracing output to a file, away from the screen
pub mod keypress;
pub mod logging;
pub mod surface;

pub use keypress::{EventSource, TerminalEvents, is_stop_event, listen, spawn_keypress_listener};
pub use logging::{init_logging, log_path};
pub use surface::{TerminalSurface, terminal_color};
