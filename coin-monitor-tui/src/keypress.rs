//! Background listener that stops the dashboard on the first key press.

use coin_monitor::CancelSignal;
use crossterm::event::{self, Event, KeyEventKind};
use std::{io, thread, time::Duration};
use tracing::{debug, warn};

/// How long a single event poll blocks before re-checking the cancel flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// True for events that should stop the dashboard: any key press (not release or repeat).
pub fn is_stop_event(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.kind == KeyEventKind::Press)
}

/// Source of terminal events.
pub trait EventSource {
    /// Wait up to `timeout` for an event; true if one is ready.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read the next event.
    fn read(&mut self) -> io::Result<Event>;
}

impl<E: EventSource + ?Sized> EventSource for &mut E {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }
}

/// [`EventSource`] reading the real terminal through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Spawn the listener thread on the real terminal.
///
/// The thread exits after cancelling, or once `cancel` is set by someone else.
pub fn spawn_keypress_listener(cancel: CancelSignal) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("keypress".to_string())
        .spawn(move || listen(cancel, TerminalEvents))
}

/// Cancel on the first key press from `events`; returns once `cancel` is set.
pub fn listen<E: EventSource>(cancel: CancelSignal, mut events: E) {
    while !cancel.is_cancelled() {
        match events.poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => match events.read() {
                Ok(event) if is_stop_event(&event) => {
                    debug!("Key pressed, stopping dashboard");
                    cancel.cancel();
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "Failed to read terminal event, stopping dashboard");
                    cancel.cancel();
                }
            },
            Err(error) => {
                warn!(%error, "Failed to poll terminal events, stopping dashboard");
                cancel.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use std::collections::VecDeque;

    /// Replays queued events, counting calls.
    #[derive(Default)]
    struct ScriptedEvents {
        events: VecDeque<io::Result<Event>>,
        polls: usize,
        reads: usize,
    }

    impl ScriptedEvents {
        fn new(events: Vec<io::Result<Event>>) -> Self {
            Self {
                events: events.into(),
                ..Default::default()
            }
        }
    }

    impl EventSource for ScriptedEvents {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            self.polls += 1;
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.reads += 1;
            self.events
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::other("no event queued")))
        }
    }

    /// Never has an event ready.
    struct IdleEvents;

    impl EventSource for IdleEvents {
        fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
            thread::sleep(timeout.min(Duration::from_millis(5)));
            Ok(false)
        }

        fn read(&mut self) -> io::Result<Event> {
            Err(io::Error::other("no event ready"))
        }
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_is_stop_event() {
        struct TestCase {
            input: Event,
            expected: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: any key, not only 'q'
                input: key(KeyCode::Char('x'), KeyEventKind::Press),
                expected: true,
            },
            TestCase {
                // TC1
                input: key(KeyCode::Enter, KeyEventKind::Press),
                expected: true,
            },
            TestCase {
                // TC2: release of a key pressed before start
                input: key(KeyCode::Char('q'), KeyEventKind::Release),
                expected: false,
            },
            TestCase {
                // TC3: resize only changes the layout
                input: Event::Resize(80, 24),
                expected: false,
            },
            TestCase {
                // TC4
                input: Event::FocusLost,
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(is_stop_event(&test.input), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_listen_returns_when_already_cancelled() {
        let cancel = CancelSignal::new();
        cancel.cancel();

        let mut events =
            ScriptedEvents::new(vec![Ok(key(KeyCode::Char('x'), KeyEventKind::Press))]);
        listen(cancel, &mut events);

        assert_eq!(events.polls, 0);
        assert_eq!(events.reads, 0);
    }

    #[test]
    fn test_listen_exits_when_cancelled_elsewhere() {
        let cancel = CancelSignal::new();
        let listener = {
            let cancel = cancel.clone();
            thread::spawn(move || listen(cancel, IdleEvents))
        };

        thread::sleep(Duration::from_millis(20));
        cancel.cancel();
        listener.join().unwrap();
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_listen_cancels_on_first_key_press() {
        let cancel = CancelSignal::new();
        let mut events = ScriptedEvents::new(vec![
            Ok(Event::Resize(100, 40)),
            Ok(key(KeyCode::Char('q'), KeyEventKind::Release)),
            Ok(key(KeyCode::Char('a'), KeyEventKind::Press)),
            Ok(key(KeyCode::Char('b'), KeyEventKind::Press)),
        ]);

        listen(cancel.clone(), &mut events);

        assert!(cancel.is_cancelled());
        assert_eq!(events.reads, 3);
        assert_eq!(events.events.len(), 1);
    }

    #[test]
    fn test_listen_cancels_on_read_error() {
        let cancel = CancelSignal::new();
        let mut events = ScriptedEvents::new(vec![Err(io::Error::other("tty closed"))]);

        listen(cancel.clone(), &mut events);
        assert!(cancel.is_cancelled());
    }
}
