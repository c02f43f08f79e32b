//! Terminal event polling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self as crossterm_event, KeyEventKind};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::model::AppMessage;

const POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// Background thread forwarding crossterm input and periodic ticks
///
/// Events go into the same channel the effect runner reports on, so the
/// application loop has a single queue to drain.
pub struct EventLoop {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl EventLoop {
    pub fn spawn(tx: UnboundedSender<AppMessage>, tick_rate: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut last_tick = Instant::now();

            while !stop_flag.load(Ordering::Relaxed) {
                if crossterm_event::poll(POLL_TIMEOUT).unwrap_or(false) {
                    if let Ok(event) = crossterm_event::read() {
                        if let Some(message) = event_to_message(event) {
                            if tx.send(message).is_err() {
                                break;
                            }
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(AppMessage::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
            debug!("Event loop stopped");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Convert a crossterm event to an [`AppMessage`]
///
/// Key releases and repeats are dropped so each press acts once on every
/// platform.
pub fn event_to_message(event: crossterm_event::Event) -> Option<AppMessage> {
    match event {
        crossterm_event::Event::Key(key) if key.kind == KeyEventKind::Press => {
            Some(AppMessage::KeyPress(key))
        }
        crossterm_event::Event::Resize(width, height) => {
            Some(AppMessage::Resize { width, height })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_key_press_becomes_message() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE));
        assert!(matches!(
            event_to_message(event),
            Some(AppMessage::KeyPress(k)) if k.code == KeyCode::Char('l')
        ));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('l'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(event_to_message(Event::Key(release)).is_none());
    }

    #[test]
    fn test_resize_and_focus() {
        assert!(matches!(
            event_to_message(Event::Resize(120, 40)),
            Some(AppMessage::Resize { width: 120, height: 40 })
        ));
        assert!(event_to_message(Event::FocusGained).is_none());
    }
}
