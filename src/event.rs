use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Bracketed paste, only meaningful on the name screen.
    Paste(String),
    Tick,
}

/// Reads terminal input on a background thread. Only key presses are
/// forwarded; repeats and releases would double-submit answers.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let event = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(AppEvent::Key(key))
                        }
                        Ok(Event::Paste(text)) => Some(AppEvent::Paste(text)),
                        Ok(_) => None,
                        Err(err) => {
                            tracing::error!(%err, "terminal read failed");
                            return;
                        }
                    },
                    Ok(false) => Some(AppEvent::Tick),
                    Err(err) => {
                        tracing::error!(%err, "terminal poll failed");
                        return;
                    }
                };
                if let Some(event) = event {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
