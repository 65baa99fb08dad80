//! Background key readers.
//!
//! A reader thread owns the key source and forwards each character over a
//! bounded channel. The control loop polls the receiving side with
//! `try_recv`, so it never blocks on the reader.
//!
//! Two sources exist. `spawn_terminal` puts the console in raw mode and reads
//! crossterm key events, so keys arrive without Enter; raw mode swallows the
//! Ctrl-C signal, so the reader raises the caller's interrupt flag itself.
//! `spawn` reads bytes from any `Read` (piped stdin, tests).
use crossbeam_channel as xch;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{HwError, Result};

/// Keys buffered between the reader thread and the control loop.
const KEY_BUFFER: usize = 64;
/// How long the event thread waits before rechecking its stop flag.
const EVENT_POLL: Duration = Duration::from_millis(50);

/// What a console key event means to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Char(char),
    Interrupt,
}

fn key_action(ev: &Event) -> Option<KeyAction> {
    let Event::Key(key) = ev else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c' | 'C') if ctrl => Some(KeyAction::Interrupt),
        KeyCode::Char(c) if !ctrl && !c.is_whitespace() => Some(KeyAction::Char(c)),
        _ => None,
    }
}

/// Console raw mode, left again on drop.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

pub struct KeyReader {
    rx: xch::Receiver<char>,
    stop: Arc<AtomicBool>,
    _raw: Option<RawMode>,
}

impl KeyReader {
    /// Read console key events in raw mode.
    ///
    /// Ctrl-C raises `interrupt` instead of being forwarded. Fails when the
    /// console cannot enter raw mode (stdin is not a terminal); the console
    /// is restored when the reader is dropped.
    pub fn spawn_terminal(interrupt: Arc<AtomicBool>) -> Result<Self> {
        let raw = RawMode::enable()?;
        let (tx, rx) = xch::bounded(KEY_BUFFER);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        std::thread::Builder::new()
            .name("key_reader".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    match event::poll(EVENT_POLL) {
                        Ok(true) => {}
                        Ok(false) => continue,
                        Err(e) => {
                            tracing::warn!(error = %e, "console event poll failed");
                            break;
                        }
                    }
                    let ev = match event::read() {
                        Ok(ev) => ev,
                        Err(e) => {
                            tracing::warn!(error = %e, "console event read failed");
                            break;
                        }
                    };
                    match key_action(&ev) {
                        Some(KeyAction::Char(c)) => {
                            if tx.send(c).is_err() {
                                tracing::debug!("key consumer disconnected, exiting thread");
                                break;
                            }
                        }
                        Some(KeyAction::Interrupt) => {
                            tracing::info!("Ctrl-C pressed");
                            interrupt.store(true, Ordering::Relaxed);
                        }
                        None => {}
                    }
                }
                tracing::trace!("key reader thread exiting");
            })?;
        Ok(Self {
            rx,
            stop,
            _raw: Some(raw),
        })
    }

    pub fn spawn<R: Read + Send + 'static>(mut source: R) -> Self {
        let (tx, rx) = xch::bounded(KEY_BUFFER);
        std::thread::Builder::new()
            .name("key_reader".into())
            .spawn(move || {
                let mut byte = [0u8; 1];
                loop {
                    match source.read(&mut byte) {
                        Ok(0) => {
                            tracing::debug!("key source reached EOF");
                            break;
                        }
                        Ok(_) => {
                            let c = char::from(byte[0]);
                            if c.is_ascii_whitespace() {
                                continue;
                            }
                            // If send fails, consumer is gone; exit gracefully
                            if tx.send(c).is_err() {
                                tracing::debug!("key consumer disconnected, exiting thread");
                                break;
                            }
                        }
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            tracing::warn!(error = %e, "key source read failed");
                            break;
                        }
                    }
                }
                tracing::trace!("key reader thread exiting");
            })
            .map(|_detached| ())
            .unwrap_or_else(|e| tracing::error!(error = %e, "failed to spawn key reader"));
        Self::from_receiver(rx)
    }

    /// Build a reader over an existing channel (used by tests and embedders).
    pub fn from_receiver(rx: xch::Receiver<char>) -> Self {
        Self {
            rx,
            stop: Arc::new(AtomicBool::new(false)),
            _raw: None,
        }
    }

    /// Next buffered key, if any.
    ///
    /// Returns `Disconnected` only once the source is exhausted and every
    /// buffered key has been consumed.
    pub fn poll(&self) -> Result<Option<char>> {
        match self.rx.try_recv() {
            Ok(c) => Ok(Some(c)),
            Err(xch::TryRecvError::Empty) => Ok(None),
            Err(xch::TryRecvError::Disconnected) => Err(HwError::Disconnected),
        }
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use std::time::Instant;

    fn drain(reader: &KeyReader) -> Vec<char> {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut out = Vec::new();
        while Instant::now() < deadline {
            match reader.poll() {
                Ok(Some(c)) => out.push(c),
                Ok(None) => std::thread::sleep(Duration::from_millis(1)),
                Err(_) => break,
            }
        }
        out
    }

    #[test]
    fn forwards_non_whitespace_bytes_then_disconnects() {
        let reader = KeyReader::spawn(std::io::Cursor::new(b"1 z\nf".to_vec()));
        assert_eq!(drain(&reader), vec!['1', 'z', 'f']);
        assert!(matches!(reader.poll(), Err(HwError::Disconnected)));
    }

    #[test]
    fn console_keys_become_characters() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE));
        assert_eq!(key_action(&ev), Some(KeyAction::Char('2')));
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('Z'), KeyModifiers::SHIFT));
        assert_eq!(key_action(&ev), Some(KeyAction::Char('Z')));
    }

    #[test]
    fn ctrl_c_interrupts_instead_of_typing() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(key_action(&ev), Some(KeyAction::Interrupt));
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(key_action(&ev), None);
    }

    #[test]
    fn releases_and_non_key_events_are_ignored() {
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('1'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(key_action(&Event::Key(release)), None);
        assert_eq!(key_action(&Event::Resize(80, 24)), None);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(key_action(&Event::Key(enter)), None);
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(key_action(&Event::Key(space)), None);
    }
}
