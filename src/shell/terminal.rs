use crate::core::error::Result;
use portable_pty::PtySize;
use std::io::IsTerminal;
use tokio::sync::mpsc;
use tracing::debug;

const FALLBACK_SIZE: TerminalSize = TerminalSize { rows: 24, cols: 80 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub rows: u16,
    pub cols: u16,
}

impl TerminalSize {
    /// Dimensions of the invoking terminal, 80x24 when there is none.
    pub fn current() -> Self {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => Self { rows, cols },
            _ => FALLBACK_SIZE,
        }
    }
}

impl From<TerminalSize> for PtySize {
    fn from(size: TerminalSize) -> Self {
        PtySize {
            rows: size.rows,
            cols: size.cols,
            pixel_width: 0,
            pixel_height: 0,
        }
    }
}

/// Keeps the invoking terminal in raw mode until dropped.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enables raw mode only when stdin is a terminal.
    pub fn enable_if_terminal() -> Result<Option<Self>> {
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }
        crossterm::terminal::enable_raw_mode()?;
        Ok(Some(Self { _private: () }))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Re-reads the terminal size on every SIGWINCH and forwards it.
#[cfg(unix)]
pub fn watch_resizes() -> Result<mpsc::UnboundedReceiver<TerminalSize>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sig = signal(SignalKind::window_change())?;
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while sig.recv().await.is_some() {
            let size = TerminalSize::current();
            debug!("terminal resized to {}x{}", size.cols, size.rows);
            if tx.send(size).is_err() {
                break;
            }
        }
    });

    Ok(rx)
}

#[cfg(not(unix))]
pub fn watch_resizes() -> Result<mpsc::UnboundedReceiver<TerminalSize>> {
    let (_tx, rx) = mpsc::unbounded_channel();
    Ok(rx)
}
