//! Host console mode guard.
//!
//! QEMU leaves the Windows console input mode in whatever state its own
//! frontend was using when it exits, so the mode captured before launch has
//! to be put back by hand. The guard reads the mode on creation and
//! restores it on drop, which covers every exit path out of the run stage.
//! Restoration is best-effort: a console that cannot be read or written is
//! left alone. On other hosts the guard does nothing.

/// Captures the host console input mode and restores it when dropped.
#[derive(Debug)]
pub struct ConsoleModeGuard {
    #[cfg(windows)]
    saved_raw: Option<bool>,
}

impl ConsoleModeGuard {
    /// Capture the current console mode.
    #[cfg(windows)]
    pub fn capture() -> Self {
        Self {
            saved_raw: crossterm::terminal::is_raw_mode_enabled().ok(),
        }
    }

    /// Capture the current console mode.
    #[cfg(not(windows))]
    pub fn capture() -> Self {
        Self {}
    }
}

impl Drop for ConsoleModeGuard {
    #[cfg(windows)]
    fn drop(&mut self) {
        let raw = match self.saved_raw {
            Some(raw) => raw,
            None => return,
        };
        let _ = if raw {
            crossterm::terminal::enable_raw_mode()
        } else {
            crossterm::terminal::disable_raw_mode()
        };
    }

    #[cfg(not(windows))]
    fn drop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_and_drop() {
        let guard = ConsoleModeGuard::capture();
        drop(guard);
    }
}
