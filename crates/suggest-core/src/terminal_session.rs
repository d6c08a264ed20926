#![forbid(unsafe_code)]

//! RAII terminal guard for interactive suggest hosts.
//!
//! Creating a [`TerminalSession`] puts the terminal in raw mode and turns on
//! the optional modes a suggest field benefits from: the alternate screen,
//! mouse capture (row clicks), bracketed paste and focus reporting (focus
//! gained/lost drive the panel). Dropping it turns them off again in reverse
//! order. A process-wide panic hook performs the same restore so a panicking
//! host does not leave the shell in raw mode.
//!
//! # Cleanup Order
//!
//! 1. Disable focus events (if enabled)
//! 2. Disable bracketed paste (if enabled)
//! 3. Disable mouse capture (if enabled)
//! 4. Show cursor (always)
//! 5. Leave alternate screen (if enabled)
//! 6. Exit raw mode (always)
//! 7. Flush stdout
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use suggest_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions::interactive())?;
//! while let Some(event) = session.next_event(Duration::from_millis(50))? {
//!     // feed `event` to the field...
//!     # let _ = event;
//!     # break;
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crate::event::Event;

/// Which terminal modes a session turns on. All default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Switch to the alternate screen buffer (`CSI ? 1049 h`).
    pub alternate_screen: bool,

    /// Report mouse presses with SGR coordinates (`CSI ? 1000;1002;1006 h`).
    pub mouse_capture: bool,

    /// Wrap pasted text in `ESC [ 200 ~` / `ESC [ 201 ~` (`CSI ? 2004 h`).
    pub bracketed_paste: bool,

    /// Report focus changes as `ESC [ I` / `ESC [ O` (`CSI ? 1004 h`).
    pub focus_events: bool,
}

impl SessionOptions {
    /// Every mode on: what a full-screen suggest host wants.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: true,
            bracketed_paste: true,
            focus_events: true,
        }
    }

    /// Set mouse capture.
    #[must_use]
    pub const fn with_mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse_capture = enabled;
        self
    }
}

/// Owns raw mode and the enabled terminal modes until dropped.
///
/// Only one session should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
    bracketed_paste_enabled: bool,
    focus_events_enabled: bool,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested modes.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or any requested mode cannot be enabled.
    /// Modes enabled before the failure are restored by `Drop`.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        crate::info!("terminal raw mode enabled");

        let mut session = Self {
            options,
            alternate_screen_enabled: false,
            mouse_enabled: false,
            bracketed_paste_enabled: false,
            focus_events_enabled: false,
        };

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
        }

        if options.mouse_capture {
            crossterm::execute!(stdout, crossterm::event::EnableMouseCapture)?;
            session.mouse_enabled = true;
        }

        if options.bracketed_paste {
            crossterm::execute!(stdout, crossterm::event::EnableBracketedPaste)?;
            session.bracketed_paste_enabled = true;
        }

        if options.focus_events {
            crossterm::execute!(stdout, crossterm::event::EnableFocusChange)?;
            session.focus_events_enabled = true;
        }

        crate::debug!(
            alternate_screen = options.alternate_screen,
            mouse_capture = options.mouse_capture,
            bracketed_paste = options.bracketed_paste,
            focus_events = options.focus_events,
            "terminal session started"
        );

        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for input. `Ok(false)` means the wait timed out.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event, blocking until one arrives.
    ///
    /// Returns `Ok(None)` for terminal events with no canonical mapping.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        let event = crossterm::event::read()?;
        Ok(Event::from_crossterm(event))
    }

    /// Poll then read: `Ok(Some(Event::Tick))` when `timeout` elapses idle.
    pub fn next_event(&self, timeout: Duration) -> io::Result<Option<Event>> {
        if self.poll_event(timeout)? {
            self.read_event()
        } else {
            Ok(Some(Event::Tick))
        }
    }

    /// Show or hide the hardware cursor.
    pub fn set_cursor_visible(&self, visible: bool) -> io::Result<()> {
        if visible {
            crossterm::execute!(io::stdout(), crossterm::cursor::Show)
        } else {
            crossterm::execute!(io::stdout(), crossterm::cursor::Hide)
        }
    }

    /// The options this session was created with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.focus_events_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
            self.focus_events_enabled = false;
        }

        if self.bracketed_paste_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableBracketedPaste);
            self.bracketed_paste_enabled = false;
        }

        if self.mouse_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
            self.mouse_enabled = false;
        }

        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }

        let _ = crossterm::terminal::disable_raw_mode();
        crate::info!("terminal restored");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
    let _ = crossterm::execute!(stdout, crossterm::event::DisableBracketedPaste);
    let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}
