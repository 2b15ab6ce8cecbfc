use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;

use crate::error::AppResult;

/// What the app draws into: the real terminal or a `TestBackend` in tests.
pub(crate) trait TerminalSurface {
    fn size(&self) -> io::Result<Size>;

    fn clear(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);
}

/// Terminal modes the gallery switches on at startup, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenMode {
    RawInput,
    AlternateScreen,
    MouseCapture,
    HiddenCursor,
}

impl ScreenMode {
    const STARTUP: [ScreenMode; 4] = [
        ScreenMode::RawInput,
        ScreenMode::AlternateScreen,
        ScreenMode::MouseCapture,
        ScreenMode::HiddenCursor,
    ];

    fn enable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::RawInput => enable_raw_mode(),
            Self::AlternateScreen => execute!(out, EnterAlternateScreen),
            Self::MouseCapture => execute!(out, EnableMouseCapture),
            Self::HiddenCursor => execute!(out, Hide),
        }
    }

    fn disable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::RawInput => disable_raw_mode(),
            Self::AlternateScreen => execute!(out, LeaveAlternateScreen),
            Self::MouseCapture => execute!(out, DisableMouseCapture),
            Self::HiddenCursor => execute!(out, Show),
        }
    }
}

/// Modes currently switched on. Unwinding turns them off last-in first-out.
#[derive(Debug, Default)]
struct ModeStack {
    enabled: Vec<ScreenMode>,
}

impl ModeStack {
    fn enable_all(modes: &[ScreenMode], out: &mut impl Write) -> io::Result<Self> {
        let mut stack = Self::default();
        for &mode in modes {
            if let Err(err) = mode.enable(out) {
                let _ = stack.unwind(out);
                return Err(err);
            }
            stack.enabled.push(mode);
        }
        Ok(stack)
    }

    /// Every mode is attempted even after a failure; the first error wins.
    fn unwind(&mut self, out: &mut impl Write) -> io::Result<()> {
        let mut first_error = None;
        while let Some(mode) = self.enabled.pop() {
            if let Err(err) = mode.disable(out) {
                tracing::warn!(?mode, error = %err, "failed to restore terminal mode");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    modes: ModeStack,
}

impl TerminalSession {
    pub(crate) fn enter() -> AppResult<Self> {
        let mut stdout = io::stdout();
        let mut modes = ModeStack::enable_all(&ScreenMode::STARTUP, &mut stdout)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).and_then(|mut terminal| {
            terminal.clear()?;
            Ok(terminal)
        });
        match terminal {
            Ok(terminal) => Ok(Self { terminal, modes }),
            Err(err) => {
                let _ = modes.unwind(&mut io::stdout());
                Err(err.into())
            }
        }
    }

    /// Hands the terminal back to the shell. Safe to call more than once.
    pub(crate) fn restore(&mut self) -> io::Result<()> {
        if self.modes.is_empty() {
            return Ok(());
        }
        self.modes.unwind(self.terminal.backend_mut())
    }
}

impl TerminalSurface for TerminalSession {
    fn size(&self) -> io::Result<Size> {
        self.terminal.size()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.terminal.clear()
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render).map(|_| ())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
