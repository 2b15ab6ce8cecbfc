use std::io;

use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::{Rect, Size};

use crate::app::App;
use crate::config::Config;

use super::super::terminal_session::TerminalSurface;

/// In-memory stand-in for the real terminal, readable after each frame.
pub(super) struct TestTerminalSurface {
    terminal: Terminal<TestBackend>,
}

impl TestTerminalSurface {
    pub(super) fn new(width: u16, height: u16) -> io::Result<Self> {
        Terminal::new(TestBackend::new(width, height))
            .map(|terminal| Self { terminal })
            .map_err(|never| match never {})
    }

    pub(super) fn rendered(&self) -> String {
        self.terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    /// Text inside `area`, row by row.
    pub(super) fn rendered_area(&self, area: Rect) -> String {
        let buffer = self.terminal.backend().buffer();
        area.positions()
            .filter_map(|position| buffer.cell(position))
            .map(|cell| cell.symbol())
            .collect()
    }
}

impl TerminalSurface for TestTerminalSurface {
    fn size(&self) -> io::Result<Size> {
        self.terminal.size().map_err(|never| match never {})
    }

    fn clear(&mut self) -> io::Result<()> {
        self.terminal.clear().map_err(|never| match never {})
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal
            .draw(render)
            .map(|_| ())
            .map_err(|never| match never {})
    }
}

fn idle_app() -> App {
    let mut config = Config::default();
    config.api.key = "test".to_string();
    App::new(config).expect("app should build without network access")
}

#[test]
fn idle_frame_prompts_for_a_search() {
    let mut app = idle_app();
    let mut surface = TestTerminalSurface::new(80, 24).expect("test terminal should initialize");
    assert_eq!(surface.size().expect("size should resolve"), Size::new(80, 24));

    app.render_frame(&mut surface).expect("frame should render");

    assert!(surface.rendered().contains("Press / and search"));
    assert!(app.state.geometry.tiles.is_empty());
}

#[test]
fn clear_blanks_the_previous_frame() {
    let mut app = idle_app();
    let mut surface = TestTerminalSurface::new(80, 24).expect("test terminal should initialize");
    app.render_frame(&mut surface).expect("frame should render");

    surface.clear().expect("clear should succeed");

    assert!(surface.rendered().trim().is_empty());
}
