use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui_image::protocol::StatefulProtocol;
use ratatui_image::{Resize, StatefulImage};

use crate::viewer::{OverlayMount, OverlayTarget, PreviewSlot};

use super::gallery::fit_width;
use super::layout::{centered_rect, scaled_rect};

const CONTENT_PERCENT: u16 = 90;

pub fn draw_loading_overlay(frame: &mut Frame<'_>, area: Rect, page: u32) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup_width = area.width.min(34);
    let popup_height = area.height.min(3);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let message = Paragraph::new(format!("Loading... page {page}"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    frame.render_widget(message, inner);
}

/// Draws the full-size viewer on top of everything and records its
/// geometry on the mount for backdrop hit testing.
pub fn draw_viewer_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    target: &OverlayTarget,
    mount: &mut OverlayMount,
) {
    if area.width == 0 || area.height == 0 {
        mount.clear_geometry();
        return;
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        area,
    );

    let content = scaled_rect(area, CONTENT_PERCENT);
    mount.set_geometry(area, content);

    let title = fit_width(
        &format!(" {} ", target.tags),
        usize::from(content.width.saturating_sub(2)),
    );
    let block = Block::default()
        .title(title)
        .title_bottom(" Esc close | ←/→ browse ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(content);
    frame.render_widget(block, content);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match mount.slot_mut(&target.full_size_url) {
        Some(PreviewSlot::Ready(protocol)) => draw_protocol(frame, inner, &mut **protocol),
        Some(PreviewSlot::Failed(message)) => {
            let text = format!("Failed to load image: {message}");
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Red)),
                centered_rect(inner, inner.width, 1),
            );
        }
        None => frame.render_widget(
            Paragraph::new("Loading image...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            centered_rect(inner, inner.width, 1),
        ),
    }
}

fn draw_protocol(frame: &mut Frame<'_>, area: Rect, protocol: &mut StatefulProtocol) {
    frame.render_stateful_widget(
        StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None)),
        area,
        protocol,
    );

    if let Some(Err(err)) = protocol.last_encoding_result() {
        tracing::warn!(error = %err, "preview encode failed");
    }
}
