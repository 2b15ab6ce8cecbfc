use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::gallery::{GalleryState, NoticeLevel};
use crate::notify::Toasts;

use super::gallery::fit_width;

const PLACEHOLDER: &str = "Search images and photos";

pub fn draw_search_bar(frame: &mut Frame<'_>, area: Rect, value: &str, cursor: usize, focused: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let line = if focused {
        build_input_line(value, cursor, usize::from(inner.width))
    } else if value.is_empty() {
        Line::from(vec![
            Span::raw(" / "),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![Span::raw(" / "), Span::raw(value.to_string())])
    };
    frame.render_widget(Paragraph::new(line), inner);
}

/// Renders the buffer with a software caret so the terminal cursor can stay
/// hidden. `cursor` is a char index; scrolling is measured in display columns.
fn build_input_line(input: &str, cursor: usize, width: usize) -> Line<'static> {
    let prefix_spans = vec![
        Span::raw(" ".to_string()),
        Span::styled("> ".to_string(), Style::default().fg(Color::White)),
    ];
    let prefix_width = 3;
    let max_text_width = width.saturating_sub(prefix_width).max(1);

    let mut chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    // The caret sits on a blank cell past the end of the buffer.
    chars.push(' ');
    let columns = |ch: char| ch.width().unwrap_or(0).max(1);

    let mut start = cursor;
    let mut used = columns(chars[cursor]);
    while start > 0 && used + columns(chars[start - 1]) <= max_text_width {
        start -= 1;
        used += columns(chars[start]);
    }

    let mut spans = prefix_spans;
    let mut filled = 0;
    for (idx, &ch) in chars.iter().enumerate().skip(start) {
        let ch_width = columns(ch);
        if filled + ch_width > max_text_width {
            break;
        }
        filled += ch_width;
        if idx == cursor {
            spans.push(Span::styled(ch.to_string(), Style::default().reversed()));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    if filled < max_text_width {
        spans.push(Span::raw(" ".repeat(max_text_width - filled)));
    }
    Line::from(spans)
}

pub fn status_text(gallery: &GalleryState, protocol: &str) -> String {
    let Some(query) = gallery.query() else {
        return format!("type a query and press Enter | q quit | {protocol}");
    };

    let mut parts = vec![
        format!("\"{query}\""),
        format!("{}/{}", gallery.images().len(), gallery.total_hits()),
    ];
    if gallery.is_loading() {
        parts.push(format!("loading page {}", gallery.page()));
    } else if let Some(error) = gallery.error() {
        parts.push(format!("error: {error}"));
    }
    if gallery.can_load_more() {
        parts.push("m load more".to_string());
    }
    parts.push(protocol.to_string());
    parts.join(" | ")
}

pub fn draw_status(frame: &mut Frame<'_>, area: Rect, gallery: &GalleryState, protocol: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let text = fit_width(&status_text(gallery, protocol), usize::from(area.width));
    let style = if gallery.error().is_some() && !gallery.is_loading() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Stacks toasts in the top-right corner of `area`, newest last.
pub fn draw_toasts(frame: &mut Frame<'_>, area: Rect, toasts: &Toasts) {
    let width = area.width.min(48);
    if width < 6 || area.height < 3 {
        return;
    }

    let mut y = area.y;
    for notice in toasts.iter() {
        if y + 3 > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width, y, width, 3);
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        frame.render_widget(
            Paragraph::new(fit_width(&notice.message, usize::from(inner.width))),
            inner,
        );
        y += 3;
    }
}
