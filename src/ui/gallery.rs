use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui_image::protocol::StatefulProtocol;
use ratatui_image::{Resize, StatefulImage};
use unicode_width::UnicodeWidthChar;

use crate::api::ImageRecord;
use crate::viewer::{OverlayMount, PreviewSlot};

/// Where the tiles of the last frame landed, for mouse hit testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryGeometry {
    pub first: usize,
    pub columns: usize,
    pub tiles: Vec<Rect>,
}

impl GalleryGeometry {
    /// Record indices drawn in the last frame.
    pub fn visible(&self) -> Range<usize> {
        self.first..self.first + self.tiles.len()
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        self.tiles
            .iter()
            .position(|tile| tile.contains(position))
            .map(|offset| self.first + offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWindow {
    pub columns: usize,
    pub rows: usize,
    pub first: usize,
    pub count: usize,
}

/// Picks the rows to show so that `selected` stays visible.
pub fn grid_window(area: Rect, tile_size: (u16, u16), total: usize, selected: usize) -> GridWindow {
    let (tile_width, tile_height) = (tile_size.0.max(1), tile_size.1.max(1));
    let columns = usize::from((area.width / tile_width).max(1));
    let rows = usize::from((area.height / tile_height).max(1));

    let selected_row = selected.min(total.saturating_sub(1)) / columns;
    let first_row = (selected_row + 1).saturating_sub(rows);
    let first = first_row * columns;
    let count = total.saturating_sub(first).min(columns * rows);

    GridWindow {
        columns,
        rows,
        first,
        count,
    }
}

pub fn draw_gallery(
    frame: &mut Frame<'_>,
    area: Rect,
    images: &[ImageRecord],
    selected: usize,
    focused: bool,
    tile_size: (u16, u16),
    mount: &mut OverlayMount,
) -> GalleryGeometry {
    if area.width == 0 || area.height == 0 || images.is_empty() {
        return GalleryGeometry::default();
    }

    let window = grid_window(area, tile_size, images.len(), selected);
    let tile_width = area.width / window.columns as u16;
    let tile_height = tile_size.1.max(1).min(area.height);

    let mut tiles = Vec::with_capacity(window.count);
    for offset in 0..window.count {
        let index = window.first + offset;
        let column = (offset % window.columns) as u16;
        let row = (offset / window.columns) as u16;
        let rect = Rect::new(
            area.x + column * tile_width,
            area.y + row * tile_height,
            tile_width,
            tile_height,
        );
        let record = &images[index];
        let thumbnail = mount.thumbnail_slot_mut(&record.thumbnail_url);
        draw_tile(
            frame,
            rect,
            TileView {
                index,
                record,
                selected: index == selected,
                focused,
            },
            thumbnail,
        );
        tiles.push(rect);
    }

    GalleryGeometry {
        first: window.first,
        columns: window.columns,
        tiles,
    }
}

struct TileView<'a> {
    index: usize,
    record: &'a ImageRecord,
    selected: bool,
    focused: bool,
}

/// Thumbnail on top with the tags underneath once the image is ready;
/// until then (or when it failed) the tags and id stand in for it.
fn draw_tile(
    frame: &mut Frame<'_>,
    area: Rect,
    tile: TileView<'_>,
    thumbnail: Option<&mut PreviewSlot>,
) {
    let border_style = match (tile.selected, tile.focused) {
        (true, true) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::White),
        _ => Style::default().fg(Color::DarkGray),
    };
    let block = Block::default()
        .title(format!(" {} ", tile.index + 1))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let width = usize::from(inner.width);
    let tags = Line::from(fit_width(&tile.record.tags, width));
    match thumbnail {
        Some(PreviewSlot::Ready(protocol)) if inner.height >= 2 => {
            let image_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
            let caption = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
            frame.render_stateful_widget(
                StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None)),
                image_area,
                &mut **protocol,
            );
            frame.render_widget(Paragraph::new(tags), caption);
        }
        slot => {
            let status = match slot {
                Some(PreviewSlot::Failed(_)) => "no preview".to_string(),
                _ => format!("id {}", tile.record.id),
            };
            let lines = vec![
                tags,
                Line::from(fit_width(&status, width)).style(Style::default().fg(Color::DarkGray)),
            ];
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
        }
    }
}

pub fn draw_empty_gallery(frame: &mut Frame<'_>, area: Rect, message: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        Rect::new(area.x, y, area.width, 1),
    );
}

/// Truncates to `width` terminal columns, marking the cut with an ellipsis.
pub(crate) fn fit_width(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width - 1 {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use image::{DynamicImage, RgbaImage};

    use crate::api::ImageRecord;
    use crate::viewer::OverlayMount;

    use super::{GalleryGeometry, draw_gallery, fit_width, grid_window};

    fn rendered(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn records(count: u64) -> Vec<ImageRecord> {
        (1..=count)
            .map(|id| ImageRecord {
                id,
                thumbnail_url: format!("t{id}"),
                full_size_url: format!("f{id}"),
                tags: format!("tag {id}"),
            })
            .collect()
    }

    #[test]
    fn grid_window_scrolls_to_keep_selection_visible() {
        let area = Rect::new(0, 0, 60, 8);
        let window = grid_window(area, (20, 4), 30, 0);
        assert_eq!((window.columns, window.rows), (3, 2));
        assert_eq!((window.first, window.count), (0, 6));

        let window = grid_window(area, (20, 4), 30, 10);
        assert_eq!(window.first, 6);
        assert_eq!(window.count, 6);

        let window = grid_window(area, (20, 4), 8, 7);
        assert_eq!(window.first, 3);
        assert_eq!(window.count, 5);
    }

    #[test]
    fn geometry_hit_test_maps_back_to_record_index() {
        let geometry = GalleryGeometry {
            first: 6,
            columns: 2,
            tiles: vec![Rect::new(0, 0, 10, 4), Rect::new(10, 0, 10, 4)],
        };
        assert_eq!(geometry.hit_test(12, 1), Some(7));
        assert_eq!(geometry.hit_test(3, 3), Some(6));
        assert_eq!(geometry.hit_test(3, 9), None);
    }

    #[test]
    fn draw_gallery_renders_tags_and_returns_tiles() {
        let backend = TestBackend::new(60, 8);
        let mut terminal = Terminal::new(backend).expect("test terminal should initialize");
        let images = records(4);
        let mut mount = OverlayMount::new(4, 8);
        let mut geometry = GalleryGeometry::default();
        terminal
            .draw(|frame| {
                geometry = draw_gallery(
                    frame,
                    Rect::new(0, 0, 60, 8),
                    &images,
                    1,
                    true,
                    (20, 4),
                    &mut mount,
                );
            })
            .expect("draw should pass");

        assert_eq!(geometry.tiles.len(), 4);
        assert_eq!(geometry.columns, 3);
        assert_eq!(geometry.visible(), 0..4);
        let rendered = rendered(&terminal);
        assert!(rendered.contains("tag 1"));
        assert!(rendered.contains("tag 4"));
        assert!(rendered.contains("id 1"));
    }

    #[test]
    fn ready_thumbnail_replaces_placeholder() {
        let backend = TestBackend::new(60, 8);
        let mut terminal = Terminal::new(backend).expect("test terminal should initialize");
        let images = records(2);
        let mut mount = OverlayMount::new(4, 8);
        mount.insert_thumbnail("t1", DynamicImage::ImageRgba8(RgbaImage::new(16, 16)));
        mount.insert_thumbnail_failure("t2", "server responded with 404");

        terminal
            .draw(|frame| {
                draw_gallery(
                    frame,
                    Rect::new(0, 0, 60, 8),
                    &images,
                    0,
                    true,
                    (20, 8),
                    &mut mount,
                );
            })
            .expect("draw should pass");

        let rendered = rendered(&terminal);
        assert!(rendered.contains("tag 1"));
        assert!(!rendered.contains("id 1"));
        assert!(rendered.contains("tag 2"));
        assert!(rendered.contains("no preview"));
    }

    #[test]
    fn fit_width_truncates_wide_text() {
        assert_eq!(fit_width("cats", 10), "cats");
        assert_eq!(fit_width("cats and dogs", 6), "cats …");
        assert_eq!(fit_width("花火大会", 5), "花火…");
        assert_eq!(fit_width("abc", 0), "");
    }
}
