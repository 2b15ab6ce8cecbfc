use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub search: Rect,
    pub gallery: Rect,
    pub status: Rect,
}

pub fn split_layout(area: Rect) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    UiLayout {
        search: chunks[0],
        gallery: chunks[1],
        status: chunks[2],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Centered rect covering `percent` of each side of `area`.
pub(crate) fn scaled_rect(area: Rect, percent: u16) -> Rect {
    let percent = percent.min(100);
    let width = (u32::from(area.width) * u32::from(percent) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent) / 100) as u16;
    centered_rect(area, width, height)
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{centered_rect, scaled_rect, split_layout};

    #[test]
    fn split_layout_reserves_search_and_status_rows() {
        let layout = split_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.search.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.gallery.height, 36);
        assert_eq!(layout.gallery.y, 3);
    }

    #[test]
    fn centered_rect_stays_within_area() {
        let area = Rect::new(10, 5, 20, 8);
        let centered = centered_rect(area, 99, 99);
        assert_eq!(centered, area);
    }

    #[test]
    fn scaled_rect_is_centered() {
        let scaled = scaled_rect(Rect::new(0, 0, 100, 40), 90);
        assert_eq!(scaled, Rect::new(5, 2, 90, 36));
    }
}
