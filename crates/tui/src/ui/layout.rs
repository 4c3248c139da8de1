//! Shared layout math.
//!
//! Rendering and mouse hit-testing both derive the same rectangles from
//! the viewport, so a pointer position always maps to the row the user
//! sees no matter how recently the screen was redrawn.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

pub struct ShellLayout {
    pub info: Rect,
    pub tabs: Rect,
    pub content: Rect,
    pub bottom: Rect,
}

pub fn shell(area: Rect) -> ShellLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Bottom hints
        ])
        .split(area);
    ShellLayout {
        info: chunks[0],
        tabs: chunks[1],
        content: chunks[2],
        bottom: chunks[3],
    }
}

/// Splits the content area into the header line and the bordered list.
pub fn entries_panes(content: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(content);
    (chunks[0], chunks[1])
}

/// Interior of the bordered list block: one cell in from each edge.
pub fn list_inner(list: Rect) -> Rect {
    Rect {
        x: list.x.saturating_add(1),
        y: list.y.saturating_add(1),
        width: list.width.saturating_sub(2),
        height: list.height.saturating_sub(2),
    }
}

/// Maps a pointer position to a visible row index, accounting for the
/// scroll window. `None` when the position is outside the list interior.
pub fn row_at(inner: Rect, column: u16, row: u16, scroll: usize) -> Option<usize> {
    if !inner.contains(Position { x: column, y: row }) {
        return None;
    }
    Some((row - inner.y) as usize + scroll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_stacks_fixed_bars_around_content() {
        let layout = shell(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.info.height, 1);
        assert_eq!(layout.tabs.height, 2);
        assert_eq!(layout.content.height, 19);
        assert_eq!(layout.bottom.y, 23);
    }

    #[test]
    fn row_at_maps_positions_through_the_scroll_window() {
        let inner = Rect::new(1, 4, 78, 10);
        assert_eq!(row_at(inner, 10, 4, 0), Some(0));
        assert_eq!(row_at(inner, 10, 7, 0), Some(3));
        assert_eq!(row_at(inner, 10, 4, 5), Some(5));
    }

    #[test]
    fn row_at_rejects_positions_outside_the_list() {
        let inner = Rect::new(1, 4, 78, 10);
        assert_eq!(row_at(inner, 10, 3, 0), None); // above
        assert_eq!(row_at(inner, 10, 14, 0), None); // below
        assert_eq!(row_at(inner, 0, 6, 0), None); // on the border
    }

    #[test]
    fn list_inner_shrinks_by_the_border() {
        let inner = list_inner(Rect::new(0, 6, 80, 18));
        assert_eq!(inner, Rect::new(1, 7, 78, 16));
    }
}
