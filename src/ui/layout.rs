//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout with the picker pane and a bottom status bar.
pub struct AppLayout {
    pub picker_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // picker pane (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            picker_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// Row index (before scrolling) and column inside the bordered picker
    /// pane for a terminal position, if it falls inside the pane's content.
    pub fn picker_cell(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let area = self.picker_area;
        let left = area.x.saturating_add(1);
        let top = area.y.saturating_add(1);
        let right = area.x.saturating_add(area.width.saturating_sub(1));
        let bottom = area.y.saturating_add(area.height.saturating_sub(1));
        if column < left || column >= right || row < top || row >= bottom {
            return None;
        }
        Some(((row - top) as usize, (column - left) as usize))
    }
}
