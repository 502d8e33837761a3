//! Custom Ratatui widget that renders a [`SelectionTree`] as collapsible
//! categories with checkable subcategories.
//!
//! Every row ends with `[+]` / `[-]` buttons.  On a category they select or
//! clear the whole category; on a subcategory they set just that item.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::app::visual::{ItemLook, VisualState};
use crate::core::tree::{CategoryId, SelectionTree, SubcategoryId};

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the picker widget (cursor row, scroll offset).
#[derive(Debug, Default)]
pub struct PickerState {
    /// Index into the *visible* flat list that is currently highlighted.
    pub selected: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
}

impl PickerState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.selected < max - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the cursor inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Ensure the selected row is visible within the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── row model ─────────

/// One rendered row in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerRow {
    Category { id: CategoryId },
    Subcategory { id: SubcategoryId, parent: CategoryId },
}

impl PickerRow {
    /// The category this row belongs to.
    pub fn category(&self) -> CategoryId {
        match *self {
            PickerRow::Category { id } => id,
            PickerRow::Subcategory { parent, .. } => parent,
        }
    }
}

/// Flatten the tree into visible rows: every category, plus the
/// subcategories of expanded ones.
pub fn build_rows(tree: &SelectionTree) -> Vec<PickerRow> {
    let mut rows = Vec::new();
    for (id, cat) in tree.categories() {
        rows.push(PickerRow::Category { id });
        if cat.visibility.is_expanded() {
            rows.extend(
                tree.children(id)
                    .map(|(sid, _)| PickerRow::Subcategory { id: sid, parent: id }),
            );
        }
    }
    rows
}

/// Which part of a row a column falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Arrow/checkbox and label.
    Body,
    Plus,
    Minus,
    /// Indentation or trailing blank space.
    Nothing,
}

/// The pieces of a row, left to right, with the text each one renders.
fn row_segments(
    row: &PickerRow,
    tree: &SelectionTree,
    visuals: &VisualState,
) -> Vec<(Hit, String)> {
    let (indent, body) = match *row {
        PickerRow::Category { id } => {
            let label = tree.category(id).map_or("", |c| c.label.as_str());
            ("", format!("{} {label}", visuals.category(id).arrow()))
        }
        PickerRow::Subcategory { id, .. } => {
            let (label, checked) = tree
                .subcategory(id)
                .map_or(("", false), |s| (s.label.as_str(), s.selected));
            let mark = if checked { "x" } else { " " };
            ("    ", format!("[{mark}] {label}"))
        }
    };
    vec![
        (Hit::Nothing, indent.to_string()),
        (Hit::Body, body),
        (Hit::Nothing, "  ".to_string()),
        (Hit::Plus, "[+]".to_string()),
        (Hit::Nothing, " ".to_string()),
        (Hit::Minus, "[-]".to_string()),
    ]
}

/// Resolve a column (relative to the row's left edge) to a row part.
pub fn hit_test(row: &PickerRow, tree: &SelectionTree, visuals: &VisualState, column: usize) -> Hit {
    let mut x = 0;
    for (hit, text) in row_segments(row, tree, visuals) {
        let width = Span::raw(text).width();
        if column < x + width {
            return hit;
        }
        x += width;
    }
    Hit::Nothing
}

// ───────────────────────────────────────── widget ────────────

/// The picker widget itself — created fresh each frame.
pub struct PickerWidget<'a> {
    tree: &'a SelectionTree,
    visuals: &'a VisualState,
    block: Option<Block<'a>>,
}

impl<'a> PickerWidget<'a> {
    pub fn new(tree: &'a SelectionTree, visuals: &'a VisualState) -> Self {
        Self {
            tree,
            visuals,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn line(&self, row: &PickerRow, is_cursor: bool) -> Line<'static> {
        let look_style = match *row {
            PickerRow::Category { .. } => Theme::category_style(),
            PickerRow::Subcategory { id, .. } => match self.visuals.item(id) {
                ItemLook::Highlighted => Theme::highlighted_style(),
                ItemLook::Plain => Theme::item_style(),
            },
        };
        // The cursor is layered over the item's look, never in place of it.
        let body_style = if is_cursor {
            look_style.patch(Theme::cursor_style())
        } else {
            look_style
        };

        let spans: Vec<Span<'static>> = row_segments(row, self.tree, self.visuals)
            .into_iter()
            .map(|(hit, text)| match hit {
                Hit::Body => Span::styled(text, body_style),
                Hit::Plus | Hit::Minus => Span::styled(text, Theme::button_style()),
                Hit::Nothing => Span::raw(text),
            })
            .collect();
        Line::from(spans)
    }
}

impl<'a> StatefulWidget for PickerWidget<'a> {
    type State = PickerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let rows = build_rows(self.tree);
        state.clamp(rows.len());
        state.clamp_scroll(inner.height as usize);

        let visible_rows = rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, row)) in visible_rows.enumerate() {
            let y = inner.y + i as u16;
            let line = self.line(row, row_idx == state.selected);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::tests::fiction_tree;
    use pretty_assertions::{assert_eq, assert_ne};
    use ratatui::style::Modifier;

    #[test]
    fn rows_follow_visibility() {
        let mut tree = fiction_tree();
        let fiction = tree.category_id("fiction").unwrap();
        let history = tree.category_id("history").unwrap();
        assert_eq!(
            build_rows(&tree),
            vec![
                PickerRow::Category { id: fiction },
                PickerRow::Category { id: history },
            ]
        );

        tree.toggle_category_visibility("fiction").unwrap();
        let scifi = tree.subcategory_id("scifi").unwrap();
        let fantasy = tree.subcategory_id("fantasy").unwrap();
        assert_eq!(
            build_rows(&tree),
            vec![
                PickerRow::Category { id: fiction },
                PickerRow::Subcategory { id: scifi, parent: fiction },
                PickerRow::Subcategory { id: fantasy, parent: fiction },
                PickerRow::Category { id: history },
            ]
        );
    }

    #[test]
    fn hit_test_finds_buttons() {
        let tree = fiction_tree();
        let visuals = VisualState::from_tree(&tree);
        let fiction = tree.category_id("fiction").unwrap();
        let row = PickerRow::Category { id: fiction };

        // "▼ Fiction  [+] [-]"
        assert_eq!(hit_test(&row, &tree, &visuals, 0), Hit::Body);
        assert_eq!(hit_test(&row, &tree, &visuals, 8), Hit::Body);
        assert_eq!(hit_test(&row, &tree, &visuals, 9), Hit::Nothing);
        assert_eq!(hit_test(&row, &tree, &visuals, 11), Hit::Plus);
        assert_eq!(hit_test(&row, &tree, &visuals, 15), Hit::Minus);
        assert_eq!(hit_test(&row, &tree, &visuals, 40), Hit::Nothing);

        // "    [ ] Fantasy  [+] [-]"
        let fantasy = tree.subcategory_id("fantasy").unwrap();
        let row = PickerRow::Subcategory { id: fantasy, parent: fiction };
        assert_eq!(hit_test(&row, &tree, &visuals, 2), Hit::Nothing);
        assert_eq!(hit_test(&row, &tree, &visuals, 5), Hit::Body);
        assert_eq!(hit_test(&row, &tree, &visuals, 17), Hit::Plus);
        assert_eq!(hit_test(&row, &tree, &visuals, 21), Hit::Minus);
    }

    #[test]
    fn renders_checkboxes_and_arrows() {
        let mut tree = fiction_tree();
        tree.select_all("fiction").unwrap();
        let visuals = VisualState::from_tree(&tree);
        let mut state = PickerState::default();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);

        PickerWidget::new(&tree, &visuals).render(area, &mut buf, &mut state);

        let text: Vec<String> = (0..4u16)
            .map(|y| {
                let line: String = (0..area.width).map(|x| buf[(x, y)].symbol()).collect();
                line.trim_end().to_string()
            })
            .collect();
        assert_eq!(
            text,
            vec![
                "▲ Fiction  [+] [-]",
                "    [x] Science Fiction  [+] [-]",
                "    [x] Fantasy  [+] [-]",
                "▼ History  [+] [-]",
            ]
        );
    }

    #[test]
    fn cursor_keeps_selected_highlight() {
        let mut tree = fiction_tree();
        tree.select_all("fiction").unwrap();
        tree.set_subcategory("fantasy", false).unwrap();
        let visuals = VisualState::from_tree(&tree);
        let area = Rect::new(0, 0, 40, 5);

        // Cursor on "Science Fiction" (selected).
        let mut state = PickerState {
            selected: 1,
            offset: 0,
        };
        let mut buf = Buffer::empty(area);
        PickerWidget::new(&tree, &visuals).render(area, &mut buf, &mut state);
        let cell = buf[(4u16, 1u16)].style();
        assert_eq!(cell.bg, Theme::highlighted_style().bg);
        assert!(cell.add_modifier.contains(Modifier::REVERSED));

        // Cursor on "Fantasy" (not selected) keeps the plain look.
        state.selected = 2;
        let mut buf = Buffer::empty(area);
        PickerWidget::new(&tree, &visuals).render(area, &mut buf, &mut state);
        let cell = buf[(4u16, 2u16)].style();
        assert_eq!(cell.fg, Theme::item_style().fg);
        assert_ne!(cell.bg, Theme::highlighted_style().bg);
        assert!(cell.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn cursor_is_clamped_after_rows_shrink() {
        let tree = fiction_tree();
        let visuals = VisualState::from_tree(&tree);
        let mut state = PickerState {
            selected: 7,
            offset: 0,
        };
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        PickerWidget::new(&tree, &visuals).render(area, &mut buf, &mut state);
        assert_eq!(state.selected, 1);
    }
}
