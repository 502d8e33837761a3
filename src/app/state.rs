//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::dispatch::{dispatch, Trigger};
use crate::core::tree::SelectionTree;
use crate::ui::picker::{build_rows, PickerRow, PickerState};

use super::visual::VisualState;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Picker,
    Help,
}

/// Top-level application state.
pub struct AppState {
    /// The category/subcategory model.
    pub tree: SelectionTree,
    /// Cached looks derived from `tree`.
    pub visuals: VisualState,
    /// Widget-level state (cursor, scroll).
    pub picker_state: PickerState,
    /// Shown in the picker border.
    pub title: String,
    /// Key bindings and picker settings.
    pub config: AppConfig,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Set when the user submitted a valid selection (vs. quitting).
    pub submitted: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Last known terminal size, for mouse hit testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(tree: SelectionTree, title: String, config: AppConfig) -> Self {
        let visuals = VisualState::from_tree(&tree);
        Self {
            tree,
            visuals,
            picker_state: PickerState::default(),
            title,
            config,
            active_view: ActiveView::default(),
            should_quit: false,
            submitted: false,
            status_message: None,
            terminal_area: Rect::default(),
        }
    }

    /// Run a trigger through the dispatcher and restyle what it touched.
    pub fn fire(&mut self, trigger: Trigger) {
        let refresh = dispatch(&mut self.tree, trigger);
        if refresh.is_empty() {
            return;
        }
        self.visuals.apply(&self.tree, &refresh);
        self.picker_state.clamp(self.rows().len());
    }

    /// Currently visible rows.
    pub fn rows(&self) -> Vec<PickerRow> {
        build_rows(&self.tree)
    }

    /// Row under the cursor.
    pub fn cursor_row(&self) -> Option<PickerRow> {
        self.rows().into_iter().nth(self.picker_state.selected)
    }
}
