//! Input handling — maps key/mouse events to triggers and state changes.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::core::dispatch::Trigger;
use crate::ui::layout::AppLayout;
use crate::ui::picker::{hit_test, Hit, PickerRow};

use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Only process Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Picker => handle_picker_key(state, key),
        ActiveView::Help => state.active_view = ActiveView::Picker,
    }
}

// ── Picker view (configurable bindings) ─────────────────────────

fn handle_picker_key(state: &mut AppState, key: KeyEvent) {
    // Navigation keys that should always work.
    match key.code {
        KeyCode::Home => {
            state.picker_state.selected = 0;
            state.picker_state.offset = 0;
            return;
        }
        KeyCode::End => {
            let len = state.rows().len();
            state.picker_state.selected = len.saturating_sub(1);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;

    match action {
        Action::Quit => {
            tracing::info!("quit without submitting");
            state.should_quit = true;
        }
        Action::Help => {
            state.active_view = ActiveView::Help;
        }
        Action::MoveUp => {
            state.picker_state.select_prev();
        }
        Action::MoveDown => {
            let len = state.rows().len();
            state.picker_state.select_next(len);
        }
        Action::Expand => match state.cursor_row() {
            Some(PickerRow::Category { id }) => {
                if is_expanded(state, id) {
                    // Already open: step onto the first subcategory.
                    let len = state.rows().len();
                    state.picker_state.select_next(len);
                } else {
                    state.fire(Trigger::ToggleVisibility(id));
                }
            }
            Some(PickerRow::Subcategory { .. }) | None => {}
        },
        Action::Collapse => handle_collapse(state),
        Action::Toggle => match state.cursor_row() {
            Some(PickerRow::Category { id }) => state.fire(Trigger::ToggleVisibility(id)),
            Some(PickerRow::Subcategory { id, .. }) => state.fire(Trigger::Flip(id)),
            None => {}
        },
        Action::Select => match state.cursor_row() {
            Some(PickerRow::Category { id }) => state.fire(Trigger::SelectAll(id)),
            Some(PickerRow::Subcategory { id, .. }) => state.fire(Trigger::SelectOne(id)),
            None => {}
        },
        Action::Deselect => match state.cursor_row() {
            Some(PickerRow::Category { id }) => state.fire(Trigger::DeselectAll(id)),
            Some(PickerRow::Subcategory { id, .. }) => state.fire(Trigger::DeselectOne(id)),
            None => {}
        },
        Action::SelectAll => {
            if let Some(row) = state.cursor_row() {
                state.fire(Trigger::SelectAll(row.category()));
            }
        }
        Action::DeselectAll => {
            if let Some(row) = state.cursor_row() {
                state.fire(Trigger::DeselectAll(row.category()));
            }
        }
        Action::Submit => try_submit(state),
    }
}

/// Collapse an expanded category, or from a subcategory jump to its parent
/// and collapse that.
fn handle_collapse(state: &mut AppState) {
    let Some(row) = state.cursor_row() else {
        return;
    };
    let parent = row.category();

    match row {
        PickerRow::Category { id } if is_expanded(state, id) => {
            state.fire(Trigger::ToggleVisibility(id));
        }
        PickerRow::Category { .. } => {}
        PickerRow::Subcategory { .. } => {
            if let Some(i) = state
                .rows()
                .iter()
                .position(|r| *r == PickerRow::Category { id: parent })
            {
                state.picker_state.selected = i;
            }
            state.fire(Trigger::ToggleVisibility(parent));
        }
    }
}

fn is_expanded(state: &AppState, id: crate::core::tree::CategoryId) -> bool {
    state
        .tree
        .category(id)
        .is_some_and(|c| c.visibility.is_expanded())
}

/// Close the picker with the current selection, unless fewer than
/// `min_selected` items are chosen.
pub fn try_submit(state: &mut AppState) {
    let count = state.tree.selected_count();
    let min = state.config.min_selected;
    if count < min {
        let noun = if min == 1 { "item" } else { "items" };
        state.status_message = Some(format!("Please select at least {min} {noun}."));
        tracing::debug!(count, min, "submit refused");
        return;
    }
    tracing::info!(count, "selection submitted");
    state.submitted = true;
    state.should_quit = true;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view == ActiveView::Help {
        if let MouseEventKind::Down(_) = mouse.kind {
            state.active_view = ActiveView::Picker;
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let layout = AppLayout::from_area(state.terminal_area);
            let Some((line, column)) = layout.picker_cell(mouse.column, mouse.row) else {
                return;
            };
            let index = line + state.picker_state.offset;
            let rows = state.rows();
            let Some(row) = rows.get(index).cloned() else {
                return;
            };
            state.picker_state.selected = index;
            state.status_message = None;

            let hit = hit_test(&row, &state.tree, &state.visuals, column);
            let trigger = match (hit, row) {
                (Hit::Body, PickerRow::Category { id }) => Trigger::ToggleVisibility(id),
                (Hit::Plus, PickerRow::Category { id }) => Trigger::SelectAll(id),
                (Hit::Minus, PickerRow::Category { id }) => Trigger::DeselectAll(id),
                (Hit::Body, PickerRow::Subcategory { id, .. }) => Trigger::Flip(id),
                (Hit::Plus, PickerRow::Subcategory { id, .. }) => Trigger::SelectOne(id),
                (Hit::Minus, PickerRow::Subcategory { id, .. }) => Trigger::DeselectOne(id),
                (Hit::Nothing, _) => return,
            };
            state.fire(trigger);
        }
        MouseEventKind::ScrollUp => {
            state.picker_state.select_prev();
        }
        MouseEventKind::ScrollDown => {
            let len = state.rows().len();
            state.picker_state.select_next(len);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::tree::tests::fiction_tree;
    use crate::core::tree::Visibility;
    use crossterm::event::KeyEventState;
    use pretty_assertions::assert_eq;
    use ratatui::layout::Rect;

    fn state() -> AppState {
        let mut state = AppState::new(fiction_tree(), "Books".into(), AppConfig::default());
        state.terminal_area = Rect::new(0, 0, 80, 24);
        state
    }

    fn press(state: &mut AppState, code: KeyCode) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(state: &mut AppState, column: u16, row: u16) {
        handle_mouse(
            state,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    fn visibility(state: &AppState, key: &str) -> Visibility {
        let id = state.tree.category_id(key).unwrap();
        state.tree.category(id).unwrap().visibility
    }

    #[test]
    fn space_toggles_category_then_checkbox() {
        let mut s = state();
        press(&mut s, KeyCode::Char(' '));
        assert_eq!(visibility(&s, "fiction"), Visibility::Expanded);

        press(&mut s, KeyCode::Down);
        press(&mut s, KeyCode::Char(' '));
        assert_eq!(s.tree.selected_keys(), vec!["scifi"]);
        let scifi = s.tree.subcategory_id("scifi").unwrap();
        assert_eq!(s.visuals.item(scifi), crate::app::visual::ItemLook::Highlighted);

        press(&mut s, KeyCode::Char(' '));
        assert!(s.tree.selected_keys().is_empty());
    }

    #[test]
    fn plus_on_category_selects_all_and_expands() {
        let mut s = state();
        press(&mut s, KeyCode::Down); // history
        press(&mut s, KeyCode::Char('+'));
        assert_eq!(s.tree.selected_keys(), vec!["ancient", "modern"]);
        assert_eq!(visibility(&s, "history"), Visibility::Expanded);
        assert_eq!(visibility(&s, "fiction"), Visibility::Collapsed);

        press(&mut s, KeyCode::Char('-'));
        assert!(s.tree.selected_keys().is_empty());
        assert_eq!(visibility(&s, "history"), Visibility::Expanded);
    }

    #[test]
    fn whole_category_keys_work_from_a_subcategory() {
        let mut s = state();
        press(&mut s, KeyCode::Right); // expand fiction
        press(&mut s, KeyCode::Right); // step onto scifi
        assert_eq!(s.picker_state.selected, 1);

        press(&mut s, KeyCode::Char('a'));
        assert_eq!(s.tree.selected_keys(), vec!["scifi", "fantasy"]);
        press(&mut s, KeyCode::Char('-'));
        assert_eq!(s.tree.selected_keys(), vec!["fantasy"]);
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert!(s.tree.selected_keys().is_empty());
    }

    #[test]
    fn collapse_from_subcategory_moves_to_parent() {
        let mut s = state();
        press(&mut s, KeyCode::Right);
        press(&mut s, KeyCode::Down);
        press(&mut s, KeyCode::Down); // fantasy
        press(&mut s, KeyCode::Char(' '));
        press(&mut s, KeyCode::Left);

        assert_eq!(s.picker_state.selected, 0);
        assert_eq!(visibility(&s, "fiction"), Visibility::Collapsed);
        // Collapsing never touches the selection.
        assert_eq!(s.tree.selected_keys(), vec!["fantasy"]);
    }

    #[test]
    fn submit_requires_a_selection() {
        let mut s = state();
        press(&mut s, KeyCode::Enter);
        assert!(!s.should_quit);
        assert_eq!(
            s.status_message.as_deref(),
            Some("Please select at least 1 item.")
        );

        press(&mut s, KeyCode::Char('+'));
        assert_eq!(s.status_message, None);
        press(&mut s, KeyCode::Enter);
        assert!(s.submitted);
        assert!(s.should_quit);
    }

    #[test]
    fn min_selected_is_configurable() {
        let mut s = state();
        s.config.min_selected = 3;
        press(&mut s, KeyCode::Char('+'));
        try_submit(&mut s);
        assert!(!s.submitted);
        assert_eq!(
            s.status_message.as_deref(),
            Some("Please select at least 3 items.")
        );
    }

    #[test]
    fn quit_and_help() {
        let mut s = state();
        press(&mut s, KeyCode::Char('?'));
        assert_eq!(s.active_view, ActiveView::Help);
        press(&mut s, KeyCode::Char('q'));
        assert_eq!(s.active_view, ActiveView::Picker);
        assert!(!s.should_quit);
        press(&mut s, KeyCode::Esc);
        assert!(s.should_quit);
        assert!(!s.submitted);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut s = state();
        handle_key(
            &mut s,
            KeyEvent {
                code: KeyCode::Char(' '),
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Release,
                state: KeyEventState::NONE,
            },
        );
        assert_eq!(visibility(&s, "fiction"), Visibility::Collapsed);
    }

    #[test]
    fn mouse_buttons_map_to_triggers() {
        let mut s = state();
        // Picker content starts at (1, 1) inside the border.
        // Row 0: "▼ Fiction  [+] [-]": [+] at 11..14, [-] at 15..18.
        click(&mut s, 1 + 12, 1);
        assert_eq!(s.tree.selected_keys(), vec!["scifi", "fantasy"]);
        assert_eq!(visibility(&s, "fiction"), Visibility::Expanded);

        // Row 2: "    [x] Fantasy  [+] [-]": [-] at 21..24.
        click(&mut s, 1 + 22, 3);
        assert_eq!(s.tree.selected_keys(), vec!["scifi"]);
        assert_eq!(s.picker_state.selected, 2);

        // Clicking the label flips the checkbox.
        click(&mut s, 1 + 6, 2);
        assert!(s.tree.selected_keys().is_empty());

        // Clicking the category label collapses it; selection is untouched.
        click(&mut s, 1 + 3, 1);
        assert_eq!(visibility(&s, "fiction"), Visibility::Collapsed);

        // Border and empty rows do nothing.
        click(&mut s, 0, 0);
        click(&mut s, 5, 20);
        assert_eq!(s.picker_state.selected, 0);
    }
}
