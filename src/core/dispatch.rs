//! Delegated trigger dispatcher.
//!
//! Every user control resolves to a [`Trigger`] (what to do + which item) and
//! goes through [`dispatch`].  Targets missing from the tree are logged and
//! ignored.

use super::tree::{CategoryId, Refresh, SelectionTree, SubcategoryId};

/// What a control asks the tree to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Expand/collapse a category.
    ToggleVisibility(CategoryId),
    /// Select every subcategory of a category (also expands it).
    SelectAll(CategoryId),
    /// Deselect every subcategory of a category.
    DeselectAll(CategoryId),
    SelectOne(SubcategoryId),
    DeselectOne(SubcategoryId),
    /// Checkbox click: negate the current state.
    Flip(SubcategoryId),
}

/// Apply a trigger to the tree and return the items that need restyling.
pub fn dispatch(tree: &mut SelectionTree, trigger: Trigger) -> Refresh {
    let result = match trigger {
        Trigger::ToggleVisibility(cat) => tree.toggle_category_visibility(cat),
        Trigger::SelectAll(cat) => tree.select_all(cat),
        Trigger::DeselectAll(cat) => tree.deselect_all(cat),
        Trigger::SelectOne(sub) => tree.set_subcategory(sub, true),
        Trigger::DeselectOne(sub) => tree.set_subcategory(sub, false),
        Trigger::Flip(sub) => tree.flip_subcategory(sub),
    };

    match result {
        Ok(refresh) => {
            tracing::trace!(?trigger, ?refresh, "dispatched");
            refresh
        }
        Err(err) if err.is_missing_target() => {
            tracing::debug!(?trigger, "ignored: {err}");
            Refresh::default()
        }
        Err(err) => {
            tracing::warn!(?trigger, "rejected: {err}");
            Refresh::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::tests::fiction_tree;
    use crate::core::tree::Visibility;
    use pretty_assertions::assert_eq;

    #[test]
    fn routes_each_trigger() {
        let mut tree = fiction_tree();
        let fiction = tree.category_id("fiction").unwrap();
        let scifi = tree.subcategory_id("scifi").unwrap();
        let fantasy = tree.subcategory_id("fantasy").unwrap();

        dispatch(&mut tree, Trigger::SelectOne(scifi));
        assert_eq!(tree.selected_keys(), vec!["scifi"]);

        dispatch(&mut tree, Trigger::Flip(fantasy));
        assert_eq!(tree.selected_keys(), vec!["scifi", "fantasy"]);

        dispatch(&mut tree, Trigger::DeselectOne(scifi));
        assert_eq!(tree.selected_keys(), vec!["fantasy"]);

        dispatch(&mut tree, Trigger::DeselectAll(fiction));
        assert!(tree.selected_keys().is_empty());

        dispatch(&mut tree, Trigger::ToggleVisibility(fiction));
        assert_eq!(tree.category(fiction).unwrap().visibility, Visibility::Expanded);

        dispatch(&mut tree, Trigger::ToggleVisibility(fiction));
        dispatch(&mut tree, Trigger::SelectAll(fiction));
        assert_eq!(tree.selected_keys(), vec!["scifi", "fantasy"]);
        assert_eq!(tree.category(fiction).unwrap().visibility, Visibility::Expanded);
    }

    #[test]
    fn missing_target_is_a_silent_noop() {
        let mut tree = fiction_tree();
        let refresh = dispatch(&mut tree, Trigger::SelectAll(CategoryId(99)));
        assert!(refresh.is_empty());
        let refresh = dispatch(&mut tree, Trigger::Flip(SubcategoryId(99)));
        assert!(refresh.is_empty());
        assert_eq!(tree.selected_count(), 0);
    }
}
