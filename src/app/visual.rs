//! Derived visual state of the picker.
//!
//! Each item's look is a pure function of its model state and is cached here.
//! After a mutation only the items named in the [`Refresh`] are recomputed.

use std::collections::HashMap;

use crate::core::tree::{CategoryId, Refresh, SelectionTree, SubcategoryId, Visibility};

/// Look of a subcategory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemLook {
    #[default]
    Plain,
    Highlighted,
}

impl ItemLook {
    pub fn for_selected(selected: bool) -> Self {
        if selected {
            ItemLook::Highlighted
        } else {
            ItemLook::Plain
        }
    }
}

/// Look of a category row's toggle arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryLook {
    #[default]
    Collapsed,
    Expanded,
}

impl CategoryLook {
    pub fn for_visibility(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Expanded => CategoryLook::Expanded,
            Visibility::Collapsed => CategoryLook::Collapsed,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            CategoryLook::Collapsed => "▼",
            CategoryLook::Expanded => "▲",
        }
    }
}

#[derive(Debug, Default)]
pub struct VisualState {
    items: HashMap<SubcategoryId, ItemLook>,
    categories: HashMap<CategoryId, CategoryLook>,
}

impl VisualState {
    /// Compute the look of every item (initial render).
    pub fn from_tree(tree: &SelectionTree) -> Self {
        let mut visuals = Self::default();
        for (cat_id, cat) in tree.categories() {
            visuals
                .categories
                .insert(cat_id, CategoryLook::for_visibility(cat.visibility));
            for (sub_id, sub) in tree.children(cat_id) {
                visuals.items.insert(sub_id, ItemLook::for_selected(sub.selected));
            }
        }
        visuals
    }

    /// Recompute the looks of the refreshed items only.  Returns how many
    /// looks actually changed.
    pub fn apply(&mut self, tree: &SelectionTree, refresh: &Refresh) -> usize {
        let mut changed = 0;
        for &id in &refresh.categories {
            if let Some(cat) = tree.category(id) {
                let look = CategoryLook::for_visibility(cat.visibility);
                if self.categories.insert(id, look) != Some(look) {
                    changed += 1;
                }
            }
        }
        for &id in &refresh.subcategories {
            if let Some(sub) = tree.subcategory(id) {
                let look = ItemLook::for_selected(sub.selected);
                if self.items.insert(id, look) != Some(look) {
                    changed += 1;
                }
            }
        }
        changed
    }

    pub fn item(&self, id: SubcategoryId) -> ItemLook {
        self.items.get(&id).copied().unwrap_or_default()
    }

    pub fn category(&self, id: CategoryId) -> CategoryLook {
        self.categories.get(&id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::tests::fiction_tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn select_then_deselect_leaves_no_residue() {
        let mut tree = fiction_tree();
        let mut visuals = VisualState::from_tree(&tree);
        let scifi = tree.subcategory_id("scifi").unwrap();

        let refresh = tree.set_subcategory(scifi, true).unwrap();
        assert_eq!(visuals.apply(&tree, &refresh), 1);
        assert_eq!(visuals.item(scifi), ItemLook::Highlighted);

        let refresh = tree.set_subcategory(scifi, false).unwrap();
        visuals.apply(&tree, &refresh);
        assert!(!tree.subcategory(scifi).unwrap().selected);
        assert_eq!(visuals.item(scifi), ItemLook::Plain);
    }

    #[test]
    fn only_refreshed_items_are_restyled() {
        let mut tree = fiction_tree();
        let mut visuals = VisualState::from_tree(&tree);
        let ancient = tree.subcategory_id("ancient").unwrap();

        // Mutate a history item without telling the visual layer.
        tree.set_subcategory(ancient, true).unwrap();
        let refresh = tree.select_all("fiction").unwrap();
        assert_eq!(visuals.apply(&tree, &refresh), 3);

        let scifi = tree.subcategory_id("scifi").unwrap();
        let fiction = tree.category_id("fiction").unwrap();
        assert_eq!(visuals.item(scifi), ItemLook::Highlighted);
        assert_eq!(visuals.category(fiction), CategoryLook::Expanded);
        assert_eq!(visuals.item(ancient), ItemLook::Plain);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut tree = fiction_tree();
        let mut visuals = VisualState::from_tree(&tree);
        let refresh = tree.toggle_category_visibility("history").unwrap();
        assert_eq!(visuals.apply(&tree, &refresh), 1);
        assert_eq!(visuals.apply(&tree, &refresh), 0);
        let history = tree.category_id("history").unwrap();
        assert_eq!(visuals.category(history).arrow(), "▲");
    }
}
