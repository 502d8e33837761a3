//! In-memory selection tree: categories that own checkable subcategories.
//!
//! Categories and subcategories are stored in two flat arenas and reference
//! each other by index ([`CategoryId`] / [`SubcategoryId`]).  Keys map to
//! handles through explicit indexes, so callers never build lookup strings.
//!
//! The tree is built once from a catalog; afterwards only visibility and
//! selection change.  Every mutation reports the items it touched as a
//! [`Refresh`] so the UI can restyle just those.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

// ───────────────────────────────────────── handles ───────────

/// Index into [`SelectionTree`]'s category arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub(crate) usize);

/// Index into [`SelectionTree`]'s subcategory arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubcategoryId(pub(crate) usize);

/// A category target, either by handle or by catalog key.
#[derive(Debug, Clone, Copy)]
pub enum CategoryRef<'a> {
    Id(CategoryId),
    Key(&'a str),
}

impl From<CategoryId> for CategoryRef<'_> {
    fn from(id: CategoryId) -> Self {
        CategoryRef::Id(id)
    }
}

impl<'a> From<&'a str> for CategoryRef<'a> {
    fn from(key: &'a str) -> Self {
        CategoryRef::Key(key)
    }
}

impl fmt::Display for CategoryRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryRef::Id(id) => write!(f, "#{}", id.0),
            CategoryRef::Key(key) => f.write_str(key),
        }
    }
}

/// A subcategory target, either by handle or by catalog key.
#[derive(Debug, Clone, Copy)]
pub enum SubcategoryRef<'a> {
    Id(SubcategoryId),
    Key(&'a str),
}

impl From<SubcategoryId> for SubcategoryRef<'_> {
    fn from(id: SubcategoryId) -> Self {
        SubcategoryRef::Id(id)
    }
}

impl<'a> From<&'a str> for SubcategoryRef<'a> {
    fn from(key: &'a str) -> Self {
        SubcategoryRef::Key(key)
    }
}

impl fmt::Display for SubcategoryRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubcategoryRef::Id(id) => write!(f, "#{}", id.0),
            SubcategoryRef::Key(key) => f.write_str(key),
        }
    }
}

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("unknown subcategory `{0}`")]
    UnknownSubcategory(String),
    #[error("duplicate category key `{0}`")]
    DuplicateCategory(String),
    #[error("duplicate subcategory key `{0}`")]
    DuplicateSubcategory(String),
}

impl TreeError {
    /// `true` for the "target not in the tree" class of errors, which callers
    /// treat as a no-op rather than a failure.
    pub fn is_missing_target(&self) -> bool {
        matches!(
            self,
            TreeError::UnknownCategory(_) | TreeError::UnknownSubcategory(_)
        )
    }
}

// ───────────────────────────────────────── entities ──────────

/// Expanded/collapsed display state of a category's subcategory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Expanded,
    #[default]
    Collapsed,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Expanded => Visibility::Collapsed,
            Visibility::Collapsed => Visibility::Expanded,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Visibility::Expanded
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub visibility: Visibility,
    /// Owned subcategories, in catalog order.
    pub children: Vec<SubcategoryId>,
}

#[derive(Debug, Clone)]
pub struct Subcategory {
    pub key: String,
    pub label: String,
    pub selected: bool,
    /// Back-reference to the owning category.
    pub parent: CategoryId,
}

// ───────────────────────────────────────── refresh ───────────

/// Items whose visual state must be recomputed after a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refresh {
    pub categories: Vec<CategoryId>,
    pub subcategories: Vec<SubcategoryId>,
}

impl Refresh {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.subcategories.is_empty()
    }
}

// ───────────────────────────────────────── tree ──────────────

/// Two-level category → subcategory tree with an explicit mutation API.
#[derive(Debug, Clone, Default)]
pub struct SelectionTree {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    category_index: HashMap<String, CategoryId>,
    subcategory_index: HashMap<String, SubcategoryId>,
}

impl SelectionTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ── construction ───────────────────────────────────────────

    /// Append a collapsed category.  Category keys must be unique.
    pub fn add_category(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<CategoryId, TreeError> {
        let key = key.into();
        if self.category_index.contains_key(&key) {
            return Err(TreeError::DuplicateCategory(key));
        }
        let id = CategoryId(self.categories.len());
        self.category_index.insert(key.clone(), id);
        self.categories.push(Category {
            key,
            label: label.into(),
            visibility: Visibility::Collapsed,
            children: Vec::new(),
        });
        Ok(id)
    }

    /// Append an unselected subcategory under `parent`.  Subcategory keys are
    /// unique across the whole tree.
    pub fn add_subcategory(
        &mut self,
        parent: CategoryId,
        key: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<SubcategoryId, TreeError> {
        let key = key.into();
        if parent.0 >= self.categories.len() {
            return Err(TreeError::UnknownCategory(CategoryRef::Id(parent).to_string()));
        }
        if self.subcategory_index.contains_key(&key) {
            return Err(TreeError::DuplicateSubcategory(key));
        }
        let id = SubcategoryId(self.subcategories.len());
        self.subcategory_index.insert(key.clone(), id);
        self.subcategories.push(Subcategory {
            key,
            label: label.into(),
            selected: false,
            parent,
        });
        self.categories[parent.0].children.push(id);
        Ok(id)
    }

    // ── lookup ─────────────────────────────────────────────────

    pub fn category_id(&self, key: &str) -> Option<CategoryId> {
        self.category_index.get(key).copied()
    }

    pub fn subcategory_id(&self, key: &str) -> Option<SubcategoryId> {
        self.subcategory_index.get(key).copied()
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id.0)
    }

    pub fn subcategory(&self, id: SubcategoryId) -> Option<&Subcategory> {
        self.subcategories.get(id.0)
    }

    pub fn resolve_category(&self, target: CategoryRef<'_>) -> Result<CategoryId, TreeError> {
        let found = match target {
            CategoryRef::Id(id) => self.category(id).map(|_| id),
            CategoryRef::Key(key) => self.category_id(key),
        };
        found.ok_or_else(|| TreeError::UnknownCategory(target.to_string()))
    }

    pub fn resolve_subcategory(
        &self,
        target: SubcategoryRef<'_>,
    ) -> Result<SubcategoryId, TreeError> {
        let found = match target {
            SubcategoryRef::Id(id) => self.subcategory(id).map(|_| id),
            SubcategoryRef::Key(key) => self.subcategory_id(key),
        };
        found.ok_or_else(|| TreeError::UnknownSubcategory(target.to_string()))
    }

    /// Categories in catalog order.
    pub fn categories(&self) -> impl Iterator<Item = (CategoryId, &Category)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, c)| (CategoryId(i), c))
    }

    /// Subcategories of `id` in catalog order (empty for an unknown id).
    pub fn children(&self, id: CategoryId) -> impl Iterator<Item = (SubcategoryId, &Subcategory)> {
        self.category(id)
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&sid| (sid, &self.subcategories[sid.0]))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn subcategory_count(&self) -> usize {
        self.subcategories.len()
    }

    // ── mutation ───────────────────────────────────────────────

    /// Flip the expanded/collapsed state of one category.
    pub fn toggle_category_visibility<'a>(
        &mut self,
        category: impl Into<CategoryRef<'a>>,
    ) -> Result<Refresh, TreeError> {
        let id = self.resolve_category(category.into())?;
        let cat = &mut self.categories[id.0];
        cat.visibility = cat.visibility.toggled();
        Ok(Refresh {
            categories: vec![id],
            subcategories: Vec::new(),
        })
    }

    /// Force a category's visibility.  Used when applying initial catalog state.
    pub fn set_visibility<'a>(
        &mut self,
        category: impl Into<CategoryRef<'a>>,
        visibility: Visibility,
    ) -> Result<Refresh, TreeError> {
        let id = self.resolve_category(category.into())?;
        self.categories[id.0].visibility = visibility;
        Ok(Refresh {
            categories: vec![id],
            subcategories: Vec::new(),
        })
    }

    /// Select every subcategory of `category` and expand it.
    pub fn select_all<'a>(
        &mut self,
        category: impl Into<CategoryRef<'a>>,
    ) -> Result<Refresh, TreeError> {
        let id = self.resolve_category(category.into())?;
        self.categories[id.0].visibility = Visibility::Expanded;
        let subcategories = self.write_children(id, true);
        Ok(Refresh {
            categories: vec![id],
            subcategories,
        })
    }

    /// Deselect every subcategory of `category`.  Visibility is left alone.
    pub fn deselect_all<'a>(
        &mut self,
        category: impl Into<CategoryRef<'a>>,
    ) -> Result<Refresh, TreeError> {
        let id = self.resolve_category(category.into())?;
        let subcategories = self.write_children(id, false);
        Ok(Refresh {
            categories: Vec::new(),
            subcategories,
        })
    }

    /// Set one subcategory's selected state to `value`.
    pub fn set_subcategory<'a>(
        &mut self,
        subcategory: impl Into<SubcategoryRef<'a>>,
        value: bool,
    ) -> Result<Refresh, TreeError> {
        let id = self.resolve_subcategory(subcategory.into())?;
        self.subcategories[id.0].selected = value;
        Ok(Refresh {
            categories: Vec::new(),
            subcategories: vec![id],
        })
    }

    /// Negate one subcategory's selected state (a checkbox click).
    pub fn flip_subcategory<'a>(
        &mut self,
        subcategory: impl Into<SubcategoryRef<'a>>,
    ) -> Result<Refresh, TreeError> {
        let id = self.resolve_subcategory(subcategory.into())?;
        let value = !self.subcategories[id.0].selected;
        self.set_subcategory(id, value)
    }

    /// Expand every category.
    pub fn expand_all(&mut self) -> Refresh {
        for cat in &mut self.categories {
            cat.visibility = Visibility::Expanded;
        }
        Refresh {
            categories: (0..self.categories.len()).map(CategoryId).collect(),
            subcategories: Vec::new(),
        }
    }

    fn write_children(&mut self, id: CategoryId, value: bool) -> Vec<SubcategoryId> {
        let children = self.categories[id.0].children.clone();
        for &sid in &children {
            self.subcategories[sid.0].selected = value;
        }
        children
    }

    // ── selection queries ──────────────────────────────────────

    /// Keys of all selected subcategories, in catalog order.
    pub fn selected_keys(&self) -> Vec<&str> {
        self.categories()
            .flat_map(|(id, _)| self.children(id))
            .filter(|(_, s)| s.selected)
            .map(|(_, s)| s.key.as_str())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.subcategories.iter().filter(|s| s.selected).count()
    }

    /// Selected subcategory keys grouped by category key.  Categories with
    /// nothing selected are omitted.
    pub fn selected_by_category(&self) -> Vec<(&str, Vec<&str>)> {
        self.categories()
            .filter_map(|(id, cat)| {
                let picked: Vec<&str> = self
                    .children(id)
                    .filter(|(_, s)| s.selected)
                    .map(|(_, s)| s.key.as_str())
                    .collect();
                (!picked.is_empty()).then_some((cat.key.as_str(), picked))
            })
            .collect()
    }
}

// ───────────────────────────────────────── tests ─────────────
