//! Catalog loading — turns a TOML description of categories into a
//! [`SelectionTree`].
//!
//! ```toml
//! title = "Books"
//!
//! [[category]]
//! key = "fiction"
//! label = "Fiction"
//!
//! [[category.subcategory]]
//! key = "scifi"
//! label = "Science Fiction"
//! selected = true
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::tree::{SelectionTree, TreeError, Visibility};

const BOOKS: &str = include_str!("../../catalogs/books.toml");
const RESEARCH: &str = include_str!("../../catalogs/research.toml");
const TOPICS: &str = include_str!("../../catalogs/topics.toml");

/// Names accepted by [`Catalog::builtin`].
pub const BUILTIN_NAMES: &[&str] = &["books", "research", "topics"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("reading catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("building catalog: {0}")]
    Tree(#[from] TreeError),
    #[error("no built-in catalog named `{0}` (available: {list})", list = BUILTIN_NAMES.join(", "))]
    UnknownBuiltin(String),
}

// ───────────────────────────────────────── file format ───────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Shown in the picker's border title.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryEntry {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, rename = "subcategory")]
    pub subcategories: Vec<SubcategoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubcategoryEntry {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl Catalog {
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// One of the catalogs compiled into the binary.
    pub fn builtin(name: &str) -> Result<Self, CatalogError> {
        let text = match name {
            "books" => BOOKS,
            "research" => RESEARCH,
            "topics" => TOPICS,
            other => return Err(CatalogError::UnknownBuiltin(other.to_string())),
        };
        Self::parse(text)
    }

    /// Build the tree, applying each entry's initial visibility/selection.
    /// Labels default to keys.
    pub fn into_tree(self) -> Result<SelectionTree, CatalogError> {
        let mut tree = SelectionTree::new();
        for cat in self.categories {
            let label = cat.label.unwrap_or_else(|| cat.key.clone());
            let cat_id = tree.add_category(cat.key, label)?;
            if cat.expanded {
                tree.set_visibility(cat_id, Visibility::Expanded)?;
            }
            for sub in cat.subcategories {
                let label = sub.label.unwrap_or_else(|| sub.key.clone());
                let sub_id = tree.add_subcategory(cat_id, sub.key, label)?;
                if sub.selected {
                    tree.set_subcategory(sub_id, true)?;
                }
            }
        }
        tracing::debug!(
            categories = tree.category_count(),
            subcategories = tree.subcategory_count(),
            "catalog loaded"
        );
        Ok(tree)
    }
}

/// Mark the given subcategory keys selected.  Keys not in the tree are
/// skipped with a warning; returns how many were applied.
pub fn preselect<'a>(tree: &mut SelectionTree, keys: impl IntoIterator<Item = &'a str>) -> usize {
    let mut applied = 0;
    for key in keys {
        match tree.set_subcategory(key, true) {
            Ok(_) => applied += 1,
            Err(err) => tracing::warn!("preselect: {err}"),
        }
    }
    applied
}
