//! Printing the submitted selection.
//!
//! stdout carries nothing but the selection so the picker composes in shell
//! pipelines; the TUI itself is drawn on stderr.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::OutputFormat;
use crate::core::tree::SelectionTree;

/// Category key → selected subcategory keys, serialised in catalog order.
struct SelectionMap<'a>(Vec<(&'a str, Vec<&'a str>)>);

impl Serialize for SelectionMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, subs) in &self.0 {
            map.serialize_entry(category, subs)?;
        }
        map.end()
    }
}

/// Render the tree's current selection in the requested format.
pub fn render_selection(tree: &SelectionTree, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Plain => Ok(tree
            .selected_keys()
            .into_iter()
            .map(|key| format!("{key}\n"))
            .collect()),
        OutputFormat::Json => {
            let mut text = serde_json::to_string(&SelectionMap(tree.selected_by_category()))?;
            text.push('\n');
            Ok(text)
        }
    }
}
