//! Core model – the selection tree, the trigger dispatcher and catalog loading.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod catalog;
pub mod dispatch;
pub mod tree;
