//! Application orchestration — state, event loop plumbing, input handling
//! and the visual adapter between the selection tree and the widgets.

pub mod event;
pub mod handler;
pub mod output;
pub mod state;
pub mod visual;
