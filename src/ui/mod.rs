//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* selection tree plus the cached visual state
//! and turns them into cells on the terminal.  No mutation happens here.

pub mod layout;
pub mod picker;
pub mod popup;
pub mod theme;
