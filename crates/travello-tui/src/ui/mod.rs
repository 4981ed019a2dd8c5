//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout and one view per route
//! - `input`: keyboard handling
//! - `styles`: colors and text styles

pub mod input;
pub mod render;
pub mod styles;
