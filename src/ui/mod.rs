//! Terminal front-end: crossterm input and rendering.

pub mod input;
pub mod renderer;
