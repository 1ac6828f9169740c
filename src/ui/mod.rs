//! Terminal presentation

pub mod render;
pub mod theme;
