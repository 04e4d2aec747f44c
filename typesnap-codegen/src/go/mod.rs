//! Go snapshot rendering modules.

pub mod definitions;
pub mod document;

pub use definitions::GoRenderer;
pub use document::{KindGroup, render};
