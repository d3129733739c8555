//! Terminal presentation.

pub mod render;

pub use render::{RenderSink, Renderer};
