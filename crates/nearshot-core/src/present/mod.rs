//! Presentation adapters: hand a completed search outcome to a display
//! surface or a map renderer.
//!
//! Both adapters own only what they need to render the most recent
//! completed result; a new result replaces the old one, nothing is queued.

mod display;
mod map;

pub use display::{DisplayAdapter, DisplaySurface};
pub use map::{MapAdapter, MapRenderer};
