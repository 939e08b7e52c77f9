//! Controller layer: UI events, celebration bridge, and draw orchestration.

pub mod celebration;
pub mod events;
pub mod orchestration;
