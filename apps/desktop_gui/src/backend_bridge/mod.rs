//! Background runtime hosting the draw timer, bridged to the UI event queue.

pub mod runtime;
