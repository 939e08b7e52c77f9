//! UI layer for the raffle window: app shell, confetti overlay, and palette.

pub mod app;
pub mod confetti;
pub mod theme;

pub use app::{RaffleApp, StartupConfig};
