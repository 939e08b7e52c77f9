//! Events delivered to the UI thread from the timer task and the celebration bridge.

use raffle_core::{CelebrationOptions, DrawTick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BurstId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Tick(DrawTick),
    CelebrationRequested {
        burst: BurstId,
        options: CelebrationOptions,
    },
    CelebrationDismissed(BurstId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Draw,
    Reset,
}

/// Inline status under the input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBannerSeverity {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub severity: StatusBannerSeverity,
    pub message: String,
}

impl StatusBanner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: StatusBannerSeverity::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: StatusBannerSeverity::Info,
            message: message.into(),
        }
    }
}
