use thiserror::Error;

/// Minimum number of participants required to run a draw.
pub const MIN_PARTICIPANTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("Please enter at least two names to draw a winner.")]
    InsufficientParticipants { found: usize },
}

impl DrawError {
    pub fn insufficient(found: usize) -> Self {
        Self::InsufficientParticipants { found }
    }

    /// Text shown inline next to the input form.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("animation duration must be at most {max_ms} ms, got {duration_ms} ms")]
    DurationTooLong { duration_ms: u64, max_ms: u64 },
    #[error("celebration origin {axis} must be within 0.0..=1.0, got {value}")]
    OriginOutOfRange { axis: &'static str, value: f32 },
    #[error("celebration spread must be within 0..=360 degrees, got {0}")]
    SpreadOutOfRange(f32),
}
