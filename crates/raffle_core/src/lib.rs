//! Raffle drawing core: participant parsing, the timed draw state machine and the
//! hooks front ends plug into (tick scheduling, celebration effects, settings).

pub mod celebration;
pub mod config;
pub mod engine;
pub mod error;
pub mod participants;
pub mod timer;

pub use celebration::{
    CelebrationHandle, CelebrationOptions, CelebrationTrigger, MissingCelebration, Origin,
};
pub use config::{load_settings, DrawSettings, RaffleSettings};
pub use engine::{DrawEngine, DrawState, Presentation, StartOutcome, TickOutcome};
pub use error::{DrawError, SettingsError, MIN_PARTICIPANTS};
pub use participants::ParticipantList;
pub use timer::{
    DrawId, DrawTick, ManualTickScheduler, TickQueue, TickScheduler, TickSink, TimerHandle,
    TokioTickScheduler,
};
