//! Optional celebration collaborator fired when a winner is drawn.

use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationOptions {
    pub particle_count: u32,
    /// Spread of the burst in degrees.
    pub spread: f32,
    /// Normalized launch point; (0, 0) is the top-left corner of the surface.
    pub origin: Origin,
    pub z_index: i32,
}

impl Default for CelebrationOptions {
    fn default() -> Self {
        Self {
            particle_count: 150,
            spread: 90.0,
            origin: Origin { x: 0.5, y: 0.6 },
            z_index: 1000,
        }
    }
}

impl CelebrationOptions {
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (axis, value) in [("x", self.origin.x), ("y", self.origin.y)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::OriginOutOfRange { axis, value });
            }
        }
        if !(0.0..=360.0).contains(&self.spread) {
            return Err(SettingsError::SpreadOutOfRange(self.spread));
        }
        Ok(())
    }
}

/// Returned by a collaborator for an effect it started. Dismissing stops the effect
/// early; a detached handle only signals that the effect was launched.
pub struct CelebrationHandle {
    dismiss: Option<Box<dyn FnOnce() + Send>>,
}

impl CelebrationHandle {
    pub fn new(dismiss: impl FnOnce() + Send + 'static) -> Self {
        Self {
            dismiss: Some(Box::new(dismiss)),
        }
    }

    pub fn detached() -> Self {
        Self { dismiss: None }
    }

    pub fn is_dismissible(&self) -> bool {
        self.dismiss.is_some()
    }

    pub fn dismiss(mut self) {
        if let Some(dismiss) = self.dismiss.take() {
            dismiss();
        }
    }
}

impl fmt::Debug for CelebrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CelebrationHandle")
            .field("dismissible", &self.is_dismissible())
            .finish()
    }
}

pub trait CelebrationTrigger: Send + Sync {
    /// Feature check performed before every invocation.
    fn is_available(&self) -> bool {
        true
    }

    fn celebrate(&self, options: &CelebrationOptions) -> Result<CelebrationHandle>;
}

pub struct MissingCelebration;

impl CelebrationTrigger for MissingCelebration {
    fn is_available(&self) -> bool {
        false
    }

    fn celebrate(&self, _options: &CelebrationOptions) -> Result<CelebrationHandle> {
        Err(anyhow!("celebration effect is unavailable"))
    }
}
