//! Celebration collaborator that forwards bursts to the confetti overlay.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{anyhow, Result};
use crossbeam_channel::{Sender, TrySendError};
use raffle_core::{CelebrationHandle, CelebrationOptions, CelebrationTrigger};

use crate::controller::events::{BurstId, UiEvent};

pub struct ChannelCelebration {
    ui_tx: Sender<UiEvent>,
    next_burst: AtomicU64,
    enabled: bool,
}

impl ChannelCelebration {
    pub fn new(ui_tx: Sender<UiEvent>, enabled: bool) -> Self {
        Self {
            ui_tx,
            next_burst: AtomicU64::new(1),
            enabled,
        }
    }
}

impl CelebrationTrigger for ChannelCelebration {
    fn is_available(&self) -> bool {
        self.enabled
    }

    fn celebrate(&self, options: &CelebrationOptions) -> Result<CelebrationHandle> {
        let burst = BurstId(self.next_burst.fetch_add(1, Ordering::Relaxed));
        match self.ui_tx.try_send(UiEvent::CelebrationRequested {
            burst,
            options: *options,
        }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => return Err(anyhow!("ui event queue is full")),
            Err(TrySendError::Disconnected(_)) => return Err(anyhow!("ui event queue closed")),
        }

        let ui_tx = self.ui_tx.clone();
        Ok(CelebrationHandle::new(move || {
            let _ = ui_tx.try_send(UiEvent::CelebrationDismissed(burst));
        }))
    }
}
