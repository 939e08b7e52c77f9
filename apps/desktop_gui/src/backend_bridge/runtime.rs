//! Runtime bridge between the draw timer task and UI event intake.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::{Sender, TrySendError};
use raffle_core::{TickSink, TokioTickScheduler};

use crate::controller::events::UiEvent;

/// Owns the tokio runtime the draw timer runs on. Dropping it shuts the timer task down.
pub struct BackendRuntime {
    runtime: tokio::runtime::Runtime,
}

impl BackendRuntime {
    pub fn launch() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("raffle-timer")
            .enable_time()
            .build()
            .context("failed to build draw timer runtime")?;
        tracing::debug!("draw timer runtime started");
        Ok(Self { runtime })
    }

    pub fn tick_scheduler(&self, ui_tx: Sender<UiEvent>) -> TokioTickScheduler {
        TokioTickScheduler::new(self.runtime.handle().clone(), tick_sink(ui_tx))
    }
}

pub fn tick_sink(ui_tx: Sender<UiEvent>) -> TickSink {
    Arc::new(move |tick| match ui_tx.try_send(UiEvent::Tick(tick)) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!(draw_id = %tick.draw_id, "ui event queue full; dropping tick");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    })
}
