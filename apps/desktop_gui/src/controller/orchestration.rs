//! Applies UI actions and queued events to the draw engine and confetti overlay.

use crossbeam_channel::Receiver;
use raffle_core::{DrawEngine, StartOutcome, TickOutcome};

use crate::{
    controller::events::{StatusBanner, StatusBannerSeverity, UiAction, UiEvent},
    ui::confetti::ConfettiField,
};

/// Upper bound of queued events handled per frame.
pub const MAX_EVENTS_PER_FRAME: usize = 256;

pub fn apply_action(engine: &mut DrawEngine, action: UiAction) -> Option<StatusBanner> {
    match action {
        UiAction::Draw => match engine.start_draw() {
            Ok(StartOutcome::Started(draw_id)) => {
                tracing::debug!(%draw_id, "draw requested from ui");
                None
            }
            Ok(StartOutcome::AlreadyDrawing(_)) => None,
            Err(err) => Some(StatusBanner::error(err.message())),
        },
        UiAction::Reset => {
            if engine.is_drawing() {
                return Some(StatusBanner::info("Wait for the current draw to finish."));
            }
            engine.reset();
            None
        }
    }
}

/// Banner to render under the input form: the one from the last action, else the
/// engine's inline validation error.
pub fn visible_banner<'a>(
    stored: Option<&'a StatusBanner>,
    inline_error: Option<&'a str>,
) -> Option<(StatusBannerSeverity, &'a str)> {
    stored
        .map(|banner| (banner.severity, banner.message.as_str()))
        .or_else(|| inline_error.map(|message| (StatusBannerSeverity::Error, message)))
}

pub fn apply_event(engine: &mut DrawEngine, confetti: &mut ConfettiField, event: UiEvent) {
    match event {
        UiEvent::Tick(tick) => {
            if let TickOutcome::Finished { winner } = engine.on_tick(tick) {
                tracing::info!(%winner, "winner shown");
            }
        }
        UiEvent::CelebrationRequested { burst, options } => confetti.spawn(burst, &options),
        UiEvent::CelebrationDismissed(burst) => confetti.dismiss(burst),
    }
}

/// Drains pending events. Events produced while applying (a celebration request raised
/// by the final tick) are picked up in the same pass.
pub fn drain_events(
    ui_rx: &Receiver<UiEvent>,
    engine: &mut DrawEngine,
    confetti: &mut ConfettiField,
) -> usize {
    let mut handled = 0;
    while handled < MAX_EVENTS_PER_FRAME {
        let Ok(event) = ui_rx.try_recv() else {
            break;
        };
        apply_event(engine, confetti, event);
        handled += 1;
    }
    handled
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
