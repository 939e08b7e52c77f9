//! Draw state machine: validation, the cycling animation and the final pick.

use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    celebration::{CelebrationHandle, CelebrationOptions, CelebrationTrigger},
    config::DrawSettings,
    error::DrawError,
    participants::ParticipantList,
    timer::{DrawId, DrawTick, TickScheduler, TimerHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Drawing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(DrawId),
    /// A draw was already animating; nothing changed.
    AlreadyDrawing(DrawId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick did not belong to the running draw.
    Ignored,
    Cycling { name: String },
    Finished { winner: String },
}

/// What the front end should render right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation<'a> {
    Winner {
        winner: &'a str,
    },
    Input {
        raw_text: &'a str,
        display_name: Option<&'a str>,
        error: Option<String>,
        drawing: bool,
    },
}

impl Presentation<'_> {
    pub fn draw_button_label(&self) -> &'static str {
        match self {
            Presentation::Input { drawing: true, .. } => "Drawing...",
            _ => "Draw Winner",
        }
    }
}

struct ActiveDraw {
    id: DrawId,
    participants: ParticipantList,
    ticks: u64,
    display_name: String,
    timer: Option<TimerHandle>,
}

enum Phase {
    Idle,
    Drawing(ActiveDraw),
    Complete { winner: String },
}

pub struct DrawEngine {
    settings: DrawSettings,
    raw_text: String,
    phase: Phase,
    error: Option<DrawError>,
    rng: StdRng,
    scheduler: Box<dyn TickScheduler>,
    next_draw_id: u64,
    celebration: Option<Arc<dyn CelebrationTrigger>>,
    celebration_options: CelebrationOptions,
    active_celebration: Option<CelebrationHandle>,
}

impl DrawEngine {
    /// Invalid `settings` are replaced by the defaults so a draw always terminates.
    pub fn new(settings: DrawSettings, scheduler: Box<dyn TickScheduler>) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(err) => {
                tracing::warn!(%err, "rejecting draw settings; using defaults");
                DrawSettings::default()
            }
        };
        Self {
            settings,
            raw_text: String::new(),
            phase: Phase::Idle,
            error: None,
            rng: StdRng::from_os_rng(),
            scheduler,
            next_draw_id: 1,
            celebration: None,
            celebration_options: CelebrationOptions::default(),
            active_celebration: None,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_celebration(
        mut self,
        trigger: Arc<dyn CelebrationTrigger>,
        options: CelebrationOptions,
    ) -> Self {
        self.celebration = Some(trigger);
        self.celebration_options = options;
        self
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Editable input buffer. A running draw works on its own snapshot.
    pub fn raw_text_mut(&mut self) -> &mut String {
        &mut self.raw_text
    }

    pub fn set_raw_text(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
    }

    pub fn participants(&self) -> ParticipantList {
        ParticipantList::parse(&self.raw_text)
    }

    pub fn state(&self) -> DrawState {
        match self.phase {
            Phase::Idle => DrawState::Idle,
            Phase::Drawing(_) => DrawState::Drawing,
            Phase::Complete { .. } => DrawState::Complete,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, Phase::Drawing(_))
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.phase {
            Phase::Complete { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn current_display_name(&self) -> Option<&str> {
        match &self.phase {
            Phase::Drawing(active) => Some(&active.display_name),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DrawError> {
        self.error.as_ref()
    }

    pub fn active_draw(&self) -> Option<DrawId> {
        match &self.phase {
            Phase::Drawing(active) => Some(active.id),
            _ => None,
        }
    }

    pub fn ticks_elapsed(&self) -> u64 {
        match &self.phase {
            Phase::Drawing(active) => active.ticks,
            _ => 0,
        }
    }

    pub fn start_draw(&mut self) -> Result<StartOutcome, DrawError> {
        if let Phase::Drawing(active) = &self.phase {
            debug!(draw_id = %active.id, "draw already in progress; ignoring start");
            return Ok(StartOutcome::AlreadyDrawing(active.id));
        }

        self.error = None;
        self.phase = Phase::Idle;
        self.dismiss_celebration();

        let participants = match ParticipantList::parse_drawable(&self.raw_text) {
            Ok(participants) => participants,
            Err(err) => {
                info!(found = participants_found(&err), "draw rejected: not enough participants");
                self.error = Some(err.clone());
                return Err(err);
            }
        };

        let id = DrawId(self.next_draw_id);
        self.next_draw_id += 1;

        let display_name = participants.first().unwrap_or_default().to_string();
        let timer = self
            .scheduler
            .schedule_repeating(id, self.settings.tick_interval());

        info!(
            draw_id = %id,
            participants = participants.len(),
            interval_ms = self.settings.tick_interval_ms,
            duration_ms = self.settings.animation_duration_ms,
            "draw started"
        );

        self.phase = Phase::Drawing(ActiveDraw {
            id,
            participants,
            ticks: 0,
            display_name,
            timer: Some(timer),
        });

        Ok(StartOutcome::Started(id))
    }

    pub fn on_tick(&mut self, tick: DrawTick) -> TickOutcome {
        let Phase::Drawing(active) = &mut self.phase else {
            debug!(draw_id = %tick.draw_id, "tick with no draw running");
            return TickOutcome::Ignored;
        };
        if active.id != tick.draw_id {
            debug!(draw_id = %tick.draw_id, active = %active.id, "stale tick");
            return TickOutcome::Ignored;
        }

        active.ticks += 1;
        let shown = pick(&mut self.rng, &active.participants);
        active.display_name = shown.clone();

        if !self.settings.is_finished_after(active.ticks) {
            debug!(draw_id = %active.id, tick = active.ticks, name = %shown, "cycling");
            return TickOutcome::Cycling { name: shown };
        }

        if let Some(mut timer) = active.timer.take() {
            timer.cancel();
        }

        // Independent of the name on screen.
        let winner = pick(&mut self.rng, &active.participants);
        info!(draw_id = %active.id, ticks = active.ticks, winner = %winner, "draw complete");

        self.phase = Phase::Complete {
            winner: winner.clone(),
        };
        self.celebrate();

        TickOutcome::Finished { winner }
    }

    pub fn reset(&mut self) {
        if let Phase::Drawing(active) = &mut self.phase {
            warn!(draw_id = %active.id, "reset during a running draw; cancelling timer");
            if let Some(mut timer) = active.timer.take() {
                timer.cancel();
            }
        }

        self.raw_text.clear();
        self.error = None;
        self.phase = Phase::Idle;
        self.dismiss_celebration();
    }

    pub fn presentation(&self) -> Presentation<'_> {
        match &self.phase {
            Phase::Complete { winner } => Presentation::Winner { winner },
            Phase::Drawing(active) => Presentation::Input {
                raw_text: &self.raw_text,
                display_name: Some(&active.display_name),
                error: self.error.as_ref().map(DrawError::message),
                drawing: true,
            },
            Phase::Idle => Presentation::Input {
                raw_text: &self.raw_text,
                display_name: None,
                error: self.error.as_ref().map(DrawError::message),
                drawing: false,
            },
        }
    }

    fn celebrate(&mut self) {
        let Some(trigger) = &self.celebration else {
            return;
        };
        if !trigger.is_available() {
            debug!("celebration unavailable; skipping");
            return;
        }

        match trigger.celebrate(&self.celebration_options) {
            Ok(handle) => self.active_celebration = Some(handle),
            Err(err) => warn!("celebration failed: {err:#}"),
        }
    }

    fn dismiss_celebration(&mut self) {
        if let Some(handle) = self.active_celebration.take() {
            handle.dismiss();
        }
    }
}

fn pick(rng: &mut StdRng, participants: &ParticipantList) -> String {
    let index = rng.random_range(0..participants.len());
    participants.get(index).unwrap_or_default().to_string()
}

fn participants_found(err: &DrawError) -> usize {
    match err {
        DrawError::InsufficientParticipants { found } => *found,
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
