use std::{sync::Arc, time::Duration};

use anyhow::Result;
use crossbeam_channel::{bounded, Receiver};
use eframe::egui;
use rand::{rngs::StdRng, SeedableRng};
use raffle_core::{DrawEngine, Presentation, RaffleSettings};

use crate::{
    backend_bridge::runtime::BackendRuntime,
    controller::{
        celebration::ChannelCelebration,
        events::{StatusBanner, StatusBannerSeverity, UiAction, UiEvent},
        orchestration,
    },
    ui::{confetti::ConfettiField, theme},
};

const UI_EVENT_QUEUE_CAPACITY: usize = 2048;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub settings: RaffleSettings,
    pub seed: Option<u64>,
    pub celebrations: bool,
}

/// Owned snapshot of [`Presentation`] so the input buffer can be borrowed mutably
/// while rendering.
enum View {
    Winner(String),
    Input {
        display_name: Option<String>,
        error: Option<String>,
        drawing: bool,
        draw_label: &'static str,
    },
}

impl From<Presentation<'_>> for View {
    fn from(value: Presentation<'_>) -> Self {
        let draw_label = value.draw_button_label();
        match value {
            Presentation::Winner { winner } => View::Winner(winner.to_string()),
            Presentation::Input {
                display_name,
                error,
                drawing,
                ..
            } => View::Input {
                display_name: display_name.map(str::to_string),
                error,
                drawing,
                draw_label,
            },
        }
    }
}

pub struct RaffleApp {
    // Dropped before `_backend` so the timer is cancelled while its runtime is alive.
    engine: DrawEngine,
    ui_rx: Receiver<UiEvent>,
    confetti: ConfettiField,
    status_banner: Option<StatusBanner>,
    _backend: BackendRuntime,
}

impl RaffleApp {
    pub fn new(config: StartupConfig) -> Result<Self> {
        let backend = BackendRuntime::launch()?;
        let (ui_tx, ui_rx) = bounded::<UiEvent>(UI_EVENT_QUEUE_CAPACITY);

        let scheduler = backend.tick_scheduler(ui_tx.clone());
        let celebration = ChannelCelebration::new(ui_tx, config.celebrations);
        let mut engine = DrawEngine::new(config.settings.draw, Box::new(scheduler))
            .with_celebration(Arc::new(celebration), config.settings.celebration);
        if let Some(seed) = config.seed {
            engine = engine.with_seed(seed);
        }

        Ok(Self {
            engine,
            ui_rx,
            confetti: ConfettiField::new(StdRng::from_os_rng()),
            status_banner: None,
            _backend: backend,
        })
    }

    fn apply_action(&mut self, action: UiAction) {
        self.status_banner = orchestration::apply_action(&mut self.engine, action);
    }

    fn show_status_banner(&self, ui: &mut egui::Ui, error: Option<&str>) {
        let Some((severity, message)) =
            orchestration::visible_banner(self.status_banner.as_ref(), error)
        else {
            return;
        };
        let color = match severity {
            StatusBannerSeverity::Error => theme::ERROR_TEXT,
            StatusBannerSeverity::Info => theme::MUTED_TEXT,
        };
        ui.label(egui::RichText::new(message).size(13.0).color(color));
    }

    fn card_frame() -> egui::Frame {
        egui::Frame::new()
            .fill(theme::CARD_FILL)
            .corner_radius(egui::CornerRadius::same(16))
            .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
            .inner_margin(egui::Margin::symmetric(24, 22))
    }

    fn accent_button(label: &str, enabled: bool, width: f32) -> egui::Button<'static> {
        egui::Button::new(
            egui::RichText::new(label.to_string())
                .strong()
                .size(16.0)
                .color(egui::Color32::WHITE),
        )
        .min_size(egui::vec2(width, 44.0))
        .fill(if enabled {
            theme::ACCENT
        } else {
            theme::ACCENT_DISABLED
        })
    }

    fn show_input_card(
        &mut self,
        ui: &mut egui::Ui,
        display_name: Option<&str>,
        error: Option<&str>,
        drawing: bool,
        draw_label: &str,
    ) -> Option<UiAction> {
        let mut action = None;
        let time = ui.input(|i| i.time);

        Self::card_frame().show(ui, |ui| {
            ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
            ui.label(
                egui::RichText::new("Enter participant names (one per line)")
                    .size(14.0)
                    .color(theme::HEADING_TEXT),
            );

            let editor = egui::TextEdit::multiline(self.engine.raw_text_mut())
                .hint_text("Alice\nBob\nCharlie")
                .desired_rows(10)
                .desired_width(f32::INFINITY);
            let response = ui.add_enabled(!drawing, editor);

            let submit_shortcut = response.has_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command);
            if submit_shortcut && !drawing {
                action = Some(UiAction::Draw);
            }

            self.show_status_banner(ui, error);

            if let Some(name) = display_name {
                egui::Frame::new()
                    .fill(theme::INSET_FILL)
                    .corner_radius(egui::CornerRadius::same(10))
                    .inner_margin(egui::Margin::symmetric(12, 18))
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.vertical_centered(|ui| {
                            let color = theme::CYCLING_NAME.gamma_multiply(theme::pulse(time));
                            ui.label(egui::RichText::new(name).size(30.0).strong().color(color));
                        });
                    });
            }

            let width = ui.available_width();
            let button = Self::accent_button(draw_label, !drawing, width);
            if ui.add_enabled(!drawing, button).clicked() {
                action = Some(UiAction::Draw);
            }
        });

        action
    }

    fn show_winner_card(&self, ui: &mut egui::Ui, winner: &str) -> Option<UiAction> {
        let mut action = None;
        let time = ui.input(|i| i.time);

        Self::card_frame().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.style_mut().spacing.item_spacing = egui::vec2(8.0, 8.0);
                ui.label(egui::RichText::new("🏆").size(48.0));
                ui.label(
                    egui::RichText::new("The winner is...")
                        .size(22.0)
                        .strong()
                        .color(theme::HEADING_TEXT),
                );
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(winner)
                        .size(44.0)
                        .strong()
                        .color(theme::WINNER_GOLD.gamma_multiply(theme::pulse(time))),
                );
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new("⭐ Congratulations! ⭐")
                        .size(17.0)
                        .color(theme::WINNER_GOLD),
                );
                ui.add_space(18.0);

                let width = ui.available_width();
                if ui
                    .add(Self::accent_button("Start New Raffle", true, width))
                    .clicked()
                {
                    action = Some(UiAction::Reset);
                }
            });
        });

        action
    }

    fn paint_confetti(&self, ctx: &egui::Context) {
        if !self.confetti.is_active() {
            return;
        }
        let layer = egui::LayerId::new(self.confetti.layer_order(), egui::Id::new("confetti"));
        ctx.layer_painter(layer).extend(self.confetti.shapes());
    }
}

impl eframe::App for RaffleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        orchestration::drain_events(&self.ui_rx, &mut self.engine, &mut self.confetti);
        self.confetti.step(ctx.input(|i| i.stable_dt));

        let view = View::from(self.engine.presentation());
        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            self.confetti.set_surface(ui.max_rect());

            let avail = ui.available_size();
            let card_width = avail.x.clamp(360.0, 460.0);
            ui.add_space((avail.y * 0.08).clamp(12.0, 64.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                ui.label(
                    egui::RichText::new("Raffle Draw")
                        .size(34.0)
                        .strong()
                        .color(theme::CYCLING_NAME),
                );
                ui.label(
                    egui::RichText::new("Enter names, draw a winner, and celebrate!")
                        .color(theme::MUTED_TEXT),
                );
                ui.add_space(18.0);

                action = match &view {
                    View::Winner(winner) => self.show_winner_card(ui, winner),
                    View::Input {
                        display_name,
                        error,
                        drawing,
                        draw_label,
                    } => self.show_input_card(
                        ui,
                        display_name.as_deref(),
                        error.as_deref(),
                        *drawing,
                        draw_label,
                    ),
                };
            });
        });

        if let Some(action) = action {
            self.apply_action(action);
        }

        self.paint_confetti(ctx);

        if self.engine.is_drawing() || self.confetti.is_active() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else if matches!(view, View::Winner(_)) {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl Drop for RaffleApp {
    fn drop(&mut self) {
        if let Some(draw_id) = self.engine.active_draw() {
            tracing::debug!(%draw_id, "window closed mid-draw; cancelling timer");
            self.engine.reset();
        }
    }
}
