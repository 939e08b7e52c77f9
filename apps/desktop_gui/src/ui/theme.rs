use egui::Color32;

pub const APP_BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42);
pub const CARD_FILL: Color32 = Color32::from_rgb(30, 41, 59);
pub const CARD_STROKE: Color32 = Color32::from_rgb(51, 65, 85);
pub const INSET_FILL: Color32 = Color32::from_rgb(51, 65, 85);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(148, 163, 184);
pub const HEADING_TEXT: Color32 = Color32::from_rgb(203, 213, 225);
pub const ACCENT: Color32 = Color32::from_rgb(79, 70, 229);
pub const ACCENT_DISABLED: Color32 = Color32::from_rgb(71, 85, 105);
pub const CYCLING_NAME: Color32 = Color32::from_rgb(167, 139, 250);
pub const WINNER_GOLD: Color32 = Color32::from_rgb(252, 211, 77);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(248, 113, 113);

pub fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = APP_BACKGROUND;
    visuals.window_fill = CARD_FILL;
    visuals.extreme_bg_color = INSET_FILL;
    visuals.selection.bg_fill = ACCENT;
    visuals
}

/// Pulsing factor in `0.6..=1.0` for animated text.
pub fn pulse(time: f64) -> f32 {
    let phase = (time * std::f64::consts::TAU / 1.5).sin() as f32;
    0.8 + 0.2 * phase
}
