//! Confetti overlay: a small particle simulation painted above the raffle card.

use std::f32::consts::PI;

use egui::{pos2, vec2, Color32, Order, Pos2, Rect, Shape, Stroke, Vec2};
use rand::{rngs::StdRng, Rng};
use raffle_core::CelebrationOptions;

use crate::controller::events::BurstId;

/// Pixels per second at full launch strength.
const START_VELOCITY: f32 = 900.0;
/// Pixels per second squared.
const GRAVITY: f32 = 1100.0;
/// Fraction of velocity kept per 1/60 s.
const DECAY: f32 = 0.92;
const LIFETIME_SECS: f32 = 3.0;
const FADE_FRACTION: f32 = 0.3;
const MAX_STEP_SECS: f32 = 0.1;

const COLORS: [Color32; 6] = [
    Color32::from_rgb(250, 204, 21),
    Color32::from_rgb(245, 158, 11),
    Color32::from_rgb(129, 140, 248),
    Color32::from_rgb(192, 132, 252),
    Color32::from_rgb(52, 211, 153),
    Color32::from_rgb(248, 113, 113),
];

#[derive(Debug, Clone)]
struct Particle {
    burst: BurstId,
    pos: Pos2,
    vel: Vec2,
    angle: f32,
    spin: f32,
    size: f32,
    color: Color32,
    age: f32,
}

pub struct ConfettiField {
    particles: Vec<Particle>,
    surface: Rect,
    order: Order,
    rng: StdRng,
}

impl ConfettiField {
    pub fn new(rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            surface: Rect::from_min_size(Pos2::ZERO, vec2(640.0, 480.0)),
            order: Order::Foreground,
            rng,
        }
    }

    pub fn set_surface(&mut self, surface: Rect) {
        self.surface = surface;
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[cfg(test)]
    pub fn burst_len(&self, burst: BurstId) -> usize {
        self.particles.iter().filter(|p| p.burst == burst).count()
    }

    pub fn layer_order(&self) -> Order {
        self.order
    }

    pub fn spawn(&mut self, burst: BurstId, options: &CelebrationOptions) {
        let origin = pos2(
            self.surface.min.x + self.surface.width() * options.origin.x,
            self.surface.min.y + self.surface.height() * options.origin.y,
        );
        let half_spread = options.spread.to_radians() / 2.0;
        self.order = if options.z_index > 0 {
            Order::Foreground
        } else {
            Order::Background
        };

        for _ in 0..options.particle_count {
            // Straight up, jittered within the spread.
            let offset = if half_spread > 0.0 {
                self.rng.random_range(-half_spread..=half_spread)
            } else {
                0.0
            };
            let heading = -PI / 2.0 + offset;
            let speed = START_VELOCITY * self.rng.random_range(0.5..=1.0);
            self.particles.push(Particle {
                burst,
                pos: origin,
                vel: vec2(heading.cos(), heading.sin()) * speed,
                angle: self.rng.random_range(0.0..PI),
                spin: self.rng.random_range(-8.0..8.0),
                size: self.rng.random_range(5.0..9.0),
                color: COLORS[self.rng.random_range(0..COLORS.len())],
                age: 0.0,
            });
        }
    }

    pub fn dismiss(&mut self, burst: BurstId) {
        self.particles.retain(|p| p.burst != burst);
    }

    pub fn step(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_STEP_SECS);
        if dt == 0.0 {
            return;
        }
        let damping = DECAY.powf(dt * 60.0);
        let floor = self.surface.max.y + 40.0;

        for p in &mut self.particles {
            p.vel *= damping;
            p.vel.y += GRAVITY * dt;
            p.pos += p.vel * dt;
            p.angle += p.spin * dt;
            p.age += dt;
        }
        self.particles.retain(|p| p.age < LIFETIME_SECS && p.pos.y < floor);
    }

    pub fn shapes(&self) -> Vec<Shape> {
        self.particles
            .iter()
            .map(|p| {
                let remaining = 1.0 - p.age / LIFETIME_SECS;
                let alpha = (remaining / FADE_FRACTION).clamp(0.0, 1.0);
                let color = p.color.gamma_multiply(alpha);
                let (sin, cos) = p.angle.sin_cos();
                let half = p.size / 2.0;
                // Flattened square so pieces appear to flutter.
                let corners = [
                    (-half, -half * 0.5),
                    (half, -half * 0.5),
                    (half, half * 0.5),
                    (-half, half * 0.5),
                ]
                .into_iter()
                .map(|(x, y)| p.pos + vec2(x * cos - y * sin, x * sin + y * cos))
                .collect();
                Shape::convex_polygon(corners, color, Stroke::NONE)
            })
            .collect()
    }
}
