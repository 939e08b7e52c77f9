//! Terminal rendering: the cycling name line and the confetti fanfare.

use std::{
    io::{self, Write},
    sync::Mutex,
};

use anyhow::Result;
use rand::{seq::IndexedRandom, Rng};
use raffle_core::{CelebrationHandle, CelebrationOptions, CelebrationTrigger};

const CONFETTI_GLYPHS: &[char] = &['*', '+', '.', 'o', '~', '^'];
const MAX_CONFETTI_WIDTH: usize = 72;

/// Redraws a single terminal line in place while names cycle.
pub struct AnimationLine<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> AnimationLine<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: 0 }
    }

    pub fn show(&mut self, name: &str) -> io::Result<()> {
        let frame = format!("Drawing... {name}");
        let pad = self.width.saturating_sub(frame.chars().count());
        self.width = self.width.max(frame.chars().count());
        write!(self.out, "\r{frame}{}", " ".repeat(pad))?;
        self.out.flush()
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.width > 0 {
            write!(self.out, "\r{}\r", " ".repeat(self.width))?;
            self.width = 0;
        }
        self.out.flush()
    }
}

pub fn confetti_width(options: &CelebrationOptions) -> usize {
    let scaled = (options.particle_count as f32 * options.spread / 360.0).round();
    (scaled.max(1.0) as usize).min(MAX_CONFETTI_WIDTH)
}

pub fn confetti_row(options: &CelebrationOptions, rng: &mut impl Rng) -> String {
    (0..confetti_width(options))
        .map(|_| *CONFETTI_GLYPHS.choose(rng).unwrap_or(&'*'))
        .collect()
}

/// Prints a confetti row to stdout. Reports itself unavailable when stdout carries
/// machine-readable output or animation is suppressed.
pub struct TerminalCelebration {
    enabled: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalCelebration {
    pub fn stdout(enabled: bool) -> Self {
        Self::with_writer(enabled, Box::new(io::stdout()))
    }

    pub fn with_writer(enabled: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            enabled,
            out: Mutex::new(out),
        }
    }
}

impl CelebrationTrigger for TerminalCelebration {
    fn is_available(&self) -> bool {
        self.enabled
    }

    fn celebrate(&self, options: &CelebrationOptions) -> Result<CelebrationHandle> {
        let row = confetti_row(options, &mut rand::rng());
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("terminal writer poisoned"))?;
        // Clear the animation line before the fanfare.
        writeln!(out, "\r\x1b[2K{row}")?;
        out.flush()?;
        Ok(CelebrationHandle::detached())
    }
}
