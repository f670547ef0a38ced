//! Temporal smoothing for the audio path.

use crate::constants::{
    ATTACK_TRANSITION, DECAY_TRANSITION, DEFAULT_SMOOTHING_FACTOR, RESET_TRANSITION,
};
use std::time::Duration;

// Keeps factor < 1 so the average always moves toward the input.
const MAX_FACTOR: f32 = 0.999;

/// Per-bin exponential moving average.
///
/// State only clears through [`Ema::clear`]; pausing the frame loop keeps it.
#[derive(Clone, Debug)]
pub struct Ema {
    factor: f32,
    values: Vec<f32>,
}

impl Default for Ema {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}

impl Ema {
    pub fn new(factor: f32) -> Self {
        Self {
            factor: clamp_factor(factor),
            values: Vec::new(),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn set_factor(&mut self, factor: f32) {
        self.factor = clamp_factor(factor);
    }

    /// Fold one sample per bin into the average. The bin count follows the
    /// input; new bins start from zero.
    pub fn update(&mut self, raw: &[f32]) -> &[f32] {
        if self.values.len() != raw.len() {
            self.values.resize(raw.len(), 0.0);
        }
        let a = self.factor;
        for (s, r) in self.values.iter_mut().zip(raw) {
            *s = *s * a + *r * (1.0 - a);
        }
        &self.values
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, bin: usize) -> f32 {
        self.values.get(bin).copied().unwrap_or(0.0)
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
    }
}

fn clamp_factor(factor: f32) -> f32 {
    if factor.is_finite() {
        factor.clamp(0.0, MAX_FACTOR)
    } else {
        DEFAULT_SMOOTHING_FACTOR
    }
}

/// Number of samples a constant input needs, starting from zero, to come
/// within `tolerance` (relative) of its value: the smallest `n` with
/// `factor^n <= tolerance`.
pub fn iterations_to_converge(factor: f32, tolerance: f32) -> u32 {
    let factor = clamp_factor(factor);
    if factor == 0.0 {
        return 1;
    }
    let n = (tolerance.ln() / factor.ln()).ceil();
    n.max(1.0) as u32
}

/// Transition window chosen for the next visual update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionTier {
    Attack,
    Decay,
    Reset,
}

impl TransitionTier {
    pub fn duration(self) -> Duration {
        match self {
            TransitionTier::Attack => ATTACK_TRANSITION,
            TransitionTier::Decay => DECAY_TRANSITION,
            TransitionTier::Reset => RESET_TRANSITION,
        }
    }

    /// CSS time value, e.g. `0.05s`.
    pub fn css(self) -> String {
        format!("{}s", self.duration().as_secs_f32())
    }
}

/// Punch-in / decay-out timing from consecutive values.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackDecay {
    previous: f32,
}

impl AttackDecay {
    pub fn previous(&self) -> f32 {
        self.previous
    }

    pub fn observe(&mut self, value: f32) -> TransitionTier {
        let tier = if value > self.previous {
            TransitionTier::Attack
        } else {
            TransitionTier::Decay
        };
        self.previous = value;
        tier
    }

    pub fn reset(&mut self) -> TransitionTier {
        self.previous = 0.0;
        TransitionTier::Reset
    }
}
