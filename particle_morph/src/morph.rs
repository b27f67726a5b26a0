//! The morph engine.
//!
//! Owns two flat `xyz` buffers of `3 × count` floats.  `targets` is rewritten
//! wholesale when a template is applied; `positions` chases it a fixed
//! fraction of the remaining distance per step, so particles decelerate into
//! place and never overshoot.  A separate progress counter decides when to
//! stop stepping — it reaches 1 after a fixed number of frames regardless of
//! how much residual distance is left.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::template::Template;

// ════════════════════════════════════════════════════════════════════════════
// MorphTuning
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphTuning {
    /// Number of particles.
    pub count:         usize,
    /// Progress added per step; the morph settles after `1 / rate` steps.
    pub progress_rate: f32,
    /// Fraction of the remaining distance covered per step.
    pub approach:      f32,
}

impl Default for MorphTuning {
    fn default() -> Self {
        MorphTuning {
            count:         6000,
            progress_rate: 0.04,
            approach:      0.15,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MorphEngine
// ════════════════════════════════════════════════════════════════════════════

pub struct MorphEngine {
    tuning:    MorphTuning,
    positions: Vec<f32>,
    targets:   Vec<f32>,
    progress:  f32,
    /// Set whenever `positions` changes; cleared by the renderer.
    dirty:     bool,
    rng:       StdRng,
}

impl MorphEngine {
    /// Fill both buffers from `initial` so the first frame is already settled.
    pub fn new(tuning: MorphTuning, initial: &Template, rng: StdRng) -> Self {
        let len = tuning.count * 3;
        let mut engine = MorphEngine {
            tuning,
            positions: vec![0.0; len],
            targets:   vec![0.0; len],
            progress:  1.0,
            dirty:     true,
            rng,
        };
        engine.fill_targets(initial);
        engine.positions.copy_from_slice(&engine.targets);
        engine
    }

    /// Retarget every particle at `template` and restart the morph.
    pub fn apply_template(&mut self, template: &Template) {
        self.fill_targets(template);
        self.progress = 0.0;
        tracing::debug!(
            target: "particle_morph",
            template = template.name(),
            residual = self.max_residual(),
            "morph started"
        );
    }

    /// One animation frame.  A no-op once settled.
    pub fn step(&mut self) {
        if self.is_settled() { return; }
        self.progress += self.tuning.progress_rate;
        let k = self.tuning.approach;
        for (p, t) in self.positions.iter_mut().zip(self.targets.iter()) {
            *p += (*t - *p) * k;
        }
        self.dirty = true;
        if self.is_settled() {
            tracing::debug!(target: "particle_morph", residual = self.max_residual(), "morph settled");
        }
    }

    pub fn is_settled(&self) -> bool { self.progress >= 1.0 }
    pub fn progress(&self)   -> f32  { self.progress.min(1.0) }
    pub fn count(&self)      -> usize { self.tuning.count }
    pub fn tuning(&self)     -> &MorphTuning { &self.tuning }

    /// Current particle positions, `[x0, y0, z0, x1, …]`.
    pub fn positions(&self) -> &[f32] { &self.positions }
    pub fn targets(&self)   -> &[f32] { &self.targets }

    /// Whether `positions` changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Largest per-coordinate gap between a particle and its target.
    pub fn max_residual(&self) -> f32 {
        self.positions.iter()
            .zip(self.targets.iter())
            .map(|(p, t)| (t - p).abs())
            .fold(0.0, f32::max)
    }

    fn fill_targets(&mut self, template: &Template) {
        let total = self.tuning.count;
        for (i, slot) in self.targets.chunks_exact_mut(3).enumerate() {
            slot.copy_from_slice(&template.point(i, total, &mut self.rng));
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FIREWORK, HEART, SATURN, SPHERE};
    use rand::SeedableRng;

    fn engine() -> MorphEngine {
        MorphEngine::new(MorphTuning::default(), &SPHERE, StdRng::seed_from_u64(42))
    }

    #[test]
    fn starts_settled_on_initial_template() {
        let e = engine();
        assert!(e.is_settled());
        assert_eq!(e.positions().len(), 6000 * 3);
        assert_eq!(e.positions(), e.targets());
        assert_eq!(e.max_residual(), 0.0);
    }

    #[test]
    fn apply_template_only_touches_targets() {
        let mut e = engine();
        let before = e.positions().to_vec();
        e.apply_template(&HEART);
        assert_eq!(e.progress(), 0.0);
        assert_eq!(e.positions(), &before[..]);
        assert_eq!(&e.targets()[3..6], &crate::template::heart(1, 6000)[..]);
    }

    #[test]
    fn one_step_covers_fixed_fraction() {
        let mut e = engine();
        let before = e.positions().to_vec();
        e.apply_template(&SATURN);
        e.step();
        for k in 0..30 {
            let expected = before[k] + (e.targets()[k] - before[k]) * 0.15;
            assert!((e.positions()[k] - expected).abs() < 1e-6);
        }
        assert!((e.progress() - 0.04).abs() < 1e-6);
    }

    #[test]
    fn settles_after_twenty_five_steps() {
        let mut e = engine();
        e.apply_template(&HEART);
        let mut steps = 0;
        while !e.is_settled() {
            e.step();
            steps += 1;
            assert!(steps <= 30, "morph never settled");
        }
        // 0.04 accumulates in f32, so allow one step of slack
        assert!((25..=26).contains(&steps), "{} steps", steps);
        let residual = e.max_residual();
        e.step();
        assert_eq!(e.max_residual(), residual, "settled engine must not move");
    }

    #[test]
    fn converges_without_overshoot() {
        let mut e = engine();
        e.apply_template(&FIREWORK);
        let initial = e.max_residual();
        let mut last = initial;
        for _ in 0..50 {
            // keep stepping past the settle point by restarting progress only
            e.progress = 0.0;
            e.step();
            let r = e.max_residual();
            assert!(r <= last);
            last = r;
        }
        assert!(last <= initial * 0.85_f32.powi(50) + 1e-3);
        assert!(last < 1e-3);
    }

    #[test]
    fn dirty_flag_tracks_steps() {
        let mut e = engine();
        assert!(e.take_dirty());
        assert!(!e.take_dirty());
        e.step();
        assert!(!e.take_dirty(), "settled step must not dirty the buffer");
        e.apply_template(&HEART);
        e.step();
        assert!(e.take_dirty());
    }

    #[test]
    fn custom_count() {
        let tuning = MorphTuning { count: 10, ..MorphTuning::default() };
        let e = MorphEngine::new(tuning, &SPHERE, StdRng::seed_from_u64(0));
        assert_eq!(e.positions().len(), 30);
        assert_eq!(e.count(), 10);
    }
}
