//! Gesture extraction — landmarks in, smoothed signals out.
//!
//! Each landmark frame either carries a hand, in which case the three signals
//! are recomputed from scratch, or carries nothing, in which case the previous
//! signals decay geometrically toward zero so visuals fade out instead of
//! snapping.

use serde::{Deserialize, Serialize};

use crate::landmark::{clamp01, dist, HandLandmarks};

// ════════════════════════════════════════════════════════════════════════════
// Orientation
// ════════════════════════════════════════════════════════════════════════════

/// Which side of the hand faces the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Palm,
    Back,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Palm => Orientation::Back,
            Orientation::Back => Orientation::Palm,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Palm => "palm",
            Orientation::Back => "back",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// The three continuous gesture signals, each always within `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    /// Thumb/index closeness.
    pub pinch:    f32,
    /// Finger extension away from the wrist.
    pub openness: f32,
    /// Wrist distance toward the camera.
    pub depth:    f32,
}

// ════════════════════════════════════════════════════════════════════════════
// ExtractorTuning
// ════════════════════════════════════════════════════════════════════════════

/// Gains and the no-hand retention factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorTuning {
    /// Per-frame multiplier applied to every signal while no hand is seen.
    pub retention:     f32,
    pub pinch_gain:    f32,
    pub openness_gain: f32,
    pub depth_gain:    f32,
}

impl Default for ExtractorTuning {
    fn default() -> Self {
        ExtractorTuning {
            retention:     0.9,
            pinch_gain:    5.0,
            openness_gain: 1.2,
            depth_gain:    2.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureExtractor
// ════════════════════════════════════════════════════════════════════════════

/// Sole writer of [`GestureState`] and the current [`Orientation`].
#[derive(Debug, Default)]
pub struct GestureExtractor {
    tuning:      ExtractorTuning,
    state:       GestureState,
    orientation: Orientation,
}

impl GestureExtractor {
    pub fn new(tuning: ExtractorTuning) -> Self {
        GestureExtractor {
            tuning,
            state:       GestureState::default(),
            orientation: Orientation::Palm,
        }
    }

    /// Fold one landmark frame into the state.
    pub fn process(&mut self, hand: Option<&HandLandmarks>) {
        match hand {
            None       => self.decay(),
            Some(hand) => self.measure(hand),
        }
    }

    pub fn state(&self)       -> &GestureState { &self.state }
    pub fn orientation(&self) -> Orientation   { self.orientation }
    pub fn tuning(&self)      -> &ExtractorTuning { &self.tuning }

    fn decay(&mut self) {
        let k = self.tuning.retention;
        self.state.pinch    = clamp01(self.state.pinch    * k);
        self.state.openness = clamp01(self.state.openness * k);
        self.state.depth    = clamp01(self.state.depth    * k);
    }

    fn measure(&mut self, hand: &HandLandmarks) {
        let t = &self.tuning;
        let wrist  = hand.wrist();
        let thumb  = hand.thumb_tip();
        let index  = hand.index_tip();
        let middle = hand.middle_tip();

        self.state.pinch = clamp01(1.0 - t.pinch_gain * dist(thumb, index));
        self.state.openness =
            clamp01(t.openness_gain * (dist(index, wrist) + dist(middle, wrist)));
        self.state.depth = clamp01(-t.depth_gain * wrist.map_or(0.0, |w| w.z()));

        self.orientation = match (wrist, index, middle) {
            (Some(w), Some(i), Some(m)) if (i.z() + m.z()) / 2.0 < w.z() => Orientation::Palm,
            _ => Orientation::Back,
        };
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, INDEX_TIP, MIDDLE_TIP, THUMB_TIP, WRIST};

    /// A 21-point hand with every point at the origin; callers override the
    /// semantic points they care about.
    fn hand_with(overrides: &[(usize, Landmark)]) -> HandLandmarks {
        let mut pts = vec![Landmark::new(0.0, 0.0, 0.0); 21];
        for &(i, p) in overrides { pts[i] = p; }
        HandLandmarks::new(pts)
    }

    fn in_unit(v: f32) -> bool { (0.0..=1.0).contains(&v) }

    #[test]
    fn touching_thumb_and_index_is_full_pinch() {
        let tip = Landmark::new(0.4, 0.4, -0.1);
        let hand = hand_with(&[(THUMB_TIP, tip), (INDEX_TIP, tip)]);
        let mut ex = GestureExtractor::default();
        ex.process(Some(&hand));
        assert_eq!(ex.state().pinch, 1.0);
    }

    #[test]
    fn wrist_half_unit_forward_is_full_depth() {
        let hand = HandLandmarks::new(vec![Landmark::new(0.5, 0.5, -0.5)]);
        let mut ex = GestureExtractor::new(ExtractorTuning::default());
        ex.process(Some(&hand));
        assert_eq!(ex.state().depth, 1.0);
    }

    #[test]
    fn wide_open_hand_saturates_openness() {
        let hand = hand_with(&[
            (WRIST,      Landmark::new(0.5, 0.9, 0.0)),
            (INDEX_TIP,  Landmark::new(0.5, 0.2, 0.0)),
            (MIDDLE_TIP, Landmark::new(0.6, 0.1, 0.0)),
        ]);
        let mut ex = GestureExtractor::default();
        ex.process(Some(&hand));
        assert_eq!(ex.state().openness, 1.0);
        // thumb at origin, index far away
        assert_eq!(ex.state().pinch, 0.0);
    }

    #[test]
    fn signals_stay_in_unit_range() {
        let mut ex = GestureExtractor::default();
        let coords = [-3.0_f32, -0.7, -0.1, 0.0, 0.2, 0.9, 4.0];
        for &a in &coords {
            for &b in &coords {
                let hand = hand_with(&[
                    (WRIST,      Landmark::new(a, b, a * b)),
                    (THUMB_TIP,  Landmark::new(b, a, -a)),
                    (INDEX_TIP,  Landmark::new(a * 0.5, b, b)),
                    (MIDDLE_TIP, Landmark::flat(b, b)),
                ]);
                ex.process(Some(&hand));
                let s = ex.state();
                assert!(in_unit(s.pinch) && in_unit(s.openness) && in_unit(s.depth), "{:?}", s);
            }
        }
    }

    #[test]
    fn no_hand_decays_geometrically() {
        let hand = hand_with(&[
            (WRIST,      Landmark::new(0.5, 0.9, -0.3)),
            (INDEX_TIP,  Landmark::new(0.5, 0.6, -0.35)),
            (MIDDLE_TIP, Landmark::new(0.55, 0.6, -0.35)),
            (THUMB_TIP,  Landmark::new(0.45, 0.62, -0.3)),
        ]);
        let mut ex = GestureExtractor::default();
        ex.process(Some(&hand));
        let before = *ex.state();
        assert!(before.pinch > 0.0 && before.openness > 0.0 && before.depth > 0.0);

        let n = 12;
        for _ in 0..n { ex.process(None); }
        let k = 0.9_f32.powi(n);
        let after = ex.state();
        assert!((after.pinch    - before.pinch    * k).abs() < 1e-5);
        assert!((after.openness - before.openness * k).abs() < 1e-5);
        assert!((after.depth    - before.depth    * k).abs() < 1e-5);

        for _ in 0..500 { ex.process(None); }
        assert!(ex.state().openness < 1e-6);
    }

    #[test]
    fn fingertips_nearer_than_wrist_is_palm() {
        let palm = hand_with(&[
            (WRIST,      Landmark::new(0.5, 0.9, 0.0)),
            (INDEX_TIP,  Landmark::new(0.5, 0.5, -0.2)),
            (MIDDLE_TIP, Landmark::new(0.5, 0.5, -0.1)),
        ]);
        let back = hand_with(&[
            (WRIST,      Landmark::new(0.5, 0.9, 0.0)),
            (INDEX_TIP,  Landmark::new(0.5, 0.5, 0.2)),
            (MIDDLE_TIP, Landmark::new(0.5, 0.5, 0.1)),
        ]);
        let mut ex = GestureExtractor::default();
        ex.process(Some(&back));
        assert_eq!(ex.orientation(), Orientation::Back);
        ex.process(Some(&palm));
        assert_eq!(ex.orientation(), Orientation::Palm);
    }

    #[test]
    fn orientation_survives_lost_hand() {
        let back = hand_with(&[(INDEX_TIP, Landmark::new(0.0, 0.0, 0.3))]);
        let mut ex = GestureExtractor::default();
        ex.process(Some(&back));
        ex.process(None);
        assert_eq!(ex.orientation(), Orientation::Back);
    }

    #[test]
    fn empty_hand_degrades_to_zero_signals() {
        let mut ex = GestureExtractor::default();
        ex.process(Some(&HandLandmarks::default()));
        // dist() of absent points is zero, so pinch reads as touching
        assert_eq!(ex.state().pinch, 1.0);
        assert_eq!(ex.state().openness, 0.0);
        assert_eq!(ex.state().depth, 0.0);
        assert_eq!(ex.orientation(), Orientation::Back);
    }
}
