//! Keyboard-driven simulated hand.
//!
//! Stands in for a camera + landmark detector: the visualizer forwards key
//! presses as [`SimInput`]s, [`SimHand`] keeps a handful of pose parameters,
//! and [`SimLandmarkSource`] emits the synthesized 21-point hand at a fixed
//! camera-like frame rate.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use hand_signal::{HandFrame, HandLandmarks, Landmark, Orientation, LANDMARK_COUNT};

use crate::source::LandmarkSource;

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    OpenMore,    // Right
    OpenLess,    // Left
    Closer,      // Up
    Farther,     // Down
    PinchIn,     // Z
    PinchOut,    // X
    Flip,        // Space / F
    ToggleHand,  // H
}

// ════════════════════════════════════════════════════════════════════════════
// SimHand — pose parameters → landmarks
// ════════════════════════════════════════════════════════════════════════════

const WRIST_X:  f32 = 0.5;
const WRIST_Y:  f32 = 0.85;
/// Fingertip depth offset from the wrist; sign picks palm or back.
const TILT_Z:   f32 = 0.08;
/// Finger fan angles from vertical, radians, thumb → pinky.
const FAN:      [f32; 5] = [-0.9, -0.3, -0.05, 0.2, 0.45];
const STEP:     f32 = 0.04;

/// Pose of the simulated hand.
#[derive(Clone, Debug, PartialEq)]
pub struct SimHand {
    pub visible:   bool,
    /// Finger extension, 0 (fist) – 1 (spread).
    pub extension: f32,
    /// Thumb-tip to index-tip gap in normalised image units.
    pub pinch_gap: f32,
    /// Wrist depth; more negative is closer to the camera.
    pub wrist_z:   f32,
    pub facing:    Orientation,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand {
            visible:   true,
            extension: 0.5,
            pinch_gap: 0.2,
            wrist_z:   -0.1,
            facing:    Orientation::Palm,
        }
    }
}

impl SimHand {
    pub fn apply(&mut self, input: SimInput) {
        let SimInput::KeyDown(key) = input;
        match key {
            SimKey::OpenMore   => self.extension = (self.extension + STEP).min(1.0),
            SimKey::OpenLess   => self.extension = (self.extension - STEP).max(0.0),
            SimKey::Closer     => self.wrist_z   = (self.wrist_z - STEP / 2.0).max(-0.6),
            SimKey::Farther    => self.wrist_z   = (self.wrist_z + STEP / 2.0).min(0.1),
            SimKey::PinchIn    => self.pinch_gap = (self.pinch_gap - STEP / 2.0).max(0.0),
            SimKey::PinchOut   => self.pinch_gap = (self.pinch_gap + STEP / 2.0).min(0.3),
            SimKey::Flip       => self.facing    = self.facing.flipped(),
            SimKey::ToggleHand => self.visible   = !self.visible,
        }
    }

    /// The current pose as a detector frame.
    pub fn frame(&self) -> HandFrame {
        self.visible.then(|| self.landmarks())
    }

    /// Wrist plus four joints per finger, fanned upward from the wrist.
    pub fn landmarks(&self) -> HandLandmarks {
        let reach = 0.05 + 0.35 * self.extension;
        let tilt = match self.facing {
            Orientation::Palm => -TILT_Z,
            Orientation::Back =>  TILT_Z,
        };

        let mut pts = Vec::with_capacity(LANDMARK_COUNT);
        pts.push(Landmark::new(WRIST_X, WRIST_Y, self.wrist_z));
        for (f, angle) in FAN.iter().enumerate() {
            let len = if f == 0 { reach * 0.6 } else { reach };
            for j in 1..=4 {
                let s = j as f32 / 4.0;
                pts.push(Landmark::new(
                    WRIST_X + angle.sin() * len * s,
                    WRIST_Y - angle.cos() * len * s,
                    self.wrist_z + tilt * s,
                ));
            }
        }

        // Pull the thumb tip to sit `pinch_gap` left of the index tip.
        let index = pts[hand_signal::landmark::INDEX_TIP];
        pts[hand_signal::landmark::THUMB_TIP] =
            Landmark::new(index.x - self.pinch_gap, index.y, index.z());

        HandLandmarks::new(pts)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source driven by [`SimInput`] events from the visualizer's window.
pub struct SimLandmarkSource {
    pub rx:       Receiver<SimInput>,
    /// Time between emitted frames.
    pub interval: Duration,
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        let SimLandmarkSource { rx, interval } = *self;
        let mut hand = SimHand::default();
        let mut next = Instant::now() + interval;
        loop {
            let wait = next.saturating_duration_since(Instant::now());
            match rx.recv_timeout(wait) {
                Ok(input) => {
                    hand.apply(input);
                    continue;
                }
                Err(RecvTimeoutError::Timeout)      => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
            next += interval;
            if tx.send(hand.frame()).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_signal::GestureExtractor;
    use std::sync::mpsc;

    fn extract(hand: &SimHand) -> GestureExtractor {
        let mut ex = GestureExtractor::default();
        ex.process(hand.frame().as_ref());
        ex
    }

    #[test]
    fn synthesizes_full_hand() {
        assert_eq!(SimHand::default().landmarks().len(), LANDMARK_COUNT);
    }

    #[test]
    fn closed_gap_is_full_pinch() {
        let mut h = SimHand::default();
        for _ in 0..20 { h.apply(SimInput::KeyDown(SimKey::PinchIn)); }
        assert_eq!(h.pinch_gap, 0.0);
        assert_eq!(extract(&h).state().pinch, 1.0);
    }

    #[test]
    fn extension_raises_openness() {
        let mut h = SimHand::default();
        let before = extract(&h).state().openness;
        for _ in 0..5 { h.apply(SimInput::KeyDown(SimKey::OpenMore)); }
        assert!(extract(&h).state().openness > before);
    }

    #[test]
    fn leaning_in_raises_depth() {
        let mut h = SimHand::default();
        for _ in 0..50 { h.apply(SimInput::KeyDown(SimKey::Closer)); }
        assert_eq!(extract(&h).state().depth, 1.0);
    }

    #[test]
    fn flip_changes_detected_orientation() {
        let mut h = SimHand::default();
        assert_eq!(extract(&h).orientation(), Orientation::Palm);
        h.apply(SimInput::KeyDown(SimKey::Flip));
        assert_eq!(extract(&h).orientation(), Orientation::Back);
    }

    #[test]
    fn hidden_hand_sends_empty_frames() {
        let mut h = SimHand::default();
        h.apply(SimInput::KeyDown(SimKey::ToggleHand));
        assert_eq!(h.frame(), None);
    }

    #[test]
    fn source_applies_input_before_next_frame() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = crate::source::spawn_landmark_source(SimLandmarkSource {
            rx:       sim_rx,
            interval: Duration::from_millis(5),
        });
        sim_tx.send(SimInput::KeyDown(SimKey::ToggleHand)).unwrap();
        // frames already in flight may still show the hand; an empty one follows
        let saw_empty = rx.iter().take(50).any(|f| f.is_none());
        assert!(saw_empty);
        drop(sim_tx);
    }
}
