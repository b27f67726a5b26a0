//! Hand landmark data model.
//!
//! A tracked hand is an ordered list of 21 points in the usual hand-tracking
//! layout: the wrist, then four joints per finger from thumb to pinky.
//! `x`/`y` are normalised image coordinates; `z` is depth relative to the
//! wrist plane, more negative meaning closer to the camera.  Detectors do not
//! always report `z`, so it is optional and reads as `0.0` when absent.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Semantic indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP:   usize = 16;
pub const PINKY_TIP:  usize = 20;

/// Number of landmarks in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

/// Skeletal connections between landmark indices, used for overlay drawing.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    // thumb
    (0, 1), (1, 2), (2, 3), (3, 4),
    // index
    (0, 5), (5, 6), (6, 7), (7, 8),
    // middle
    (5, 9), (9, 10), (10, 11), (11, 12),
    // ring
    (9, 13), (13, 14), (14, 15), (15, 16),
    // pinky
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One detector-reported point on a hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z: Some(z) }
    }

    /// A point with no depth information.
    pub fn flat(x: f32, y: f32) -> Self {
        Landmark { x, y, z: None }
    }

    /// Depth, defaulting to `0.0` when the detector didn't report one.
    pub fn z(&self) -> f32 { self.z.unwrap_or(0.0) }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// The ordered landmark set of a single hand.
///
/// Nominally [`LANDMARK_COUNT`] points; shorter sets are accepted and any
/// index past the end reads as absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks {
    points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        HandLandmarks { points }
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> { self.points.get(index) }
    pub fn points(&self) -> &[Landmark] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn wrist(&self)      -> Option<&Landmark> { self.get(WRIST) }
    pub fn thumb_tip(&self)  -> Option<&Landmark> { self.get(THUMB_TIP) }
    pub fn index_tip(&self)  -> Option<&Landmark> { self.get(INDEX_TIP) }
    pub fn middle_tip(&self) -> Option<&Landmark> { self.get(MIDDLE_TIP) }
}

impl From<Vec<Landmark>> for HandLandmarks {
    fn from(points: Vec<Landmark>) -> Self { HandLandmarks::new(points) }
}

/// What a landmark source delivers per processed camera frame:
/// one hand, or `None` when no hand is visible.
pub type HandFrame = Option<HandLandmarks>;

// ════════════════════════════════════════════════════════════════════════════
// Numeric helpers
// ════════════════════════════════════════════════════════════════════════════

/// Euclidean distance between two landmarks, `0.0` if either is absent.
pub fn dist(a: Option<&Landmark>, b: Option<&Landmark>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            let dz = a.z() - b.z();
            (dx * dx + dy * dy + dz * dz).sqrt()
        }
        _ => 0.0,
    }
}

/// Clamp into `[0, 1]`.  NaN maps to `0.0`.
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { return 0.0; }
    v.clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
