//! # hand_signal
//!
//! Turns a stream of single-hand landmark frames into the continuous signals
//! that drive the particle visuals, plus a debounced palm/back flip.
//!
//! ## Signals
//!
//! | Signal | From | Range |
//! |---|---|---|
//! | `pinch` | thumb tip ↔ index tip distance, inverted | 0–1 |
//! | `openness` | index + middle tip distance from the wrist | 0–1 |
//! | `depth` | wrist `z`, negative = toward the camera | 0–1 |
//! | orientation | fingertip `z` vs wrist `z` | palm / back |
//!
//! When a frame carries no hand every signal decays by the retention factor
//! instead of dropping to zero.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_signal::{GestureExtractor, HandLandmarks, Landmark};
//!
//! let mut ex = GestureExtractor::default();
//! let hand = HandLandmarks::new(vec![Landmark::new(0.5, 0.5, -0.5)]);
//! ex.process(Some(&hand));
//! assert_eq!(ex.state().depth, 1.0);
//! ```

pub mod landmark;
pub mod extractor;
pub mod debounce;

pub use landmark::{
    clamp01, dist, HandFrame, HandLandmarks, Landmark, HAND_CONNECTIONS, LANDMARK_COUNT,
};
pub use extractor::{ExtractorTuning, GestureExtractor, GestureState, Orientation};
pub use debounce::{OrientationDebouncer, DEFAULT_DWELL};
