//! # gesture_particles
//!
//! A cloud of a few thousand points that a hand steers in real time.
//! Landmark frames from a hand detector are reduced to three smoothed
//! signals by [`hand_signal`]; the cloud morphs between the shapes of
//! [`particle_morph`].
//!
//! ## Gesture → Scene mapping
//!
//! | Gesture | Signal | Effect |
//! |---|---|---|
//! | Thumb tip to index tip | pinch | Color blends `#66ccff` → `#ff66cc` |
//! | Fingers spread from wrist | openness | Cloud scale eases toward `0.6 + 1.6·openness` |
//! | Hand toward the camera | depth | Point size `0.015 + 0.04·depth` |
//! | Turn the hand over | orientation | Morph to the next template (at most every 1.2 s) |
//!
//! With no hand in view the signals fade out and the cloud settles back to
//! its resting size and color.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard shortcuts pose a synthetic hand.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! Recorded sessions (`--replay file.jsonl`) work in either mode.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Gesture |
//! |---|---|
//! | `→` / `←` hold | Spread / close the fingers |
//! | `↑` / `↓` hold | Move the hand closer / farther |
//! | `Z` / `X` hold | Pinch in / release |
//! | `Space` or `F` | Turn the hand over |
//! | `H` | Hide / show the hand |
//! | `Q` or `Escape` | Quit |

pub mod error;
pub mod config;
pub mod scene;
pub mod source;
pub mod sim;
pub mod visualizer;
pub mod app;
