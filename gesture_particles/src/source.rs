//! Landmark sources — where hand frames come from.
//!
//! The public interface is [`HandFrame`] delivered over a `mpsc` channel, one
//! message per processed camera frame.  The render loop doesn't know whether
//! frames come from the keyboard-driven simulated hand, a recording, or real
//! tracking hardware.

use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use hand_signal::{HandFrame, HandLandmarks};

use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for hw, sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayLandmarkSource — JSON-lines recording
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a recording at a fixed frame rate.
///
/// One frame per line: `null` for "no hand", otherwise an array of
/// `{"x":…, "y":…, "z":…}` objects (`z` optional).  Blank lines and lines
/// starting with `#` are skipped; malformed lines are logged and skipped.
pub struct ReplayLandmarkSource {
    frames:   Vec<HandFrame>,
    interval: Duration,
    looped:   bool,
}

impl ReplayLandmarkSource {
    pub fn new(frames: Vec<HandFrame>, interval: Duration, looped: bool) -> Self {
        ReplayLandmarkSource { frames, interval, looped }
    }

    pub fn open(path: &Path, interval: Duration, looped: bool) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)
            .map_err(|source| AppError::Replay { path: path.to_path_buf(), source })?;
        let frames = parse_replay(&text);
        tracing::info!(frames = frames.len(), "replay loaded from {}", path.display());
        Ok(ReplayLandmarkSource::new(frames, interval, looped))
    }

    pub fn frames(&self) -> &[HandFrame] { &self.frames }
}

/// Parse a JSON-lines recording.
pub fn parse_replay(text: &str) -> Vec<HandFrame> {
    let mut frames = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        match serde_json::from_str::<Option<HandLandmarks>>(line) {
            Ok(frame) => frames.push(frame),
            Err(e)    => tracing::warn!(line = n + 1, "skipping replay frame: {}", e),
        }
    }
    frames
}

impl LandmarkSource for ReplayLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        if self.frames.is_empty() { return; }
        loop {
            for frame in &self.frames {
                if tx.send(frame.clone()).is_err() { return; }
                thread::sleep(self.interval);
            }
            if !self.looped {
                tracing::info!("replay finished");
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// The first tracked hand is mapped onto the 21-point layout: landmark 0 is
/// the base of the middle metacarpal, and each digit contributes the starts
/// of its proximal, intermediate and distal bones followed by the tip.
/// Millimetres are normalised so that `x`/`y` land near `[0, 1]` over the
/// interaction box and `z` is negative toward the screen.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                tracing::error!("failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        tracing::info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let hand = frame.hands().next().map(|hand| {
                    let digits: Vec<_> = hand.digits().collect();
                    if digits.len() < 5 { return HandLandmarks::default(); }
                    let mut points = Vec::with_capacity(hand_signal::LANDMARK_COUNT);
                    let base = digits[2].metacarpal().prev_joint();
                    points.push(leap_point(base.x, base.y, base.z));
                    for d in &digits {
                        for j in [
                            d.proximal().prev_joint(),
                            d.intermediate().prev_joint(),
                            d.distal().prev_joint(),
                            d.distal().next_joint(),
                        ] {
                            points.push(leap_point(j.x, j.y, j.z));
                        }
                    }
                    HandLandmarks::new(points)
                });
                if tx.send(hand).is_err() { return; }
            }
        }
    }
}

/// Millimetres above the device → normalised landmark coordinates.
#[cfg(feature = "leap")]
fn leap_point(x: f32, y: f32, z: f32) -> hand_signal::Landmark {
    // Interaction box: ±200 mm around a point 200 mm above the device.
    const SPAN_MM:     f32 = 400.0;
    const CENTRE_Y_MM: f32 = 200.0;
    hand_signal::Landmark::new(
        0.5 + x / SPAN_MM,
        0.5 - (y - CENTRE_Y_MM) / SPAN_MM,
        z / SPAN_MM,
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r#"
# two frames with a hand, one without
[{"x":0.5,"y":0.8,"z":-0.1},{"x":0.4,"y":0.6}]
null

[{"x":0.5,"y":0.8}]
this is not json
"#;

    #[test]
    fn parse_skips_comments_blanks_and_garbage() {
        let frames = parse_replay(RECORDING);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].as_ref().map(|h| h.len()), Some(2));
        assert!(frames[1].is_none());
        assert_eq!(frames[2].as_ref().unwrap().get(0).unwrap().z, None);
    }

    #[test]
    fn replay_delivers_frames_in_order_then_hangs_up() {
        let source = ReplayLandmarkSource::new(parse_replay(RECORDING), Duration::ZERO, false);
        let rx = spawn_landmark_source(source);
        let got: Vec<HandFrame> = rx.iter().collect();
        assert_eq!(got, parse_replay(RECORDING));
    }

    #[test]
    fn looped_replay_repeats() {
        let source = ReplayLandmarkSource::new(vec![None, Some(HandLandmarks::default())], Duration::ZERO, true);
        let rx = spawn_landmark_source(source);
        let got: Vec<HandFrame> = rx.iter().take(5).collect();
        assert_eq!(got[4], None);
        assert_eq!(got[3], Some(HandLandmarks::default()));
    }

    #[test]
    fn missing_recording_is_an_error() {
        let err = ReplayLandmarkSource::open(
            Path::new("/definitely/not/here.jsonl"), Duration::ZERO, false,
        );
        assert!(matches!(err, Err(AppError::Replay { .. })));
    }
}
