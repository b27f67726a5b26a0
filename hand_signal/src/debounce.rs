//! Orientation debouncing.
//!
//! Turns the per-frame palm/back label into a rate-limited "advance" edge.
//! Flips that arrive inside the dwell window are dropped, not queued: the
//! remembered orientation follows every frame, so a flicker that settles back
//! before the window expires never fires.

use std::time::{Duration, Instant};

use crate::extractor::Orientation;

/// Minimum interval between two advance events.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(1200);

#[derive(Clone, Debug)]
pub struct OrientationDebouncer {
    last:        Orientation,
    last_switch: Instant,
    dwell:       Duration,
}

impl OrientationDebouncer {
    /// `now` seeds the switch timestamp, so nothing can fire until `dwell`
    /// has passed since construction.
    pub fn new(initial: Orientation, dwell: Duration, now: Instant) -> Self {
        OrientationDebouncer { last: initial, last_switch: now, dwell }
    }

    /// Feed this frame's orientation.  Returns `true` when an advance fires.
    pub fn update(&mut self, orientation: Orientation, now: Instant) -> bool {
        let fire = orientation != self.last
            && now.saturating_duration_since(self.last_switch) > self.dwell;
        if fire {
            self.last_switch = now;
            tracing::debug!(
                target: "hand_signal::debounce",
                from = self.last.as_str(),
                to = orientation.as_str(),
                "orientation flip accepted"
            );
        }
        self.last = orientation;
        fire
    }

    pub fn last(&self)  -> Orientation { self.last }
    pub fn dwell(&self) -> Duration    { self.dwell }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use Orientation::{Back, Palm};

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn flip_inside_startup_window_is_ignored() {
        let t0 = Instant::now();
        let mut d = OrientationDebouncer::new(Palm, DEFAULT_DWELL, t0);
        assert!(!d.update(Back, t0 + ms(500)));
        // remembered orientation still follows the frame
        assert_eq!(d.last(), Back);
    }

    #[test]
    fn flip_after_dwell_fires_once() {
        let t0 = Instant::now();
        let mut d = OrientationDebouncer::new(Palm, DEFAULT_DWELL, t0);
        assert!(d.update(Back, t0 + ms(1300)));
        // same orientation on the next frame is not an edge
        assert!(!d.update(Back, t0 + ms(1316)));
    }

    #[test]
    fn exactly_dwell_is_not_enough() {
        let t0 = Instant::now();
        let mut d = OrientationDebouncer::new(Palm, DEFAULT_DWELL, t0);
        assert!(!d.update(Back, t0 + ms(1200)));
    }

    #[test]
    fn suppressed_flip_is_not_queued() {
        let t0 = Instant::now();
        let mut d = OrientationDebouncer::new(Palm, DEFAULT_DWELL, t0);
        assert!(!d.update(Back, t0 + ms(100)));
        // held steady past the window: no pending edge remains
        assert!(!d.update(Back, t0 + ms(2000)));
        // a genuine new flip fires
        assert!(d.update(Palm, t0 + ms(2100)));
    }

    #[test]
    fn rapid_flicker_never_fires_twice_within_dwell() {
        let t0 = Instant::now();
        let mut d = OrientationDebouncer::new(Palm, DEFAULT_DWELL, t0);
        let mut fired: Vec<Duration> = Vec::new();
        let mut o = Palm;
        // flip every 16 ms for ten seconds
        for step in 1..=625u64 {
            o = o.flipped();
            let at = ms(step * 16);
            if d.update(o, t0 + at) { fired.push(at); }
        }
        assert!(fired.len() >= 2);
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] > DEFAULT_DWELL);
        }
    }
}
