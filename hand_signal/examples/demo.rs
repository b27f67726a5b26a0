//! Feed a short synthetic hand sequence through the extractor and debouncer.

use std::time::{Duration, Instant};

use hand_signal::{
    GestureExtractor, HandLandmarks, Landmark, OrientationDebouncer, DEFAULT_DWELL,
};

fn hand(spread: f32, fingertip_z: f32) -> HandLandmarks {
    let mut pts = vec![Landmark::new(0.5, 0.8, -0.2); 21];
    pts[4]  = Landmark::new(0.5 - spread * 0.3, 0.6, -0.2);
    pts[8]  = Landmark::new(0.5, 0.8 - spread * 0.5, fingertip_z);
    pts[12] = Landmark::new(0.55, 0.8 - spread * 0.55, fingertip_z);
    HandLandmarks::new(pts)
}

fn main() {
    let t0 = Instant::now();
    let mut ex = GestureExtractor::default();
    let mut deb = OrientationDebouncer::new(ex.orientation(), DEFAULT_DWELL, t0);

    println!("{:>6} {:>6} {:>6} {:>6} {:>5} {}", "ms", "pinch", "open", "depth", "side", "advance");
    for frame in 0..120u64 {
        let now = t0 + Duration::from_millis(frame * 33);
        let spread = (frame as f32 / 20.0).sin().abs();
        // turn the hand over every second; lose it for the last 30 frames
        let z = if (frame / 30) % 2 == 0 { -0.3 } else { 0.0 };
        let h = (frame < 90).then(|| hand(spread, z));
        ex.process(h.as_ref());
        let advance = deb.update(ex.orientation(), now);
        let s = ex.state();
        println!(
            "{:>6} {:>6.3} {:>6.3} {:>6.3} {:>5} {}",
            frame * 33, s.pinch, s.openness, s.depth, ex.orientation().as_str(),
            if advance { "◆" } else { "" }
        );
    }
}
