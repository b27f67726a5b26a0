//! Visual state of the particle system, driven by the gesture signals.
//!
//! Everything here is what the rendering boundary consumes besides the
//! position buffer: uniform scale, color, point size and the spin angle.

use serde::{Deserialize, Serialize};

use hand_signal::GestureState;

use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// Rgb — linear color with `#rrggbb` (de)serialization
// ════════════════════════════════════════════════════════════════════════════

/// Color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn from_u24(hex: u32) -> Self {
        Rgb {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >>  8) & 0xFF) as f32 / 255.0,
            b: ( hex        & 0xFF) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::Color(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb::from_u24)
            .map_err(|_| AppError::Color(s.to_string()))
    }

    /// Per-channel linear mix.  `t` = 0 → `self`, `t` = 1 → `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Packed opaque `0xFFRRGGBB` for the framebuffer.
    pub fn to_argb(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        0xFF000000 | (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.to_argb() & 0x00FF_FFFF)
    }
}

impl TryFrom<String> for Rgb {
    type Error = AppError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Rgb::parse(&s) }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self { c.to_hex() }
}

// ════════════════════════════════════════════════════════════════════════════
// SceneTuning
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    /// Scale with a closed hand.
    pub base_scale:         f32,
    /// Extra scale at full openness.
    pub scale_gain:         f32,
    /// Fraction of the remaining scale gap closed per frame.
    pub scale_rate:         f32,
    pub base_point_size:    f32,
    pub point_size_gain:    f32,
    /// Point size before the first frame.
    pub initial_point_size: f32,
    /// Radians of Y rotation per frame.
    pub spin:               f32,
    /// Color with no pinch.
    pub calm_color:         Rgb,
    /// Color at full pinch.
    pub pinch_color:        Rgb,
}

impl Default for SceneTuning {
    fn default() -> Self {
        SceneTuning {
            base_scale:         0.6,
            scale_gain:         1.6,
            scale_rate:         0.08,
            base_point_size:    0.015,
            point_size_gain:    0.04,
            initial_point_size: 0.025,
            spin:               0.002,
            calm_color:         Rgb::from_u24(0x66CCFF),
            pinch_color:        Rgb::from_u24(0xFF66CC),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SceneState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub scale:      f32,
    pub color:      Rgb,
    pub point_size: f32,
    /// Accumulated rotation about the vertical axis, radians.
    pub rotation:   f32,
}

impl SceneState {
    pub fn new(tuning: &SceneTuning) -> Self {
        SceneState {
            scale:      1.0,
            color:      tuning.calm_color,
            point_size: tuning.initial_point_size,
            rotation:   0.0,
        }
    }

    /// Scale toward the openness target.
    pub fn ease_scale(&mut self, g: &GestureState, t: &SceneTuning) {
        let target = t.base_scale + t.scale_gain * g.openness;
        self.scale += (target - self.scale) * t.scale_rate;
    }

    /// Color from pinch, size from depth, plus one frame of spin.
    pub fn apply_signals(&mut self, g: &GestureState, t: &SceneTuning) {
        self.color      = t.calm_color.lerp(t.pinch_color, g.pinch);
        self.point_size = t.base_point_size + t.point_size_gain * g.depth;
        self.rotation  += t.spin;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(pinch: f32, openness: f32, depth: f32) -> GestureState {
        GestureState { pinch, openness, depth }
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!(Rgb::parse("#66ccff").unwrap(), Rgb::from_u24(0x66CCFF));
        assert_eq!(Rgb::parse("FF66CC").unwrap().to_argb(), 0xFFFF66CC);
        assert!(Rgb::parse("#abc").is_err());
        assert!(Rgb::parse("#gg0000").is_err());
    }

    #[test]
    fn hex_round_trip_through_string() {
        let c = Rgb::from_u24(0x00F2FF);
        assert_eq!(c.to_hex(), "#00f2ff");
        assert_eq!(Rgb::parse(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn lerp_endpoints() {
        let t = SceneTuning::default();
        assert_eq!(t.calm_color.lerp(t.pinch_color, 0.0), t.calm_color);
        assert_eq!(t.calm_color.lerp(t.pinch_color, 1.0).to_argb(), 0xFFFF66CC);
    }

    #[test]
    fn scale_eases_toward_openness_target() {
        let t = SceneTuning::default();
        let mut s = SceneState::new(&t);
        let g = gesture(0.0, 1.0, 0.0);
        s.ease_scale(&g, &t);
        // 1.0 + (2.2 - 1.0) * 0.08
        assert!((s.scale - 1.096).abs() < 1e-5);
        for _ in 0..400 { s.ease_scale(&g, &t); }
        assert!((s.scale - 2.2).abs() < 1e-4);
    }

    #[test]
    fn signals_map_to_color_and_size() {
        let t = SceneTuning::default();
        let mut s = SceneState::new(&t);
        assert_eq!(s.point_size, 0.025);
        s.apply_signals(&gesture(0.5, 0.0, 1.0), &t);
        assert!((s.point_size - 0.055).abs() < 1e-6);
        assert_eq!(s.color, t.calm_color.lerp(t.pinch_color, 0.5));
        assert!((s.rotation - 0.002).abs() < 1e-7);
    }
}
