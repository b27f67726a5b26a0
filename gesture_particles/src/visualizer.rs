//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────┐
//! │ HAND INSET   │                                                      │
//! │ 220×160      │                                                      │
//! └──────────────┘            particle cloud, perspective               │
//! │                           projected, one square per point           │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window also acts as the input device for the simulated hand: key
//! presses are forwarded as [`SimInput`]s.

use std::sync::mpsc::Sender;

use glam::{Mat4, Vec3};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use hand_signal::{HandLandmarks, HAND_CONNECTIONS};

use crate::app::FrameParams;
use crate::config::WindowConfig;
use crate::error::AppError;
use crate::sim::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:     u32   = 0xFF05060C;
const INSET_W:      usize = 220;
const INSET_H:      usize = 160;
const INSET_MARGIN: usize = 12;
const INSET_BG:     u32   = 0xFF10162A;
const BONE_COLOR:   u32   = 0xFF00F2FF;
const JOINT_COLOR:  u32   = 0xFFFFFFFF;
const JOINT_RADIUS: isize = 3;

// ════════════════════════════════════════════════════════════════════════════
// Projector — world points → screen pixels
// ════════════════════════════════════════════════════════════════════════════

/// Model-view-projection for one frame.
///
/// Point sizes are attenuated with view depth the same way a GPU point
/// sprite would be: `pixels = size · (height / 2) / depth`.
#[derive(Clone, Debug)]
pub struct Projector {
    model_view: Mat4,
    proj:       Mat4,
    near:       f32,
    width:      f32,
    height:     f32,
}

impl Projector {
    pub fn new(cam: &WindowConfig, width: usize, height: usize, scale: f32, rotation: f32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let proj = Mat4::perspective_rh_gl(cam.fov_deg.to_radians(), aspect, cam.near, cam.far);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, cam.camera_distance), Vec3::ZERO, Vec3::Y);
        let model = Mat4::from_rotation_y(rotation) * Mat4::from_scale(Vec3::splat(scale));
        Projector {
            model_view: view * model,
            proj,
            near:       cam.near,
            width:      width as f32,
            height:     height as f32,
        }
    }

    /// Screen `(x, y)` and pixel diameter, or `None` if clipped.
    pub fn project(&self, p: Vec3, size: f32) -> Option<(f32, f32, f32)> {
        let v = self.model_view.transform_point3(p);
        let depth = -v.z;
        if depth <= self.near { return None; }
        let clip = self.proj * v.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        if ndc.z.abs() > 1.0 { return None; }
        let sx = (ndc.x + 1.0) * 0.5 * self.width;
        let sy = (1.0 - ndc.y) * 0.5 * self.height;
        Some((sx, sy, size * self.height * 0.5 / depth))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:    Window,
    buf:       Vec<u32>,
    width:     usize,
    height:    usize,
    camera:    WindowConfig,
    sim_tx:    Sender<SimInput>,
}

impl Visualizer {
    pub fn new(cfg: &WindowConfig, sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            &cfg.title,
            cfg.width, cfg.height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf:    vec![BG_COLOR; cfg.width * cfg.height],
            width:  cfg.width,
            height: cfg.height,
            camera: cfg.clone(),
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard inputs and translate to SimInput events.
    /// Returns false on quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        // Keys that trigger on first press only
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        // Keys that repeat while held
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return false;
        }

        let send = |key: SimKey| { let _ = self.sim_tx.send(SimInput::KeyDown(key)); };
        if one_shot(Key::Space) || one_shot(Key::F) { send(SimKey::Flip); }
        if one_shot(Key::H)     { send(SimKey::ToggleHand); }
        if held(Key::Right)     { send(SimKey::OpenMore); }
        if held(Key::Left)      { send(SimKey::OpenLess); }
        if held(Key::Up)        { send(SimKey::Closer); }
        if held(Key::Down)      { send(SimKey::Farther); }
        if held(Key::Z)         { send(SimKey::PinchIn); }
        if held(Key::X)         { send(SimKey::PinchOut); }

        true
    }

    /// Show the current template and signals in the title bar.
    pub fn set_status(&mut self, status: &str) {
        self.window.set_title(&format!("{} | {}", self.camera.title, status));
    }

    /// Render one frame.
    pub fn render(&mut self, positions: &[f32], frame: &FrameParams, hand: Option<&HandLandmarks>) {
        self.fit_to_window();
        self.buf.fill(BG_COLOR);

        // ── Particles ─────────────────────────────────────────────────────
        let proj = Projector::new(&self.camera, self.width, self.height, frame.scale, frame.rotation);
        let color = frame.color.to_argb();
        for p in positions.chunks_exact(3) {
            if let Some((x, y, d)) = proj.project(Vec3::new(p[0], p[1], p[2]), frame.point_size) {
                let side = d.round().max(1.0) as isize;
                self.fill_square(x as isize - side / 2, y as isize - side / 2, side, color);
            }
        }

        // ── Hand inset ────────────────────────────────────────────────────
        if self.camera.show_hand_overlay {
            self.draw_hand_inset(hand);
        }

        if let Err(e) = self.window.update_with_buffer(&self.buf, self.width, self.height) {
            tracing::debug!("framebuffer update failed: {}", e);
        }
    }

    /// Follow window resizes; the projection picks up the new aspect.
    fn fit_to_window(&mut self) {
        let (w, h) = self.window.get_size();
        if w == 0 || h == 0 || (w, h) == (self.width, self.height) { return; }
        tracing::debug!(width = w, height = h, "window resized");
        self.width  = w;
        self.height = h;
        self.buf.resize(w * h, BG_COLOR);
    }

    // ── Hand inset ────────────────────────────────────────────────────────

    fn draw_hand_inset(&mut self, hand: Option<&HandLandmarks>) {
        let (x0, y0) = (INSET_MARGIN, INSET_MARGIN);
        self.fill_rect(x0, y0, INSET_W, INSET_H, INSET_BG);
        let Some(hand) = hand else { return };

        let to_px = |i: usize| {
            hand.get(i).map(|p| (
                x0 as isize + (p.x.clamp(0.0, 1.0) * (INSET_W - 1) as f32) as isize,
                y0 as isize + (p.y.clamp(0.0, 1.0) * (INSET_H - 1) as f32) as isize,
            ))
        };

        for &(a, b) in HAND_CONNECTIONS.iter() {
            if let (Some(pa), Some(pb)) = (to_px(a), to_px(b)) {
                self.draw_line(pa, pb, BONE_COLOR);
            }
        }
        for i in 0..hand.len() {
            if let Some((x, y)) = to_px(i) {
                self.fill_disc(x, y, JOINT_RADIUS, JOINT_COLOR);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn fill_square(&mut self, x: isize, y: isize, side: isize, color: u32) {
        for dy in 0..side {
            for dx in 0..side {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    fn fill_disc(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Two-pixel-wide Bresenham line.
    fn draw_line(&mut self, (x0, y0): (isize, isize), (x1, y1): (isize, isize), color: u32) {
        let dx =  (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            self.set_pixel(x + 1, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
