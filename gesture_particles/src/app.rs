//! Top-level application state and the render loop.
//!
//! `AppState` owns the gesture extractor, the orientation debouncer, the
//! template catalog, the morph engine and the scene parameters.  Landmark
//! frames are folded in as they arrive; `tick` advances everything by one
//! display frame and hands back what the renderer needs.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use hand_signal::{GestureExtractor, GestureState, HandFrame, HandLandmarks, OrientationDebouncer};
use particle_morph::{MorphEngine, TemplateCatalog};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::scene::{Rgb, SceneState, SceneTuning};
use crate::sim::{SimInput, SimLandmarkSource};
use crate::source::{spawn_landmark_source, ReplayLandmarkSource};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// FrameParams — per-tick output for the renderer
// ════════════════════════════════════════════════════════════════════════════

/// Everything besides the position buffer that one frame needs.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameParams {
    pub scale:           f32,
    pub color:           Rgb,
    pub point_size:      f32,
    pub rotation:        f32,
    /// The position buffer changed since the previous frame.
    pub positions_dirty: bool,
    pub template:        &'static str,
    /// A new template was applied this tick.
    pub switched:        bool,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── gesture side (written only by landmark frames) ──────────────────
    extractor: GestureExtractor,
    last_hand: Option<HandLandmarks>,

    // ── render side (written only by tick) ───────────────────────────────
    debouncer: OrientationDebouncer,
    catalog:   TemplateCatalog,
    morph:     MorphEngine,
    scene:     SceneState,
    tuning:    SceneTuning,

    frames_in: u64,
    ticks:     u64,
}

impl AppState {
    pub fn new(cfg: &AppConfig, now: Instant) -> Result<Self, AppError> {
        let mut catalog = TemplateCatalog::standard();
        if !catalog.select(&cfg.initial_template) {
            return Err(AppError::UnknownTemplate {
                name:  cfg.initial_template.clone(),
                known: catalog.names().join(", "),
            });
        }

        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let morph = MorphEngine::new(cfg.morph, catalog.current(), rng);
        let extractor = GestureExtractor::new(cfg.extractor);
        let debouncer = OrientationDebouncer::new(extractor.orientation(), cfg.debounce.dwell(), now);

        tracing::info!(
            template = catalog.current().name(),
            particles = morph.count(),
            "scene ready"
        );

        Ok(AppState {
            extractor,
            last_hand: None,
            debouncer,
            catalog,
            morph,
            scene: SceneState::new(&cfg.scene),
            tuning: cfg.scene.clone(),
            frames_in: 0,
            ticks: 0,
        })
    }

    // ── landmark frames ──────────────────────────────────────────────────

    /// Fold one detector frame into the gesture state.
    pub fn handle_frame(&mut self, frame: HandFrame) {
        self.extractor.process(frame.as_ref());
        self.last_hand = frame;
        self.frames_in += 1;
    }

    /// Drain every pending frame, oldest first.  Returns `false` once the
    /// source has hung up.
    pub fn drain_frames(&mut self, rx: &Receiver<HandFrame>) -> bool {
        loop {
            match rx.try_recv() {
                Ok(frame)                       => self.handle_frame(frame),
                Err(TryRecvError::Empty)        => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self, now: Instant) -> FrameParams {
        self.ticks += 1;
        let gesture = *self.extractor.state();

        self.scene.ease_scale(&gesture, &self.tuning);

        let switched = self.debouncer.update(self.extractor.orientation(), now);
        if switched {
            let next = *self.catalog.advance();
            self.morph.apply_template(&next);
            tracing::info!(
                template = next.name(),
                index = self.catalog.index(),
                facing = self.extractor.orientation().as_str(),
                "template switch"
            );
        }

        if !self.morph.is_settled() {
            self.morph.step();
        }

        self.scene.apply_signals(&gesture, &self.tuning);

        FrameParams {
            scale:           self.scene.scale,
            color:           self.scene.color,
            point_size:      self.scene.point_size,
            rotation:        self.scene.rotation,
            positions_dirty: self.morph.take_dirty(),
            template:        self.catalog.current().name(),
            switched,
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn positions(&self) -> &[f32]                  { self.morph.positions() }
    pub fn gesture(&self)   -> &GestureState           { self.extractor.state() }
    pub fn hand(&self)      -> Option<&HandLandmarks>  { self.last_hand.as_ref() }
    pub fn morph(&self)     -> &MorphEngine            { &self.morph }
    pub fn catalog(&self)   -> &TemplateCatalog        { &self.catalog }
    pub fn scene(&self)     -> &SceneState             { &self.scene }
    pub fn frames_in(&self) -> u64                     { self.frames_in }
    pub fn ticks(&self)     -> u64                     { self.ticks }

    pub fn status(&self) -> String {
        let g = self.gesture();
        format!(
            "{}  [{}]  pinch {:.2}  open {:.2}  depth {:.2}",
            self.catalog.current().name(),
            self.extractor.orientation().as_str(),
            g.pinch, g.openness, g.depth,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Where hand frames come from.
#[derive(Clone, Debug)]
pub enum SourceKind {
    /// Keyboard-driven simulated hand.
    Simulated,
    /// JSON-lines recording.
    Replay(PathBuf),
    /// LeapMotion controller.
    #[cfg(feature = "leap")]
    Leap,
}

/// Run the full application.
///
/// Creates the window, the landmark source and the app state, then drives the
/// drain → tick → render loop at the window's refresh rate until the window
/// closes or the user quits.
pub fn run(cfg: AppConfig, source: SourceKind) -> Result<(), AppError> {
    // ── Sim input channel (the window forwards keys into it) ─────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    let frames_rx = match source {
        SourceKind::Simulated => spawn_landmark_source(SimLandmarkSource {
            rx:       sim_rx,
            interval: cfg.source.interval(),
        }),
        SourceKind::Replay(path) => spawn_landmark_source(ReplayLandmarkSource::open(
            &path,
            cfg.source.interval(),
            cfg.source.loop_replay,
        )?),
        #[cfg(feature = "leap")]
        SourceKind::Leap => spawn_landmark_source(crate::source::LeapLandmarkSource),
    };

    let mut vis = Visualizer::new(&cfg.window, sim_tx)?;
    let mut app = AppState::new(&cfg, Instant::now())?;
    let mut source_open = true;

    while vis.is_open() {
        if !vis.poll_input() { break; }

        if source_open && !app.drain_frames(&frames_rx) {
            tracing::info!(frames = app.frames_in(), "landmark source closed");
            source_open = false;
        }

        let frame = app.tick(Instant::now());
        if frame.switched {
            vis.set_status(&app.status());
        }

        vis.render(app.positions(), &frame, app.hand());
    }

    tracing::info!(ticks = app.ticks(), frames = app.frames_in(), "window closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
