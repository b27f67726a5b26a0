//! # particle_morph
//!
//! A fixed-size particle cloud that morphs between shape templates.
//!
//! * [`template`] — the five target shapes and the circular [`TemplateCatalog`].
//! * [`morph`] — the [`MorphEngine`] owning the current/target position buffers.
//!
//! ```rust
//! use particle_morph::{MorphEngine, MorphTuning, TemplateCatalog};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut catalog = TemplateCatalog::standard();
//! let mut engine  = MorphEngine::new(MorphTuning::default(), catalog.current(), StdRng::seed_from_u64(1));
//!
//! engine.apply_template(catalog.advance());
//! while !engine.is_settled() { engine.step(); }
//! assert!(engine.max_residual() < 0.1);
//! ```

pub mod template;
pub mod morph;

pub use template::{Point3, Shape, Template, TemplateCatalog};
pub use morph::{MorphEngine, MorphTuning};
