//! Shape templates — where the i-th of `total` particles should sit.
//!
//! Most templates are pure functions of `(i, total)`.  The firework scatter
//! ignores both and samples a fresh random point on every call, so each
//! template carries a [`Shape`] tag saying which kind of generator it is.

use std::f64::consts::PI;

use rand::{Rng, RngCore};

/// A particle position.
pub type Point3 = [f32; 3];

// ════════════════════════════════════════════════════════════════════════════
// Shape / Template
// ════════════════════════════════════════════════════════════════════════════

/// Generator kind of a template.
#[derive(Clone, Copy)]
pub enum Shape {
    /// Deterministic: the point for index `i` out of `total`.
    Indexed(fn(usize, usize) -> Point3),
    /// Stochastic: one independent sample per call.
    Scatter(fn(&mut dyn RngCore) -> Point3),
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Indexed(_) => f.write_str("Indexed"),
            Shape::Scatter(_) => f.write_str("Scatter"),
        }
    }
}

/// A named shape.
#[derive(Clone, Copy, Debug)]
pub struct Template {
    name:  &'static str,
    shape: Shape,
}

impl Template {
    pub const fn indexed(name: &'static str, f: fn(usize, usize) -> Point3) -> Self {
        Template { name, shape: Shape::Indexed(f) }
    }

    pub const fn scatter(name: &'static str, f: fn(&mut dyn RngCore) -> Point3) -> Self {
        Template { name, shape: Shape::Scatter(f) }
    }

    pub fn name(&self)  -> &'static str { self.name }
    pub fn shape(&self) -> Shape        { self.shape }

    pub fn is_stochastic(&self) -> bool { matches!(self.shape, Shape::Scatter(_)) }

    /// Target point for particle `i` of `total`.
    pub fn point(&self, i: usize, total: usize, rng: &mut dyn RngCore) -> Point3 {
        match self.shape {
            Shape::Indexed(f) => f(i, total),
            Shape::Scatter(f) => f(rng),
        }
    }
}

pub const SPHERE:   Template = Template::indexed("sphere", sphere);
pub const HEART:    Template = Template::indexed("heart", heart);
pub const FLOWER:   Template = Template::indexed("flower", flower);
pub const SATURN:   Template = Template::indexed("saturn", saturn);
pub const FIREWORK: Template = Template::scatter("firework", firework);

/// Radius of the saturn ring.
pub const RING_RADIUS: f32 = 1.4;
/// Edge length of the firework cube.
pub const FIREWORK_SPAN: f32 = 3.0;

// ════════════════════════════════════════════════════════════════════════════
// Generators
// ════════════════════════════════════════════════════════════════════════════

/// Fraction of a full turn, as an angle.
fn turn(i: usize, total: usize) -> f64 {
    i as f64 / total.max(1) as f64 * 2.0 * PI
}

/// Fibonacci lattice on the unit sphere.
pub fn sphere(i: usize, total: usize) -> Point3 {
    let phi   = (1.0 - 2.0 * (i as f64 / total.max(1) as f64)).clamp(-1.0, 1.0).acos();
    let theta = PI * (1.0 + 5f64.sqrt()) * i as f64;
    [
        (theta.cos() * phi.sin()) as f32,
        (theta.sin() * phi.sin()) as f32,
        phi.cos() as f32,
    ]
}

/// Planar parametric heart.
pub fn heart(i: usize, total: usize) -> Point3 {
    let t = turn(i, total);
    [
        (0.8 * t.sin().powi(3)) as f32,
        (0.6 * (t.cos() - 0.5 * (2.0 * t).cos() - 0.2 * (3.0 * t).cos())) as f32,
        0.0,
    ]
}

/// Five-petal polar rose.
pub fn flower(i: usize, total: usize) -> Point3 {
    let t = turn(i, total);
    let r = (5.0 * t).sin() * 0.7;
    [(t.cos() * r) as f32, (t.sin() * r) as f32, 0.0]
}

/// Even indices on a flat ring in the XZ plane, odd ones on the sphere.
pub fn saturn(i: usize, total: usize) -> Point3 {
    if i % 2 == 0 {
        let a = turn(i, total);
        let r = RING_RADIUS as f64;
        [(a.cos() * r) as f32, 0.0, (a.sin() * r) as f32]
    } else {
        sphere(i, total)
    }
}

/// Uniform sample in a cube of side [`FIREWORK_SPAN`] centred on the origin.
pub fn firework(rng: &mut dyn RngCore) -> Point3 {
    let mut axis = || (rng.gen::<f32>() - 0.5) * FIREWORK_SPAN;
    [axis(), axis(), axis()]
}

// ════════════════════════════════════════════════════════════════════════════
// TemplateCatalog
// ════════════════════════════════════════════════════════════════════════════

/// Fixed, ordered template list with a circular cursor.
#[derive(Clone, Debug)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
    cursor:    usize,
}

impl TemplateCatalog {
    /// Sphere, heart, flower, saturn, firework — cursor on the sphere.
    pub fn standard() -> Self {
        TemplateCatalog::new(vec![SPHERE, HEART, FLOWER, SATURN, FIREWORK])
    }

    /// Panics if `templates` is empty.
    pub fn new(templates: Vec<Template>) -> Self {
        assert!(!templates.is_empty(), "template catalog needs at least one template");
        TemplateCatalog { templates, cursor: 0 }
    }

    pub fn len(&self)     -> usize     { self.templates.len() }
    pub fn is_empty(&self) -> bool     { self.templates.is_empty() }
    pub fn index(&self)   -> usize     { self.cursor }
    pub fn current(&self) -> &Template { &self.templates[self.cursor] }
    pub fn templates(&self) -> &[Template] { &self.templates }

    /// Move the cursor to the next template, wrapping at the end.
    pub fn advance(&mut self) -> &Template {
        self.cursor = (self.cursor + 1) % self.templates.len();
        &self.templates[self.cursor]
    }

    /// Point the cursor at the template called `name`.
    /// Returns `false` (cursor unchanged) if there is none.
    pub fn select(&mut self, name: &str) -> bool {
        match self.templates.iter().position(|t| t.name.eq_ignore_ascii_case(name)) {
            Some(i) => { self.cursor = i; true }
            None    => false,
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.name).collect()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self { TemplateCatalog::standard() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn norm(p: Point3) -> f32 { (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt() }

    #[test]
    fn sphere_points_are_unit_length() {
        for i in [0, 1, 17, 2999, 5999] {
            assert!((norm(sphere(i, 6000)) - 1.0).abs() < 1e-5, "index {}", i);
        }
    }

    #[test]
    fn sphere_starts_at_north_pole() {
        let p = sphere(0, 6000);
        assert!((p[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn saturn_even_index_on_ring() {
        for i in (0..6000).step_by(2).take(200) {
            let p = saturn(i, 6000);
            assert_eq!(p[1], 0.0);
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((r - RING_RADIUS).abs() < 1e-5, "index {} radius {}", i, r);
        }
    }

    #[test]
    fn saturn_odd_index_matches_sphere() {
        for i in (1..6000).step_by(2).take(200) {
            assert_eq!(saturn(i, 6000), sphere(i, 6000));
        }
    }

    #[test]
    fn firework_stays_in_cube() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = FIREWORK.point(0, 0, &mut rng);
            for c in p {
                assert!(c.abs() <= FIREWORK_SPAN / 2.0, "{:?}", p);
            }
        }
    }

    #[test]
    fn firework_ignores_index() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = FIREWORK.point(3, 10, &mut rng);
        let b = FIREWORK.point(3, 10, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn planar_templates_have_zero_z() {
        let mut rng = StdRng::seed_from_u64(0);
        for t in [HEART, FLOWER] {
            for i in 0..100 {
                assert_eq!(t.point(i, 100, &mut rng)[2], 0.0);
            }
        }
    }

    #[test]
    fn flower_radius_bounded_by_petal_length() {
        for i in 0..1000 {
            let p = flower(i, 1000);
            assert!(norm(p) <= 0.7 + 1e-6);
        }
    }

    #[test]
    fn only_firework_is_stochastic() {
        let cat = TemplateCatalog::standard();
        let stochastic: Vec<_> = cat.templates().iter()
            .filter(|t| t.is_stochastic())
            .map(|t| t.name())
            .collect();
        assert_eq!(stochastic, vec!["firework"]);
    }

    #[test]
    fn catalog_cycles_circularly() {
        let mut cat = TemplateCatalog::standard();
        let start = cat.current().name();
        for _ in 0..cat.len() { cat.advance(); }
        assert_eq!(cat.current().name(), start);
        // one more lands on the second entry
        assert_eq!(cat.advance().name(), "heart");
        assert_eq!(cat.index(), 1);
    }

    #[test]
    fn catalog_order_is_fixed() {
        assert_eq!(
            TemplateCatalog::standard().names(),
            vec!["sphere", "heart", "flower", "saturn", "firework"]
        );
    }

    #[test]
    fn select_by_name() {
        let mut cat = TemplateCatalog::standard();
        assert!(cat.select("Saturn"));
        assert_eq!(cat.index(), 3);
        assert!(!cat.select("cube"));
        assert_eq!(cat.index(), 3);
    }
}
