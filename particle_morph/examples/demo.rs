//! Walk the catalog once, printing how far each morph gets before it settles.

use particle_morph::{MorphEngine, MorphTuning, TemplateCatalog};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let mut catalog = TemplateCatalog::standard();
    let mut engine = MorphEngine::new(
        MorphTuning::default(),
        catalog.current(),
        StdRng::seed_from_u64(2024),
    );

    println!("  start: {}", catalog.current().name());
    for _ in 0..catalog.len() {
        let from = catalog.current().name();
        let to = *catalog.advance();
        engine.apply_template(&to);
        let start = engine.max_residual();
        let mut frames = 0;
        while !engine.is_settled() {
            engine.step();
            frames += 1;
        }
        println!(
            "  {:>8} → {:<8}  {:>2} frames  residual {:.4} → {:.4}",
            from, to.name(), frames, start, engine.max_residual()
        );
    }
}
