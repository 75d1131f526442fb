use plotkit_core::{Canvas, Params, PathGeometry, PipelineError};
use plotkit_designer::{Generator, StepContext};
use proptest::prelude::*;

fn ctx(seed: u64) -> StepContext {
    StepContext::new(Canvas::new(120.0, 90.0, 5.0), seed)
}

/// Parameters small enough to keep every generator quick.
fn light_params(generator: Generator) -> Params {
    match generator {
        Generator::Flowfield => Params::new().with("count", 20).with("steps", 20),
        Generator::Phyllotaxis => Params::new().with("count", 50),
        Generator::Hilbert => Params::new().with("order", 3),
        Generator::Gyroid => Params::new().with("resolution", 4.0),
        _ => Params::new(),
    }
}

#[test]
fn test_every_generator_produces_finite_geometry() {
    for generator in Generator::all() {
        let model = generator
            .generate(&light_params(*generator), &ctx(7))
            .unwrap_or_else(|e| panic!("{}: {e}", generator.name()));
        assert!(model.total_path_count() > 0, "{} is empty", generator.name());
        assert!(model.is_finite(), "{} is not finite", generator.name());
    }
}

#[test]
fn test_generators_stay_on_canvas() {
    let canvas = Canvas::new(120.0, 90.0, 5.0);
    let page = canvas.bounds();
    for generator in [
        Generator::Stripes,
        Generator::Grid,
        Generator::Hilbert,
        Generator::Isometric,
        Generator::Flowfield,
    ] {
        let model = generator.generate(&light_params(generator), &ctx(3)).unwrap();
        for abs in model.absolute_paths() {
            let b = abs.path.bounds();
            assert!(
                b.min.x >= page.min.x - 1e-6
                    && b.min.y >= page.min.y - 1e-6
                    && b.max.x <= page.max.x + 1e-6
                    && b.max.y <= page.max.y + 1e-6,
                "{} leaves the page",
                generator.name()
            );
        }
    }
}

#[test]
fn test_hilbert_path_count() {
    for order in 1..=4u32 {
        let model = Generator::Hilbert
            .generate(&Params::new().with("order", order as f64), &ctx(0))
            .unwrap();
        assert_eq!(model.path_count(), 4usize.pow(order) - 1);
    }
}

#[test]
fn test_grid_cells() {
    let model = Generator::Grid
        .generate(&Params::new().with("cols", 3).with("rows", 2), &ctx(0))
        .unwrap();
    assert_eq!(model.model_count(), 6);
    assert!(model.model("cell_1_2").is_some());
    assert!(model.models().all(|(_, cell)| cell.path_count() == 4));
}

#[test]
fn test_degenerate_parameters_are_rejected() {
    let cases = [
        (Generator::Stripes, Params::new().with("spacing", 0.0)),
        (Generator::Hilbert, Params::new().with("order", 12)),
        (Generator::Concentric, Params::new().with("count", 0)),
        (Generator::Superformula, Params::new().with("n1", 0.0)),
        (Generator::Waves, Params::new().with("wavelength", -3.0)),
    ];
    for (generator, params) in cases {
        let err = generator.generate(&params, &ctx(0)).unwrap_err();
        assert!(
            matches!(err, PipelineError::Parameter(_)),
            "{}: {err}",
            generator.name()
        );
    }
}

#[test]
fn test_line_families_reject_microscopic_spacing() {
    for generator in [Generator::Stripes, Generator::Isometric] {
        let params = Params::new().with("spacing", 1e-12);
        let err = generator.generate(&params, &ctx(0)).unwrap_err();
        assert!(
            matches!(err, PipelineError::Parameter(_)),
            "{}: {err}",
            generator.name()
        );
    }
}

#[test]
fn test_dense_stripes_stay_fast() {
    // 80mm of drawing height at 0.005mm is about 16k lines
    let model = Generator::Stripes
        .generate(&Params::new().with("spacing", 0.005), &ctx(0))
        .unwrap();
    assert!(model.path_count() > 15_000);
    assert!(model.path("stripe_0").is_some());
}

#[test]
fn test_concentric_circles_grow_by_spacing() {
    let model = Generator::Concentric
        .generate(&Params::new().with("count", 3).with("spacing", 4.0), &ctx(0))
        .unwrap();
    let lengths: Vec<f64> = model.paths().map(|(_, p)| p.length()).collect();
    assert_eq!(lengths.len(), 3);
    assert!(lengths.windows(2).all(|w| w[1] > w[0]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_generators_are_deterministic(seed in any::<u64>(), pick in 0usize..13) {
        let generator = Generator::all()[pick];
        let params = light_params(generator);
        let a = generator.generate(&params, &ctx(seed)).unwrap();
        let b = generator.generate(&params, &ctx(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}
