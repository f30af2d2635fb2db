//! Criterion benchmarks for the single-step discretisation kernels.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_models::models::heston::HestonParams;
use pricer_models::models::schemes::{
    HestonStepper, PathState, PathStepper, QeParams, SchemeKind, StepDraws,
};

fn bench_single_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_step");
    let params = HestonParams::default();
    let draws = StepDraws {
        z_v: 0.3,
        z_perp: -0.8,
        u_v: 0.6,
    };

    for scheme in [SchemeKind::Milstein, SchemeKind::QuadraticExponential] {
        let stepper = HestonStepper::new(scheme, &params, 1e-5, QeParams::default());
        group.bench_function(BenchmarkId::new("step", scheme.as_str()), |b| {
            let state = PathState::initial(&params);
            b.iter(|| black_box(stepper.step(black_box(state), black_box(&draws))))
        });
    }

    group.finish();
}

fn bench_step_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_chain");
    let params = HestonParams::default();

    // High vol-of-vol pushes QE into the exponential branch more often.
    let wild = HestonParams {
        xi: 1.5,
        ..params
    };

    for (label, p) in [("reference", params), ("high_xi", wild)] {
        let stepper = HestonStepper::new(SchemeKind::QuadraticExponential, &p, 1e-3, QeParams::default());
        group.bench_with_input(BenchmarkId::new("qe_2000_steps", label), &p, |b, p| {
            b.iter(|| {
                let mut state = PathState::initial(p);
                for i in 0..2_000 {
                    let x = (i as f64 * 0.618).fract();
                    let draws = StepDraws {
                        z_v: x - 0.5,
                        z_perp: 0.5 - x,
                        u_v: x.max(1e-6),
                    };
                    state = stepper.step(state, &draws);
                }
                black_box(state)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_step, bench_step_chain);
criterion_main!(benches);
