use criterion::{criterion_group, criterion_main, Criterion};
use introspect::{OptimizeConfig, Optimizer};
use ml::{GridEnv, ImageEnv, PolicyValueNet};

fn bench_optimizer_step(c: &mut Criterion) {
    let mut env = GridEnv::new(10, 10);
    env.seed(0);
    let obs = env.reset();
    let net = PolicyValueNet::random(env.observation_shape(), 64, 4, 0);
    let config = OptimizeConfig {
        log_every: usize::MAX,
        ..OptimizeConfig::default()
    };
    let mut opt = Optimizer::new(config, net, obs).expect("valid config");

    c.bench_function("optimizer_step_grid10", |b| {
        b.iter(|| opt.step().expect("step"));
    });
}

criterion_group!(benches, bench_optimizer_step);
criterion_main!(benches);
