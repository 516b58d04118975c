//! Wires the environment, the network and the optimizer together.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use introspect::loss::GradientNorm;
use introspect::{
    initial_observation, InitialObservation, NullVisualizer, OptimizeConfig, OptimizeReport,
    Optimizer, PngVisualizer, Visualizer,
};
use ml::checkpoint::{checkpoint_path, experiment_name};
use ml::grid::{make_env, GRID_ENV_ID};
use ml::{ImageEnv, PolicyValueNet};

const HIDDEN_DIM: usize = 64;
const ACTIONS: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "actmax", about = "Optimize an observation to maximize a value estimate")]
pub struct Args {
    /// Environment id
    #[arg(long, default_value = GRID_ENV_ID)]
    pub env: String,

    /// Experiment label; the checkpoint is `<checkpoint-dir>/<env>-<experiment>.json`
    #[arg(long, default_value = "a2c_v0")]
    pub experiment: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Start from a freshly initialised network with this seed and save it as the checkpoint;
    /// refuses to replace an existing checkpoint
    #[arg(long)]
    pub random_init: Option<u64>,

    #[arg(long, default_value_t = 100_000)]
    pub iterations: usize,

    #[arg(long, default_value_t = 0.01)]
    pub initial_step: f32,

    #[arg(long, default_value_t = 0.9999)]
    pub step_decay: f32,

    #[arg(long, default_value_t = 0.01)]
    pub penalty_weight: f32,

    #[arg(long, default_value_t = 10)]
    pub log_every: usize,

    #[arg(long, default_value_t = 1000)]
    pub snapshot_every: usize,

    /// Normalize the gradient by its root-mean-square instead of its L2 norm
    #[arg(long)]
    pub rms_norm: bool,

    /// Start from uniform noise instead of the environment's reset observation
    #[arg(long)]
    pub random_start: bool,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Directory for PNG snapshots; runs headless when absent
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Write the final observation as JSON
    #[arg(long)]
    pub save_observation: Option<PathBuf>,
}

impl Args {
    pub fn optimize_config(&self) -> OptimizeConfig {
        OptimizeConfig {
            iterations: self.iterations,
            initial_step: self.initial_step,
            step_decay: self.step_decay,
            penalty_weight: self.penalty_weight,
            log_every: self.log_every,
            snapshot_every: self.snapshot_every,
            gradient_norm: if self.rms_norm {
                GradientNorm::Rms
            } else {
                GradientNorm::L2
            },
            start: if self.random_start {
                InitialObservation::Random
            } else {
                InitialObservation::Reset
            },
            seed: self.seed,
            ..OptimizeConfig::default()
        }
    }
}

/// Runs one activation-maximization pass.
///
/// # Errors
///
/// Returns an error for an unknown environment, a missing or inconsistent
/// checkpoint, an invalid configuration or a model evaluation failure.
pub fn run(args: &Args) -> Result<OptimizeReport> {
    let mut env = make_env(&args.env)?;
    let name = experiment_name(&args.env, &args.experiment);
    let path = checkpoint_path(&args.checkpoint_dir, &name);

    let net = match args.random_init {
        Some(seed) => {
            if path.exists() {
                bail!(
                    "checkpoint {} already exists; pick another --experiment or remove it",
                    path.display()
                );
            }
            let net = PolicyValueNet::random(env.observation_shape(), HIDDEN_DIM, ACTIONS, seed);
            net.save(&path)
                .with_context(|| format!("saving checkpoint {}", path.display()))?;
            tracing::info!(experiment = %name, "initialised new network");
            net
        }
        None => PolicyValueNet::load(&path)
            .with_context(|| format!("loading checkpoint {}", path.display()))?,
    };

    let config = args.optimize_config();
    let observation = initial_observation(&mut env, &config);
    tracing::info!(
        env = %args.env,
        experiment = %name,
        shape = ?observation.shape,
        iterations = config.iterations,
        "starting optimization"
    );

    let mut sink: Box<dyn Visualizer> = match &args.out_dir {
        Some(dir) => Box::new(PngVisualizer::new(dir.clone())),
        None => Box::new(NullVisualizer),
    };
    let mut optimizer = Optimizer::new(config, net, observation)?;
    let report = optimizer.run(sink.as_mut())?;

    if let Some(out) = &args.save_observation {
        fs::write(out, serde_json::to_vec(&report.observation)?)
            .with_context(|| format!("writing observation {}", out.display()))?;
    }
    Ok(report)
}
