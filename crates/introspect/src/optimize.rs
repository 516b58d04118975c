//! The activation-maximization loop.
//!
//! Each iteration evaluates the composite loss and its gradient with respect
//! to the observation (the model's parameters never change), records the best
//! target loss, steps the observation against the normalized gradient and
//! decays the step size. Every `snapshot_every` iterations the observation is
//! passed through [`to_image`] and handed to a [`Visualizer`].

use ml::{ImageEnv, MlError, Tape, Tensor, ValueModel};

use crate::codec::to_image;
use crate::loss::{image_penalty, normalize_gradient, GradientNorm};
use crate::visualize::Visualizer;
use crate::IntrospectError;

/// Where the optimization starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialObservation {
    /// The environment's reset observation.
    #[default]
    Reset,
    /// Uniform noise in `[0, 1)` with the environment's observation shape.
    Random,
}

/// Configuration for the optimization loop.
#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    /// Number of iterations; there is no other stopping condition.
    pub iterations: usize,
    /// Step size of the first iteration.
    pub initial_step: f32,
    /// Multiplicative step decay applied after every iteration.
    pub step_decay: f32,
    /// Weight of the `[0, 1]` barrier penalty.
    pub penalty_weight: f32,
    /// Log losses every this many iterations.
    pub log_every: usize,
    /// Send a snapshot to the visualizer every this many iterations.
    pub snapshot_every: usize,
    /// Guard added to the gradient norm.
    pub epsilon: f32,
    pub gradient_norm: GradientNorm,
    pub start: InitialObservation,
    /// Seeds both the environment and the random start.
    pub seed: u64,
    /// Show the starting observation before the first iteration.
    pub snapshot_initial: bool,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            initial_step: 0.01,
            step_decay: 0.9999,
            penalty_weight: 0.01,
            log_every: 10,
            snapshot_every: 1000,
            epsilon: 1e-7,
            gradient_norm: GradientNorm::L2,
            start: InitialObservation::Reset,
            seed: 0,
            snapshot_initial: true,
        }
    }
}

impl OptimizeConfig {
    pub fn validate(&self) -> Result<(), IntrospectError> {
        let invalid = |msg: &str| -> Result<(), IntrospectError> {
            Err(IntrospectError::InvalidConfig(msg.to_string()))
        };
        if self.iterations == 0 {
            return invalid("iterations must be positive");
        }
        if self.log_every == 0 || self.snapshot_every == 0 {
            return invalid("log and snapshot intervals must be positive");
        }
        if self.initial_step <= 0.0 || !self.initial_step.is_finite() {
            return invalid("initial_step must be a positive finite number");
        }
        if self.step_decay.is_nan() || self.step_decay <= 0.0 || self.step_decay >= 1.0 {
            return invalid("step_decay must lie in (0, 1)");
        }
        if self.penalty_weight < 0.0 || !self.penalty_weight.is_finite() {
            return invalid("penalty_weight must be non-negative");
        }
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return invalid("epsilon must be positive");
        }
        Ok(())
    }
}

/// Seeds `env` and produces the starting observation selected by `config.start`.
pub fn initial_observation<E: ImageEnv + ?Sized>(env: &mut E, config: &OptimizeConfig) -> Tensor {
    env.seed(config.seed);
    let reset = env.reset();
    match config.start {
        InitialObservation::Reset => reset,
        InitialObservation::Random => {
            let rng = fastrand::Rng::with_seed(config.seed);
            Tensor::random_uniform(env.observation_shape().to_vec(), &rng)
        }
    }
}

/// Losses and normalized gradient at one observation.
pub struct Evaluation {
    pub target_loss: f32,
    pub image_loss: f32,
    pub gradient: Tensor,
}

/// What one call to [`Optimizer::step`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepStats {
    pub iteration: usize,
    /// Negated value estimate before the update.
    pub target_loss: f32,
    pub image_loss: f32,
    /// Step size used for the update.
    pub step_size: f32,
    /// Lowest target loss seen so far, this iteration included.
    pub best_loss: f32,
}

#[derive(Clone, Debug)]
pub struct OptimizeReport {
    pub observation: Tensor,
    pub best_loss: f32,
    pub last: StepStats,
    pub iterations: usize,
}

pub struct Optimizer<M> {
    config: OptimizeConfig,
    model: M,
    observation: Tensor,
    step_size: f32,
    best_loss: Option<f32>,
    iteration: usize,
}

impl<M: ValueModel> Optimizer<M> {
    pub fn new(config: OptimizeConfig, model: M, observation: Tensor) -> Result<Self, IntrospectError> {
        config.validate()?;
        let step_size = config.initial_step;
        Ok(Self {
            config,
            model,
            observation,
            step_size,
            best_loss: None,
            iteration: 0,
        })
    }

    pub fn observation(&self) -> &Tensor {
        &self.observation
    }

    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    pub fn best_loss(&self) -> Option<f32> {
        self.best_loss
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Evaluates the losses and the normalized gradient of
    /// `-value + image_penalty` with respect to the current observation.
    ///
    /// The model's value may have any shape holding exactly one element.
    pub fn evaluate(&self) -> Result<Evaluation, IntrospectError> {
        let mut tape = Tape::new();
        let obs = tape.var(self.observation.clone());
        let value = self.model.value(&mut tape, obs)?;
        if tape.value(value).len() != 1 {
            return Err(MlError::NonScalarLoss(tape.shape(value).to_vec()).into());
        }
        let value = tape.reshape(value, vec![1])?;
        let target = tape.neg(value);
        let penalty = image_penalty(&mut tape, obs, self.config.penalty_weight);
        let total = tape.add(target, penalty)?;
        let grads = tape.backward(total)?;

        Ok(Evaluation {
            target_loss: tape.value(target).data[0],
            image_loss: tape.value(penalty).data[0],
            gradient: normalize_gradient(
                &grads.wrt(obs),
                self.config.epsilon,
                self.config.gradient_norm,
            ),
        })
    }

    /// Runs one iteration: evaluate, track the best loss, log, update the
    /// observation and decay the step size.
    pub fn step(&mut self) -> Result<StepStats, IntrospectError> {
        let eval = self.evaluate()?;
        let best = self
            .best_loss
            .map_or(eval.target_loss, |b| b.min(eval.target_loss));
        self.best_loss = Some(best);

        let stats = StepStats {
            iteration: self.iteration,
            target_loss: eval.target_loss,
            image_loss: eval.image_loss,
            step_size: self.step_size,
            best_loss: best,
        };
        if self.iteration % self.config.log_every == 0 {
            tracing::info!(
                "loss {}, image_loss {}, step {:.2}",
                stats.target_loss,
                stats.image_loss,
                stats.step_size
            );
            tracing::info!("best_loss {best:.3}");
        }

        for (o, g) in self.observation.data.iter_mut().zip(&eval.gradient.data) {
            *o -= g * self.step_size;
        }
        self.step_size *= self.config.step_decay;
        self.iteration += 1;
        Ok(stats)
    }

    /// Iterates until `config.iterations` steps have been taken in total.
    ///
    /// Snapshots are labelled with the number of updates applied so far.
    /// Visualizer failures are logged and otherwise ignored; model failures
    /// abort the run.
    pub fn run(&mut self, sink: &mut dyn Visualizer) -> Result<OptimizeReport, IntrospectError> {
        if self.config.snapshot_initial && self.iteration == 0 {
            self.snapshot(sink);
        }
        let mut last = None;
        while self.iteration < self.config.iterations {
            let stats = self.step()?;
            if stats.iteration % self.config.snapshot_every == 0 {
                self.snapshot(sink);
            }
            last = Some(stats);
        }
        let Some(last) = last else {
            return Err(IntrospectError::InvalidConfig(
                "iteration bound already reached".to_string(),
            ));
        };
        tracing::info!(
            iterations = self.iteration,
            best_loss = last.best_loss,
            "optimization finished"
        );
        Ok(OptimizeReport {
            observation: self.observation.clone(),
            best_loss: last.best_loss,
            last,
            iterations: self.iteration,
        })
    }

    fn snapshot(&self, sink: &mut dyn Visualizer) {
        let image = to_image(&self.observation);
        if let Err(e) = sink.show(self.iteration, &image) {
            tracing::warn!("visualization failed at iteration {}: {e}", self.iteration);
        }
    }
}
