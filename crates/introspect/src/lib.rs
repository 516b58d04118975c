#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
//! # Value-function introspection
//!
//! Activation maximization for a trained value estimate: starting from an
//! observation, repeatedly step the *input* against the gradient of
//!
//! ```text
//! loss = -value(obs) + penalty_weight * sum(barrier(obs, 0, 1))
//! ```
//!
//! so the observation drifts towards whatever the model rates most highly
//! while the barrier keeps pixels near the displayable range.
//!
//! - [`codec`] turns any float tensor into a contrast-stretched byte image.
//! - [`loss`] holds the barrier penalty and gradient normalization.
//! - [`optimize`] owns the loop, its configuration and best-loss tracking.
//! - [`visualize`] provides the sinks snapshots are sent to.

pub mod codec;
mod error;
pub mod loss;
pub mod optimize;
pub mod visualize;

pub use codec::{to_image, ImageBytes};
pub use error::IntrospectError;
pub use ml::ValueModel;
pub use optimize::{
    initial_observation, InitialObservation, OptimizeConfig, OptimizeReport, Optimizer, StepStats,
};
pub use visualize::{NullVisualizer, PngVisualizer, RecordingVisualizer, Visualizer};
