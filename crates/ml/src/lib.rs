#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]
//! # ML building blocks
//!
//! Tensors, a reverse-mode [`tape::Tape`], dense layers and the actor-critic
//! [`nn::PolicyValueNet`], plus the environment trait and grid world used to
//! produce observations.
//!
//! Every operation on the tape is evaluated eagerly; differentiating with
//! respect to an input is just a matter of recording that input with
//! [`tape::Tape::var`] and asking [`tape::Gradients::wrt`] for it after the
//! backward pass.

pub mod checkpoint;
pub mod env;
mod error;
pub mod grid;
pub mod nn;
pub mod tape;
mod tensor;

pub use env::ImageEnv;
pub use error::MlError;
pub use grid::GridEnv;
pub use nn::{Dense, PolicyValueNet, ValueModel};
pub use tape::{Gradients, Tape, Var};
pub use tensor::Tensor;
