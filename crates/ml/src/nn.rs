use serde::{Deserialize, Serialize};

use crate::tape::{Tape, Var};
use crate::{MlError, Tensor};

/// A fully connected neural network layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dense {
    /// The weight matrix for the layer, `[out_dim, in_dim]`.
    pub w: Tensor,
    /// The bias vector for the layer.
    pub b: Tensor,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    ///
    /// # Panics
    ///
    /// Panics if the weight or bias length does not match the dimensions.
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_d: usize, out_d: usize) -> Self {
        assert_eq!(weights.len(), in_d * out_d);
        assert_eq!(bias.len(), out_d);
        Self {
            w: Tensor::from_vec(vec![out_d, in_d], weights),
            b: Tensor::from_vec(vec![out_d], bias),
        }
    }

    /// Glorot-uniform weights, zero bias.
    pub fn random(in_d: usize, out_d: usize, rng: &fastrand::Rng) -> Self {
        let limit = (6.0 / (in_d + out_d) as f32).sqrt();
        let weights = (0..in_d * out_d)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        Self::new(weights, vec![0.0; out_d], in_d, out_d)
    }

    pub fn in_dim(&self) -> usize {
        self.w.shape[1]
    }

    pub fn out_dim(&self) -> usize {
        self.w.shape[0]
    }

    /// Performs the forward pass through the layer for `x: [batch, in_dim]`.
    pub fn forward(&self, tape: &mut Tape, x: Var) -> Result<Var, MlError> {
        let w = tape.var(self.w.clone());
        let b = tape.var(self.b.clone());
        let wx = tape.matmul(w, x)?;
        tape.add_broadcast(wx, b)
    }

    fn check(&self) -> Result<(), MlError> {
        let (w, b) = (&self.w, &self.b);
        if w.shape.len() != 2 || w.len() != w.shape.iter().product::<usize>() {
            return Err(MlError::shape(&[w.len()], &w.shape));
        }
        if b.shape != [w.shape[0]] || b.len() != w.shape[0] {
            return Err(MlError::shape(&[w.shape[0]], &b.shape));
        }
        Ok(())
    }
}

/// Anything exposing a differentiable scalar value estimate of an observation.
///
/// Implementors record their forward pass on `tape` and return a
/// single-element value, so callers can differentiate any expression built on
/// top of it with respect to the observation.
pub trait ValueModel {
    fn value(&self, tape: &mut Tape, obs: Var) -> Result<Var, MlError>;
}

impl<F> ValueModel for F
where
    F: Fn(&mut Tape, Var) -> Result<Var, MlError>,
{
    fn value(&self, tape: &mut Tape, obs: Var) -> Result<Var, MlError> {
        self(tape, obs)
    }
}

/// Actor-critic network with a shared hidden layer over a flattened
/// `[height, width, channels]` observation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyValueNet {
    pub observation_shape: [usize; 3],
    pub hidden: Dense,
    pub policy_head: Dense,
    pub value_head: Dense,
}

impl PolicyValueNet {
    pub fn random(observation_shape: [usize; 3], hidden_dim: usize, actions: usize, seed: u64) -> Self {
        let rng = fastrand::Rng::with_seed(seed);
        let in_dim = observation_shape.iter().product();
        Self {
            observation_shape,
            hidden: Dense::random(in_dim, hidden_dim, &rng),
            policy_head: Dense::random(hidden_dim, actions, &rng),
            value_head: Dense::random(hidden_dim, 1, &rng),
        }
    }

    pub fn actions(&self) -> usize {
        self.policy_head.out_dim()
    }

    /// Checks that the layers chain together and match the observation size.
    pub fn validate(&self) -> Result<(), MlError> {
        self.hidden.check()?;
        self.policy_head.check()?;
        self.value_head.check()?;
        let in_dim: usize = self.observation_shape.iter().product();
        if self.hidden.in_dim() != in_dim {
            return Err(MlError::shape(&[in_dim], &[self.hidden.in_dim()]));
        }
        for head in [&self.policy_head, &self.value_head] {
            if head.in_dim() != self.hidden.out_dim() {
                return Err(MlError::shape(&[self.hidden.out_dim()], &[head.in_dim()]));
            }
        }
        if self.value_head.out_dim() != 1 {
            return Err(MlError::shape(&[1], &[self.value_head.out_dim()]));
        }
        Ok(())
    }

    /// Returns `(policy_logits, value)` for a single observation.
    ///
    /// `policy_logits` is `[1, actions]`, `value` has exactly one element.
    pub fn forward(&self, tape: &mut Tape, obs: Var) -> Result<(Var, Var), MlError> {
        if tape.shape(obs) != self.observation_shape {
            return Err(MlError::shape(&self.observation_shape, tape.shape(obs)));
        }
        let in_dim = tape.value(obs).len();
        let flat = tape.reshape(obs, vec![1, in_dim])?;
        let h = self.hidden.forward(tape, flat)?;
        let h = tape.tanh(h);
        let policy = self.policy_head.forward(tape, h)?;
        let value = self.value_head.forward(tape, h)?;
        let value = tape.reshape(value, vec![1])?;
        Ok((policy, value))
    }
}

impl ValueModel for PolicyValueNet {
    fn value(&self, tape: &mut Tape, obs: Var) -> Result<Var, MlError> {
        self.forward(tape, obs).map(|(_, value)| value)
    }
}
