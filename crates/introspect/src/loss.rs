//! Loss terms and gradient scaling for the optimization loop.

use ml::{Tape, Tensor, Var};

/// Barrier term keeping pixels inside `[0, 1]`.
///
/// Per pixel: `(x - 1)^2` above 1, `x^2` below 0, zero in between; summed and
/// scaled by `weight`.
pub fn image_penalty(tape: &mut Tape, x: Var, weight: f32) -> Var {
    let b = tape.barrier(x, 0.0, 1.0);
    let total = tape.reduce_sum(b);
    tape.scale(total, weight)
}

/// Evaluates [`image_penalty`] without recording anything.
pub fn image_penalty_value(x: &Tensor, weight: f32) -> f32 {
    let total: f32 = x
        .data
        .iter()
        .map(|&v| {
            if v > 1.0 {
                (v - 1.0).powi(2)
            } else if v < 0.0 {
                v.powi(2)
            } else {
                0.0
            }
        })
        .sum();
    weight * total
}

/// How the gradient is scaled before each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradientNorm {
    /// Divide by the Euclidean norm, giving a unit-length step direction.
    #[default]
    L2,
    /// Divide by the root-mean-square, giving unit average element magnitude.
    Rms,
}

/// Scales `g` by `1 / (norm(g) + eps)`.
///
/// An all-zero gradient stays all-zero.
pub fn normalize_gradient(g: &Tensor, eps: f32, norm: GradientNorm) -> Tensor {
    let n = match norm {
        GradientNorm::L2 => g.l2_norm(),
        GradientNorm::Rms if g.is_empty() => 0.0,
        GradientNorm::Rms => g.l2_norm() / (g.len() as f32).sqrt(),
    };
    let scale = 1.0 / (n + eps);
    Tensor::from_vec(g.shape.clone(), g.data.iter().map(|v| v * scale).collect())
}
