use crate::{MlError, Tensor};

/// Handle to a value recorded on a [`Tape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Var(usize);

#[derive(Clone, Copy, Debug)]
enum EOp {
    Input,
    Add(Var, Var),
    Sub(Var, Var),
    Neg(Var),
    Scale(Var, f32),
    MatMul(Var, Var),
    AddBroadcast(Var, Var),
    Tanh(Var),
    Relu(Var),
    Reshape(Var),
    ReduceSum(Var),
    Barrier { x: Var, lo: f32, hi: f32 },
}

struct Node {
    op: EOp,
    value: Tensor,
}

/// A tape that records operations for automatic differentiation.
///
/// Values are computed eagerly as they are recorded, so a forward pass is just
/// a sequence of calls on the tape. [`Tape::backward`] then walks the recorded
/// operations in reverse and yields the gradient of a scalar loss with respect
/// to every recorded value, inputs included.
#[derive(Default)]
pub struct Tape {
    nodes: Vec<Node>,
}

impl Tape {
    /// Creates a new, empty tape.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Records an input tensor (an observation or a layer parameter).
    pub fn var(&mut self, value: Tensor) -> Var {
        self.push(EOp::Input, value)
    }

    pub fn value(&self, v: Var) -> &Tensor {
        &self.nodes[v.0].value
    }

    pub fn shape(&self, v: Var) -> &[usize] {
        &self.nodes[v.0].value.shape
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, op: EOp, value: Tensor) -> Var {
        self.nodes.push(Node { op, value });
        Var(self.nodes.len() - 1)
    }

    fn same_shape(&self, a: Var, b: Var) -> Result<(), MlError> {
        if self.shape(a) == self.shape(b) {
            Ok(())
        } else {
            Err(MlError::shape(self.shape(a), self.shape(b)))
        }
    }

    fn map(&mut self, a: Var, op: EOp, f: impl Fn(f32) -> f32) -> Var {
        let x = self.value(a);
        let out = Tensor::from_vec(x.shape.clone(), x.data.iter().map(|&v| f(v)).collect());
        self.push(op, out)
    }

    pub fn add(&mut self, a: Var, b: Var) -> Result<Var, MlError> {
        self.same_shape(a, b)?;
        let (x, y) = (self.value(a), self.value(b));
        let data = x.data.iter().zip(&y.data).map(|(p, q)| p + q).collect();
        let out = Tensor::from_vec(x.shape.clone(), data);
        Ok(self.push(EOp::Add(a, b), out))
    }

    pub fn sub(&mut self, a: Var, b: Var) -> Result<Var, MlError> {
        self.same_shape(a, b)?;
        let (x, y) = (self.value(a), self.value(b));
        let data = x.data.iter().zip(&y.data).map(|(p, q)| p - q).collect();
        let out = Tensor::from_vec(x.shape.clone(), data);
        Ok(self.push(EOp::Sub(a, b), out))
    }

    pub fn neg(&mut self, a: Var) -> Var {
        self.map(a, EOp::Neg(a), |v| -v)
    }

    pub fn scale(&mut self, a: Var, s: f32) -> Var {
        self.map(a, EOp::Scale(a, s), |v| v * s)
    }

    pub fn tanh(&mut self, a: Var) -> Var {
        self.map(a, EOp::Tanh(a), f32::tanh)
    }

    pub fn relu(&mut self, a: Var) -> Var {
        self.map(a, EOp::Relu(a), |v| v.max(0.0))
    }

    /// Squared distance of each element from the interval `[lo, hi]`.
    ///
    /// Zero inside the interval, `(v - hi)^2` above it and `(v - lo)^2` below.
    pub fn barrier(&mut self, a: Var, lo: f32, hi: f32) -> Var {
        self.map(a, EOp::Barrier { x: a, lo, hi }, |v| {
            if v > hi {
                (v - hi).powi(2)
            } else if v < lo {
                (v - lo).powi(2)
            } else {
                0.0
            }
        })
    }

    pub fn reshape(&mut self, a: Var, shape: Vec<usize>) -> Result<Var, MlError> {
        let x = self.value(a);
        let out = Tensor::try_from_vec(shape, x.data.clone())?;
        Ok(self.push(EOp::Reshape(a), out))
    }

    pub fn reduce_sum(&mut self, a: Var) -> Var {
        let out = Tensor::from_vec(vec![1], vec![self.value(a).sum()]);
        self.push(EOp::ReduceSum(a), out)
    }

    /// `w: [out, in]` times `x: [batch, in]`, giving `[batch, out]`.
    pub fn matmul(&mut self, w: Var, x: Var) -> Result<Var, MlError> {
        let (wt, xt) = (self.value(w), self.value(x));
        if wt.shape.len() != 2 || xt.shape.len() != 2 || wt.shape[1] != xt.shape[1] {
            return Err(MlError::shape(&wt.shape, &xt.shape));
        }
        let (out_dim, in_dim, batch) = (wt.shape[0], wt.shape[1], xt.shape[0]);
        let mut data = vec![0.0; batch * out_dim];
        for k in 0..batch {
            for i in 0..out_dim {
                data[k * out_dim + i] = (0..in_dim)
                    .map(|j| wt.data[i * in_dim + j] * xt.data[k * in_dim + j])
                    .sum();
            }
        }
        let out = Tensor::from_vec(vec![batch, out_dim], data);
        Ok(self.push(EOp::MatMul(w, x), out))
    }

    /// Adds `b: [dim]` to every row of `a: [batch, dim]`.
    pub fn add_broadcast(&mut self, a: Var, b: Var) -> Result<Var, MlError> {
        let (at, bt) = (self.value(a), self.value(b));
        if at.shape.len() != 2 || bt.shape != [at.shape[1]] {
            return Err(MlError::shape(&at.shape, &bt.shape));
        }
        let dim = at.shape[1];
        let data = at
            .data
            .iter()
            .enumerate()
            .map(|(idx, v)| v + bt.data[idx % dim])
            .collect();
        let out = Tensor::from_vec(at.shape.clone(), data);
        Ok(self.push(EOp::AddBroadcast(a, b), out))
    }

    /// Computes the gradients of every recorded value with respect to `loss`.
    ///
    /// The gradients are computed by traversing the recorded operations in
    /// reverse order.
    pub fn backward(&self, loss: Var) -> Result<Gradients, MlError> {
        let loss_value = self.value(loss);
        if loss_value.len() != 1 {
            return Err(MlError::NonScalarLoss(loss_value.shape.clone()));
        }

        let mut grads: Vec<Option<Vec<f32>>> = vec![None; self.nodes.len()];
        grads[loss.0] = Some(vec![1.0]);

        for idx in (0..=loss.0).rev() {
            let Some(out_grad) = grads[idx].take() else {
                continue;
            };
            let node = &self.nodes[idx];

            match node.op {
                EOp::Input => {}
                EOp::Add(a, b) => {
                    accumulate(&mut grads, a, &out_grad, |_, og| og);
                    accumulate(&mut grads, b, &out_grad, |_, og| og);
                }
                EOp::Sub(a, b) => {
                    accumulate(&mut grads, a, &out_grad, |_, og| og);
                    accumulate(&mut grads, b, &out_grad, |_, og| -og);
                }
                EOp::Neg(a) => accumulate(&mut grads, a, &out_grad, |_, og| -og),
                EOp::Scale(a, s) => accumulate(&mut grads, a, &out_grad, |_, og| s * og),
                EOp::Reshape(a) => accumulate(&mut grads, a, &out_grad, |_, og| og),
                EOp::Tanh(a) => {
                    let out = &node.value.data;
                    accumulate(&mut grads, a, &out_grad, |i, og| (1.0 - out[i].powi(2)) * og);
                }
                EOp::Relu(a) => {
                    let x = &self.value(a).data;
                    accumulate(&mut grads, a, &out_grad, |i, og| if x[i] > 0.0 { og } else { 0.0 });
                }
                EOp::Barrier { x, lo, hi } => {
                    let xs = &self.value(x).data;
                    accumulate(&mut grads, x, &out_grad, |i, og| {
                        let v = xs[i];
                        if v > hi {
                            2.0 * (v - hi) * og
                        } else if v < lo {
                            2.0 * (v - lo) * og
                        } else {
                            0.0
                        }
                    });
                }
                EOp::ReduceSum(a) => {
                    let n = self.value(a).len();
                    let g = slot(&mut grads, a, n);
                    for v in g.iter_mut() {
                        *v += out_grad[0];
                    }
                }
                EOp::MatMul(w, x) => {
                    let (wt, xt) = (self.value(w), self.value(x));
                    let (out_dim, in_dim, batch) = (wt.shape[0], wt.shape[1], xt.shape[0]);
                    {
                        let w_grad = slot(&mut grads, w, wt.len());
                        for i in 0..out_dim {
                            for j in 0..in_dim {
                                for k in 0..batch {
                                    w_grad[i * in_dim + j] +=
                                        out_grad[k * out_dim + i] * xt.data[k * in_dim + j];
                                }
                            }
                        }
                    }
                    {
                        let x_grad = slot(&mut grads, x, xt.len());
                        for k in 0..batch {
                            for j in 0..in_dim {
                                for i in 0..out_dim {
                                    x_grad[k * in_dim + j] +=
                                        out_grad[k * out_dim + i] * wt.data[i * in_dim + j];
                                }
                            }
                        }
                    }
                }
                EOp::AddBroadcast(a, b) => {
                    accumulate(&mut grads, a, &out_grad, |_, og| og);
                    let dim = self.value(b).len();
                    let b_grad = slot(&mut grads, b, dim);
                    for (i, og) in out_grad.iter().enumerate() {
                        b_grad[i % dim] += og;
                    }
                }
            }
            grads[idx] = Some(out_grad);
        }

        Ok(Gradients {
            grads,
            shapes: self.nodes.iter().map(|n| n.value.shape.clone()).collect(),
        })
    }
}

fn slot(grads: &mut [Option<Vec<f32>>], v: Var, len: usize) -> &mut Vec<f32> {
    grads[v.0].get_or_insert_with(|| vec![0.0; len])
}

fn accumulate(
    grads: &mut [Option<Vec<f32>>],
    v: Var,
    out_grad: &[f32],
    f: impl Fn(usize, f32) -> f32,
) {
    let g = slot(grads, v, out_grad.len());
    for (i, (gv, &og)) in g.iter_mut().zip(out_grad).enumerate() {
        *gv += f(i, og);
    }
}

/// Result of [`Tape::backward`].
pub struct Gradients {
    grads: Vec<Option<Vec<f32>>>,
    shapes: Vec<Vec<usize>>,
}

impl Gradients {
    /// Gradient of the loss with respect to `v`.
    ///
    /// Values the loss does not depend on get an all-zero gradient.
    pub fn wrt(&self, v: Var) -> Tensor {
        let shape = self.shapes[v.0].clone();
        match &self.grads[v.0] {
            Some(g) => Tensor::from_vec(shape, g.clone()),
            None => Tensor::zeros(shape),
        }
    }
}
