use ml::Tensor;

/// Central-difference gradient of `f` at `x`.
pub fn numerical_grad<F>(x: &Tensor, f: F, epsilon: f32) -> Vec<f32>
where
    F: Fn(&Tensor) -> f32,
{
    let mut plus = x.clone();
    let mut minus = x.clone();
    let mut grad = Vec::with_capacity(x.len());
    for i in 0..x.len() {
        plus.data[i] += epsilon;
        minus.data[i] -= epsilon;
        grad.push((f(&plus) - f(&minus)) / (2.0 * epsilon));
        plus.data[i] -= epsilon;
        minus.data[i] += epsilon;
    }
    grad
}

pub fn assert_close(a: &[f32], b: &[f32], tol: f32) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!((x - y).abs() < tol, "element {i}: {x} vs {y}");
    }
}
