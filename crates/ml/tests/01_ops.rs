use ml::{MlError, Tape, Tensor};

#[test]
fn elementwise_ops_forward() {
    let mut tape = Tape::new();
    let a = tape.var(Tensor::from_vec(vec![3], vec![1.0, -2.0, 3.0]));
    let b = tape.var(Tensor::from_vec(vec![3], vec![4.0, 5.0, -6.0]));

    let sum = tape.add(a, b).unwrap();
    let diff = tape.sub(a, b).unwrap();
    let neg = tape.neg(a);
    let scaled = tape.scale(a, 0.5);
    let relu = tape.relu(a);

    assert_eq!(tape.value(sum).data, vec![5.0, 3.0, -3.0]);
    assert_eq!(tape.value(diff).data, vec![-3.0, -7.0, 9.0]);
    assert_eq!(tape.value(neg).data, vec![-1.0, 2.0, -3.0]);
    assert_eq!(tape.value(scaled).data, vec![0.5, -1.0, 1.5]);
    assert_eq!(tape.value(relu).data, vec![1.0, 0.0, 3.0]);
}

#[test]
fn barrier_is_zero_inside_unit_interval() {
    let mut tape = Tape::new();
    let x = tape.var(Tensor::from_vec(vec![5], vec![-0.5, 0.0, 0.5, 1.0, 1.5]));
    let b = tape.barrier(x, 0.0, 1.0);
    assert_eq!(tape.value(b).data, vec![0.25, 0.0, 0.0, 0.0, 0.25]);
}

#[test]
fn matmul_and_broadcast() {
    let mut tape = Tape::new();
    let w = tape.var(Tensor::from_vec(vec![2, 3], vec![1.0, 0.0, -1.0, 2.0, 1.0, 0.0]));
    let x = tape.var(Tensor::from_vec(vec![2, 3], vec![1.0, 2.0, 3.0, -1.0, 0.0, 1.0]));
    let b = tape.var(Tensor::from_vec(vec![2], vec![0.5, -0.5]));
    let wx = tape.matmul(w, x).unwrap();
    let y = tape.add_broadcast(wx, b).unwrap();
    assert_eq!(tape.shape(y), &[2, 2]);
    assert_eq!(tape.value(y).data, vec![-1.5, 3.5, -1.5, -2.5]);
}

#[test]
fn mismatched_shapes_are_rejected() {
    let mut tape = Tape::new();
    let a = tape.var(Tensor::zeros(vec![3]));
    let b = tape.var(Tensor::zeros(vec![4]));
    assert!(matches!(tape.add(a, b), Err(MlError::ShapeMismatch { .. })));

    let w = tape.var(Tensor::zeros(vec![2, 3]));
    let x = tape.var(Tensor::zeros(vec![1, 4]));
    assert!(matches!(tape.matmul(w, x), Err(MlError::ShapeMismatch { .. })));
    assert!(tape.reshape(a, vec![2, 2]).is_err());
}

#[test]
fn backward_needs_scalar_loss() {
    let mut tape = Tape::new();
    let a = tape.var(Tensor::zeros(vec![3]));
    let b = tape.tanh(a);
    assert!(matches!(tape.backward(b), Err(MlError::NonScalarLoss(_))));
}
