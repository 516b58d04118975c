use ml::{Dense, Tape, Tensor};

#[test]
fn dense_forward_exact() {
    let w = vec![
        1.0, 0.5, -0.5, -1.0, // First row
        0.2, 0.3, 0.1, 0.9, // Second row
    ];
    let b = vec![0.1, -0.2];
    let layer = Dense::new(w, b.clone(), 4, 2);
    let mut tape = Tape::new();
    let x = tape.var(Tensor::from_vec(vec![1, 4], vec![1.0, 2.0, 3.0, 4.0]));
    let y = layer.forward(&mut tape, x).unwrap();
    let y = tape.value(y);

    let expected_y0 = 1.0 * 1.0 + 0.5 * 2.0 - 0.5 * 3.0 - 1.0 * 4.0 + b[0];
    let expected_y1 = 0.2 * 1.0 + 0.3 * 2.0 + 0.1 * 3.0 + 0.9 * 4.0 + b[1];

    assert!((y.data[0] - expected_y0).abs() < 1e-6);
    assert!((y.data[1] - expected_y1).abs() < 1e-6);
}

#[test]
fn glorot_weights_stay_within_limit() {
    let rng = fastrand::Rng::with_seed(3);
    let layer = Dense::random(8, 4, &rng);
    let limit = (6.0f32 / 12.0).sqrt();
    assert_eq!(layer.w.shape, vec![4, 8]);
    assert!(layer.w.data.iter().all(|w| w.abs() <= limit));
    assert!(layer.b.data.iter().all(|&b| b == 0.0));
}
