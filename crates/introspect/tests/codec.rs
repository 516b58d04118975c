use introspect::to_image;
use ml::Tensor;

#[test]
fn output_spans_full_byte_range() {
    let rng = fastrand::Rng::with_seed(17);
    let data = (0..4 * 5 * 3).map(|_| rng.f32() * 7.0 - 3.0).collect();
    let x = Tensor::from_vec(vec![4, 5, 3], data);
    let img = to_image(&x);
    assert_eq!(img.shape, x.shape);
    assert_eq!(img.data.len(), x.len());
    assert_eq!(*img.data.iter().min().unwrap(), 0);
    assert_eq!(*img.data.iter().max().unwrap(), 255);
}

#[test]
fn constant_input_maps_to_zero() {
    let x = Tensor::from_vec(vec![2, 2, 3], vec![0.42; 12]);
    let img = to_image(&x);
    assert!(img.data.iter().all(|&b| b == 0));

    let zeros = to_image(&Tensor::zeros(vec![3, 3, 1]));
    assert!(zeros.data.iter().all(|&b| b == 0));
}

#[test]
fn byte_range_input_is_nearly_unchanged() {
    let data: Vec<f32> = (0..=255).map(|v| v as f32).collect();
    let x = Tensor::from_vec(vec![1, 256, 1], data.clone());
    let img = to_image(&x);
    for (&b, &v) in img.data.iter().zip(&data) {
        assert_eq!(f32::from(b), v);
    }
}

#[test]
fn ordering_is_preserved() {
    let x = Tensor::from_vec(vec![1, 4, 1], vec![-1.0, 0.0, 0.5, 3.0]);
    let img = to_image(&x);
    assert!(img.data.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(img.data[0], 0);
}

#[test]
fn unit_range_maps_to_full_bytes() {
    let x = Tensor::from_vec(vec![1, 2, 1], vec![0.0, 1.0]);
    assert_eq!(to_image(&x).data, vec![0, 255]);

    let x = Tensor::from_vec(vec![1, 3, 1], vec![0.0, 0.5, 1.0]);
    assert_eq!(to_image(&x).data, vec![0, 127, 255]);
}
