use introspect::{to_image, PngVisualizer, Visualizer};
use ml::Tensor;

#[test]
fn png_snapshot_is_written() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut sink = PngVisualizer::new(dir.path().join("frames"));
    let x = Tensor::from_vec(vec![2, 3, 3], (0..18).map(|i| i as f32).collect());
    sink.show(1000, &to_image(&x))?;

    let path = sink.path_for(1000);
    assert!(path.ends_with("step_001000.png"));
    let img = image::open(&path)?.to_rgb8();
    assert_eq!(img.dimensions(), (3, 2));
    Ok(())
}

#[test]
fn single_channel_snapshot_is_grayscale() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut sink = PngVisualizer::new(dir.path());
    let x = Tensor::from_vec(vec![2, 2, 1], vec![0.0, 1.0, 2.0, 3.0]);
    sink.show(0, &to_image(&x))?;
    let img = image::open(sink.path_for(0))?;
    assert_eq!(img.color(), image::ColorType::L8);
    Ok(())
}

#[test]
fn flat_tensor_cannot_be_saved() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = PngVisualizer::new(dir.path());
    let x = Tensor::from_vec(vec![4], vec![0.0, 1.0, 2.0, 3.0]);
    assert!(sink.show(0, &to_image(&x)).is_err());
}
