use ml::checkpoint::{checkpoint_path, experiment_name};
use ml::{MlError, PolicyValueNet, Tape, Tensor, ValueModel};

#[test]
fn saved_network_loads_with_same_value() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = checkpoint_path(dir.path(), &experiment_name("MicroTbs-Grid", "test"));
    let net = PolicyValueNet::random([3, 3, 3], 8, 4, 9);
    net.save(&path)?;

    let loaded = PolicyValueNet::load(&path)?;
    let obs = Tensor::from_vec(vec![3, 3, 3], (0..27).map(|i| i as f32 / 27.0).collect());
    let value = |n: &PolicyValueNet| {
        let mut tape = Tape::new();
        let o = tape.var(obs.clone());
        let v = n.value(&mut tape, o).unwrap();
        tape.value(v).data[0]
    };
    assert_eq!(value(&net), value(&loaded));
    Ok(())
}

#[test]
fn missing_checkpoint_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PolicyValueNet::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, MlError::Io(_)));
}

#[test]
fn inconsistent_checkpoint_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.json");
    let mut net = PolicyValueNet::random([3, 3, 3], 8, 4, 9);
    net.observation_shape = [4, 4, 3];
    net.save(&path)?;
    assert!(matches!(PolicyValueNet::load(&path), Err(MlError::ShapeMismatch { .. })));
    Ok(())
}
