use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("backward pass needs a single-element loss, got shape {0:?}")]
    NonScalarLoss(Vec<usize>),
    #[error("unknown environment id: {0}")]
    UnknownEnv(String),
    #[error("checkpoint i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl MlError {
    pub(crate) fn shape(expected: &[usize], actual: &[usize]) -> Self {
        MlError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
