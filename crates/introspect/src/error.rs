use ml::MlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntrospectError {
    #[error("model evaluation failed: {0}")]
    Model(#[from] MlError),
    #[error("invalid optimizer config: {0}")]
    InvalidConfig(String),
    #[error("cannot display tensor of shape {0:?} as an image")]
    ImageShape(Vec<usize>),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
