use crate::Tensor;

/// Environment that produces image-like observations.
///
/// Only the parts needed to obtain a starting observation are modelled: a
/// deterministic seed, a reset, and the fixed observation shape. Every call
/// to [`reset`] after the same [`seed`] must return the same observation.
///
/// [`reset`]: ImageEnv::reset
/// [`seed`]: ImageEnv::seed
pub trait ImageEnv {
    /// Seed the environment's random layout generator.
    fn seed(&mut self, seed: u64);

    /// Reset the environment and return the initial observation, shaped
    /// `[height, width, channels]`.
    fn reset(&mut self) -> Tensor;

    /// Shape of every observation as `[height, width, channels]`.
    fn observation_shape(&self) -> [usize; 3];
}
