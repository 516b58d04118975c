use crate::env::ImageEnv;
use crate::{MlError, Tensor};

pub const GRID_ENV_ID: &str = "MicroTbs-Grid";
pub const GRID_LARGE_ENV_ID: &str = "MicroTbs-GridLarge";

const TERRAIN: usize = 0;
const OBSTACLE: usize = 1;
const GOLD: usize = 2;
const ARMY: usize = 3;
const ENEMY: usize = 4;
const CHANNELS: usize = 5;

/// A small turn-based strategy map encoded one-hot per cell.
///
/// Every cell has exactly one of five channels set: open terrain, obstacle,
/// gold pile, the player's army (top-left corner) or the enemy army
/// (bottom-right corner). The map layout is drawn from the seed on every
/// reset. When shown as an image only the first three channels are kept.
pub struct GridEnv {
    height: usize,
    width: usize,
    obstacle_chance: f32,
    gold_chance: f32,
    seed: u64,
}

impl GridEnv {
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            obstacle_chance: 0.15,
            gold_chance: 0.1,
            seed: 0,
        }
    }
}

impl ImageEnv for GridEnv {
    fn seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    fn reset(&mut self) -> Tensor {
        let rng = fastrand::Rng::with_seed(self.seed);
        let mut obs = Tensor::zeros(vec![self.height, self.width, CHANNELS]);
        let last = (self.height.saturating_sub(1), self.width.saturating_sub(1));

        for y in 0..self.height {
            for x in 0..self.width {
                let channel = if (y, x) == (0, 0) {
                    ARMY
                } else if (y, x) == last {
                    ENEMY
                } else if rng.f32() < self.obstacle_chance {
                    OBSTACLE
                } else if rng.f32() < self.gold_chance {
                    GOLD
                } else {
                    TERRAIN
                };
                obs.data[(y * self.width + x) * CHANNELS + channel] = 1.0;
            }
        }
        obs
    }

    fn observation_shape(&self) -> [usize; 3] {
        [self.height, self.width, CHANNELS]
    }
}

/// Builds an environment from its id.
pub fn make_env(env_id: &str) -> Result<GridEnv, MlError> {
    match env_id {
        GRID_ENV_ID => Ok(GridEnv::new(10, 10)),
        GRID_LARGE_ENV_ID => Ok(GridEnv::new(20, 20)),
        other => Err(MlError::UnknownEnv(other.to_string())),
    }
}
