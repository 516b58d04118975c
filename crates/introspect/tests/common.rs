use introspect::OptimizeConfig;
use ml::{MlError, Tape, Var};

/// Value estimate equal to the sum of the observation.
pub fn sum_model(tape: &mut Tape, obs: Var) -> Result<Var, MlError> {
    Ok(tape.reduce_sum(obs))
}

pub fn quick_config(iterations: usize) -> OptimizeConfig {
    OptimizeConfig {
        iterations,
        log_every: 5,
        snapshot_every: 10,
        ..OptimizeConfig::default()
    }
}
