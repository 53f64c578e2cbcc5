use crate::sampler::{sample_trajectory, SamplerSettings, SolveError};
use crate::traits::{DynamicalSystem, Scalar};
use serde::{Deserialize, Serialize};

/// Index of the predator component in the state vector.
pub const PREDATOR: usize = 0;
/// Index of the prey component in the state vector.
pub const PREY: usize = 1;

/// The four rate parameters of the Lotka-Volterra coupling.
///
/// * `r`: prey growth rate
/// * `c`: predation-driven prey decline rate
/// * `b`: predator reproduction gain rate
/// * `m`: predator death rate
///
/// Values are immutable for the duration of one trajectory computation.
/// Any finite reals are accepted; slider range clamping is a UI concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub r: f64,
    pub c: f64,
    pub b: f64,
    pub m: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            r: 0.8,
            c: 0.1,
            b: 0.02,
            m: 0.5,
        }
    }
}

/// Initial population sizes, state order `[predator, prey]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialPopulations {
    pub predator: f64,
    pub prey: f64,
}

impl Default for InitialPopulations {
    fn default() -> Self {
        Self {
            predator: 5.0,
            prey: 20.0,
        }
    }
}

/// The predator-prey vector field.
///
/// Predator growth is proportional to the predation encounter rate (the
/// product of both populations) minus natural mortality; prey growth is
/// exponential minus losses proportional to the encounter rate.
#[derive(Debug, Clone, Copy)]
pub struct LotkaVolterra {
    pub params: Parameters,
}

impl LotkaVolterra {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }
}

impl<T: Scalar> DynamicalSystem<T> for LotkaVolterra {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let r = T::from_f64(self.params.r).unwrap();
        let c = T::from_f64(self.params.c).unwrap();
        let b = T::from_f64(self.params.b).unwrap();
        let m = T::from_f64(self.params.m).unwrap();
        let predator = x[PREDATOR];
        let prey = x[PREY];
        out[PREDATOR] = b * predator * prey - m * predator;
        out[PREY] = r * prey - c * predator * prey;
    }

    /// Closed-form Jacobian, refreshed on every Newton iteration of the
    /// implicit stages.
    fn jacobian(&self, _t: T, x: &[T], out: &mut [T]) {
        let r = T::from_f64(self.params.r).unwrap();
        let c = T::from_f64(self.params.c).unwrap();
        let b = T::from_f64(self.params.b).unwrap();
        let m = T::from_f64(self.params.m).unwrap();
        let predator = x[PREDATOR];
        let prey = x[PREY];
        out[0] = b * prey - m;
        out[1] = b * predator;
        out[2] = -(c * prey);
        out[3] = r - c * predator;
    }
}

/// A time-sampled predator-prey solution. All three sequences have the
/// same length; produced once per computation request and immutable
/// afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub predator: Vec<f64>,
    pub prey: Vec<f64>,
}

/// Runs one synchronous trajectory computation: integrates the
/// Lotka-Volterra system from `initial` under `params` across the span
/// configured in `settings` and unpacks the sampled components.
///
/// Stateless across calls; integration failures are explicit and no
/// partial trajectory is ever returned.
pub fn compute_trajectory(
    initial: InitialPopulations,
    params: Parameters,
    settings: &SamplerSettings,
) -> Result<Trajectory, SolveError> {
    let system = LotkaVolterra::new(params);
    let sampled = sample_trajectory(&system, &[initial.predator, initial.prey], settings)?;
    // The sampler returns one component per state dimension, in order.
    let mut components = sampled.states;
    let prey = components.swap_remove(PREY);
    let predator = components.swap_remove(PREDATOR);
    Ok(Trajectory {
        time: sampled.time,
        predator,
        prey,
    })
}
