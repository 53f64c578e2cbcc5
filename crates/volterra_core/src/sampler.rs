use crate::solvers::{NewtonSettings, Sdirk2};
use crate::traits::{DynamicalSystem, Steppable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for one trajectory computation. The defaults carry the
/// dashboard contract: integrate from t = 0 to t = 70 and report 10000
/// evenly spaced samples. The remaining fields tune the adaptive solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SamplerSettings {
    pub t_begin: f64,
    pub t_end: f64,
    pub samples: usize,
    pub rtol: f64,
    pub atol: f64,
    pub h_init: f64,
    pub h_min: f64,
    pub max_steps: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            t_begin: 0.0,
            t_end: 70.0,
            samples: 10000,
            rtol: 1e-6,
            atol: 1e-9,
            h_init: 1e-2,
            h_min: 1e-10,
            max_steps: 100_000,
        }
    }
}

/// Errors surfaced by the trajectory sampler. Integration failures are
/// explicit: a partial or truncated trajectory is never returned.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("invalid sampler input: {0}")]
    InvalidInput(String),
    #[error("step size underflow at t = {t:.3}; the configured tolerances cannot be met")]
    StepSizeUnderflow { t: f64 },
    #[error("step budget of {limit} exhausted at t = {t:.3}")]
    StepBudgetExhausted { t: f64, limit: usize },
}

/// A fixed-size, evenly sampled solution of a dynamical system.
/// `states[c][i]` is component `c` at `time[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampledTrajectory {
    pub time: Vec<f64>,
    pub states: Vec<Vec<f64>>,
}

/// Integrates `system` from `initial_state` across the configured time
/// span and reports the solution on an evenly spaced query grid.
///
/// The integrator is the L-stable SDIRK scheme from [`crate::solvers`],
/// with step-doubling (Richardson) error control: each attempted step is
/// taken once at size h and twice at h/2, and the difference drives both
/// acceptance and the next step size. Accepted steps advance on the
/// half-step result; query points interior to a step are filled in by
/// cubic Hermite interpolation on the step endpoints and derivatives.
pub fn sample_trajectory(
    system: &impl DynamicalSystem<f64>,
    initial_state: &[f64],
    settings: &SamplerSettings,
) -> Result<SampledTrajectory, SolveError> {
    let dim = system.dimension();
    validate(initial_state, dim, settings)?;

    let n = settings.samples;
    let span = settings.t_end - settings.t_begin;
    let denom = (n - 1) as f64;
    let mut grid: Vec<f64> = (0..n)
        .map(|i| settings.t_begin + span * (i as f64) / denom)
        .collect();
    // Both endpoints are part of the contract; pin them exactly.
    grid[0] = settings.t_begin;
    grid[n - 1] = settings.t_end;

    let mut time = Vec::with_capacity(n);
    let mut states: Vec<Vec<f64>> = vec![Vec::with_capacity(n); dim];

    // The first sample is the supplied initial state, verbatim.
    time.push(grid[0]);
    for (component, &value) in states.iter_mut().zip(initial_state) {
        component.push(value);
    }
    let mut next_query = 1;

    let mut t = settings.t_begin;
    let mut y = initial_state.to_vec();
    let mut f_left = vec![0.0; dim];
    system.apply(t, &y, &mut f_left);
    if f_left.iter().any(|v| !v.is_finite()) {
        return Err(SolveError::InvalidInput(
            "vector field is non-finite at the initial state".to_string(),
        ));
    }

    let mut stepper = Sdirk2::new(dim, NewtonSettings::default());
    let mut h = settings.h_init.min(span);
    let mut full = vec![0.0; dim];
    let mut half = vec![0.0; dim];
    let mut f_right = vec![0.0; dim];
    let mut steps = 0;

    while next_query < n {
        if steps >= settings.max_steps {
            return Err(SolveError::StepBudgetExhausted {
                t,
                limit: settings.max_steps,
            });
        }
        steps += 1;

        let mut last_step = false;
        if t + h >= settings.t_end {
            h = settings.t_end - t;
            last_step = true;
        }

        // One step of size h and two of h/2; their difference is the
        // Richardson estimate of the local error.
        full.copy_from_slice(&y);
        half.copy_from_slice(&y);
        let mut t_work = t;
        let mut attempt = stepper.step(system, &mut t_work, &mut full, h);
        if attempt.is_ok() {
            t_work = t;
            attempt = stepper.step(system, &mut t_work, &mut half, 0.5 * h);
        }
        if attempt.is_ok() {
            attempt = stepper.step(system, &mut t_work, &mut half, 0.5 * h);
        }
        if attempt.is_err() {
            h *= 0.5;
            if h < settings.h_min {
                return Err(SolveError::StepSizeUnderflow { t });
            }
            continue;
        }

        let mut err_sq = 0.0;
        let mut finite = true;
        for i in 0..dim {
            if !half[i].is_finite() || !full[i].is_finite() {
                finite = false;
                break;
            }
            let sc = settings.atol + settings.rtol * y[i].abs().max(half[i].abs());
            // 2^order − 1 = 3 for the order-2 scheme.
            let e = (half[i] - full[i]) / (3.0 * sc);
            err_sq += e * e;
        }
        let err = (err_sq / dim as f64).sqrt();
        if !finite || !err.is_finite() {
            h *= 0.2;
            if h < settings.h_min {
                return Err(SolveError::StepSizeUnderflow { t });
            }
            continue;
        }

        if err > 1.0 {
            h *= (0.9 * err.powf(-1.0 / 3.0)).clamp(0.2, 1.0);
            if h < settings.h_min {
                return Err(SolveError::StepSizeUnderflow { t });
            }
            continue;
        }

        // Accepted. Advance on the half-step result without local
        // extrapolation, which keeps the stiff damping of the method.
        let t_old = t;
        let t_new = if last_step { settings.t_end } else { t + h };
        let h_used = t_new - t_old;
        system.apply(t_new, &half, &mut f_right);

        while next_query < n && grid[next_query] <= t_new {
            let theta = if h_used > 0.0 {
                (grid[next_query] - t_old) / h_used
            } else {
                1.0
            };
            let t2 = theta * theta;
            let t3 = t2 * theta;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + theta;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            time.push(grid[next_query]);
            for c in 0..dim {
                let value = h00 * y[c]
                    + h10 * h_used * f_left[c]
                    + h01 * half[c]
                    + h11 * h_used * f_right[c];
                states[c].push(value);
            }
            next_query += 1;
        }

        y.copy_from_slice(&half);
        t = t_new;
        f_left.copy_from_slice(&f_right);

        if err < 1e-10 {
            h *= 5.0;
        } else {
            h *= (0.9 * err.powf(-1.0 / 3.0)).clamp(0.2, 5.0);
        }
    }

    Ok(SampledTrajectory { time, states })
}

fn validate(
    initial_state: &[f64],
    dim: usize,
    settings: &SamplerSettings,
) -> Result<(), SolveError> {
    if initial_state.len() != dim {
        return Err(SolveError::InvalidInput(format!(
            "initial state dimension mismatch: expected {dim}, got {}",
            initial_state.len()
        )));
    }
    if initial_state.iter().any(|v| !v.is_finite()) {
        return Err(SolveError::InvalidInput(
            "initial state must be finite".to_string(),
        ));
    }
    if settings.samples < 2 {
        return Err(SolveError::InvalidInput(format!(
            "samples must be at least 2, got {}",
            settings.samples
        )));
    }
    if !(settings.t_end > settings.t_begin) {
        return Err(SolveError::InvalidInput(format!(
            "t_end ({}) must be greater than t_begin ({})",
            settings.t_end, settings.t_begin
        )));
    }
    if !(settings.rtol > 0.0) || !(settings.atol > 0.0) {
        return Err(SolveError::InvalidInput(
            "tolerances must be positive".to_string(),
        ));
    }
    if !(settings.h_init > 0.0) || !(settings.h_min > 0.0) {
        return Err(SolveError::InvalidInput(
            "step sizes must be positive".to_string(),
        ));
    }
    Ok(())
}
