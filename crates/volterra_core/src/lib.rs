//! The `volterra_core` crate is the numerical engine behind the
//! predator-prey explorer. It is UI-agnostic: callers supply initial
//! populations and the four Lotka-Volterra rates, and get back a
//! fixed-size evenly sampled trajectory or an explicit integration
//! failure.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem`
//!   (vector field plus Jacobian), `Steppable` (one-step integrators).
//! - **Model**: the Lotka-Volterra vector field and the
//!   `compute_trajectory` entry point.
//! - **Solvers**: an L-stable SDIRK integrator with Newton stage solves.
//! - **Sampler**: adaptive step-doubling driver with dense output on an
//!   evenly spaced query grid.
//! - **Summary**: oscillation statistics (extrema, peaks, period) for
//!   the dashboard's guided questions.

pub mod model;
pub mod sampler;
pub mod solvers;
pub mod summary;
pub mod traits;
