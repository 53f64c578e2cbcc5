use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;
use thiserror::Error;

/// A trait for types that can be used as scalars in our dynamical systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Represents a continuous-time dynamical system (a flow).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// x: current state
    /// out: buffer to write dx/dt into
    fn apply(&self, t: T, x: &[T], out: &mut [T]);

    /// Writes the Jacobian ∂f_i/∂x_j at (t, x) into `out`, row-major,
    /// length dimension². The default is a forward finite difference;
    /// systems with a cheap closed-form Jacobian should override it.
    fn jacobian(&self, t: T, x: &[T], out: &mut [T]) {
        let n = self.dimension();
        let mut f0 = vec![T::zero(); n];
        let mut f1 = vec![T::zero(); n];
        let mut perturbed = x.to_vec();
        self.apply(t, x, &mut f0);
        let sqrt_eps = T::epsilon().sqrt();
        for j in 0..n {
            let h = sqrt_eps * x[j].abs().max(T::one());
            perturbed[j] = x[j] + h;
            self.apply(t, &perturbed, &mut f1);
            for i in 0..n {
                out[i * n + j] = (f1[i] - f0[i]) / h;
            }
            perturbed[j] = x[j];
        }
    }
}

/// Returned when an implicit stage iteration cannot be driven to
/// convergence at the attempted step size. The caller is expected to
/// retry with a smaller step.
#[derive(Debug, Clone, Copy, Error)]
#[error("implicit stage failed to converge at t = {t}")]
pub struct StepFailure {
    pub t: f64,
}

/// A trait for solvers that can step a system forward.
pub trait Steppable {
    /// Performs one step of size dt.
    /// t: current time (updated after a successful step)
    /// state: current state (updated after a successful step)
    fn step(
        &mut self,
        system: &impl DynamicalSystem<f64>,
        t: &mut f64,
        state: &mut [f64],
        dt: f64,
    ) -> Result<(), StepFailure>;

    /// Classical order of accuracy, used by adaptive step-size control.
    fn order(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::DynamicalSystem;

    struct LinearSystem {
        matrix: [[f64; 2]; 2],
    }

    impl DynamicalSystem<f64> for LinearSystem {
        fn dimension(&self) -> usize {
            2
        }

        fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            out[0] = self.matrix[0][0] * x[0] + self.matrix[0][1] * x[1];
            out[1] = self.matrix[1][0] * x[0] + self.matrix[1][1] * x[1];
        }
    }

    #[test]
    fn default_jacobian_recovers_linear_system_matrix() {
        let system = LinearSystem {
            matrix: [[-0.5, 2.0], [1.5, -3.0]],
        };
        let mut jac = [0.0; 4];
        system.jacobian(0.0, &[0.7, -1.3], &mut jac);
        for i in 0..2 {
            for j in 0..2 {
                assert!(
                    (jac[i * 2 + j] - system.matrix[i][j]).abs() < 1e-6,
                    "entry ({i}, {j}) off: {} vs {}",
                    jac[i * 2 + j],
                    system.matrix[i][j]
                );
            }
        }
    }
}
