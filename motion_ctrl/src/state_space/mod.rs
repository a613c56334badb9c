//! # State-space control module
//!
//! A generic discrete-time linear plant/controller/observer triple. Each
//! position-controlled actuator owns one triple, parameterised by its own
//! coefficient sets; the drivetrain modules never share state with them.
//!
//! The usual cycle is: feed the latest measurement into the observer's
//! correction step, predict forward, then compute the control output from
//! either the filtered estimate or the raw measurement (see
//! [`FeedbackSource`]). Output clamping to the voltage limits is a normal
//! saturation path, not an error.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod actuator;
mod coeffs;
mod profile;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::SVector;

// Internal
pub use actuator::*;
pub use coeffs::*;
pub use profile::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A discrete-time linear plant model.
#[derive(Debug, Clone, Copy)]
pub struct StateSpacePlant<const S: usize, const I: usize, const O: usize> {
    coeffs: StateSpacePlantCoeffs<S, I, O>,
}

/// State feedback + feedforward controller with output clamping.
#[derive(Debug, Clone, Copy)]
pub struct StateSpaceController<const S: usize, const I: usize> {
    coeffs: StateSpaceControllerCoeffs<S, I>,

    /// The last computed (clamped) output
    u: SVector<f64, I>,
}

/// Luenberger observer maintaining a filtered state estimate.
#[derive(Debug, Clone, Copy)]
pub struct StateSpaceObserver<const S: usize, const I: usize, const O: usize> {
    plant: StateSpacePlantCoeffs<S, I, O>,
    coeffs: StateSpaceObserverCoeffs<S, O>,

    /// The current state estimate
    pub x_hat: SVector<f64, S>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<const S: usize, const I: usize, const O: usize> StateSpacePlant<S, I, O> {
    pub fn new(coeffs: StateSpacePlantCoeffs<S, I, O>) -> Self {
        Self { coeffs }
    }

    pub fn coeffs(&self) -> &StateSpacePlantCoeffs<S, I, O> {
        &self.coeffs
    }

    /// Propagate a state one timestep: `x' = Ax + Bu`.
    pub fn update(&self, x: &SVector<f64, S>, u: &SVector<f64, I>) -> SVector<f64, S> {
        self.coeffs.a * x + self.coeffs.b * u
    }

    /// The plant output for a state and input: `y = Cx + Du`.
    pub fn output(&self, x: &SVector<f64, S>, u: &SVector<f64, I>) -> SVector<f64, O> {
        self.coeffs.c * x + self.coeffs.d * u
    }
}

impl<const S: usize, const I: usize> StateSpaceController<S, I> {
    pub fn new(coeffs: StateSpaceControllerCoeffs<S, I>) -> Self {
        Self {
            coeffs,
            u: SVector::zeros(),
        }
    }

    /// Compute the control output `u = Kff·r - K·x`, elementwise-clamped to
    /// the voltage limits.
    pub fn update(
        &mut self,
        state: &SVector<f64, S>,
        reference: &SVector<f64, S>,
    ) -> SVector<f64, I> {
        let mut u = self.coeffs.kff * reference - self.coeffs.k * state;

        for i in 0..I {
            u[i] = u[i].max(self.coeffs.u_min[i]).min(self.coeffs.u_max[i]);
        }

        self.u = u;
        u
    }

    /// The last computed (clamped) output.
    pub fn u(&self) -> &SVector<f64, I> {
        &self.u
    }
}

impl<const S: usize, const I: usize, const O: usize> StateSpaceObserver<S, I, O> {
    pub fn new(
        coeffs: StateSpaceObserverCoeffs<S, O>,
        plant: StateSpacePlantCoeffs<S, I, O>,
    ) -> Self {
        Self {
            plant,
            coeffs,
            x_hat: SVector::zeros(),
        }
    }

    /// Overwrite the state estimate.
    pub fn reset(&mut self, x: SVector<f64, S>) {
        self.x_hat = x;
    }

    /// Correct the estimate against a measurement:
    /// `x̂ += L·(y - (C·x̂ + D·u))`.
    pub fn correct(&mut self, u: &SVector<f64, I>, y: &SVector<f64, O>) {
        let expected = self.plant.c * self.x_hat + self.plant.d * u;
        self.x_hat += self.coeffs.l * (y - expected);
    }

    /// Predict the estimate forward one timestep: `x̂ = A·x̂ + B·u`.
    pub fn predict(&mut self, u: &SVector<f64, I>) {
        self.x_hat = self.plant.a * self.x_hat + self.plant.b * u;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{Matrix1, Matrix2, Vector1, Vector2};

    fn scalar_plant(a: f64, b: f64) -> StateSpacePlantCoeffs<1, 1, 1> {
        StateSpacePlantCoeffs {
            a: Matrix1::new(a),
            b: Matrix1::new(b),
            c: Matrix1::new(1.0),
            d: Matrix1::new(0.0),
        }
    }

    #[test]
    fn test_controller_passthrough_with_identity_kff() {
        // K = 0 and Kff = I make the output equal the reference, clamped
        let mut controller = StateSpaceController::new(StateSpaceControllerCoeffs {
            k: Matrix2::zeros(),
            kff: Matrix2::identity(),
            u_min: Vector2::new(-12.0, -12.0),
            u_max: Vector2::new(12.0, 12.0),
        });

        let u = controller.update(&Vector2::new(5.0, -3.0), &Vector2::new(1.0, -2.0));
        assert_eq!(u, Vector2::new(1.0, -2.0));

        // Saturation is a normal path
        let u = controller.update(&Vector2::zeros(), &Vector2::new(100.0, -100.0));
        assert_eq!(u, Vector2::new(12.0, -12.0));
    }

    #[test]
    fn test_controller_feedback_term() {
        let mut controller = StateSpaceController::new(StateSpaceControllerCoeffs {
            k: Matrix1::new(2.0),
            kff: Matrix1::new(1.0),
            u_min: Vector1::new(-12.0),
            u_max: Vector1::new(12.0),
        });

        // u = 1*r - 2*x
        let u = controller.update(&Vector1::new(1.5), &Vector1::new(4.0));
        assert!((u[0] - 1.0).abs() < 1e-12);
        assert!((controller.u()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_observer_correct_moves_towards_measurement() {
        let plant = scalar_plant(1.0, 0.0);
        let mut observer = StateSpaceObserver::new(
            StateSpaceObserverCoeffs {
                l: Matrix1::new(0.5),
            },
            plant,
        );

        observer.correct(&Vector1::zeros(), &Vector1::new(1.0));
        assert!((observer.x_hat[0] - 0.5).abs() < 1e-12);

        observer.correct(&Vector1::zeros(), &Vector1::new(1.0));
        assert!((observer.x_hat[0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_observer_predict_follows_plant() {
        let plant = scalar_plant(0.9, 0.1);
        let mut observer = StateSpaceObserver::new(
            StateSpaceObserverCoeffs {
                l: Matrix1::new(0.0),
            },
            plant,
        );

        observer.reset(Vector1::new(1.0));
        observer.predict(&Vector1::new(2.0));

        // 0.9 * 1.0 + 0.1 * 2.0
        assert!((observer.x_hat[0] - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_plant_update_and_output() {
        let plant = StateSpacePlant::new(scalar_plant(0.5, 1.0));

        let x = plant.update(&Vector1::new(2.0), &Vector1::new(0.25));
        assert!((x[0] - 1.25).abs() < 1e-12);

        let y = plant.output(&Vector1::new(2.0), &Vector1::new(0.25));
        assert!((y[0] - 2.0).abs() < 1e-12);
    }
}
