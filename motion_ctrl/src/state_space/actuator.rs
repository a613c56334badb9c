//! Per-actuator state-space control wrapper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{SVector, Vector2};

// Internal
use super::{
    ProfileState, StateSpaceController, StateSpaceControllerCoeffs, StateSpaceObserver,
    StateSpaceObserverCoeffs, StateSpacePlant, StateSpacePlantCoeffs, TrapezoidalProfile,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which state feeds the control law.
///
/// The observer assumes the plant model holds; mechanisms with backlash or
/// slop can make its estimate drift, in which case feeding the raw measured
/// state to the controller is the supported fallback.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FeedbackSource {
    /// Use the observer's filtered state estimate.
    ObserverEstimate,

    /// Bypass the observer and use the measured state directly.
    RawMeasurement,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One actuator's control stack: a plant model, a clamped state-feedback
/// controller and an observer, plus an optional motion profile driving the
/// reference.
///
/// Each position-controlled actuator owns exactly one of these; triples are
/// never shared.
pub struct ActuatorCtrl<const S: usize, const I: usize, const O: usize> {
    plant: StateSpacePlant<S, I, O>,
    controller: StateSpaceController<S, I>,
    observer: StateSpaceObserver<S, I, O>,

    feedback: FeedbackSource,

    /// The reference vector the controller drives towards
    reference: SVector<f64, S>,

    /// The command applied on the previous cycle
    u: SVector<f64, I>,

    /// Profile for the current move, if one was commanded
    profile: Option<TrapezoidalProfile>,

    /// Time since the current move was commanded.
    ///
    /// Units: seconds
    profile_elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<const S: usize, const I: usize, const O: usize> ActuatorCtrl<S, I, O> {
    pub fn new(
        plant_coeffs: StateSpacePlantCoeffs<S, I, O>,
        controller_coeffs: StateSpaceControllerCoeffs<S, I>,
        observer_coeffs: StateSpaceObserverCoeffs<S, O>,
        feedback: FeedbackSource,
    ) -> Self {
        Self {
            plant: StateSpacePlant::new(plant_coeffs),
            controller: StateSpaceController::new(controller_coeffs),
            observer: StateSpaceObserver::new(observer_coeffs, plant_coeffs),
            feedback,
            reference: SVector::zeros(),
            u: SVector::zeros(),
            profile: None,
            profile_elapsed_s: 0.0,
        }
    }

    /// Set the reference directly, dropping any active profile.
    pub fn set_reference(&mut self, reference: SVector<f64, S>) {
        self.reference = reference;
        self.profile = None;
    }

    /// The current reference vector.
    pub fn reference(&self) -> &SVector<f64, S> {
        &self.reference
    }

    /// The observer's filtered state estimate.
    pub fn estimate(&self) -> &SVector<f64, S> {
        &self.observer.x_hat
    }

    /// The command computed on the last cycle.
    pub fn u(&self) -> &SVector<f64, I> {
        &self.u
    }

    /// Seed the observer estimate, e.g. after homing the mechanism.
    pub fn reset_estimate(&mut self, x: SVector<f64, S>) {
        self.observer.reset(x);
    }

    /// Run one control cycle from the measured state.
    ///
    /// The measured state is projected through the plant's output matrices
    /// to correct the observer with the previous command, the observer is
    /// predicted forward, and the control law runs on whichever state the
    /// configured feedback source selects.
    pub fn update(&mut self, measured_state: &SVector<f64, S>) -> SVector<f64, I> {
        let y = self.plant.output(measured_state, &self.u);
        self.observer.correct(&self.u, &y);
        self.observer.predict(&self.u);

        let state = match self.feedback {
            FeedbackSource::ObserverEstimate => self.observer.x_hat,
            FeedbackSource::RawMeasurement => *measured_state,
        };

        let u = self.controller.update(&state, &self.reference);
        self.u = u;

        u
    }
}

/// Profile-driven moves for position/velocity actuators.
impl<const I: usize, const O: usize> ActuatorCtrl<2, I, O> {
    /// Command a profiled move; the reference follows the profile on each
    /// call to [`ActuatorCtrl::update_profiled`].
    pub fn begin_profile(&mut self, profile: TrapezoidalProfile) {
        self.profile = Some(profile);
        self.profile_elapsed_s = 0.0;
    }

    /// True when no profile is active or the active one has completed.
    pub fn profile_finished(&self) -> bool {
        match self.profile {
            Some(ref p) => p.is_finished(self.profile_elapsed_s),
            None => true,
        }
    }

    /// Run one control cycle, first advancing the reference along the active
    /// profile by the measured cycle time.
    pub fn update_profiled(
        &mut self,
        dt_s: f64,
        measured_state: &SVector<f64, 2>,
    ) -> SVector<f64, I> {
        if let Some(profile) = self.profile {
            let ProfileState {
                position_m,
                velocity_ms,
            } = profile.sample(self.profile_elapsed_s);

            self.reference = Vector2::new(position_m, velocity_ms);
            self.profile_elapsed_s += dt_s;
        }

        self.update(measured_state)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
