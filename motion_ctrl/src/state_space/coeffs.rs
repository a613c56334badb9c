//! Coefficient sets for the state-space triple

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{SMatrix, SVector};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Matrices of a discrete-time linear plant
/// `x' = Ax + Bu`, `y = Cx + Du`, with `S` states, `I` inputs and `O`
/// outputs.
#[derive(Debug, Clone, Copy)]
pub struct StateSpacePlantCoeffs<const S: usize, const I: usize, const O: usize> {
    pub a: SMatrix<f64, S, S>,
    pub b: SMatrix<f64, S, I>,
    pub c: SMatrix<f64, O, S>,
    pub d: SMatrix<f64, O, I>,
}

/// Gains of a state feedback + feedforward control law
/// `u = Kff·r - K·x`, elementwise-clamped to `[u_min, u_max]`.
#[derive(Debug, Clone, Copy)]
pub struct StateSpaceControllerCoeffs<const S: usize, const I: usize> {
    pub k: SMatrix<f64, I, S>,
    pub kff: SMatrix<f64, I, S>,
    pub u_min: SVector<f64, I>,
    pub u_max: SVector<f64, I>,
}

/// Correction gain of a Luenberger observer
/// `x̂' = A·x̂ + B·u + L·(y - (C·x̂ + D·u))`.
#[derive(Debug, Clone, Copy)]
pub struct StateSpaceObserverCoeffs<const S: usize, const O: usize> {
    pub l: SMatrix<f64, S, O>,
}
