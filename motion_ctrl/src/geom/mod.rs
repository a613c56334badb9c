//! # Planar geometry
//!
//! Field-relative rigid-transform geometry shared by the trajectory
//! generator, the tracking controller and localisation.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod pose;
mod rect;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use pose::*;
pub use rect::*;
