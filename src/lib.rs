//----------------------------------------
// Root lib
//----------------------------------------
//! The purpose of this library is to simulate two-arm clinical trials as a
//! discrete-time multi-state process (no progression, progressed, censored,
//! dead) and to derive survival statistics from the simulated cohort:
//! progression-free survival and overall survival hazard ratios via Cox
//! proportional-hazards regression, and Kaplan-Meier survival curves per
//! arm. Plotting and any interactive layer are left to the caller.

/// This module houses the public API for running simulations and computing
/// hazard ratios and Kaplan-Meier curves
pub mod compute;
mod dataset;
/// This module contains error types
pub mod error;
mod participant;
mod study;
mod survival;
