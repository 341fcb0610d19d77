//! Utility functions shared by the models and the optics.
//!
//! This module provides the reproducible random sampling used to generate beams and to
//! draw stochastic kicks.

pub mod sampling;
