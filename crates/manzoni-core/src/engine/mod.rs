//! # Engine Module
//!
//! The tracking engine: the loop that moves a beam through a beamline, turn after
//! turn and element after element.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Turn count, zero-strength policy, kick seed and the
//!   record layout, built in code or loaded from TOML
//! - **Tracking Loop** ([`tracker`]) - Validation of the whole line before the first
//!   particle moves, then the turn/element loop with aperture filtering
//! - **Instrumentation** ([`observer`], [`observers`]) - The callback contract and the
//!   ready-made beam and losses recorders
//! - **Error Handling** ([`error`]) - The tracking error taxonomy
//!
//! A run either fails during validation, leaving the caller's beam untouched, or runs
//! to completion. The beam is mutated in place; observers only ever see it on loan.

pub mod config;
pub mod error;
pub mod observer;
pub mod observers;
pub mod tracker;
