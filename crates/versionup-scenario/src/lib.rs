//! VersionUp — Training Scenarios bounded context.
//!
//! Owns the training-run state machine: scenario selection, assembly-drill
//! step progression, safety-inspection hazard clearing, narration cues, and
//! the completion/reset lifecycle.

pub mod application;
pub mod domain;
