//! VersionUp training API — router, state, and error types.
//!
//! The binary entry point lives in `main.rs`; this library surface exists so
//! integration tests can assemble the same routes against test state.

pub mod error;
pub mod routes;
pub mod state;
