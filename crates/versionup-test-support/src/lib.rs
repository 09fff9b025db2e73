//! Shared test mocks and utilities for the VersionUp training backend.

mod clock;
mod repository;
mod speech;

pub use clock::FixedClock;
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
pub use speech::RecordingSpeech;
