//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use versionup_core::clock::Clock;
use versionup_core::repository::EventRepository;
use versionup_narration::{MessageCatalog, SpeechOutput};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to timestamp domain events.
    pub clock: Arc<dyn Clock>,
    /// Event store for training runs.
    pub event_repository: Arc<dyn EventRepository>,
    /// Localized narration catalog.
    pub catalog: Arc<MessageCatalog>,
    /// Fire-and-forget narration delivery.
    pub speech: Arc<dyn SpeechOutput>,
    /// Delay before a completed scenario auto-resets to idle.
    pub reset_delay: Duration,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        catalog: Arc<MessageCatalog>,
        speech: Arc<dyn SpeechOutput>,
        reset_delay: Duration,
    ) -> Self {
        Self {
            clock,
            event_repository,
            catalog,
            speech,
            reset_delay,
        }
    }
}
