//! VersionUp — Narration & Localization.
//!
//! Provides the localized message catalog narration keys are resolved
//! against, and the fire-and-forget speech-output port. Neither ever fails a
//! scenario transition: missing strings fall back, and speech delivery is
//! not the controller's concern.

mod catalog;
mod speech;

pub use catalog::{CatalogError, MessageCatalog};
pub use speech::{SpeechOutput, TracingSpeech};
