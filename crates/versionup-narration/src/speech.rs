//! Speech-output port.

/// Fire-and-forget narration delivery boundary.
///
/// Implementations must not block and must swallow delivery failures; the
/// scenario controller never awaits or inspects the outcome.
pub trait SpeechOutput: Send + Sync {
    /// Speaks the given text in the given BCP-47 locale.
    fn speak(&self, text: &str, locale: &str);
}

/// Default speech output that logs the utterance.
///
/// The real text-to-speech engine lives on the learner's device; the server
/// side only records what was narrated.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSpeech;

impl SpeechOutput for TracingSpeech {
    fn speak(&self, text: &str, locale: &str) {
        tracing::info!(locale, text, "narration");
    }
}
