//! Test speech output — records utterances instead of speaking them.

use std::sync::Mutex;

use versionup_narration::SpeechOutput;

/// A speech output that captures every `(text, locale)` pair it is asked to
/// speak, for assertion in tests.
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    utterances: Mutex<Vec<(String, String)>>,
}

impl RecordingSpeech {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded utterances.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn utterances(&self) -> Vec<(String, String)> {
        self.utterances.lock().unwrap().clone()
    }
}

impl SpeechOutput for RecordingSpeech {
    fn speak(&self, text: &str, locale: &str) {
        self.utterances
            .lock()
            .unwrap()
            .push((text.to_owned(), locale.to_owned()));
    }
}
