//! Commands for the Training Scenarios context.

use uuid::Uuid;
use versionup_core::command::Command;
use versionup_core::locale::Language;

use super::events::ScenarioKind;

/// Command to create a new learner demo run.
#[derive(Debug, Clone)]
pub struct StartRun {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The run identifier.
    pub run_id: Uuid,
    /// Narration language for the run.
    pub language: Language,
}

impl Command for StartRun {
    fn command_type(&self) -> &'static str {
        "training.start_run"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to enter a scenario from the idle state.
#[derive(Debug, Clone)]
pub struct SelectScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The run identifier.
    pub run_id: Uuid,
    /// The scenario to enter.
    pub scenario: ScenarioKind,
}

impl Command for SelectScenario {
    fn command_type(&self) -> &'static str {
        "training.select_scenario"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command carrying a learner interaction forwarded by the scene renderer.
#[derive(Debug, Clone)]
pub struct RecordInteraction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The run identifier.
    pub run_id: Uuid,
    /// The scene object the learner activated.
    pub target_id: String,
}

impl Command for RecordInteraction {
    fn command_type(&self) -> &'static str {
        "training.record_interaction"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to switch the narration language mid-run.
#[derive(Debug, Clone)]
pub struct ChangeLanguage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The run identifier.
    pub run_id: Uuid,
    /// The newly selected language.
    pub language: Language,
}

impl Command for ChangeLanguage {
    fn command_type(&self) -> &'static str {
        "training.change_language"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command fired by the deferred reset task after scenario completion.
#[derive(Debug, Clone)]
pub struct ResetScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The run identifier.
    pub run_id: Uuid,
}

impl Command for ResetScenario {
    fn command_type(&self) -> &'static str {
        "training.reset_scenario"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
