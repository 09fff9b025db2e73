//! Domain events for the Training Scenarios context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use versionup_core::event::{DomainEvent, EventMetadata};
use versionup_core::locale::Language;

/// The two guided training flows a learner can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Ordered three-object assembly sequence.
    AssemblyDrill,
    /// Unordered hazard-clearing on the tank.
    SafetyInspection,
}

impl ScenarioKind {
    /// Stable identifier used in views and API payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::AssemblyDrill => "assembly_drill",
            ScenarioKind::SafetyInspection => "safety_inspection",
        }
    }
}

/// Progress cursor within the assembly drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillStep {
    /// Waiting for the red cube.
    AwaitRed,
    /// Waiting for the green sphere.
    AwaitGreen,
    /// Waiting for the blue cone.
    AwaitBlue,
    /// Sequence finished, awaiting the deferred reset.
    Complete,
}

impl DrillStep {
    /// Integer step counter exposed to the render projection (1..=4).
    #[must_use]
    pub fn step_number(self) -> u8 {
        match self {
            DrillStep::AwaitRed => 1,
            DrillStep::AwaitGreen => 2,
            DrillStep::AwaitBlue => 3,
            DrillStep::Complete => 4,
        }
    }

    /// The object id that advances the drill from this step, if any.
    #[must_use]
    pub fn expected_target(self) -> Option<&'static str> {
        match self {
            DrillStep::AwaitRed => Some("red"),
            DrillStep::AwaitGreen => Some("green"),
            DrillStep::AwaitBlue => Some("blue"),
            DrillStep::Complete => None,
        }
    }
}

/// A single fixable danger in the safety-inspection scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hazard {
    /// Chemical fire at the tank base.
    Fire,
    /// Gas leak on the upper pipe joint.
    Leak,
    /// Loose valve on the tank face.
    Valve,
}

impl Hazard {
    /// All hazards, in presentation order.
    pub const ALL: [Hazard; 3] = [Hazard::Fire, Hazard::Leak, Hazard::Valve];

    /// Stable identifier; doubles as the interaction target id.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Hazard::Fire => "fire",
            Hazard::Leak => "leak",
            Hazard::Valve => "valve",
        }
    }

    /// Maps an interaction target id to a hazard, if it names one.
    #[must_use]
    pub fn from_target_id(target_id: &str) -> Option<Hazard> {
        match target_id {
            "fire" => Some(Hazard::Fire),
            "leak" => Some(Hazard::Leak),
            "valve" => Some(Hazard::Valve),
            _ => None,
        }
    }
}

/// Narration message keys, resolved against the localization catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    /// Greeting shown while no scenario is active.
    Welcome,
    /// Assembly drill started.
    DrillStart,
    /// Red cube accepted; green sphere is next.
    CorrectGreen,
    /// Green sphere accepted; blue cone is next.
    CorrectBlue,
    /// Assembly drill finished.
    DrillComplete,
    /// Wrong object activated.
    Incorrect,
    /// Scenario reset back to selection.
    Reset,
    /// Safety inspection started.
    InspectionStart,
    /// All hazards neutralized.
    InspectionComplete,
    /// Fire extinguished.
    FireFixed,
    /// Gas leak sealed.
    LeakFixed,
    /// Valve tightened.
    ValveFixed,
}

impl MessageKey {
    /// Catalog lookup key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::Welcome => "welcome",
            MessageKey::DrillStart => "drill_start",
            MessageKey::CorrectGreen => "correct_green",
            MessageKey::CorrectBlue => "correct_blue",
            MessageKey::DrillComplete => "drill_complete",
            MessageKey::Incorrect => "incorrect",
            MessageKey::Reset => "reset",
            MessageKey::InspectionStart => "inspection_start",
            MessageKey::InspectionComplete => "inspection_complete",
            MessageKey::FireFixed => "fire_fixed",
            MessageKey::LeakFixed => "leak_fixed",
            MessageKey::ValveFixed => "valve_fixed",
        }
    }
}

/// Emitted when a learner demo run is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStarted {
    /// The run identifier.
    pub run_id: Uuid,
    /// Narration language selected at start.
    pub language: Language,
}

/// Emitted when the learner switches narration language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageChanged {
    /// The run identifier.
    pub run_id: Uuid,
    /// The newly selected language.
    pub language: Language,
}

/// Emitted when a scenario is entered from the idle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSelected {
    /// The run identifier.
    pub run_id: Uuid,
    /// The scenario that was entered.
    pub scenario: ScenarioKind,
}

/// Emitted when a correct drill object advances the sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepAdvanced {
    /// The run identifier.
    pub run_id: Uuid,
    /// The object the learner activated.
    pub target_id: String,
    /// The step the drill advanced to.
    pub step: DrillStep,
}

/// Emitted when a wrong object is activated during the drill.
///
/// Recorded for training analytics; never changes progression state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRejected {
    /// The run identifier.
    pub run_id: Uuid,
    /// The object the learner activated.
    pub target_id: String,
}

/// Emitted when an unresolved hazard is fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardResolved {
    /// The run identifier.
    pub run_id: Uuid,
    /// The hazard that was fixed.
    pub hazard: Hazard,
}

/// Emitted exactly once when the active scenario's goal is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCompleted {
    /// The run identifier.
    pub run_id: Uuid,
    /// The scenario that completed.
    pub scenario: ScenarioKind,
}

/// Emitted when the deferred reset returns the run to idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReset {
    /// The run identifier.
    pub run_id: Uuid,
}

/// Event type identifier for [`RunStarted`].
pub const RUN_STARTED_EVENT_TYPE: &str = "training.run_started";

/// Event type identifier for [`LanguageChanged`].
pub const LANGUAGE_CHANGED_EVENT_TYPE: &str = "training.language_changed";

/// Event type identifier for [`ScenarioSelected`].
pub const SCENARIO_SELECTED_EVENT_TYPE: &str = "training.scenario_selected";

/// Event type identifier for [`StepAdvanced`].
pub const STEP_ADVANCED_EVENT_TYPE: &str = "training.step_advanced";

/// Event type identifier for [`InteractionRejected`].
pub const INTERACTION_REJECTED_EVENT_TYPE: &str = "training.interaction_rejected";

/// Event type identifier for [`HazardResolved`].
pub const HAZARD_RESOLVED_EVENT_TYPE: &str = "training.hazard_resolved";

/// Event type identifier for [`ScenarioCompleted`].
pub const SCENARIO_COMPLETED_EVENT_TYPE: &str = "training.scenario_completed";

/// Event type identifier for [`ScenarioReset`].
pub const SCENARIO_RESET_EVENT_TYPE: &str = "training.scenario_reset";

/// Event payload variants for the Training Scenarios context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioEventKind {
    /// A learner demo run has been created.
    RunStarted(RunStarted),
    /// The narration language has changed.
    LanguageChanged(LanguageChanged),
    /// A scenario has been entered.
    ScenarioSelected(ScenarioSelected),
    /// The drill advanced one step.
    StepAdvanced(StepAdvanced),
    /// A wrong object was activated.
    InteractionRejected(InteractionRejected),
    /// A hazard was fixed.
    HazardResolved(HazardResolved),
    /// The active scenario completed.
    ScenarioCompleted(ScenarioCompleted),
    /// The run returned to idle.
    ScenarioReset(ScenarioReset),
}

impl ScenarioEventKind {
    /// Returns the event type name for this variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            ScenarioEventKind::RunStarted(_) => RUN_STARTED_EVENT_TYPE,
            ScenarioEventKind::LanguageChanged(_) => LANGUAGE_CHANGED_EVENT_TYPE,
            ScenarioEventKind::ScenarioSelected(_) => SCENARIO_SELECTED_EVENT_TYPE,
            ScenarioEventKind::StepAdvanced(_) => STEP_ADVANCED_EVENT_TYPE,
            ScenarioEventKind::InteractionRejected(_) => INTERACTION_REJECTED_EVENT_TYPE,
            ScenarioEventKind::HazardResolved(_) => HAZARD_RESOLVED_EVENT_TYPE,
            ScenarioEventKind::ScenarioCompleted(_) => SCENARIO_COMPLETED_EVENT_TYPE,
            ScenarioEventKind::ScenarioReset(_) => SCENARIO_RESET_EVENT_TYPE,
        }
    }

    /// The narration cue this transition emits, if any.
    ///
    /// Every side-effecting transition carries exactly one key; bookkeeping
    /// events (language changes) carry none.
    #[must_use]
    pub fn narration_key(&self) -> Option<MessageKey> {
        match self {
            ScenarioEventKind::RunStarted(_) => Some(MessageKey::Welcome),
            ScenarioEventKind::LanguageChanged(_) => None,
            ScenarioEventKind::ScenarioSelected(payload) => Some(match payload.scenario {
                ScenarioKind::AssemblyDrill => MessageKey::DrillStart,
                ScenarioKind::SafetyInspection => MessageKey::InspectionStart,
            }),
            ScenarioEventKind::StepAdvanced(payload) => match payload.step {
                DrillStep::AwaitGreen => Some(MessageKey::CorrectGreen),
                DrillStep::AwaitBlue => Some(MessageKey::CorrectBlue),
                DrillStep::AwaitRed | DrillStep::Complete => None,
            },
            ScenarioEventKind::InteractionRejected(_) => Some(MessageKey::Incorrect),
            ScenarioEventKind::HazardResolved(payload) => Some(match payload.hazard {
                Hazard::Fire => MessageKey::FireFixed,
                Hazard::Leak => MessageKey::LeakFixed,
                Hazard::Valve => MessageKey::ValveFixed,
            }),
            ScenarioEventKind::ScenarioCompleted(payload) => Some(match payload.scenario {
                ScenarioKind::AssemblyDrill => MessageKey::DrillComplete,
                ScenarioKind::SafetyInspection => MessageKey::InspectionComplete,
            }),
            ScenarioEventKind::ScenarioReset(_) => Some(MessageKey::Reset),
        }
    }
}

/// Domain event envelope for the Training Scenarios context.
#[derive(Debug, Clone)]
pub struct ScenarioEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ScenarioEventKind,
}

impl DomainEvent for ScenarioEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ScenarioEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
