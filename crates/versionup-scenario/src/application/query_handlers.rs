//! Query handlers for the Training Scenarios context.
//!
//! Reconstitutes the run from stored events and returns the read-only
//! render projection consumed by the scene renderer: guide message key,
//! scenario/step state, and per-object visibility/targetability.

use serde::Serialize;
use uuid::Uuid;
use versionup_core::error::DomainError;
use versionup_core::locale::Language;
use versionup_core::repository::EventRepository;

use crate::application::command_handlers;
use crate::domain::aggregates::{ScenarioPhase, TrainingRun};
use crate::domain::events::{DrillStep, Hazard, MessageKey, ScenarioKind};

/// Render state of a single scene object.
#[derive(Debug, Clone, Serialize)]
pub struct SceneObjectView {
    /// Stable object identifier (doubles as the interaction target id).
    pub id: String,
    /// Whether the renderer should show the object.
    pub visible: bool,
    /// Whether activating the object can advance the scenario.
    pub targetable: bool,
    /// Whether the object has already been handled (dimmed/removed).
    pub cleared: bool,
}

/// Read-only projection of a training run.
#[derive(Debug, Serialize)]
pub struct RunView {
    /// The run identifier.
    pub run_id: Uuid,
    /// Narration language.
    pub language: Language,
    /// BCP-47 tag for the speech output device.
    pub speech_locale: &'static str,
    /// Active scenario: `none`, `assembly_drill`, or `safety_inspection`.
    pub scenario: String,
    /// Drill progress cursor (0 outside the drill).
    pub step: u8,
    /// Key of the guide message to display/speak.
    pub guide_message_key: MessageKey,
    /// Whether the active scenario has reached its goal.
    pub scenario_complete: bool,
    /// Per-object render state for the active scene.
    pub objects: Vec<SceneObjectView>,
    /// Current version (event count).
    pub version: i64,
}

fn drill_object(id: &str, ordinal: u8, step: DrillStep) -> SceneObjectView {
    SceneObjectView {
        id: id.to_owned(),
        visible: true,
        targetable: step.expected_target() == Some(id),
        cleared: step.step_number() > ordinal,
    }
}

fn project_objects(run: &TrainingRun) -> Vec<SceneObjectView> {
    match run.phase {
        ScenarioPhase::Idle => [ScenarioKind::AssemblyDrill, ScenarioKind::SafetyInspection]
            .into_iter()
            .map(|scenario| SceneObjectView {
                id: scenario.as_str().to_owned(),
                visible: true,
                targetable: true,
                cleared: false,
            })
            .collect(),
        ScenarioPhase::Drill(step) => vec![
            drill_object("red", 1, step),
            drill_object("green", 2, step),
            drill_object("blue", 3, step),
        ],
        ScenarioPhase::Inspection(hazards) => Hazard::ALL
            .into_iter()
            .map(|hazard| {
                let resolved = hazards.is_resolved(hazard);
                SceneObjectView {
                    id: hazard.as_str().to_owned(),
                    visible: !resolved,
                    targetable: !resolved,
                    cleared: resolved,
                }
            })
            .collect(),
    }
}

/// Projects the render view from an already-reconstituted run.
pub(crate) fn view_of(run: &TrainingRun) -> RunView {
    let scenario = run
        .scenario_kind()
        .map_or("none", ScenarioKind::as_str)
        .to_owned();

    RunView {
        run_id: run.id,
        language: run.language(),
        speech_locale: run.language().speech_locale(),
        scenario,
        step: run.step(),
        guide_message_key: run.guide_message_key(),
        scenario_complete: run.scenario_complete(),
        objects: project_objects(run),
        version: run.version,
    }
}

/// Retrieves a run's render projection by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_run_by_id(
    run_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<RunView, DomainError> {
    let stored_events = repo.load_events(run_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(run_id));
    }
    let run = command_handlers::reconstitute(run_id, &stored_events)?;
    Ok(view_of(&run))
}
