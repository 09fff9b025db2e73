//! Command handlers for the Training Scenarios context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events,
//! and hand back the post-command render projection. Commands that resolve to
//! no-op transitions (re-entry, re-fixes, clicks outside a scenario) append
//! nothing and still succeed.

use uuid::Uuid;
use versionup_core::aggregate::AggregateRoot;
use versionup_core::clock::Clock;
use versionup_core::error::DomainError;
use versionup_core::event::DomainEvent;
use versionup_core::repository::{EventRepository, StoredEvent};

use crate::application::query_handlers::{self, RunView};
use crate::domain::aggregates::TrainingRun;
use crate::domain::commands::{
    ChangeLanguage, RecordInteraction, ResetScenario, SelectScenario, StartRun,
};
use crate::domain::events::{MessageKey, ScenarioEvent, ScenarioEventKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct CommandOutcome {
    /// Events appended by the command; empty for no-op transitions.
    pub events: Vec<StoredEvent>,
    /// Narration cue produced by the command, if any. When one interaction
    /// emits several cues (final hazard fix), this is the last one — the one
    /// that is spoken.
    pub narration: Option<MessageKey>,
    /// Render projection of the run after the command.
    pub view: RunView,
}

fn to_stored_event(event: &ScenarioEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Reconstitutes a `TrainingRun` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    run_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<TrainingRun, DomainError> {
    let mut run = TrainingRun::new(run_id);
    for stored in existing_events {
        let kind: ScenarioEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = ScenarioEvent {
            metadata: versionup_core::event::EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                causation_id: stored.causation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        run.apply(&event);
    }
    Ok(run)
}

/// Loads the event stream for a run that must already exist.
async fn load_existing(
    run_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let existing = repo.load_events(run_id).await?;
    if existing.is_empty() {
        return Err(DomainError::AggregateNotFound(run_id));
    }
    Ok(existing)
}

/// Persists the run's uncommitted events, applies them, and projects the
/// post-command view.
async fn commit(
    mut run: TrainingRun,
    repo: &dyn EventRepository,
) -> Result<CommandOutcome, DomainError> {
    let stored_events: Vec<StoredEvent> = run
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    let narration = run
        .uncommitted_events()
        .iter()
        .rev()
        .find_map(|event| event.kind.narration_key());

    if stored_events.is_empty() {
        tracing::debug!(run_id = %run.aggregate_id(), "command resolved to a no-op transition");
    } else {
        repo.append_events(run.aggregate_id(), run.version(), &stored_events)
            .await?;
        for event in run.uncommitted_events().to_vec() {
            run.apply(&event);
        }
        run.clear_uncommitted_events();
    }

    Ok(CommandOutcome {
        events: stored_events,
        narration,
        view: query_handlers::view_of(&run),
    })
}

/// Handles the `StartRun` command: creates the run's event stream.
///
/// # Errors
///
/// Returns `DomainError` if the run already exists or appending fails.
pub async fn handle_start_run(
    command: &StartRun,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<CommandOutcome, DomainError> {
    let existing_events = repo.load_events(command.run_id).await?;
    let mut run = reconstitute(command.run_id, &existing_events)?;

    run.start(command.language, command.correlation_id, clock)?;

    commit(run, repo).await
}

/// Handles the `SelectScenario` command.
///
/// Selecting while a scenario is active is a silent no-op that appends
/// nothing.
///
/// # Errors
///
/// Returns `DomainError` if the run does not exist or persistence fails.
pub async fn handle_select_scenario(
    command: &SelectScenario,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<CommandOutcome, DomainError> {
    let existing_events = load_existing(command.run_id, repo).await?;
    let mut run = reconstitute(command.run_id, &existing_events)?;

    run.select_scenario(command.scenario, command.correlation_id, clock);

    commit(run, repo).await
}

/// Handles the `RecordInteraction` command: the controller's only
/// interaction input. Invalid progression never errors; it either records a
/// rejection event or appends nothing.
///
/// # Errors
///
/// Returns `DomainError` if the run does not exist or persistence fails.
pub async fn handle_record_interaction(
    command: &RecordInteraction,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<CommandOutcome, DomainError> {
    let existing_events = load_existing(command.run_id, repo).await?;
    let mut run = reconstitute(command.run_id, &existing_events)?;

    run.interact(&command.target_id, command.correlation_id, clock);

    commit(run, repo).await
}

/// Handles the `ChangeLanguage` command.
///
/// # Errors
///
/// Returns `DomainError` if the run does not exist or persistence fails.
pub async fn handle_change_language(
    command: &ChangeLanguage,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<CommandOutcome, DomainError> {
    let existing_events = load_existing(command.run_id, repo).await?;
    let mut run = reconstitute(command.run_id, &existing_events)?;

    run.change_language(command.language, command.correlation_id, clock);

    commit(run, repo).await
}

/// Handles the `ResetScenario` command fired by the deferred reset task.
/// A no-op unless the active scenario has completed.
///
/// # Errors
///
/// Returns `DomainError` if the run does not exist or persistence fails.
pub async fn handle_reset_scenario(
    command: &ResetScenario,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<CommandOutcome, DomainError> {
    let existing_events = load_existing(command.run_id, repo).await?;
    let mut run = reconstitute(command.run_id, &existing_events)?;

    run.reset(command.correlation_id, clock);

    commit(run, repo).await
}
