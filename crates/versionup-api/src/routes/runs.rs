//! Routes for training runs: the scene renderer's command and query surface.
//!
//! The renderer forwards scenario selection and object activations here, and
//! reads back the render projection (guide message, object states). Narration
//! is spoken fire-and-forget; a completion event schedules the one-shot
//! deferred reset.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use versionup_core::locale::Language;

use versionup_scenario::application::command_handlers::{self, CommandOutcome};
use versionup_scenario::application::query_handlers::{self, RunView};
use versionup_scenario::domain::commands;
use versionup_scenario::domain::events::{SCENARIO_COMPLETED_EVENT_TYPE, ScenarioKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct StartRunRequest {
    /// Narration language; defaults to English.
    #[serde(default)]
    pub language: Option<Language>,
}

/// Request body for POST /{run_id}/scenario.
#[derive(Debug, Deserialize)]
pub struct SelectScenarioRequest {
    /// The scenario to enter.
    pub scenario: ScenarioKind,
}

/// Request body for POST /{run_id}/interactions.
#[derive(Debug, Deserialize)]
pub struct InteractionRequest {
    /// The scene object the learner activated.
    pub target_id: String,
}

/// Request body for POST /{run_id}/language.
#[derive(Debug, Deserialize)]
pub struct ChangeLanguageRequest {
    /// The newly selected language.
    pub language: Language,
}

/// Response body returned after a command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// IDs of the domain events produced and persisted; empty when the
    /// command resolved to a no-op transition.
    pub event_ids: Vec<Uuid>,
    /// The guide message to display, resolved for the run's language.
    pub guide_message: String,
    /// Render projection of the run after the command.
    pub run: RunView,
}

/// Response body for GET /{run_id}.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    /// The guide message to display, resolved for the run's language.
    pub guide_message: String,
    /// Render projection of the run.
    pub run: RunView,
}

/// Speaks the command's narration cue (if any), schedules the deferred reset
/// on completion, and shapes the response.
fn respond(state: &AppState, outcome: CommandOutcome) -> Json<CommandResponse> {
    if let Some(key) = outcome.narration {
        let text = state.catalog.resolve(key.as_str(), outcome.view.language);
        state.speech.speak(&text, outcome.view.speech_locale);
    }

    if outcome
        .events
        .iter()
        .any(|e| e.event_type == SCENARIO_COMPLETED_EVENT_TYPE)
    {
        schedule_reset(state.clone(), outcome.view.run_id);
    }

    let guide_message = state
        .catalog
        .resolve(outcome.view.guide_message_key.as_str(), outcome.view.language);
    let event_ids = outcome.events.iter().map(|e| e.event_id).collect();

    Json(CommandResponse {
        event_ids,
        guide_message,
        run: outcome.view,
    })
}

/// One-shot deferred reset: after the configured delay the run returns to
/// idle and the reset narration is spoken. Never cancelled — scenario entry
/// is blocked until the reset lands, so nothing can race it.
fn schedule_reset(state: AppState, run_id: Uuid) {
    tokio::spawn(async move {
        tokio::time::sleep(state.reset_delay).await;

        let command = commands::ResetScenario {
            correlation_id: Uuid::new_v4(),
            run_id,
        };

        match command_handlers::handle_reset_scenario(
            &command,
            state.clock.as_ref(),
            &*state.event_repository,
        )
        .await
        {
            Ok(outcome) => {
                if let Some(key) = outcome.narration {
                    let text = state.catalog.resolve(key.as_str(), outcome.view.language);
                    state.speech.speak(&text, outcome.view.speech_locale);
                }
            }
            Err(err) => {
                warn!(%run_id, error = %err, "deferred scenario reset failed");
            }
        }
    });
}

/// POST /
#[instrument(skip(state, request))]
async fn start_run(
    State(state): State<AppState>,
    Json(request): Json<StartRunRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartRun {
        correlation_id: Uuid::new_v4(),
        run_id: Uuid::new_v4(),
        language: request.language.unwrap_or_default(),
    };

    info!(correlation_id = %command.correlation_id, run_id = %command.run_id, "handling start_run command");

    let outcome =
        command_handlers::handle_start_run(&command, state.clock.as_ref(), &*state.event_repository)
            .await?;

    Ok(respond(&state, outcome))
}

/// POST /{run_id}/scenario
#[instrument(skip(state, request), fields(run_id = %run_id))]
async fn select_scenario(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    Json(request): Json<SelectScenarioRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SelectScenario {
        correlation_id: Uuid::new_v4(),
        run_id,
        scenario: request.scenario,
    };

    info!(correlation_id = %command.correlation_id, "handling select_scenario command");

    let outcome = command_handlers::handle_select_scenario(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(respond(&state, outcome))
}

/// POST /{run_id}/interactions
#[instrument(skip(state, request), fields(run_id = %run_id, target_id = %request.target_id))]
async fn record_interaction(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    Json(request): Json<InteractionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RecordInteraction {
        correlation_id: Uuid::new_v4(),
        run_id,
        target_id: request.target_id,
    };

    info!(correlation_id = %command.correlation_id, "handling record_interaction command");

    let outcome = command_handlers::handle_record_interaction(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(respond(&state, outcome))
}

/// POST /{run_id}/language
#[instrument(skip(state, request), fields(run_id = %run_id))]
async fn change_language(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    Json(request): Json<ChangeLanguageRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ChangeLanguage {
        correlation_id: Uuid::new_v4(),
        run_id,
        language: request.language,
    };

    info!(correlation_id = %command.correlation_id, "handling change_language command");

    let outcome = command_handlers::handle_change_language(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(respond(&state, outcome))
}

/// GET /{run_id}
#[instrument(skip(state), fields(run_id = %run_id))]
async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Result<Json<RunResponse>, ApiError> {
    let view = query_handlers::get_run_by_id(run_id, &*state.event_repository).await?;

    let guide_message = state
        .catalog
        .resolve(view.guide_message_key.as_str(), view.language);

    Ok(Json(RunResponse {
        guide_message,
        run: view,
    }))
}

/// Returns the router for training runs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_run))
        .route("/{run_id}", get(get_run))
        .route("/{run_id}/scenario", post(select_scenario))
        .route("/{run_id}/interactions", post(record_interaction))
        .route("/{run_id}/language", post(change_language))
}
