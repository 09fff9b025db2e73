//! Aggregate roots for the Training Scenarios context.

use uuid::Uuid;
use versionup_core::aggregate::AggregateRoot;
use versionup_core::clock::Clock;
use versionup_core::error::DomainError;
use versionup_core::event::EventMetadata;
use versionup_core::locale::Language;

use super::events::{
    DrillStep, Hazard, HazardResolved, InteractionRejected, LanguageChanged, MessageKey,
    RunStarted, ScenarioCompleted, ScenarioEvent, ScenarioEventKind, ScenarioKind, ScenarioReset,
    ScenarioSelected, StepAdvanced,
};

/// Resolved-flags for the three safety-inspection hazards.
///
/// All flags start unresolved on scenario entry; the scenario completes when
/// every flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HazardSet {
    fire: bool,
    leak: bool,
    valve: bool,
}

impl HazardSet {
    /// Whether the given hazard has been fixed.
    #[must_use]
    pub fn is_resolved(self, hazard: Hazard) -> bool {
        match hazard {
            Hazard::Fire => self.fire,
            Hazard::Leak => self.leak,
            Hazard::Valve => self.valve,
        }
    }

    /// Whether every hazard has been fixed.
    #[must_use]
    pub fn all_resolved(self) -> bool {
        self.fire && self.leak && self.valve
    }

    fn resolve(&mut self, hazard: Hazard) {
        match hazard {
            Hazard::Fire => self.fire = true,
            Hazard::Leak => self.leak = true,
            Hazard::Valve => self.valve = true,
        }
    }
}

/// Which training flow is running, with its scenario-local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioPhase {
    /// No scenario active; selector objects are shown.
    Idle,
    /// Assembly drill at the given step.
    Drill(DrillStep),
    /// Safety inspection with the given hazard flags.
    Inspection(HazardSet),
}

/// The aggregate root for a learner demo run.
///
/// The interaction state machine is total over its input alphabet: wrong
/// objects, re-entry attempts, re-fixed hazards, and unknown targets all map
/// to explicit no-op or rejection transitions, never to errors. Errors exist
/// only at the lifecycle boundary (starting a run twice).
#[derive(Debug)]
pub struct TrainingRun {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Active scenario and its local state.
    pub(crate) phase: ScenarioPhase,
    /// Narration language for the run.
    pub(crate) language: Language,
    /// Key of the most recent narration, for the render projection.
    pub(crate) guide_key: MessageKey,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<ScenarioEvent>,
}

impl TrainingRun {
    /// Creates an empty run awaiting its `RunStarted` event.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            phase: ScenarioPhase::Idle,
            language: Language::default(),
            guide_key: MessageKey::Welcome,
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: ScenarioEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = ScenarioEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }

    /// Starts the run, producing a `RunStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the run has already started.
    pub fn start(
        &mut self,
        language: Language,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.version > 0 || !self.uncommitted_events.is_empty() {
            return Err(DomainError::Validation("run already started".to_owned()));
        }

        self.record(
            ScenarioEventKind::RunStarted(RunStarted {
                run_id: self.id,
                language,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Enters a scenario from idle.
    ///
    /// Selecting a scenario while one is active is a no-op: entry is only
    /// permitted from the idle state.
    pub fn select_scenario(
        &mut self,
        scenario: ScenarioKind,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        if self.phase != ScenarioPhase::Idle {
            return;
        }

        self.record(
            ScenarioEventKind::ScenarioSelected(ScenarioSelected {
                run_id: self.id,
                scenario,
            }),
            correlation_id,
            clock,
        );
    }

    /// Handles a learner interaction forwarded by the scene renderer.
    ///
    /// Interactions while idle are no-ops; drill and inspection interactions
    /// are routed to their respective transition tables.
    pub fn interact(&mut self, target_id: &str, correlation_id: Uuid, clock: &dyn Clock) {
        match self.phase {
            ScenarioPhase::Idle => {}
            ScenarioPhase::Drill(step) => {
                self.interact_drill(step, target_id, correlation_id, clock);
            }
            ScenarioPhase::Inspection(hazards) => {
                self.interact_inspection(hazards, target_id, correlation_id, clock);
            }
        }
    }

    fn interact_drill(
        &mut self,
        step: DrillStep,
        target_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        match (step, target_id) {
            (DrillStep::AwaitRed, "red") => {
                self.record(
                    ScenarioEventKind::StepAdvanced(StepAdvanced {
                        run_id: self.id,
                        target_id: target_id.to_owned(),
                        step: DrillStep::AwaitGreen,
                    }),
                    correlation_id,
                    clock,
                );
            }
            (DrillStep::AwaitGreen, "green") => {
                self.record(
                    ScenarioEventKind::StepAdvanced(StepAdvanced {
                        run_id: self.id,
                        target_id: target_id.to_owned(),
                        step: DrillStep::AwaitBlue,
                    }),
                    correlation_id,
                    clock,
                );
            }
            (DrillStep::AwaitBlue, "blue") => {
                self.record(
                    ScenarioEventKind::ScenarioCompleted(ScenarioCompleted {
                        run_id: self.id,
                        scenario: ScenarioKind::AssemblyDrill,
                    }),
                    correlation_id,
                    clock,
                );
            }
            // Identity transition while the deferred reset is pending.
            (DrillStep::Complete, _) => {}
            // Out-of-order or wrong-object clicks never advance the step.
            _ => {
                self.record(
                    ScenarioEventKind::InteractionRejected(InteractionRejected {
                        run_id: self.id,
                        target_id: target_id.to_owned(),
                    }),
                    correlation_id,
                    clock,
                );
            }
        }
    }

    fn interact_inspection(
        &mut self,
        hazards: HazardSet,
        target_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        let Some(hazard) = Hazard::from_target_id(target_id) else {
            return;
        };
        // Re-fixing a resolved hazard is idempotent: no event, no narration.
        if hazards.is_resolved(hazard) {
            return;
        }

        self.record(
            ScenarioEventKind::HazardResolved(HazardResolved {
                run_id: self.id,
                hazard,
            }),
            correlation_id,
            clock,
        );

        let mut after = hazards;
        after.resolve(hazard);
        if after.all_resolved() {
            self.record(
                ScenarioEventKind::ScenarioCompleted(ScenarioCompleted {
                    run_id: self.id,
                    scenario: ScenarioKind::SafetyInspection,
                }),
                correlation_id,
                clock,
            );
        }
    }

    /// Switches the narration language. Same-language changes are no-ops.
    pub fn change_language(&mut self, language: Language, correlation_id: Uuid, clock: &dyn Clock) {
        if self.language == language {
            return;
        }

        self.record(
            ScenarioEventKind::LanguageChanged(LanguageChanged {
                run_id: self.id,
                language,
            }),
            correlation_id,
            clock,
        );
    }

    /// Returns the run to idle after completion.
    ///
    /// The reset transition is the only path out of a completed scenario; it
    /// is a no-op unless the active scenario has reached its goal.
    pub fn reset(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        if !self.scenario_complete() {
            return;
        }

        self.record(
            ScenarioEventKind::ScenarioReset(ScenarioReset { run_id: self.id }),
            correlation_id,
            clock,
        );
    }

    /// Whether the active scenario has reached its completion condition.
    #[must_use]
    pub fn scenario_complete(&self) -> bool {
        match self.phase {
            ScenarioPhase::Drill(step) => step == DrillStep::Complete,
            ScenarioPhase::Inspection(hazards) => hazards.all_resolved(),
            ScenarioPhase::Idle => false,
        }
    }

    /// The active scenario, if any.
    #[must_use]
    pub fn scenario_kind(&self) -> Option<ScenarioKind> {
        match self.phase {
            ScenarioPhase::Idle => None,
            ScenarioPhase::Drill(_) => Some(ScenarioKind::AssemblyDrill),
            ScenarioPhase::Inspection(_) => Some(ScenarioKind::SafetyInspection),
        }
    }

    /// Integer progress cursor: 0 outside the drill, 1..=4 within it.
    #[must_use]
    pub fn step(&self) -> u8 {
        match self.phase {
            ScenarioPhase::Drill(step) => step.step_number(),
            ScenarioPhase::Idle | ScenarioPhase::Inspection(_) => 0,
        }
    }

    /// The hazard flags, while the safety inspection is active.
    #[must_use]
    pub fn hazards(&self) -> Option<HazardSet> {
        match self.phase {
            ScenarioPhase::Inspection(hazards) => Some(hazards),
            ScenarioPhase::Idle | ScenarioPhase::Drill(_) => None,
        }
    }

    /// Narration language for the run.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Key of the most recent narration.
    #[must_use]
    pub fn guide_message_key(&self) -> MessageKey {
        self.guide_key
    }
}

impl AggregateRoot for TrainingRun {
    type Event = ScenarioEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            ScenarioEventKind::RunStarted(payload) => {
                self.language = payload.language;
                self.phase = ScenarioPhase::Idle;
            }
            ScenarioEventKind::LanguageChanged(payload) => {
                self.language = payload.language;
            }
            ScenarioEventKind::ScenarioSelected(payload) => {
                self.phase = match payload.scenario {
                    ScenarioKind::AssemblyDrill => ScenarioPhase::Drill(DrillStep::AwaitRed),
                    ScenarioKind::SafetyInspection => {
                        ScenarioPhase::Inspection(HazardSet::default())
                    }
                };
            }
            ScenarioEventKind::StepAdvanced(payload) => {
                self.phase = ScenarioPhase::Drill(payload.step);
            }
            ScenarioEventKind::InteractionRejected(_) => {}
            ScenarioEventKind::HazardResolved(payload) => {
                if let ScenarioPhase::Inspection(ref mut hazards) = self.phase {
                    hazards.resolve(payload.hazard);
                }
            }
            ScenarioEventKind::ScenarioCompleted(payload) => {
                if payload.scenario == ScenarioKind::AssemblyDrill {
                    self.phase = ScenarioPhase::Drill(DrillStep::Complete);
                }
            }
            ScenarioEventKind::ScenarioReset(_) => {
                self.phase = ScenarioPhase::Idle;
            }
        }
        if let Some(key) = event.kind.narration_key() {
            self.guide_key = key;
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use versionup_core::aggregate::AggregateRoot;
    use versionup_core::event::DomainEvent;
    use versionup_test_support::FixedClock;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap())
    }

    /// Builds a started run with uncommitted events already applied and
    /// cleared, simulating persistence.
    fn started_run(language: Language) -> TrainingRun {
        let mut run = TrainingRun::new(Uuid::new_v4());
        run.start(language, Uuid::new_v4(), &fixed_clock()).unwrap();
        commit(&mut run);
        run
    }

    /// Applies and clears uncommitted events, as the handler layer does
    /// across command boundaries.
    fn commit(run: &mut TrainingRun) {
        for event in run.uncommitted_events().to_vec() {
            run.apply(&event);
        }
        run.clear_uncommitted_events();
    }

    fn interact(run: &mut TrainingRun, target_id: &str) {
        run.interact(target_id, Uuid::new_v4(), &fixed_clock());
        commit(run);
    }

    // --- start ---

    #[test]
    fn test_start_produces_run_started_event() {
        let run_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let mut run = TrainingRun::new(run_id);

        let result = run.start(Language::Fr, correlation_id, &fixed_clock());

        assert!(result.is_ok());
        let events = run.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "training.run_started");

        let meta = events[0].metadata();
        assert_eq!(meta.aggregate_id, run_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
    }

    #[test]
    fn test_start_twice_returns_validation_error() {
        let mut run = started_run(Language::En);

        let result = run.start(Language::En, Uuid::new_v4(), &fixed_clock());

        match result.unwrap_err() {
            DomainError::Validation(msg) => assert_eq!(msg, "run already started"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_run_started_sets_language_and_welcome() {
        let mut run = started_run(Language::Ar);

        assert_eq!(run.language(), Language::Ar);
        assert_eq!(run.phase, ScenarioPhase::Idle);
        assert_eq!(run.guide_message_key(), MessageKey::Welcome);
        assert_eq!(run.version, 1);
    }

    // --- scenario selection ---

    #[test]
    fn test_select_drill_from_idle_enters_await_red() {
        let mut run = started_run(Language::En);

        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());

        assert_eq!(run.uncommitted_events().len(), 1);
        assert_eq!(
            run.uncommitted_events()[0].event_type(),
            "training.scenario_selected"
        );
        commit(&mut run);
        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::AwaitRed));
        assert_eq!(run.step(), 1);
        assert_eq!(run.guide_message_key(), MessageKey::DrillStart);
    }

    #[test]
    fn test_select_inspection_resets_all_hazards() {
        let mut run = started_run(Language::En);

        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        let hazards = run.hazards().unwrap();
        for hazard in Hazard::ALL {
            assert!(!hazards.is_resolved(hazard));
        }
        assert_eq!(run.step(), 0);
        assert_eq!(run.guide_message_key(), MessageKey::InspectionStart);
    }

    #[test]
    fn test_select_while_scenario_active_is_noop() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
        assert_eq!(run.scenario_kind(), Some(ScenarioKind::AssemblyDrill));
    }

    // --- assembly drill ---

    #[test]
    fn test_drill_red_advances_to_await_green() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        run.interact("red", Uuid::new_v4(), &fixed_clock());

        let events = run.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "training.step_advanced");
        assert_eq!(events[0].kind.narration_key(), Some(MessageKey::CorrectGreen));
        commit(&mut run);
        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::AwaitGreen));
        assert_eq!(run.step(), 2);
    }

    #[test]
    fn test_drill_wrong_object_rejected_and_step_unchanged() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "red");

        // Blue is wrong while awaiting green.
        run.interact("blue", Uuid::new_v4(), &fixed_clock());

        let events = run.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "training.interaction_rejected");
        assert_eq!(events[0].kind.narration_key(), Some(MessageKey::Incorrect));
        commit(&mut run);
        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::AwaitGreen));
        assert_eq!(run.step(), 2);
        assert_eq!(run.guide_message_key(), MessageKey::Incorrect);
    }

    #[test]
    fn test_drill_full_sequence_completes() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        interact(&mut run, "red");
        interact(&mut run, "green");
        run.interact("blue", Uuid::new_v4(), &fixed_clock());

        let events = run.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "training.scenario_completed");
        commit(&mut run);
        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::Complete));
        assert_eq!(run.step(), 4);
        assert!(run.scenario_complete());
        assert_eq!(run.guide_message_key(), MessageKey::DrillComplete);
    }

    #[test]
    fn test_drill_step_is_monotonic_under_arbitrary_clicks() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        let clicks = [
            "blue", "green", "red", "red", "blue", "green", "valve", "green", "blue",
        ];
        let mut last_step = run.step();
        for target in clicks {
            interact(&mut run, target);
            assert!(run.step() >= last_step, "step regressed on {target}");
            last_step = run.step();
        }

        // Only the in-order subsequence red, green, blue advanced.
        assert_eq!(run.step(), 4);
    }

    #[test]
    fn test_drill_skipping_ahead_never_advances() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        interact(&mut run, "green");
        interact(&mut run, "blue");

        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::AwaitRed));
        assert_eq!(run.step(), 1);
    }

    #[test]
    fn test_drill_clicks_while_complete_are_identity() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "red");
        interact(&mut run, "green");
        interact(&mut run, "blue");

        run.interact("red", Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::Complete));
        assert_eq!(run.guide_message_key(), MessageKey::DrillComplete);
    }

    #[test]
    fn test_interact_while_idle_is_noop() {
        let mut run = started_run(Language::En);

        run.interact("red", Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
        assert_eq!(run.phase, ScenarioPhase::Idle);
    }

    // --- safety inspection ---

    #[test]
    fn test_fix_hazard_emits_hazard_narration() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        run.interact("leak", Uuid::new_v4(), &fixed_clock());

        let events = run.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "training.hazard_resolved");
        assert_eq!(events[0].kind.narration_key(), Some(MessageKey::LeakFixed));
        commit(&mut run);
        assert!(run.hazards().unwrap().is_resolved(Hazard::Leak));
        assert!(!run.scenario_complete());
    }

    #[test]
    fn test_refix_hazard_is_idempotent() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "leak");
        let hazards_before = run.hazards().unwrap();
        let version_before = run.version;

        run.interact("leak", Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
        assert_eq!(run.hazards().unwrap(), hazards_before);
        assert_eq!(run.version, version_before);
    }

    #[test]
    fn test_unknown_hazard_is_noop() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        run.interact("red", Uuid::new_v4(), &fixed_clock());
        run.interact("sprinkler", Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
    }

    #[test]
    fn test_all_hazard_permutations_complete_exactly_once() {
        let permutations: [[Hazard; 3]; 6] = [
            [Hazard::Fire, Hazard::Leak, Hazard::Valve],
            [Hazard::Fire, Hazard::Valve, Hazard::Leak],
            [Hazard::Leak, Hazard::Fire, Hazard::Valve],
            [Hazard::Leak, Hazard::Valve, Hazard::Fire],
            [Hazard::Valve, Hazard::Fire, Hazard::Leak],
            [Hazard::Valve, Hazard::Leak, Hazard::Fire],
        ];

        for order in permutations {
            let mut run = started_run(Language::En);
            run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
            commit(&mut run);

            let mut completions = 0;
            for hazard in order {
                run.interact(hazard.as_str(), Uuid::new_v4(), &fixed_clock());
                completions += run
                    .uncommitted_events()
                    .iter()
                    .filter(|e| e.event_type() == "training.scenario_completed")
                    .count();
                commit(&mut run);
            }

            assert_eq!(completions, 1, "order {order:?}");
            assert!(run.scenario_complete(), "order {order:?}");
        }
    }

    #[test]
    fn test_final_fix_emits_hazard_then_completion() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "leak");
        interact(&mut run, "fire");

        run.interact("valve", Uuid::new_v4(), &fixed_clock());

        let events = run.uncommitted_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "training.hazard_resolved");
        assert_eq!(events[1].event_type(), "training.scenario_completed");
        assert_eq!(
            events[1].kind.narration_key(),
            Some(MessageKey::InspectionComplete)
        );
        commit(&mut run);
        assert_eq!(run.guide_message_key(), MessageKey::InspectionComplete);
    }

    // --- language ---

    #[test]
    fn test_change_language_keeps_progression_state() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "red");

        run.change_language(Language::Fr, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        assert_eq!(run.language(), Language::Fr);
        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::AwaitGreen));
        // Guide key is untouched; projections re-resolve it in the new language.
        assert_eq!(run.guide_message_key(), MessageKey::CorrectGreen);
    }

    #[test]
    fn test_change_language_to_same_is_noop() {
        let mut run = started_run(Language::En);

        run.change_language(Language::En, Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
    }

    // --- reset ---

    #[test]
    fn test_reset_after_drill_complete_returns_to_idle() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "red");
        interact(&mut run, "green");
        interact(&mut run, "blue");

        run.reset(Uuid::new_v4(), &fixed_clock());

        let events = run.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "training.scenario_reset");
        commit(&mut run);
        assert_eq!(run.phase, ScenarioPhase::Idle);
        assert_eq!(run.step(), 0);
        assert_eq!(run.guide_message_key(), MessageKey::Reset);
    }

    #[test]
    fn test_reset_after_inspection_complete_clears_hazard_flags() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "valve");
        interact(&mut run, "leak");
        interact(&mut run, "fire");

        run.reset(Uuid::new_v4(), &fixed_clock());
        commit(&mut run);

        assert_eq!(run.phase, ScenarioPhase::Idle);
        assert!(run.hazards().is_none());

        // Re-entry starts from a fresh hazard set.
        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        for hazard in Hazard::ALL {
            assert!(!run.hazards().unwrap().is_resolved(hazard));
        }
    }

    #[test]
    fn test_reset_mid_scenario_is_noop() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::AssemblyDrill, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "red");

        run.reset(Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
        assert_eq!(run.phase, ScenarioPhase::Drill(DrillStep::AwaitGreen));
    }

    #[test]
    fn test_reset_while_idle_is_noop() {
        let mut run = started_run(Language::En);

        run.reset(Uuid::new_v4(), &fixed_clock());

        assert!(run.uncommitted_events().is_empty());
    }

    // --- sequencing ---

    #[test]
    fn test_sequence_numbers_increment_across_commands() {
        let mut run = started_run(Language::En);
        run.select_scenario(ScenarioKind::SafetyInspection, Uuid::new_v4(), &fixed_clock());
        commit(&mut run);
        interact(&mut run, "leak");
        interact(&mut run, "fire");

        run.interact("valve", Uuid::new_v4(), &fixed_clock());

        let events = run.uncommitted_events();
        assert_eq!(events[0].metadata().sequence_number, 5);
        assert_eq!(events[1].metadata().sequence_number, 6);
    }
}
