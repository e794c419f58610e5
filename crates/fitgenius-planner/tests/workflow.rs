use std::sync::Arc;

use fitgenius_bedrock::generation::GenerationClient;
use fitgenius_bedrock::prompts;
use fitgenius_core::doc_paths;
use fitgenius_core::models::outcome::{ErrorKind, PlanOutcome};
use fitgenius_core::models::plan::{PlanBody, PlanType};
use fitgenius_core::models::profile::{ProfileField, UserProfile};
use fitgenius_planner::cache::{CacheTier, PlanCache};
use fitgenius_planner::error::WorkflowError;
use fitgenius_planner::workflow::{PlanRequest, PlanWorkflow, WorkflowState};
use fitgenius_storage::documents::DocumentStore;
use fitgenius_storage::profiles::ProfileStore;
use fitgenius_test_utils::{FakeBackend, FlakyDocumentStore, sample_profile, workout_generated_at};
use jiff::{SignedDuration, Timestamp};
use serde_json::json;

use WorkflowState::*;

const USER: &str = "user-1";

struct Harness {
    docs: Arc<FlakyDocumentStore>,
    backend: Arc<FakeBackend>,
    cache: Arc<PlanCache>,
    profiles: ProfileStore,
    workflow: PlanWorkflow,
}

fn harness() -> Harness {
    let docs = Arc::new(FlakyDocumentStore::new());
    let backend = Arc::new(FakeBackend::new());
    let cache = Arc::new(PlanCache::new(docs.clone()));
    let profiles = ProfileStore::new(docs.clone());
    let workflow = PlanWorkflow::new(
        profiles.clone(),
        cache.clone(),
        GenerationClient::new(backend.clone()),
    );
    Harness {
        docs,
        backend,
        cache,
        profiles,
        workflow,
    }
}

fn now() -> Timestamp {
    "2025-03-10T12:00:00Z".parse().unwrap()
}

fn days(n: i64) -> SignedDuration {
    SignedDuration::from_hours(24 * n)
}

fn scenario_profile() -> UserProfile {
    UserProfile {
        goal: "ganhar massa".to_string(),
        experience_level: "iniciante".to_string(),
        weekly_availability: "3-4".to_string(),
        equipment_available: "basico".to_string(),
        ..sample_profile()
    }
}

async fn with_profile(h: &Harness, profile: &UserProfile) {
    h.profiles.save(USER, profile).await.unwrap();
}

#[tokio::test]
async fn fresh_profile_generates_and_persists_workout_plan() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert_eq!(
        attempt.trail(),
        &[Idle, ValidatingProfile, CheckingCooldown, Generating, Persisting, Done]
    );
    let plan = attempt.into_result().unwrap();
    assert_eq!(plan.created_at(), now());
    assert_eq!(plan.plan_type(), PlanType::Workout);

    let (template, input) = &h.backend.invocations()[0];
    assert_eq!(template, prompts::WORKOUT_PLAN.name);
    assert_eq!(input["goal"], "ganhar massa");
    assert_eq!(input["experienceLevel"], "iniciante");
    assert_eq!(input["availableTime"], "3-4");
    assert_eq!(input["equipmentAvailable"], "basico");

    let session = h.cache.get(USER, PlanType::Workout).await.unwrap().unwrap();
    assert_eq!(session.tier, CacheTier::Session);
    assert_eq!(session.plan, plan);

    let durable = h
        .docs
        .inner()
        .get(&doc_paths::plan(USER, PlanType::Workout))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(durable["createdAt"], json!(now().to_string()));
    assert_eq!(durable["planType"], "workout");
}

#[tokio::test]
async fn recent_plan_blocks_regeneration() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    let existing = workout_generated_at(now() - days(5));
    h.cache.put(USER, existing.clone()).await;

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert_eq!(attempt.trail(), &[Idle, ValidatingProfile, CheckingCooldown, Failed]);
    assert!(matches!(
        attempt.result(),
        Err(WorkflowError::CooldownActive { days_remaining: 25 })
    ));
    assert_eq!(attempt.into_outcome(), PlanOutcome::Blocked { blocked: 25 });
    assert_eq!(h.backend.calls(), 0);

    let cached = h.cache.get(USER, PlanType::Workout).await.unwrap().unwrap();
    assert_eq!(cached.plan, existing);
}

#[tokio::test]
async fn cooldown_reads_the_durable_tier_after_restart() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.cache.put(USER, workout_generated_at(now() - days(1))).await;
    h.cache.clear_user(USER).await;

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert!(matches!(
        attempt.result(),
        Err(WorkflowError::CooldownActive { days_remaining: 29 })
    ));
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn plan_older_than_cooldown_is_replaced() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.cache.put(USER, workout_generated_at(now() - days(30))).await;

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert_eq!(attempt.state(), Done);
    let cached = h.cache.get(USER, PlanType::Workout).await.unwrap().unwrap();
    assert_eq!(cached.plan.created_at(), now());
}

#[tokio::test]
async fn incomplete_profile_stops_before_cooldown() {
    let h = harness();
    let mut profile = scenario_profile();
    profile.goal = String::new();
    // Written directly: the form would have rejected it.
    h.docs
        .inner()
        .set(
            &doc_paths::profile(USER),
            serde_json::to_value(&profile).unwrap(),
            Default::default(),
        )
        .await
        .unwrap();

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert_eq!(attempt.trail(), &[Idle, ValidatingProfile, Failed]);
    match attempt.result() {
        Err(WorkflowError::ProfileIncomplete(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, ProfileField::Goal);
        }
        other => panic!("expected ProfileIncomplete, got {other:?}"),
    }
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn missing_profile_is_incomplete() {
    let h = harness();

    let outcome = h
        .workflow
        .run_at(USER, &PlanRequest::workout(), now())
        .await
        .into_outcome();

    match outcome {
        PlanOutcome::Error { error, .. } => assert_eq!(error, ErrorKind::ProfileIncomplete),
        other => panic!("expected error outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn repeated_validation_failures_never_reach_the_backend() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    let request = PlanRequest::progress("", "");

    for _ in 0..2 {
        let attempt = h.workflow.run_at(USER, &request, now()).await;
        assert!(matches!(attempt.result(), Err(WorkflowError::Validation(_))));
        assert_eq!(attempt.state(), Failed);
    }

    assert_eq!(h.backend.calls(), 0);
    assert!(h.cache.get(USER, PlanType::Progress).await.unwrap().is_none());
}

#[tokio::test]
async fn durable_write_failure_still_completes() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.docs.fail_writes(true);

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert_eq!(attempt.state(), Done);
    let cached = h.cache.get(USER, PlanType::Workout).await.unwrap().unwrap();
    assert_eq!(cached.tier, CacheTier::Session);
    assert!(
        h.docs
            .inner()
            .get(&doc_paths::plan(USER, PlanType::Workout))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn generation_failure_leaves_both_tiers_untouched() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.backend.fail(&prompts::WORKOUT_PLAN, "model unavailable");

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert_eq!(attempt.trail(), &[Idle, ValidatingProfile, CheckingCooldown, Generating, Failed]);
    assert!(matches!(attempt.result(), Err(WorkflowError::Generation(_))));
    assert_eq!(h.backend.calls(), 1);
    assert!(h.cache.get(USER, PlanType::Workout).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_model_output_is_a_generation_error() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.backend
        .respond(&prompts::MEAL_SUGGESTIONS, json!({ "weeklyMealSuggestions": "só isso" }));

    let outcome = h
        .workflow
        .run_at(USER, &PlanRequest::meal(None), now())
        .await
        .into_outcome();

    match outcome {
        PlanOutcome::Error { error, .. } => assert_eq!(error, ErrorKind::Generation),
        other => panic!("expected error outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn storage_read_failure_is_fatal() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.docs.fail_reads(true);

    let attempt = h.workflow.run_at(USER, &PlanRequest::workout(), now()).await;

    assert!(matches!(attempt.result(), Err(WorkflowError::Storage(_))));
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn forced_request_skips_cooldown() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.cache.put(USER, workout_generated_at(now() - days(2))).await;

    let attempt = h
        .workflow
        .run_at(USER, &PlanRequest::workout().forced(), now())
        .await;

    assert_eq!(
        attempt.trail(),
        &[Idle, ValidatingProfile, Generating, Persisting, Done]
    );
    let cached = h.cache.get(USER, PlanType::Workout).await.unwrap().unwrap();
    assert_eq!(cached.plan.created_at(), now());
}

#[tokio::test]
async fn meal_inputs_use_defaults_for_missing_text() {
    let h = harness();
    let profile = UserProfile {
        dietary_restrictions: None,
        ..scenario_profile()
    };
    with_profile(&h, &profile).await;

    let plan = h
        .workflow
        .run_at(USER, &PlanRequest::meal(None), now())
        .await
        .into_result()
        .unwrap();

    assert!(matches!(plan.body(), PlanBody::Meal(_)));
    let (_, input) = &h.backend.invocations()[0];
    assert_eq!(input["objective"], "ganhar massa");
    assert_eq!(input["dietaryRestrictions"], "Nenhuma");
    assert_eq!(input["preferences"], "N/A");
    assert_eq!(input["weeklyAvailability"], "3-4");
}

#[tokio::test]
async fn progress_sends_logs_and_profile_summary() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;

    let plan = h
        .workflow
        .run_at(
            USER,
            &PlanRequest::progress("Supino 3x10 40kg", "2200 kcal/dia"),
            now(),
        )
        .await
        .into_result()
        .unwrap();

    assert_eq!(plan.plan_type(), PlanType::Progress);
    let (template, input) = &h.backend.invocations()[0];
    assert_eq!(template, prompts::PROGRESS_FEEDBACK.name);
    assert_eq!(input["workoutLogs"], "Supino 3x10 40kg");
    let summary = input["userProfile"].as_str().unwrap();
    assert!(summary.contains("Objetivo: ganhar massa"));
}

#[tokio::test]
async fn plan_types_have_independent_cooldowns() {
    let h = harness();
    with_profile(&h, &scenario_profile()).await;
    h.cache.put(USER, workout_generated_at(now() - days(1))).await;

    let attempt = h.workflow.run_at(USER, &PlanRequest::meal(None), now()).await;

    assert_eq!(attempt.state(), Done);
}

#[tokio::test]
async fn cooldown_sees_plans_written_by_another_instance() {
    let docs = Arc::new(FlakyDocumentStore::new());
    let backend = Arc::new(FakeBackend::new());
    let profiles = ProfileStore::new(docs.clone());
    profiles.save(USER, &scenario_profile()).await.unwrap();

    let instance = || {
        let cache = Arc::new(PlanCache::new(docs.clone()));
        let workflow = PlanWorkflow::new(
            profiles.clone(),
            cache.clone(),
            GenerationClient::new(backend.clone()),
        );
        (cache, workflow)
    };
    let (cache_a, workflow_a) = instance();
    let (_, workflow_b) = instance();

    // Instance A holds an expired plan in its session tier.
    cache_a.put(USER, workout_generated_at(now() - days(40))).await;

    let first = workflow_b.run_at(USER, &PlanRequest::workout(), now()).await;
    assert_eq!(first.state(), Done);

    let later = now() + SignedDuration::from_hours(1);
    let second = workflow_a.run_at(USER, &PlanRequest::workout(), later).await;

    assert!(matches!(
        second.result(),
        Err(WorkflowError::CooldownActive { days_remaining: 29 })
    ));
    assert_eq!(backend.calls(), 1);

    // The stale session copy was replaced by the durable record.
    let cached = cache_a.get(USER, PlanType::Workout).await.unwrap().unwrap();
    assert_eq!(cached.plan.created_at(), now());
}
