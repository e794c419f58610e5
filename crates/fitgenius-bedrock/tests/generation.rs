use std::sync::Arc;

use fitgenius_bedrock::error::BedrockError;
use fitgenius_bedrock::generation::{
    AssistantInput, GenerationClient, MealSuggestionsInput, ProgressInput, WorkoutPlanInput,
};
use fitgenius_bedrock::prompts;
use fitgenius_test_utils::{FakeBackend, meal_plan, progress_feedback, workout_plan};
use serde_json::json;

fn client() -> (Arc<FakeBackend>, GenerationClient) {
    let backend = Arc::new(FakeBackend::new());
    let client = GenerationClient::new(backend.clone());
    (backend, client)
}

fn workout_input() -> WorkoutPlanInput {
    WorkoutPlanInput {
        goal: "Ganhar massa muscular".to_string(),
        experience_level: "intermediario".to_string(),
        available_time: "3-4".to_string(),
        equipment_available: "completo".to_string(),
    }
}

#[tokio::test]
async fn workout_plan_is_parsed() {
    let (backend, client) = client();

    let plan = client.generate_workout_plan(&workout_input()).await.unwrap();

    assert_eq!(plan, workout_plan());
    assert_eq!(backend.calls(), 1);
    let (template, input) = &backend.invocations()[0];
    assert_eq!(template, prompts::WORKOUT_PLAN.name);
    assert_eq!(input["availableTime"], "3-4");
    assert_eq!(input["experienceLevel"], "intermediario");
}

#[tokio::test]
async fn blank_input_fails_without_calling_backend() {
    let (backend, client) = client();
    let input = WorkoutPlanInput {
        goal: "   ".to_string(),
        ..workout_input()
    };

    let err = client.generate_workout_plan(&input).await.unwrap_err();

    assert!(err.is_validation());
    assert!(matches!(err, BedrockError::InvalidInput { field: "goal", .. }));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn meal_defaults_fill_absent_restrictions_and_preferences() {
    let (backend, client) = client();
    let input = MealSuggestionsInput::new("Perder gordura", None, Some("  "), "5-6");
    assert_eq!(input.dietary_restrictions, "Nenhuma");
    assert_eq!(input.preferences, "N/A");

    let plan = client.generate_meal_suggestions(&input).await.unwrap();

    assert_eq!(plan, meal_plan());
    let (_, sent) = &backend.invocations()[0];
    assert_eq!(sent["dietaryRestrictions"], "Nenhuma");
    assert_eq!(sent["objective"], "Perder gordura");
}

#[tokio::test]
async fn progress_requires_logs() {
    let (backend, client) = client();
    let input = ProgressInput {
        workout_logs: String::new(),
        nutrition_logs: "2000 kcal".to_string(),
        user_profile: "Nome: Ana".to_string(),
    };

    let err = client.analyze_progress(&input).await.unwrap_err();
    assert!(matches!(err, BedrockError::InvalidInput { field: "workoutLogs", .. }));
    assert_eq!(backend.calls(), 0);

    let input = ProgressInput {
        workout_logs: "Supino 3x10 60kg".to_string(),
        ..input
    };
    assert_eq!(client.analyze_progress(&input).await.unwrap(), progress_feedback());
}

#[tokio::test]
async fn assistant_reply_is_returned() {
    let (_, client) = client();
    let reply = client
        .assistant_reply(&AssistantInput {
            query: "Quanto devo beber de água?".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(reply.response, "Beba água e durma bem.");
}

#[tokio::test]
async fn upstream_failure_is_not_retried() {
    let (backend, client) = client();
    backend.fail(&prompts::WORKOUT_PLAN, "throttled");

    let err = client.generate_workout_plan(&workout_input()).await.unwrap_err();

    assert!(matches!(err, BedrockError::Invocation(_)));
    assert!(!err.is_validation());
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn nonconforming_output_is_a_schema_violation() {
    let (backend, client) = client();
    backend.respond(&prompts::WORKOUT_PLAN, json!({ "workoutPlan": "texto livre" }));

    let err = client.generate_workout_plan(&workout_input()).await.unwrap_err();

    assert!(matches!(err, BedrockError::SchemaViolation(_)));
}
