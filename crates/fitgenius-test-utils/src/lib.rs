//! Shared test utilities for fitgenius integration tests.
//!
//! Provides a scriptable generation backend that counts its calls, a
//! document store whose reads and writes can be made to fail, and
//! fixtures for profiles and plans.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fitgenius_bedrock::backend::{BoxFuture, GenerationBackend};
use fitgenius_bedrock::error::BedrockError;
use fitgenius_bedrock::prompts::{self, PromptTemplate};
use fitgenius_core::models::plan::{
    GeneratedPlan, MealPlan, PlanBody, ProgressFeedback, WeekDays, WorkoutPlan,
};
use fitgenius_core::models::profile::{ProfileDocument, UserProfile};
use fitgenius_core::models::user::CurrentUser;
use fitgenius_storage::documents::{DocumentStore, MemoryDocumentStore, SetOptions};
use fitgenius_storage::error::StorageError;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn sample_user() -> CurrentUser {
    CurrentUser {
        id: "user-1".to_string(),
        display_name: Some("Ana Souza".to_string()),
        email: Some("ana@example.com".to_string()),
    }
}

pub fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Ana Souza".to_string(),
        age: 31,
        weight: 64.5,
        height: 168.0,
        gender: "feminino".to_string(),
        goal: "Ganhar massa muscular e resistência".to_string(),
        experience_level: "intermediario".to_string(),
        dietary_restrictions: Some("lactose".to_string()),
        weekly_availability: "3-4".to_string(),
        equipment_available: "completo".to_string(),
    }
}

pub fn sample_profile_document() -> ProfileDocument {
    let mut doc = ProfileDocument::from(&sample_profile());
    doc.email = Some("ana@example.com".to_string());
    doc
}

pub fn workout_plan() -> WorkoutPlan {
    WorkoutPlan {
        weekly_split: "Push/Pull/Legs".to_string(),
        days: WeekDays {
            monday: "- Supino 4x10".to_string(),
            tuesday: "- Remada 4x10".to_string(),
            wednesday: "- Agachamento 4x8".to_string(),
            thursday: "descanso".to_string(),
            friday: "- Desenvolvimento 3x12".to_string(),
            saturday: "- Terra 3x6".to_string(),
            sunday: "descanso ativo".to_string(),
        },
        warmup_and_cooldown: "5-10 min de mobilidade".to_string(),
        notes_and_progression: "Aumente a carga a cada duas semanas".to_string(),
    }
}

pub fn meal_plan() -> MealPlan {
    MealPlan {
        weekly_meal_suggestions: "- Café: ovos e aveia".to_string(),
        macronutrient_distribution: "30% proteína, 45% carboidrato, 25% gordura".to_string(),
        shopping_list: "- ovos\n- aveia\n- frango".to_string(),
    }
}

pub fn progress_feedback() -> ProgressFeedback {
    ProgressFeedback {
        feedback: "Boa consistência; aumente a ingestão de proteína.".to_string(),
    }
}

/// A plan of each type, created at `created_at`.
pub fn generated_plan(body: PlanBody, created_at: jiff::Timestamp) -> GeneratedPlan {
    GeneratedPlan::new(body, created_at)
}

pub fn workout_generated_at(created_at: jiff::Timestamp) -> GeneratedPlan {
    generated_plan(PlanBody::Workout(workout_plan()), created_at)
}

// ── Generation backend ───────────────────────────────────────────────────────

/// Scripted [`GenerationBackend`].
///
/// Responds per template name. By default every template returns a valid
/// output for its operation. Counts and records each invocation.
pub struct FakeBackend {
    responses: Mutex<HashMap<&'static str, Result<Value, String>>>,
    calls: AtomicUsize,
    invocations: Mutex<Vec<(String, Value)>>,
    gate: Option<Arc<Semaphore>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        let mut responses = HashMap::new();
        responses.insert(
            prompts::WORKOUT_PLAN.name,
            Ok(serde_json::to_value(workout_plan()).expect("workout fixture serializes")),
        );
        responses.insert(
            prompts::MEAL_SUGGESTIONS.name,
            Ok(serde_json::to_value(meal_plan()).expect("meal fixture serializes")),
        );
        responses.insert(
            prompts::PROGRESS_FEEDBACK.name,
            Ok(serde_json::to_value(progress_feedback()).expect("progress fixture serializes")),
        );
        responses.insert(
            prompts::ASSISTANT.name,
            Ok(json!({ "response": "Beba água e durma bem." })),
        );
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
            invocations: Mutex::new(Vec::new()),
            gate: None,
        }
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation waits for a permit on `gate` before answering.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(&self, template: &PromptTemplate, output: Value) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(template.name, Ok(output));
    }

    pub fn fail(&self, template: &PromptTemplate, message: &str) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(template.name, Err(message.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(template name, input)` for every invocation so far.
    pub fn invocations(&self) -> Vec<(String, Value)> {
        self.invocations.lock().expect("invocations lock").clone()
    }
}

impl GenerationBackend for FakeBackend {
    fn invoke<'a>(
        &'a self,
        template: &'a PromptTemplate,
        input: &'a Value,
    ) -> BoxFuture<'a, Result<Value, BedrockError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.invocations
                .lock()
                .expect("invocations lock")
                .push((template.name.to_string(), input.clone()));

            if let Some(gate) = &self.gate {
                gate.acquire().await.expect("gate closed").forget();
            }

            let response = self
                .responses
                .lock()
                .expect("responses lock")
                .get(template.name)
                .cloned();
            match response {
                Some(Ok(value)) => Ok(value),
                Some(Err(message)) => Err(BedrockError::Invocation(message)),
                None => Err(BedrockError::Invocation(format!(
                    "no scripted response for {}",
                    template.name
                ))),
            }
        })
    }
}

// ── Document store ───────────────────────────────────────────────────────────

/// In-memory document store with switchable failures.
#[derive(Default)]
pub struct FlakyDocumentStore {
    inner: MemoryDocumentStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }
}

impl DocumentStore for FlakyDocumentStore {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Box::pin(async move {
                Err(StorageError::Unavailable(format!("read of {path} failed")))
            });
        }
        self.inner.get(path)
    }

    fn set<'a>(
        &'a self,
        path: &'a str,
        data: Value,
        options: SetOptions,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable(format!("write of {path} failed")));
            }
            self.inner.set(path, data, options).await?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}
