//! Named prompt templates.
//!
//! Templates are Tera templates whose variables are the camelCase
//! fields of the operation's JSON input.

use serde_json::Value;
use tera::{Context, Tera};

use crate::error::BedrockError;

/// A prompt template plus the description of the JSON object the model
/// must return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub prompt: &'static str,
    pub output_fields: &'static str,
}

pub const WORKOUT_PLAN: PromptTemplate = PromptTemplate {
    name: "generateWorkoutPlan",
    prompt: "You are a bilingual (pt-BR) personal trainer who creates structured, weekly workout plans.

Based on the user's inputs, return a STRICT JSON matching the output fields below.
Keep content concise, readable and formatted with bullet points and clear exercise lists (sets x reps).
Use Portuguese (Brasil) in all texts.

Inputs:
- Fitness Goal: {{ goal }}
- Experience Level: {{ experienceLevel }}
- Available Time: {{ availableTime }}
- Equipment Available: {{ equipmentAvailable }}",
    output_fields: "- weeklySplit (string): short summary of the weekly split
- days (object): monday, tuesday, wednesday, thursday, friday, saturday, sunday (strings); list of exercises for each day (or descanso/ativo), bullet points with sets x reps
- warmupAndCooldown (string): guidelines for aquecimento and alongamentos (5-10 min), pós-treino
- notesAndProgression (string): concise tips and progression advice",
};

pub const MEAL_SUGGESTIONS: PromptTemplate = PromptTemplate {
    name: "generateMealSuggestions",
    prompt: "You are a bilingual (pt-BR) nutritionist who writes practical weekly meal suggestions.

Base the suggestions on the user's objective, respect every dietary restriction and favour the stated preferences.
Use Portuguese (Brasil) in all texts and format lists with bullet points.

Inputs:
- Objective: {{ objective }}
- Dietary Restrictions: {{ dietaryRestrictions }}
- Preferences: {{ preferences }}
- Weekly Availability: {{ weeklyAvailability }}",
    output_fields: "- weeklyMealSuggestions (string): meals for the week (café da manhã, almoço, lanche, jantar)
- macronutrientDistribution (string): suggested split of proteins, carbohydrates and fats
- shoppingList (string): grouped shopping list for the week",
};

pub const PROGRESS_FEEDBACK: PromptTemplate = PromptTemplate {
    name: "analyzeProgressAndProvideFeedback",
    prompt: "You are a fitness and nutrition expert. Analyze the user's workout and nutrition logs, taking into account their profile information to provide personalized feedback and suggestions.

Workout Logs: {{ workoutLogs }}
Nutrition Logs: {{ nutritionLogs }}
User Profile: {{ userProfile }}

Provide feedback to help the user avoid plateaus and achieve their goals. Use Portuguese (Brasil).",
    output_fields: "- feedback (string): personalized feedback and suggestions, including potential plateaus and how to overcome them",
};

pub const ASSISTANT: PromptTemplate = PromptTemplate {
    name: "aiVirtualAssistant",
    prompt: "You are the FitGenius virtual assistant. Answer questions about training, nutrition and the app in Portuguese (Brasil), briefly and safely. Recommend a professional for medical questions.

Question: {{ query }}",
    output_fields: "- response (string): the answer shown to the user",
};

/// System prompt for a template: strict JSON with the template's fields.
pub fn system_prompt(template: &PromptTemplate) -> String {
    format!(
        "Respond with a single JSON object and nothing else. Do not wrap it in \
         markdown and do not add commentary. The object must have exactly these \
         fields:\n{}",
        template.output_fields
    )
}

/// Render a template with the top-level fields of `input` as context.
///
/// An undefined variable is an error, so every field the prompt refers
/// to must be present in the input.
pub fn render(template: &PromptTemplate, input: &Value) -> Result<String, BedrockError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template.name, template.prompt)?;

    let context = Context::from_value(input.clone()).map_err(|e| {
        BedrockError::Template(format!("{}: input is not a JSON object: {e}", template.name))
    })?;

    Ok(tera.render(template.name, &context)?)
}

/// Strip a surrounding markdown code fence, if the model added one.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json"), on its own line or not.
    let tag_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let inner = &inner[tag_len..];
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
