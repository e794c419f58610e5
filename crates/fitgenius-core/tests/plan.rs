use fitgenius_core::error::CoreError;
use fitgenius_core::models::outcome::{ErrorKind, PlanOutcome};
use fitgenius_core::models::plan::{
    CURRENT_SCHEMA_VERSION, GeneratedPlan, MealPlan, PlanBody, PlanType, WeekDays, WorkoutPlan,
    migrate_plan,
};
use jiff::Timestamp;
use serde_json::json;

fn created() -> Timestamp {
    "2025-01-02T08:30:00Z".parse().unwrap()
}

fn workout() -> GeneratedPlan {
    GeneratedPlan::new(
        PlanBody::Workout(WorkoutPlan {
            weekly_split: "Full Body 3x".to_string(),
            days: WeekDays {
                monday: "Agachamento 3x10".to_string(),
                sunday: "Descanso".to_string(),
                ..Default::default()
            },
            warmup_and_cooldown: "5 min de mobilidade".to_string(),
            notes_and_progression: "Aumente a carga aos poucos".to_string(),
        }),
        created(),
    )
}

#[test]
fn stored_shape_is_tagged_and_versioned() {
    let json = serde_json::to_value(workout()).unwrap();
    assert_eq!(json["planType"], "workout");
    assert_eq!(json["schemaVersion"], CURRENT_SCHEMA_VERSION);
    assert_eq!(json["weeklySplit"], "Full Body 3x");
    assert_eq!(json["days"]["monday"], "Agachamento 3x10");
    assert!(json["createdAt"].is_string());
}

#[test]
fn current_records_decode_unchanged() {
    let plan = workout();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(migrate_plan(json, PlanType::Workout).unwrap(), plan);
}

#[test]
fn legacy_single_text_workout_is_migrated() {
    let legacy = json!({
        "workoutPlan": "Segunda: peito\nTerça: costas",
        "createdAt": "2024-11-01T10:00:00Z",
    });
    let plan = migrate_plan(legacy, PlanType::Workout).unwrap();

    assert_eq!(plan.schema_version(), CURRENT_SCHEMA_VERSION);
    assert_eq!(plan.created_at(), "2024-11-01T10:00:00Z".parse::<Timestamp>().unwrap());
    match plan.body() {
        PlanBody::Workout(w) => {
            assert_eq!(w.weekly_split, "Segunda: peito\nTerça: costas");
            assert_eq!(w.days, WeekDays::default());
        }
        other => panic!("expected workout, got {other:?}"),
    }
}

#[test]
fn legacy_meal_record_gets_tag_and_version() {
    let legacy = json!({
        "weeklyMealSuggestions": "Café: ovos",
        "macronutrientDistribution": "40/30/30",
        "shoppingList": "ovos, aveia",
        "createdAt": "2024-12-24T18:00:00Z",
    });
    let plan = migrate_plan(legacy, PlanType::Meal).unwrap();
    assert_eq!(
        plan.body(),
        &PlanBody::Meal(MealPlan {
            weekly_meal_suggestions: "Café: ovos".to_string(),
            macronutrient_distribution: "40/30/30".to_string(),
            shopping_list: "ovos, aveia".to_string(),
        })
    );
}

#[test]
fn legacy_record_without_timestamp_is_not_recent() {
    let legacy = json!({ "feedback": "Bom trabalho" });
    let plan = migrate_plan(legacy, PlanType::Progress).unwrap();
    assert_eq!(plan.created_at(), Timestamp::UNIX_EPOCH);
}

#[test]
fn newer_schema_is_rejected() {
    let mut json = serde_json::to_value(workout()).unwrap();
    json["schemaVersion"] = json!(CURRENT_SCHEMA_VERSION + 1);
    assert!(matches!(
        migrate_plan(json, PlanType::Workout),
        Err(CoreError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn mismatched_plan_type_is_rejected() {
    let json = serde_json::to_value(workout()).unwrap();
    assert!(matches!(
        migrate_plan(json, PlanType::Meal),
        Err(CoreError::InvalidDocType(_))
    ));
}

#[test]
fn plan_type_parses_from_path_segment() {
    assert_eq!("meal".parse::<PlanType>().unwrap(), PlanType::Meal);
    assert!(matches!(
        "cardio".parse::<PlanType>(),
        Err(CoreError::UnknownPlanType(s)) if s == "cardio"
    ));
}

#[test]
fn outcome_wire_shapes() {
    let ok = serde_json::to_value(PlanOutcome::Ok { ok: workout() }).unwrap();
    assert_eq!(ok["ok"]["planType"], "workout");

    let blocked = serde_json::to_value(PlanOutcome::Blocked { blocked: 25 }).unwrap();
    assert_eq!(blocked, json!({ "blocked": 25 }));

    let error = serde_json::to_value(PlanOutcome::Error {
        error: ErrorKind::Generation,
        message: "tente novamente".to_string(),
    })
    .unwrap();
    assert_eq!(
        error,
        json!({ "error": "generation", "message": "tente novamente" })
    );
}
