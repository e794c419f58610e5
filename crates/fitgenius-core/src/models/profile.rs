use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Values offered by the profile form. The stored fields stay free text.
pub mod choices {
    pub const GENDERS: &[&str] = &["masculino", "feminino", "outro"];
    pub const EXPERIENCE_LEVELS: &[&str] = &["iniciante", "intermediario", "avancado"];
    pub const WEEKLY_AVAILABILITY: &[&str] = &["1-2", "3-4", "5-6", "todos"];
    pub const EQUIPMENT: &[&str] = &["nenhum", "basico", "completo"];
}

const MIN_NAME_CHARS: usize = 2;
const MIN_GOAL_CHARS: usize = 10;

/// The stored profile record. Every field is optional because records
/// created at sign-in only carry the identity fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_available: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<jiff::Timestamp>,
}

/// A profile that passed validation. Only these are allowed to reach the
/// generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    pub gender: String,
    pub goal: String,
    pub experience_level: String,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
    pub weekly_availability: String,
    pub equipment_available: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ProfileField {
    Name,
    Age,
    Weight,
    Height,
    Gender,
    Goal,
    ExperienceLevel,
    WeeklyAvailability,
    EquipmentAvailable,
}

impl ProfileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::Gender => "gender",
            Self::Goal => "goal",
            Self::ExperienceLevel => "experienceLevel",
            Self::WeeklyAvailability => "weeklyAvailability",
            Self::EquipmentAvailable => "equipmentAvailable",
        }
    }
}

/// A single failed form rule, with the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldIssue {
    pub field: ProfileField,
    pub message: String,
}

impl FieldIssue {
    fn new(field: ProfileField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

fn text_len(value: Option<&str>) -> usize {
    value.map(|v| v.trim().chars().count()).unwrap_or(0)
}

fn filled(value: Option<&String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl ProfileDocument {
    /// Check every form rule and collect all failures.
    pub fn issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if text_len(self.name.as_deref()) < MIN_NAME_CHARS {
            issues.push(FieldIssue::new(
                ProfileField::Name,
                "Nome deve ter pelo menos 2 caracteres.",
            ));
        }
        if self.age.unwrap_or(0) < 1 {
            issues.push(FieldIssue::new(ProfileField::Age, "Idade é obrigatória."));
        }
        if !self.weight.is_some_and(|w| w >= 1.0) {
            issues.push(FieldIssue::new(ProfileField::Weight, "Peso é obrigatório."));
        }
        if !self.height.is_some_and(|h| h >= 1.0) {
            issues.push(FieldIssue::new(ProfileField::Height, "Altura é obrigatória."));
        }
        if text_len(self.gender.as_deref()) < 1 {
            issues.push(FieldIssue::new(ProfileField::Gender, "Gênero é obrigatório."));
        }
        if text_len(self.goal.as_deref()) < MIN_GOAL_CHARS {
            issues.push(FieldIssue::new(
                ProfileField::Goal,
                "Objetivo deve ter pelo menos 10 caracteres.",
            ));
        }
        if text_len(self.experience_level.as_deref()) < 1 {
            issues.push(FieldIssue::new(
                ProfileField::ExperienceLevel,
                "Nível de experiência é obrigatório.",
            ));
        }
        if text_len(self.weekly_availability.as_deref()) < 1 {
            issues.push(FieldIssue::new(
                ProfileField::WeeklyAvailability,
                "Disponibilidade é obrigatória.",
            ));
        }
        if text_len(self.equipment_available.as_deref()) < 1 {
            issues.push(FieldIssue::new(
                ProfileField::EquipmentAvailable,
                "Equipamentos são obrigatórios.",
            ));
        }

        issues
    }

    /// Promote a stored record to a complete profile, or report every
    /// field that blocks it.
    pub fn validate(&self) -> Result<UserProfile, CoreError> {
        let issues = self.issues();
        if !issues.is_empty() {
            return Err(CoreError::ProfileIncomplete(issues));
        }

        Ok(UserProfile {
            name: filled(self.name.as_ref()),
            age: self.age.unwrap_or_default(),
            weight: self.weight.unwrap_or_default(),
            height: self.height.unwrap_or_default(),
            gender: filled(self.gender.as_ref()),
            goal: filled(self.goal.as_ref()),
            experience_level: filled(self.experience_level.as_ref()),
            dietary_restrictions: self
                .dietary_restrictions
                .as_ref()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            weekly_availability: filled(self.weekly_availability.as_ref()),
            equipment_available: filled(self.equipment_available.as_ref()),
        })
    }
}

impl UserProfile {
    /// Re-run the form rules on an already-typed profile (e.g. a form
    /// submission deserialized straight into this struct).
    pub fn validate(&self) -> Result<(), CoreError> {
        let issues = ProfileDocument::from(self).issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::ProfileIncomplete(issues))
        }
    }

    /// Plain-text profile summary for prompts that take the profile as a
    /// single field.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Nome: {}\nIdade: {}\nPeso: {} kg\nAltura: {} cm\nGênero: {}\nObjetivo: {}\n\
             Nível de experiência: {}\nDisponibilidade semanal: {} dias\nEquipamentos: {}\n",
            self.name,
            self.age,
            self.weight,
            self.height,
            self.gender,
            self.goal,
            self.experience_level,
            self.weekly_availability,
            self.equipment_available,
        );
        if let Some(restrictions) = &self.dietary_restrictions {
            out.push_str(&format!("Restrições alimentares: {restrictions}\n"));
        }
        out
    }
}

impl From<&UserProfile> for ProfileDocument {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: Some(profile.name.clone()),
            email: None,
            age: Some(profile.age),
            weight: Some(profile.weight),
            height: Some(profile.height),
            gender: Some(profile.gender.clone()),
            goal: Some(profile.goal.clone()),
            experience_level: Some(profile.experience_level.clone()),
            dietary_restrictions: profile.dietary_restrictions.clone(),
            weekly_availability: Some(profile.weekly_availability.clone()),
            equipment_available: Some(profile.equipment_available.clone()),
            created_at: None,
        }
    }
}
