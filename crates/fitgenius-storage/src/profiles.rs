use std::sync::Arc;

use fitgenius_core::doc_paths;
use fitgenius_core::models::profile::{ProfileDocument, UserProfile};
use fitgenius_core::models::user::CurrentUser;
use tracing::info;

use crate::documents::{self, DocumentStore, SetOptions};
use crate::error::StorageError;

const DEFAULT_DISPLAY_NAME: &str = "Usuário";

/// Reads and writes the single profile record of each user.
#[derive(Clone)]
pub struct ProfileStore {
    documents: Arc<dyn DocumentStore>,
}

impl ProfileStore {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    pub async fn load(&self, user_id: &str) -> Result<Option<ProfileDocument>, StorageError> {
        let path = doc_paths::profile(user_id);
        documents::get_json(self.documents.as_ref(), &path)
            .await
            .map_err(|e| match e {
                StorageError::Serialization(err) => StorageError::InvalidDocument {
                    path,
                    reason: err.to_string(),
                },
                other => other,
            })
    }

    /// Load the user's profile, creating the sign-in record (display name,
    /// email, creation time) the first time the user is seen.
    pub async fn ensure(&self, user: &CurrentUser) -> Result<ProfileDocument, StorageError> {
        if let Some(existing) = self.load(&user.id).await? {
            return Ok(existing);
        }

        let record = ProfileDocument {
            name: Some(
                user.display_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            ),
            email: user.email.clone(),
            created_at: Some(jiff::Timestamp::now()),
            ..Default::default()
        };

        documents::set_json(
            self.documents.as_ref(),
            &doc_paths::profile(&user.id),
            &record,
            SetOptions::REPLACE,
        )
        .await?;

        info!(user_id = %user.id, "created profile record");
        Ok(record)
    }

    /// Save a validated form submission. Fields the form does not carry
    /// (email, creation time) are kept.
    pub async fn save(
        &self,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<ProfileDocument, StorageError> {
        let path = doc_paths::profile(user_id);
        let mut patch = serde_json::to_value(ProfileDocument::from(profile))?;

        // A cleared optional field must overwrite the stored value.
        if profile.dietary_restrictions.is_none()
            && let Some(obj) = patch.as_object_mut()
        {
            obj.insert("dietaryRestrictions".into(), serde_json::Value::Null);
        }

        self.documents.set(&path, patch, SetOptions::MERGE).await?;
        info!(user_id, "profile saved");

        self.load(user_id)
            .await?
            .ok_or_else(|| StorageError::InvalidDocument {
                path,
                reason: "profile vanished after write".to_string(),
            })
    }
}
