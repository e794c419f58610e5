use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrentUser {
    /// Stable identity provider subject; keys the user's documents.
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}
