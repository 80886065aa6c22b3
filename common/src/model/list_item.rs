use serde::{Deserialize, Serialize};

/// A contact row that has been assigned to an agent.
///
/// The owning agent is implied by the distribution entry the item is listed
/// under, so it is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub first_name: String,
    /// Digits only.
    pub phone: String,
    /// Empty when the source row had no notes.
    pub notes: String,
}
