use crate::model::agent::AgentSummary;
use crate::model::list_item::ListItem;
use serde::{Deserialize, Serialize};

/// One agent together with the items currently assigned to it.
///
/// Agents without any items are still listed, with an empty `items` vector.
/// Items keep the order in which they were stored, which is the row order of
/// the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub agent: AgentSummary,
    pub items: Vec<ListItem>,
}

/// Body of `GET /api/list/agents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResponse {
    pub distribution: Vec<DistributionEntry>,
    pub total_items: usize,
}

/// Body of a successful `POST /api/list/upload`.
///
/// `distribution` has exactly the same shape as [`DistributionResponse`],
/// limited to the agents that took part in this upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub distribution: Vec<DistributionEntry>,
    pub total_items: usize,
}
