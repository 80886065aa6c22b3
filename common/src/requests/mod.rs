use serde::Deserialize;

/// Request payload for `POST /api/agents/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub email: String,
    pub mobile: String,
}

/// Request payload for `PUT /api/agents/{id}`.
///
/// Absent or empty fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}
