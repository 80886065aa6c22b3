use serde::{Deserialize, Serialize};

/// Public view of a registered agent.
///
/// This is what the server hands out for both the agent listing and the
/// `agent` field of every distribution entry. Credentials never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// UUID v4 assigned when the agent was registered.
    pub id: String,
    pub name: String,
    /// Lowercased, unique across the directory.
    pub email: String,
    /// E.164 formatted mobile number, e.g. `+14155550123`.
    pub mobile: String,
}
