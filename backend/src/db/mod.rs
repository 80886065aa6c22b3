//! Persistence collaborators of the distribution pipeline.
//!
//! The pipeline only ever talks to the two traits below. [`SqliteStore`]
//! implements both and is the handle `main` constructs and shares with every
//! request; tests build their own in-memory instance.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::StoreError;
use common::model::agent::AgentSummary;
use common::model::list_item::ListItem;

/// A registered agent as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Creation sequence. Directory listings are ordered by this key.
    pub seq: i64,
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
}

impl Agent {
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
        }
    }
}

/// A record waiting to be persisted for an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub assigned_to: String,
}

/// A persisted record-to-agent link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: String,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub assigned_to: String,
}

impl Assignment {
    pub fn to_list_item(&self) -> ListItem {
        ListItem {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            phone: self.phone.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Read access to registered agents.
pub trait AgentDirectory {
    /// Every agent, oldest first.
    fn list_agents(&self) -> Result<Vec<Agent>, StoreError>;

    fn get_agent(&self, id: &str) -> Result<Agent, StoreError>;
}

/// Storage for distributed records.
pub trait AssignmentStore {
    /// Persists the whole batch or nothing. Returned assignments carry their
    /// generated ids and keep the input order.
    fn insert_batch(&self, records: &[NewAssignment]) -> Result<Vec<Assignment>, StoreError>;

    /// Every assignment in insertion order.
    fn find_all(&self) -> Result<Vec<Assignment>, StoreError>;

    /// Fails with [`StoreError::NotFound`] when `id` does not exist.
    fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    /// Returns how many assignments were removed.
    fn delete_by_agent(&self, agent_id: &str) -> Result<usize, StoreError>;
}
