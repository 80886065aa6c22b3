//! Writes distributed records to the Assignment Store and reads them back in
//! the grouped per-agent shape.
//!
//! Upload responses and `GET /api/list/agents` both go through
//! [`group_by_agent`], so the two always have the same structure.

use super::engine::Bucket;
use super::validator::ValidatedRecord;
use crate::db::{Agent, AgentDirectory, Assignment, AssignmentStore, NewAssignment};
use crate::error::StoreError;
use common::model::distribution::{DistributionEntry, DistributionResponse};
use log::{info, warn};
use std::collections::HashMap;

/// Persists every bucket as one batch and returns the grouped result for the
/// agents of those buckets.
pub fn persist<S: AssignmentStore + ?Sized>(
    store: &S,
    buckets: Vec<Bucket<'_, ValidatedRecord>>,
) -> Result<Vec<DistributionEntry>, StoreError> {
    let agents: Vec<Agent> = buckets.iter().map(|b| b.agent.clone()).collect();
    let records: Vec<NewAssignment> = buckets
        .into_iter()
        .flat_map(|bucket| {
            let agent_id = bucket.agent.id.clone();
            bucket.items.into_iter().map(move |record| NewAssignment {
                first_name: record.first_name,
                phone: record.phone,
                notes: record.notes,
                assigned_to: agent_id.clone(),
            })
        })
        .collect();

    let saved = store.insert_batch(&records)?;
    info!("stored {} list items for {} agents", saved.len(), agents.len());
    Ok(group_by_agent(&agents, &saved))
}

/// Current state of every agent in the directory, including those without items.
pub fn read_distribution<S>(store: &S) -> Result<DistributionResponse, StoreError>
where
    S: AgentDirectory + AssignmentStore + ?Sized,
{
    let agents = store.list_agents()?;
    let assignments = store.find_all()?;
    let distribution = group_by_agent(&agents, &assignments);

    Ok(DistributionResponse {
        total_items: total_items(&distribution),
        distribution,
    })
}

/// Removes one assignment. The remaining items are not rebalanced.
pub fn delete_item<S: AssignmentStore + ?Sized>(store: &S, id: &str) -> Result<(), StoreError> {
    store.delete_by_id(id)?;
    info!("deleted list item {}", id);
    Ok(())
}

/// Removes every assignment of an agent. The remaining items are not rebalanced.
pub fn delete_agent_items<S: AssignmentStore + ?Sized>(
    store: &S,
    agent_id: &str,
) -> Result<usize, StoreError> {
    let removed = store.delete_by_agent(agent_id)?;
    info!("deleted {} list items of agent {}", removed, agent_id);
    Ok(removed)
}

/// One entry per agent, in the given agent order, with each agent's
/// assignments in the order they are given.
pub fn group_by_agent(agents: &[Agent], assignments: &[Assignment]) -> Vec<DistributionEntry> {
    let mut entries: Vec<DistributionEntry> = agents
        .iter()
        .map(|agent| DistributionEntry {
            agent: agent.summary(),
            items: Vec::new(),
        })
        .collect();
    let index: HashMap<&str, usize> = agents
        .iter()
        .enumerate()
        .map(|(i, agent)| (agent.id.as_str(), i))
        .collect();

    for assignment in assignments {
        match index.get(assignment.assigned_to.as_str()) {
            Some(&i) => entries[i].items.push(assignment.to_list_item()),
            None => warn!(
                "list item {} references unknown agent {}",
                assignment.id, assignment.assigned_to
            ),
        }
    }
    entries
}

pub fn total_items(distribution: &[DistributionEntry]) -> usize {
    distribution.iter().map(|entry| entry.items.len()).sum()
}
