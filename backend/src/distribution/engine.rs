//! Even split of validated records across a roster.
//!
//! With `n` records and `k` agents every agent receives `n / k` records and the
//! first `n % k` agents in roster order receive one more. Records are dealt in
//! contiguous runs, so each bucket keeps the source row order.

use crate::db::Agent;
use crate::error::UploadError;

/// The records dealt to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<'a, T> {
    pub agent: &'a Agent,
    pub items: Vec<T>,
}

/// Bucket size for every roster position.
pub fn bucket_sizes(records: usize, agents: usize) -> Vec<usize> {
    if agents == 0 {
        return Vec::new();
    }
    let base = records / agents;
    let extra = records % agents;
    (0..agents).map(|i| base + usize::from(i < extra)).collect()
}

pub fn distribute<T>(records: Vec<T>, roster: &[Agent]) -> Result<Vec<Bucket<'_, T>>, UploadError> {
    if roster.is_empty() {
        return Err(UploadError::InvalidRoster);
    }

    let sizes = bucket_sizes(records.len(), roster.len());
    let mut records = records.into_iter();

    Ok(roster
        .iter()
        .zip(sizes)
        .map(|(agent, size)| Bucket {
            agent,
            items: records.by_ref().take(size).collect(),
        })
        .collect())
}
