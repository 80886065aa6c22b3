use crate::db::{Agent, AgentDirectory};
use crate::error::UploadError;
use log::info;

/// Every distribution is split across exactly this many agents.
pub const CREW_SIZE: usize = 5;

/// Picks the agents taking part in one distribution run.
pub fn select_roster<D: AgentDirectory + ?Sized>(directory: &D) -> Result<Vec<Agent>, UploadError> {
    let agents = directory.list_agents()?;
    let roster = pick_crew(agents, CREW_SIZE)?;
    info!(
        "selected roster: {}",
        roster
            .iter()
            .map(|a| a.email.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(roster)
}

/// Takes the `crew_size` oldest agents, ordered by creation sequence and then id.
pub fn pick_crew(mut agents: Vec<Agent>, crew_size: usize) -> Result<Vec<Agent>, UploadError> {
    if agents.len() < crew_size {
        return Err(UploadError::InsufficientAgents {
            count: agents.len(),
            required: crew_size,
        });
    }

    agents.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.id.cmp(&b.id)));
    agents.truncate(crew_size);
    Ok(agents)
}
