use crate::db::AgentDirectory;
use crate::distribution::materializer;
use crate::error::{error_response, AgentError, StoreError};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::responses::AgentDeletedResponse;
use log::info;

/// Deletes the agent after cascading to its list items.
pub(crate) async fn process(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    match delete_agent(&state, id.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e, state.expose_errors()),
    }
}

async fn delete_agent(state: &AppState, id: String) -> Result<AgentDeletedResponse, AgentError> {
    let store = state.store.clone();
    let (agent, removed_items) = web::block(move || {
        let agent = store.get_agent(&id)?;
        let cascaded = materializer::delete_agent_items(&store, &id)?;
        // Catches items an upload assigned between the two calls.
        let stragglers = store.delete_agent(&id)?;
        Ok::<_, StoreError>((agent, cascaded + stragglers))
    })
    .await
    .map_err(|e| StoreError::Unavailable(e.to_string()))??;

    info!(
        "deleted agent {} <{}> with {} list items",
        agent.id, agent.email, removed_items
    );
    Ok(AgentDeletedResponse {
        message: "Agent deleted successfully".to_string(),
        removed_items,
    })
}
