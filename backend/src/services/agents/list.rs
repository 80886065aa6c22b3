use crate::db::AgentDirectory;
use crate::error::{error_response, StoreError};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::responses::AgentListResponse;

pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let store = state.store.clone();
    let result = web::block(move || store.list_agents())
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))
        .and_then(|r| r);

    match result {
        Ok(agents) => HttpResponse::Ok().json(AgentListResponse {
            agents: agents.iter().map(|a| a.summary()).collect(),
        }),
        Err(e) => error_response(&e, state.expose_errors()),
    }
}
