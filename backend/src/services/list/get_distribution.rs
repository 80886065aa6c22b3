use crate::distribution::materializer;
use crate::error::{error_response, StoreError};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};

/// `GET /api/list/agents`: every agent with its currently assigned items.
pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let store = state.store.clone();
    let result = web::block(move || materializer::read_distribution(&store))
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))
        .and_then(|r| r);

    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e, state.expose_errors()),
    }
}
