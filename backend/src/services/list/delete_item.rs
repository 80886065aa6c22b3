use crate::distribution::materializer;
use crate::error::{error_response, StoreError};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::responses::MessageResponse;

/// `DELETE /api/list/items/{id}`. Deleting an unknown id is a `404`, not a no-op.
pub(crate) async fn process(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let store = state.store.clone();
    let id = id.into_inner();
    let result = web::block(move || materializer::delete_item(&store, &id))
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))
        .and_then(|r| r);

    match result {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("List item deleted successfully")),
        Err(e) => error_response(&e, state.expose_errors()),
    }
}
