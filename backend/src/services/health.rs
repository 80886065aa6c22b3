use actix_web::{web, HttpResponse, Responder, Scope};
use serde_json::json;

const API_PATH: &str = "/api/health";

/// `GET /api/health`, answered without touching the store.
pub fn configure_routes() -> Scope {
    web::scope(API_PATH).route("", web::get().to(process))
}

async fn process() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Server is running", "status": "OK" }))
}
