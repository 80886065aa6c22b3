//! HTTP surface of the list distribution pipeline.
//!
//! The provided routes are:
//! - `POST /api/list/upload`: multipart upload with a `file` field holding a
//!   `.csv`, `.xlsx` or `.xls` contact list. The file is parsed, validated and
//!   split across five agents; the response carries the resulting
//!   distribution.
//!
//! - `GET /api/list/agents`: the current distribution for every registered
//!   agent, in the same shape the upload returns.
//!
//! - `DELETE /api/list/items/{id}`: removes a single assigned item. Missing ids
//!   answer `404`.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod delete_item;
mod get_distribution;
mod upload;

const API_PATH: &str = "/api/list";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/agents", get().to(get_distribution::process))
        .route("/items/{id}", delete().to(delete_item::process))
}
