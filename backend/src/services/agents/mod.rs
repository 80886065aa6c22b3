//! # Agent Service Module
//!
//! Registration and maintenance of the agents that list items are distributed
//! to. Routes live under `/api/agents`:
//!
//! *   **`POST /add`**: registers an agent from a `NewAgent` JSON body.
//! *   **`GET /`**: lists every agent, oldest first. This is the order the
//!     upload pipeline picks its five agents from.
//! *   **`PUT /{id}`**: partially updates name, email or mobile.
//! *   **`DELETE /{id}`**: removes the agent and every list item assigned to it.
//!     The remaining items are not redistributed.

mod create;
mod delete;
mod list;
mod update;
mod validation;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/agents";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/add", post().to(create::process))
        .route("", get().to(list::process))
        .route("/", get().to(list::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
}
