//! Error types for the list distribution server.
//!
//! Each stage of the upload pipeline has its own failure, and each failure is
//! surfaced to the client as-is: the operator needs to know which row, which
//! column or how many agents are missing. Store and I/O faults are the
//! exception; those are logged in full and reported with a generic message
//! unless the server runs in development mode.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use common::responses::MessageResponse;
use log::{error, warn};
use thiserror::Error;

/// Failures of the Agent Directory / Assignment Store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Agent with this email already exists: {0}")]
    DuplicateEmail(String),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The connection lock was poisoned or the blocking pool went away.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The first problem found in an uploaded table.
///
/// Rows are counted from 1 starting at the first data row, so the header is
/// never row 1.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Missing first name at row {row}")]
    EmptyFirstName { row: usize },

    #[error("Invalid phone number at row {row}")]
    InvalidPhone { row: usize },
}

impl ValidationError {
    pub fn row(&self) -> Option<usize> {
        match self {
            ValidationError::MissingColumn { .. } => None,
            ValidationError::EmptyFirstName { row } | ValidationError::InvalidPhone { row } => {
                Some(*row)
            }
        }
    }
}

/// Everything that can abort `POST /api/list/upload`.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("malformed multipart request: {0}")]
    Multipart(String),

    #[error("Only CSV, XLSX, and XLS files are allowed")]
    UnsupportedFileType,

    #[error("File size too large. Maximum {limit_mb}MB allowed.")]
    FileTooLarge { limit_mb: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("failed to parse file: {0}")]
    Parse(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Please add at least {required} agents before uploading. Currently you have {count} agents.")]
    InsufficientAgents { count: usize, required: usize },

    #[error("No agents available for distribution")]
    InvalidRoster,

    #[error("failed to store distribution: {0}")]
    Persistence(#[from] StoreError),

    #[error("failed to receive upload: {0}")]
    Io(String),
}

/// Failures of the agent management endpoints.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How an error is presented over HTTP.
pub trait ApiFailure: std::error::Error {
    fn status(&self) -> StatusCode;

    /// Message safe to show to the operator.
    fn public_message(&self) -> String {
        self.to_string()
    }

    /// Internal detail, echoed only in development mode.
    fn detail(&self) -> Option<String> {
        None
    }
}

impl ApiFailure for StoreError {
    fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::DuplicateEmail(_) => StatusCode::BAD_REQUEST,
            StoreError::Sqlite(_) | StoreError::Unavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            StoreError::NotFound { entity, .. } => format!("{} not found", entity),
            StoreError::DuplicateEmail(_) => "Agent with this email already exists".to_string(),
            StoreError::Sqlite(_) | StoreError::Unavailable(_) => {
                "Internal server error".to_string()
            }
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            StoreError::Sqlite(_) | StoreError::Unavailable(_) => Some(self.to_string()),
            _ => None,
        }
    }
}

impl ApiFailure for UploadError {
    fn status(&self) -> StatusCode {
        match self {
            UploadError::Persistence(_) | UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn public_message(&self) -> String {
        match self {
            UploadError::Multipart(_) => "Malformed upload request".to_string(),
            UploadError::Parse(_) => {
                "Unable to parse the uploaded file. Check that it is a valid CSV, XLSX or XLS file."
                    .to_string()
            }
            UploadError::Persistence(_) | UploadError::Io(_) => {
                "Server error during file upload and distribution".to_string()
            }
            other => other.to_string(),
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            UploadError::Multipart(_)
            | UploadError::Parse(_)
            | UploadError::Persistence(_)
            | UploadError::Io(_) => Some(self.to_string()),
            _ => None,
        }
    }
}

impl ApiFailure for AgentError {
    fn status(&self) -> StatusCode {
        match self {
            AgentError::Invalid(_) => StatusCode::BAD_REQUEST,
            AgentError::Store(e) => e.status(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            AgentError::Invalid(msg) => msg.clone(),
            AgentError::Store(e) => e.public_message(),
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            AgentError::Invalid(_) => None,
            AgentError::Store(e) => e.detail(),
        }
    }
}

/// Renders an error as `{ "message": ..., "error"?: ... }`.
///
/// Server-side faults are always logged with their full detail.
pub fn error_response<E: ApiFailure>(err: &E, expose_detail: bool) -> HttpResponse {
    let status = err.status();
    if status.is_server_error() {
        error!("{}", err);
    }

    let mut body = MessageResponse::new(err.public_message());
    if expose_detail {
        body.error = err.detail();
    }
    HttpResponse::build(status).json(body)
}

/// `JsonConfig` error handler: malformed request bodies get the same
/// `{ "message" }` shape as every other failure.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("rejected JSON body for {} {}: {}", req.method(), req.path(), err);

    let (status, message) = match &err {
        JsonPayloadError::Deserialize(e) if e.to_string().starts_with("missing field") => {
            (StatusCode::BAD_REQUEST, "All fields are required")
        }
        JsonPayloadError::Deserialize(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
        JsonPayloadError::ContentType => (err.status_code(), "Expected a JSON request body"),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            (err.status_code(), "Request body too large")
        }
        _ => (err.status_code(), "Invalid request body"),
    };

    let response = HttpResponse::build(status).json(MessageResponse::new(message));
    InternalError::from_response(err, response).into()
}
