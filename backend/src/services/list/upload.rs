use crate::config::ServerConfig;
use crate::distribution::parser::TabularFormat;
use crate::distribution::{self, UploadedFile};
use crate::error::{error_response, UploadError};
use crate::state::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse, Responder};
use common::model::distribution::UploadResponse;
use futures_util::StreamExt;
use log::info;
use md5::Context;
use std::io::Write;

/// HTTP handler wrapper that converts the pipeline result to an `HttpResponse`.
///
/// - On success: `200 OK` with an [`UploadResponse`].
/// - On failure: `400`/`500` with a `{ "message" }` body naming the failed stage.
pub(crate) async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match upload_and_distribute(&state, payload).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e, state.expose_errors()),
    }
}

async fn upload_and_distribute(
    state: &AppState,
    payload: Multipart,
) -> Result<UploadResponse, UploadError> {
    let upload = receive_file(payload, &state.config).await?;
    info!(
        "received {} ({:?}, {} bytes, md5 {})",
        upload.original_name, upload.format, upload.size, upload.md5
    );

    let store = state.store.clone();
    let outcome = web::block(move || distribution::distribute_upload(&store, upload))
        .await
        .map_err(|e| UploadError::Io(e.to_string()))??;

    Ok(UploadResponse {
        message: "File uploaded and distributed successfully".to_string(),
        distribution: outcome.distribution,
        total_items: outcome.total_items,
    })
}

/// Streams the `file` field into a temp file, enforcing type and size limits.
///
/// The extension is checked before anything is written. The temp file is
/// dropped (and deleted) as soon as the size limit is crossed. Rejected
/// requests are read to the end before the error is returned.
async fn receive_file(
    mut payload: Multipart,
    config: &ServerConfig,
) -> Result<UploadedFile, UploadError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Multipart(e.to_string()))?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if field_name.as_deref() != Some("file") {
            continue;
        }

        let original_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let Some(original_name) = original_name else {
            discard_rest(&mut field, &mut payload).await;
            return Err(UploadError::MissingFile);
        };
        let Some(format) = TabularFormat::from_file_name(&original_name) else {
            discard_rest(&mut field, &mut payload).await;
            return Err(UploadError::UnsupportedFileType);
        };

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(format.extension())
            .tempfile()
            .map_err(|e| UploadError::Io(e.to_string()))?;
        let mut hasher = Context::new();
        let mut size: u64 = 0;

        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
            size += chunk.len() as u64;
            if size > config.max_upload_bytes {
                drop(file);
                discard_rest(&mut field, &mut payload).await;
                return Err(UploadError::FileTooLarge {
                    limit_mb: config.max_upload_mb(),
                });
            }
            hasher.consume(&chunk);
            file.write_all(&chunk)
                .map_err(|e| UploadError::Io(e.to_string()))?;
        }
        file.flush().map_err(|e| UploadError::Io(e.to_string()))?;

        return Ok(UploadedFile {
            file,
            original_name,
            format,
            size,
            md5: format!("{:x}", hasher.finalize()),
        });
    }

    Err(UploadError::MissingFile)
}

/// Reads the remainder of the request without storing it, so the client gets
/// the error body instead of a reset connection.
async fn discard_rest(field: &mut Field, payload: &mut Multipart) {
    while let Some(Ok(_)) = field.next().await {}
    while let Some(Ok(mut part)) = payload.next().await {
        while let Some(Ok(_)) = part.next().await {}
    }
}
