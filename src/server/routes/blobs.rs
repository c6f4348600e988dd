//! Blob upload and download endpoints

use crate::auth::RouteGuard;
use crate::server::middleware::authorize;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::PortalError;
use actix_multipart::Multipart;
use actix_web::http::header::{
    CacheControl, CacheDirective, ContentDisposition, ContentType, DispositionParam,
    DispositionType,
};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures::StreamExt;
use serde::Serialize;
use tracing::info;

/// Types rendered in place by browsers; everything else downloads
const INLINE_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "application/pdf",
];

/// Configure blob routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/admin/blobs", web::post().to(upload))
        .route("/api/blobs/{id}", web::get().to(download));
}

/// Stored upload as reported back to the uploader
#[derive(Debug, Clone, Serialize)]
pub struct UploadedBlob {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub size: u64,
}

/// Store every file part of a multipart body
async fn upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    authorize(&req, RouteGuard::Admin)?;
    let limit = state.config.storage().files.max_upload_size;
    let mut uploaded = Vec::new();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(PortalError::from)?;
        let Some(filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            continue;
        };

        let mut content = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(PortalError::from)?;
            if content.len() + chunk.len() > limit {
                return Err(PortalError::bad_request(format!(
                    "{} exceeds the {} byte upload limit",
                    filename, limit
                ))
                .into());
            }
            content.extend_from_slice(&chunk);
        }

        let metadata = state.storage.files.store(&filename, &content).await?;
        info!(file_id = %metadata.id, size = metadata.size, "Stored upload");
        uploaded.push(UploadedBlob {
            url: state.storage.blob_url(&metadata.id),
            id: metadata.id,
            filename: metadata.filename,
            size: metadata.size,
        });
    }

    if uploaded.is_empty() {
        return Err(PortalError::bad_request("No file parts in upload").into());
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(uploaded)))
}

async fn download(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let file = state.storage.files.get(&path).await?;
    let inline = INLINE_CONTENT_TYPES.contains(&file.metadata.content_type.as_str());
    let content_type = if inline {
        file.metadata
            .content_type
            .parse()
            .map(ContentType)
            .unwrap_or(ContentType::octet_stream())
    } else {
        ContentType::octet_stream()
    };

    let mut response = HttpResponse::Ok();
    response
        .insert_header(content_type)
        .insert_header(("X-Content-Type-Options", "nosniff"))
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(86_400),
        ]));
    if !inline {
        response.insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.metadata.filename.clone())],
        });
    }
    Ok(response.body(file.content))
}
