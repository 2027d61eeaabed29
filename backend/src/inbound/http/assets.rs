//! Logo and pitch deck uploads.
//!
//! ```text
//! POST /api/v1/assets/{kind}?filename=deck.pdf   (raw body)
//! GET  /api/v1/assets/{kind}/{name}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, MAX_ASSET_BYTES};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_asset_kind, parse_asset_name};

/// Query string for uploads.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Original file name; only its extension is kept.
    pub filename: Option<String>,
}

/// Where an upload can be fetched from.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedAsset {
    #[schema(example = "https://pitchmatch.example/api/v1/assets/logos/logo_4f1c.png")]
    pub url: String,
}

async fn read_capped(mut payload: web::Payload) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk =
            chunk.map_err(|err| Error::invalid_request(format!("failed to read upload: {err}")))?;
        if bytes.len() + chunk.len() > MAX_ASSET_BYTES {
            return Err(
                Error::invalid_request(format!("upload exceeds {MAX_ASSET_BYTES} bytes"))
                    .with_details(json!({ "limit": MAX_ASSET_BYTES })),
            );
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn content_type_for(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Store an upload under a fresh name. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/assets/{kind}",
    params(
        ("kind" = String, Path, description = "`logos` or `pitch-decks`"),
        UploadQuery
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Asset stored", body = UploadedAsset),
        (status = 400, description = "Unknown kind, empty or oversized body", body = Error),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["assets"],
    operation_id = "uploadAsset",
    security(("SessionCookie" = []))
)]
#[post("/assets/{kind}")]
pub async fn upload_asset(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<UploadQuery>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;
    let kind = parse_asset_kind(&path.into_inner())?;
    let bytes = read_capped(payload).await?;
    let url = state
        .assets
        .upload(kind, query.into_inner().filename, bytes)
        .await?;
    Ok(HttpResponse::Created().json(UploadedAsset { url }))
}

/// Serve a stored asset.
///
/// Names are random and never reused, so responses are cacheable.
#[utoipa::path(
    get,
    path = "/api/v1/assets/{kind}/{name}",
    params(
        ("kind" = String, Path, description = "`logos` or `pitch-decks`"),
        ("name" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "Asset bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Unknown asset", body = Error)
    ),
    tags = ["assets"],
    operation_id = "downloadAsset"
)]
#[get("/assets/{kind}/{name}")]
pub async fn download_asset(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (kind, name) = path.into_inner();
    let kind = parse_asset_kind(&kind)?;
    let name = parse_asset_name(&name)?;
    let bytes = state.assets.download(kind, &name).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(name.as_str())))
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .body(bytes))
}
