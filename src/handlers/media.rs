use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde::Deserialize;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::services::QuoteService;
use crate::storage::{MAX_ATTACHMENT_BYTES, QUOTE_ATTACHMENT_PREFIX, Upload};

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
    pub prefix: Option<String>,
}

/// POST /api/media/upload?filename=..&prefix=..: the raw request body is the
/// file. Returns the stored reference, which clients pass back as a quote's
/// `attachment_url`. The prefix defaults to the quote attachment area.
pub async fn upload(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    req: HttpRequest,
    query: web::Query<UploadParams>,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let body = match payload.to_bytes_limited(MAX_ATTACHMENT_BYTES).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => return Err(AppError::invalid(format!("Could not read upload: {e}"))),
        Err(_) => return Err(AppError::invalid("File too large (max 5MB)")),
    };

    let params = query.into_inner();
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let upload = Upload {
        content: body.to_vec(),
        filename: params.filename,
        content_type,
    };
    let prefix = params
        .prefix
        .unwrap_or_else(|| QUOTE_ATTACHMENT_PREFIX.to_string());

    let reference = svc.attachments().store(upload, &prefix).await?;
    tracing::info!(user = %user.0.id, %reference, "attachment uploaded");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "reference": reference })))
}
