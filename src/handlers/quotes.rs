use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::models::quotes::{CreateQuoteRequest, RespondQuote, RevisionRequest};
use crate::services::QuoteService;

/// POST /api/quotes/request: an organizer asks a vendor for a quote.
///
/// Takes either `event_id` for an event the caller owns, or an inline `event`
/// object which is created in the same transaction as the quote.
pub async fn create_quote(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    body: web::Json<CreateQuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let quote = svc.create(&user.0, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(quote))
}

/// GET /api/quotes/vendor: quotes addressed to the caller's vendor profile.
pub async fn vendor_quotes(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(svc.list_for_vendor(&user.0).await?))
}

/// GET /api/quotes/organizer: quotes the caller has requested.
pub async fn organizer_quotes(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(svc.list_for_organizer(&user.0).await?))
}

/// GET /api/quotes/{id}
pub async fn get_quote(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(svc.get(&user.0, path.into_inner()).await?))
}

/// PATCH /api/quotes/respond/{id}: the vendor sets a price, an optional note
/// and an optional attachment reference.
pub async fn respond(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    path: web::Path<Uuid>,
    body: web::Json<RespondQuote>,
) -> Result<HttpResponse, AppError> {
    let quote = svc
        .respond(&user.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(quote))
}

/// PATCH /api/quotes/accept/{id}: unlocks contact details for both parties.
pub async fn accept(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(svc.accept(&user.0, path.into_inner()).await?))
}

/// PATCH /api/quotes/reject/{id}
pub async fn reject(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(svc.reject(&user.0, path.into_inner()).await?))
}

/// PATCH /api/quotes/revision/{id} (alias: /request-revision/{id}).
///
/// The body is optional; when present it may carry a `message` for the vendor.
pub async fn request_revision(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    path: web::Path<Uuid>,
    body: Option<web::Json<RevisionRequest>>,
) -> Result<HttpResponse, AppError> {
    let message = body.map(|b| b.into_inner()).unwrap_or_default().message;
    let quote = svc
        .request_revision(&user.0, path.into_inner(), message)
        .await?;
    Ok(HttpResponse::Ok().json(quote))
}

/// GET /api/quotes/{id}/contact: contact details of both parties, only while
/// the quote is accepted, unarchived and its event has not completed.
pub async fn contact(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(svc.contact(&user.0, path.into_inner()).await?))
}

/// GET /api/quotes/{id}/attachment: a short-lived signed URL.
pub async fn attachment(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let url = svc.attachment_url(&user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "url": url })))
}
