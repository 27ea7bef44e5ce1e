use actix_web::{HttpResponse, web};

use crate::auth::middleware::AuthenticatedUser;
use crate::db::events as event_db;
use crate::error::AppError;
use crate::models::events::CreateEvent;
use crate::models::users::Roles;
use crate::services::QuoteService;

/// POST /api/events: an organizer creates an upcoming event.
pub async fn create_event(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
    body: web::Json<CreateEvent>,
) -> Result<HttpResponse, AppError> {
    let organizer = user.require_role(Roles::Organizer)?;

    let input = body.into_inner();
    if input.title.trim().is_empty() {
        return Err(AppError::invalid("title is required"));
    }

    let event = event_db::insert_event(svc.db(), organizer.id, input, svc.now()).await?;
    Ok(HttpResponse::Created().json(event))
}

/// GET /api/events/mine: the caller's events, newest first. Past events are
/// marked completed before listing.
pub async fn my_events(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
) -> Result<HttpResponse, AppError> {
    let organizer = user.require_role(Roles::Organizer)?;

    svc.complete_past_events(organizer.id).await?;
    let events = event_db::get_events_by_organizer(svc.db(), organizer.id).await?;
    Ok(HttpResponse::Ok().json(events))
}
