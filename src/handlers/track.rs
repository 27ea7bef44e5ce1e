use actix_web::{HttpResponse, web};

use crate::activity::ActivityEntry;
use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::models::activity_log::TrackActivity;
use crate::services::QuoteService;

fn required(field: &str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// POST /api/track/activity: client-side tracking. Anonymous callers are
/// accepted. Entity type, entity id and action type must be non-blank; once
/// they are, the entry is queued and the call succeeds.
pub async fn track_activity(
    user: Option<AuthenticatedUser>,
    svc: web::Data<QuoteService>,
    body: web::Json<TrackActivity>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let entry = ActivityEntry {
        entity_type: required("entity_type", input.entity_type)?,
        entity_id: required("entity_id", input.entity_id)?,
        action_type: required("action_type", input.action_type)?,
        actor_user_id: user.map(|u| u.0.id),
        metadata: input.metadata,
        created_at: svc.now(),
    };
    svc.activity().record(entry);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "tracked" })))
}
