use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::events as event_db;
use crate::db::vendors as vendor_db;
use crate::error::{AppError, AppResult};
use crate::models::users::{self, Roles};
use crate::models::{events, quotes, vendors};

/// How a caller relates to a quote.
#[derive(Debug, Clone)]
pub enum Party {
    Organizer,
    Vendor(vendors::Model),
}

pub fn require_role(user: &users::Model, role: Roles) -> AppResult<()> {
    if user.role == role {
        Ok(())
    } else {
        Err(AppError::forbidden("Forbidden: Insufficient permissions"))
    }
}

/// The event must exist and belong to `user_id`.
pub async fn verify_event_owner(
    db: &DatabaseConnection,
    event_id: Uuid,
    user_id: Uuid,
) -> AppResult<events::Model> {
    match event_db::get_event_by_id(db, event_id).await? {
        Some(event) if event.organizer_user_id == user_id => Ok(event),
        Some(_) => Err(AppError::forbidden("You do not own this event")),
        None => Err(AppError::not_found(format!("Event {event_id} not found"))),
    }
}

/// The caller's vendor profile; `Forbidden` when they have none.
pub async fn require_vendor_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> AppResult<vendors::Model> {
    vendor_db::get_vendor_by_owner(db, user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("Only vendors can respond"))
}

/// Whether `user` is the quote's organizer or owns its vendor profile.
pub async fn quote_party(
    db: &DatabaseConnection,
    quote: &quotes::Model,
    user: &users::Model,
) -> AppResult<Option<Party>> {
    if quote.organizer_user_id == user.id {
        return Ok(Some(Party::Organizer));
    }

    match vendor_db::get_vendor_by_owner(db, user.id).await? {
        Some(vendor) if vendor.id == quote.vendor_id => Ok(Some(Party::Vendor(vendor))),
        _ => Ok(None),
    }
}
