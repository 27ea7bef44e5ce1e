use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::events::{self, CreateEvent, EventStatus};

/// Insert a new event. Generic over the connection so quote creation can run
/// it inside its transaction.
pub async fn insert_event<C: ConnectionTrait>(
    db: &C,
    organizer_user_id: Uuid,
    input: CreateEvent,
    now: DateTime<Utc>,
) -> Result<events::Model, DbErr> {
    let new_event = events::ActiveModel {
        id: Set(Uuid::new_v4()),
        organizer_user_id: Set(organizer_user_id),
        title: Set(input.title),
        city: Set(input.city),
        event_date: Set(input.event_date),
        status: Set(EventStatus::Upcoming),
        completed_at: Set(None),
        created_at: Set(now),
    };

    new_event.insert(db).await
}

/// Fetch a single event by ID.
pub async fn get_event_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<events::Model>, DbErr> {
    events::Entity::find_by_id(id).one(db).await
}

pub async fn get_events_by_ids(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<Vec<events::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    events::Entity::find()
        .filter(events::Column::Id.is_in(ids))
        .all(db)
        .await
}

/// All events of one organizer, newest first.
pub async fn get_events_by_organizer(
    db: &DatabaseConnection,
    organizer_user_id: Uuid,
) -> Result<Vec<events::Model>, DbErr> {
    events::Entity::find()
        .filter(events::Column::OrganizerUserId.eq(organizer_user_id))
        .order_by_desc(events::Column::CreatedAt)
        .all(db)
        .await
}

/// Mark the organizer's events dated before `today` as completed.
/// Returns how many rows flipped.
pub async fn complete_past_events(
    db: &DatabaseConnection,
    organizer_user_id: Uuid,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = events::Entity::update_many()
        .col_expr(events::Column::Status, Expr::value(EventStatus::Completed))
        .col_expr(events::Column::CompletedAt, Expr::value(now))
        .filter(events::Column::OrganizerUserId.eq(organizer_user_id))
        .filter(events::Column::EventDate.lt(today))
        .filter(events::Column::Status.ne(EventStatus::Completed))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
