use sea_orm::*;
use uuid::Uuid;

use crate::activity::ActivityEntry;
use crate::models::activity_log;

/// Append one entry to `platform_activity_log`.
pub async fn insert_entry(
    db: &DatabaseConnection,
    entry: ActivityEntry,
) -> Result<activity_log::Model, DbErr> {
    let row = activity_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        entity_type: Set(entry.entity_type),
        entity_id: Set(entry.entity_id),
        action_type: Set(entry.action_type),
        actor_user_id: Set(entry.actor_user_id),
        metadata: Set(entry.metadata),
        created_at: Set(entry.created_at),
    };

    row.insert(db).await
}

/// Entries for one entity, oldest first.
pub async fn get_entries_for_entity(
    db: &DatabaseConnection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<activity_log::Model>, DbErr> {
    activity_log::Entity::find()
        .filter(activity_log::Column::EntityType.eq(entity_type))
        .filter(activity_log::Column::EntityId.eq(entity_id))
        .order_by_asc(activity_log::Column::CreatedAt)
        .all(db)
        .await
}
