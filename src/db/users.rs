use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, Roles};

/// Insert a user row. Accounts are provisioned by the auth service; this is
/// used by provisioning hooks and tests.
pub async fn insert_user(
    db: &DatabaseConnection,
    email: &str,
    full_name: &str,
    phone: Option<&str>,
    role: Roles,
) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        phone: Set(phone.map(str::to_string)),
        role: Set(role),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch users by ID in one round trip.
pub async fn get_users_by_ids(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<Vec<users::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await
}
