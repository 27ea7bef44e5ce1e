use sea_orm::*;
use uuid::Uuid;

use crate::models::group_members::{self, MemberRole};
use crate::models::groups::{self, CreateGroup, MyGroup};

/// Create a group and its owner membership atomically. Either both rows exist
/// afterwards or neither does.
pub async fn create_group_with_owner(
    db: &DatabaseConnection,
    owner_user_id: Uuid,
    input: CreateGroup,
    slug: String,
) -> Result<groups::Model, DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let group = groups::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        slug: Set(slug),
        city: Set(input.city),
        description: Set(input.description),
        owner_user_id: Set(owner_user_id),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    group_members::ActiveModel {
        group_id: Set(group.id),
        user_id: Set(owner_user_id),
        role: Set(MemberRole::Owner),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    // Dropping an uncommitted transaction rolls it back, so any `?` above
    // leaves nothing behind.
    txn.commit().await?;
    Ok(group)
}

/// Groups a user belongs to, with their role in each.
pub async fn get_groups_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<MyGroup>, DbErr> {
    let rows = group_members::Entity::find()
        .filter(group_members::Column::UserId.eq(user_id))
        .find_also_related(groups::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(membership, group)| {
            group.map(|g| MyGroup {
                id: g.id,
                name: g.name,
                slug: g.slug,
                city: g.city,
                role: membership.role,
            })
        })
        .collect())
}
