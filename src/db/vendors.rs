use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::vendors::{self, OnboardVendor, VendorStatus};

/// Insert a new vendor profile (defaults to Pending moderation).
pub async fn insert_vendor(
    db: &DatabaseConnection,
    owner_user_id: Uuid,
    input: OnboardVendor,
) -> Result<vendors::Model, DbErr> {
    let new_vendor = vendors::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_user_id: Set(owner_user_id),
        business_name: Set(input.business_name),
        category: Set(input.category),
        city: Set(input.city),
        bio: Set(input.bio),
        whatsapp_link: Set(input.whatsapp_link),
        status: Set(VendorStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_vendor.insert(db).await
}

/// Fetch a single vendor profile by ID.
pub async fn get_vendor_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<vendors::Model>, DbErr> {
    vendors::Entity::find_by_id(id).one(db).await
}

/// Fetch the vendor profile owned by a user, if they have one.
pub async fn get_vendor_by_owner(
    db: &DatabaseConnection,
    owner_user_id: Uuid,
) -> Result<Option<vendors::Model>, DbErr> {
    vendors::Entity::find()
        .filter(vendors::Column::OwnerUserId.eq(owner_user_id))
        .one(db)
        .await
}

pub async fn get_vendors_by_ids(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<Vec<vendors::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    vendors::Entity::find()
        .filter(vendors::Column::Id.is_in(ids))
        .all(db)
        .await
}

/// Vendor profiles awaiting moderation, oldest first.
pub async fn get_pending_vendors(db: &DatabaseConnection) -> Result<Vec<vendors::Model>, DbErr> {
    vendors::Entity::find()
        .filter(vendors::Column::Status.eq(VendorStatus::Pending))
        .order_by_asc(vendors::Column::CreatedAt)
        .all(db)
        .await
}

/// Move a pending profile to `status`. Returns the updated row, or `None` when
/// the profile does not exist or was already moderated.
pub async fn moderate_vendor(
    db: &DatabaseConnection,
    id: Uuid,
    status: VendorStatus,
) -> Result<Option<vendors::Model>, DbErr> {
    let result = vendors::Entity::update_many()
        .col_expr(vendors::Column::Status, Expr::value(status))
        .filter(vendors::Column::Id.eq(id))
        .filter(vendors::Column::Status.eq(VendorStatus::Pending))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }
    get_vendor_by_id(db, id).await
}
