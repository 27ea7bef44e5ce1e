use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation state of a vendor profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum VendorStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// SeaORM entity for the `vendor_profiles` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub owner_user_id: Uuid,
    pub business_name: String,
    pub category: String,
    pub city: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub whatsapp_link: Option<String>,
    pub status: VendorStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerUserId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::quotes::Entity")]
    Quotes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/vendor/onboard`.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardVendor {
    pub business_name: String,
    pub category: String,
    pub city: String,
    pub bio: Option<String>,
    pub whatsapp_link: Option<String>,
}
