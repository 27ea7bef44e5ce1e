use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the append-only `platform_activity_log` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platform_activity_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: String,
    pub action_type: String,
    pub actor_user_id: Option<Uuid>,
    pub metadata: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/track/activity`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackActivity {
    pub entity_type: String,
    pub entity_id: String,
    pub action_type: String,
    pub metadata: Option<serde_json::Value>,
}
