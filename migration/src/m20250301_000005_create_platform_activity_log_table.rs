use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the append-only `platform_activity_log` table.
#[derive(DeriveIden)]
enum PlatformActivityLog {
    Table,
    Id,
    EntityType,
    EntityId,
    ActionType,
    ActorUserId,
    Metadata,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign keys: the log must accept entries for anonymous actors
        // and for entities that are later deleted.
        manager
            .create_table(
                Table::create()
                    .table(PlatformActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlatformActivityLog::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlatformActivityLog::EntityType).string().not_null())
                    .col(ColumnDef::new(PlatformActivityLog::EntityId).string().not_null())
                    .col(ColumnDef::new(PlatformActivityLog::ActionType).string().not_null())
                    .col(ColumnDef::new(PlatformActivityLog::ActorUserId).uuid().null())
                    .col(ColumnDef::new(PlatformActivityLog::Metadata).json().null())
                    .col(
                        ColumnDef::new(PlatformActivityLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlatformActivityLog::Table).to_owned())
            .await
    }
}
