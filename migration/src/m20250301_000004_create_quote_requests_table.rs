use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `quote_requests` table and its columns.
#[derive(DeriveIden)]
enum QuoteRequests {
    Table,
    Id,
    EventId,
    VendorId,
    OrganizerUserId,
    Message,
    BudgetRange,
    SpecialRequirements,
    Deadline,
    AttachmentUrl,
    QuotedPrice,
    VendorResponse,
    RevisionMessage,
    Status,
    CreatedAt,
    RespondedAt,
    AcceptedAt,
    RejectedAt,
    RevisionRequestedAt,
    ContactUnlockedAt,
    ContactExpiresAt,
    ArchivedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum VendorProfiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

fn nullable_timestamp(col: QuoteRequests) -> ColumnDef {
    ColumnDef::new(col).timestamp_with_time_zone().null().to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuoteRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuoteRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuoteRequests::EventId).uuid().not_null())
                    .col(ColumnDef::new(QuoteRequests::VendorId).uuid().not_null())
                    .col(ColumnDef::new(QuoteRequests::OrganizerUserId).uuid().not_null())
                    .col(ColumnDef::new(QuoteRequests::Message).text().not_null())
                    .col(ColumnDef::new(QuoteRequests::BudgetRange).string().null())
                    .col(ColumnDef::new(QuoteRequests::SpecialRequirements).text().null())
                    .col(nullable_timestamp(QuoteRequests::Deadline))
                    .col(ColumnDef::new(QuoteRequests::AttachmentUrl).text().null())
                    .col(ColumnDef::new(QuoteRequests::QuotedPrice).double().null())
                    .col(ColumnDef::new(QuoteRequests::VendorResponse).text().null())
                    .col(ColumnDef::new(QuoteRequests::RevisionMessage).text().null())
                    .col(
                        ColumnDef::new(QuoteRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(QuoteRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(nullable_timestamp(QuoteRequests::RespondedAt))
                    .col(nullable_timestamp(QuoteRequests::AcceptedAt))
                    .col(nullable_timestamp(QuoteRequests::RejectedAt))
                    .col(nullable_timestamp(QuoteRequests::RevisionRequestedAt))
                    .col(nullable_timestamp(QuoteRequests::ContactUnlockedAt))
                    .col(nullable_timestamp(QuoteRequests::ContactExpiresAt))
                    .col(nullable_timestamp(QuoteRequests::ArchivedAt))
                    .col(nullable_timestamp(QuoteRequests::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quote_requests_event_id")
                            .from(QuoteRequests::Table, QuoteRequests::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quote_requests_vendor_id")
                            .from(QuoteRequests::Table, QuoteRequests::VendorId)
                            .to(VendorProfiles::Table, VendorProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quote_requests_organizer_user_id")
                            .from(QuoteRequests::Table, QuoteRequests::OrganizerUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // SQLite cannot add constraints after the fact; the entity enum guards it there.
        if manager.get_database_backend() == DbBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "ALTER TABLE quote_requests ADD CONSTRAINT chk_quote_requests_status_valid CHECK (status IN ('pending', 'responded', 'accepted', 'rejected', 'revision_requested', 'archived'))",
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuoteRequests::Table).to_owned())
            .await
    }
}
