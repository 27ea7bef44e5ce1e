use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum QuoteRequests {
    Table,
    OrganizerUserId,
    VendorId,
    Status,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    OrganizerUserId,
}

#[derive(DeriveIden)]
enum GroupMembers {
    Table,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Organizer listing and organizer-side sweep
        manager
            .create_index(
                Index::create()
                    .name("idx_quote_requests_organizer_user_id")
                    .table(QuoteRequests::Table)
                    .col(QuoteRequests::OrganizerUserId)
                    .to_owned(),
            )
            .await?;

        // Vendor listing and vendor-side sweep
        manager
            .create_index(
                Index::create()
                    .name("idx_quote_requests_vendor_id")
                    .table(QuoteRequests::Table)
                    .col(QuoteRequests::VendorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quote_requests_status")
                    .table(QuoteRequests::Table)
                    .col(QuoteRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_organizer_user_id")
                    .table(Events::Table)
                    .col(Events::OrganizerUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_members_user_id")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_quote_requests_organizer_user_id",
            "idx_quote_requests_vendor_id",
            "idx_quote_requests_status",
            "idx_events_organizer_user_id",
            "idx_group_members_user_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
