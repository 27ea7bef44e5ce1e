use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `vendor_profiles` table and its columns.
#[derive(DeriveIden)]
enum VendorProfiles {
    Table,
    Id,
    OwnerUserId,
    BusinessName,
    Category,
    City,
    Bio,
    WhatsappLink,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VendorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // One profile per owning user.
                    .col(
                        ColumnDef::new(VendorProfiles::OwnerUserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(VendorProfiles::BusinessName).string().not_null())
                    .col(ColumnDef::new(VendorProfiles::Category).string().not_null())
                    .col(ColumnDef::new(VendorProfiles::City).string().not_null())
                    .col(ColumnDef::new(VendorProfiles::Bio).text().null())
                    .col(ColumnDef::new(VendorProfiles::WhatsappLink).string().null())
                    .col(
                        ColumnDef::new(VendorProfiles::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(VendorProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_profiles_owner_user_id")
                            .from(VendorProfiles::Table, VendorProfiles::OwnerUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorProfiles::Table).to_owned())
            .await
    }
}
