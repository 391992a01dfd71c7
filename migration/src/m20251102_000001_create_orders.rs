use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    FullName,
    Email,
    Phone,
    PreferredCommunication,
    ArtworkType,
    Medium,
    Size,
    ColorPalette,
    ImageUrls,
    Purpose,
    AddressLine1,
    AddressLine2,
    City,
    State,
    PostalCode,
    Country,
    AdditionalNotes,
    Newsletter,
    Status,
    OrderDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::FullName).string().not_null())
                    .col(ColumnDef::new(Orders::Email).string().not_null())
                    .col(ColumnDef::new(Orders::Phone).string().null())
                    .col(
                        ColumnDef::new(Orders::PreferredCommunication)
                            .string_len(20)
                            .not_null()
                            .default("email"),
                    )
                    .col(ColumnDef::new(Orders::ArtworkType).string().not_null())
                    .col(ColumnDef::new(Orders::Medium).string().not_null())
                    .col(ColumnDef::new(Orders::Size).string().not_null())
                    .col(ColumnDef::new(Orders::ColorPalette).text().null())
                    .col(
                        ColumnDef::new(Orders::ImageUrls)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Orders::Purpose).string().not_null())
                    .col(ColumnDef::new(Orders::AddressLine1).string().not_null())
                    .col(ColumnDef::new(Orders::AddressLine2).string().null())
                    .col(ColumnDef::new(Orders::City).string().not_null())
                    .col(ColumnDef::new(Orders::State).string().not_null())
                    .col(ColumnDef::new(Orders::PostalCode).string().not_null())
                    .col(ColumnDef::new(Orders::Country).string().not_null())
                    .col(ColumnDef::new(Orders::AdditionalNotes).text().null())
                    .col(
                        ColumnDef::new(Orders::Newsletter)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;

        Ok(())
    }
}
