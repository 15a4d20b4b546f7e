use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserData::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserData::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserData::FirstName).string_len(30).not_null())
                    .col(ColumnDef::new(UserData::LastName).string_len(30).not_null())
                    .col(ColumnDef::new(UserData::City).string_len(100).not_null())
                    .col(ColumnDef::new(UserData::UserId).uuid().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserData::Table, UserData::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserData::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserData {
    Table,
    Id,
    FirstName,
    LastName,
    City,
    UserId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
