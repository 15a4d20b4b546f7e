use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DocumentItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DocumentItems::DocumentId).integer().not_null())
                    .col(ColumnDef::new(DocumentItems::Ordinal).integer().not_null())
                    .col(
                        ColumnDef::new(DocumentItems::Product)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(DocumentItems::Price)
                            .decimal_len(18, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentItems::TaxRate).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(DocumentItems::DocumentId)
                            .col(DocumentItems::Ordinal),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DocumentItems::Table, DocumentItems::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Ordinal assignment looks up max(ordinal) per product.
        manager
            .create_index(
                Index::create()
                    .name("idx_document_items_product")
                    .table(DocumentItems::Table)
                    .col(DocumentItems::Product)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DocumentItems {
    Table,
    DocumentId,
    Ordinal,
    Product,
    Quantity,
    Price,
    TaxRate,
}

#[derive(Iden)]
enum Documents {
    Table,
    Id,
}
