use sea_orm::entity::prelude::*;

/// Invoice-like document header.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// `type` is reserved in Rust.
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub date: Date,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document_items::Entity")]
    DocumentItems,
}

impl Related<super::document_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
