//! Persisted feedback opinion entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "opinions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub happy: bool,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    // Derived product.platform.channel identifier, e.g. "firefox.desktop.stable"
    pub prodchan: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub platform: Option<String>,
    pub locale: Option<String>,
    // Only set for reports coming from mobile devices
    pub manufacturer: Option<String>,
    pub device: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::opinion_email::Entity")]
    OpinionEmail,
}

impl Related<super::opinion_email::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpinionEmail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
