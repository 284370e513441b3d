use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub title: String,
    #[sea_orm(column_name = "race")]
    pub race: String,
    #[sea_orm(column_name = "profession")]
    pub profession: String,
    #[sea_orm(column_name = "birthday")]
    pub birthday: OffsetDateTime,
    #[sea_orm(column_name = "banned")]
    pub banned: bool,
    #[sea_orm(column_name = "level")]
    pub level: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
