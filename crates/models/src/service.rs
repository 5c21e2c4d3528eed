use sea_orm::{entity::prelude::*, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::{command, errors};

/// Services and service templates share this table; `template_id` points at
/// the direct parent template.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub alias: Option<String>,
    pub is_template: bool,
    pub command_id: Option<i32>,
    pub template_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Command, Template }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Command => Entity::belongs_to(command::Entity).from(Column::CommandId).to(command::Column::Id).into(),
            Relation::Template => Entity::belongs_to(Entity).from(Column::TemplateId).to(Column::Id).into(),
        }
    }
}

impl Related<command::Entity> for Entity {
    fn to() -> RelationDef { Relation::Command.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}
