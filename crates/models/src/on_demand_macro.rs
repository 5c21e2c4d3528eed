use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{errors, service};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "on_demand_macro")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: i32,
    pub name: String,
    pub value: String,
    pub is_password: bool,
    pub description: Option<String>,
    pub macro_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity).from(Column::ServiceId).to(service::Column::Id).into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Macros declared directly on `service_id`, in display order.
pub async fn list_for_service(db: &DatabaseConnection, service_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .filter(Column::ServiceId.eq(service_id))
        .order_by_asc(Column::MacroOrder)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}
