use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OnDemandMacro::Table)
                    .if_not_exists()
                    .col(pk_auto(OnDemandMacro::Id))
                    .col(integer(OnDemandMacro::ServiceId).not_null())
                    .col(string_len(OnDemandMacro::Name, 255).not_null())
                    .col(text(OnDemandMacro::Value).not_null())
                    .col(boolean(OnDemandMacro::IsPassword).not_null().default(false))
                    .col(text_null(OnDemandMacro::Description))
                    .col(integer(OnDemandMacro::MacroOrder).not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_on_demand_macro_service")
                            .from(OnDemandMacro::Table, OnDemandMacro::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OnDemandMacro::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OnDemandMacro {
    Table,
    Id,
    ServiceId,
    Name,
    Value,
    IsPassword,
    Description,
    MacroOrder,
}

#[derive(DeriveIden)]
enum Service { Table, Id }
