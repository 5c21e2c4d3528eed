use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: parent lookups walk template_id
        manager
            .create_index(
                Index::create()
                    .name("idx_service_template")
                    .table(Service::Table)
                    .col(Service::TemplateId)
                    .to_owned(),
            )
            .await?;

        // OnDemandMacro: one name per owner
        manager
            .create_index(
                Index::create()
                    .name("uniq_on_demand_macro_service_name")
                    .table(OnDemandMacro::Table)
                    .col(OnDemandMacro::ServiceId)
                    .col(OnDemandMacro::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_template").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_on_demand_macro_service_name").table(OnDemandMacro::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, TemplateId }

#[derive(DeriveIden)]
enum OnDemandMacro { Table, ServiceId, Name }
