use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(pk_auto(Service::Id))
                    .col(string_len(Service::Description, 200).not_null())
                    .col(string_len_null(Service::Alias, 255))
                    .col(boolean(Service::IsTemplate).not_null().default(false))
                    .col(integer_null(Service::CommandId))
                    .col(integer_null(Service::TemplateId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_command")
                            .from(Service::Table, Service::CommandId)
                            .to(Command::Table, Command::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    // Templates may be parents of services and of other templates.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_template")
                            .from(Service::Table, Service::TemplateId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    Description,
    Alias,
    IsTemplate,
    CommandId,
    TemplateId,
}

#[derive(DeriveIden)]
enum Command { Table, Id }
