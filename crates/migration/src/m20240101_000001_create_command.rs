use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Command::Table)
                    .if_not_exists()
                    .col(pk_auto(Command::Id))
                    .col(string_len(Command::Name, 200).not_null())
                    .col(text(Command::CommandLine).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Command::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Command {
    Table,
    Id,
    Name,
    CommandLine,
}
