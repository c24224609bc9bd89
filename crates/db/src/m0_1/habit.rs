use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Habit;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Habit::Table)
        .col(
            ColumnDef::new(Habit::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Habit::Title)
                .string()
                .not_null()
                .string_len(100),
        )
        .col(ColumnDef::new(Habit::Description).text().null())
        .col(
            ColumnDef::new(Habit::Frequency)
                .string()
                .not_null()
                .string_len(10)
                .default("daily"),
        )
        .col(ColumnDef::new(Habit::FrequencyCount).integer().null())
        .col(
            ColumnDef::new(Habit::FrequencyPeriod)
                .string()
                .string_len(10)
                .null(),
        )
        .col(
            ColumnDef::new(Habit::SelectedDays)
                .text()
                .not_null()
                .default("[]"),
        )
        .col(
            ColumnDef::new(Habit::ReminderEnabled)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Habit::ReminderTime)
                .string()
                .string_len(5)
                .null(),
        )
        .col(ColumnDef::new(Habit::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Habit::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
