use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, IndexDropStatement,
    Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Habit, HabitCompletion};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(HabitCompletion::Table)
        .col(
            ColumnDef::new(HabitCompletion::HabitId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(HabitCompletion::Date)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(HabitCompletion::Completed)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(HabitCompletion::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .col(HabitCompletion::HabitId)
                .col(HabitCompletion::Date),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_habit_completion_habit")
                .from(HabitCompletion::Table, HabitCompletion::HabitId)
                .to(Habit::Table, Habit::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(HabitCompletion::Table).to_owned()
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

pub struct CreateDateIdx;

fn create_date_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_habit_completion_date")
        .table(HabitCompletion::Table)
        .col(HabitCompletion::Date)
        .to_owned()
}

fn drop_date_idx() -> IndexDropStatement {
    Index::drop()
        .name("idx_habit_completion_date")
        .table(HabitCompletion::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateDateIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_date_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_date_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
