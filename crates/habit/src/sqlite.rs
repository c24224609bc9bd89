use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use habitrack_core::{
    DayOfWeek, Frequency, FrequencyPeriod, Habit, History, iso_date, parse_iso_date,
};
use habitrack_db::table::{Habit as HabitIden, HabitCompletion};
use habitrack_shared::Result;
use sea_query::{Expr, ExprTrait, OnConflict, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool, prelude::FromRow};
use validator::Validate;

use crate::store::new_id;
use crate::{Completion, DateRange, HabitInput, HabitPatch, HabitStore};

#[derive(Debug, FromRow)]
struct HabitRow {
    id: String,
    title: String,
    description: Option<String>,
    frequency: sqlx::types::Text<Frequency>,
    frequency_count: Option<u32>,
    frequency_period: Option<sqlx::types::Text<FrequencyPeriod>>,
    selected_days: sqlx::types::Json<Vec<DayOfWeek>>,
    reminder_enabled: bool,
    reminder_time: Option<String>,
    created_at: i64,
}

impl HabitRow {
    fn into_habit(self, history: History) -> Habit {
        Habit {
            id: self.id,
            title: self.title,
            description: self.description,
            frequency: self.frequency.0,
            frequency_count: self.frequency_count,
            frequency_period: self.frequency_period.map(|p| p.0),
            selected_days: self.selected_days.0,
            reminder_enabled: self.reminder_enabled,
            reminder_time: self.reminder_time,
            created_at: DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
            history,
        }
    }
}

#[derive(Debug, FromRow)]
struct CompletionRow {
    habit_id: String,
    date: String,
    completed: bool,
}

/// Habits in the `habit` and `habit_completion` tables.
///
/// Reads go through `read`, every statement that changes data through
/// `write`. Operations that issue more than one statement run them in a
/// single transaction so they see one snapshot.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    read: SqlitePool,
    write: SqlitePool,
}

impl SqliteStore {
    pub fn new(read: SqlitePool, write: SqlitePool) -> Self {
        Self { read, write }
    }

    fn select_habits() -> SelectStatement {
        Query::select()
            .columns([
                HabitIden::Id,
                HabitIden::Title,
                HabitIden::Description,
                HabitIden::Frequency,
                HabitIden::FrequencyCount,
                HabitIden::FrequencyPeriod,
                HabitIden::SelectedDays,
                HabitIden::ReminderEnabled,
                HabitIden::ReminderTime,
                HabitIden::CreatedAt,
            ])
            .from(HabitIden::Table)
            .to_owned()
    }

    fn select_completions() -> SelectStatement {
        Query::select()
            .columns([
                HabitCompletion::HabitId,
                HabitCompletion::Date,
                HabitCompletion::Completed,
            ])
            .from(HabitCompletion::Table)
            .order_by(HabitCompletion::Date, Order::Asc)
            .to_owned()
    }

    async fn histories(
        conn: &mut SqliteConnection,
        habit_id: Option<&str>,
    ) -> Result<BTreeMap<String, History>> {
        let mut statement = Self::select_completions();

        if let Some(id) = habit_id {
            statement.and_where(Expr::col(HabitCompletion::HabitId).eq(id));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, CompletionRow, _>(&sql, values)
            .fetch_all(conn)
            .await?;

        let mut raw: BTreeMap<String, BTreeMap<String, bool>> = BTreeMap::new();
        for row in rows {
            raw.entry(row.habit_id)
                .or_default()
                .insert(row.date, row.completed);
        }

        Ok(raw
            .into_iter()
            .map(|(id, entries)| (id, History::from(entries)))
            .collect())
    }

    async fn exists(conn: &mut SqliteConnection, id: &str) -> Result<bool> {
        let statement = Query::select()
            .column(HabitIden::Id)
            .from(HabitIden::Table)
            .and_where(Expr::col(HabitIden::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(conn)
            .await?;

        Ok(row.is_some())
    }

    async fn insert(&self, habit: &Habit) -> Result<()> {
        let statement = Query::insert()
            .into_table(HabitIden::Table)
            .columns([
                HabitIden::Id,
                HabitIden::Title,
                HabitIden::Description,
                HabitIden::Frequency,
                HabitIden::FrequencyCount,
                HabitIden::FrequencyPeriod,
                HabitIden::SelectedDays,
                HabitIden::ReminderEnabled,
                HabitIden::ReminderTime,
                HabitIden::CreatedAt,
            ])
            .values([
                habit.id.to_owned().into(),
                habit.title.to_owned().into(),
                habit.description.to_owned().into(),
                habit.frequency.to_string().into(),
                habit.frequency_count.into(),
                habit.frequency_period.map(|p| p.to_string()).into(),
                serde_json::to_string(&habit.selected_days)?.into(),
                habit.reminder_enabled.into(),
                habit.reminder_time.to_owned().into(),
                habit.created_at.timestamp().into(),
            ])?
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl HabitStore for SqliteStore {
    async fn load_all(&self) -> Result<Vec<Habit>> {
        let statement = Self::select_habits()
            .order_by(HabitIden::CreatedAt, Order::Asc)
            .order_by(HabitIden::Id, Order::Asc)
            .to_owned();

        let mut tx = self.read.begin().await?;

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, HabitRow, _>(&sql, values)
            .fetch_all(&mut *tx)
            .await?;

        let mut histories = Self::histories(&mut tx, None).await?;
        tx.commit().await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let history = histories.remove(&row.id).unwrap_or_default();
                row.into_habit(history)
            })
            .collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Habit>> {
        let statement = Self::select_habits()
            .and_where(Expr::col(HabitIden::Id).eq(id))
            .to_owned();

        let mut tx = self.read.begin().await?;

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(row) = sqlx::query_as_with::<_, HabitRow, _>(&sql, values)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let history = Self::histories(&mut tx, Some(id))
            .await?
            .remove(id)
            .unwrap_or_default();
        tx.commit().await?;

        Ok(Some(row.into_habit(history)))
    }

    async fn create(&self, input: HabitInput, created_at: DateTime<Utc>) -> Result<Habit> {
        input.validate()?;

        // stored with second precision
        let created_at = DateTime::from_timestamp(created_at.timestamp(), 0).unwrap_or(created_at);
        let habit = input.into_habit(new_id(), created_at);
        self.insert(&habit).await?;

        tracing::info!(habit_id = %habit.id, "Habit created");

        Ok(habit)
    }

    async fn update(&self, id: &str, patch: HabitPatch) -> Result<Option<Habit>> {
        patch.validate()?;

        let Some(mut habit) = self.find(id).await? else {
            return Ok(None);
        };

        patch.apply(&mut habit);

        let statement = Query::update()
            .table(HabitIden::Table)
            .values([
                (HabitIden::Title, habit.title.to_owned().into()),
                (HabitIden::Description, habit.description.to_owned().into()),
                (HabitIden::Frequency, habit.frequency.to_string().into()),
                (HabitIden::FrequencyCount, habit.frequency_count.into()),
                (
                    HabitIden::FrequencyPeriod,
                    habit.frequency_period.map(|p| p.to_string()).into(),
                ),
                (
                    HabitIden::SelectedDays,
                    serde_json::to_string(&habit.selected_days)?.into(),
                ),
                (HabitIden::ReminderEnabled, habit.reminder_enabled.into()),
                (HabitIden::ReminderTime, habit.reminder_time.to_owned().into()),
            ])
            .and_where(Expr::col(HabitIden::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(habit))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let statement = Query::delete()
            .from_table(HabitIden::Table)
            .and_where(Expr::col(HabitIden::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_completion(&self, id: &str, date: NaiveDate) -> Result<Option<bool>> {
        let mut tx = self.write.begin().await?;

        if !Self::exists(&mut tx, id).await? {
            return Ok(None);
        }

        let statement = Query::insert()
            .into_table(HabitCompletion::Table)
            .columns([
                HabitCompletion::HabitId,
                HabitCompletion::Date,
                HabitCompletion::Completed,
                HabitCompletion::CreatedAt,
            ])
            .values([
                id.into(),
                iso_date(date).into(),
                true.into(),
                Utc::now().timestamp().into(),
            ])?
            .on_conflict(
                OnConflict::columns([HabitCompletion::HabitId, HabitCompletion::Date])
                    .value(
                        HabitCompletion::Completed,
                        Expr::col(HabitCompletion::Completed).not(),
                    )
                    .to_owned(),
            )
            .returning_col(HabitCompletion::Completed)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (completed,) = sqlx::query_as_with::<_, (bool,), _>(&sql, values)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(completed))
    }

    async fn completions(&self, id: &str, range: DateRange) -> Result<Option<Vec<Completion>>> {
        let mut tx = self.read.begin().await?;

        if !Self::exists(&mut tx, id).await? {
            return Ok(None);
        }

        let mut statement = Self::select_completions()
            .and_where(Expr::col(HabitCompletion::HabitId).eq(id))
            .to_owned();

        if let Some(start) = range.start {
            statement.and_where(Expr::col(HabitCompletion::Date).gte(iso_date(start)));
        }

        if let Some(end) = range.end {
            statement.and_where(Expr::col(HabitCompletion::Date).lte(iso_date(end)));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, CompletionRow, _>(&sql, values)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(
            rows.into_iter()
                .filter_map(|row| {
                    parse_iso_date(&row.date).map(|date| Completion {
                        date,
                        completed: row.completed,
                    })
                })
                .collect(),
        ))
    }
}
