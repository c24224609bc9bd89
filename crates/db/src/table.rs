use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Habit {
    Table,
    Id,
    Title,
    Description,
    Frequency,
    FrequencyCount,
    FrequencyPeriod,
    SelectedDays,
    ReminderEnabled,
    ReminderTime,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum HabitCompletion {
    Table,
    HabitId,
    Date,
    Completed,
    CreatedAt,
}
