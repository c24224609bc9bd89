mod habit;
mod habit_completion;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "habitrack",
    "m0_1",
    vec_box![],
    vec_box![
        habit::CreateTable,
        habit_completion::CreateTable,
        habit_completion::CreateDateIdx
    ]
);
