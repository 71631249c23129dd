//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, a concrete implementation of the
//! `ProgressStore` port from the `core` crate. It keeps the profile in a
//! singleton row and each logged day in its own row, using `sqlx` on PostgreSQL.

use async_trait::async_trait;
use chrono::NaiveDate;
use quest_tracker_core::domain::{
    DailyQuestFlags, DailyRecord, ProfileState, ProgressSnapshot, DATE_FORMAT,
};
use quest_tracker_core::ports::{PortError, PortResult, ProgressStore};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProgressStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
    initial_weight: f64,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`. `initial_weight` seeds the profile until the
    /// first save writes the singleton row.
    pub fn new(pool: PgPool, initial_weight: f64) -> Self {
        Self {
            pool,
            initial_weight,
        }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfileRecord {
    weight: f64,
    level: i32,
    xp: i32,
}
impl ProfileRecord {
    fn to_domain(self) -> ProfileState {
        ProfileState {
            weight: self.weight,
            level: self.level as u32,
            xp: self.xp as u32,
        }
    }
}

#[derive(FromRow)]
struct DailyRow {
    day: NaiveDate,
    weight: f64,
    level: i32,
    xp: i32,
    cardio: bool,
    strength: bool,
    stretching: bool,
    water: bool,
}
impl DailyRow {
    fn to_domain(self) -> DailyRecord {
        DailyRecord {
            date: self.day.format(DATE_FORMAT).to_string(),
            weight: self.weight,
            level: self.level as u32,
            xp: self.xp as u32,
            quests: DailyQuestFlags {
                cardio: self.cardio,
                strength: self.strength,
                stretching: self.stretching,
                water: self.water,
            },
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `ProgressStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProgressStore for DbAdapter {
    async fn load(&self) -> PortResult<ProgressSnapshot> {
        let profile = sqlx::query_as::<_, ProfileRecord>(
            "SELECT weight, level, xp FROM profile WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(ProfileRecord::to_domain)
        .unwrap_or_else(|| ProfileState::with_weight(self.initial_weight));

        let rows = sqlx::query_as::<_, DailyRow>(
            "SELECT day, weight, level, xp, cardio, strength, stretching, water \
             FROM daily_records ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let history = rows.into_iter().map(|r| r.to_domain()).collect();
        Ok(ProgressSnapshot { profile, history })
    }

    async fn save(&self, snapshot: &ProgressSnapshot) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            "INSERT INTO profile (id, weight, level, xp) VALUES (1, $1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET weight = EXCLUDED.weight, level = EXCLUDED.level, xp = EXCLUDED.xp",
        )
        .bind(snapshot.profile.weight)
        .bind(snapshot.profile.level as i32)
        .bind(snapshot.profile.xp as i32)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        for (position, record) in snapshot.history.iter().enumerate() {
            let day = record.parsed_date().ok_or_else(|| {
                PortError::Unexpected(format!("Record date '{}' cannot be stored", record.date))
            })?;
            sqlx::query(
                "INSERT INTO daily_records \
                 (day, position, weight, level, xp, cardio, strength, stretching, water) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 ON CONFLICT (day) DO UPDATE SET position = EXCLUDED.position, \
                 weight = EXCLUDED.weight, level = EXCLUDED.level, xp = EXCLUDED.xp, \
                 cardio = EXCLUDED.cardio, strength = EXCLUDED.strength, \
                 stretching = EXCLUDED.stretching, water = EXCLUDED.water",
            )
            .bind(day)
            .bind(position as i32)
            .bind(record.weight)
            .bind(record.level as i32)
            .bind(record.xp as i32)
            .bind(record.quests.cardio)
            .bind(record.quests.strength)
            .bind(record.quests.stretching)
            .bind(record.quests.water)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }
}
