//! PostgreSQL storage engine.
//!
//! The header row's primary key `(user_id, log_date)` is the uniqueness
//! guard for concurrent registrations. Child tables cascade from it and keep
//! insertion order through their `BIGSERIAL` ids.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::{
    Activity, BodyMetrics, DailyLog, DailyLogKey, Meal, MentalNote, UserId, ValidationError,
    YearMonth,
};
use crate::repository::{ensure_same_key, DailyLogRepository};

const CHILD_TABLES: [&str; 4] = ["body_metrics", "activity", "meal", "mental_note"];

#[derive(Debug, FromRow)]
struct DailyLogRow {
    user_id: i64,
    log_date: NaiveDate,
    sleep_hours: f64,
    mood_level: i32,
}

#[derive(Debug, FromRow)]
struct BodyMetricsRow {
    weight: f64,
    body_fat_percentage: f64,
    muscle_mass: f64,
    measured_at: NaiveDateTime,
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    activity_type: String,
    started_at: NaiveDateTime,
    duration_in_minutes: i32,
    distance_km: f64,
    steps: i32,
    calories_burned: i32,
}

#[derive(Debug, FromRow)]
struct MealRow {
    time: NaiveTime,
    content: String,
    calories: i32,
    photo_url: Option<String>,
}

#[derive(Debug, FromRow)]
struct MentalNoteRow {
    recorded_at: NaiveDateTime,
    stress_level: i32,
    motivation_level: i32,
    note: Option<String>,
}

impl DailyLogRow {
    fn into_summary(self) -> Result<DailyLog, ValidationError> {
        DailyLog::summary_of(self.user_id, self.log_date, self.sleep_hours, self.mood_level)
    }
}

/// Stored rows are rebuilt through the domain factories, so a row that no
/// longer validates is a storage fault rather than a caller error.
fn corrupt_row(key: DailyLogKey) -> impl FnOnce(ValidationError) -> AppError {
    move |err| {
        AppError::Internal(
            anyhow::Error::new(err).context(format!("stored daily log {key} is invalid")),
        )
    }
}

#[derive(Clone)]
pub struct PgDailyLogRepository {
    pool: PgPool,
}

impl PgDailyLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_children(conn: &mut PgConnection, log: &DailyLog) -> Result<(), sqlx::Error> {
    let (user_id, log_date) = (log.user_id(), log.log_date());

    for m in log.body_metrics() {
        sqlx::query(
            r#"
            INSERT INTO body_metrics (user_id, log_date, weight, body_fat_percentage, muscle_mass, measured_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(log_date)
        .bind(m.weight().value())
        .bind(m.body_fat_percentage().value())
        .bind(m.muscle_mass().value())
        .bind(m.measured_at().value())
        .execute(&mut *conn)
        .await?;
    }

    for a in log.activities() {
        sqlx::query(
            r#"
            INSERT INTO activity (user_id, log_date, activity_type, started_at,
                                  duration_in_minutes, distance_km, steps, calories_burned)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user_id)
        .bind(log_date)
        .bind(a.activity_type())
        .bind(a.started_at().value())
        .bind(a.duration_in_minutes())
        .bind(a.distance_km())
        .bind(a.steps().value())
        .bind(a.calories_burned().value())
        .execute(&mut *conn)
        .await?;
    }

    for m in log.meals() {
        sqlx::query(
            r#"
            INSERT INTO meal (user_id, log_date, time, content, calories, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(log_date)
        .bind(m.time())
        .bind(m.content())
        .bind(m.calories())
        .bind(m.photo_url())
        .execute(&mut *conn)
        .await?;
    }

    for n in log.mental_notes() {
        sqlx::query(
            r#"
            INSERT INTO mental_note (user_id, log_date, recorded_at, stress_level, motivation_level, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(log_date)
        .bind(n.recorded_at())
        .bind(n.stress_level())
        .bind(n.motivation_level())
        .bind(n.note())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn delete_children(conn: &mut PgConnection, key: DailyLogKey) -> Result<(), sqlx::Error> {
    for table in CHILD_TABLES {
        let sql = format!("DELETE FROM {table} WHERE user_id = $1 AND log_date = $2");
        sqlx::query(&sql)
            .bind(key.user_id)
            .bind(key.log_date)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn load_children(conn: &mut PgConnection, header: DailyLogRow) -> AppResult<DailyLog> {
    let key = DailyLogKey::new(header.user_id, header.log_date);

    let body_metrics = sqlx::query_as::<_, BodyMetricsRow>(
        r#"
        SELECT weight, body_fat_percentage, muscle_mass, measured_at
        FROM body_metrics WHERE user_id = $1 AND log_date = $2 ORDER BY id
        "#,
    )
    .bind(key.user_id)
    .bind(key.log_date)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|r| BodyMetrics::from_raw(r.weight, r.body_fat_percentage, r.muscle_mass, r.measured_at))
    .collect::<Result<Vec<_>, _>>()
    .map_err(corrupt_row(key))?;

    let activities = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT activity_type, started_at, duration_in_minutes, distance_km, steps, calories_burned
        FROM activity WHERE user_id = $1 AND log_date = $2 ORDER BY id
        "#,
    )
    .bind(key.user_id)
    .bind(key.log_date)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|r| {
        Activity::from_raw(
            r.activity_type,
            r.started_at,
            r.duration_in_minutes,
            r.distance_km,
            r.steps,
            r.calories_burned,
        )
    })
    .collect::<Result<Vec<_>, _>>()
    .map_err(corrupt_row(key))?;

    let meals = sqlx::query_as::<_, MealRow>(
        r#"
        SELECT time, content, calories, photo_url
        FROM meal WHERE user_id = $1 AND log_date = $2 ORDER BY id
        "#,
    )
    .bind(key.user_id)
    .bind(key.log_date)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|r| Meal::of(r.time, r.content, r.calories, r.photo_url))
    .collect::<Result<Vec<_>, _>>()
    .map_err(corrupt_row(key))?;

    let mental_notes = sqlx::query_as::<_, MentalNoteRow>(
        r#"
        SELECT recorded_at, stress_level, motivation_level, note
        FROM mental_note WHERE user_id = $1 AND log_date = $2 ORDER BY id
        "#,
    )
    .bind(key.user_id)
    .bind(key.log_date)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|r| MentalNote::of(r.recorded_at, r.stress_level, r.motivation_level, r.note))
    .collect::<Result<Vec<_>, _>>()
    .map_err(corrupt_row(key))?;

    DailyLog::of(
        header.user_id,
        header.log_date,
        header.sleep_hours,
        header.mood_level,
        body_metrics,
        activities,
        meals,
        mental_notes,
    )
    .map_err(corrupt_row(key))
}

impl DailyLogRepository for PgDailyLogRepository {
    async fn save(&self, log: &DailyLog) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO daily_log (user_id, log_date, sleep_hours, mood_level)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, log_date) DO NOTHING
            "#,
        )
        .bind(log.user_id())
        .bind(log.log_date())
        .bind(log.sleep_hours())
        .bind(log.mood_level())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(AppError::Conflict(format!(
                "A daily log already exists for {}",
                log.key()
            )));
        }

        insert_children(&mut *tx, log).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace(&self, key: DailyLogKey, log: &DailyLog) -> AppResult<()> {
        ensure_same_key(key, log)?;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE daily_log
            SET sleep_hours = $3, mood_level = $4, updated_at = NOW()
            WHERE user_id = $1 AND log_date = $2
            "#,
        )
        .bind(key.user_id)
        .bind(key.log_date)
        .bind(log.sleep_hours())
        .bind(log.mood_level())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound(format!("No daily log for {key}")));
        }

        // Children are never diffed: wipe and reinsert.
        delete_children(&mut *tx, key).await?;
        insert_children(&mut *tx, log).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, key: DailyLogKey) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM daily_log WHERE user_id = $1 AND log_date = $2")
            .bind(key.user_id)
            .bind(key.log_date)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::NotFound(format!("No daily log for {key}")));
        }
        Ok(())
    }

    async fn find_by_key(&self, key: DailyLogKey) -> AppResult<Option<DailyLog>> {
        let mut tx = self.pool.begin().await?;
        // One snapshot for the header and all four child reads.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let header = sqlx::query_as::<_, DailyLogRow>(
            r#"
            SELECT user_id, log_date, sleep_hours, mood_level
            FROM daily_log WHERE user_id = $1 AND log_date = $2
            "#,
        )
        .bind(key.user_id)
        .bind(key.log_date)
        .fetch_optional(&mut *tx)
        .await?;

        let log = match header {
            Some(header) => Some(load_children(&mut *tx, header).await?),
            None => None,
        };
        tx.commit().await?;
        Ok(log)
    }

    async fn find_by_user_and_month(
        &self,
        user_id: UserId,
        month: YearMonth,
    ) -> AppResult<Vec<DailyLog>> {
        let rows = sqlx::query_as::<_, DailyLogRow>(
            r#"
            SELECT user_id, log_date, sleep_hours, mood_level
            FROM daily_log
            WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
            ORDER BY log_date ASC
            "#,
        )
        .bind(user_id)
        .bind(month.first_day())
        .bind(month.last_day())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let key = DailyLogKey::new(row.user_id, row.log_date);
                row.into_summary().map_err(corrupt_row(key))
            })
            .collect()
    }

    async fn exists(&self, key: DailyLogKey) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM daily_log WHERE user_id = $1 AND log_date = $2)",
        )
        .bind(key.user_id)
        .bind(key.log_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
