//! Storage port for daily logs.
//!
//! The service only talks to [`DailyLogRepository`]. Engines decide how
//! they keep key-level atomicity: `save` must reject a second aggregate for
//! an existing key even under concurrent callers, and `replace` / `delete`
//! must never expose a log with a partially rewritten child set.

use std::future::Future;

use crate::error::{AppError, AppResult};
use crate::models::{DailyLog, DailyLogKey, UserId, YearMonth};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDailyLogRepository;
pub use postgres::PgDailyLogRepository;

pub trait DailyLogRepository: Send + Sync {
    /// Persists a new aggregate. Fails with `AppError::Conflict` when the
    /// key is already taken.
    fn save(&self, log: &DailyLog) -> impl Future<Output = AppResult<()>> + Send;

    /// Replaces the aggregate stored under `key`, child lists included.
    /// Fails with `AppError::Validation` when `log` belongs to another key and
    /// with `AppError::NotFound` when nothing is stored there.
    fn replace(
        &self,
        key: DailyLogKey,
        log: &DailyLog,
    ) -> impl Future<Output = AppResult<()>> + Send;

    /// Removes the aggregate and all of its children as one unit.
    /// Fails with `AppError::NotFound` when nothing is stored there.
    fn delete(&self, key: DailyLogKey) -> impl Future<Output = AppResult<()>> + Send;

    fn find_by_key(
        &self,
        key: DailyLogKey,
    ) -> impl Future<Output = AppResult<Option<DailyLog>>> + Send;

    /// Summaries (child lists empty) for every logged date in the month,
    /// ordered by date.
    fn find_by_user_and_month(
        &self,
        user_id: UserId,
        month: YearMonth,
    ) -> impl Future<Output = AppResult<Vec<DailyLog>>> + Send;

    fn exists(&self, key: DailyLogKey) -> impl Future<Output = AppResult<bool>> + Send;

    /// Readiness probe for the backing engine.
    fn ping(&self) -> impl Future<Output = AppResult<()>> + Send {
        async { Ok(()) }
    }
}

/// `replace` never moves an aggregate to another key.
pub(crate) fn ensure_same_key(key: DailyLogKey, log: &DailyLog) -> AppResult<()> {
    if log.key() == key {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Log identity {} does not match target {key}",
            log.key()
        )))
    }
}
