//! Log Service: existence and uniqueness rules around the storage port.
//!
//! Every mutating call is all-or-nothing. Conflicts and missing logs are
//! reported to the caller. Storage faults pass through unchanged and are
//! never retried here.

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use crate::models::{DailyLog, DailyLogKey, UserId, YearMonth};
use crate::repository::{ensure_same_key, DailyLogRepository};

pub struct DailyLogService<R> {
    repo: R,
}

impl<R: DailyLogRepository> DailyLogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Stores a new log. A second log for the same user and date is a
    /// conflict; the storage engine enforces this again for racing callers.
    pub async fn register(&self, log: DailyLog) -> AppResult<()> {
        let key = log.key();
        if self.repo.exists(key).await? {
            tracing::warn!(
                user_id = key.user_id,
                log_date = %key.log_date,
                "Daily log already exists"
            );
            return Err(conflict(key));
        }

        self.repo.save(&log).await?;
        tracing::info!(
            user_id = key.user_id,
            log_date = %key.log_date,
            body_metrics = log.body_metrics().len(),
            activities = log.activities().len(),
            meals = log.meals().len(),
            mental_notes = log.mental_notes().len(),
            "Daily log registered"
        );
        Ok(())
    }

    /// Replaces the whole log stored for `(user_id, log_date)`. The four
    /// child lists end up exactly as in `log`; nothing is merged.
    pub async fn update(
        &self,
        user_id: UserId,
        log_date: NaiveDate,
        log: DailyLog,
    ) -> AppResult<()> {
        let key = DailyLogKey::new(user_id, log_date);
        ensure_same_key(key, &log)?;
        if !self.repo.exists(key).await? {
            tracing::warn!(user_id, log_date = %log_date, "Update target missing");
            return Err(not_found(key));
        }

        self.repo.replace(key, &log).await?;
        tracing::info!(user_id, log_date = %log_date, "Daily log replaced");
        Ok(())
    }

    pub async fn delete(&self, user_id: UserId, log_date: NaiveDate) -> AppResult<()> {
        let key = DailyLogKey::new(user_id, log_date);
        if !self.repo.exists(key).await? {
            tracing::warn!(user_id, log_date = %log_date, "Delete target missing");
            return Err(not_found(key));
        }

        self.repo.delete(key).await?;
        tracing::info!(user_id, log_date = %log_date, "Daily log deleted");
        Ok(())
    }

    /// Full aggregate with every child list populated.
    pub async fn find_one(&self, user_id: UserId, log_date: NaiveDate) -> AppResult<DailyLog> {
        let key = DailyLogKey::new(user_id, log_date);
        tracing::debug!(user_id, log_date = %log_date, "Loading daily log");
        self.repo.find_by_key(key).await?.ok_or_else(|| not_found(key))
    }

    /// Summaries for every logged day of the month. Child lists are always
    /// empty here. An empty month yields an empty vec.
    pub async fn find_monthly(
        &self,
        user_id: UserId,
        month: YearMonth,
    ) -> AppResult<Vec<DailyLog>> {
        let logs = self.repo.find_by_user_and_month(user_id, month).await?;
        tracing::debug!(user_id, month = %month, count = logs.len(), "Loaded monthly summaries");
        Ok(logs)
    }
}

fn conflict(key: DailyLogKey) -> AppError {
    AppError::Conflict(format!("A daily log already exists for {key}"))
}

fn not_found(key: DailyLogKey) -> AppError {
    AppError::NotFound(format!("No daily log for {key}"))
}
