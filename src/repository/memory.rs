use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{DailyLog, DailyLogKey, UserId, YearMonth};
use crate::repository::{ensure_same_key, DailyLogRepository};

/// In-process storage engine (single-instance deployments and tests).
///
/// Every operation runs under one lock, which makes each of them atomic per
/// key. Cloning shares the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryDailyLogRepository {
    logs: Arc<Mutex<BTreeMap<DailyLogKey, DailyLog>>>,
}

impl InMemoryDailyLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.logs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.logs.lock().await.is_empty()
    }
}

impl DailyLogRepository for InMemoryDailyLogRepository {
    async fn save(&self, log: &DailyLog) -> AppResult<()> {
        let mut logs = self.logs.lock().await;
        match logs.entry(log.key()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "A daily log already exists for {}",
                log.key()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(log.clone());
                Ok(())
            }
        }
    }

    async fn replace(&self, key: DailyLogKey, log: &DailyLog) -> AppResult<()> {
        ensure_same_key(key, log)?;
        let mut logs = self.logs.lock().await;
        match logs.get_mut(&key) {
            Some(stored) => {
                *stored = log.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("No daily log for {key}"))),
        }
    }

    async fn delete(&self, key: DailyLogKey) -> AppResult<()> {
        self.logs
            .lock()
            .await
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("No daily log for {key}")))
    }

    async fn find_by_key(&self, key: DailyLogKey) -> AppResult<Option<DailyLog>> {
        Ok(self.logs.lock().await.get(&key).cloned())
    }

    async fn find_by_user_and_month(
        &self,
        user_id: UserId,
        month: YearMonth,
    ) -> AppResult<Vec<DailyLog>> {
        let from = DailyLogKey::new(user_id, month.first_day());
        let to = DailyLogKey::new(user_id, month.last_day());
        let logs = self.logs.lock().await;
        Ok(logs.range(from..=to).map(|(_, log)| log.to_summary()).collect())
    }

    async fn exists(&self, key: DailyLogKey) -> AppResult<bool> {
        Ok(self.logs.lock().await.contains_key(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::Meal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log_with_meal(user_id: UserId, day: NaiveDate, content: &str) -> DailyLog {
        let meal = Meal::of(NaiveTime::from_hms_opt(12, 0, 0).unwrap(), content, 600, None).unwrap();
        DailyLog::of(user_id, day, 7.0, 6, vec![], vec![], vec![meal], vec![]).unwrap()
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_key() {
        let repo = InMemoryDailyLogRepository::new();
        let log = log_with_meal(1, date(2024, 6, 1), "curry");

        repo.save(&log).await.unwrap();
        let second = repo.save(&log_with_meal(1, date(2024, 6, 1), "udon")).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        let stored = repo.find_by_key(log.key()).await.unwrap().unwrap();
        assert_eq!(stored.meals()[0].content(), "curry");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_saves_only_one_wins() {
        let repo = InMemoryDailyLogRepository::new();
        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.save(&log_with_meal(9, date(2024, 6, 2), &format!("meal {i}")))
                    .await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_replace_and_delete_missing_key() {
        let repo = InMemoryDailyLogRepository::new();
        let log = log_with_meal(1, date(2024, 6, 1), "curry");

        let replaced = repo.replace(log.key(), &log).await;
        assert!(matches!(replaced, Err(AppError::NotFound(_))));
        let deleted = repo.delete(log.key()).await;
        assert!(matches!(deleted, Err(AppError::NotFound(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_replace_rejects_log_for_other_key() {
        let repo = InMemoryDailyLogRepository::new();
        let original = log_with_meal(1, date(2024, 6, 1), "curry");
        repo.save(&original).await.unwrap();

        let other_day = log_with_meal(1, date(2024, 6, 2), "udon");
        let result = repo.replace(original.key(), &other_day).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        let stored = repo.find_by_key(original.key()).await.unwrap().unwrap();
        assert_eq!(stored, original);
        assert!(!repo.exists(other_day.key()).await.unwrap());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_month_range_is_scoped_to_user_and_month() {
        let repo = InMemoryDailyLogRepository::new();
        for log in [
            log_with_meal(1, date(2024, 5, 31), "a"),
            log_with_meal(1, date(2024, 6, 30), "b"),
            log_with_meal(1, date(2024, 6, 1), "c"),
            log_with_meal(1, date(2024, 7, 1), "d"),
            log_with_meal(2, date(2024, 6, 15), "e"),
        ] {
            repo.save(&log).await.unwrap();
        }

        let june = repo
            .find_by_user_and_month(1, YearMonth::new(2024, 6).unwrap())
            .await
            .unwrap();

        let dates: Vec<_> = june.iter().map(|l| l.log_date()).collect();
        assert_eq!(dates, [date(2024, 6, 1), date(2024, 6, 30)]);
        assert!(june.iter().all(|l| l.meals().is_empty()));
    }
}
