pub mod activity;
pub mod body_metrics;
pub mod daily_log;
pub mod meal;
pub mod mental_note;
pub mod validation;
pub mod value_objects;

pub use activity::Activity;
pub use body_metrics::BodyMetrics;
pub use daily_log::{DailyLog, DailyLogKey, UserId, YearMonth};
pub use meal::Meal;
pub use mental_note::MentalNote;
pub use validation::ValidationError;
