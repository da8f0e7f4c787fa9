use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;

use crate::dto::{
    DailyLogPayload, DailyLogResponse, DailyLogSummaryResponse, MessageResponse,
    RegisterDailyLogRequest,
};
use crate::error::AppResult;
use crate::models::{DailyLog, UserId, YearMonth};
use crate::repository::DailyLogRepository;
use crate::AppState;

/// Request checks first, then the domain factories.
fn build_log(
    payload: DailyLogPayload,
    user_id: UserId,
    log_date: NaiveDate,
) -> AppResult<DailyLog> {
    payload.validate_all()?;
    Ok(payload.into_domain(user_id, log_date)?)
}

pub async fn register_daily_log<R: DailyLogRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<RegisterDailyLogRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let log = build_log(body.log, body.user_id, body.log_date)?;
    state.daily_logs.register(log).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Daily log registered")),
    ))
}

pub async fn update_daily_log<R: DailyLogRepository>(
    State(state): State<AppState<R>>,
    Path((user_id, log_date)): Path<(UserId, NaiveDate)>,
    Json(body): Json<DailyLogPayload>,
) -> AppResult<Json<MessageResponse>> {
    let log = build_log(body, user_id, log_date)?;
    state.daily_logs.update(user_id, log_date, log).await?;

    Ok(Json(MessageResponse::new("Daily log updated")))
}

pub async fn delete_daily_log<R: DailyLogRepository>(
    State(state): State<AppState<R>>,
    Path((user_id, log_date)): Path<(UserId, NaiveDate)>,
) -> AppResult<Json<MessageResponse>> {
    state.daily_logs.delete(user_id, log_date).await?;

    Ok(Json(MessageResponse::new("Daily log deleted")))
}

pub async fn get_daily_log<R: DailyLogRepository>(
    State(state): State<AppState<R>>,
    Path((user_id, log_date)): Path<(UserId, NaiveDate)>,
) -> AppResult<Json<DailyLogResponse>> {
    let log = state.daily_logs.find_one(user_id, log_date).await?;

    Ok(Json(DailyLogResponse::from(&log)))
}

pub async fn list_monthly_daily_logs<R: DailyLogRepository>(
    State(state): State<AppState<R>>,
    Path((user_id, year_month)): Path<(UserId, String)>,
) -> AppResult<Json<Vec<DailyLogSummaryResponse>>> {
    let month: YearMonth = year_month.parse()?;
    let logs = state.daily_logs.find_monthly(user_id, month).await?;

    Ok(Json(logs.iter().map(DailyLogSummaryResponse::from).collect()))
}
