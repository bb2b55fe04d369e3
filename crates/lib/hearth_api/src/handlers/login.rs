//! Login capture and ledger handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use hearth_core::ledger::LoginStats;
use hearth_core::password::hash_password;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    ClearLoginRecordsResponse, LoginRecordsResponse, LoginRequest, LoginResponse,
    RecentLoginRecordsResponse,
};

/// Records returned by the recent endpoint when no usable count is given.
pub const DEFAULT_RECENT_COUNT: usize = 10;

/// `POST /api/login` — capture a login attempt in the ledger.
///
/// The attempt is always recorded as successful; the password is kept only
/// as a bcrypt hash.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(body) = payload?;
    if body.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".into()));
    }
    let password = body
        .password
        .ok_or_else(|| AppError::Validation("password is required".into()))?;

    let cost = state.config.bcrypt_cost;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))??;

    let record = state.ledger.record(&body.username, password_hash);
    info!(
        username = %record.username,
        record_id = record.id,
        local_time = %record.local_time,
        total = state.ledger.len(),
        "login attempt recorded"
    );

    Ok(Json(LoginResponse {
        success: true,
        message: "Login recorded".into(),
        record_id: record.id,
    }))
}

/// `GET /api/login-records` — every record in insertion order.
pub async fn list_login_records_handler(
    State(state): State<AppState>,
) -> Json<LoginRecordsResponse> {
    let records = state.ledger.list_all();
    Json(LoginRecordsResponse {
        total: records.len(),
        records,
    })
}

/// `GET /api/login-records/recent` — the newest [`DEFAULT_RECENT_COUNT`] records.
pub async fn recent_login_records_handler(
    State(state): State<AppState>,
) -> Json<RecentLoginRecordsResponse> {
    Json(recent(&state, DEFAULT_RECENT_COUNT))
}

/// `GET /api/login-records/recent/{count}` — the newest `count` records.
pub async fn recent_login_records_count_handler(
    State(state): State<AppState>,
    Path(count): Path<String>,
) -> Json<RecentLoginRecordsResponse> {
    Json(recent(&state, parse_count(&count)))
}

/// Reads the leading digits of `raw`, so `"5abc"` is 5. Counts too large for
/// `usize` saturate and return every record. Zero, a sign, or no leading
/// digit means the default.
fn parse_count(raw: &str) -> usize {
    let count = raw
        .trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0usize, |n, d| {
            n.saturating_mul(10).saturating_add(usize::from(d - b'0'))
        });
    if count == 0 { DEFAULT_RECENT_COUNT } else { count }
}

fn recent(state: &AppState, count: usize) -> RecentLoginRecordsResponse {
    let records = state.ledger.list_recent(count);
    RecentLoginRecordsResponse {
        showing: records.len(),
        total: state.ledger.len(),
        records,
    }
}

/// `DELETE /api/login-records` — drop every record.
pub async fn clear_login_records_handler(
    State(state): State<AppState>,
) -> Json<ClearLoginRecordsResponse> {
    let count = state.ledger.clear();
    info!(count, "login records cleared");
    Json(ClearLoginRecordsResponse {
        success: true,
        message: format!("Cleared {count} login records"),
    })
}

/// `GET /api/login-stats` — per-user attempt counts and first/last records.
pub async fn login_stats_handler(State(state): State<AppState>) -> Json<LoginStats> {
    Json(state.ledger.stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_parsing_falls_back_to_default() {
        assert_eq!(parse_count("5"), 5);
        assert_eq!(parse_count(" 25 "), 25);
        assert_eq!(parse_count("0"), DEFAULT_RECENT_COUNT);
        assert_eq!(parse_count("-3"), DEFAULT_RECENT_COUNT);
        assert_eq!(parse_count("abc"), DEFAULT_RECENT_COUNT);
        assert_eq!(parse_count(""), DEFAULT_RECENT_COUNT);
    }

    #[test]
    fn count_parsing_reads_leading_digits() {
        assert_eq!(parse_count("5abc"), 5);
        assert_eq!(parse_count("12.7"), 12);
        assert_eq!(parse_count("abc5"), DEFAULT_RECENT_COUNT);
        assert_eq!(parse_count("99999999999999999999999999"), usize::MAX);
    }
}
