use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    auth::verify_token,
    error::ApiError,
    export::{AttendanceGroup, group_attendance},
    grid::{WeekGrid, build_week_grid},
    grouping::group_schedule,
    models::{
        AttendanceRecord, AttendanceStatus, AttendanceSubmission, NewScheduleEntry, ScheduleGroup,
    },
    validation::{validate_day, validate_period},
};

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub day: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub class: Option<String>,
    pub date: Option<NaiveDate>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGroupRequest {
    pub schedule_ids: Vec<i64>,
}

#[utoipa::path(get, path = "/", tag = "attendance")]
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": format!("{} Attendance API", state.settings.school_name),
        "endpoints": {
            "/classes/{class}/schedule": "Grouped weekly schedule of a class",
            "/classes/{class}/grid": "Weekly day-by-period grid",
            "/classes/{class}/attendance": "Submit a day's attendance report",
            "/attendance": "Grouped attendance report rows",
            "/attendance.csv": "Download the attendance report as CSV",
            "/attendance/summary": "Status totals across the history"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "attendance")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "attendance")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/classes/{class}/schedule",
    params(
        ("class" = String, Path, description = "Class name, e.g. XI-A"),
        ("day" = Option<String>, Query, description = "Restrict to one school day")
    ),
    responses(
        (status = 200, description = "Consecutive-period groups", body = [ScheduleGroup]),
        (status = 400, description = "Unknown day name"),
        (status = 404, description = "Class has no schedule")
    ),
    tag = "schedule"
)]
pub async fn get_class_schedule(
    State(state): State<AppState>,
    Path(class): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleGroup>>, ApiError> {
    if let Some(day) = query.day.as_deref() {
        validate_day(day)?;
    }

    let entries = state.store.class_schedule(&class, query.day.as_deref())?;
    if entries.is_empty() {
        return Err(ApiError::NotFound(format!("No schedule found for {class}")));
    }
    Ok(Json(group_schedule(&entries)))
}

#[utoipa::path(
    get,
    path = "/classes/{class}/grid",
    params(("class" = String, Path, description = "Class name, e.g. XI-A")),
    responses(
        (status = 200, description = "Weekly grid with span/anchor cells", body = WeekGrid),
        (status = 404, description = "Class has no schedule")
    ),
    tag = "schedule"
)]
pub async fn get_class_grid(
    State(state): State<AppState>,
    Path(class): Path<String>,
) -> Result<Json<WeekGrid>, ApiError> {
    let entries = state.store.class_schedule(&class, None)?;
    Ok(Json(build_week_grid(&group_schedule(&entries))))
}

#[utoipa::path(
    post,
    path = "/classes/{class}/schedule",
    params(("class" = String, Path, description = "Class name, e.g. XI-A")),
    request_body = [NewScheduleEntry],
    responses(
        (status = 201, description = "Created entries with assigned ids and times"),
        (status = 400, description = "Bad day or period"),
        (status = 401, description = "Invalid authentication token"),
        (status = 409, description = "Slot already scheduled")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "schedule"
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    Path(class): Path<String>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
    Json(new_entries): Json<Vec<NewScheduleEntry>>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    if new_entries.is_empty() {
        return Err(ApiError::BadRequest("No schedule entries provided".into()));
    }
    for new in &new_entries {
        validate_day(&new.day)?;
        validate_period(new.period)?;
    }

    // All-or-nothing: the store refuses the whole batch on any conflict, so
    // a 4xx here never leaves part of the batch committed.
    let created = state.store.add_schedule_batch(&class, new_entries)?;
    info!(class = %class, count = created.len(), "schedule entries added");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Deletes every schedule entry of one displayed group.
///
/// Intentionally non-atomic at-least-once: each id is deleted independently
/// and already-removed ids are not restored when a later one fails; the
/// response then names the failures so the caller can surface a
/// partial-failure message.
#[utoipa::path(
    delete,
    path = "/classes/{class}/schedule",
    params(("class" = String, Path, description = "Class name, e.g. XI-A")),
    request_body = DeleteGroupRequest,
    responses(
        (status = 200, description = "All entries of the group deleted"),
        (status = 207, description = "Some deletes failed; body lists them"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "schedule"
)]
pub async fn delete_schedule_group(
    State(state): State<AppState>,
    Path(class): Path<String>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
    Json(request): Json<DeleteGroupRequest>,
) -> Result<Response, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let mut deleted = Vec::new();
    let mut failed = Vec::new();
    for id in request.schedule_ids {
        match state.store.delete_schedule(&class, id) {
            Ok(()) => deleted.push(id),
            Err(err) => failed.push(serde_json::json!({
                "scheduleId": id,
                "error": err.to_string(),
            })),
        }
    }

    if failed.is_empty() {
        Ok(Json(serde_json::json!({
            "status": "deleted",
            "scheduleIds": deleted,
        }))
        .into_response())
    } else {
        info!(class = %class, failed = failed.len(), "partial group delete");
        Ok((
            StatusCode::MULTI_STATUS,
            Json(serde_json::json!({
                "status": "partial",
                "deleted": deleted,
                "failed": failed,
            })),
        )
            .into_response())
    }
}

#[utoipa::path(
    post,
    path = "/classes/{class}/attendance",
    params(("class" = String, Path, description = "Class name, e.g. XI-A")),
    request_body = AttendanceSubmission,
    responses(
        (status = 201, description = "Recorded attendance rows", body = [AttendanceRecord]),
        (status = 400, description = "Bad period in a row"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "attendance"
)]
pub async fn submit_attendance(
    State(state): State<AppState>,
    Path(class): Path<String>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
    Json(submission): Json<AttendanceSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    if submission.entries.is_empty() {
        return Err(ApiError::BadRequest("No attendance rows provided".into()));
    }
    for item in &submission.entries {
        validate_period(item.period)?;
    }

    let created = state.store.record_attendance(&class, submission)?;
    info!(class = %class, count = created.len(), "attendance recorded");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/attendance",
    params(
        ("class" = Option<String>, Query, description = "Filter by class"),
        ("date" = Option<String>, Query, description = "Filter by date (YYYY-MM-DD)"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Grouped report rows", body = [AttendanceGroup]),
        (status = 401, description = "Invalid authentication token"),
        (status = 404, description = "No attendance records found")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "attendance"
)]
pub async fn get_attendance_report(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<AttendanceGroup>>, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let records = state
        .store
        .attendance_history(query.class.as_deref(), query.date);
    if records.is_empty() {
        return Err(ApiError::NotFound("No attendance records found".into()));
    }
    Ok(Json(group_attendance(&records)))
}

#[utoipa::path(
    get,
    path = "/attendance.csv",
    params(
        ("class" = Option<String>, Query, description = "Filter by class"),
        ("date" = Option<String>, Query, description = "Filter by date (YYYY-MM-DD)"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 401, description = "Invalid authentication token"),
        (status = 404, description = "No attendance records found")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "attendance"
)]
pub async fn get_attendance_csv(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let records = state
        .store
        .attendance_history(query.class.as_deref(), query.date);
    if records.is_empty() {
        return Err(ApiError::NotFound("No attendance records found".into()));
    }

    let body = state.exporter.generate(&group_attendance(&records));
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/csv; charset=utf-8"),
            (
                "content-disposition",
                "attachment; filename=attendance_report.csv",
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    get,
    path = "/attendance/summary",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Record totals per status"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "attendance"
)]
pub async fn get_attendance_summary(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AuthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let counts = state.store.status_counts();
    let total: usize = counts.values().sum();
    Ok(Json(serde_json::json!({
        "total": total,
        "present": counts.get(&AttendanceStatus::Present).copied().unwrap_or(0),
        "sick": counts.get(&AttendanceStatus::Sick).copied().unwrap_or(0),
        "excused": counts.get(&AttendanceStatus::Excused).copied().unwrap_or(0),
        "absent": counts.get(&AttendanceStatus::Absent).copied().unwrap_or(0),
    })))
}
