use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::auth::handlers::fetch_employee;
use crate::config::Config;
use crate::core::calendar;
use crate::error::ApiError;
use crate::holidays;
use crate::model::enums::LeaveCategory;

#[derive(Deserialize, IntoParams)]
pub struct CalendarQuery {
    /// Defaults to January 1st of the current year
    pub start_date: Option<NaiveDate>,
    /// Defaults to December 31st of the current year
    pub end_date: Option<NaiveDate>,
}

fn resolve_range(query: &CalendarQuery, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let year = today.year();
    let start = query
        .start_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).unwrap());
    let end = query
        .end_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 12, 31).unwrap());
    if end < start {
        return Err(ApiError::Validation(
            "End date cannot be before start date".into(),
        ));
    }
    Ok((start, end))
}

fn day_counts(entries: &[(NaiveDate, LeaveCategory)]) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    for (_, leave_type) in entries {
        *counts.entry(leave_type.to_string()).or_insert(0) += 1;
    }
    counts
}

async fn employee_calendar_body(
    pool: &SqlitePool,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<serde_json::Value, ApiError> {
    let mut conn = pool.acquire().await?;
    let employee = fetch_employee(&mut conn, employee_id).await?;
    drop(conn);

    let entries = calendar::employee_entries(pool, employee_id, start, end).await?;
    let days: Vec<(NaiveDate, LeaveCategory)> =
        entries.iter().map(|e| (e.leave_date, e.leave_type)).collect();

    Ok(json!({
        "employee": {
            "id": employee.id,
            "employee_code": employee.employee_code,
            "name": employee.name,
            "department": employee.department,
        },
        "start_date": start,
        "end_date": end,
        "entries": entries,
        "summary": day_counts(&days),
        "balances": {
            "annual": employee.annual_leave,
            "sick": employee.sick_leave,
            "personal": employee.personal_leave,
            "emergency": employee.emergency_leave,
            "maternity": employee.maternity_leave,
            "paternity": employee.paternity_leave,
        },
        "holidays": holidays::in_range(start, end),
    }))
}

/// Own leave calendar
#[utoipa::path(
    get,
    path = "/api/calendar/my",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Materialized leave days, balances and holidays for the range"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Calendar"
)]
pub async fn my_calendar(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, ApiError> {
    let (start, end) = resolve_range(&query, config.today())?;
    let body = employee_calendar_body(pool.get_ref(), auth.user_id, start, end).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// Org-wide leave calendar (admin)
///
/// Entries are grouped by date so a front end can render a month grid
/// directly.
#[utoipa::path(
    get,
    path = "/api/calendar/employees",
    params(CalendarQuery),
    responses(
        (status = 200, description = "All employees' leave days grouped by date"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Calendar"
)]
pub async fn team_calendar(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let (start, end) = resolve_range(&query, config.today())?;

    let entries = calendar::all_entries(pool.get_ref(), start, end).await?;
    let days: Vec<(NaiveDate, LeaveCategory)> =
        entries.iter().map(|e| (e.leave_date, e.leave_type)).collect();

    let mut by_date: BTreeMap<String, Vec<serde_json::Value>> = BTreeMap::new();
    for entry in &entries {
        by_date.entry(entry.leave_date.to_string()).or_default().push(json!({
            "employee_id": entry.employee_id,
            "employee_name": entry.employee_name,
            "employee_code": entry.employee_code,
            "department": entry.department,
            "leave_type": entry.leave_type,
            "leave_request_id": entry.leave_request_id,
        }));
    }

    Ok(HttpResponse::Ok().json(json!({
        "start_date": start,
        "end_date": end,
        "days": by_date,
        "summary": day_counts(&days),
        "holidays": holidays::in_range(start, end),
    })))
}

/// One employee's leave calendar (admin)
#[utoipa::path(
    get,
    path = "/api/calendar/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee id"),
        CalendarQuery
    ),
    responses(
        (status = 200, description = "Employee's leave days, balances and holidays"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Calendar"
)]
pub async fn employee_calendar(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let (start, end) = resolve_range(&query, config.today())?;
    let body = employee_calendar_body(pool.get_ref(), path.into_inner(), start, end).await?;
    Ok(HttpResponse::Ok().json(body))
}
