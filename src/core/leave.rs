use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;
use utoipa::ToSchema;

use crate::core::{audit, balance, calendar};
use crate::error::ApiError;
use crate::model::enums::{LeaveCategory, LeaveStatus};
use crate::model::leave_request::{duration_days, LeaveRequest};

/// Identity of the caller, as established by the auth layer. Owner-restricted
/// operations compare `id` against the request's employee.
#[derive(Debug, Copy, Clone)]
pub struct Actor {
    pub id: i64,
    pub is_admin: bool,
}

impl Actor {
    fn may_touch(&self, request: &LeaveRequest) -> bool {
        self.is_admin || request.employee_id == self.id
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitLeave {
    #[schema(example = "annual")]
    pub leave_type: LeaveCategory,
    #[schema(example = "2026-06-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-06-05", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[schema(example = "Family vacation")]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLeave {
    pub leave_type: Option<LeaveCategory>,
    #[schema(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

const SELECT_REQUEST: &str = r#"
SELECT id, employee_id, leave_type, start_date, end_date, duration,
       reason, status, admin_comment, created_at, updated_at
FROM leave_requests
WHERE id = ?
"#;

async fn fetch(conn: &mut SqliteConnection, request_id: i64) -> Result<LeaveRequest, ApiError> {
    sqlx::query_as::<_, LeaveRequest>(SELECT_REQUEST)
        .bind(request_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ApiError::NotFound("Leave request not found".into()))
}

async fn employee_name(conn: &mut SqliteConnection, employee_id: i64) -> Result<String, ApiError> {
    sqlx::query_scalar::<_, String>("SELECT name FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))
}

/// Submit a new request. The balance is consulted read-only here; the debit
/// happens at approval time against whatever the balance is then.
pub async fn submit(
    pool: &SqlitePool,
    employee_id: i64,
    input: &SubmitLeave,
) -> Result<LeaveRequest, ApiError> {
    if input.end_date < input.start_date {
        return Err(ApiError::Validation(
            "start_date cannot be after end_date".into(),
        ));
    }
    let duration = duration_days(input.start_date, input.end_date);

    let mut tx = pool.begin().await?;

    let available = balance::balance_in(&mut tx, employee_id, input.leave_type).await?;
    if duration > available {
        return Err(ApiError::Validation(format!(
            "Insufficient {} leave balance. Available: {} days, Requested: {} days",
            input.leave_type, available, duration
        )));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type, start_date, end_date, duration, reason, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(input.leave_type)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(duration)
    .bind(&input.reason)
    .bind(LeaveStatus::Pending)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;
    let request_id = result.last_insert_rowid();

    audit::append(
        &mut tx,
        employee_id,
        "leave_requested",
        &format!("Submitted {} leave request", input.leave_type),
        Some(json!({
            "leave_request_id": request_id,
            "leave_type": input.leave_type,
            "start_date": input.start_date,
            "end_date": input.end_date,
            "duration": duration,
        })),
    )
    .await?;

    let request = fetch(&mut tx, request_id).await?;
    tx.commit().await?;

    info!(request_id, employee_id, "leave request submitted");
    Ok(request)
}

/// Approve a pending request inside one transaction: the balance is
/// re-checked and debited before the status-guarded update flips the state
/// and the calendar is materialized. A racing second approval loses on the
/// guarded update.
pub async fn approve(
    pool: &SqlitePool,
    admin_id: i64,
    request_id: i64,
    admin_comment: Option<String>,
) -> Result<LeaveRequest, ApiError> {
    let mut tx = pool.begin().await?;

    let request = fetch(&mut tx, request_id).await?;
    if request.status.is_terminal() {
        return Err(ApiError::InvalidState(
            "Only pending requests can be approved".into(),
        ));
    }

    // Balance may have shrunk since submission; failure leaves the request pending.
    let available = balance::balance_in(&mut tx, request.employee_id, request.leave_type).await?;
    if request.duration > available {
        return Err(ApiError::InsufficientBalance(format!(
            "Insufficient {} leave balance. Available: {} days, Requested: {} days",
            request.leave_type, available, request.duration
        )));
    }

    balance::debit(&mut tx, request.employee_id, request.leave_type, request.duration).await?;

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, admin_comment = ?, updated_at = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(LeaveStatus::Approved)
    .bind(&admin_comment)
    .bind(Utc::now())
    .bind(request_id)
    .bind(LeaveStatus::Pending)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::InvalidState(
            "Only pending requests can be approved".into(),
        ));
    }

    let approved = fetch(&mut tx, request_id).await?;
    calendar::regenerate(&mut tx, &approved).await?;

    let name = employee_name(&mut tx, approved.employee_id).await?;
    audit::append(
        &mut tx,
        admin_id,
        "leave_approved",
        &format!("Approved leave request from {}", name),
        Some(json!({
            "leave_request_id": request_id,
            "employee_id": approved.employee_id,
            "leave_type": approved.leave_type,
            "start_date": approved.start_date,
            "end_date": approved.end_date,
            "admin_comment": approved.admin_comment,
        })),
    )
    .await?;

    tx.commit().await?;

    info!(request_id, admin_id, "leave request approved");
    Ok(approved)
}

/// Reject a pending request. Balance is untouched; the debit only ever
/// happens on approval.
pub async fn reject(
    pool: &SqlitePool,
    admin_id: i64,
    request_id: i64,
    admin_comment: Option<String>,
) -> Result<LeaveRequest, ApiError> {
    let mut tx = pool.begin().await?;

    let request = fetch(&mut tx, request_id).await?;
    if request.status.is_terminal() {
        return Err(ApiError::InvalidState(
            "Only pending requests can be rejected".into(),
        ));
    }

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, admin_comment = ?, updated_at = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(LeaveStatus::Rejected)
    .bind(&admin_comment)
    .bind(Utc::now())
    .bind(request_id)
    .bind(LeaveStatus::Pending)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::InvalidState(
            "Only pending requests can be rejected".into(),
        ));
    }

    let rejected = fetch(&mut tx, request_id).await?;

    let name = employee_name(&mut tx, rejected.employee_id).await?;
    audit::append(
        &mut tx,
        admin_id,
        "leave_rejected",
        &format!("Rejected leave request from {}", name),
        Some(json!({
            "leave_request_id": request_id,
            "employee_id": rejected.employee_id,
            "leave_type": rejected.leave_type,
            "start_date": rejected.start_date,
            "end_date": rejected.end_date,
            "admin_comment": rejected.admin_comment,
        })),
    )
    .await?;

    tx.commit().await?;

    info!(request_id, admin_id, "leave request rejected");
    Ok(rejected)
}

/// Edit a pending request. Owner or admin only; duration is recomputed when
/// either date moves.
pub async fn update(
    pool: &SqlitePool,
    actor: Actor,
    request_id: i64,
    changes: &UpdateLeave,
) -> Result<LeaveRequest, ApiError> {
    let mut tx = pool.begin().await?;

    let request = fetch(&mut tx, request_id).await?;
    if !actor.may_touch(&request) {
        return Err(ApiError::Permission("Not enough permissions".into()));
    }
    if request.status.is_terminal() {
        return Err(ApiError::InvalidState(
            "Only pending requests can be updated".into(),
        ));
    }

    let leave_type = changes.leave_type.unwrap_or(request.leave_type);
    let start_date = changes.start_date.unwrap_or(request.start_date);
    let end_date = changes.end_date.unwrap_or(request.end_date);
    let reason = changes.reason.clone().unwrap_or_else(|| request.reason.clone());

    if end_date < start_date {
        return Err(ApiError::Validation(
            "start_date cannot be after end_date".into(),
        ));
    }
    let duration = duration_days(start_date, end_date);

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET leave_type = ?, start_date = ?, end_date = ?, duration = ?, reason = ?, updated_at = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(leave_type)
    .bind(start_date)
    .bind(end_date)
    .bind(duration)
    .bind(&reason)
    .bind(Utc::now())
    .bind(request_id)
    .bind(LeaveStatus::Pending)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::InvalidState(
            "Only pending requests can be updated".into(),
        ));
    }

    audit::append(
        &mut tx,
        actor.id,
        "leave_updated",
        &format!("Updated leave request #{}", request_id),
        Some(json!({
            "leave_request_id": request_id,
            "leave_type": leave_type,
            "start_date": start_date,
            "end_date": end_date,
            "duration": duration,
        })),
    )
    .await?;

    let updated = fetch(&mut tx, request_id).await?;
    tx.commit().await?;
    Ok(updated)
}

/// Remove a pending request. No calendar rows exist yet — the request was
/// never approved.
pub async fn delete(pool: &SqlitePool, actor: Actor, request_id: i64) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let request = fetch(&mut tx, request_id).await?;
    if !actor.may_touch(&request) {
        return Err(ApiError::Permission("Not enough permissions".into()));
    }
    if request.status.is_terminal() {
        return Err(ApiError::InvalidState(
            "Only pending requests can be deleted".into(),
        ));
    }

    let result = sqlx::query("DELETE FROM leave_requests WHERE id = ? AND status = ?")
        .bind(request_id)
        .bind(LeaveStatus::Pending)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::InvalidState(
            "Only pending requests can be deleted".into(),
        ));
    }

    audit::append(
        &mut tx,
        actor.id,
        "leave_deleted",
        &format!("Deleted leave request #{}", request_id),
        Some(json!({ "leave_request_id": request_id })),
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Fetch a single request outside any transaction, for read endpoints.
pub async fn get(pool: &SqlitePool, request_id: i64) -> Result<LeaveRequest, ApiError> {
    sqlx::query_as::<_, LeaveRequest>(SELECT_REQUEST)
        .bind(request_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Leave request not found".into()))
}
