use chrono::{NaiveDate, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;

use crate::core::audit;
use crate::error::ApiError;
use crate::model::enums::LeaveStatus;
use crate::model::leave_request::LeaveRequest;

pub const EXPIRY_COMMENT: &str = "Automatically expired - end date has passed";

/// Expire every pending request whose end date lies strictly before `today`
/// (the caller supplies the date in the organizational timezone). Each
/// transition is guarded by the pending-status precondition, so repeated or
/// concurrent sweeps expire a request at most once. Returns the count.
pub async fn expire_overdue(pool: &SqlitePool, today: NaiveDate) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;

    let stale = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date, duration,
               reason, status, admin_comment, created_at, updated_at
        FROM leave_requests
        WHERE status = ? AND end_date < ?
        "#,
    )
    .bind(LeaveStatus::Pending)
    .bind(today)
    .fetch_all(&mut *tx)
    .await?;

    let mut count = 0u64;
    for request in &stale {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, admin_comment = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(LeaveStatus::Expired)
        .bind(EXPIRY_COMMENT)
        .bind(Utc::now())
        .bind(request.id)
        .bind(LeaveStatus::Pending)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            continue;
        }
        count += 1;

        audit::append(
            &mut tx,
            request.employee_id,
            "leave_expired",
            &format!("Leave request #{} automatically expired", request.id),
            Some(json!({
                "leave_request_id": request.id,
                "leave_type": request.leave_type,
                "start_date": request.start_date,
                "end_date": request.end_date,
                "reason": "End date has passed without approval",
            })),
        )
        .await?;
    }

    tx.commit().await?;

    if count > 0 {
        info!(count, "expired overdue pending leave requests");
    }
    Ok(count)
}
