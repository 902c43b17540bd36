use chrono::{Duration, NaiveDate};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::ApiError;
use crate::model::calendar::{CalendarEntry, CalendarEntryWithEmployee};
use crate::model::leave_request::LeaveRequest;

/// Every date in `[start, end]`, both ends included. Empty when end < start.
pub fn dates_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}

/// Replace the materialized rows for this request: delete everything that
/// references it, then insert one row per inclusive day. Idempotent; called
/// only when an approval is established.
pub(crate) async fn regenerate(
    conn: &mut SqliteConnection,
    request: &LeaveRequest,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM leave_calendar WHERE leave_request_id = ?")
        .bind(request.id)
        .execute(&mut *conn)
        .await?;

    for date in dates_inclusive(request.start_date, request.end_date) {
        sqlx::query(
            r#"
            INSERT INTO leave_calendar (employee_id, leave_request_id, leave_date, leave_type)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(request.id)
        .bind(date)
        .bind(request.leave_type)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Calendar rows for one employee within a date range, ordered by date.
pub async fn employee_entries(
    pool: &SqlitePool,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CalendarEntry>, ApiError> {
    let entries = sqlx::query_as::<_, CalendarEntry>(
        r#"
        SELECT id, employee_id, leave_request_id, leave_date, leave_type
        FROM leave_calendar
        WHERE employee_id = ? AND leave_date >= ? AND leave_date <= ?
        ORDER BY leave_date
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Calendar rows for every employee within a date range, joined with the
/// owning employee for grouping by callers.
pub async fn all_entries(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CalendarEntryWithEmployee>, ApiError> {
    let entries = sqlx::query_as::<_, CalendarEntryWithEmployee>(
        r#"
        SELECT c.id, c.employee_id, c.leave_request_id, c.leave_date, c.leave_type,
               e.name AS employee_name, e.employee_code, e.department
        FROM leave_calendar c
        JOIN employees e ON e.id = c.employee_id
        WHERE c.leave_date >= ? AND c.leave_date <= ?
        ORDER BY c.leave_date, c.employee_id
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
