use chrono::Utc;
use sqlx::SqliteConnection;

use crate::error::ApiError;
use crate::model::employee::parental_balances;
use crate::model::enums::{Gender, LeaveCategory};

/// Current balance for one employee/category pair, read inside the caller's
/// transaction so approval sees a consistent value.
pub(crate) async fn balance_in(
    conn: &mut SqliteConnection,
    employee_id: i64,
    category: LeaveCategory,
) -> Result<i64, ApiError> {
    let sql = format!(
        "SELECT {} FROM employees WHERE id = ?",
        category.balance_column()
    );
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(employee_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))
}

/// Debit `days` from the category balance. Invoked only by approval, after
/// the balance has been re-checked inside the same transaction, so the
/// counter cannot go negative.
pub(crate) async fn debit(
    conn: &mut SqliteConnection,
    employee_id: i64,
    category: LeaveCategory,
    days: i64,
) -> sqlx::Result<()> {
    let col = category.balance_column();
    let sql = format!(
        "UPDATE employees SET {col} = {col} - ?, updated_at = ? WHERE id = ?",
        col = col
    );
    sqlx::query(&sql)
        .bind(days)
        .bind(Utc::now())
        .bind(employee_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Re-derive maternity/paternity from the new gender, leaving the other four
/// counters alone. The only balance mutation outside the approval path.
pub(crate) async fn apply_gender_change(
    conn: &mut SqliteConnection,
    employee_id: i64,
    gender: Option<Gender>,
) -> sqlx::Result<()> {
    let (maternity, paternity) = parental_balances(gender);
    sqlx::query(
        r#"
        UPDATE employees
        SET gender = ?, maternity_leave = ?, paternity_leave = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(gender)
    .bind(maternity)
    .bind(paternity)
    .bind(Utc::now())
    .bind(employee_id)
    .execute(conn)
    .await?;
    Ok(())
}
