use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::ApiError;
use crate::model::audit::AuditLogEntryWithUser;

/// Append one audit record inside the caller's transaction. Action and
/// details are free-form; the row is never updated afterwards.
pub async fn append(
    conn: &mut SqliteConnection,
    user_id: i64,
    action: &str,
    description: &str,
    details: Option<Value>,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (user_id, action, description, details, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(action)
    .bind(description)
    .bind(details.map(|d| d.to_string()))
    .bind(Utc::now())
    .execute(conn)
    .await?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct AuditFilter {
    pub search: Option<String>,
    pub action: Option<String>,
    pub date: Option<NaiveDate>,
    pub page: u32,
    pub per_page: u32,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    Str(String),
    Timestamp(DateTime<Utc>),
}

/// Paginated audit listing joined with the acting user, newest first.
pub async fn list(
    pool: &SqlitePool,
    filter: &AuditFilter,
) -> Result<(Vec<AuditLogEntryWithUser>, i64), ApiError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(search) = filter.search.as_deref() {
        where_sql.push_str(
            " AND (e.name LIKE ? OR e.email LIKE ? OR a.description LIKE ?)",
        );
        let pattern = format!("%{}%", search);
        args.push(FilterValue::Str(pattern.clone()));
        args.push(FilterValue::Str(pattern.clone()));
        args.push(FilterValue::Str(pattern));
    }

    if let Some(action) = filter.action.as_deref() {
        if !action.eq_ignore_ascii_case("all") {
            where_sql.push_str(" AND a.action = ?");
            args.push(FilterValue::Str(action.to_string()));
        }
    }

    if let Some(date) = filter.date {
        let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = date.and_hms_opt(23, 59, 59).unwrap().and_utc();
        where_sql.push_str(" AND a.timestamp >= ? AND a.timestamp <= ?");
        args.push(FilterValue::Timestamp(start));
        args.push(FilterValue::Timestamp(end));
    }

    let count_sql = format!(
        "SELECT COUNT(*) FROM audit_logs a JOIN employees e ON e.id = a.user_id{}",
        where_sql
    );
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::Str(s) => count_q.bind(s.clone()),
            FilterValue::Timestamp(t) => count_q.bind(*t),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let per_page = filter.per_page.clamp(1, 100);
    let page = filter.page.max(1);
    let offset = (page - 1) * per_page;

    let data_sql = format!(
        r#"
        SELECT a.id, a.user_id, a.action, a.description, a.details, a.timestamp,
               e.name AS user_name, e.email AS user_email
        FROM audit_logs a
        JOIN employees e ON e.id = a.user_id
        {}
        ORDER BY a.timestamp DESC, a.id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, AuditLogEntryWithUser>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Timestamp(t) => data_q.bind(t),
        };
    }
    let rows = data_q.bind(per_page).bind(offset).fetch_all(pool).await?;

    Ok((rows, total))
}

/// Administrative maintenance: drop the whole trail, report how many rows went.
pub async fn purge(conn: &mut SqliteConnection) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM audit_logs").execute(conn).await?;
    Ok(result.rows_affected())
}
