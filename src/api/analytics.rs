use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::handlers::fetch_employee;
use crate::config::Config;
use crate::core::{audit, expiry};
use crate::error::ApiError;
use crate::model::enums::LeaveStatus;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct DepartmentStats {
    pub department: String,
    pub employees: i64,
    pub requests: i64,
    pub approved_days: i64,
}

async fn grouped_counts(
    pool: &SqlitePool,
    sql: &str,
    employee_id: Option<i64>,
) -> Result<BTreeMap<String, i64>, ApiError> {
    let mut q = sqlx::query_as::<_, (String, i64)>(sql);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let rows = q.fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}

/// Org-wide leave summary (admin)
#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    responses(
        (status = 200, description = "Request counts by status, approved days by type"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn summary(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let pool = pool.get_ref();

    let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;
    let total_requests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests")
        .fetch_one(pool)
        .await?;

    let by_status = grouped_counts(
        pool,
        "SELECT status, COUNT(*) FROM leave_requests GROUP BY status",
        None,
    )
    .await?;
    let approved_days_by_type = grouped_counts(
        pool,
        "SELECT leave_type, SUM(duration) FROM leave_requests WHERE status = 'approved' \
         GROUP BY leave_type",
        None,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "total_employees": total_employees,
        "total_requests": total_requests,
        "requests_by_status": by_status,
        "approved_days_by_type": approved_days_by_type,
        "pending_requests": by_status.get("pending").copied().unwrap_or(0),
    })))
}

/// Per-department leave usage (admin)
#[utoipa::path(
    get,
    path = "/api/analytics/departments",
    responses(
        (status = 200, description = "Employee, request and approved-day counts per department",
         body = [DepartmentStats]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn departments(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let stats = sqlx::query_as::<_, DepartmentStats>(
        r#"
        SELECT e.department,
               COUNT(DISTINCT e.id) AS employees,
               COUNT(l.id) AS requests,
               COALESCE(SUM(CASE WHEN l.status = 'approved' THEN l.duration ELSE 0 END), 0)
                   AS approved_days
        FROM employees e
        LEFT JOIN leave_requests l ON l.employee_id = e.id
        GROUP BY e.department
        ORDER BY e.department
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// One employee's leave usage (admin)
#[utoipa::path(
    get,
    path = "/api/analytics/employee/{id}",
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Balances, request counts and approved days for one employee"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let employee_id = path.into_inner();

    let mut conn = pool.acquire().await?;
    let employee = fetch_employee(&mut conn, employee_id).await?;
    drop(conn);

    let by_status = grouped_counts(
        pool.get_ref(),
        "SELECT status, COUNT(*) FROM leave_requests WHERE employee_id = ? GROUP BY status",
        Some(employee_id),
    )
    .await?;
    let approved_days_by_type = grouped_counts(
        pool.get_ref(),
        "SELECT leave_type, SUM(duration) FROM leave_requests \
         WHERE employee_id = ? AND status = 'approved' GROUP BY leave_type",
        Some(employee_id),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "employee": {
            "id": employee.id,
            "employee_code": employee.employee_code,
            "name": employee.name,
            "department": employee.department,
        },
        "balances": {
            "annual": employee.annual_leave,
            "sick": employee.sick_leave,
            "personal": employee.personal_leave,
            "emergency": employee.emergency_leave,
            "maternity": employee.maternity_leave,
            "paternity": employee.paternity_leave,
        },
        "requests_by_status": by_status,
        "approved_days_by_type": approved_days_by_type,
    })))
}

/// Expire overdue pending requests now (admin)
///
/// Runs the same sweep the listing endpoints perform opportunistically and
/// records a bulk audit entry when anything expired.
#[utoipa::path(
    post,
    path = "/api/maintenance/expire-leaves",
    responses(
        (status = 200, description = "Number of requests moved to expired"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn expire_leaves(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let expired = expiry::expire_overdue(pool.get_ref(), config.today()).await?;
    if expired > 0 {
        let mut tx = pool.begin().await?;
        audit::append(
            &mut tx,
            auth.user_id,
            "leaves_expired",
            &format!("Expired {} overdue leave requests", expired),
            Some(json!({
                "expired_count": expired,
                "status": LeaveStatus::Expired,
            })),
        )
        .await?;
        tx.commit().await?;
    }

    info!(expired, "manual expiry sweep completed");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Expiry sweep completed",
        "expired_count": expired
    })))
}
