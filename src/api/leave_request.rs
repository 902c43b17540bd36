use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::core::{expiry, leave};
use crate::core::leave::{SubmitLeave, UpdateLeave};
use crate::error::ApiError;
use crate::model::enums::LeaveStatus;
use crate::model::leave_request::LeaveRequest;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID (admin only; employees always see their own)
    #[schema(example = 1)]
    pub employee_id: Option<i64>,
    /// Filter by request status
    pub status: Option<LeaveStatus>,
    /// Pagination page number (1-based)
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct ApprovalBody {
    #[schema(example = "Enjoy your leave")]
    pub admin_comment: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    I64(i64),
    Status(LeaveStatus),
}

async fn paginated_list(
    pool: &SqlitePool,
    employee_id: Option<i64>,
    status: Option<LeaveStatus>,
    page: u32,
    per_page: u32,
) -> Result<LeaveListResponse, ApiError> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(id) = employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::I64(id));
    }
    if let Some(status) = status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Status(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Status(s) => count_q.bind(*s),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let offset = (page - 1) * per_page;
    let data_sql = format!(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date, duration,
               reason, status, admin_comment, created_at, updated_at
        FROM leave_requests
        {}
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(v),
            FilterValue::Status(s) => data_q.bind(s),
        };
    }
    let data = data_q.bind(per_page).bind(offset).fetch_all(pool).await?;

    Ok(LeaveListResponse {
        data,
        page,
        per_page,
        total,
    })
}

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = SubmitLeave,
    responses(
        (status = 200, description = "Request created in pending state", body = LeaveRequest),
        (status = 400, description = "Bad dates or insufficient balance"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<SubmitLeave>,
) -> Result<HttpResponse, ApiError> {
    let request = leave::submit(pool.get_ref(), auth.user_id, &payload).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// List leave requests
///
/// Admins see every request; employees only their own. Overdue pending
/// requests are expired before the listing is read.
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    expiry::expire_overdue(pool.get_ref(), config.today()).await?;

    let employee_id = if auth.is_admin() {
        query.employee_id
    } else {
        Some(auth.user_id)
    };
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let response = paginated_list(pool.get_ref(), employee_id, query.status, page, per_page).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// List own leave requests
#[utoipa::path(
    get,
    path = "/api/leaves/my",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn my_leaves(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    expiry::expire_overdue(pool.get_ref(), config.today()).await?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let response =
        paginated_list(pool.get_ref(), Some(auth.user_id), query.status, page, per_page).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Fetch one leave request
#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(("id" = i64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request", body = LeaveRequest),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let request = leave::get(pool.get_ref(), path.into_inner()).await?;
    if !auth.is_admin() && request.employee_id != auth.user_id {
        return Err(ApiError::Permission("Not enough permissions".into()));
    }
    Ok(HttpResponse::Ok().json(request))
}

/// Edit a pending leave request
#[utoipa::path(
    put,
    path = "/api/leaves/{id}",
    params(("id" = i64, Path, description = "Leave request id")),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Updated request", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateLeave>,
) -> Result<HttpResponse, ApiError> {
    let request = leave::update(pool.get_ref(), auth.actor(), path.into_inner(), &payload).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Delete a pending leave request
#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    params(("id" = i64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Request deleted"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    leave::delete(pool.get_ref(), auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request deleted successfully"
    })))
}

/// Approve a leave request (admin)
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/approve",
    params(("id" = i64, Path, description = "Leave request id")),
    request_body = ApprovalBody,
    responses(
        (status = 200, description = "Approved request", body = LeaveRequest),
        (status = 400, description = "Insufficient balance"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<ApprovalBody>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let request = leave::approve(
        pool.get_ref(),
        auth.user_id,
        path.into_inner(),
        payload.admin_comment.clone(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Reject a leave request (admin)
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/reject",
    params(("id" = i64, Path, description = "Leave request id")),
    request_body = ApprovalBody,
    responses(
        (status = 200, description = "Rejected request", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<ApprovalBody>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let request = leave::reject(
        pool.get_ref(),
        auth.user_id,
        path.into_inner(),
        payload.admin_comment.clone(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(request))
}
