use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::core::audit;
use crate::core::audit::AuditFilter;
use crate::error::ApiError;
use crate::model::audit::AuditLogEntryWithUser;

#[derive(Deserialize, IntoParams)]
pub struct LogQuery {
    /// Matches user name, user email or description
    pub search: Option<String>,
    /// Exact action tag, or "all"
    pub action: Option<String>,
    /// Restrict to one calendar day
    pub date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct LogListResponse {
    pub data: Vec<AuditLogEntryWithUser>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// List audit log entries (admin)
#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Paginated audit trail, newest first", body = LogListResponse),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
pub async fn list_logs(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).min(100);
    let filter = AuditFilter {
        search: query.search.clone(),
        action: query.action.clone(),
        date: query.date,
        page,
        per_page,
    };

    let (data, total) = audit::list(pool.get_ref(), &filter).await?;
    Ok(HttpResponse::Ok().json(LogListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Purge the audit trail (admin)
///
/// Deletes every entry, then records the purge itself as the first entry of
/// the fresh trail.
#[utoipa::path(
    delete,
    path = "/api/logs",
    responses(
        (status = 200, description = "Number of entries removed"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
pub async fn purge_logs(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let mut tx = pool.begin().await?;
    let deleted = audit::purge(&mut tx).await?;
    audit::append(
        &mut tx,
        auth.user_id,
        "logs_purged",
        &format!("Purged {} audit log entries", deleted),
        Some(json!({ "deleted_count": deleted })),
    )
    .await?;
    tx.commit().await?;

    info!(deleted, "audit trail purged");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Audit logs purged successfully",
        "deleted_count": deleted
    })))
}
