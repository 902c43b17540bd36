use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Immutable audit record. Rows are only ever inserted, or removed wholesale
/// by the admin purge.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AuditLogEntry {
    pub id: i64,
    pub user_id: i64,
    #[schema(example = "leave_approved")]
    pub action: String,
    pub description: String,
    /// JSON blob with action-specific context, stored as text.
    pub details: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
}

/// Audit row joined with the acting user, as listed to admins.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AuditLogEntryWithUser {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub description: String,
    pub details: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}
