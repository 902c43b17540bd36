use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::enums::{LeaveCategory, LeaveStatus};

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "annual")]
    pub leave_type: LeaveCategory,
    #[schema(example = "2026-06-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-06-05", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    /// Inclusive day count, (end - start) + 1
    #[schema(example = 5)]
    pub duration: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub admin_comment: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Inclusive duration in days; 1 when start == end.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
