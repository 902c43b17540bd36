use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::enums::LeaveCategory;

/// One materialized day of an approved leave request.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct CalendarEntry {
    pub id: i64,
    pub employee_id: i64,
    pub leave_request_id: i64,
    #[schema(example = "2026-06-01", value_type = String, format = "date")]
    pub leave_date: NaiveDate,
    pub leave_type: LeaveCategory,
}

/// Calendar row joined with the owning employee, for org-wide views.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CalendarEntryWithEmployee {
    pub id: i64,
    pub employee_id: i64,
    pub leave_request_id: i64,
    pub leave_date: NaiveDate,
    pub leave_type: LeaveCategory,
    pub employee_name: String,
    pub employee_code: String,
    pub department: String,
}
