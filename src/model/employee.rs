use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::enums::{Gender, LeaveCategory, Role};

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    /// Generated code like "EMP001"
    #[schema(example = "EMP001")]
    pub employee_code: String,

    #[schema(example = "Jane Doe")]
    pub name: String,

    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    #[schema(example = "Engineering")]
    pub department: String,

    pub gender: Option<Gender>,

    #[schema(example = 20)]
    pub annual_leave: i64,
    #[schema(example = 10)]
    pub sick_leave: i64,
    #[schema(example = 5)]
    pub personal_leave: i64,
    #[schema(example = 5)]
    pub emergency_leave: i64,
    #[schema(example = 0)]
    pub maternity_leave: i64,
    #[schema(example = 15)]
    pub paternity_leave: i64,

    #[schema(example = "2026-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn balance(&self, category: LeaveCategory) -> i64 {
        match category {
            LeaveCategory::Annual => self.annual_leave,
            LeaveCategory::Sick => self.sick_leave,
            LeaveCategory::Personal => self.personal_leave,
            LeaveCategory::Emergency => self.emergency_leave,
            LeaveCategory::Maternity => self.maternity_leave,
            LeaveCategory::Paternity => self.paternity_leave,
        }
    }
}

/// Maternity/paternity defaults derived from gender. The other four
/// categories are never touched by a gender change.
pub fn parental_balances(gender: Option<Gender>) -> (i64, i64) {
    match gender {
        Some(Gender::Female) => (90, 0),
        Some(Gender::Male) => (0, 15),
        Some(Gender::Other) | None => (0, 0),
    }
}
