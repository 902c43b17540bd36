use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// The six leave categories an employee holds a balance for.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveCategory {
    Annual,
    Sick,
    Personal,
    Emergency,
    Maternity,
    Paternity,
}

impl LeaveCategory {
    /// Column on `employees` holding the balance for this category.
    /// Exhaustive by construction; keeps SQL out of reach of user input.
    pub fn balance_column(self) -> &'static str {
        match self {
            LeaveCategory::Annual => "annual_leave",
            LeaveCategory::Sick => "sick_leave",
            LeaveCategory::Personal => "personal_leave",
            LeaveCategory::Emergency => "emergency_leave",
            LeaveCategory::Maternity => "maternity_leave",
            LeaveCategory::Paternity => "paternity_leave",
        }
    }
}

/// Lifecycle of a leave request. `Pending` is the only non-terminal state.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        self != LeaveStatus::Pending
    }
}
