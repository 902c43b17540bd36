use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{openapi, Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management System API",
        version = "1.0.0",
        description = r#"
## Leave Management System (LMS)

This API powers an employee **leave management** backend.

### 🔹 Key Features
- **Accounts & Profiles**
  - Register, login, change password, update profile
- **Leave Requests**
  - Submit, edit and cancel pending requests; admins approve or reject
- **Balances**
  - Per-category day counters debited on approval, gender-derived parental leave
- **Calendar**
  - Approved leave materialized per day, with public holiday lookup
- **Audit Trail & Analytics**
  - Immutable action log and org/department/employee usage summaries

### 🔐 Security
All endpoints outside `/auth` require **JWT Bearer authentication**.
Administrative operations additionally require the **admin** role.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::change_email,
        crate::auth::handlers::me,
        crate::auth::handlers::change_password,
        crate::auth::handlers::update_profile,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::calendar::my_calendar,
        crate::api::calendar::team_calendar,
        crate::api::calendar::employee_calendar,

        crate::api::holiday::list_holidays,

        crate::api::audit_log::list_logs,
        crate::api::audit_log::purge_logs,

        crate::api::analytics::summary,
        crate::api::analytics::departments,
        crate::api::analytics::employee,
        crate::api::analytics::expire_leaves,
    ),
    components(schemas(
        crate::model::employee::Employee,
        crate::model::leave_request::LeaveRequest,
        crate::model::calendar::CalendarEntry,
        crate::model::audit::AuditLogEntry,
        crate::model::audit::AuditLogEntryWithUser,
        crate::model::enums::Role,
        crate::model::enums::Gender,
        crate::model::enums::LeaveCategory,
        crate::model::enums::LeaveStatus,
        crate::holidays::Holiday,

        crate::auth::handlers::RegisterRequest,
        crate::auth::handlers::LoginRequest,
        crate::auth::handlers::TokenResponse,
        crate::auth::handlers::ChangePassword,
        crate::auth::handlers::ChangeEmail,
        crate::auth::handlers::UpdateProfile,

        crate::core::leave::SubmitLeave,
        crate::core::leave::UpdateLeave,
        crate::api::leave_request::ApprovalBody,
        crate::api::leave_request::LeaveListResponse,
        crate::api::employee::EmployeeListResponse,
        crate::api::employee::UpdateEmployee,
        crate::api::audit_log::LogListResponse,
        crate::api::analytics::DepartmentStats,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Leave", description = "Leave request lifecycle"),
        (name = "Employee", description = "Employee administration"),
        (name = "Calendar", description = "Materialized leave calendar"),
        (name = "Holiday", description = "Public holiday lookup"),
        (name = "Audit", description = "Immutable audit trail"),
        (name = "Analytics", description = "Usage summaries and maintenance"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
