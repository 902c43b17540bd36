use actix_web::web;

use crate::api::{analytics, audit_log, calendar, employee, holiday, leave_request};
use crate::auth::handlers as auth_handlers;
use crate::config::Config;

/// Mounts the public auth scope and the protected API scope. Everything under
/// the API prefix requires a bearer token via the `AuthUser` extractor.
pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/logout", web::post().to(auth_handlers::logout))
            .route(
                "/change-email",
                web::post().to(auth_handlers::change_email),
            ),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            // profile
            .route("/profile", web::get().to(auth_handlers::me))
            .route("/profile", web::put().to(auth_handlers::update_profile))
            .route(
                "/profile/password",
                web::put().to(auth_handlers::change_password),
            )
            // leave requests; "/leaves/my" must register before "/leaves/{id}"
            .route("/leaves", web::post().to(leave_request::create_leave))
            .route("/leaves", web::get().to(leave_request::leave_list))
            .route("/leaves/my", web::get().to(leave_request::my_leaves))
            .route("/leaves/{id}", web::get().to(leave_request::get_leave))
            .route("/leaves/{id}", web::put().to(leave_request::update_leave))
            .route("/leaves/{id}", web::delete().to(leave_request::delete_leave))
            .route(
                "/leaves/{id}/approve",
                web::put().to(leave_request::approve_leave),
            )
            .route(
                "/leaves/{id}/reject",
                web::put().to(leave_request::reject_leave),
            )
            // employees (admin)
            .route("/employees", web::post().to(employee::create_employee))
            .route("/employees", web::get().to(employee::list_employees))
            .route("/employees/{id}", web::get().to(employee::get_employee))
            .route("/employees/{id}", web::put().to(employee::update_employee))
            .route(
                "/employees/{id}",
                web::delete().to(employee::delete_employee),
            )
            // calendar; "/calendar/my" and "/calendar/employees" before the id route
            .route("/calendar/my", web::get().to(calendar::my_calendar))
            .route("/calendar/employees", web::get().to(calendar::team_calendar))
            .route(
                "/calendar/{employee_id}",
                web::get().to(calendar::employee_calendar),
            )
            // holidays
            .route("/holidays", web::get().to(holiday::list_holidays))
            // audit trail (admin)
            .route("/logs", web::get().to(audit_log::list_logs))
            .route("/logs", web::delete().to(audit_log::purge_logs))
            // analytics and maintenance (admin)
            .route("/analytics/summary", web::get().to(analytics::summary))
            .route(
                "/analytics/departments",
                web::get().to(analytics::departments),
            )
            .route(
                "/analytics/employee/{id}",
                web::get().to(analytics::employee),
            )
            .route(
                "/maintenance/expire-leaves",
                web::post().to(analytics::expire_leaves),
            ),
    );
}
