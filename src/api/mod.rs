pub mod analytics;
pub mod audit_log;
pub mod calendar;
pub mod employee;
pub mod holiday;
pub mod leave_request;
