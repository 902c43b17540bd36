pub mod audit;
pub mod calendar;
pub mod employee;
pub mod enums;
pub mod leave_request;
