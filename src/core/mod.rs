pub mod audit;
pub mod balance;
pub mod calendar;
pub mod expiry;
pub mod leave;
