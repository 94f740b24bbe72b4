//! Shared helpers: logging, input validation, date/time parsing

pub mod logger;
pub mod time;
pub mod validation;
