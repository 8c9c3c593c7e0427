//! Seven-field cron expressions (`second minute hour day-of-month month
//! day-of-week year`): parsing into a validated [`Schedule`] and finding
//! the next matching instant.

pub mod calendar;
pub mod error;
pub mod grammar;
pub mod models;
pub mod parser;
pub mod scheduler;
pub mod validator;

pub use error::CronParsingError;
pub use grammar::FieldKind;
pub use models::{FieldSpec, Schedule};
pub use parser::CronParser;
pub use scheduler::{compute_next_run, Occurrences};
