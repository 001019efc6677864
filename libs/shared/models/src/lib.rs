pub mod appointment;
pub mod call;
pub mod error;
