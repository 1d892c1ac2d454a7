pub mod account;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod provision;
pub mod sheet;
pub mod ui;

pub use error::{LookupError, ProvisionError};
