#![warn(unused_crate_dependencies)]

mod app;
pub mod background_worker;
pub mod cli;
pub mod configuration;
mod pages;
pub mod tracing;
mod ui_helpers;

pub use app::QuotaAdminApp;
