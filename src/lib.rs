pub mod api;
pub mod cache;
pub mod core;
pub mod dashboard;
pub mod models;
pub mod routing;
pub mod scholarship_portal;
pub mod session;
