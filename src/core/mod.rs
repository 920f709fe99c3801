pub mod config;
mod errors;
pub mod http_client;
mod telemetry;
pub mod utils;

pub use self::config::AppConfig;
pub use errors::*;
pub use http_client::ApiClient;
pub use telemetry::*;
pub use utils::*;
