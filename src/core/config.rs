use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub portal: PortalConfig,
    pub identity: IdentityConfig,
    pub image_upload: ImageUploadConfig,
    pub payments: PaymentConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir()
            .map_err(|e| config::ConfigError::Message(format!("Failed to find the current dir: {}", e)))?;
        let config_dir = base_path.join("src/core/configurations");

        let app_environment: Environment = std::env::var("SCHOLARSHIP_HUB_APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(config::ConfigError::Message)?;

        let configurations = config::Config::builder()
            .add_source(
                config::File::from(config_dir.join(app_environment.as_str())).required(true),
            )
            // e.g. SCHOLARSHIP_HUB__IMAGE_UPLOAD__API_KEY=... overrides image_upload.api_key
            .add_source(
                config::Environment::with_prefix("SCHOLARSHIP_HUB")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        configurations.try_deserialize()
    }
}

#[derive(Deserialize, Clone)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub public_api_base_url: String,
    #[serde(default = "default_ttl_secs")]
    pub role_cache_ttl_secs: u64,
    #[serde(default = "default_ttl_secs")]
    pub query_cache_ttl_secs: u64,
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: usize,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl PortalConfig {
    pub fn role_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.role_cache_ttl_secs)
    }

    pub fn query_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.query_cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[derive(Deserialize, Clone)]
pub struct IdentityConfig {
    pub api_key: Secret<String>,
    pub identity_base_url: String,
    pub token_base_url: String,
}

#[derive(Deserialize, Clone)]
pub struct ImageUploadConfig {
    pub api_key: Secret<String>,
    pub upload_url: String,
}

#[derive(Deserialize, Clone)]
pub struct PaymentConfig {
    pub publishable_key: Secret<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_catalog_page_size() -> usize {
    9
}

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not supported environment. Use either `local`, `sandbox` or `production` ",
                other
            )),
        }
    }
}
