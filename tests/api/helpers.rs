use async_trait::async_trait;
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use scholarship_hub::core::config::{
    AppConfig, IdentityConfig, ImageUploadConfig, PaymentConfig, PortalConfig,
};
use scholarship_hub::core::{get_subscriber, init_subscriber};
use scholarship_hub::models::LoginForm;
use scholarship_hub::scholarship_portal::ScholarshipPortal;
use scholarship_hub::session::identity::{IdentityError, IdentityTokens, SignedIn};
use scholarship_hub::session::{AuthUser, IdentityProvider, ProfileUpdate};
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-id-token";
pub const TEST_PASSWORD: &str = "secret1";

// Ensure that the `tracing` stack is only initialised once
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Identity provider that accepts one password and never expires tokens.
pub struct StubIdentity;

fn tokens() -> IdentityTokens {
    IdentityTokens {
        id_token: Secret::new(TEST_TOKEN.to_string()),
        refresh_token: Secret::new("test-refresh-token".to_string()),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

fn user(email: &str) -> AuthUser {
    AuthUser {
        uid: format!("uid-{}", email),
        email: Some(email.to_string()),
        display_name: Some("Ada".to_string()),
        photo_url: None,
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn sign_in(&self, email: &str, password: &Secret<String>) -> Result<SignedIn, IdentityError> {
        if password.expose_secret() != TEST_PASSWORD {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(SignedIn {
            user: user(email),
            tokens: tokens(),
        })
    }

    async fn sign_up(&self, email: &str, password: &Secret<String>) -> Result<SignedIn, IdentityError> {
        self.sign_in(email, password).await
    }

    async fn update_profile(
        &self,
        _: &Secret<String>,
        update: &ProfileUpdate,
    ) -> Result<AuthUser, IdentityError> {
        Ok(AuthUser {
            uid: "uid-new".to_string(),
            email: None,
            display_name: update.display_name.clone(),
            photo_url: update.photo_url.clone(),
        })
    }

    async fn refresh(&self, _: &Secret<String>) -> Result<IdentityTokens, IdentityError> {
        Ok(tokens())
    }

    async fn lookup(&self, _: &Secret<String>) -> Result<AuthUser, IdentityError> {
        Err(IdentityError::TokenExpired)
    }
}

pub struct TestPortal {
    pub server: MockServer,
    pub portal: ScholarshipPortal,
}

impl TestPortal {
    pub async fn sign_in(&self, email: &str) {
        let form = LoginForm {
            email: email.to_string(),
            password: Secret::new(TEST_PASSWORD.to_string()),
        };
        self.portal.sign_in(&form).await.expect("Failed to sign in");
    }

    /// Answer role lookups for any user with `role`.
    pub async fn mount_role(&self, role: &str) {
        Mock::given(method("GET"))
            .and(wiremock::matchers::path_regex(r"^/users/[^/]+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": role })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_json(&self, http_method: &str, route: &str, body: Value) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

pub fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        portal: PortalConfig {
            api_base_url: base_url.to_string(),
            public_api_base_url: base_url.to_string(),
            role_cache_ttl_secs: 300,
            query_cache_ttl_secs: 300,
            catalog_page_size: 9,
            request_timeout_secs: Some(5),
        },
        identity: IdentityConfig {
            api_key: Secret::new("identity-key".to_string()),
            identity_base_url: base_url.to_string(),
            token_base_url: base_url.to_string(),
        },
        image_upload: ImageUploadConfig {
            api_key: Secret::new("upload-key".to_string()),
            upload_url: format!("{}/upload", base_url),
        },
        payments: PaymentConfig {
            publishable_key: Secret::new("pk_test".to_string()),
            currency: "usd".to_string(),
        },
    }
}

pub async fn spawn_portal() -> TestPortal {
    Lazy::force(&TRACING);

    let server = MockServer::start().await;
    let portal = ScholarshipPortal::with_identity(test_config(&server.uri()), Arc::new(StubIdentity))
        .expect("Failed to build portal");
    portal.start(None).await.expect("Failed to settle auth state");

    TestPortal { server, portal }
}

pub fn scholarship_json(id: &str, fee: f64) -> Value {
    json!({
        "_id": id,
        "name": "Global Excellence Grant",
        "universityName": "Kyoto University",
        "country": "Japan",
        "city": "Kyoto",
        "worldRank": 36,
        "subjectCategory": "Engineering",
        "scholarshipCategory": "Full fund",
        "degree": "Masters",
        "applicationFees": fee,
        "serviceCharge": 10.0,
        "applicationDeadline": "2099-12-31",
        "postDate": "2024-01-10"
    })
}

pub fn application_json(id: &str, email: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "scholarshipId": "s1",
        "userEmail": email,
        "userName": "Ada",
        "universityName": "Kyoto University",
        "applyingDegree": "Masters",
        "subjectCategory": "Engineering",
        "scholarshipCategory": "Full fund",
        "applicationFees": 20.0,
        "serviceCharge": 10.0,
        "application_status": status,
        "payment_status": "pending",
        "createdAt": "2024-03-01T10:00:00Z"
    })
}
