use chrono::Utc;
use secrecy::Secret;
use std::sync::Arc;
use validator::Validate;

use crate::api::{
    ApplicationsApi, ImageUploader, PaymentsApi, ReviewsApi, ScholarshipsApi, UsersApi,
};
use crate::cache::{QueryCache, QueryKey};
use crate::core::{normalize_email, ApiClient, AppConfig, AppError};
use crate::dashboard::{Analytics, ApplicationWorkflow, CatalogView, Checkout};
use crate::models::{
    LoginForm, NewUser, RegistrationForm, Review, ReviewPatch, Role, WriteResult,
};
use crate::routing::{Location, NavigationOutcome, Navigator, Router};
use crate::session::{
    AuthSession, AuthUser, FirebaseIdentity, IdentityProvider, ProfileUpdate, RoleResolver,
};

/// One running portal: session, cache, router and every resource API,
/// wired from a single [`AppConfig`].
pub struct ScholarshipPortal {
    config: AppConfig,
    pub cache: Arc<QueryCache>,
    pub auth: Arc<AuthSession>,
    pub navigator: Arc<Navigator>,
    pub roles: Arc<RoleResolver>,
    pub router: Router,
    pub scholarships: ScholarshipsApi,
    pub applications: ApplicationsApi,
    pub reviews: ReviewsApi,
    pub users: UsersApi,
    pub payments: PaymentsApi,
    pub uploader: ImageUploader,
}

impl ScholarshipPortal {
    pub fn build(config: AppConfig) -> Result<Self, anyhow::Error> {
        let http_client = config.portal.http_client()?;
        let identity = FirebaseIdentity::new(http_client, config.identity.clone());
        Self::with_identity(config, Arc::new(identity))
    }

    pub fn with_identity(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, anyhow::Error> {
        let http_client = config.portal.http_client()?;
        let cache = Arc::new(QueryCache::new(config.portal.query_cache_ttl()));
        let navigator = Arc::new(Navigator::new());
        let auth = Arc::new(AuthSession::new(identity, cache.clone()));

        let public = ApiClient::public(
            http_client.clone(),
            &config.portal.public_api_base_url,
            navigator.clone(),
        );
        let secure = ApiClient::secure(
            http_client,
            &config.portal.api_base_url,
            auth.clone(),
            navigator.clone(),
        );

        let roles = Arc::new(RoleResolver::new(
            secure.clone(),
            cache.clone(),
            config.portal.role_cache_ttl(),
        ));
        let router = Router::new(auth.clone(), roles.clone(), navigator.clone());

        Ok(Self {
            scholarships: ScholarshipsApi::new(public.clone(), secure.clone(), cache.clone()),
            applications: ApplicationsApi::new(secure.clone(), cache.clone()),
            reviews: ReviewsApi::new(secure.clone(), cache.clone()),
            users: UsersApi::new(public.clone(), secure.clone(), cache.clone()),
            payments: PaymentsApi::new(secure),
            uploader: ImageUploader::new(public, config.image_upload.clone()),
            config,
            cache,
            auth,
            navigator,
            roles,
            router,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Settle the auth state. Routes that need a session report loading
    /// until this has run.
    pub async fn start(&self, refresh_token: Option<Secret<String>>) -> Result<(), AppError> {
        self.auth.initialize(refresh_token).await
    }

    pub async fn open(&self, path: &str) -> NavigationOutcome {
        self.router.resolve(path).await
    }

    /// Sign in and return to the page the login redirect interrupted.
    #[tracing::instrument(name = "Portal sign in", skip(self, form), fields(email = %form.email))]
    pub async fn sign_in(&self, form: &LoginForm) -> Result<AuthUser, AppError> {
        form.validate()?;
        let user = self
            .auth
            .sign_in(&normalize_email(&form.email), &form.password)
            .await?;
        self.navigator.navigate(self.navigator.after_login());
        Ok(user)
    }

    /// Create the identity account, then the backend user record with the
    /// default `user` role.
    #[tracing::instrument(name = "Portal registration", skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<AuthUser, AppError> {
        form.validate()?;
        let email = normalize_email(&form.email);
        let profile = ProfileUpdate {
            display_name: Some(form.name.trim().to_string()),
            photo_url: Some(form.photo_url.clone()),
        };
        let user = self.auth.register(&email, &form.password, profile).await?;

        let record = NewUser {
            name: form.name.trim().to_string(),
            email,
            photo_url: Some(form.photo_url.clone()),
            role: Role::User,
            created_at: Utc::now(),
        };
        self.users.create(&record).await?;
        self.navigator.navigate(Location::new("/"));
        Ok(user)
    }

    /// Ends the session and drops every cached query.
    pub async fn sign_out(&self) {
        self.auth.sign_out().await;
        self.navigator.navigate(Location::new("/"));
    }

    /// Update a review on behalf of the signed-in user.
    pub async fn edit_review(
        &self,
        review: &Review,
        patch: &ReviewPatch,
    ) -> Result<WriteResult, AppError> {
        self.ensure_can_modify(review).await?;
        self.reviews.update(&review.id, patch).await
    }

    /// Delete a review, removing it from `listing` optimistically.
    pub async fn delete_review(
        &self,
        listing: QueryKey,
        review: &Review,
    ) -> Result<WriteResult, AppError> {
        self.ensure_can_modify(review).await?;
        self.reviews.delete(listing, &review.id).await
    }

    async fn ensure_can_modify(&self, review: &Review) -> Result<(), AppError> {
        let email = self
            .auth
            .current()
            .await
            .and_then(|user| user.email)
            .ok_or_else(|| AppError::unauthorized("Please log in to continue"))?;
        let role = self.roles.resolve(&self.auth).await.role;
        if review.can_be_modified_by(&email, role) {
            Ok(())
        } else {
            Err(AppError::forbidden_error("You can only change your own reviews"))
        }
    }

    pub fn catalog_view(&self) -> CatalogView {
        CatalogView::new(self.config.portal.catalog_page_size)
    }

    pub fn workflow(&self) -> ApplicationWorkflow<'_> {
        ApplicationWorkflow::new(&self.applications)
    }

    pub fn checkout(&self) -> Checkout<'_> {
        Checkout::new(
            &self.scholarships,
            &self.applications,
            &self.payments,
            &self.config.payments,
        )
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(
            &self.scholarships,
            &self.applications,
            &self.reviews,
            &self.users,
        )
    }
}
