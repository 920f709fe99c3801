use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Authorization tier. Anything the backend sends that is not one of these
/// is treated as no role at all.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    /// Raw role string; parse with [`UserProfile::role`].
    #[serde(default, rename = "role")]
    pub raw_role: Option<String>,
}

impl UserProfile {
    pub fn role(&self) -> Option<Role> {
        self.raw_role.as_deref().and_then(|r| r.parse().ok())
    }
}

/// Backend record created right after identity registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleUpdate {
    pub role: Role,
}

#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: Secret<String>,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.email.trim().is_empty() {
            errors.add("email", invalid("required", "Email is required"));
        }
        if let Err(error) = check_password(&self.password) {
            errors.add("password", error);
        }
        into_result(errors)
    }
}

#[derive(Debug)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: Secret<String>,
    pub photo_url: String,
}

impl Validate for RegistrationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", invalid("required", "Name is required"));
        }
        if !validator::validate_email(self.email.as_str()) {
            errors.add("email", invalid("email", "Enter a valid email"));
        }
        if let Err(error) = check_password(&self.password) {
            errors.add("password", error);
        }
        if !validator::validate_url(self.photo_url.as_str()) {
            errors.add("photo_url", invalid("url", "Image is required"));
        }
        into_result(errors)
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// The secret never goes into the error params.
fn check_password(password: &Secret<String>) -> Result<(), ValidationError> {
    let password = password.expose_secret();
    if password.is_empty() {
        return Err(invalid("required", "Password is required"));
    }
    if password.chars().count() < 6 {
        return Err(invalid("length", "Minimum 6 characters"));
    }
    Ok(())
}
