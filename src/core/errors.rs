use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

use crate::session::identity::IdentityError;

#[derive(Debug, Clone, PartialEq)]
pub enum AppErrorType {
    NotFoundError,
    AuthError,
    ForbiddenError,
    JsonParseError,
    PayloadValidationError,
    ApiError { code: u16, message: String },
    NetworkError,
    IdentityError,
    InvalidTransition,
    ConfigError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppError {
    pub error_type: AppErrorType,
    pub message: Option<String>,
    pub cause: Option<String>,
}

/// Error body returned by the backend, when it bothers to send one.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AppError {
    /// Text shown to the user in a notification.
    pub fn message(&self) -> String {
        match self {
            AppError {
                message: Some(message),
                ..
            } => message.clone(),
            AppError {
                message: None,
                error_type: AppErrorType::NotFoundError,
                ..
            } => "The requested item was not found".to_string(),
            AppError {
                message: None,
                error_type: AppErrorType::AuthError,
                ..
            } => "Please log in to continue".to_string(),
            AppError {
                message: None,
                error_type: AppErrorType::ForbiddenError,
                ..
            } => "You are not allowed to do that".to_string(),
            _ => "An unexpected error has occurred".to_string(),
        }
    }

    pub fn not_found(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::NotFoundError,
            message: Some(error.to_string()),
        }
    }

    pub fn forbidden_error(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::ForbiddenError,
            message: Some(error.to_string()),
        }
    }

    pub fn unauthorized(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::AuthError,
            message: Some(error.to_string()),
        }
    }

    pub fn validation_error(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::PayloadValidationError,
            message: Some(error.to_string()),
        }
    }

    pub fn invalid_transition(error: impl ToString) -> AppError {
        AppError {
            cause: None,
            error_type: AppErrorType::InvalidTransition,
            message: Some(error.to_string()),
        }
    }

    pub fn network_error(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::NetworkError,
            message: Some("Could not reach the server, please try again".to_string()),
        }
    }

    /// Maps a non-success backend status onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: Option<ApiErrorBody>) -> AppError {
        let server_message = body.and_then(|b| b.message.or(b.error));
        let error_type = match status {
            StatusCode::UNAUTHORIZED => AppErrorType::AuthError,
            StatusCode::FORBIDDEN => AppErrorType::ForbiddenError,
            StatusCode::NOT_FOUND => AppErrorType::NotFoundError,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppErrorType::PayloadValidationError
            }
            other => AppErrorType::ApiError {
                code: other.as_u16(),
                message: server_message.clone().unwrap_or_default(),
            },
        };

        AppError {
            error_type,
            cause: Some(format!("backend responded with {}", status)),
            message: server_message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.error_type == AppErrorType::AuthError
    }

    pub fn is_forbidden(&self) -> bool {
        self.error_type == AppErrorType::ForbiddenError
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return AppError {
                cause: Some(error.to_string()),
                message: Some("The server sent an unexpected response".to_string()),
                error_type: AppErrorType::JsonParseError,
            };
        }
        match error.status() {
            Some(status) => AppError::from_status(status, None),
            None => AppError::network_error(error),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError {
            cause: Some(error.to_string()),
            message: Some(format!("Failed to parse data: {}", error)),
            error_type: AppErrorType::JsonParseError,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{}: {}", field, reason)
            })
            .collect();
        fields.sort();

        AppError {
            cause: Some(errors.to_string()),
            message: Some(fields.join(", ")),
            error_type: AppErrorType::PayloadValidationError,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError {
            cause: Some(error.to_string()),
            message: Some(format!("Invalid configuration: {}", error)),
            error_type: AppErrorType::ConfigError,
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(error: IdentityError) -> Self {
        let error_type = match error {
            IdentityError::InvalidCredentials | IdentityError::TokenExpired => {
                AppErrorType::AuthError
            }
            _ => AppErrorType::IdentityError,
        };
        AppError {
            cause: Some(error.to_string()),
            message: Some(error.user_message()),
            error_type,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}
