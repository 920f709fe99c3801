use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::users::Role;
use crate::core::grapheme_len;

const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub scholarship_id: String,
    #[serde(default)]
    pub scholarship_name: Option<String>,
    #[serde(default)]
    pub university_name: Option<String>,
    pub reviewer_email: String,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default, rename = "reviewerImage")]
    pub reviewer_image: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl Review {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.reviewer_email.eq_ignore_ascii_case(email)
    }

    /// Reviewers manage their own reviews; moderators and admins manage all.
    pub fn can_be_modified_by(&self, email: &str, role: Option<Role>) -> bool {
        match role {
            Some(Role::Moderator | Role::Admin) => true,
            Some(Role::User) | None => self.is_owned_by(email),
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    #[validate(length(min = 1, message = "Required"))]
    pub scholarship_id: String,
    pub scholarship_name: Option<String>,
    pub university_name: Option<String>,
    #[validate(email(message = "Enter a valid email"))]
    pub reviewer_email: String,
    pub reviewer_name: Option<String>,
    #[serde(rename = "reviewerImage")]
    pub reviewer_image: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[validate(custom = "validate_comment")]
    pub comment: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_comment")]
    pub comment: Option<String>,
}

fn validate_comment(comment: &str) -> Result<(), ValidationError> {
    let length = grapheme_len(comment.trim());
    if length == 0 {
        let mut error = ValidationError::new("required");
        error.message = Some("Required".into());
        return Err(error);
    }
    if length > MAX_COMMENT_LENGTH {
        let mut error = ValidationError::new("length");
        error.message = Some("Comment is too long".into());
        return Err(error);
    }
    Ok(())
}
