use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::scholarships::{Degree, Scholarship, ScholarshipCategory, SubjectCategory};
use crate::core::AppError;

/// Review workflow of an application.
///
/// ```text
/// pending ──feedback──▶ processing ──accept──▶ completed
///    │                      │
///    ├──accept──▶ completed └──reject──▶ rejected
///    └──cancel/reject──▶ rejected
/// ```
/// `completed` and `rejected` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Processing,
        ApplicationStatus::Completed,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        match (self, next) {
            (Pending, Processing | Completed | Rejected) => true,
            (Processing, Processing | Completed | Rejected) => true,
            (Pending, Pending) => false,
            (Processing, Pending) => false,
            (Completed | Rejected, _) => false,
        }
    }

    pub fn transition_to(&self, next: ApplicationStatus) -> Result<ApplicationStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::invalid_transition(format!(
                "An application that is {} cannot become {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("Invalid application status: {}", other)),
        }
    }
}

// The backend holds both "Rejected" and "rejected".
impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: String,
    pub scholarship_id: String,
    pub user_email: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub university_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub applying_degree: Degree,
    pub subject_category: SubjectCategory,
    pub scholarship_category: ScholarshipCategory,
    pub application_fees: f64,
    pub service_charge: f64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(rename = "application_status")]
    pub status: ApplicationStatus,
    #[serde(rename = "payment_status")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Applicants may withdraw only before review starts.
    pub fn ensure_cancellable(&self) -> Result<(), AppError> {
        match self.status {
            ApplicationStatus::Pending => Ok(()),
            other => Err(AppError::invalid_transition(format!(
                "Cannot cancel: application is {}",
                other.as_str()
            ))),
        }
    }

    pub fn ensure_editable(&self) -> Result<(), AppError> {
        match self.status {
            ApplicationStatus::Pending => Ok(()),
            _ => Err(AppError::invalid_transition(
                "Cannot edit: processing in progress",
            )),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// Personal details entered on the application form.
#[derive(Debug, Clone, Validate)]
pub struct ApplicantDetails {
    #[validate(length(min = 6, message = "Enter a valid phone number"))]
    pub phone: String,
    #[validate(url(message = "Please upload your photo"))]
    pub photo_url: String,
    #[validate(length(min = 1, message = "Required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Required"))]
    pub gender: String,
    pub applying_degree: Degree,
    #[validate(length(min = 1, message = "Required"))]
    pub ssc_result: String,
    #[validate(length(min = 1, message = "Required"))]
    pub hsc_result: String,
    pub study_gap: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub phone: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub address: String,
    pub gender: String,
    pub applying_degree: Degree,
    pub ssc_result: String,
    pub hsc_result: String,
    pub study_gap: String,
    pub scholarship_id: String,
    pub university_name: String,
    pub scholarship_category: ScholarshipCategory,
    pub subject_category: SubjectCategory,
    pub service_charge: f64,
    pub application_fees: f64,
    pub user_email: String,
    pub user_name: Option<String>,
    #[serde(rename = "payment_status")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "application_status")]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl NewApplication {
    /// A fresh application: pending review, payment outstanding.
    pub fn for_scholarship(
        scholarship: &Scholarship,
        details: ApplicantDetails,
        user_email: &str,
        user_name: Option<String>,
    ) -> Self {
        Self {
            phone: details.phone,
            photo_url: details.photo_url,
            address: details.address,
            gender: details.gender,
            applying_degree: details.applying_degree,
            ssc_result: details.ssc_result,
            hsc_result: details.hsc_result,
            study_gap: details.study_gap.unwrap_or_else(|| "None".to_string()),
            scholarship_id: scholarship.id.clone(),
            university_name: scholarship.university_name.clone(),
            scholarship_category: scholarship.scholarship_category,
            subject_category: scholarship.subject_category,
            service_charge: scholarship.service_charge,
            application_fees: scholarship.application_fees,
            user_email: user_email.to_string(),
            user_name,
            payment_status: PaymentStatus::Pending,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    #[serde(rename = "application_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(rename = "payment_status", skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applying_degree: Option<Degree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The fields analytics reads from an application. Statuses stay raw so
/// records the workflow does not know still get counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDigest {
    #[serde(default, rename = "application_status")]
    pub status: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}
