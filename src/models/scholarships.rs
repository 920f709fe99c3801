use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectCategory {
    Agriculture,
    Engineering,
    Doctor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScholarshipCategory {
    #[serde(rename = "Full fund")]
    FullFund,
    Partial,
    #[serde(rename = "Self-fund")]
    SelfFund,
}

impl ScholarshipCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullFund => "Full fund",
            Self::Partial => "Partial",
            Self::SelfFund => "Self-fund",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degree {
    Diploma,
    Bachelor,
    Masters,
    Doctor,
}

impl Degree {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Diploma => "Diploma",
            Self::Bachelor => "Bachelor",
            Self::Masters => "Masters",
            Self::Doctor => "Doctor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub university_name: String,
    #[serde(rename = "logoURL", default)]
    pub logo_url: Option<String>,
    pub country: String,
    pub city: String,
    pub world_rank: u32,
    pub subject_category: SubjectCategory,
    pub scholarship_category: ScholarshipCategory,
    pub degree: Degree,
    #[serde(default)]
    pub tuition_fees: Option<f64>,
    pub application_fees: f64,
    pub service_charge: f64,
    pub application_deadline: NaiveDate,
    pub post_date: NaiveDate,
    #[serde(default)]
    pub posted_by: Option<String>,
    /// Average review rating, when the backend has computed one.
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Scholarship {
    pub fn total_cost(&self) -> f64 {
        self.application_fees + self.service_charge
    }

    /// Application fee in the smallest currency unit.
    pub fn application_fee_cents(&self) -> i64 {
        (self.application_fees * 100.0).round() as i64
    }

    pub fn deadline_passed(&self, today: NaiveDate) -> bool {
        self.application_deadline < today
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewScholarship {
    #[validate(length(min = 1, message = "Required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Required"))]
    pub university_name: String,
    #[serde(rename = "logoURL")]
    #[validate(url(message = "Upload required"))]
    pub logo_url: String,
    #[validate(length(min = 1, message = "Required"))]
    pub country: String,
    #[validate(length(min = 1, message = "Required"))]
    pub city: String,
    #[validate(range(min = 1, message = "Rank must be at least 1"))]
    pub world_rank: u32,
    pub subject_category: SubjectCategory,
    pub scholarship_category: ScholarshipCategory,
    pub degree: Degree,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Fees cannot be negative"))]
    pub tuition_fees: Option<f64>,
    #[validate(range(min = 0.0, message = "Fees cannot be negative"))]
    pub application_fees: f64,
    #[validate(range(min = 0.0, message = "Fees cannot be negative"))]
    pub service_charge: f64,
    pub application_deadline: NaiveDate,
    pub post_date: NaiveDate,
    #[validate(email(message = "Enter a valid email"))]
    pub posted_by: String,
}

/// Partial update sent by the manage-scholarship forms.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Required"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Required"))]
    pub university_name: Option<String>,
    #[serde(rename = "logoURL", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_category: Option<SubjectCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarship_category: Option<ScholarshipCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<Degree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuition_fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Fees cannot be negative"))]
    pub application_fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Fees cannot be negative"))]
    pub service_charge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
}
