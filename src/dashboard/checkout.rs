use chrono::{NaiveDate, Utc};
use secrecy::ExposeSecret;
use validator::Validate;

use crate::api::{ApplicationsApi, PaymentsApi, ScholarshipsApi};
use crate::core::config::PaymentConfig;
use crate::core::AppError;
use crate::models::{
    ApplicantDetails, ApplicationPatch, NewApplication, PaymentRecord, PaymentStatus, Scholarship,
    WriteResult,
};

/// An application waiting for its fee to be paid.
#[derive(Debug, Clone)]
pub struct PendingCheckout {
    pub scholarship: Scholarship,
    pub application_id: String,
    pub applicant_email: String,
    /// Handed to the payment processor's client with the publishable key.
    pub client_secret: String,
    pub publishable_key: String,
    pub currency: String,
}

/// Confirmation from the payment processor.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub transaction_id: String,
    pub payment_method: Vec<String>,
}

pub struct Checkout<'a> {
    scholarships: &'a ScholarshipsApi,
    applications: &'a ApplicationsApi,
    payments: &'a PaymentsApi,
    processor: &'a PaymentConfig,
}

impl<'a> Checkout<'a> {
    pub fn new(
        scholarships: &'a ScholarshipsApi,
        applications: &'a ApplicationsApi,
        payments: &'a PaymentsApi,
        processor: &'a PaymentConfig,
    ) -> Self {
        Self {
            scholarships,
            applications,
            payments,
            processor,
        }
    }

    /// Submit the application and open a payment intent for its fee.
    #[tracing::instrument(name = "Begin checkout", skip(self, details, applicant_name))]
    pub async fn begin(
        &self,
        scholarship_id: &str,
        details: ApplicantDetails,
        applicant_email: &str,
        applicant_name: Option<String>,
        today: NaiveDate,
    ) -> Result<PendingCheckout, AppError> {
        details.validate()?;
        let scholarship = self.scholarships.get(scholarship_id).await?;
        if scholarship.deadline_passed(today) {
            return Err(AppError::validation_error("The application deadline has passed"));
        }

        let application =
            NewApplication::for_scholarship(&scholarship, details, applicant_email, applicant_name);
        let submitted = self.applications.submit(&application).await?;
        let application_id = submitted
            .inserted_id
            .ok_or_else(|| AppError::validation_error("Failed to save application"))?;

        let intent = self.payments.create_intent(&scholarship).await?;
        tracing::info!(application_id = %application_id, "application submitted, awaiting payment");

        Ok(PendingCheckout {
            scholarship,
            application_id,
            applicant_email: applicant_email.to_string(),
            client_secret: intent.client_secret,
            publishable_key: self.processor.publishable_key.expose_secret().clone(),
            currency: self.processor.currency.clone(),
        })
    }

    /// Record the processor's confirmation and mark the application paid.
    #[tracing::instrument(name = "Complete checkout", skip(self, pending, confirmation), fields(application_id = %pending.application_id))]
    pub async fn complete(
        &self,
        pending: &PendingCheckout,
        confirmation: PaymentConfirmation,
    ) -> Result<WriteResult, AppError> {
        let record = PaymentRecord {
            scholarship_id: pending.scholarship.id.clone(),
            application_id: Some(pending.application_id.clone()),
            email: pending.applicant_email.clone(),
            amount: pending.scholarship.application_fees,
            transaction_id: confirmation.transaction_id,
            payment_method: confirmation.payment_method,
            paid_at: Some(Utc::now()),
        };
        self.payments.record(&record).await?;

        let patch = ApplicationPatch {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        self.applications.patch(&pending.application_id, &patch).await
    }
}
