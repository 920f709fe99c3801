use crate::core::{ApiClient, AppError};
use crate::models::{PaymentIntent, PaymentIntentRequest, PaymentRecord, Scholarship, WriteResult};

pub struct PaymentsApi {
    client: ApiClient,
}

impl PaymentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[tracing::instrument(name = "Create payment intent", skip(self, scholarship), fields(scholarship_id = %scholarship.id))]
    pub async fn create_intent(&self, scholarship: &Scholarship) -> Result<PaymentIntent, AppError> {
        let request = PaymentIntentRequest {
            amount_in_cents: scholarship.application_fee_cents(),
            scholarship_id: scholarship.id.clone(),
        };
        if request.amount_in_cents <= 0 {
            return Err(AppError::validation_error("Nothing to pay for this scholarship"));
        }
        self.client.post("/create-payment-intent", &request).await
    }

    #[tracing::instrument(name = "Record payment", skip(self, record), fields(transaction_id = %record.transaction_id))]
    pub async fn record(&self, record: &PaymentRecord) -> Result<WriteResult, AppError> {
        self.client.post("/payments", record).await
    }
}
