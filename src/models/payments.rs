use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    pub amount_in_cents: i64,
    pub scholarship_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// Payment already confirmed by the processor, recorded for history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub scholarship_id: String,
    #[serde(default)]
    pub application_id: Option<String>,
    pub email: String,
    pub amount: f64,
    pub transaction_id: String,
    pub payment_method: Vec<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}
