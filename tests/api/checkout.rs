use chrono::NaiveDate;
use claim::{assert_err, assert_ok};
use scholarship_hub::dashboard::PaymentConfirmation;
use scholarship_hub::models::{ApplicantDetails, Degree};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{scholarship_json, spawn_portal};

fn details() -> ApplicantDetails {
    ApplicantDetails {
        phone: "+81 90 1234 5678".into(),
        photo_url: "https://images.example.com/ada.png".into(),
        address: "1 Campus Road".into(),
        gender: "female".into(),
        applying_degree: Degree::Masters,
        ssc_result: "5.00".into(),
        hsc_result: "5.00".into(),
        study_gap: None,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[tokio::test]
async fn checkout_submits_pays_and_marks_the_application_paid() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;

    app.mount_json("GET", "/scholarships/s1", scholarship_json("s1", 20.0))
        .await;
    Mock::given(method("POST"))
        .and(path("/applications"))
        .and(body_partial_json(json!({
            "scholarshipId": "s1",
            "userEmail": "ada@example.com",
            "application_status": "pending",
            "payment_status": "pending"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "insertedId": "a9" })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/create-payment-intent"))
        .and(body_partial_json(json!({ "amountInCents": 2000, "scholarshipId": "s1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "clientSecret": "pi_secret" })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/payments"))
        .and(body_partial_json(json!({ "transactionId": "tx_1", "applicationId": "a9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "insertedId": "p1" })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a9"))
        .and(body_partial_json(json!({ "payment_status": "paid" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "modifiedCount": 1 })))
        .expect(1)
        .mount(&app.server)
        .await;

    let checkout = app.portal.checkout();
    let pending = assert_ok!(
        checkout
            .begin("s1", details(), "ada@example.com", Some("Ada".into()), today())
            .await
    );
    assert_eq!(pending.client_secret, "pi_secret");
    assert_eq!(pending.application_id, "a9");
    assert_eq!(pending.publishable_key, "pk_test");

    let confirmation = PaymentConfirmation {
        transaction_id: "tx_1".into(),
        payment_method: vec!["card".into()],
    };
    assert_ok!(checkout.complete(&pending, confirmation).await);
}

#[tokio::test]
async fn closed_scholarships_cannot_be_applied_for() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;
    let mut closed = scholarship_json("s2", 20.0);
    closed["applicationDeadline"] = json!("2024-01-31");
    app.mount_json("GET", "/scholarships/s2", closed).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let error = assert_err!(
        app.portal
            .checkout()
            .begin("s2", details(), "ada@example.com", None, today())
            .await
    );
    assert_eq!(error.message(), "The application deadline has passed");
}
