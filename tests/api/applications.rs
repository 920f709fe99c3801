use claim::{assert_err, assert_ok};
use scholarship_hub::api::applications::mine_key;
use scholarship_hub::dashboard::ReviewDecision;
use scholarship_hub::models::{Application, ApplicationPatch};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{application_json, spawn_portal, TestPortal};

const EMAIL: &str = "ada@example.com";
const MINE: &str = "/applications/user/ada%40example.com";

async fn signed_in_with_applications() -> (TestPortal, Vec<Application>) {
    let app = spawn_portal().await;
    app.sign_in(EMAIL).await;
    Mock::given(method("GET"))
        .and(path(MINE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            application_json("a1", EMAIL, "pending"),
            application_json("a2", EMAIL, "processing"),
        ])))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    let applications = app.portal.applications.list_mine(EMAIL).await.unwrap();
    (app, applications)
}

async fn cached_ids(app: &TestPortal) -> Vec<String> {
    app.portal
        .cache
        .get_data::<Vec<Application>>(&mine_key(EMAIL))
        .await
        .unwrap()
        .unwrap_or_default()
        .into_iter()
        .map(|a| a.id)
        .collect()
}

#[tokio::test]
async fn deleted_application_is_gone_after_refetch() {
    let (app, applications) = signed_in_with_applications().await;
    app.mount_json("DELETE", "/applications/a1", json!({ "deletedCount": 1 }))
        .await;
    app.mount_json(
        "GET",
        MINE,
        json!([application_json("a2", EMAIL, "processing")]),
    )
    .await;

    assert_ok!(app.portal.applications.delete(&applications[0]).await);
    assert_eq!(cached_ids(&app).await, vec!["a2"]);
    assert!(!app.portal.cache.is_fresh(&mine_key(EMAIL)).await);

    let refetched = app.portal.applications.list_mine(EMAIL).await.unwrap();
    assert!(refetched.iter().all(|a| a.id != "a1"));
}

#[tokio::test]
async fn failed_delete_puts_the_application_back() {
    let (app, applications) = signed_in_with_applications().await;
    Mock::given(method("DELETE"))
        .and(path("/applications/a1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    assert_err!(app.portal.applications.delete(&applications[0]).await);
    assert_eq!(cached_ids(&app).await, vec!["a1", "a2"]);
}

#[tokio::test]
async fn applications_under_review_cannot_be_deleted() {
    let (app, applications) = signed_in_with_applications().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    assert_err!(app.portal.applications.delete(&applications[1]).await);
}

#[tokio::test]
async fn pending_application_can_be_cancelled() {
    let (app, applications) = signed_in_with_applications().await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1"))
        .and(body_partial_json(json!({ "application_status": "rejected" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "modifiedCount": 1 })))
        .expect(1)
        .mount(&app.server)
        .await;

    assert_ok!(app.portal.workflow().cancel(&applications[0]).await);
    assert!(!app.portal.cache.is_fresh(&mine_key(EMAIL)).await);
}

#[tokio::test]
async fn editing_is_blocked_once_processing_starts() {
    let (app, applications) = signed_in_with_applications().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let changes = ApplicationPatch {
        address: Some("12 New Street".into()),
        ..Default::default()
    };
    let error = assert_err!(app.portal.workflow().edit(&applications[1], changes).await);
    assert_eq!(error.message(), "Cannot edit: processing in progress");
}

#[tokio::test]
async fn edits_never_change_status_or_payment() {
    let (app, applications) = signed_in_with_applications().await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1"))
        .and(body_partial_json(json!({ "address": "12 New Street" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "modifiedCount": 1 })))
        .expect(1)
        .mount(&app.server)
        .await;

    let changes = ApplicationPatch {
        address: Some("12 New Street".into()),
        status: Some(scholarship_hub::models::ApplicationStatus::Completed),
        ..Default::default()
    };
    assert_ok!(app.portal.workflow().edit(&applications[0], changes).await);

    let requests = app.server.received_requests().await.unwrap();
    let patch = requests.iter().find(|r| r.method.to_string() == "PATCH").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&patch.body).unwrap();
    assert!(body.get("application_status").is_none());
}

#[tokio::test]
async fn moderator_feedback_moves_the_application_to_processing() {
    let (app, applications) = signed_in_with_applications().await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1"))
        .and(body_partial_json(json!({
            "application_status": "processing",
            "feedback": "Upload your transcript"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "modifiedCount": 1 })))
        .expect(1)
        .mount(&app.server)
        .await;

    assert_ok!(
        app.portal
            .workflow()
            .review(
                &applications[0],
                ReviewDecision::Feedback("Upload your transcript".into())
            )
            .await
    );
}
