use claim::{assert_err, assert_none, assert_ok};
use scholarship_hub::routing::Location;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{scholarship_json, spawn_portal, TEST_TOKEN};

#[tokio::test]
async fn signed_out_requests_carry_no_authorization_header() {
    let app = spawn_portal().await;
    app.mount_json("GET", "/scholarships", json!([scholarship_json("s1", 20.0)]))
        .await;
    app.mount_json("GET", "/applications/all", json!([])).await;

    assert_ok!(app.portal.scholarships.list().await);
    assert_ok!(app.portal.applications.list_all().await);

    let requests = app.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert!(
            !request
                .headers
                .iter()
                .any(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization")),
            "{} sent a token",
            request.url
        );
    }
}

#[tokio::test]
async fn signed_in_requests_carry_the_id_token() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;

    Mock::given(method("GET"))
        .and(path("/applications/all"))
        .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    assert_ok!(app.portal.applications.list_all().await);
}

#[tokio::test]
async fn unauthorized_response_signs_out_and_redirects_to_login() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;
    app.portal
        .navigator
        .navigate(Location::new("/dashboard/applications"));

    Mock::given(method("GET"))
        .and(path("/applications/user/ada%40example.com"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;

    let error = assert_err!(app.portal.applications.list_mine("ada@example.com").await);
    assert!(error.is_unauthorized());
    assert_none!(app.portal.auth.current().await);
    assert_eq!(
        app.portal.navigator.current(),
        Location::login(Some("/dashboard/applications"))
    );
}

#[tokio::test]
async fn forbidden_response_redirects_but_keeps_the_session() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;
    app.portal.navigator.navigate(Location::new("/dashboard/manageUsers"));

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "forbidden access" })),
        )
        .mount(&app.server)
        .await;

    let error = assert_err!(app.portal.users.list().await);
    assert!(error.is_forbidden());
    assert!(app.portal.auth.current().await.is_some());
    assert_eq!(app.portal.navigator.current().path, "/forbidden");
}

#[tokio::test]
async fn public_failures_do_not_touch_the_session() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;

    Mock::given(method("GET"))
        .and(path("/scholarships"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;

    assert_err!(app.portal.scholarships.list().await);
    assert!(app.portal.auth.current().await.is_some());
}

#[tokio::test]
async fn uploads_send_the_api_key_and_return_the_display_url() {
    let app = spawn_portal().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(wiremock::matchers::query_param("key", "upload-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "display_url": "https://images.example.com/logo.png" }
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let url = assert_ok!(app.portal.uploader.upload("logo.png", vec![1, 2, 3]).await);
    assert_eq!(url, "https://images.example.com/logo.png");
}
