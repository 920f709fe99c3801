use scholarship_hub::routing::{Location, NavigationOutcome, Page};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::spawn_portal;

#[tokio::test]
async fn visitors_are_sent_to_login_with_the_requested_path() {
    let app = spawn_portal().await;

    let outcome = app.portal.open("/scholarships/123").await;

    let expected = Location::login(Some("/scholarships/123"));
    assert_eq!(outcome, NavigationOutcome::Redirect(expected.clone()));
    assert_eq!(app.portal.navigator.current(), expected);
}

#[tokio::test]
async fn signing_in_returns_to_the_interrupted_page() {
    let app = spawn_portal().await;
    app.portal.open("/scholarships/123").await;

    app.sign_in("ada@example.com").await;

    assert_eq!(app.portal.navigator.current(), Location::new("/scholarships/123"));
    match app.portal.open("/scholarships/123").await {
        NavigationOutcome::Render(route) => {
            assert_eq!(route.page, Page::ScholarshipDetails);
            assert_eq!(route.params.get("id").map(String::as_str), Some("123"));
        }
        other => panic!("expected the details page, got {:?}", other),
    }
}

#[tokio::test]
async fn plain_users_are_forbidden_from_admin_pages() {
    let app = spawn_portal().await;
    app.mount_role("user").await;
    app.sign_in("ada@example.com").await;

    let outcome = app.portal.open("/dashboard/manageUsers").await;

    assert_eq!(
        outcome,
        NavigationOutcome::Redirect(Location::forbidden(Some("/dashboard/manageUsers")))
    );
}

#[tokio::test]
async fn admins_reach_admin_and_moderator_pages() {
    let app = spawn_portal().await;
    app.mount_role("admin").await;
    app.sign_in("root@example.com").await;

    for (route, page) in [
        ("/dashboard/manageUsers", Page::ManageUsers),
        ("/dashboard/allReviews", Page::AllReviews),
        ("/dashboard", Page::AdminDashboard),
    ] {
        match app.portal.open(route).await {
            NavigationOutcome::Render(rendered) => assert_eq!(rendered.page, page),
            other => panic!("{} did not render: {:?}", route, other),
        }
    }
}

#[tokio::test]
async fn role_is_looked_up_once_per_session() {
    let app = spawn_portal().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/users/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "moderator" })))
        .expect(1)
        .mount(&app.server)
        .await;
    app.sign_in("mod@example.com").await;

    for _ in 0..3 {
        assert!(matches!(
            app.portal.open("/dashboard/manageScholarships").await,
            NavigationOutcome::Render(_)
        ));
    }
}

#[tokio::test]
async fn failed_role_lookup_fails_closed() {
    let app = spawn_portal().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/users/[^/]+$"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;
    app.sign_in("mod@example.com").await;

    let outcome = app.portal.open("/dashboard/allReviews").await;
    assert!(matches!(outcome, NavigationOutcome::Redirect(l) if l.path == "/forbidden"));
}

#[tokio::test]
async fn unknown_roles_get_no_dashboard() {
    let app = spawn_portal().await;
    app.mount_role("superuser").await;
    app.sign_in("odd@example.com").await;

    let outcome = app.portal.open("/dashboard").await;
    assert!(matches!(outcome, NavigationOutcome::Redirect(l) if l.path == "/forbidden"));
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let app = spawn_portal().await;
    assert_eq!(app.portal.open("/nowhere").await, NavigationOutcome::NotFound);
}

#[tokio::test]
async fn next_session_looks_up_its_own_role() {
    let app = spawn_portal().await;
    Mock::given(method("GET"))
        .and(path("/users/mod%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "moderator" })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/plain%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "user" })))
        .expect(1)
        .mount(&app.server)
        .await;

    app.sign_in("mod@example.com").await;
    assert!(matches!(
        app.portal.open("/dashboard/allReviews").await,
        NavigationOutcome::Render(_)
    ));

    app.portal.sign_out().await;
    app.sign_in("plain@example.com").await;

    assert_eq!(
        app.portal.open("/dashboard/allReviews").await,
        NavigationOutcome::Redirect(Location::forbidden(Some("/dashboard/allReviews")))
    );
}
