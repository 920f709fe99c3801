use claim::{assert_err, assert_ok};
use scholarship_hub::api::users::all_key;
use scholarship_hub::models::{Role, UserProfile};
use scholarship_hub::routing::NavigationOutcome;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::spawn_portal;

fn users_json() -> serde_json::Value {
    json!([
        { "_id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin" },
        { "_id": "u2", "name": "Bo", "email": "bo@example.com", "role": "user" }
    ])
}

#[tokio::test]
async fn role_change_is_visible_to_the_next_guard_check() {
    let app = spawn_portal().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/users/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "user" })))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    app.sign_in("bo@example.com").await;
    assert!(matches!(
        app.portal.open("/dashboard/allReviews").await,
        NavigationOutcome::Redirect(_)
    ));

    Mock::given(method("PATCH"))
        .and(path("/users/u2"))
        .and(body_json(json!({ "role": "moderator" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "modifiedCount": 1 })))
        .expect(1)
        .mount(&app.server)
        .await;
    app.mount_role("moderator").await;

    assert_ok!(app.portal.users.update_role("u2", Role::Moderator).await);
    assert!(matches!(
        app.portal.open("/dashboard/allReviews").await,
        NavigationOutcome::Render(_)
    ));
}

#[tokio::test]
async fn failed_user_delete_restores_the_list() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;
    app.mount_json("GET", "/users", users_json()).await;
    Mock::given(method("DELETE"))
        .and(path("/users/u2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    assert_eq!(app.portal.users.list().await.unwrap().len(), 2);
    assert_err!(app.portal.users.delete("u2").await);

    let cached: Vec<UserProfile> = app.portal.cache.get_data(&all_key()).await.unwrap().unwrap();
    assert_eq!(cached.len(), 2);
}

#[tokio::test]
async fn registration_creates_a_user_record_with_the_user_role() {
    let app = spawn_portal().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(wiremock::matchers::body_partial_json(json!({
            "email": "new@example.com",
            "name": "New Person",
            "role": "user"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "insertedId": "u9" })))
        .expect(1)
        .mount(&app.server)
        .await;

    let form = scholarship_hub::models::RegistrationForm {
        name: " New Person ".into(),
        email: "New@Example.com".into(),
        password: secrecy::Secret::new(crate::helpers::TEST_PASSWORD.into()),
        photo_url: "https://images.example.com/me.png".into(),
    };
    let user = assert_ok!(app.portal.register(&form).await);
    assert_eq!(user.email.as_deref(), Some("new@example.com"));
    assert_eq!(user.display_name.as_deref(), Some("New Person"));
}

#[tokio::test]
async fn invalid_registration_never_reaches_the_backend() {
    let app = spawn_portal().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let form = scholarship_hub::models::RegistrationForm {
        name: "Short".into(),
        email: "short@example.com".into(),
        password: secrecy::Secret::new("123".into()),
        photo_url: "https://images.example.com/me.png".into(),
    };
    let error = assert_err!(app.portal.register(&form).await);
    assert_eq!(error.message(), "password: Minimum 6 characters");
}

#[tokio::test]
async fn users_cannot_delete_someone_elses_review() {
    let app = spawn_portal().await;
    app.mount_role("user").await;
    app.sign_in("bo@example.com").await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let review: scholarship_hub::models::Review = serde_json::from_value(json!({
        "_id": "r1",
        "scholarshipId": "s1",
        "reviewerEmail": "ada@example.com",
        "rating": 5,
        "comment": "Great support",
        "date": "2024-05-01T08:00:00Z"
    }))
    .unwrap();

    let error = assert_err!(
        app.portal
            .delete_review(scholarship_hub::api::reviews::all_key(), &review)
            .await
    );
    assert!(error.is_forbidden());
}

#[tokio::test]
async fn data_fetched_before_sign_out_is_not_served_to_the_next_user() {
    let app = spawn_portal().await;
    app.sign_in("ada@example.com").await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "_id": "u1", "email": "secret@example.com", "role": "admin" }]))
                .set_delay(std::time::Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&app.server)
        .await;

    let switch_user = async {
        app.portal.sign_out().await;
        app.sign_in("plain@example.com").await;
    };
    let (admin_list, ()) = tokio::join!(app.portal.users.list(), switch_user);

    assert_eq!(assert_ok!(admin_list).len(), 1);
    assert_err!(app.portal.users.list().await);
}
