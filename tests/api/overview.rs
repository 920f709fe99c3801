use serde_json::json;

use crate::helpers::{application_json, scholarship_json, spawn_portal, TestPortal};

async fn mount_collections(app: &TestPortal) {
    app.mount_json(
        "GET",
        "/scholarships",
        json!([scholarship_json("s1", 20.0), scholarship_json("s2", 0.0)]),
    )
    .await;
    app.mount_json(
        "GET",
        "/applications",
        json!([
            application_json("a1", "ada@example.com", "pending"),
            application_json("a2", "bo@example.com", "completed"),
            application_json("a3", "cy@example.com", "pending")
        ]),
    )
    .await;
    app.mount_json(
        "GET",
        "/reviews/all",
        json!([{
            "_id": "r1",
            "scholarshipId": "s1",
            "reviewerEmail": "ada@example.com",
            "rating": 5,
            "comment": "Great support",
            "date": "2024-04-01T09:00:00Z"
        }]),
    )
    .await;
}

#[tokio::test]
async fn admin_report_counts_users() {
    let app = spawn_portal().await;
    app.sign_in("root@example.com").await;
    mount_collections(&app).await;
    app.mount_json(
        "GET",
        "/users",
        json!([
            { "_id": "u1", "email": "root@example.com", "role": "admin" },
            { "_id": "u2", "email": "ada@example.com", "role": "user" },
            { "_id": "u3", "email": "bo@example.com", "role": "user" },
            { "_id": "u4", "email": "cy@example.com", "role": "moderator" }
        ]),
    )
    .await;

    let report = app.portal.analytics().admin_report().await.unwrap();

    assert_eq!(report.total_users, Some(4));
    assert_eq!(report.total_scholarships, 2);
    assert_eq!(report.total_applications, 3);
    assert_eq!(report.total_reviews, 1);
}

#[tokio::test]
async fn moderator_report_skips_the_user_list() {
    let app = spawn_portal().await;
    app.sign_in("mod@example.com").await;
    mount_collections(&app).await;

    let report = app.portal.analytics().portal_report().await.unwrap();

    assert_eq!(report.total_users, None);
    assert_eq!(report.total_applications, 3);
}
