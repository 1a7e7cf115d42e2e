use chrono::{Duration, Utc};
use common::Category;

use crate::common::{TestApp, names, routes};

#[tokio::test]
async fn admin_sees_every_submission() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let now = Utc::now();
    app.seed("Chess", Category::Games, "u1", now).await;
    app.seed("Ledger", Category::Business, "u2", now - Duration::days(40))
        .await;

    let res = app.get(routes::ADMIN_WEBSITES, Some(&admin)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(names(&res.body), ["Chess", "Ledger"]);

    let res = app
        .get(&format!("{}?time=week", routes::ADMIN_WEBSITES), Some(&admin))
        .await;
    assert_eq!(names(&res.body), ["Chess"]);
}

#[tokio::test]
async fn regular_users_are_forbidden() {
    let app = TestApp::spawn().await;
    let user = app.sign_up("ada@example.com").await;

    let res = app.get(routes::ADMIN_WEBSITES, Some(&user)).await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");

    let res = app.get(routes::ADMIN_WEBSITES, None).await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn asset_access_check_reports_store_visibility() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let res = app.get(routes::ADMIN_ASSET_ACCESS, Some(&admin)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["accessible"], true);
}
