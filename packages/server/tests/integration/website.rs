use chrono::{Duration, Utc};
use common::Category;
use common::repository::Field;

use crate::common::{ASSET_BASE, TestApp, image_part, names, routes, submission_form};

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_all_categories_in_partition_order() {
        let app = TestApp::spawn().await;
        let now = Utc::now();
        app.seed("Ledger", Category::Business, "u1", now).await;
        app.seed("Old Chess", Category::Games, "u1", now - Duration::hours(2))
            .await;
        app.seed("New Chess", Category::Games, "u1", now - Duration::hours(1))
            .await;
        app.seed("Grep", Category::Tools, "u2", now).await;

        let res = app.get(routes::WEBSITES, None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res.body), ["New Chess", "Old Chess", "Grep", "Ledger"]);
    }

    #[tokio::test]
    async fn filters_by_category_and_time() {
        let app = TestApp::spawn().await;
        let now = Utc::now();
        app.seed("Fresh Game", Category::Games, "u1", now - Duration::days(2))
            .await;
        app.seed("Stale Game", Category::Games, "u1", now - Duration::days(10))
            .await;
        app.seed("Fresh Tool", Category::Tools, "u1", now - Duration::days(1))
            .await;

        let res = app
            .get(&format!("{}?category=games&time=week", routes::WEBSITES), None)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res.body), ["Fresh Game"]);

        let res = app
            .get(&format!("{}?category=all&time=all", routes::WEBSITES), None)
            .await;
        assert_eq!(names(&res.body).len(), 3);
    }

    #[tokio::test]
    async fn unknown_filters_are_validation_errors() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?category=music", routes::WEBSITES), None)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .get(&format!("{}?time=decade", routes::WEBSITES), None)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn own_listing_only_shows_the_callers_websites() {
        let app = TestApp::spawn().await;
        let token = app.sign_up("ada@example.com").await;
        let me = app.get(routes::ME, Some(&token)).await;
        let uid = me.body["uid"].as_str().unwrap().to_string();

        let now = Utc::now();
        app.seed("Mine Game", Category::Games, &uid, now).await;
        app.seed("Mine Tool", Category::Tools, &uid, now).await;
        app.seed("Theirs", Category::Games, "someone-else", now).await;

        let res = app.get(routes::MY_WEBSITES, Some(&token)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res.body), ["Mine Game", "Mine Tool"]);

        let res = app
            .get(&format!("{}?category=tools", routes::MY_WEBSITES), Some(&token))
            .await;
        assert_eq!(names(&res.body), ["Mine Tool"]);

        let res = app.get(routes::MY_WEBSITES, None).await;
        assert_eq!(res.status, 401);
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn finds_website_by_unique_name() {
        let app = TestApp::spawn().await;
        let seeded = app
            .seed("Lesson Plan", Category::Education, "u1", Utc::now())
            .await;

        let res = app.get(&routes::website(&seeded.unique_name), None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Lesson Plan");
        assert_eq!(res.body["category"], "education");
        assert_eq!(res.body["id"], seeded.id.as_str());
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::website("nothing-here-1"), None).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod submission {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_submit() {
        let app = TestApp::spawn().await;
        let token = app.sign_up("ada@example.com").await;

        let res = app
            .post_multipart(routes::WEBSITES, submission_form("Pixel Quest", "games"), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let unique_name = res.body["unique_name"].as_str().unwrap().to_string();
        assert!(unique_name.starts_with("pixel-quest-"));
        assert_eq!(res.body["status"], "pending");
        assert_eq!(res.body["monetization"], "Freemium");
        assert_eq!(
            res.body["icon"],
            format!("{ASSET_BASE}/main/websites/{unique_name}/icon/icon.png")
        );
        assert_eq!(res.body["images"].as_array().unwrap().len(), 2);
        assert_eq!(app.assets.len().await, 3);

        let found = app
            .repository
            .fetch_by_key(Field::UniqueName, &unique_name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.partition, Category::Games);

        let res = app.get(&routes::website(&unique_name), None).await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn submission_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::WEBSITES))
            .multipart(submission_form("Pixel Quest", "games"))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 401);
        assert!(app.assets.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.sign_up("ada@example.com").await;

        let res = app
            .post_multipart(routes::WEBSITES, submission_form("Pixel Quest", "music"), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(app.assets.is_empty().await);
    }

    #[tokio::test]
    async fn second_icon_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.sign_up("ada@example.com").await;

        let form = submission_form("Pixel Quest", "games").part("icon", image_part("other.png"));
        let res = app.post_multipart(routes::WEBSITES, form, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Only one icon is allowed");
    }

    #[tokio::test]
    async fn submission_without_screenshots_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.sign_up("ada@example.com").await;

        let form = reqwest::multipart::Form::new()
            .text("name", "Pixel Quest")
            .text("description", "A tiny platformer")
            .text("link", "https://pixel.example")
            .text("category", "games")
            .text("developer_name", "Ada")
            .text("developer_email", "ada@example.com")
            .part("icon", image_part("icon.png"));
        let res = app.post_multipart(routes::WEBSITES, form, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "At least one screenshot is required");
        assert!(app.assets.is_empty().await);
        assert!(app.repository.fetch_all(None).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI, None).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["info"]["title"], "Website Directory API");
    assert!(res.body["paths"]["/api/v1/websites/{unique_name}"].is_object());
}
