use serde_json::json;

use crate::common::{ADMIN_EMAIL, TestApp, routes};

mod signup {
    use super::*;

    #[tokio::test]
    async fn new_user_can_sign_up() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::SIGNUP,
                &json!({
                    "email": "ada@example.com",
                    "password": "secret1",
                    "confirm_password": "secret1"
                }),
                None,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["user"]["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn mismatched_confirmation_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::SIGNUP,
                &json!({
                    "email": "ada@example.com",
                    "password": "secret1",
                    "confirm_password": "secret2"
                }),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Passwords do not match");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::SIGNUP,
                &json!({
                    "email": "ada@example.com",
                    "password": "abc",
                    "confirm_password": "abc"
                }),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn taken_email_is_rejected() {
        let app = TestApp::spawn().await;
        app.sign_up("ada@example.com").await;

        let res = app
            .post_json(
                routes::SIGNUP,
                &json!({
                    "email": "ada@example.com",
                    "password": "secret1",
                    "confirm_password": "secret1"
                }),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::SIGNUP, &json!({"email": "ada@example.com"}), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_log_in() {
        let app = TestApp::spawn().await;
        app.sign_up("ada@example.com").await;

        let res = app
            .post_json(
                routes::LOGIN,
                &json!({"email": "ada@example.com", "password": "secret1"}),
                None,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].is_string());
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let app = TestApp::spawn().await;
        app.sign_up("ada@example.com").await;

        let res = app
            .post_json(
                routes::LOGIN,
                &json!({"email": "ada@example.com", "password": "wrong!"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_identity_and_admin_flag() {
        let app = TestApp::spawn().await;
        let user = app.sign_up("ada@example.com").await;
        let admin = app.admin_token().await;

        let res = app.get(routes::ME, Some(&user)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["email"], "ada@example.com");
        assert_eq!(res.body["is_admin"], false);

        let res = app.get(routes::ME, Some(&admin)).await;
        assert_eq!(res.body["email"], ADMIN_EMAIL);
        assert_eq!(res.body["is_admin"], true);
    }

    #[tokio::test]
    async fn missing_or_unknown_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, None).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let res = app.get(routes::ME, Some("forged")).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn logout_ends_the_session() {
        let app = TestApp::spawn().await;
        let token = app.sign_up("ada@example.com").await;

        let res = app.post_json(routes::LOGOUT, &json!({}), Some(&token)).await;
        assert_eq!(res.status, 204);

        let res = app.get(routes::ME, Some(&token)).await;
        assert_eq!(res.status, 401);
    }
}
