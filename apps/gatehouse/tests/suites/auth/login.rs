use actix_web::test;
use gatehouse::routes::auth::TokenResponse;
use gatehouse::PrincipalStatus;
use serde_json::json;

use crate::common::{assert_not_authorized, assert_problem_details};
use crate::support::auth::login;
use crate::support::{create_test_app, TestRealm};

#[actix_web::test]
async fn user_login_returns_bearer_token() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = login(&app, "user", &user.email, &user.password).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: TokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.token_type, "bearer");
    assert_eq!(body.expires_in, 3600);
    assert_eq!(body.access_token.split('.').count(), 3);
    Ok(())
}

#[actix_web::test]
async fn admin_login_reads_the_admin_provider() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let admin = realm.add_admin(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = login(&app, "admin", &admin.email, &admin.password).await;
    assert_eq!(resp.status().as_u16(), 200);

    // Users are not admins, and admins are not users
    let resp = login(&app, "admin", &user.email, &user.password).await;
    assert_problem_details(resp, 401, "INVALID_CREDENTIALS").await;
    let resp = login(&app, "user", &admin.email, &admin.password).await;
    assert_problem_details(resp, 401, "INVALID_CREDENTIALS").await;
    Ok(())
}

#[actix_web::test]
async fn wrong_password_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = login(&app, "user", &user.email, "not the password").await;
    let body = assert_problem_details(resp, 401, "INVALID_CREDENTIALS").await;
    assert_eq!(body["title"], "Invalid Credentials");
    Ok(())
}

#[actix_web::test]
async fn email_lookup_ignores_case() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = login(&app, "user", &user.email.to_uppercase(), &user.password).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}

#[actix_web::test]
async fn missing_fields_are_a_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let app = create_test_app(realm.state.clone()).build().await;

    for payload in [json!({}), json!({"email": "someone@example.test"}), json!({"email": " ", "password": "x"})] {
        let req = test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, 400, "INVALID_CREDENTIALS_PAYLOAD").await;
    }
    Ok(())
}

#[actix_web::test]
async fn inactive_principal_cannot_log_in() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Inactive);
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = login(&app, "user", &user.email, &user.password).await;
    assert_not_authorized(resp).await;
    Ok(())
}
