use actix_web::test;
use gatehouse::routes::auth::TokenResponse;
use gatehouse::PrincipalStatus;
use serde_json::Value;

use crate::common::assert_problem_details;
use crate::support::auth::{expired_token, login_token, post_with_token};
use crate::support::{create_test_app, TestRealm};

#[actix_web::test]
async fn profile_returns_the_authenticated_principal() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let token = login_token(&app, "user", &user).await;

    let resp = post_with_token(&app, "/api/v1/user/profile", Some(&token)).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.id);
    assert_eq!(body["email"], user.email.as_str());
    assert_eq!(body["status"], "A");
    assert!(body.get("password").is_none());
    Ok(())
}

#[actix_web::test]
async fn missing_or_malformed_bearer_is_unauthorized() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = post_with_token(&app, "/api/v1/user/profile", None).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/user/profile")
        .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;
    Ok(())
}

#[actix_web::test]
async fn garbage_and_expired_tokens_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = post_with_token(&app, "/api/v1/user/profile", Some("not.a.jwt")).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;

    let expired = expired_token(&realm, "user", user.id);
    let resp = post_with_token(&app, "/api/v1/user/profile", Some(&expired)).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_EXPIRED_JWT").await;
    Ok(())
}

#[actix_web::test]
async fn tokens_only_open_their_own_realm() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let admin = realm.add_admin(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;

    let user_token = login_token(&app, "user", &user).await;
    let admin_token = login_token(&app, "admin", &admin).await;

    let resp = post_with_token(&app, "/api/v1/admin/profile", Some(&user_token)).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;

    let resp = post_with_token(&app, "/api/v1/user/profile", Some(&admin_token)).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;

    let resp = post_with_token(&app, "/api/v1/admin/profile", Some(&admin_token)).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], admin.id);
    Ok(())
}

#[actix_web::test]
async fn logout_revokes_the_token() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let token = login_token(&app, "user", &user).await;

    let resp = post_with_token(&app, "/api/v1/user/logout", Some(&token)).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Successfully logged out");
    assert_eq!(realm.revoked_tokens(), 1);

    let resp = post_with_token(&app, "/api/v1/user/profile", Some(&token)).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_REVOKED_JWT").await;
    Ok(())
}

#[actix_web::test]
async fn refresh_rotates_the_token() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let admin = realm.add_admin(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let old_token = login_token(&app, "admin", &admin).await;

    let resp = post_with_token(&app, "/api/v1/admin/refresh", Some(&old_token)).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: TokenResponse = test::read_body_json(resp).await;
    assert_ne!(body.access_token, old_token);

    let resp = post_with_token(&app, "/api/v1/admin/profile", Some(&old_token)).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_REVOKED_JWT").await;

    let resp = post_with_token(&app, "/api/v1/admin/profile", Some(&body.access_token)).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}
