use gatehouse::PrincipalStatus;

use crate::common::{assert_not_authorized, assert_problem_details};
use crate::support::auth::{login, login_token, post_with_token};
use crate::support::{create_test_app, TestRealm};

#[actix_web::test]
async fn active_principal_passes_the_gate() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let token = login_token(&app, "user", &user).await;

    for _ in 0..3 {
        let resp = post_with_token(&app, "/api/v1/user/profile", Some(&token)).await;
        assert_eq!(resp.status().as_u16(), 200);
    }
    assert_eq!(realm.revoked_tokens(), 0);
    Ok(())
}

#[actix_web::test]
async fn deactivated_user_is_logged_out_and_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let token = login_token(&app, "user", &user).await;

    realm.deactivate_user(&user);

    let resp = post_with_token(&app, "/api/v1/user/profile", Some(&token)).await;
    assert_not_authorized(resp).await;
    assert_eq!(realm.revoked_tokens(), 1);

    // The forced logout sticks: the token is now simply revoked
    let resp = post_with_token(&app, "/api/v1/user/profile", Some(&token)).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_REVOKED_JWT").await;
    Ok(())
}

#[actix_web::test]
async fn deactivated_admin_is_rejected_in_admin_scope() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let admin = realm.add_admin(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let token = login_token(&app, "admin", &admin).await;

    realm.deactivate_admin(&admin);

    let resp = post_with_token(&app, "/api/v1/admin/refresh", Some(&token)).await;
    assert_not_authorized(resp).await;
    assert_eq!(realm.revoked_tokens(), 1);
    Ok(())
}

#[actix_web::test]
async fn gate_checks_every_guard_not_just_the_bound_one() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let token = login_token(&app, "user", &user).await;

    realm.deactivate_user(&user);

    // Admin scope binds `admin`, yet the inactive `user` token is still caught
    let resp = post_with_token(&app, "/api/v1/admin/profile", Some(&token)).await;
    assert_not_authorized(resp).await;
    assert_eq!(realm.revoked_tokens(), 1);
    Ok(())
}

#[actix_web::test]
async fn gate_runs_before_login_handlers() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let other = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;
    let token = login_token(&app, "user", &user).await;

    realm.deactivate_user(&user);

    let req = actix_web::test::TestRequest::post()
        .uri("/api/v1/user/login")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(serde_json::json!({"email": &other.email, "password": &other.password}))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_not_authorized(resp).await;

    // Without the stale token the same login succeeds
    let resp = login(&app, "user", &other.email, &other.password).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}

#[actix_web::test]
async fn anonymous_requests_pass_the_gate() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let user = realm.add_user(PrincipalStatus::Active);
    let app = create_test_app(realm.state.clone()).build().await;

    let resp = login(&app, "user", &user.email, &user.password).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(realm.revoked_tokens(), 0);
    Ok(())
}
