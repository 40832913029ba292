use actix_web::test;
use serde_json::Value;

use crate::support::{create_test_app, TestRealm};

#[actix_web::test]
async fn root_reports_the_version() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let app = create_test_app(realm.state.clone()).build().await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert_eq!(body, format!("gatehouse {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[actix_web::test]
async fn health_lists_guards_in_declaration_order() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::with_vars(&[
        ("AUTH_GUARDS", "admin,user"),
        ("AUTH_DEFAULT_GUARD", "user"),
    ]);
    let app = create_test_app(realm.state.clone()).build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["guards"], serde_json::json!(["admin", "user"]));
    Ok(())
}

#[actix_web::test]
async fn health_is_outside_the_gate() -> Result<(), Box<dyn std::error::Error>> {
    let realm = TestRealm::new();
    let app = create_test_app(realm.state.clone()).build().await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}
