/// Integration tests for organisation membership and service endpoints

mod common;

use axum::http::StatusCode;
use common::TestContext;
use orgauth_shared::store::Store;
use serde_json::json;
use uuid::Uuid;

async fn first_org_id(ctx: &TestContext, token: &str) -> String {
    let response = ctx.get("/api/organisations", Some(token)).await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["data"]["organisations"][0]["orgId"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_list_shows_only_own_organisations() {
    let ctx = TestContext::new();
    let (_, jill) = ctx.register_session("Jill").await;
    ctx.register_session("Jack").await;

    let response = ctx.get("/api/organisations", Some(&jill)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "success");
    let organisations = response.body["data"]["organisations"].as_array().unwrap();
    assert_eq!(organisations.len(), 1);
    assert_eq!(organisations[0]["name"], "Jill's Organisation");
    assert!(organisations[0]["description"].is_null());
}

#[tokio::test]
async fn test_get_organisation() {
    let ctx = TestContext::new();
    let (_, token) = ctx.register_session("Jill").await;
    let org_id = first_org_id(&ctx, &token).await;

    // Readable without a session
    let response = ctx.get(&format!("/api/organisations/{}", org_id), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["orgId"], org_id.as_str());
    assert_eq!(response.body["data"]["name"], "Jill's Organisation");
}

#[tokio::test]
async fn test_unknown_organisation_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .get(&format!("/api/organisations/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({"status": "error", "message": "Organisation not found", "statusCode": 404})
    );

    let response = ctx.get("/api/organisations/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_organisation() {
    let ctx = TestContext::new();
    let (user_id, token) = ctx.register_session("Jill").await;

    let response = ctx
        .post(
            "/api/organisations",
            json!({"name": "Research", "description": "Lab work"}),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["message"], "Organisation created successfully");
    assert_eq!(response.body["data"]["name"], "Research");
    assert_eq!(response.body["data"]["description"], "Lab work");

    let organisations = ctx
        .store
        .list_organisations_for_user(user_id.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(organisations.len(), 2);
}

#[tokio::test]
async fn test_create_organisation_validation_and_gate() {
    let ctx = TestContext::new();
    let (_, token) = ctx.register_session("Jill").await;

    let response = ctx
        .post("/api/organisations", json!({"description": "no name"}), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["errors"],
        json!([{"field": "name", "message": "name is required"}])
    );

    let response = ctx
        .post(
            "/api/organisations",
            json!({"name": null, "description": "d".repeat(256)}),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["errors"],
        json!([
            {"field": "description", "message": "description must be at most 255 characters"},
            {"field": "name", "message": "name is required"}
        ])
    );

    let response = ctx
        .post("/api/organisations", json!({"name": "Research"}), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_member() {
    let ctx = TestContext::new();
    let (_, jill) = ctx.register_session("Jill").await;
    let (jack_id, jack) = ctx.register_session("Jack").await;
    let org_id = first_org_id(&ctx, &jill).await;

    let response = ctx
        .post(
            &format!("/api/organisations/{}/users", org_id),
            json!({"userId": jack_id}),
            Some(&jill),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(
        response.body,
        json!({"status": "success", "message": "User added to organisation successfully"})
    );

    let response = ctx.get("/api/organisations", Some(&jack)).await;
    let names: Vec<&str> = response.body["data"]["organisations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Jill's Organisation"));
}

#[tokio::test]
async fn test_add_member_is_idempotent() {
    let ctx = TestContext::new();
    let (_, jill) = ctx.register_session("Jill").await;
    let (jack_id, _) = ctx.register_session("Jack").await;
    let org_id = first_org_id(&ctx, &jill).await;
    let uri = format!("/api/organisations/{}/users", org_id);

    for _ in 0..2 {
        let response = ctx.post(&uri, json!({"userId": jack_id}), Some(&jill)).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let members = ctx
        .store
        .list_members(org_id.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn test_add_member_failures() {
    let ctx = TestContext::new();
    let (jill_id, jill) = ctx.register_session("Jill").await;
    let org_id = first_org_id(&ctx, &jill).await;

    let response = ctx
        .post(&format!("/api/organisations/{}/users", org_id), json!({}), Some(&jill))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errors"][0]["field"], "userId");

    let response = ctx
        .post(
            &format!("/api/organisations/{}/users", org_id),
            json!({"userId": Uuid::new_v4().to_string()}),
            Some(&jill),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "User not found");

    let response = ctx
        .post(
            &format!("/api/organisations/{}/users", Uuid::new_v4()),
            json!({"userId": jill_id}),
            Some(&jill),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Organisation not found");

    let response = ctx
        .post(
            &format!("/api/organisations/{}/users", org_id),
            json!({"userId": jill_id}),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ping_and_health() {
    let ctx = TestContext::new();

    let response = ctx.get("/ping", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("Server is online."));

    let response = ctx.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "connected");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let ctx = TestContext::new();

    let response = ctx.get("/nowhere", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["statusCode"], 404);
}
