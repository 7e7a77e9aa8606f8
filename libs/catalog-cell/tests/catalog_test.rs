use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_cell::router::catalog_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

async fn create_test_app(config: AppConfig) -> Router {
    catalog_routes(Arc::new(config))
}

fn admin_token(test_config: &TestConfig) -> String {
    JwtTestUtils::create_test_token(&TestUser::default(), &test_config.jwt_secret, Some(1))
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn public_service_listing_needs_no_token() {
    let mock_server = MockServer::start().await;
    let service_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::service_response(&service_id, "Deep Cleansing", 30)
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let response = app
        .oneshot(Request::builder().uri("/services").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["services"][0]["name"], "Deep Cleansing");
}

#[tokio::test]
async fn service_creation_requires_token() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/services")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "name": "Massage", "duration_min": 60 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn service_creation_returns_created_row() {
    let mock_server = MockServer::start().await;
    let service_id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::service_response(&service_id, "Massage", 60)
        ])))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::with_url(&mock_server.uri());
    let token = admin_token(&test_config);
    let app = create_test_app(test_config.to_app_config()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/services")
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "name": "Massage", "duration_min": 60 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["service"]["name"], "Massage");
}

#[tokio::test]
async fn deleting_service_with_history_maps_to_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockStoreResponses::error_response(
                "update or delete on table \"services\" violates foreign key constraint",
                "23503",
            ),
        ))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::with_url(&mock_server.uri());
    let token = admin_token(&test_config);
    let app = create_test_app(test_config.to_app_config()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/services/{}", Uuid::new_v4()))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn settings_roundtrip_updates_booking_rules() {
    let mock_server = MockServer::start().await;

    let mut settings_row = MockStoreResponses::settings_response();
    settings_row["id"] = json!(Uuid::new_v4());

    let mut updated_row = settings_row.clone();
    updated_row["booking_rules"]["min_notice_minutes"] = json!(240);

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([settings_row])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated_row])))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::with_url(&mock_server.uri());
    let token = admin_token(&test_config);
    let app = create_test_app(test_config.to_app_config()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/settings")
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "booking_rules": {
                            "slot_minutes": 30,
                            "buffer_minutes": 0,
                            "min_notice_minutes": 240
                        }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["settings"]["booking_rules"]["min_notice_minutes"], 240);
}
