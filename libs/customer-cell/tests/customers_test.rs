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

use customer_cell::router::customer_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

async fn create_test_app(config: AppConfig) -> Router {
    customer_routes(Arc::new(config))
}

#[tokio::test]
async fn customer_listing_requires_token() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_listing_includes_appointment_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": Uuid::new_v4(),
                "full_name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+90 555 123 4567",
                "created_at": "2024-01-01T00:00:00Z",
                "appointments": [
                    {
                        "id": Uuid::new_v4(),
                        "start_at": "2030-06-03T10:00:00Z",
                        "status": "confirmed",
                        "service": { "name": "Deep Cleansing" }
                    }
                ]
            }
        ])))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::with_url(&mock_server.uri());
    let token =
        JwtTestUtils::create_test_token(&TestUser::default(), &test_config.jwt_secret, Some(1));
    let app = create_test_app(test_config.to_app_config()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?search=ada")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    let customers = body["customers"].as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["full_name"], "Ada Lovelace");
    assert_eq!(
        customers[0]["appointments"][0]["service"]["name"],
        "Deep Cleansing"
    );
}
