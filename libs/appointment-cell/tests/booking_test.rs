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

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

async fn create_test_app(config: AppConfig) -> Router {
    appointment_routes(Arc::new(config))
}

fn booking_body(service_id: &str) -> Value {
    json!({
        "serviceId": service_id,
        "startAt": "2030-06-03T10:00:00Z",
        "customer": {
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+90 555 123 4567"
        }
    })
}

fn post_booking(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn mock_service_lookup(mock_server: &MockServer, service_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::service_response(service_id, "Deep Cleansing", 30)
        ])))
        .mount(mock_server)
        .await;
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn booking_returns_created_appointment() {
    let mock_server = MockServer::start().await;
    let service_id = Uuid::new_v4().to_string();
    let customer_id = Uuid::new_v4().to_string();

    mock_service_lookup(&mock_server, &service_id).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockStoreResponses::appointment_response(
                &customer_id,
                &service_id,
                "2030-06-03T10:00:00Z",
                "2030-06-03T10:30:00Z",
                "confirmed",
            ),
        ))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let response = app
        .oneshot(post_booking(&booking_body(&service_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["status"], "confirmed");
    assert_eq!(body["appointment"]["end_at"], "2030-06-03T10:30:00Z");
}

#[tokio::test]
async fn booking_conflict_maps_to_409() {
    let mock_server = MockServer::start().await;
    let service_id = Uuid::new_v4().to_string();

    mock_service_lookup(&mock_server, &service_id).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_appointment"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            MockStoreResponses::error_response("OVERLAP_ERROR", "P0001"),
        ))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let response = app
        .oneshot(post_booking(&booking_body(&service_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn racing_bookings_produce_one_success_and_one_conflict() {
    let mock_server = MockServer::start().await;
    let service_id = Uuid::new_v4().to_string();
    let customer_id = Uuid::new_v4().to_string();

    mock_service_lookup(&mock_server, &service_id).await;

    // The stored procedure admits exactly one insert for a slot; the
    // second caller gets the overlap signal.
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockStoreResponses::appointment_response(
                &customer_id,
                &service_id,
                "2030-06-03T10:00:00Z",
                "2030-06-03T10:30:00Z",
                "confirmed",
            ),
        ))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_appointment"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            MockStoreResponses::error_response("OVERLAP_ERROR", "P0001"),
        ))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let first = app
        .clone()
        .oneshot(post_booking(&booking_body(&service_id)))
        .await
        .unwrap();
    let second = app
        .oneshot(post_booking(&booking_body(&service_id)))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_rejects_incomplete_payload() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let body = json!({
        "serviceId": Uuid::new_v4(),
        "startAt": "2030-06-03T10:00:00Z",
        "customer": {
            "fullName": "Ada Lovelace",
            "email": "",
            "phone": "+90 555 123 4567"
        }
    });

    let response = app.oneshot(post_booking(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_unknown_service_maps_to_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let app = create_test_app(config).await;

    let response = app
        .oneshot(post_booking(&booking_body(&Uuid::new_v4().to_string())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_requires_authentication() {
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
async fn listing_returns_joined_rows_for_admin() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": Uuid::new_v4(),
                "start_at": "2030-06-03T10:00:00Z",
                "end_at": "2030-06-03T10:30:00Z",
                "status": "confirmed",
                "customer": { "full_name": "Ada Lovelace", "phone": "+90 555 123 4567" },
                "service": { "name": "Deep Cleansing", "duration_min": 30 }
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
                .uri("/?filter=upcoming")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let appointments = body["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["customer"]["full_name"], "Ada Lovelace");
    assert_eq!(appointments[0]["service"]["duration_min"], 30);
}

#[tokio::test]
async fn status_update_moves_confirmed_to_completed() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();
    let customer_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();

    let mut confirmed = MockStoreResponses::appointment_response(
        &customer_id,
        &service_id,
        "2030-06-03T10:00:00Z",
        "2030-06-03T10:30:00Z",
        "confirmed",
    );
    confirmed["id"] = json!(appointment_id);

    let mut completed = confirmed.clone();
    completed["status"] = json!("completed");

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([confirmed])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([completed])))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::with_url(&mock_server.uri());
    let token =
        JwtTestUtils::create_test_token(&TestUser::default(), &test_config.jwt_secret, Some(1));
    let app = create_test_app(test_config.to_app_config()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/{}/status", appointment_id))
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "status": "completed" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["appointment"]["status"], "completed");
}

#[tokio::test]
async fn status_update_rejects_leaving_terminal_state() {
    let mock_server = MockServer::start().await;
    let appointment_id = Uuid::new_v4();
    let customer_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();

    let mut cancelled = MockStoreResponses::appointment_response(
        &customer_id,
        &service_id,
        "2030-06-03T10:00:00Z",
        "2030-06-03T10:30:00Z",
        "cancelled",
    );
    cancelled["id"] = json!(appointment_id);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cancelled])))
        .mount(&mock_server)
        .await;

    let test_config = TestConfig::with_url(&mock_server.uri());
    let token =
        JwtTestUtils::create_test_token(&TestUser::default(), &test_config.jwt_secret, Some(1));
    let app = create_test_app(test_config.to_app_config()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/{}/status", appointment_id))
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "status": "confirmed" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
