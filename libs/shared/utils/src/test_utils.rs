use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "admin@example.com".to_string(),
            role: "authenticated".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "authenticated")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned Supabase rows for wiremock-backed cell tests.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn settings_response() -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "business_name": "Luxe Clinic",
            "phone": "+90 555 000 0000",
            "address": "Test Street 1",
            "opening_hours": {
                "mon": [{"start": "10:00", "end": "20:00"}],
                "tue": [{"start": "10:00", "end": "20:00"}],
                "wed": [{"start": "10:00", "end": "20:00"}],
                "thu": [{"start": "10:00", "end": "20:00"}],
                "fri": [{"start": "10:00", "end": "20:00"}],
                "sat": [{"start": "11:00", "end": "18:00"}],
                "sun": []
            },
            "booking_rules": {
                "slot_minutes": 30,
                "buffer_minutes": 0,
                "min_notice_minutes": 120
            },
            "timezone": "Europe/Istanbul"
        })
    }

    pub fn service_response(service_id: &str, name: &str, duration_min: i64) -> serde_json::Value {
        json!({
            "id": service_id,
            "name": name,
            "description": "Test service",
            "image_url": null,
            "duration_min": duration_min,
            "price_min": 1500,
            "active": true,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_response(
        customer_id: &str,
        service_id: &str,
        start_at: &str,
        end_at: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "customer_id": customer_id,
            "service_id": service_id,
            "staff_id": null,
            "start_at": start_at,
            "end_at": end_at,
            "status": status,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn customer_response(customer_id: &str, full_name: &str) -> serde_json::Value {
        json!({
            "id": customer_id,
            "full_name": full_name,
            "email": "customer@example.com",
            "phone": "+90 555 111 1111",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn staff_response(staff_id: &str, full_name: &str) -> serde_json::Value {
        json!({
            "id": staff_id,
            "full_name": full_name,
            "active": true,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
