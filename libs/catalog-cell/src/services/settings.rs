// libs/catalog-cell/src/services/settings.rs
use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CatalogError, Settings, UpdateSettingsRequest};

pub struct SettingsService {
    supabase: Arc<SupabaseClient>,
}

impl SettingsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// The clinic keeps exactly one settings row.
    pub async fn get_settings(&self) -> Result<Settings, CatalogError> {
        let path = "/rest/v1/settings?limit=1";
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or(CatalogError::SettingsNotFound)?;

        serde_json::from_value(row)
            .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse settings row: {}", e)))
    }

    pub async fn update_settings(
        &self,
        request: UpdateSettingsRequest,
    ) -> Result<Settings, CatalogError> {
        let current = self.get_settings().await?;

        let mut update_data = serde_json::Map::new();

        if let Some(business_name) = request.business_name {
            update_data.insert("business_name".to_string(), json!(business_name));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(booking_rules) = request.booking_rules {
            booking_rules
                .validate()
                .map_err(|e| CatalogError::Validation(e.to_string()))?;
            update_data.insert("booking_rules".to_string(), json!(booking_rules));
        }

        if update_data.is_empty() {
            return Ok(current);
        }

        debug!("Updating settings row {}", current.id);

        let path = format!("/rest/v1/settings?id=eq.{}", current.id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(headers),
            )
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::DatabaseError("Failed to update settings".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse updated settings: {}", e)))
    }
}
