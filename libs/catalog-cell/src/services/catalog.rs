// libs/catalog-cell/src/services/catalog.rs
use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CatalogError, CreateServiceRequest, CreateStaffRequest, Service, Staff};

pub struct CatalogService {
    supabase: Arc<SupabaseClient>,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Active services for the public booking wizard.
    pub async fn list_active_services(&self) -> Result<Vec<Service>, CatalogError> {
        let path = "/rest/v1/services?active=eq.true&order=created_at.asc";
        self.fetch_services(path).await
    }

    /// Every service, newest first, for the admin settings page.
    pub async fn list_all_services(&self) -> Result<Vec<Service>, CatalogError> {
        let path = "/rest/v1/services?order=created_at.desc";
        self.fetch_services(path).await
    }

    pub async fn create_service(
        &self,
        request: CreateServiceRequest,
    ) -> Result<Service, CatalogError> {
        if request.name.trim().is_empty() {
            return Err(CatalogError::Validation("service name is required".to_string()));
        }
        if request.duration_min <= 0 {
            return Err(CatalogError::Validation(
                "service duration must be positive".to_string(),
            ));
        }

        let service_data = json!({
            "name": request.name,
            "description": request.description,
            "image_url": request.image_url,
            "duration_min": request.duration_min,
            "price_min": request.price_min,
            "active": true,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, "/rest/v1/services", Some(service_data), Some(headers))
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::DatabaseError("Failed to create service".to_string()))?;

        let service: Service = serde_json::from_value(row)
            .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse created service: {}", e)))?;

        info!("Service created: {} ({})", service.name, service.id);
        Ok(service)
    }

    /// Removing a service with booking history trips the foreign key on
    /// appointments; surface that as a conflict rather than a storage
    /// failure so the console can suggest deactivating instead.
    pub async fn delete_service(&self, service_id: Uuid) -> Result<(), CatalogError> {
        debug!("Deleting service: {}", service_id);

        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        let result: Result<Vec<Value>, _> = self.supabase.request(Method::DELETE, &path, None).await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let message = e.to_string();
                if message.contains("23503") {
                    Err(CatalogError::ServiceInUse)
                } else {
                    Err(CatalogError::DatabaseError(message))
                }
            }
        }
    }

    pub async fn list_staff(&self) -> Result<Vec<Staff>, CatalogError> {
        let path = "/rest/v1/staff?order=created_at.desc";
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse staff row: {}", e)))
            })
            .collect()
    }

    pub async fn create_staff(&self, request: CreateStaffRequest) -> Result<Staff, CatalogError> {
        if request.full_name.trim().is_empty() {
            return Err(CatalogError::Validation("staff name is required".to_string()));
        }

        let staff_data = json!({
            "full_name": request.full_name,
            "active": true,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, "/rest/v1/staff", Some(staff_data), Some(headers))
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::DatabaseError("Failed to create staff member".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse created staff: {}", e)))
    }

    pub async fn delete_staff(&self, staff_id: Uuid) -> Result<(), CatalogError> {
        debug!("Deleting staff member: {}", staff_id);

        let path = format!("/rest/v1/staff?id=eq.{}", staff_id);
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn fetch_services(&self, path: &str) -> Result<Vec<Service>, CatalogError> {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse service row: {}", e)))
            })
            .collect()
    }
}
