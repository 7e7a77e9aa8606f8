// libs/customer-cell/src/services/customers.rs
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Customer, CustomerError};

pub struct CustomerService {
    supabase: Arc<SupabaseClient>,
}

impl CustomerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Customers with their appointment history (service names joined),
    /// newest customers first. An optional search term matches name,
    /// email or phone, case-insensitively.
    pub async fn list_customers(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, CustomerError> {
        let mut path = "/rest/v1/customers?select=*,appointments(id,start_at,status,\
                        service:services(name))&order=created_at.desc"
            .to_string();

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("*{}*", term);
            let filter = format!(
                "(full_name.ilike.{p},email.ilike.{p},phone.ilike.{p})",
                p = pattern
            );
            path.push_str(&format!("&or={}", urlencoding::encode(&filter)));
        }

        debug!("Listing customers");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| CustomerError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    CustomerError::DatabaseError(format!("Failed to parse customer row: {}", e))
                })
            })
            .collect()
    }
}
