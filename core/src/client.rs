//! Stateless HTTP request builder and response parser for the Communication API.
//!
//! # Design
//! `CommunicationClient` holds only a `base_url` and carries no mutable state
//! between calls, so one instance can be shared by any number of threads.
//! Each route is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. The caller executes
//! the actual HTTP round-trip.

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Product;

/// Local address the API listens on when run from the cluster's dev profile.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8922";

const ROUTE_PREFIX: &str = "/Communication";

/// Synchronous, stateless client for the Communication API.
#[derive(Debug, Clone)]
pub struct CommunicationClient {
    base_url: String,
}

impl Default for CommunicationClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CommunicationClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_backend_cluster(&self, partition_id: i64) -> HttpRequest {
        self.get(&format!("backendcluster?partitionId={partition_id}"))
    }

    pub fn build_node_from_category(&self, category: &str) -> HttpRequest {
        self.get(&format!(
            "nodofromcategoryname?categoryName={}",
            encode_query_value(category)
        ))
    }

    pub fn build_all_categories(&self) -> HttpRequest {
        self.get("allcategories")
    }

    pub fn build_verify_stock(&self, cart: &[Product]) -> Result<HttpRequest, ApiError> {
        self.post_cart("verifystock", cart)
    }

    pub fn build_process_purchase(&self, cart: &[Product]) -> Result<HttpRequest, ApiError> {
        self.post_cart("processpurchase", cart)
    }

    /// The backend answers with a plain-text service descriptor, or with a
    /// plain-text explanation when the partition does not exist.
    pub fn parse_backend_cluster(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_success("backendcluster", &response)?;
        Ok(response.body_text())
    }

    pub fn parse_node_from_category(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_success("nodofromcategoryname", &response)?;
        Ok(response.body_text())
    }

    pub fn parse_all_categories(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        check_success("allcategories", &response)?;
        parse_json("allcategories", &response)
    }

    pub fn parse_verify_stock(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_success("verifystock", &response)?;
        parse_json("verifystock", &response)
    }

    pub fn parse_process_purchase(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_success("processpurchase", &response)?;
        parse_json("processpurchase", &response)
    }

    fn get(&self, route: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{ROUTE_PREFIX}/{route}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn post_cart(&self, route: &str, cart: &[Product]) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(cart).map_err(|e| ApiError::InvalidCart(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{ROUTE_PREFIX}/{route}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn check_success(route: &'static str, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::UnexpectedStatus {
        route,
        status: response.status,
        body: response.body_text(),
    })
}

fn parse_json<T: DeserializeOwned>(route: &'static str, response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::MalformedBody {
        route,
        reason: e.to_string(),
    })
}
