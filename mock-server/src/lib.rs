use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const CATEGORIES: [&str; 3] = ["Alimentos", "Bebidas", "Tecno"];

const BACKEND_SERVICE: &str = "fabric:/SupermercadoCluster/CarritoBackend";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: i32,
}

/// A request as the mock saw it. Bodies are kept byte for byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct CannedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Shared between the router and the test that started it.
///
/// Plain `std` mutexes: handlers never hold them across an await, and tests
/// read them from synchronous code.
#[derive(Clone, Default)]
pub struct MockState {
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    overrides: Arc<Mutex<HashMap<String, CannedResponse>>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request to `path` with `status` and `body` instead of the default.
    pub fn respond_with(&self, path: &str, status: u16, body: &[u8]) {
        self.overrides.lock().unwrap().insert(
            path.to_string(),
            CannedResponse {
                status,
                body: body.to_vec(),
            },
        );
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn recorded_for(&self, path: &str) -> Vec<RecordedRequest> {
        self.recorded()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    fn record(&self, method: &Method, uri: &Uri, body: &[u8]) -> Option<Response> {
        self.recorded.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            body: body.to_vec(),
        });
        let canned = self.overrides.lock().unwrap().get(uri.path()).cloned()?;
        let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Some((status, canned.body).into_response())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionQuery {
    pub partition_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    pub category_name: String,
}

/// Port the Communication API listens on in the dev profile.
pub const DEFAULT_PORT: u16 = 8922;

/// Port from a raw `PORT` value; unset means `DEFAULT_PORT`.
pub fn listen_port(raw: Option<&str>) -> Result<u16, std::io::Error> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid PORT {raw:?}: {e}"))),
    }
}

pub fn app() -> Router {
    app_with_state(MockState::new())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/Communication/backendcluster", get(backend_cluster))
        .route("/Communication/nodofromcategoryname", get(node_from_category))
        .route("/Communication/allcategories", get(all_categories))
        .route("/Communication/verifystock", post(verify_stock))
        .route("/Communication/processpurchase", post(process_purchase))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn service_details(partition_id: i64) -> String {
    format!("{BACKEND_SERVICE} ::: {partition_id}")
}

async fn backend_cluster(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(query): Query<PartitionQuery>,
) -> Response {
    if let Some(canned) = state.record(&method, &uri, &[]) {
        return canned;
    }
    if query.partition_id < 0 || query.partition_id >= CATEGORIES.len() as i64 {
        return format!(
            "No existe la particion. Este cluster solo tiene {} particiones",
            CATEGORIES.len()
        )
        .into_response();
    }
    service_details(query.partition_id).into_response()
}

async fn node_from_category(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(query): Query<CategoryQuery>,
) -> Response {
    if let Some(canned) = state.record(&method, &uri, &[]) {
        return canned;
    }
    match CATEGORIES.iter().position(|c| *c == query.category_name) {
        Some(partition) => service_details(partition as i64).into_response(),
        None => "No hay particion asignada a la categoria elegida".into_response(),
    }
}

async fn all_categories(State(state): State<MockState>, method: Method, uri: Uri) -> Response {
    if let Some(canned) = state.record(&method, &uri, &[]) {
        return canned;
    }
    Json(CATEGORIES).into_response()
}

async fn verify_stock(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if let Some(canned) = state.record(&method, &uri, &body) {
        return canned;
    }
    check_cart(&body)
}

async fn process_purchase(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if let Some(canned) = state.record(&method, &uri, &body) {
        return canned;
    }
    check_cart(&body)
}

/// `true` when every line belongs to a known partition, 500 otherwise.
fn check_cart(body: &[u8]) -> Response {
    let cart: Vec<Product> = match serde_json::from_slice(body) {
        Ok(cart) => cart,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    match cart.iter().find(|p| !CATEGORIES.contains(&p.category.as_str())) {
        Some(product) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("The given key '{}' was not present in the dictionary.", product.category),
        )
            .into_response(),
        None => Json(true).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_deserializes_from_wire_json() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"name":"CocaCola","description":"string","category":"Bebidas","quantity":0}"#,
        )
        .unwrap();
        assert_eq!(product.name, "CocaCola");
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn check_cart_rejects_unknown_category() {
        let resp = check_cart(
            br#"[{"id":9,"name":"Jabon","description":"string","category":"Limpieza","quantity":1}]"#,
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn check_cart_rejects_malformed_body() {
        let resp = check_cart(b"not json");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn check_cart_accepts_empty_cart() {
        assert_eq!(check_cart(b"[]").status(), StatusCode::OK);
    }

    #[test]
    fn listen_port_defaults_and_parses() {
        assert_eq!(listen_port(None).unwrap(), DEFAULT_PORT);
        assert_eq!(listen_port(Some("3000")).unwrap(), 3000);
    }

    #[test]
    fn listen_port_rejects_garbage() {
        let err = listen_port(Some("eighty")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
        assert!(err.to_string().contains("eighty"));
        assert!(listen_port(Some("70000")).is_err());
    }

    #[test]
    fn overrides_replace_default_response() {
        let state = MockState::new();
        state.respond_with("/Communication/allcategories", 503, b"down");
        let uri: Uri = "/Communication/allcategories".parse().unwrap();
        let resp = state.record(&Method::GET, &uri, &[]).unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(state.recorded().len(), 1);
    }

    #[test]
    fn record_without_override_returns_none() {
        let state = MockState::new();
        let uri: Uri = "/Communication/backendcluster?partitionId=1".parse().unwrap();
        assert!(state.record(&Method::GET, &uri, &[]).is_none());
        let recorded = state.recorded();
        assert_eq!(recorded[0].path, "/Communication/backendcluster");
        assert_eq!(recorded[0].query.as_deref(), Some("partitionId=1"));
    }
}
