use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, MockState};
use tower::ServiceExt;

const TRIPLE_CART: &str = concat!(
    r#"[{"id":0,"name":"Pan","description":"string","category":"Alimentos","quantity":30},"#,
    r#"{"id":1,"name":"CocaCola","description":"string","category":"Bebidas","quantity":0},"#,
    r#"{"id":2,"name":"Notebook","description":"string","category":"Tecno","quantity":0}]"#
);

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- backendcluster ---

#[tokio::test]
async fn backend_cluster_reports_service_details() {
    let resp = app()
        .oneshot(get_request("/Communication/backendcluster?partitionId=0"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_bytes(resp).await,
        "fabric:/SupermercadoCluster/CarritoBackend ::: 0"
    );
}

#[tokio::test]
async fn backend_cluster_out_of_range_partition() {
    let resp = app()
        .oneshot(get_request("/Communication/backendcluster?partitionId=7"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_bytes(resp).await,
        "No existe la particion. Este cluster solo tiene 3 particiones"
    );
}

#[tokio::test]
async fn backend_cluster_requires_partition_id() {
    let resp = app()
        .oneshot(get_request("/Communication/backendcluster"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- nodofromcategoryname / allcategories ---

#[tokio::test]
async fn node_from_category_maps_to_partition() {
    let resp = app()
        .oneshot(get_request("/Communication/nodofromcategoryname?categoryName=Tecno"))
        .await
        .unwrap();

    assert_eq!(
        body_bytes(resp).await,
        "fabric:/SupermercadoCluster/CarritoBackend ::: 2"
    );
}

#[tokio::test]
async fn node_from_unknown_category() {
    let resp = app()
        .oneshot(get_request("/Communication/nodofromcategoryname?categoryName=Ropa"))
        .await
        .unwrap();

    assert_eq!(
        body_bytes(resp).await,
        "No hay particion asignada a la categoria elegida"
    );
}

#[tokio::test]
async fn all_categories_lists_partitions_in_order() {
    let resp = app()
        .oneshot(get_request("/Communication/allcategories"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let categories: Vec<String> = body_json(resp).await;
    assert_eq!(categories, vec!["Alimentos", "Bebidas", "Tecno"]);
}

// --- verifystock / processpurchase ---

#[tokio::test]
async fn process_purchase_accepts_known_categories() {
    let resp = app()
        .oneshot(json_request("/Communication/processpurchase", TRIPLE_CART))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let processed: bool = body_json(resp).await;
    assert!(processed);
}

#[tokio::test]
async fn verify_stock_rejects_unknown_category() {
    let resp = app()
        .oneshot(json_request(
            "/Communication/verifystock",
            r#"[{"id":5,"name":"Jabon","description":"string","category":"Limpieza","quantity":1}]"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn process_purchase_rejects_get() {
    let resp = app()
        .oneshot(get_request("/Communication/processpurchase"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- recording / overrides ---

#[tokio::test]
async fn records_post_bodies_byte_for_byte() {
    let state = MockState::new();
    let resp = app_with_state(state.clone())
        .oneshot(json_request("/Communication/processpurchase", TRIPLE_CART))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let recorded = state.recorded_for("/Communication/processpurchase");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, "POST");
    assert_eq!(recorded[0].body, TRIPLE_CART.as_bytes());
}

#[tokio::test]
async fn override_returns_canned_status_and_body() {
    let state = MockState::new();
    state.respond_with("/Communication/backendcluster", 500, b"partition offline");

    let resp = app_with_state(state.clone())
        .oneshot(get_request("/Communication/backendcluster?partitionId=0"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_bytes(resp).await, "partition offline");
    assert_eq!(state.recorded().len(), 1);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let resp = app()
        .oneshot(get_request("/Communication/nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
