//! End-to-end request tests against the router with an in-memory store.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use homenest::db::repositories::LocalRepository;
use homenest::http::{create_router, AppState};
use support::{listing, stored};

fn app_with(repo: Arc<LocalRepository>) -> Router {
    create_router(AppState::new(repo))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_root_reports_liveness() {
    let app = app_with(Arc::new(LocalRepository::new()));
    let (status, body) = send(app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "HomeNest Server is Running...");
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let repo = Arc::new(LocalRepository::new());
    let (status, body) = send_json(app_with(repo.clone()), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");

    repo.set_healthy(false);
    let (_, body) = send_json(app_with(repo), Method::GET, "/health", None).await;
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_create_returns_created_with_inserted_id() {
    let repo = Arc::new(LocalRepository::new());
    let payload = json!({
        "propertyName": "Sea View",
        "userEmail": "owner@x.com",
        "price": 1200,
        "parking": true
    });

    let (status, body) = send_json(app_with(repo.clone()), Method::POST, "/properties", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["acknowledged"], true);

    let id = body["insertedId"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let (status, fetched) =
        send_json(app_with(repo), Method::GET, &format!("/properties/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["_id"], id.as_str());
    assert_eq!(fetched["propertyName"], "Sea View");
    assert_eq!(fetched["price"], 1200.0);
    assert_eq!(fetched["parking"], true);
    assert!(fetched["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_rejects_non_object_body() {
    let app = app_with(Arc::new(LocalRepository::new()));
    let (status, body) = send_json(app, Method::POST, "/properties", Some(json!([1, 2, 3]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_keeps_string_price_as_sent() {
    let repo = Arc::new(LocalRepository::new());
    let payload = json!({ "propertyName": "Flat", "price": "1200" });

    let (status, body) = send_json(app_with(repo.clone()), Method::POST, "/properties", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = body["insertedId"].as_str().unwrap().to_string();
    let (status, fetched) =
        send_json(app_with(repo), Method::GET, &format!("/properties/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["propertyName"], "Flat");
    assert_eq!(fetched["price"], "1200");
}

#[tokio::test]
async fn test_create_keeps_object_location() {
    let repo = Arc::new(LocalRepository::new());
    let location = json!({ "city": "Dhaka", "area": "Banani" });
    let payload = json!({ "propertyName": "Duplex", "location": location.clone() });

    let (status, body) = send_json(app_with(repo.clone()), Method::POST, "/properties", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = body["insertedId"].as_str().unwrap().to_string();
    let (_, fetched) =
        send_json(app_with(repo), Method::GET, &format!("/properties/{}", id), None).await;
    assert_eq!(fetched["location"], location);
}

#[tokio::test]
async fn test_update_accepts_string_price() {
    let repo = Arc::new(LocalRepository::new());
    let property = stored(listing("Cottage", "a@x.com", 100.0), 0);
    let id = property.id;
    repo.seed(property);

    let uri = format!("/properties/{}", id);
    let (status, body) = send_json(
        app_with(repo.clone()),
        Method::PUT,
        &uri,
        Some(json!({ "price": "negotiable" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);

    let (_, fetched) = send_json(app_with(repo), Method::GET, &uri, None).await;
    assert_eq!(fetched["price"], "negotiable");
    assert_eq!(fetched["propertyName"], "Cottage");
}

#[tokio::test]
async fn test_malformed_query_is_400_envelope() {
    let app = app_with(Arc::new(LocalRepository::new()));
    let (status, body) =
        send_json(app, Method::GET, "/properties?email=a%40x.com&email=b%40x.com", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid query parameters");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_applies_query_parameters() {
    let repo = Arc::new(LocalRepository::new());
    repo.seed(stored(listing("Lake House", "a@x.com", 300.0), 0));
    repo.seed(stored(listing("lake cabin", "a@x.com", 100.0), 1));
    repo.seed(stored(listing("Lake Loft", "b@x.com", 200.0), 2));

    let (status, body) = send_json(
        app_with(repo),
        Method::GET,
        "/properties?email=a%40x.com&search=LAKE&sortBy=price&order=asc",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["propertyName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["lake cabin", "Lake House"]);
}

#[tokio::test]
async fn test_list_with_empty_parameters_returns_everything() {
    let repo = Arc::new(LocalRepository::new());
    repo.seed(stored(listing("One", "a@x.com", 1.0), 0));
    repo.seed(stored(listing("Two", "b@x.com", 2.0), 1));

    let (status, body) =
        send_json(app_with(repo), Method::GET, "/properties?email=&search=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["propertyName"], "Two");
}

#[tokio::test]
async fn test_recent_is_not_captured_by_id_route() {
    let repo = Arc::new(LocalRepository::new());
    for i in 0..8 {
        repo.seed(stored(listing(&format!("P{}", i), "a@x.com", 1.0), i));
    }

    let (status, body) = send_json(app_with(repo), Method::GET, "/properties/recent", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0]["propertyName"], "P7");
}

#[tokio::test]
async fn test_get_missing_property_is_404_envelope() {
    let app = app_with(Arc::new(LocalRepository::new()));
    let (status, body) =
        send_json(app, Method::GET, "/properties/65a1b2c3d4e5f60718293a4b", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Property not found");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_id_is_server_error() {
    let repo = Arc::new(LocalRepository::new());

    let (status, body) = send_json(app_with(repo.clone()), Method::GET, "/properties/not-an-id", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error fetching property");

    let (status, body) =
        send_json(app_with(repo.clone()), Method::DELETE, "/properties/xyz", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to delete property");

    let (status, body) = send_json(
        app_with(repo),
        Method::PUT,
        "/properties/xyz",
        Some(json!({ "price": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to update property");
}

#[tokio::test]
async fn test_update_merges_fields() {
    let repo = Arc::new(LocalRepository::new());
    let property = stored(listing("Cottage", "a@x.com", 100.0), 0);
    let id = property.id;
    repo.seed(property);

    let (status, body) = send_json(
        app_with(repo.clone()),
        Method::PUT,
        &format!("/properties/{}", id),
        Some(json!({ "price": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 1);
    assert_eq!(body["modifiedCount"], 1);
    assert_eq!(body["upsertedCount"], 0);
    assert!(body["upsertedId"].is_null());

    let (_, fetched) =
        send_json(app_with(repo), Method::GET, &format!("/properties/{}", id), None).await;
    assert_eq!(fetched["price"], 150.0);
    assert_eq!(fetched["propertyName"], "Cottage");
}

#[tokio::test]
async fn test_update_missing_property_is_404() {
    let app = app_with(Arc::new(LocalRepository::new()));
    let (status, body) = send_json(
        app,
        Method::PUT,
        "/properties/65a1b2c3d4e5f60718293a4b",
        Some(json!({ "price": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Property not found");
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let repo = Arc::new(LocalRepository::new());
    let property = stored(listing("Doomed", "a@x.com", 1.0), 0);
    let id = property.id;
    repo.seed(property);

    let uri = format!("/properties/{}", id);
    let (status, body) = send_json(app_with(repo.clone()), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], true);
    assert_eq!(body["deletedCount"], 1);

    let (status, _) = send_json(app_with(repo.clone()), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(app_with(repo), Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_500_envelope() {
    let repo = Arc::new(LocalRepository::new());
    repo.set_healthy(false);

    let (status, body) = send_json(app_with(repo), Method::GET, "/properties", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error fetching properties");
    assert!(body["error"].as_str().unwrap().contains("not healthy"));
}

#[tokio::test]
async fn test_unknown_route_is_404_envelope() {
    let app = app_with(Arc::new(LocalRepository::new()));
    let (status, body) = send_json(app, Method::GET, "/listings", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}
