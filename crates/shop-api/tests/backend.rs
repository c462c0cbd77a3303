//! Client tests against an in-process mock of the storefront backend.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use shop_api::{ApiClient, ApiConfig, ApiError};
use shop_auth::{AuthToken, SessionLookup};
use shop_cache::MemoryStore;
use shop_commerce::prelude::*;
use std::sync::{Arc, Mutex};

const TOKEN: &str = "tok-1";

type Orders = Arc<Mutex<Vec<Value>>>;

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn user() -> Value {
    json!({"_id": "u1", "name": "Rahim", "email": "rahim@example.com", "isAdmin": false})
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "rahim@example.com" && body["password"] == "secret" {
        let mut user = user();
        user["token"] = json!(TOKEN);
        (StatusCode::OK, Json(user))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        )
    }
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers) {
        Some(TOKEN) => (StatusCode::OK, Json(user())),
        Some("boom") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Not authorized, token failed"})),
        ),
    }
}

async fn product(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    match id.as_str() {
        "p1" => (
            StatusCode::OK,
            Json(json!({
                "_id": "p1",
                "name": "Cannon EOS 80D",
                "image": "/images/camera.jpg",
                "price": 80,
                "countInStock": 5,
                "rating": 4.5
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Product not found"})),
        ),
    }
}

async fn create_order(
    State(orders): State<Orders>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if bearer(&headers) != Some(TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Not authorized, token failed"})),
        );
    }
    let mut orders = orders.lock().unwrap();
    orders.push(body);
    let id = format!("ord-{}", orders.len());
    (StatusCode::CREATED, Json(json!({"_id": id, "isPaid": false})))
}

async fn spawn_backend() -> (String, Orders) {
    let orders = Orders::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/products/:id", get(product))
        .route("/api/orders", post(create_order))
        .with_state(orders.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), orders)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig::new(base_url)).unwrap()
}

/// A base URL nothing is listening on.
fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn test_login_returns_session() {
    let (url, _) = spawn_backend().await;
    let session = client(&url)
        .login("rahim@example.com", "secret")
        .await
        .unwrap();
    assert_eq!(session.token.as_str(), TOKEN);
    assert_eq!(session.user.display_name(), "Rahim");
    assert!(session.is_valid());
}

#[tokio::test]
async fn test_login_failure_carries_backend_message() {
    let (url, _) = spawn_backend().await;
    let err = client(&url)
        .login("rahim@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_session_lookup() {
    let (url, _) = spawn_backend().await;

    assert!(client(&url).current_session().await.unwrap().is_none());

    let signed_in = client(&url).with_token(AuthToken::new(TOKEN));
    let session = signed_in.active_session().await.unwrap();
    assert_eq!(session.user.email, "rahim@example.com");

    let stale = client(&url).with_token(AuthToken::new("stale"));
    assert!(stale.current_session().await.unwrap().is_none());

    let broken = client(&url).with_token(AuthToken::new("boom"));
    assert!(broken.current_session().await.is_err());
    assert!(broken.active_session().await.is_none());
}

#[tokio::test]
async fn test_unreachable_backend_means_no_session() {
    let api = client(&dead_url()).with_token(AuthToken::new(TOKEN));
    assert!(matches!(
        api.current_user().await,
        Err(ApiError::Transport(_))
    ));
    assert!(api.active_session().await.is_none());
}

#[tokio::test]
async fn test_fetch_product() {
    let (url, _) = spawn_backend().await;
    let api = client(&url);

    let product = api.fetch_product(&ProductId::new("p1")).await.unwrap();
    assert_eq!(product.name, "Cannon EOS 80D");
    assert_eq!(product.price, Money::new(8000, Currency::BDT));
    assert_eq!(product.count_in_stock, 5);

    let missing = api.fetch_product(&ProductId::new("nope")).await.unwrap_err();
    assert!(matches!(missing, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_checkout_against_backend() {
    let (url, orders) = spawn_backend().await;
    let api = Arc::new(client(&url).with_token(AuthToken::new(TOKEN)));

    let cart = Arc::new(CartStore::new(MemoryStore::new()));
    let product = api.fetch_product(&ProductId::new("p1")).await.unwrap();
    cart.add_or_update_item(product, 2).unwrap();

    let checkout = CheckoutController::new(cart.clone(), api.clone(), api.clone());
    assert!(checkout.proceed_to_shipping().await.is_allowed());
    checkout.submit_shipping(ShippingAddress::new("Road 1", "Dhaka", "1207", "Bangladesh"));
    assert!(checkout
        .submit_payment(PaymentMethod::CashOnDelivery)
        .is_allowed());

    let outcome = checkout.place_order().await.unwrap();
    assert_eq!(outcome, PlaceOrderOutcome::Placed(OrderId::new("ord-1")));
    assert!(cart.is_empty());

    let received = orders.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    let body = &received[0];
    assert_eq!(body["orderItems"][0]["product"], "p1");
    assert_eq!(body["orderItems"][0]["qty"], 2);
    assert_eq!(body["paymentMethod"], "COD");
    assert_eq!(body["shippingAddress"]["postalCode"], "1207");
    assert_eq!(body["itemsPrice"], 160.0);
    assert_eq!(body["shippingPrice"], 0.0);
    assert_eq!(body["taxPrice"], 24.0);
    assert_eq!(body["totalPrice"], 184.0);
}

#[tokio::test]
async fn test_rejected_order_surfaces_message() {
    let (url, orders) = spawn_backend().await;
    let api = Arc::new(client(&url).with_token(AuthToken::new("revoked")));

    let cart = Arc::new(CartStore::new(MemoryStore::new()));
    cart.add_or_update_item(api.fetch_product(&ProductId::new("p1")).await.unwrap(), 1)
        .unwrap();
    cart.set_shipping_address(ShippingAddress::new("Road 1", "Dhaka", "1207", "Bangladesh"));
    let before = cart.snapshot();

    let sessions: Arc<dyn SessionLookup> = Arc::new(shop_auth::MemorySessions::new());
    let checkout = CheckoutController::new(cart.clone(), sessions, api);
    let err = checkout.place_order().await.unwrap_err();

    assert_eq!(
        err,
        CommerceError::SubmissionFailed("Not authorized, token failed".into())
    );
    assert_eq!(cart.snapshot(), before);
    assert!(orders.lock().unwrap().is_empty());
}
