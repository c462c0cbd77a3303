//! HTTP client for the storefront backend.

use crate::error::ApiError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use shop_auth::{AuthToken, Session, User};
use shop_commerce::cart::ProductSnapshot;
use shop_commerce::checkout::{OrderSubmission, PlacedOrder};
use shop_commerce::{Currency, Money, ProductId};
use std::time::Duration;
use tracing::debug;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:7000`.
    pub base_url: String,
    /// Seconds to wait for a connection.
    pub connect_timeout_secs: u64,
    /// Seconds to wait for a whole request.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7000".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: AuthToken,
    #[serde(flatten)]
    user: User,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Product as `GET /api/products/{id}` returns it.
#[derive(Debug, Deserialize)]
struct ProductBody {
    #[serde(rename = "_id")]
    id: ProductId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    price: f64,
    #[serde(rename = "countInStock", default)]
    count_in_stock: i64,
}

impl ProductBody {
    fn into_snapshot(self, currency: Currency) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name,
            image: self.image,
            price: Money::from_decimal(self.price, currency),
            count_in_stock: u32::try_from(self.count_in_stock.max(0)).unwrap_or(u32::MAX),
        }
    }
}

/// Client for the storefront REST API.
///
/// Cheap to clone. Carries the bearer token of the signed-in user, if any.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL without a trailing slash.
    base_url: String,
    token: Option<AuthToken>,
    currency: Currency,
    client: Client,
}

impl ApiClient {
    /// Build a client. Prices are read in the default currency.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
            currency: Currency::default(),
            client,
        })
    }

    /// Send requests as the user holding `token`.
    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Read product prices in `currency`.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        debug!(email, "logging in");
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = check(response, "Login failed").await?;
        let body: LoginResponse = response.json().await?;
        Ok(Session::new(body.token, body.user))
    }

    /// `GET /api/auth/me`. `Ok(None)` when no token is set or the backend
    /// no longer accepts it.
    pub async fn current_user(&self) -> Result<Option<User>, ApiError> {
        if self.token.is_none() {
            return Ok(None);
        }
        let response = self.authorized(self.client.get(self.url("/api/auth/me")))?;
        match check(response.send().await?, "Session lookup failed").await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(e) if e.is_unauthorized() => {
                debug!(error = %e, "token rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// `GET /api/products/{id}`.
    pub async fn fetch_product(&self, id: &ProductId) -> Result<ProductSnapshot, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/products/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("product {id}")));
        }
        let body: ProductBody = check(response, "Product lookup failed").await?.json().await?;
        Ok(body.into_snapshot(self.currency))
    }

    /// `POST /api/orders`.
    pub async fn create_order(&self, order: &OrderSubmission) -> Result<PlacedOrder, ApiError> {
        let request = self
            .authorized(self.client.post(self.url("/api/orders")))?
            .json(order);
        let response = check(request.send().await?, "Order could not be placed").await?;
        Ok(response.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::NotSignedIn)?;
        Ok(request.bearer_auth(token.as_str()))
    }
}

/// Pass 2xx responses through; turn anything else into
/// [`ApiError::Rejected`] carrying the body's `message`.
async fn check(response: Response, fallback: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    debug!(status = status.as_u16(), %message, "request rejected");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_trimmed() {
        let client = ApiClient::new(&ApiConfig::new("http://localhost:7000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:7000");
        assert_eq!(client.url("/api/orders"), "http://localhost:7000/api/orders");
        assert!(client.token().is_none());
    }

    #[test]
    fn test_product_body_conversion() {
        let body: ProductBody = serde_json::from_str(
            r#"{"_id":"p1","name":"Phone","image":"/p.jpg","price":599.99,"countInStock":-2,"rating":4.5}"#,
        )
        .unwrap();
        let snapshot = body.into_snapshot(Currency::BDT);
        assert_eq!(snapshot.price.minor_units(), 59999);
        assert_eq!(snapshot.count_in_stock, 0);

        let fractional: ProductBody =
            serde_json::from_str(r#"{"_id":"p2","price":0.125,"countInStock":1}"#).unwrap();
        let snapshot = fractional.into_snapshot(Currency::BDT);
        assert_eq!(snapshot.price.amount_micros, 125_000);
    }

    #[test]
    fn test_login_response_flattens_user() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"_id":"u1","name":"Rahim","email":"rahim@example.com","isAdmin":false,"token":"abc"}"#,
        )
        .unwrap();
        assert_eq!(body.token.as_str(), "abc");
        assert_eq!(body.user.email, "rahim@example.com");
    }
}
