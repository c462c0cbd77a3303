//! The backend as the checkout's session lookup and order service.

use crate::client::ApiClient;
use async_trait::async_trait;
use shop_auth::{AuthError, Session, SessionLookup};
use shop_commerce::checkout::{OrderSubmission, OrderSubmitter, PlacedOrder, SubmitError};
use tracing::info;

#[async_trait]
impl SessionLookup for ApiClient {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        let user = self
            .current_user()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        Ok(user.map(|user| Session::new(token.clone(), user)))
    }
}

#[async_trait]
impl OrderSubmitter for ApiClient {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<PlacedOrder, SubmitError> {
        let placed = self
            .create_order(order)
            .await
            .map_err(|e| SubmitError::new(e.to_string()))?;
        info!(order_id = %placed.id, "order created");
        Ok(placed)
    }
}
