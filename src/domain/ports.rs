use super::order::OrderPayload;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The remote order service.
///
/// `submit` resolves `Ok` only for a success response. Dropping the returned
/// future must abort the transfer.
#[async_trait]
pub trait OrderTransport: Send + Sync {
    async fn submit(&self, payload: OrderPayload) -> Result<()>;
}

/// A yes/no question put to whoever is placing the order.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> Result<bool>;
}

pub type OrderTransportRef = Arc<dyn OrderTransport>;
