use crate::domain::order::OrderPayload;
use crate::domain::ports::OrderTransport;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

/// How the in-memory service answers submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceResponse {
    #[default]
    Accept,
    /// Answers with the given non-success HTTP status.
    Reject(u16),
    /// Behaves like a connection failure.
    Unreachable,
}

/// An order service that lives in-process.
///
/// Records every order it accepts. A held service waits for
/// [`InMemoryOrderService::release`] before answering, which lets a caller
/// line up a cancellation against a response that has not arrived yet.
#[derive(Default, Clone)]
pub struct InMemoryOrderService {
    orders: Arc<RwLock<Vec<OrderPayload>>>,
    response: Arc<RwLock<ServiceResponse>>,
    gate: Option<Arc<Notify>>,
    arrived: Arc<Notify>,
}

impl InMemoryOrderService {
    /// Creates a service that accepts every order immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service that answers only once released.
    pub fn held() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub async fn respond_with(&self, response: ServiceResponse) {
        *self.response.write().await = response;
    }

    /// Lets one held submission answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Resolves once a submission has reached the service.
    pub async fn arrived(&self) {
        self.arrived.notified().await;
    }

    pub async fn orders(&self) -> Vec<OrderPayload> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl OrderTransport for InMemoryOrderService {
    async fn submit(&self, payload: OrderPayload) -> Result<()> {
        self.arrived.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match *self.response.read().await {
            ServiceResponse::Accept => {
                self.orders.write().await.push(payload);
                Ok(())
            }
            ServiceResponse::Reject(status) => Err(OrderError::Transfer(format!(
                "order service responded with {status}"
            ))),
            ServiceResponse::Unreachable => Err(OrderError::Transfer(
                "order service unreachable".to_string(),
            )),
        }
    }
}
