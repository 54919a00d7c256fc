//! # Checkout Flow
//!
//! Network half of checkout. The preconditions (non-empty cart, logged-in
//! user, no order already in flight) are enforced by the reducer before
//! [`Effect::SubmitOrder`](kawuz_core::state::Effect::SubmitOrder) is ever
//! produced; this module only sends the order and reports the outcome,
//! stamped with the epoch it was submitted under.
//!
//! ```text
//!   SubmitOrder{epoch, lines} ──► POST /order/create ──┬─ 2xx ──► CheckoutSucceeded{epoch, text}
//!                                                      └─ err ──► CheckoutFailed{epoch, text}
//! ```
//!
//! One request, no retry, no idempotency key.

use std::sync::Arc;
use tracing::{info, warn};

use kawuz_core::state::Action;
use kawuz_core::types::OrderLine;

use crate::api::StoreApi;

/// Sends orders.
#[derive(Clone)]
pub struct CheckoutFlow {
    api: Arc<dyn StoreApi>,
}

impl CheckoutFlow {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        CheckoutFlow { api }
    }

    /// Submits `lines` and turns the response into the follow-up action.
    pub async fn submit(&self, epoch: u64, lines: &[OrderLine]) -> Action {
        match self.api.create_order(lines).await {
            Ok(text) => {
                info!(epoch, lines = lines.len(), "Order placed");
                let text = text.trim();
                Action::CheckoutSucceeded {
                    epoch,
                    message: if text.is_empty() {
                        "Order placed".to_string()
                    } else {
                        text.to_string()
                    },
                }
            }
            Err(e) => {
                warn!(error = %e, epoch, lines = lines.len(), "Order rejected");
                Action::CheckoutFailed {
                    epoch,
                    message: e.user_message(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeStoreApi;
    use crate::error::ClientError;
    use kawuz_core::types::ProductId;

    fn lines() -> Vec<OrderLine> {
        vec![OrderLine {
            product_id: ProductId(1),
            quantity: 1,
        }]
    }

    #[tokio::test]
    async fn test_success_carries_server_text() {
        let fake = Arc::new(FakeStoreApi::new());
        let action = CheckoutFlow::new(fake).submit(3, &lines()).await;
        assert_eq!(
            action,
            Action::CheckoutSucceeded {
                epoch: 3,
                message: "Zamówienie zostało złożone!".into()
            }
        );
    }

    #[tokio::test]
    async fn test_failure_carries_server_text() {
        let fake = Arc::new(FakeStoreApi::new());
        *fake.order.lock().unwrap() = Some(Err(ClientError::from_status(
            400,
            "Nie ma wystarczającej liczby produktu: Kenya AA",
        )));
        let action = CheckoutFlow::new(fake).submit(3, &lines()).await;
        assert_eq!(
            action,
            Action::CheckoutFailed {
                epoch: 3,
                message: "Nie ma wystarczającej liczby produktu: Kenya AA".into()
            }
        );
    }

    #[tokio::test]
    async fn test_network_failure() {
        let fake = Arc::new(FakeStoreApi::new());
        *fake.order.lock().unwrap() = Some(Err(ClientError::Network("reset".into())));
        let action = CheckoutFlow::new(fake).submit(3, &lines()).await;
        assert!(matches!(action, Action::CheckoutFailed { epoch: 3, .. }));
    }
}
