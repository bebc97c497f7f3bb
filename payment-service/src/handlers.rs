use anyhow::{anyhow, Result};
use shared::{CallbackNotification, GatewayOutcome, OrderStatus};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::RedirectConfig;
use crate::repository::OrderRepository;

/// Result of applying one gateway callback to the order store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub outcome: GatewayOutcome,
    pub status: OrderStatus,
    pub location: String,
    pub updated_rows: usize,
}

pub struct PaymentReconciler {
    repository: Arc<dyn OrderRepository>,
    redirects: RedirectConfig,
}

impl PaymentReconciler {
    pub fn new(repository: Arc<dyn OrderRepository>, redirects: RedirectConfig) -> Self {
        Self { repository, redirects }
    }

    /// Persists the status the gateway reported and builds the terminal page URL.
    ///
    /// Unknown transaction ids are tolerated: the update touches no rows and the
    /// redirect falls back to the configured base. Re-delivery of the same
    /// callback writes the same status again.
    pub async fn reconcile(&self, notification: &CallbackNotification) -> Result<Reconciliation> {
        let txnid = notification
            .txnid
            .as_deref()
            .ok_or_else(|| anyhow!("Callback is missing txnid"))?;

        let order = self.repository.find_order_by_transaction_id(txnid).await?;

        let outcome = notification.outcome();
        let status = OrderStatus::from(outcome);
        let updated_rows = self.repository.update_order_status(txnid, status).await?;

        if updated_rows == 0 {
            warn!("Callback for unknown transaction {}, no order updated", txnid);
        }

        let stored_return_url = order.as_ref().and_then(|order| order.return_url.as_deref());
        let base = self.redirects.resolve_base(stored_return_url);
        let location = format!("{}{}?txnid={}", base, outcome.terminal_path(), txnid);

        info!(
            "Transaction {} marked {} (gateway payment id: {})",
            txnid,
            status,
            notification.easepayid.as_deref().unwrap_or("-")
        );

        Ok(Reconciliation {
            outcome,
            status,
            location,
            updated_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryOrderRepository;
    use shared::Order;

    fn callback(status: &str, txnid: &str) -> CallbackNotification {
        CallbackNotification {
            status: Some(status.to_string()),
            txnid: Some(txnid.to_string()),
            ..Default::default()
        }
    }

    async fn reconciler_with(orders: Vec<Order>, redirects: RedirectConfig) -> (PaymentReconciler, InMemoryOrderRepository) {
        let repository = InMemoryOrderRepository::new();
        for order in orders {
            repository.insert(order).await;
        }
        let reconciler = PaymentReconciler::new(Arc::new(repository.clone()), redirects);
        (reconciler, repository)
    }

    #[tokio::test]
    async fn success_marks_order_paid() {
        let (reconciler, repository) =
            reconciler_with(vec![Order::pending("TXN100", None)], RedirectConfig::default()).await;

        let result = reconciler.reconcile(&callback("success", "TXN100")).await.unwrap();

        assert_eq!(result.status, OrderStatus::Paid);
        assert_eq!(result.updated_rows, 1);
        assert_eq!(result.location, "http://localhost:3000/payment/success?txnid=TXN100");
        assert_eq!(repository.status("TXN100").await.as_deref(), Some(OrderStatus::Paid.as_str()));
    }

    #[tokio::test]
    async fn anything_else_marks_order_failed() {
        let (reconciler, repository) =
            reconciler_with(vec![Order::pending("TXN100", None)], RedirectConfig::default()).await;

        let result = reconciler.reconcile(&callback("failed", "TXN100")).await.unwrap();

        assert_eq!(result.status, OrderStatus::Failed);
        assert_eq!(result.location, "http://localhost:3000/payment/failure?txnid=TXN100");
        assert_eq!(repository.status("TXN100").await.as_deref(), Some(OrderStatus::Failed.as_str()));
    }

    #[tokio::test]
    async fn missing_status_is_a_failure() {
        let (reconciler, _) =
            reconciler_with(vec![Order::pending("TXN100", None)], RedirectConfig::default()).await;

        let notification = CallbackNotification {
            txnid: Some("TXN100".to_string()),
            ..Default::default()
        };
        let result = reconciler.reconcile(&notification).await.unwrap();
        assert_eq!(result.outcome, GatewayOutcome::Failure);
    }

    #[tokio::test]
    async fn stored_return_url_overrides_configuration() {
        let (reconciler, _) = reconciler_with(
            vec![Order::pending("TXN7", Some("https://shop.example/".to_string()))],
            RedirectConfig::new(Some("https://public.example".to_string()), None),
        )
        .await;

        let result = reconciler.reconcile(&callback("success", "TXN7")).await.unwrap();
        assert_eq!(result.location, "https://shop.example/payment/success?txnid=TXN7");
    }

    #[tokio::test]
    async fn unknown_transaction_uses_fallback_base() {
        let (reconciler, repository) = reconciler_with(
            vec![],
            RedirectConfig::new(None, Some("https://base.example".to_string())),
        )
        .await;

        let result = reconciler.reconcile(&callback("success", "GHOST")).await.unwrap();

        assert_eq!(result.updated_rows, 0);
        assert_eq!(result.location, "https://base.example/payment/success?txnid=GHOST");
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn non_canonical_stored_status_is_still_reconciled() {
        let repository = InMemoryOrderRepository::new();
        repository.insert_with_status("TXN8", "pending", None).await;
        let reconciler = PaymentReconciler::new(Arc::new(repository.clone()), RedirectConfig::default());

        let result = reconciler.reconcile(&callback("success", "TXN8")).await.unwrap();

        assert_eq!(result.updated_rows, 1);
        assert_eq!(result.location, "http://localhost:3000/payment/success?txnid=TXN8");
        assert_eq!(repository.status("TXN8").await.as_deref(), Some("PAID"));
    }

    #[tokio::test]
    async fn missing_txnid_is_an_error() {
        let (reconciler, _) = reconciler_with(vec![], RedirectConfig::default()).await;

        let notification = CallbackNotification {
            status: Some("success".to_string()),
            ..Default::default()
        };
        assert!(reconciler.reconcile(&notification).await.is_err());
    }

    #[tokio::test]
    async fn redelivery_is_idempotent() {
        let (reconciler, repository) =
            reconciler_with(vec![Order::pending("TXN100", None)], RedirectConfig::default()).await;

        let first = reconciler.reconcile(&callback("success", "TXN100")).await.unwrap();
        let second = reconciler.reconcile(&callback("success", "TXN100")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repository.status("TXN100").await.as_deref(), Some(OrderStatus::Paid.as_str()));
    }
}
