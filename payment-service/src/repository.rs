use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use shared::{Order, OrderLookup, OrderStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::DbPool;
use crate::models::OrderRecord;
use crate::schema::orders;

/// Access to persisted orders, keyed by the gateway transaction id.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Reads only what the callback needs; the stored status is never decoded.
    async fn find_order_by_transaction_id(&self, transaction_id: &str) -> Result<Option<OrderLookup>>;

    /// Overwrites the status column and returns the number of rows touched.
    /// An unknown transaction id touches nothing and is not an error.
    async fn update_order_status(&self, transaction_id: &str, status: OrderStatus) -> Result<usize>;
}

pub struct PgOrderRepository {
    pool: DbPool,
}

impl PgOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_order_by_transaction_id(&self, transaction_id: &str) -> Result<Option<OrderLookup>> {
        let mut conn = self.pool.get().await?;

        let record = orders::table
            .filter(orders::transaction_id.eq(transaction_id))
            .select((orders::transaction_id, orders::return_url))
            .first::<OrderRecord>(&mut conn)
            .await
            .optional()?;

        Ok(record.map(OrderLookup::from))
    }

    async fn update_order_status(&self, transaction_id: &str, status: OrderStatus) -> Result<usize> {
        let mut conn = self.pool.get().await?;

        let updated_rows = diesel::update(orders::table.filter(orders::transaction_id.eq(transaction_id)))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Some(Utc::now())),
            ))
            .execute(&mut conn)
            .await?;

        Ok(updated_rows)
    }
}

#[derive(Debug, Clone)]
struct StoredOrder {
    status: String,
    return_url: Option<String>,
}

/// Order store held in process memory, for tests and local runs without a database.
/// Status is kept as raw text, like the `status` column.
#[derive(Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<String, StoredOrder>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an order the way the checkout side would before redirecting to the gateway.
    pub async fn insert(&self, order: Order) {
        self.insert_with_status(&order.transaction_id, order.status.as_str(), order.return_url)
            .await;
    }

    /// Records a row whose status text was chosen by the checkout side, canonical or not.
    pub async fn insert_with_status(&self, transaction_id: &str, status: &str, return_url: Option<String>) {
        let mut orders = self.orders.write().await;
        orders.insert(
            transaction_id.to_string(),
            StoredOrder {
                status: status.to_string(),
                return_url,
            },
        );
    }

    pub async fn status(&self, transaction_id: &str) -> Option<String> {
        let orders = self.orders.read().await;
        orders.get(transaction_id).map(|order| order.status.clone())
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_order_by_transaction_id(&self, transaction_id: &str) -> Result<Option<OrderLookup>> {
        let orders = self.orders.read().await;
        Ok(orders.get(transaction_id).map(|order| OrderLookup {
            transaction_id: transaction_id.to_string(),
            return_url: order.return_url.clone(),
        }))
    }

    async fn update_order_status(&self, transaction_id: &str, status: OrderStatus) -> Result<usize> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(transaction_id) {
            Some(order) => {
                order.status = status.as_str().to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
