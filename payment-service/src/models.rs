use diesel::prelude::*;
use shared::OrderLookup;

/// Columns the reconciliation flow reads back from an order row.
#[derive(Debug, Clone, Queryable)]
pub struct OrderRecord {
    pub transaction_id: String,
    pub return_url: Option<String>,
}

impl From<OrderRecord> for OrderLookup {
    fn from(record: OrderRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            return_url: record.return_url,
        }
    }
}

/// Row shape written by the checkout side. Only used to seed the table in tests.
#[cfg(test)]
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub id: uuid::Uuid,
    pub transaction_id: String,
    pub product_id: String,
    pub amount: bigdecimal::BigDecimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub status: String,
    pub return_url: Option<String>,
}
