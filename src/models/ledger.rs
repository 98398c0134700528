use serde::{Deserialize, Serialize};

/// One immutable row of the transactions table.
///
/// `shares` is signed: positive = bought, negative = sold. Never zero.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
    pub price: f64,

    // unix timestamp (seconds)
    pub created_at: i64,
}

/// Net shares of one symbol, derived by summing the user's ledger rows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holding {
    pub symbol: String,
    pub shares: i64,
}
