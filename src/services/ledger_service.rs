use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::{Holding, LedgerEntry};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Enter a valid amount.")]
    InvalidAmount,

    #[error("Not enough cash.")]
    InsufficientFunds,

    #[error("You don't have that many shares.")]
    InsufficientShares,

    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}

fn check_trade_inputs(shares: i64, price: f64) -> Result<(), LedgerError> {
    if shares <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}

/// Debits cash and appends a positive-shares ledger row, atomically.
pub async fn buy(
    pool: &SqlitePool,
    user_id: i64,
    symbol: &str,
    shares: i64,
    price: f64,
) -> Result<LedgerEntry, LedgerError> {
    check_trade_inputs(shares, price)?;

    let sym = symbol.trim().to_uppercase();
    let cost = (shares as f64) * price;

    let mut tx = pool.begin().await?;

    // Guarded debit: the predicate keeps concurrent buys from overdrawing.
    let updated = sqlx::query("UPDATE users SET cash = cash - ?1 WHERE id = ?2 AND cash >= ?1")
        .bind(cost)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(LedgerError::InsufficientFunds);
    }

    let now = Utc::now().timestamp();

    let inserted = sqlx::query(
        "INSERT INTO transactions (user_id, symbol, shares, price, created_at)
            VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&sym)
    .bind(shares)
    .bind(price)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(LedgerEntry {
        id: inserted.last_insert_rowid(),
        user_id,
        symbol: sym,
        shares,
        price,
        created_at: now,
    })
}

/// Credits cash and appends a negative-shares ledger row, atomically.
///
/// The holding check sums every prior row for the symbol, so partial sells
/// and re-buys are accounted for.
pub async fn sell(
    pool: &SqlitePool,
    user_id: i64,
    symbol: &str,
    shares: i64,
    price: f64,
) -> Result<LedgerEntry, LedgerError> {
    check_trade_inputs(shares, price)?;

    let sym = symbol.trim().to_uppercase();
    let proceeds = (shares as f64) * price;

    let mut tx = pool.begin().await?;

    let held: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(shares), 0) FROM transactions WHERE user_id = ? AND symbol = ?",
    )
    .bind(user_id)
    .bind(&sym)
    .fetch_one(&mut *tx)
    .await?;

    if shares > held {
        return Err(LedgerError::InsufficientShares);
    }

    sqlx::query("UPDATE users SET cash = cash + ? WHERE id = ?")
        .bind(proceeds)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let now = Utc::now().timestamp();

    let inserted = sqlx::query(
        "INSERT INTO transactions (user_id, symbol, shares, price, created_at)
            VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&sym)
    .bind(-shares)
    .bind(price)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(LedgerEntry {
        id: inserted.last_insert_rowid(),
        user_id,
        symbol: sym,
        shares: -shares,
        price,
        created_at: now,
    })
}

pub async fn deposit(pool: &SqlitePool, user_id: i64, amount: f64) -> Result<(), LedgerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::InvalidAmount);
    }

    sqlx::query("UPDATE users SET cash = cash + ? WHERE id = ?")
        .bind(amount)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Net shares per symbol, derived from the full ledger. Never cached.
pub async fn holdings(pool: &SqlitePool, user_id: i64) -> Result<Vec<Holding>, LedgerError> {
    let rows = sqlx::query_as::<_, Holding>(
        "SELECT symbol, CAST(SUM(shares) AS INTEGER) AS shares
            FROM transactions
            WHERE user_id = ?
            GROUP BY symbol
            ORDER BY symbol",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Symbols the user could sell right now (net holding > 0), for the sell form.
pub async fn sellable_symbols(pool: &SqlitePool, user_id: i64) -> Result<Vec<String>, LedgerError> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT symbol FROM transactions
            WHERE user_id = ?
            GROUP BY symbol
            HAVING SUM(shares) > 0
            ORDER BY symbol",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn history(pool: &SqlitePool, user_id: i64) -> Result<Vec<LedgerEntry>, LedgerError> {
    let rows = sqlx::query_as::<_, LedgerEntry>(
        "SELECT id, user_id, symbol, shares, price, created_at
            FROM transactions
            WHERE user_id = ?
            ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn cash(pool: &SqlitePool, user_id: i64) -> Result<f64, LedgerError> {
    let cash: f64 = sqlx::query_scalar("SELECT cash FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(cash)
}
