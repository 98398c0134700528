use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::Quote;

/// Price source capability. Absence (unknown symbol, network failure) is a
/// normal outcome, never an error the caller has to unwrap.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Option<Quote>;
}

#[derive(Clone)]
pub struct FinnhubClient {
    http: Client,
    api_key: String,
}

impl FinnhubClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }

    async fn quote(&self, symbol: &str) -> Result<QuoteResponse, String> {
        let url = "https://finnhub.io/api/v1/quote";
        let res = self
            .http
            .get(url)
            .query(&[("symbol", symbol), ("token", &self.api_key)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("Finnhub quote failed: {status} {body}"));
        }

        res.json::<QuoteResponse>().await.map_err(|e| e.to_string())
    }

    async fn profile(&self, symbol: &str) -> Result<ProfileResponse, String> {
        let url = "https://finnhub.io/api/v1/stock/profile2";
        let res = self
            .http
            .get(url)
            .query(&[("symbol", symbol), ("token", &self.api_key)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("Finnhub profile failed: {status} {body}"));
        }

        res.json::<ProfileResponse>().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl QuoteSource for FinnhubClient {
    async fn lookup(&self, symbol: &str) -> Option<Quote> {
        let quote = match self.quote(symbol).await {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!("quote lookup for {symbol} failed: {e}");
                return None;
            }
        };

        // Finnhub answers unknown symbols with an all-zero quote.
        if quote.c <= 0.0 {
            return None;
        }

        let name = self
            .profile(symbol)
            .await
            .ok()
            .and_then(|p| p.name)
            .unwrap_or_else(|| symbol.to_string());

        Some(Quote {
            symbol: symbol.to_string(),
            name,
            price: quote.c,
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuoteResponse {
    // current
    pub c: f64,
    // change
    pub d: f64,
    // percent change
    pub dp: f64,
    // high
    pub h: f64,
    // low
    pub l: f64,
    // open
    pub o: f64,
    // previous close
    pub pc: f64,
    // timestamp
    pub t: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileResponse {
    pub name: Option<String>,
}

/// Fixed-price source so controller tests never touch the network.
#[derive(Default, Clone)]
pub struct StaticQuotes {
    prices: HashMap<String, (String, f64)>,
}

impl StaticQuotes {
    pub fn with(mut self, symbol: &str, name: &str, price: f64) -> Self {
        self.prices
            .insert(symbol.to_uppercase(), (name.to_string(), price));
        self
    }
}

#[async_trait]
impl QuoteSource for StaticQuotes {
    async fn lookup(&self, symbol: &str) -> Option<Quote> {
        let (name, price) = self.prices.get(&symbol.to_uppercase())?;
        Some(Quote {
            symbol: symbol.to_uppercase(),
            name: name.clone(),
            price: *price,
        })
    }
}
