//! Remote classifier: hands the whole batch to a hosted language-model
//! endpoint. Best effort only; every failure shape (network, non-2xx,
//! timeout, schema mismatch) becomes an `Err` the importer recovers from
//! locally.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use paisa_core::records::{Category, Subscription, Transaction, TxnKind};
use paisa_ingest::types::RawMessage;

use crate::pipeline::{assemble, ParsedBatch};

/// Extraction instruction sent along with the batch.
const INSTRUCTIONS: &str = "\
You are an expert SMS transaction parser for Indian banking systems. \
Extract ONLY actual bank transactions (money sent or received); ignore \
promotional messages, offers, and advertisements. Valid patterns include \
'Sent Rs.X From BANK A/C *NNNN TO NAME On DD-MM', \
'Received Rs.X in BANK A/C *NNNN from NAME on DD-MM', \
'Rs.X debited from A/C', 'Rs.X credited to A/C'. \
For each transaction return: amount (number), type ('expense' or 'income'), \
description (brief), category (Food & Dining, Shopping, Transportation, \
Entertainment, Education, Bills & Utilities, Health, Travel, Subscriptions, \
Transfer, Income, Miscellaneous), date (YYYY-MM-DD). \
Respond with JSON: {\"transactions\": [...], \"subscriptions\": []}.";

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: 20,
        }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    prompt: &'static str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    transactions: Vec<WireTxn>,
    #[serde(default)]
    subscriptions: Vec<WireSub>,
}

#[derive(Deserialize)]
struct WireTxn {
    amount: f64,
    #[serde(rename = "type")]
    kind: String,
    description: String,
    category: String,
    date: String,
}

#[derive(Deserialize)]
struct WireSub {
    name: String,
    amount: f64,
    #[serde(rename = "renewalDate")]
    renewal_date: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    platform: String,
}

/// One POST per batch against a hosted extraction endpoint.
pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteClassifier {
    /// The request timeout doubles as the cancellation bound: a hung
    /// endpoint surfaces as an ordinary failure.
    pub fn new(cfg: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
        })
    }

    pub async fn classify(&self, messages: &[RawMessage], today: NaiveDate) -> Result<ParsedBatch> {
        let body = ClassifyRequest {
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    body: &m.body,
                    date: m.received_at.map(|ts| ts.to_rfc3339()),
                })
                .collect(),
            prompt: INSTRUCTIONS,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("classifier request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("classifier error: {status} {txt}");
        }

        let out: ClassifyResponse = resp.json().await.context("parse classifier response")?;
        normalize(out, today)
    }
}

/// Coerce the wire payload into canonical records: sign amounts from the
/// declared type, parse dates (falling back to `today`), map category labels,
/// drop zero amounts, then id + order like the local pipeline.
fn normalize(resp: ClassifyResponse, today: NaiveDate) -> Result<ParsedBatch> {
    let mut transactions = Vec::new();
    for wire in resp.transactions {
        let magnitude = wire.amount.abs();
        if magnitude == 0.0 || !magnitude.is_finite() {
            continue;
        }
        let amount = match wire.kind.as_str() {
            "expense" => -magnitude,
            "income" => magnitude,
            other => bail!("unknown transaction type: {other}"),
        };
        let date = parse_wire_date(&wire.date).unwrap_or(today);
        transactions.push(Transaction {
            id: String::new(),
            date,
            amount,
            description: wire.description.chars().take(100).collect(),
            category: Category::from_label(&wire.category).unwrap_or(Category::Miscellaneous),
            kind: TxnKind::from_signed(amount),
        });
    }

    let mut subscriptions = Vec::new();
    for wire in resp.subscriptions {
        if wire.amount <= 0.0 {
            continue;
        }
        subscriptions.push(Subscription {
            id: String::new(),
            name: wire.name,
            amount: wire.amount,
            renewal_date: parse_wire_date(&wire.renewal_date).unwrap_or(today),
            category: wire.category,
            platform: wire.platform,
        });
    }

    Ok(assemble(transactions, subscriptions))
}

fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn response(v: serde_json::Value) -> Result<ClassifyResponse> {
        Ok(serde_json::from_value(v)?)
    }

    #[test]
    fn test_normalize_signs_amounts_from_type() {
        let resp = response(json!({
            "transactions": [
                {"amount": 499.0, "type": "expense", "description": "Netflix",
                 "category": "Subscriptions", "date": "2025-05-14"},
                {"amount": 55000.0, "type": "income", "description": "Salary",
                 "category": "Income", "date": "2025-06-01"}
            ],
            "subscriptions": []
        }))
        .unwrap();
        let batch = normalize(resp, today()).unwrap();
        assert_eq!(batch.transactions[0].amount, 55_000.0); // sorted most recent first
        assert_eq!(batch.transactions[0].kind, TxnKind::Income);
        assert_eq!(batch.transactions[1].amount, -499.0);
        assert_eq!(batch.transactions[1].category, Category::Subscriptions);
        assert_eq!(batch.transactions[1].id, "txn-1");
    }

    #[test]
    fn test_normalize_drops_zero_amounts() {
        let resp = response(json!({
            "transactions": [
                {"amount": 0.0, "type": "expense", "description": "noise",
                 "category": "Miscellaneous", "date": "2025-05-14"}
            ]
        }))
        .unwrap();
        let batch = normalize(resp, today()).unwrap();
        assert!(batch.transactions.is_empty());
    }

    #[test]
    fn test_normalize_rejects_unknown_kind() {
        let resp = response(json!({
            "transactions": [
                {"amount": 10.0, "type": "maybe", "description": "?",
                 "category": "Miscellaneous", "date": "2025-05-14"}
            ]
        }))
        .unwrap();
        assert!(normalize(resp, today()).is_err());
    }

    #[test]
    fn test_normalize_coerces_bad_dates_to_today() {
        let resp = response(json!({
            "transactions": [
                {"amount": 12.0, "type": "expense", "description": "chai",
                 "category": "Food & Dining", "date": "yesterday-ish"}
            ]
        }))
        .unwrap();
        let batch = normalize(resp, today()).unwrap();
        assert_eq!(batch.transactions[0].date, today());
        assert_eq!(batch.transactions[0].category, Category::FoodDining);
    }

    #[test]
    fn test_missing_transactions_field_is_schema_failure() {
        assert!(response(json!({"results": []})).is_err());
    }

    #[test]
    fn test_unknown_category_label_falls_back() {
        let resp = response(json!({
            "transactions": [
                {"amount": 10.0, "type": "expense", "description": "?",
                 "category": "Gadgets", "date": "2025-05-14"}
            ]
        }))
        .unwrap();
        let batch = normalize(resp, today()).unwrap();
        assert_eq!(batch.transactions[0].category, Category::Miscellaneous);
    }
}
