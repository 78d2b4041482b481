//! Local extraction pipeline: filter -> rule table -> categorize ->
//! subscription detect -> assemble.
//!
//! Pure with respect to its inputs; nothing global is read or written, so
//! re-running a batch yields identical records.

use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use paisa_core::records::{Subscription, Transaction, TxnKind};
use paisa_core::time::{add_one_month, local_date, parse_timezone, resolve_day_month};
use paisa_ingest::types::{Direction, Extraction, RawMessage};
use paisa_ingest::{MessageExtractor, MessageFilter};

use crate::category_rules::categorize;
use crate::subscriptions::SubscriptionDetector;

const DESCRIPTION_MAX: usize = 100;
const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// Everything one scan produced. Fresh on every invocation; merging into
/// previously persisted state is the caller's problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedBatch {
    pub transactions: Vec<Transaction>,
    pub subscriptions: Vec<Subscription>,
}

impl ParsedBatch {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.subscriptions.is_empty()
    }

    /// Net signed effect of the batch (income minus expenses). Callers that
    /// persist a running balance add this to their stored value.
    pub fn net_change(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

/// The deterministic regex pipeline over a batch of raw messages.
pub struct SmsEngine {
    filter: MessageFilter,
    extractor: MessageExtractor,
    services: SubscriptionDetector,
    tz: Tz,
}

impl SmsEngine {
    pub fn new() -> Result<Self> {
        Self::with_timezone(DEFAULT_TIMEZONE)
    }

    /// `tz` localizes receipt timestamps when a message carries no date
    /// fragment of its own.
    pub fn with_timezone(tz: &str) -> Result<Self> {
        Ok(Self {
            filter: MessageFilter::new()?,
            extractor: MessageExtractor::new()?,
            services: SubscriptionDetector::new()?,
            tz: parse_timezone(tz)?,
        })
    }

    /// Parse one batch. Total for well-formed input: unmatched or promotional
    /// messages are skipped, never errors. `today` anchors DD-MM fragments
    /// and is the last-resort transaction date.
    pub fn parse(&self, messages: &[RawMessage], today: NaiveDate) -> ParsedBatch {
        let mut transactions = Vec::new();
        let mut subscriptions = Vec::new();

        for msg in messages {
            if !self.filter.is_candidate(&msg.body) {
                debug!(body = %preview(&msg.body), "not a candidate, skipping");
                continue;
            }
            let Some(extraction) = self.extractor.extract(&msg.body) else {
                debug!(body = %preview(&msg.body), "no rule matched, skipping");
                continue;
            };

            let date = extraction
                .date_fragment
                .and_then(|frag| resolve_day_month(frag, today))
                .or_else(|| msg.received_at.map(|ts| local_date(ts, self.tz)))
                .unwrap_or(today);

            let amount = match extraction.direction {
                Direction::Debit => -extraction.amount,
                Direction::Credit => extraction.amount,
            };

            if let Some(service) = self.services.detect(&msg.body) {
                subscriptions.push(Subscription {
                    id: String::new(),
                    name: service.name,
                    amount: extraction.amount,
                    renewal_date: add_one_month(date),
                    category: service.category.to_string(),
                    platform: service.platform.to_string(),
                });
            }

            transactions.push(Transaction {
                id: String::new(),
                date,
                amount,
                description: describe(&msg.body, &extraction),
                category: categorize(&msg.body, extraction.counterparty.as_deref()),
                kind: TxnKind::from_signed(amount),
            });
        }

        assemble(transactions, subscriptions)
    }
}

/// One-shot convenience over [`SmsEngine`] with the default timezone.
/// Errors only if the built-in rosters fail to compile.
pub fn parse_messages(messages: &[RawMessage], today: NaiveDate) -> Result<ParsedBatch> {
    Ok(SmsEngine::new()?.parse(messages, today))
}

/// Assign batch-scoped sequential ids and order transactions most recent
/// first. The sort is stable, so same-day records keep message order.
pub fn assemble(
    mut transactions: Vec<Transaction>,
    mut subscriptions: Vec<Subscription>,
) -> ParsedBatch {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    for (i, txn) in transactions.iter_mut().enumerate() {
        txn.id = format!("txn-{i}");
    }
    for (i, sub) in subscriptions.iter_mut().enumerate() {
        sub.id = format!("sub-{i}");
    }
    ParsedBatch {
        transactions,
        subscriptions,
    }
}

/// Either a synthesized "Sent to X via Y" phrase (when the format named a
/// counterparty) or the raw body, capped at 100 characters.
fn describe(body: &str, extraction: &Extraction) -> String {
    let text = match (&extraction.counterparty, extraction.direction) {
        (Some(who), Direction::Debit) => {
            format!("Sent to {} via {}", who, extraction.bank.as_deref().unwrap_or("UPI"))
        }
        (Some(who), Direction::Credit) => {
            format!("Received from {} via {}", who, extraction.bank.as_deref().unwrap_or("UPI"))
        }
        (None, _) => body.to_string(),
    };
    truncate(&text, DESCRIPTION_MAX)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn preview(body: &str) -> String {
    truncate(body, 40)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn engine() -> SmsEngine {
        SmsEngine::new().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_debit_and_credit_signs() {
        let messages = [
            RawMessage::new("HDFC Bank: Rs.250.00 debited from A/C X4567 on 10-06"),
            RawMessage::new("Received Rs.500.00 in ICICI BANK A/C *8821 from PRIYA VERMA on 02-06"),
        ];
        let batch = engine().parse(&messages, today());
        assert_eq!(batch.transactions.len(), 2);

        let debit = &batch.transactions[0]; // 10-06 sorts first
        assert_eq!(debit.amount, -250.0);
        assert_eq!(debit.kind, TxnKind::Expense);

        let credit = &batch.transactions[1];
        assert_eq!(credit.amount, 500.0);
        assert_eq!(credit.kind, TxnKind::Income);
    }

    #[test]
    fn test_synthesized_description() {
        let messages =
            [RawMessage::new("Amt Sent Rs.250.00 From HDFC BANK A/C *4567 TO RAHUL SHARMA On 10-06")];
        let batch = engine().parse(&messages, today());
        assert_eq!(batch.transactions[0].description, "Sent to RAHUL SHARMA via HDFC BANK");
    }

    #[test]
    fn test_raw_body_description_is_capped() {
        let long_tail = "x".repeat(200);
        let body = format!("HDFC Bank: Rs.99.00 debited from A/C X1 {long_tail}");
        let batch = engine().parse(&[RawMessage::new(body)], today());
        assert_eq!(batch.transactions[0].description.chars().count(), 100);
    }

    #[test]
    fn test_receipt_timestamp_backfills_missing_fragment() {
        // 20:30 UTC is past midnight in IST, so the local date is June 11.
        let ts = Utc.with_ymd_and_hms(2025, 6, 10, 20, 30, 0).unwrap();
        let messages = [RawMessage::with_received_at(
            "Axis Bank: Rs.75.00 debited from A/C X7 for metro card",
            ts,
        )];
        let batch = engine().parse(&messages, today());
        assert_eq!(batch.transactions[0].date, NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
    }

    #[test]
    fn test_today_is_last_resort_date() {
        let messages = [RawMessage::new("Axis Bank: Rs.75.00 debited from A/C X7")];
        let batch = engine().parse(&messages, today());
        assert_eq!(batch.transactions[0].date, today());
    }

    #[test]
    fn test_non_candidates_contribute_nothing() {
        let messages = [
            RawMessage::new("Get 50% cashback on your next Amazon order! Limited time offer."),
            RawMessage::new("Your OTP is 4455"),
        ];
        let batch = engine().parse(&messages, today());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_assemble_orders_and_ids() {
        let messages = [
            RawMessage::new("HDFC Bank: Rs.10.00 debited from A/C X1 on 01-06"),
            RawMessage::new("HDFC Bank: Rs.20.00 debited from A/C X1 on 12-06"),
            RawMessage::new("HDFC Bank: Rs.30.00 debited from A/C X1 on 05-06"),
        ];
        let batch = engine().parse(&messages, today());
        let dates: Vec<_> = batch.transactions.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, ["2025-06-12", "2025-06-05", "2025-06-01"]);
        let ids: Vec<_> = batch.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["txn-0", "txn-1", "txn-2"]);
    }

    #[test]
    fn test_subscription_rides_on_transaction() {
        let messages = [RawMessage::new(
            "HDFC Bank: Your A/c XX1234 has been debited INR 499.00 on 14-05-2025 for Netflix subscription",
        )];
        let batch = engine().parse(&messages, today());
        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.subscriptions.len(), 1);

        let sub = &batch.subscriptions[0];
        assert_eq!(sub.id, "sub-0");
        assert_eq!(sub.name, "Netflix");
        assert_eq!(sub.amount, 499.0);
        assert_eq!(sub.renewal_date, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());
    }

    #[test]
    fn test_service_name_without_amount_emits_nothing() {
        // Subscription records only ever ride on an extracted transaction.
        let messages = [RawMessage::new("HDFC Bank: Netflix is now available on your smart TV")];
        let batch = engine().parse(&messages, today());
        assert!(batch.subscriptions.is_empty());
        assert!(batch.transactions.is_empty());
    }

    #[test]
    fn test_net_change_sums_signed_amounts() {
        let messages = [
            RawMessage::new("HDFC Bank: Rs.250.00 debited from A/C X4567 on 10-06"),
            RawMessage::new("Received Rs.500.00 in ICICI BANK A/C *8821 from PRIYA VERMA on 02-06"),
        ];
        let batch = engine().parse(&messages, today());
        assert_eq!(batch.net_change(), 250.0);
    }

    #[test]
    fn test_repeat_charges_are_separate_subscription_events() {
        // One entry per billing message; batches are not deduplicated.
        let messages = [
            RawMessage::new("HDFC Bank: Rs.499.00 debited from A/C X1 for Netflix on 01-05"),
            RawMessage::new("HDFC Bank: Rs.499.00 debited from A/C X1 for Netflix on 01-06"),
        ];
        let batch = engine().parse(&messages, today());
        assert_eq!(batch.subscriptions.len(), 2);
    }
}
