use chrono::{DateTime, Utc};
use paisa_core::time::DateFragment;
use serde::{Deserialize, Serialize};

/// A raw notification message as handed over by the caller.
///
/// The engine never reads a device inbox itself; callers supply already
/// retrieved text plus, when known, the receipt timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    pub body: String,
    /// When the message arrived on the device, if the source recorded it
    pub received_at: Option<DateTime<Utc>>,
}

impl RawMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            received_at: None,
        }
    }

    pub fn with_received_at(body: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            body: body.into(),
            received_at: Some(received_at),
        }
    }
}

/// Whether money left or entered the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Debit,
    Credit,
}

/// Normalized output of the pattern rule table (message-format agnostic)
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Name of the rule that matched, for diagnostics
    pub rule: &'static str,
    /// Positive magnitude in major currency units, thousands separators stripped
    pub amount: f64,
    pub direction: Direction,
    /// Receiver (debit) or sender (credit) when the format names one
    pub counterparty: Option<String>,
    /// Issuing bank fragment, e.g. "HDFC BANK"
    pub bank: Option<String>,
    /// Masked account digits, e.g. "4567"
    pub account_ref: Option<String>,
    /// DD-MM(-YYYY) fragment found anywhere in the message
    pub date_fragment: Option<DateFragment>,
}
