//! Ordered regex rule table for bank notification formats.
//!
//! Each supported message family is one named [`MessageRule`]; new bank
//! formats are added as table rows, not as branching logic. UPI sent/received
//! phrasing is tried before the generic debit/credit families, and the first
//! matching rule wins outright.

use anyhow::Result;
use regex::{Captures, Regex};

use paisa_core::time::DateFragment;

use crate::types::{Direction, Extraction};

struct MessageRule {
    name: &'static str,
    direction: Direction,
    re: Regex,
}

/// Pulls amount, direction, counterparty and account fragments out of
/// candidate messages.
pub struct MessageExtractor {
    rules: Vec<MessageRule>,
    date_re: Regex,
}

impl MessageExtractor {
    pub fn new() -> Result<Self> {
        // "Amt Sent Rs.250.00 From HDFC BANK A/C *4567 TO RAHUL SHARMA On 10-06"
        let upi_sent = Regex::new(concat!(
            r"(?i)\b(?:amt\s+)?sent\s+(?:rs\.?|inr|₹)\s*(?P<amt>[\d,]+(?:\.\d{1,2})?)",
            r"\s+from\s+(?P<bank>.+?)\s+a/c\s+[*x]*(?P<acct>\d+)",
            r"\s+to\s+(?P<who>.+?)\s+on\b"
        ))?;

        // "Received Rs.500.00 in ICICI BANK A/C *8821 from PRIYA VERMA on 02-07"
        let upi_received = Regex::new(concat!(
            r"(?i)\breceived\s+(?:rs\.?|inr|₹)\s*(?P<amt>[\d,]+(?:\.\d{1,2})?)",
            r"\s+in\s+(?P<bank>.+?)\s+a/c\s+[*x]*(?P<acct>\d+)",
            r"\s+from\s+(?P<who>.+?)\s+on\b"
        ))?;

        // "Your A/c XX1234 has been debited INR 499.00 ..."
        let debit_verb_first = Regex::new(concat!(
            r"(?i)\b(?:debited|spent|paid|charged|deducted)\s+",
            r"(?:(?:by|with|for)\s+)?(?:rs\.?|inr|₹)?\s*",
            r"(?P<amt>[\d,]+(?:\.\d{1,2})?)"
        ))?;

        // "Rs.1,250.00 debited from A/C X1234"
        let debit_amount_first = Regex::new(concat!(
            r"(?i)(?:\brs\.?|\binr|₹)\s*(?P<amt>[\d,]+(?:\.\d{1,2})?)\s+",
            r"(?:has been\s+|was\s+|is\s+)?(?:debited|spent|paid|charged|deducted)\b"
        ))?;

        // "payment of Rs.349 to ..." / "txn of INR 2,000"
        let payment_of = Regex::new(concat!(
            r"(?i)\b(?:txn|transaction|payment)\s+of\s+(?:rs\.?|inr|₹)?\s*",
            r"(?P<amt>[\d,]+(?:\.\d{1,2})?)"
        ))?;

        // "credited with INR 55,000.00" / "received Rs.900"
        let credit_verb_first = Regex::new(concat!(
            r"(?i)\b(?:credited|received|deposited|added)\s+",
            r"(?:(?:with|by)\s+)?(?:rs\.?|inr|₹)?\s*",
            r"(?P<amt>[\d,]+(?:\.\d{1,2})?)"
        ))?;

        // "Rs.900 credited to A/C X8821"
        let credit_amount_first = Regex::new(concat!(
            r"(?i)(?:\brs\.?|\binr|₹)\s*(?P<amt>[\d,]+(?:\.\d{1,2})?)\s+",
            r"(?:has been\s+|was\s+|is\s+)?(?:credited|received|deposited)\b"
        ))?;

        let rules = vec![
            MessageRule { name: "upi-sent", direction: Direction::Debit, re: upi_sent },
            MessageRule { name: "upi-received", direction: Direction::Credit, re: upi_received },
            MessageRule { name: "debit-amount-first", direction: Direction::Debit, re: debit_amount_first },
            MessageRule { name: "debit-verb-first", direction: Direction::Debit, re: debit_verb_first },
            MessageRule { name: "payment-of", direction: Direction::Debit, re: payment_of },
            MessageRule { name: "credit-amount-first", direction: Direction::Credit, re: credit_amount_first },
            MessageRule { name: "credit-verb-first", direction: Direction::Credit, re: credit_verb_first },
        ];

        // "On 10-06" / "on 14-05-2025"; the fragment is hunted independently
        // of the amount rules so every family benefits from it.
        let date_re = Regex::new(r"(?i)\bon\s+(?P<day>\d{1,2})-(?P<mon>\d{1,2})(?:-(?P<yr>\d{4}))?\b")?;

        Ok(Self { rules, date_re })
    }

    /// Run the rule table against one message. First match wins; a matched
    /// rule whose amount fails numeric parse (or is zero) kills the whole
    /// message rather than falling through to later rules.
    pub fn extract(&self, text: &str) -> Option<Extraction> {
        for rule in &self.rules {
            let Some(caps) = rule.re.captures(text) else {
                continue;
            };
            let amount = parse_amount(&caps["amt"])?;
            return Some(Extraction {
                rule: rule.name,
                amount,
                direction: rule.direction,
                counterparty: optional_group(&caps, "who"),
                bank: optional_group(&caps, "bank"),
                account_ref: optional_group(&caps, "acct"),
                date_fragment: self.date_fragment(text),
            });
        }
        None
    }

    fn date_fragment(&self, text: &str) -> Option<DateFragment> {
        let caps = self.date_re.captures(text)?;
        Some(DateFragment {
            day: caps["day"].parse().ok()?,
            month: caps["mon"].parse().ok()?,
            year: caps.name("yr").and_then(|m| m.as_str().parse().ok()),
        })
    }
}

fn optional_group(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str().trim().trim_matches(&['.', ','][..]).to_string())
        .filter(|s| !s.is_empty())
}

/// Strip thousands separators (Indian or western grouping) and parse.
/// Zero is not a transaction.
fn parse_amount(raw: &str) -> Option<f64> {
    let amount: f64 = raw.replace(',', "").parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}
