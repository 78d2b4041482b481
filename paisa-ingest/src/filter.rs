//! Candidate filter: drops promotional noise, keeps messages that name a
//! known bank or payment provider.

use anyhow::Result;
use regex::Regex;

/// Case-insensitive substrings that mark a message as promotional.
///
/// The veto is unconditional: a message carrying both a valid transaction
/// pattern and one of these terms is still rejected.
const PROMO_TERMS: &[&str] = &[
    "offer",
    "cashback",
    "reward",
    "pre-approved",
    "preapproved",
    "loan",
    "discount",
    "coupon",
    "congratulations",
    "win ",
    "winner",
    "lucky draw",
    "sale",
    "apply now",
    "emi starting",
    "limited time",
];

/// Banks and payment apps we recognize as transaction senders.
const PROVIDERS: &str = concat!(
    r"(?i)\b(?:",
    r"hdfc|icici|sbi|axis|kotak|pnb|bob|idfc|canara|union bank|yes bank|indusind|",
    r"phonepe|google\s?pay|gpay|paytm|bhim|upi|amazon\s?pay",
    r")\b"
);

/// Decides whether a raw message is worth running through the rule table.
pub struct MessageFilter {
    provider_re: Regex,
}

impl MessageFilter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            provider_re: Regex::new(PROVIDERS)?,
        })
    }

    /// Candidate = not promotional AND names a known bank/provider.
    /// Everything else is silently dropped upstream.
    pub fn is_candidate(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        if PROMO_TERMS.iter().any(|term| lower.contains(term)) {
            return false;
        }
        self.provider_re.is_match(text)
    }
}
