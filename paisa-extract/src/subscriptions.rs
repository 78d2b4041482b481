//! Known recurring-service roster. A hit here turns a parsed transaction
//! into a transaction + subscription pair.

use anyhow::Result;
use regex::Regex;

/// A recognized recurring service inside a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMatch {
    /// Verbatim matched text, e.g. "Netflix"
    pub name: String,
    pub category: &'static str,
    pub platform: &'static str,
}

struct ServiceRule {
    re: Regex,
    category: &'static str,
    platform: &'static str,
}

/// Matches message text against known streaming/music/edutech brands.
pub struct SubscriptionDetector {
    rules: Vec<ServiceRule>,
}

impl SubscriptionDetector {
    pub fn new() -> Result<Self> {
        let rules = vec![
            ServiceRule {
                re: Regex::new(
                    r"(?i)netflix|prime video|amazon prime|disney\+|hotstar|jiocinema|sonyliv",
                )?,
                category: "entertainment",
                platform: "ott",
            },
            ServiceRule {
                re: Regex::new(r"(?i)spotify|apple music|youtube music|gaana")?,
                category: "music",
                platform: "ott",
            },
            ServiceRule {
                re: Regex::new(
                    r"(?i)coursera|udemy|skillshare|pluralsight|linkedin learning|unacademy|byju",
                )?,
                category: "education",
                platform: "edutech",
            },
        ];
        Ok(Self { rules })
    }

    /// First roster family that matches wins.
    pub fn detect(&self, text: &str) -> Option<ServiceMatch> {
        self.rules.iter().find_map(|rule| {
            rule.re.find(text).map(|m| ServiceMatch {
                name: m.as_str().to_string(),
                category: rule.category,
                platform: rule.platform,
            })
        })
    }
}
