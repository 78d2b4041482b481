//! Output record types for parsed bank-notification batches

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A transaction extracted from a single bank notification message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Synthetic identifier, unique within a parse batch (`txn-N`)
    pub id: String,
    /// Calendar date the transaction occurred
    pub date: NaiveDate,
    /// Signed amount in major currency units; negative = expense, positive = income
    pub amount: f64,
    /// Human-readable summary, at most 100 characters
    pub description: String,
    pub category: Category,
    /// Always consistent with the sign of `amount`
    #[serde(rename = "type")]
    pub kind: TxnKind,
}

/// A recurring-service charge recognized inside a transaction message.
///
/// Always derived from exactly one [`Transaction`]; never emitted on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    /// Synthetic identifier, unique within a parse batch (`sub-N`)
    pub id: String,
    /// Verbatim matched service text (e.g. "Netflix")
    pub name: String,
    /// Positive magnitude of the originating transaction
    pub amount: f64,
    /// Originating transaction date plus one calendar month
    #[serde(rename = "renewalDate")]
    pub renewal_date: NaiveDate,
    pub category: String,
    pub platform: String,
}

/// Direction of a transaction, derived from the sign of its amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxnKind {
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

impl TxnKind {
    /// The kind implied by a signed amount
    pub fn from_signed(amount: f64) -> TxnKind {
        if amount < 0.0 {
            TxnKind::Expense
        } else {
            TxnKind::Income
        }
    }
}

/// Closed set of spending categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "food-dining")]
    FoodDining,
    #[serde(rename = "shopping")]
    Shopping,
    #[serde(rename = "transportation")]
    Transportation,
    #[serde(rename = "entertainment")]
    Entertainment,
    #[serde(rename = "education")]
    Education,
    #[serde(rename = "bills-utilities")]
    BillsUtilities,
    #[serde(rename = "health")]
    Health,
    #[serde(rename = "travel")]
    Travel,
    #[serde(rename = "subscriptions")]
    Subscriptions,
    #[serde(rename = "transfer")]
    Transfer,
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "miscellaneous")]
    Miscellaneous,
}

impl Category {
    /// Display label as shown in statements and dashboards
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Shopping => "Shopping",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Education => "Education",
            Category::BillsUtilities => "Bills & Utilities",
            Category::Health => "Health",
            Category::Travel => "Travel",
            Category::Subscriptions => "Subscriptions",
            Category::Transfer => "Transfer",
            Category::Income => "Income",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    /// Parse a label or serde name back into a category.
    ///
    /// Accepts both "Food & Dining" and "food-dining"; unknown strings get `None`.
    pub fn from_label(s: &str) -> Option<Category> {
        let all = [
            Category::FoodDining,
            Category::Shopping,
            Category::Transportation,
            Category::Entertainment,
            Category::Education,
            Category::BillsUtilities,
            Category::Health,
            Category::Travel,
            Category::Subscriptions,
            Category::Transfer,
            Category::Income,
            Category::Miscellaneous,
        ];
        let s = s.trim();
        all.into_iter().find(|c| {
            c.label().eq_ignore_ascii_case(s) || serde_name(*c).eq_ignore_ascii_case(s)
        })
    }
}

fn serde_name(c: Category) -> &'static str {
    match c {
        Category::FoodDining => "food-dining",
        Category::Shopping => "shopping",
        Category::Transportation => "transportation",
        Category::Entertainment => "entertainment",
        Category::Education => "education",
        Category::BillsUtilities => "bills-utilities",
        Category::Health => "health",
        Category::Travel => "travel",
        Category::Subscriptions => "subscriptions",
        Category::Transfer => "transfer",
        Category::Income => "income",
        Category::Miscellaneous => "miscellaneous",
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Transaction {
    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_sign() {
        assert_eq!(TxnKind::from_signed(-499.0), TxnKind::Expense);
        assert_eq!(TxnKind::from_signed(1200.0), TxnKind::Income);
    }

    #[test]
    fn test_category_label_roundtrip() {
        assert_eq!(Category::from_label("Food & Dining"), Some(Category::FoodDining));
        assert_eq!(Category::from_label("bills-utilities"), Some(Category::BillsUtilities));
        assert_eq!(Category::from_label("Gambling"), None);
    }

    #[test]
    fn test_transaction_serializes_kind_as_type() {
        let txn = Transaction {
            id: "txn-0".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 14).unwrap(),
            amount: -499.0,
            description: "Netflix".to_string(),
            category: Category::Subscriptions,
            kind: TxnKind::Expense,
        };
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["category"], "subscriptions");
        assert!(txn.is_expense());
        assert_eq!(txn.abs_amount(), 499.0);
    }
}
