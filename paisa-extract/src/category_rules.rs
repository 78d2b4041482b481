//! Deterministic category rules mapping message text + counterparty
//! to a spending [`Category`].
//!
//! Prioritized keyword families evaluated top to bottom; the personal-name
//! heuristic and the Miscellaneous fallback keep the function total.

use paisa_core::Category;

/// Categorize a message. Never fails; unmatched text lands in Miscellaneous.
/// Priority: keyword families > personal-name counterparty (Transfer) > fallback.
pub fn categorize(text: &str, counterparty: Option<&str>) -> Category {
    let mut haystack = text.to_lowercase();
    if let Some(who) = counterparty {
        haystack.push(' ');
        haystack.push_str(&who.to_lowercase());
    }
    let has = |terms: &[&str]| terms.iter().any(|t| haystack.contains(t));

    if has(&["grocery", "restaurant", "cafe", "dining", "swiggy", "zomato", "dominos", "food"]) {
        return Category::FoodDining;
    }

    if has(&["movie", "cinema", "bookmyshow", "pvr", "concert", "entertainment"]) {
        return Category::Entertainment;
    }

    if has(&["uber", "ola ", "rapido", "metro", "petrol", "fuel", "cab", "parking", "transport"]) {
        return Category::Transportation;
    }

    if has(&["amazon", "flipkart", "myntra", "shopping", "store", "mall", "mart"]) {
        return Category::Shopping;
    }

    if has(&["bill", "electricity", "water", "gas", "recharge", "broadband", "internet", "dth", "postpaid", "insurance", "utility"]) {
        return Category::BillsUtilities;
    }

    if has(&["tuition", "school", "college", "university", "course", "udemy", "exam fee"]) {
        return Category::Education;
    }

    if has(&["hospital", "pharmacy", "clinic", "medical", "doctor", "apollo", "medplus", "gym", "fitness"]) {
        return Category::Health;
    }

    if has(&["flight", "hotel", "irctc", "train", "airlines", "makemytrip", "goibibo", "travel"]) {
        return Category::Travel;
    }

    if has(&["salary", "payroll", "stipend", "refund", "interest credited", "dividend"]) {
        return Category::Income;
    }

    if has(&["subscription", "membership", "renewal", "netflix", "spotify", "hotstar", "prime video"]) {
        return Category::Subscriptions;
    }

    if has(&["transfer", "imps", "neft", "rtgs"]) {
        return Category::Transfer;
    }

    // A counterparty that reads like a person's name and matched nothing
    // above is a peer-to-peer transfer.
    if counterparty.is_some_and(looks_like_person) {
        return Category::Transfer;
    }

    Category::Miscellaneous
}

/// Two capitalized words, letters only ("Rahul Sharma", "RAHUL SHARMA").
fn looks_like_person(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    words.len() == 2
        && words.iter().all(|w| {
            let mut chars = w.chars();
            chars.next().is_some_and(|c| c.is_uppercase()) && chars.all(|c| c.is_alphabetic())
        })
}
