//! paisa-extract: categorization, subscription detection, and the
//! remote-then-local extraction policy over filtered bank messages.

pub mod category_rules;
pub mod import;
pub mod pipeline;
pub mod remote;
pub mod subscriptions;

pub use category_rules::categorize;
pub use import::Importer;
pub use pipeline::{parse_messages, ParsedBatch, SmsEngine};
pub use remote::{RemoteClassifier, RemoteConfig};
pub use subscriptions::{ServiceMatch, SubscriptionDetector};
