//! paisa-ingest: bank-notification filtering and regex extraction.

pub mod filter;
pub mod rules;
pub mod types;

pub use filter::MessageFilter;
pub use rules::MessageExtractor;
pub use types::{Direction, Extraction, RawMessage};
