//! Disposal rules and follow-up questions.
//!
//! Both tables are read-only after loading and are shared between requests
//! behind an `Arc`.

mod catalog;
mod loader;
mod table;
mod types;

pub use catalog::FollowupCatalog;
pub use loader::RuleBook;
pub use table::{CityRules, RuleTable, SubtypeRules};
pub use types::{City, FollowupOption, FollowupPrompt, Recommendation};
