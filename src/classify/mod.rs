//! Detection filtering, follow-up decisions and rule resolution.

mod classifier;
pub mod filter;

pub use classifier::WasteClassifier;
