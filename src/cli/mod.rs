//! CLI argument parsing and command handling.

mod args;
pub mod help;
pub mod lookup;
pub mod rules;
pub mod validators;

pub use args::{
    ClassifyArgs, Cli, Command, ConfigAction, DetectorArgs, RulesAction, ServeArgs,
};
