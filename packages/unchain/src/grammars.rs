pub mod chain_rules;
pub mod types;

pub use types::{Chain, Grammar, Rule};
