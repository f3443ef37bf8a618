//! Structural, business and referential validation of ICSR trees.

mod checks;
mod engine;
pub mod rules;
mod walk;

pub use engine::{RuleEngine, validate};
pub use rules::{Rule, RuleSet, catalogue};
