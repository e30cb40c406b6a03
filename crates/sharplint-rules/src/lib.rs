//! sharplint rules
//!
//! Built-in layout, spacing and maintainability rules and the registry that
//! turns them into the active [`RuleSet`](sharplint_core::RuleSet).

pub mod builtin;
pub mod registry;

// Re-export commonly used types
pub use builtin::{
    ArithmeticPrecedence, ClosingBraceBlankLine, ConditionalPrecedence, DocHeaderBlankLine,
    FileStartBlankLine, OpeningBraceSpacing, all_rules,
};
pub use registry::{RuleRegistry, rule_set};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
