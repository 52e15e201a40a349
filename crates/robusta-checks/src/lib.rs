//! Lint rules for the robusta analyzer.
//!
//! Each rule is a [`FileScanner`](robusta_syntax::scanner::FileScanner)
//! wrapping a tree visitor; [`CheckList::all`] returns the registered set in
//! a fixed order.

mod case_insensitive_comparison;
mod equals_overriden_with_hash_code;
mod if_condition_always_true_or_false;
mod nested_blocks;

pub use case_insensitive_comparison::CaseInsensitiveComparisonCheck;
pub use equals_overriden_with_hash_code::EqualsOverridenWithHashCodeCheck;
pub use if_condition_always_true_or_false::IfConditionAlwaysTrueOrFalseCheck;
pub use nested_blocks::NestedBlocksCheck;

use robusta_syntax::scanner::FileScanner;

pub struct CheckList;

impl CheckList {
    pub const REPOSITORY_KEY: &'static str = "java";

    pub fn all() -> Vec<Box<dyn FileScanner>> {
        vec![
            Box::new(IfConditionAlwaysTrueOrFalseCheck),
            Box::new(CaseInsensitiveComparisonCheck),
            Box::new(NestedBlocksCheck),
            Box::new(EqualsOverridenWithHashCodeCheck),
        ]
    }
}
