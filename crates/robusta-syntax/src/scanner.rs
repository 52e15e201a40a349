//! Per-file check harness.
//!
//! A check receives the typed tree through a [`ScannerContext`] and reports
//! issues against tree nodes; the context resolves each node to its source
//! line through the provenance stamped at build time. [`run_checks`] drives
//! every registered check over one compilation unit, isolating failures: a
//! panicking check is logged against its rule and the pass continues with
//! the next check.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::tree::{CompilationUnit, TreeNode};

/// Identifies a rule within a rule repository, e.g. `java:S1145`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    repository: String,
    rule: String,
}

impl RuleKey {
    pub fn of(repository: impl Into<String>, rule: impl Into<String>) -> RuleKey {
        RuleKey {
            repository: repository.into(),
            rule: rule.into(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub rule_key: RuleKey,
    pub message: String,
    /// 1-based source line of the node the issue was reported on.
    pub line: u32,
}

/// A rule: a visitor paired with per-file bootstrap logic.
pub trait FileScanner {
    fn rule_key(&self) -> RuleKey;

    /// Invoked once per compilation unit.
    fn scan_file(&mut self, context: &ScannerContext<'_>);
}

/// Per-file state handed to a check; owned by one check at a time.
///
/// The issue sink is append-only behind interior mutability so a check can
/// keep a shared borrow of the tree while reporting (the whole pass is
/// single-threaded).
pub struct ScannerContext<'a> {
    tree: &'a CompilationUnit,
    issues: RefCell<Vec<Issue>>,
}

impl<'a> ScannerContext<'a> {
    pub fn new(tree: &'a CompilationUnit) -> ScannerContext<'a> {
        ScannerContext {
            tree,
            issues: RefCell::new(Vec::new()),
        }
    }

    pub fn tree(&self) -> &'a CompilationUnit {
        self.tree
    }

    pub fn add_issue(&self, node: &impl TreeNode, rule_key: &RuleKey, message: impl Into<String>) {
        self.issues.borrow_mut().push(Issue {
            rule_key: rule_key.clone(),
            message: message.into(),
            line: node.line(),
        });
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues.into_inner()
    }
}

/// Runs every check over one compilation unit, in order.
///
/// Issues appear in traversal-encounter order per check, checks in
/// invocation order. A check that panics keeps the issues it reported before
/// failing and never aborts the pass.
pub fn run_checks(tree: &CompilationUnit, checks: &mut [Box<dyn FileScanner>]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for check in checks.iter_mut() {
        let context = ScannerContext::new(tree);
        let outcome = catch_unwind(AssertUnwindSafe(|| check.scan_file(&context)));
        if let Err(payload) = outcome {
            tracing::error!(
                rule = %check.rule_key(),
                "check failed: {}",
                panic_message(payload.as_ref())
            );
        }
        issues.extend(context.into_issues());
    }
    issues
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return message;
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.as_str();
    }
    "<non-string panic payload>"
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::build_compilation_unit;
    use crate::cst::tree;
    use crate::syntax_kind::SyntaxKind;

    fn empty_unit() -> CompilationUnit {
        build_compilation_unit(&tree(SyntaxKind::CompilationUnit, vec![])).unwrap()
    }

    struct AlwaysReports;

    impl FileScanner for AlwaysReports {
        fn rule_key(&self) -> RuleKey {
            RuleKey::of("test", "R1")
        }

        fn scan_file(&mut self, context: &ScannerContext<'_>) {
            context.add_issue(context.tree(), &self.rule_key(), "unit seen");
        }
    }

    struct ReportsThenPanics;

    impl FileScanner for ReportsThenPanics {
        fn rule_key(&self) -> RuleKey {
            RuleKey::of("test", "R2")
        }

        fn scan_file(&mut self, context: &ScannerContext<'_>) {
            context.add_issue(context.tree(), &self.rule_key(), "before the failure");
            panic!("rule blew up");
        }
    }

    #[test]
    fn issues_are_collected_in_check_order() {
        let unit = empty_unit();
        let mut checks: Vec<Box<dyn FileScanner>> =
            vec![Box::new(AlwaysReports), Box::new(AlwaysReports)];
        let issues = run_checks(&unit, &mut checks);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].rule_key, RuleKey::of("test", "R1"));
    }

    #[test]
    fn a_panicking_check_does_not_abort_the_pass() {
        let unit = empty_unit();
        let mut checks: Vec<Box<dyn FileScanner>> =
            vec![Box::new(ReportsThenPanics), Box::new(AlwaysReports)];
        let issues = run_checks(&unit, &mut checks);
        assert_eq!(
            issues
                .iter()
                .map(|issue| issue.rule_key.rule())
                .collect::<Vec<_>>(),
            vec!["R2", "R1"]
        );
        assert_eq!(issues[0].message, "before the failure");
    }

    #[test]
    fn rule_keys_render_as_repository_and_rule() {
        assert_eq!(RuleKey::of("java", "S1145").to_string(), "java:S1145");
    }
}
