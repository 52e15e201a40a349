use robusta_syntax::scanner::{FileScanner, RuleKey, ScannerContext};
use robusta_syntax::tree::{Expression, IfStatement, Kind, TreeNode};
use robusta_syntax::visit::{walk_if_statement, TreeVisitor};

use crate::CheckList;

/// S1145: an `if` whose condition is a parenthesized boolean literal is
/// either dead code or an unconditional branch.
pub struct IfConditionAlwaysTrueOrFalseCheck;

impl IfConditionAlwaysTrueOrFalseCheck {
    pub const RULE_KEY: &'static str = "S1145";
}

impl FileScanner for IfConditionAlwaysTrueOrFalseCheck {
    fn rule_key(&self) -> RuleKey {
        RuleKey::of(CheckList::REPOSITORY_KEY, Self::RULE_KEY)
    }

    fn scan_file(&mut self, context: &ScannerContext<'_>) {
        let mut visitor = IfConditionVisitor {
            context,
            rule_key: self.rule_key(),
        };
        context.tree().accept(&mut visitor);
    }
}

struct IfConditionVisitor<'c, 'a> {
    context: &'c ScannerContext<'a>,
    rule_key: RuleKey,
}

impl TreeVisitor for IfConditionVisitor<'_, '_> {
    fn visit_if_statement(&mut self, tree: &IfStatement) {
        if let Expression::Parenthesized(parenthesized) = tree.condition() {
            if parenthesized.expression().is(Kind::BooleanLiteral) {
                self.context
                    .add_issue(tree, &self.rule_key, "Remove this if statement.");
            }
        }

        walk_if_statement(self, tree);
    }
}
