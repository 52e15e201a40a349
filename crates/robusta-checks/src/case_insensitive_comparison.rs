use robusta_syntax::scanner::{FileScanner, RuleKey, ScannerContext};
use robusta_syntax::tree::{Expression, MethodInvocation, TreeNode};
use robusta_syntax::visit::{walk_method_invocation, TreeVisitor};

use crate::CheckList;

/// S1157: `equals` combined with `toUpperCase`/`toLowerCase` should be a
/// single `equalsIgnoreCase` call.
pub struct CaseInsensitiveComparisonCheck;

impl CaseInsensitiveComparisonCheck {
    pub const RULE_KEY: &'static str = "S1157";
}

impl FileScanner for CaseInsensitiveComparisonCheck {
    fn rule_key(&self) -> RuleKey {
        RuleKey::of(CheckList::REPOSITORY_KEY, Self::RULE_KEY)
    }

    fn scan_file(&mut self, context: &ScannerContext<'_>) {
        let mut visitor = ComparisonVisitor {
            context,
            rule_key: self.rule_key(),
        };
        context.tree().accept(&mut visitor);
    }
}

struct ComparisonVisitor<'c, 'a> {
    context: &'c ScannerContext<'a>,
    rule_key: RuleKey,
}

impl TreeVisitor for ComparisonVisitor<'_, '_> {
    fn visit_method_invocation(&mut self, tree: &MethodInvocation) {
        if let Expression::MemberSelect(select) = tree.method_select() {
            let issue = select.identifier().name() == "equals"
                && (changes_case(select.expression())
                    || (tree.arguments().len() == 1 && changes_case(&tree.arguments()[0])));
            if issue {
                self.context.add_issue(
                    tree,
                    &self.rule_key,
                    "Replace these toUpperCase()/toLowerCase() and equals() calls \
                     with a single equalsIgnoreCase() call.",
                );
            }
        }

        walk_method_invocation(self, tree);
    }
}

fn changes_case(expression: &Expression) -> bool {
    let Expression::MethodInvocation(invocation) = expression else {
        return false;
    };
    let Expression::MemberSelect(select) = invocation.method_select() else {
        return false;
    };
    matches!(select.identifier().name(), "toUpperCase" | "toLowerCase")
}
