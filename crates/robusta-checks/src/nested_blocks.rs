use robusta_syntax::scanner::{FileScanner, RuleKey, ScannerContext};
use robusta_syntax::tree::{Block, CaseGroup, Statement, TreeNode};
use robusta_syntax::visit::{walk_block, walk_case_group, TreeVisitor};

use crate::CheckList;

/// S1199: a bare block nested directly inside a block or case group usually
/// hides code that wants to be a method.
pub struct NestedBlocksCheck;

impl NestedBlocksCheck {
    pub const RULE_KEY: &'static str = "S1199";
}

impl FileScanner for NestedBlocksCheck {
    fn rule_key(&self) -> RuleKey {
        RuleKey::of(CheckList::REPOSITORY_KEY, Self::RULE_KEY)
    }

    fn scan_file(&mut self, context: &ScannerContext<'_>) {
        let mut visitor = NestedBlocksVisitor {
            context,
            rule_key: self.rule_key(),
        };
        context.tree().accept(&mut visitor);
    }
}

struct NestedBlocksVisitor<'c, 'a> {
    context: &'c ScannerContext<'a>,
    rule_key: RuleKey,
}

impl NestedBlocksVisitor<'_, '_> {
    fn check_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            if let Statement::Block(block) = statement {
                self.context.add_issue(
                    block,
                    &self.rule_key,
                    "Extract this nested code block into a method.",
                );
            }
        }
    }
}

impl TreeVisitor for NestedBlocksVisitor<'_, '_> {
    fn visit_case_group(&mut self, tree: &CaseGroup) {
        self.check_statements(tree.body());
        walk_case_group(self, tree);
    }

    fn visit_block(&mut self, tree: &Block) {
        self.check_statements(tree.body());
        walk_block(self, tree);
    }
}
