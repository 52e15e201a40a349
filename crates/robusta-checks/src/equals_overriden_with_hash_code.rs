use robusta_syntax::scanner::{FileScanner, RuleKey, ScannerContext};
use robusta_syntax::tree::{ClassDecl, Kind, Member, MethodDecl, TreeNode};
use robusta_syntax::visit::{walk_class, TreeVisitor};

use crate::CheckList;

const EQUALS: &str = "equals";
const HASH_CODE: &str = "hashCode";

/// S1206: overriding one of `equals`/`hashCode` without the other breaks
/// their contract.
pub struct EqualsOverridenWithHashCodeCheck;

impl EqualsOverridenWithHashCodeCheck {
    pub const RULE_KEY: &'static str = "S1206";
}

impl FileScanner for EqualsOverridenWithHashCodeCheck {
    fn rule_key(&self) -> RuleKey {
        RuleKey::of(CheckList::REPOSITORY_KEY, Self::RULE_KEY)
    }

    fn scan_file(&mut self, context: &ScannerContext<'_>) {
        let mut visitor = EqualsHashCodeVisitor {
            context,
            rule_key: self.rule_key(),
        };
        context.tree().accept(&mut visitor);
    }
}

struct EqualsHashCodeVisitor<'c, 'a> {
    context: &'c ScannerContext<'a>,
    rule_key: RuleKey,
}

impl TreeVisitor for EqualsHashCodeVisitor<'_, '_> {
    fn visit_class(&mut self, tree: &ClassDecl) {
        walk_class(self, tree);

        let type_label = match TreeNode::kind(tree) {
            Some(Kind::Class) => "class",
            Some(Kind::Enum) => "enum",
            Some(Kind::Interface) => "interface",
            _ => return,
        };

        let mut equals_method: Option<&MethodDecl> = None;
        let mut hash_code_method: Option<&MethodDecl> = None;
        for member in tree.members() {
            if let Member::Method(method) = member {
                if method.simple_name() == EQUALS && method.parameters().len() == 1 {
                    equals_method = Some(method);
                } else if method.simple_name() == HASH_CODE && method.parameters().is_empty() {
                    hash_code_method = Some(method);
                }
            }
        }

        match (equals_method, hash_code_method) {
            (Some(equals), None) => self.context.add_issue(
                equals,
                &self.rule_key,
                message(type_label, EQUALS, HASH_CODE),
            ),
            (None, Some(hash_code)) => self.context.add_issue(
                hash_code,
                &self.rule_key,
                message(type_label, HASH_CODE, EQUALS),
            ),
            _ => {}
        }
    }
}

fn message(type_label: &str, overridden: &str, missing: &str) -> String {
    format!(
        "This {type_label} overrides \"{overridden}()\" and should therefore \
         also override \"{missing}()\"."
    )
}
