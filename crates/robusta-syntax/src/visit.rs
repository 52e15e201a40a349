//! Double-dispatch traversal over the typed tree.
//!
//! [`TreeVisitor`] has one method per tree category. Every default body
//! delegates to the matching `walk_*` function, which descends into the
//! node's structural children in declaration order; a visitor overrides the
//! categories it cares about and calls the same `walk_*` to continue the
//! descent below the node. The auxiliary kindless shapes (primitive types,
//! array types, wildcards, imports, modifiers) default to doing nothing.

use crate::tree::{
    ArrayAccess, ArrayType, AssertStatement, AssignmentExpression, BinaryExpression, Block,
    BreakStatement,
    CaseGroup, CaseLabel, CatchClause, ClassDecl, CompilationUnit, ConditionalExpression,
    ContinueStatement, DoWhileStatement, EmptyStatement, EnhancedForStatement, EnumConstant,
    ExpressionStatement, ForStatement, Identifier, IfStatement, Import, InstanceOf,
    LabeledStatement, Literal, MemberSelect, MethodDecl, MethodInvocation, Modifiers, NewArray,
    NewClass, Parenthesized, PrimitiveType, ReturnStatement, SwitchStatement,
    SynchronizedStatement, ThrowStatement, TreeNode, TryStatement, TypeCast, UnaryExpression,
    Variable, WhileStatement, Wildcard,
};

pub trait TreeVisitor {
    fn visit_compilation_unit(&mut self, tree: &CompilationUnit) {
        walk_compilation_unit(self, tree);
    }

    fn visit_class(&mut self, tree: &ClassDecl) {
        walk_class(self, tree);
    }

    fn visit_method(&mut self, tree: &MethodDecl) {
        walk_method(self, tree);
    }

    fn visit_variable(&mut self, tree: &Variable) {
        walk_variable(self, tree);
    }

    fn visit_enum_constant(&mut self, tree: &EnumConstant) {
        walk_enum_constant(self, tree);
    }

    fn visit_block(&mut self, tree: &Block) {
        walk_block(self, tree);
    }

    fn visit_empty_statement(&mut self, _tree: &EmptyStatement) {}

    fn visit_labeled_statement(&mut self, tree: &LabeledStatement) {
        walk_labeled_statement(self, tree);
    }

    fn visit_expression_statement(&mut self, tree: &ExpressionStatement) {
        walk_expression_statement(self, tree);
    }

    fn visit_if_statement(&mut self, tree: &IfStatement) {
        walk_if_statement(self, tree);
    }

    fn visit_assert_statement(&mut self, tree: &AssertStatement) {
        walk_assert_statement(self, tree);
    }

    fn visit_switch_statement(&mut self, tree: &SwitchStatement) {
        walk_switch_statement(self, tree);
    }

    fn visit_case_group(&mut self, tree: &CaseGroup) {
        walk_case_group(self, tree);
    }

    fn visit_case_label(&mut self, tree: &CaseLabel) {
        walk_case_label(self, tree);
    }

    fn visit_while_statement(&mut self, tree: &WhileStatement) {
        walk_while_statement(self, tree);
    }

    fn visit_do_while_statement(&mut self, tree: &DoWhileStatement) {
        walk_do_while_statement(self, tree);
    }

    fn visit_for_statement(&mut self, tree: &ForStatement) {
        walk_for_statement(self, tree);
    }

    fn visit_enhanced_for_statement(&mut self, tree: &EnhancedForStatement) {
        walk_enhanced_for_statement(self, tree);
    }

    fn visit_break_statement(&mut self, _tree: &BreakStatement) {}

    fn visit_continue_statement(&mut self, _tree: &ContinueStatement) {}

    fn visit_return_statement(&mut self, tree: &ReturnStatement) {
        walk_return_statement(self, tree);
    }

    fn visit_throw_statement(&mut self, tree: &ThrowStatement) {
        walk_throw_statement(self, tree);
    }

    fn visit_synchronized_statement(&mut self, tree: &SynchronizedStatement) {
        walk_synchronized_statement(self, tree);
    }

    fn visit_try_statement(&mut self, tree: &TryStatement) {
        walk_try_statement(self, tree);
    }

    fn visit_catch(&mut self, tree: &CatchClause) {
        walk_catch(self, tree);
    }

    fn visit_identifier(&mut self, _tree: &Identifier) {}

    fn visit_literal(&mut self, _tree: &Literal) {}

    fn visit_parenthesized(&mut self, tree: &Parenthesized) {
        walk_parenthesized(self, tree);
    }

    fn visit_conditional_expression(&mut self, tree: &ConditionalExpression) {
        walk_conditional_expression(self, tree);
    }

    fn visit_instance_of(&mut self, tree: &InstanceOf) {
        walk_instance_of(self, tree);
    }

    fn visit_type_cast(&mut self, tree: &TypeCast) {
        walk_type_cast(self, tree);
    }

    fn visit_method_invocation(&mut self, tree: &MethodInvocation) {
        walk_method_invocation(self, tree);
    }

    fn visit_new_array(&mut self, tree: &NewArray) {
        walk_new_array(self, tree);
    }

    fn visit_new_class(&mut self, tree: &NewClass) {
        walk_new_class(self, tree);
    }

    fn visit_member_select(&mut self, tree: &MemberSelect) {
        walk_member_select(self, tree);
    }

    fn visit_array_access(&mut self, tree: &ArrayAccess) {
        walk_array_access(self, tree);
    }

    fn visit_binary_expression(&mut self, tree: &BinaryExpression) {
        walk_binary_expression(self, tree);
    }

    fn visit_unary_expression(&mut self, tree: &UnaryExpression) {
        walk_unary_expression(self, tree);
    }

    fn visit_assignment_expression(&mut self, tree: &AssignmentExpression) {
        walk_assignment_expression(self, tree);
    }

    // Auxiliary kindless shapes: not descended into by default.

    fn visit_primitive_type(&mut self, _tree: &PrimitiveType) {}

    fn visit_array_type(&mut self, _tree: &ArrayType) {}

    fn visit_wildcard(&mut self, _tree: &Wildcard) {}

    fn visit_import(&mut self, _tree: &Import) {}

    fn visit_modifiers(&mut self, _tree: &Modifiers) {}
}

pub fn walk_compilation_unit<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &CompilationUnit) {
    if let Some(package_name) = tree.package_name() {
        package_name.accept(visitor);
    }
    for import in tree.imports() {
        import.accept(visitor);
    }
    for type_decl in tree.types() {
        type_decl.accept(visitor);
    }
}

pub fn walk_class<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &ClassDecl) {
    visitor.visit_modifiers(tree.modifiers());
    if let Some(super_class) = tree.super_class() {
        super_class.accept(visitor);
    }
    for interface in tree.super_interfaces() {
        interface.accept(visitor);
    }
    for member in tree.members() {
        member.accept(visitor);
    }
}

pub fn walk_method<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &MethodDecl) {
    visitor.visit_modifiers(tree.modifiers());
    if let Some(return_type) = tree.return_type() {
        return_type.accept(visitor);
    }
    for parameter in tree.parameters() {
        parameter.accept(visitor);
    }
    if let Some(block) = tree.block() {
        block.accept(visitor);
    }
    for thrown in tree.throws() {
        thrown.accept(visitor);
    }
    if let Some(default_value) = tree.default_value() {
        default_value.accept(visitor);
    }
}

pub fn walk_variable<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &Variable) {
    visitor.visit_modifiers(tree.modifiers());
    tree.ty().accept(visitor);
    if let Some(initializer) = tree.initializer() {
        initializer.accept(visitor);
    }
}

pub fn walk_enum_constant<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &EnumConstant) {
    visitor.visit_modifiers(tree.modifiers());
    tree.ty().accept(visitor);
    tree.initializer().accept(visitor);
}

pub fn walk_block<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &Block) {
    for statement in tree.body() {
        statement.accept(visitor);
    }
}

pub fn walk_labeled_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &LabeledStatement) {
    tree.statement().accept(visitor);
}

pub fn walk_expression_statement<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &ExpressionStatement,
) {
    tree.expression().accept(visitor);
}

pub fn walk_if_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &IfStatement) {
    tree.condition().accept(visitor);
    tree.then_statement().accept(visitor);
    if let Some(else_statement) = tree.else_statement() {
        else_statement.accept(visitor);
    }
}

pub fn walk_assert_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &AssertStatement) {
    tree.condition().accept(visitor);
    if let Some(detail) = tree.detail() {
        detail.accept(visitor);
    }
}

pub fn walk_switch_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &SwitchStatement) {
    tree.expression().accept(visitor);
    for case in tree.cases() {
        case.accept(visitor);
    }
}

pub fn walk_case_group<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &CaseGroup) {
    for label in tree.labels() {
        label.accept(visitor);
    }
    for statement in tree.body() {
        statement.accept(visitor);
    }
}

pub fn walk_case_label<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &CaseLabel) {
    if let Some(expression) = tree.expression() {
        expression.accept(visitor);
    }
}

pub fn walk_while_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &WhileStatement) {
    tree.condition().accept(visitor);
    tree.statement().accept(visitor);
}

pub fn walk_do_while_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &DoWhileStatement) {
    tree.statement().accept(visitor);
    tree.condition().accept(visitor);
}

pub fn walk_for_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &ForStatement) {
    for initializer in tree.initializer() {
        initializer.accept(visitor);
    }
    if let Some(condition) = tree.condition() {
        condition.accept(visitor);
    }
    for update in tree.update() {
        update.accept(visitor);
    }
    tree.statement().accept(visitor);
}

pub fn walk_enhanced_for_statement<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &EnhancedForStatement,
) {
    tree.variable().accept(visitor);
    tree.expression().accept(visitor);
    tree.statement().accept(visitor);
}

pub fn walk_return_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &ReturnStatement) {
    if let Some(expression) = tree.expression() {
        expression.accept(visitor);
    }
}

pub fn walk_throw_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &ThrowStatement) {
    tree.expression().accept(visitor);
}

pub fn walk_synchronized_statement<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &SynchronizedStatement,
) {
    tree.expression().accept(visitor);
    tree.block().accept(visitor);
}

pub fn walk_try_statement<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &TryStatement) {
    for resource in tree.resources() {
        resource.accept(visitor);
    }
    tree.block().accept(visitor);
    for catch in tree.catches() {
        catch.accept(visitor);
    }
    if let Some(finally_block) = tree.finally_block() {
        finally_block.accept(visitor);
    }
}

pub fn walk_catch<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &CatchClause) {
    tree.parameter().accept(visitor);
    tree.block().accept(visitor);
}

pub fn walk_parenthesized<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &Parenthesized) {
    tree.expression().accept(visitor);
}

pub fn walk_conditional_expression<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &ConditionalExpression,
) {
    tree.condition().accept(visitor);
    tree.true_expression().accept(visitor);
    tree.false_expression().accept(visitor);
}

pub fn walk_instance_of<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &InstanceOf) {
    tree.expression().accept(visitor);
    tree.ty().accept(visitor);
}

pub fn walk_type_cast<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &TypeCast) {
    tree.ty().accept(visitor);
    tree.expression().accept(visitor);
}

pub fn walk_method_invocation<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &MethodInvocation) {
    tree.method_select().accept(visitor);
    for argument in tree.arguments() {
        argument.accept(visitor);
    }
}

pub fn walk_new_array<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &NewArray) {
    if let Some(ty) = tree.ty() {
        ty.accept(visitor);
    }
    for dimension in tree.dimensions() {
        dimension.accept(visitor);
    }
    for initializer in tree.initializers() {
        initializer.accept(visitor);
    }
}

pub fn walk_new_class<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &NewClass) {
    if let Some(enclosing) = tree.enclosing_expression() {
        enclosing.accept(visitor);
    }
    for argument in tree.arguments() {
        argument.accept(visitor);
    }
    if let Some(class_body) = tree.class_body() {
        class_body.accept(visitor);
    }
}

pub fn walk_member_select<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &MemberSelect) {
    tree.expression().accept(visitor);
    tree.identifier().accept(visitor);
}

pub fn walk_array_access<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &ArrayAccess) {
    tree.expression().accept(visitor);
    tree.index().accept(visitor);
}

pub fn walk_binary_expression<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &BinaryExpression) {
    tree.left_operand().accept(visitor);
    tree.right_operand().accept(visitor);
}

pub fn walk_unary_expression<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &UnaryExpression) {
    tree.expression().accept(visitor);
}

pub fn walk_assignment_expression<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &AssignmentExpression,
) {
    tree.variable().accept(visitor);
    tree.expression().accept(visitor);
}
