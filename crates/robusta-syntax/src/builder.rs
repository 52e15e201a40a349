//! Lowering from the concrete tree to the typed tree.
//!
//! A single top-down pass over the grammar productions. Left-associative
//! expression families fold into left-leaning trees; conditional and
//! assignment chains fold right-to-left, matching their associativity.
//! Provenance is stamped on every produced node; nothing is mutated
//! afterwards.
//!
//! The builder either returns a complete [`CompilationUnit`] or fails with
//! [`BuildError`] on the first structurally impossible node. It never
//! recovers and never returns a partial tree.

use rowan::NodeOrToken;

use crate::cst::{
    child_of_kind, children_of_kind, descendants_of_kind, first_of_kinds, first_significant_child,
    first_significant_token, has_direct_child, next_significant_sibling, prev_in_tree,
    prev_significant_sibling, significant_children, token_of_kind, SyntaxElement, SyntaxNode,
    SyntaxToken,
};
use crate::error::BuildError;
use crate::kind_maps::{
    assignment_kind, binary_kind, literal_kind, modifier_kind, postfix_kind, prefix_kind,
};
use crate::line_index::LineIndex;
use crate::syntax_kind::SyntaxKind;
use crate::tree::{
    ArrayAccess, ArrayType, AssertStatement, AssignmentExpression, BinaryExpression, Block,
    BreakStatement, CaseGroup, CaseLabel, CatchClause, ClassDecl, CompilationUnit,
    ConditionalExpression, ContinueStatement, DoWhileStatement, EmptyStatement,
    EnhancedForStatement, EnumConstant, Expression, ExpressionStatement, ForStatement, Identifier,
    IfStatement, Import, InstanceOf, Kind, LabeledStatement, Literal, Member, MemberSelect,
    MethodDecl, MethodInvocation, Modifiers, NewArray, NewClass, NodeOrigin, Parenthesized,
    PrimitiveType, ReturnStatement, Statement, SwitchStatement, SynchronizedStatement,
    ThrowStatement, TreeNode, TryStatement, TypeCast, UnaryExpression, Variable, WhileStatement,
};

/// Lowers a concrete `CompilationUnit` node into the typed tree.
pub fn build_compilation_unit(root: &SyntaxNode) -> Result<CompilationUnit, BuildError> {
    TreeBuilder::new(root).compilation_unit(root)
}

#[cfg(test)]
pub(crate) fn build_statement(node: &SyntaxNode) -> Result<Statement, BuildError> {
    TreeBuilder::new(node).statement(node)
}

#[cfg(test)]
pub(crate) fn build_expression(node: &SyntaxNode) -> Result<Expression, BuildError> {
    TreeBuilder::new(node).expression(node)
}

struct TreeBuilder {
    line_index: LineIndex,
}

fn expect_kind(node: &SyntaxNode, kind: SyntaxKind) -> Result<(), BuildError> {
    if node.kind() == kind {
        Ok(())
    } else {
        Err(BuildError::MalformedAst(node.kind()))
    }
}

fn expect_kind_in(node: &SyntaxNode, kinds: &[SyntaxKind]) -> Result<(), BuildError> {
    if kinds.contains(&node.kind()) {
        Ok(())
    } else {
        Err(BuildError::MalformedAst(node.kind()))
    }
}

fn required_child(node: &SyntaxNode, kind: SyntaxKind) -> Result<SyntaxNode, BuildError> {
    child_of_kind(node, kind).ok_or(BuildError::MalformedAst(node.kind()))
}

fn required_token(node: &SyntaxNode, kind: SyntaxKind) -> Result<SyntaxToken, BuildError> {
    token_of_kind(node, kind).ok_or(BuildError::MalformedAst(node.kind()))
}

fn as_node(element: &SyntaxElement) -> Result<&SyntaxNode, BuildError> {
    element
        .as_node()
        .ok_or(BuildError::MalformedAst(element.kind()))
}

fn as_token(element: &SyntaxElement) -> Result<&SyntaxToken, BuildError> {
    element
        .as_token()
        .ok_or(BuildError::MalformedAst(element.kind()))
}

impl TreeBuilder {
    fn new(root: &SyntaxNode) -> TreeBuilder {
        TreeBuilder {
            line_index: LineIndex::new(&root.text().to_string()),
        }
    }

    fn origin(&self, element: impl Into<SyntaxElement>) -> NodeOrigin {
        let element = element.into();
        let offset = first_significant_token(&element)
            .map(|token| u32::from(token.text_range().start()))
            .unwrap_or_else(|| u32::from(element.text_range().start()));
        NodeOrigin {
            line: self.line_index.line(offset),
            syntax: element,
        }
    }

    // --- Identifiers and types -----------------------------------------------

    fn identifier(&self, token: &SyntaxToken) -> Result<Identifier, BuildError> {
        match token.kind() {
            SyntaxKind::Identifier
            | SyntaxKind::ThisKw
            | SyntaxKind::ClassKw
            | SyntaxKind::SuperKw => Ok(Identifier {
                origin: self.origin(token.clone()),
                name: token.text().to_string(),
            }),
            other => Err(BuildError::MalformedAst(other)),
        }
    }

    /// Lowers a dotted identifier chain into left-leaning member selects.
    fn qualified_identifier(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::QualifiedIdentifier)?;
        self.identifier_chain(node)
    }

    /// `ClassType` lowers like a qualified identifier; type-argument children
    /// are skipped, as generics are erased in this pass.
    fn class_type(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::ClassType)?;
        self.identifier_chain(node)
    }

    fn identifier_chain(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        let mut tokens = node
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| token.kind() == SyntaxKind::Identifier);
        let first = tokens.next().ok_or(BuildError::MalformedAst(node.kind()))?;
        let mut result = Expression::Identifier(self.identifier(&first)?);
        for token in tokens {
            result = Expression::MemberSelect(MemberSelect {
                origin: self.origin(token.clone()),
                expression: Box::new(result),
                identifier: self.identifier(&token)?,
            });
        }
        Ok(result)
    }

    fn qualified_identifier_list(&self, node: &SyntaxNode) -> Result<Vec<Expression>, BuildError> {
        expect_kind(node, SyntaxKind::QualifiedIdentifierList)?;
        children_of_kind(node, SyntaxKind::QualifiedIdentifier)
            .map(|child| self.qualified_identifier(&child))
            .collect()
    }

    fn literal(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::Literal)?;
        let element = first_significant_child(node).ok_or(BuildError::MalformedAst(node.kind()))?;
        let token = as_token(&element)?;
        Ok(Expression::Literal(Literal {
            origin: self.origin(token.clone()),
            kind: literal_kind(token.kind())?,
            value: token.text().to_string(),
        }))
    }

    /// A `BasicType` node or the bare `void` keyword.
    fn basic_type(&self, element: &SyntaxElement) -> Result<PrimitiveType, BuildError> {
        match element {
            NodeOrToken::Node(node) if node.kind() == SyntaxKind::BasicType => {
                let keyword = first_significant_token(element)
                    .ok_or(BuildError::MalformedAst(node.kind()))?;
                Ok(PrimitiveType {
                    origin: self.origin(node.clone()),
                    name: keyword.text().to_string(),
                })
            }
            NodeOrToken::Token(token) if token.kind() == SyntaxKind::VoidKw => Ok(PrimitiveType {
                origin: self.origin(token.clone()),
                name: token.text().to_string(),
            }),
            other => Err(BuildError::MalformedAst(other.kind())),
        }
    }

    fn reference_type(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind_in(node, &[SyntaxKind::ReferenceType, SyntaxKind::Type])?;
        let first = first_significant_child(node).ok_or(BuildError::MalformedAst(node.kind()))?;
        let result = match &first {
            NodeOrToken::Node(child) if child.kind() == SyntaxKind::BasicType => {
                Expression::PrimitiveType(self.basic_type(&first)?)
            }
            NodeOrToken::Node(child) => self.class_type(child)?,
            NodeOrToken::Token(token) => return Err(BuildError::MalformedAst(token.kind())),
        };
        let dimensions = children_of_kind(node, SyntaxKind::Dim).count();
        Ok(self.apply_dim(result, dimensions))
    }

    /// Wraps `expression` in `count` nested array types.
    fn apply_dim(&self, expression: Expression, count: usize) -> Expression {
        let mut result = expression;
        for _ in 0..count {
            let origin = result.origin().clone();
            result = Expression::ArrayType(ArrayType {
                origin,
                ty: Box::new(result),
            });
        }
        result
    }

    fn modifiers(&self, nodes: &[SyntaxNode]) -> Result<Modifiers, BuildError> {
        let mut modifiers = Vec::new();
        for node in nodes {
            expect_kind(node, SyntaxKind::Modifier)?;
            let element =
                first_significant_child(node).ok_or(BuildError::MalformedAst(node.kind()))?;
            match element {
                // Annotations are not modelled in this pass.
                NodeOrToken::Node(child) if child.kind() == SyntaxKind::Annotation => {}
                NodeOrToken::Token(token) => modifiers.push(modifier_kind(token.kind())?),
                NodeOrToken::Node(child) => return Err(BuildError::MalformedAst(child.kind())),
            }
        }
        Ok(Modifiers { modifiers })
    }

    fn modifiers_of(&self, node: &SyntaxNode) -> Result<Modifiers, BuildError> {
        let nodes: Vec<SyntaxNode> = children_of_kind(node, SyntaxKind::Modifier).collect();
        self.modifiers(&nodes)
    }

    // --- Compilation unit ----------------------------------------------------

    fn compilation_unit(&self, node: &SyntaxNode) -> Result<CompilationUnit, BuildError> {
        expect_kind(node, SyntaxKind::CompilationUnit)?;
        let mut imports = Vec::new();
        for import_node in children_of_kind(node, SyntaxKind::ImportDeclaration) {
            let qualified = required_child(&import_node, SyntaxKind::QualifiedIdentifier)?;
            imports.push(Import {
                origin: self.origin(import_node.clone()),
                is_static: token_of_kind(&import_node, SyntaxKind::StaticKw).is_some(),
                qualified_identifier: self.qualified_identifier(&qualified)?,
            });
        }

        let mut types = Vec::new();
        for type_node in children_of_kind(node, SyntaxKind::TypeDeclaration) {
            let declaration = first_of_kinds(
                &type_node,
                &[
                    SyntaxKind::ClassDeclaration,
                    SyntaxKind::EnumDeclaration,
                    SyntaxKind::InterfaceDeclaration,
                    SyntaxKind::AnnotationTypeDeclaration,
                ],
            )
            .and_then(SyntaxElement::into_node);
            // A lone semicolon parses as a type declaration without any of
            // the four shapes; it contributes nothing.
            if let Some(declaration) = declaration {
                let modifiers = self.modifiers_of(&type_node)?;
                types.push(self.type_declaration(modifiers, &declaration)?);
            }
        }

        let package_name = match child_of_kind(node, SyntaxKind::PackageDeclaration) {
            Some(package) => Some(self.qualified_identifier(&required_child(
                &package,
                SyntaxKind::QualifiedIdentifier,
            )?)?),
            None => None,
        };

        Ok(CompilationUnit {
            origin: self.origin(node.clone()),
            package_name,
            imports,
            types,
        })
    }

    fn type_declaration(
        &self,
        modifiers: Modifiers,
        node: &SyntaxNode,
    ) -> Result<ClassDecl, BuildError> {
        match node.kind() {
            SyntaxKind::ClassDeclaration => self.class_declaration(modifiers, node),
            SyntaxKind::EnumDeclaration => self.enum_declaration(modifiers, node),
            SyntaxKind::InterfaceDeclaration => self.interface_declaration(modifiers, node),
            SyntaxKind::AnnotationTypeDeclaration => {
                self.annotation_type_declaration(modifiers, node)
            }
            other => Err(BuildError::MalformedAst(other)),
        }
    }

    // --- Classes -------------------------------------------------------------

    fn class_declaration(
        &self,
        modifiers: Modifiers,
        node: &SyntaxNode,
    ) -> Result<ClassDecl, BuildError> {
        expect_kind(node, SyntaxKind::ClassDeclaration)?;
        let simple_name = required_token(node, SyntaxKind::Identifier)?.text().to_string();
        let super_class = match token_of_kind(node, SyntaxKind::ExtendsKw) {
            Some(extends) => Some(self.class_type(&self.node_after(&extends)?)?),
            None => None,
        };
        let super_interfaces = match token_of_kind(node, SyntaxKind::ImplementsKw) {
            Some(implements) => self.class_type_list(&self.node_after(&implements)?)?,
            None => Vec::new(),
        };
        let members = self.class_body(&required_child(node, SyntaxKind::ClassBody)?)?;
        Ok(ClassDecl {
            origin: self.origin(node.clone()),
            kind: Kind::Class,
            modifiers,
            simple_name: Some(simple_name),
            super_class,
            super_interfaces,
            members,
        })
    }

    fn node_after(&self, token: &SyntaxToken) -> Result<SyntaxNode, BuildError> {
        next_significant_sibling(&SyntaxElement::from(token.clone()))
            .and_then(SyntaxElement::into_node)
            .ok_or(BuildError::MalformedAst(token.kind()))
    }

    fn class_type_list(&self, node: &SyntaxNode) -> Result<Vec<Expression>, BuildError> {
        expect_kind(node, SyntaxKind::ClassTypeList)?;
        children_of_kind(node, SyntaxKind::ClassType)
            .map(|child| self.class_type(&child))
            .collect()
    }

    /// Shared by class bodies, anonymous class bodies and the trailing
    /// declarations of an enum body.
    fn class_body(&self, node: &SyntaxNode) -> Result<Vec<Member>, BuildError> {
        expect_kind_in(
            node,
            &[SyntaxKind::ClassBody, SyntaxKind::EnumBodyDeclarations],
        )?;
        let mut members = Vec::new();
        for declaration in children_of_kind(node, SyntaxKind::ClassBodyDeclaration) {
            let modifiers = self.modifiers_of(&declaration)?;
            if let Some(member_decl) = child_of_kind(&declaration, SyntaxKind::MemberDecl) {
                if let Some(field) = child_of_kind(&member_decl, SyntaxKind::FieldDeclaration) {
                    for variable in self.field_declaration(&modifiers, &field)? {
                        members.push(Member::Variable(variable));
                    }
                } else {
                    members.push(self.member_declaration(modifiers, &member_decl)?);
                }
            } else if let Some(NodeOrToken::Node(init)) = first_significant_child(&declaration) {
                if init.kind() == SyntaxKind::ClassInitDeclaration {
                    let kind = if token_of_kind(&init, SyntaxKind::StaticKw).is_some() {
                        Kind::StaticInitializer
                    } else {
                        Kind::Initializer
                    };
                    let block_node = required_child(&init, SyntaxKind::Block)?;
                    let body = self
                        .block_statements(&required_child(&block_node, SyntaxKind::BlockStatements)?)?;
                    members.push(Member::Initializer(Block {
                        origin: self.origin(init.clone()),
                        kind,
                        body,
                    }));
                }
            }
        }
        Ok(members)
    }

    fn member_declaration(
        &self,
        modifiers: Modifiers,
        node: &SyntaxNode,
    ) -> Result<Member, BuildError> {
        expect_kind(node, SyntaxKind::MemberDecl)?;
        if let Some(declaration) = first_of_kinds(
            node,
            &[
                SyntaxKind::InterfaceDeclaration,
                SyntaxKind::ClassDeclaration,
                SyntaxKind::EnumDeclaration,
                SyntaxKind::AnnotationTypeDeclaration,
            ],
        )
        .and_then(SyntaxElement::into_node)
        {
            return Ok(Member::Class(self.type_declaration(modifiers, &declaration)?));
        }

        if let Some(generic) = child_of_kind(node, SyntaxKind::GenericMethodOrConstructorRest) {
            // Type parameters are erased in this pass.
            let return_type = first_of_kinds(&generic, &[SyntaxKind::Type, SyntaxKind::VoidKw]);
            let name = required_token(&generic, SyntaxKind::Identifier)?;
            let rest = first_of_kinds(
                &generic,
                &[
                    SyntaxKind::MethodDeclaratorRest,
                    SyntaxKind::ConstructorDeclaratorRest,
                ],
            )
            .and_then(SyntaxElement::into_node)
            .ok_or(BuildError::MalformedAst(generic.kind()))?;
            return Ok(Member::Method(
                self.method_declarator(modifiers, return_type, &name, &rest)?,
            ));
        }

        if let Some(rest) = first_of_kinds(
            node,
            &[
                SyntaxKind::MethodDeclaratorRest,
                SyntaxKind::VoidMethodDeclaratorRest,
                SyntaxKind::ConstructorDeclaratorRest,
            ],
        )
        .and_then(SyntaxElement::into_node)
        {
            let return_type = first_of_kinds(node, &[SyntaxKind::Type, SyntaxKind::VoidKw]);
            let name = required_token(node, SyntaxKind::Identifier)?;
            return Ok(Member::Method(
                self.method_declarator(modifiers, return_type, &name, &rest)?,
            ));
        }

        Err(BuildError::MalformedAst(node.kind()))
    }

    // --- Fields and methods --------------------------------------------------

    fn field_declaration(
        &self,
        modifiers: &Modifiers,
        node: &SyntaxNode,
    ) -> Result<Vec<Variable>, BuildError> {
        expect_kind(node, SyntaxKind::FieldDeclaration)?;
        let ty = self.reference_type(&required_child(node, SyntaxKind::Type)?)?;
        self.variable_declarators(
            modifiers,
            &ty,
            &required_child(node, SyntaxKind::VariableDeclarators)?,
        )
    }

    /// One `Variable` per declarator, sharing modifiers and base type and
    /// carrying its own dimension suffix and initializer.
    fn variable_declarators(
        &self,
        modifiers: &Modifiers,
        ty: &Expression,
        node: &SyntaxNode,
    ) -> Result<Vec<Variable>, BuildError> {
        expect_kind(node, SyntaxKind::VariableDeclarators)?;
        children_of_kind(node, SyntaxKind::VariableDeclarator)
            .map(|declarator| self.variable_declarator(modifiers, ty, &declarator))
            .collect()
    }

    fn variable_declarator(
        &self,
        modifiers: &Modifiers,
        ty: &Expression,
        node: &SyntaxNode,
    ) -> Result<Variable, BuildError> {
        expect_kind(node, SyntaxKind::VariableDeclarator)?;
        let dimensions = children_of_kind(node, SyntaxKind::Dim).count();
        let initializer = match child_of_kind(node, SyntaxKind::VariableInitializer) {
            Some(init) => Some(self.variable_initializer(&init)?),
            None => None,
        };
        Ok(Variable {
            origin: self.origin(node.clone()),
            modifiers: modifiers.clone(),
            ty: self.apply_dim(ty.clone(), dimensions),
            simple_name: required_token(node, SyntaxKind::Identifier)?.text().to_string(),
            initializer,
        })
    }

    fn method_declarator(
        &self,
        modifiers: Modifiers,
        return_type: Option<SyntaxElement>,
        name: &SyntaxToken,
        rest: &SyntaxNode,
    ) -> Result<MethodDecl, BuildError> {
        expect_kind_in(
            rest,
            &[
                SyntaxKind::MethodDeclaratorRest,
                SyntaxKind::VoidMethodDeclaratorRest,
                SyntaxKind::ConstructorDeclaratorRest,
                SyntaxKind::VoidInterfaceMethodDeclaratorsRest,
                SyntaxKind::InterfaceMethodDeclaratorRest,
            ],
        )?;
        if name.kind() != SyntaxKind::Identifier {
            return Err(BuildError::MalformedAst(name.kind()));
        }
        let return_type = match return_type {
            Some(NodeOrToken::Token(token)) if token.kind() == SyntaxKind::VoidKw => Some(
                Expression::PrimitiveType(self.basic_type(&SyntaxElement::from(token))?),
            ),
            Some(NodeOrToken::Node(ty)) => Some(self.reference_type(&ty)?),
            Some(other) => return Err(BuildError::MalformedAst(other.kind())),
            None => None,
        };
        let block = match child_of_kind(rest, SyntaxKind::MethodBody) {
            Some(body) => Some(self.block(&required_child(&body, SyntaxKind::Block)?)?),
            None => None,
        };
        let throws = match child_of_kind(rest, SyntaxKind::QualifiedIdentifierList) {
            Some(list) => self.qualified_identifier_list(&list)?,
            None => Vec::new(),
        };
        let parameters =
            self.formal_parameters(&required_child(rest, SyntaxKind::FormalParameters)?)?;
        Ok(MethodDecl {
            origin: self.origin(rest.clone()),
            modifiers,
            return_type,
            simple_name: name.text().to_string(),
            parameters,
            block,
            throws,
            // Annotation element defaults are not lowered in this pass.
            default_value: None,
        })
    }

    fn formal_parameters(&self, node: &SyntaxNode) -> Result<Vec<Variable>, BuildError> {
        expect_kind(node, SyntaxKind::FormalParameters)?;
        let mut parameters = Vec::new();
        for declarator_id in descendants_of_kind(node, SyntaxKind::VariableDeclaratorId) {
            let type_element = prev_in_tree(&SyntaxElement::from(declarator_id.clone()))
                .ok_or(BuildError::MalformedAst(node.kind()))?;
            let ty = match &type_element {
                NodeOrToken::Token(token) if token.kind() == SyntaxKind::Ellipsis => {
                    // Varargs: the parameter type is an array of the
                    // reference type written before the ellipsis.
                    let element_type = prev_in_tree(&type_element)
                        .and_then(SyntaxElement::into_node)
                        .ok_or(BuildError::MalformedAst(token.kind()))?;
                    Expression::ArrayType(ArrayType {
                        origin: self.origin(token.clone()),
                        ty: Box::new(self.reference_type(&element_type)?),
                    })
                }
                NodeOrToken::Node(type_node) => self.reference_type(type_node)?,
                NodeOrToken::Token(token) => return Err(BuildError::MalformedAst(token.kind())),
            };
            parameters.push(Variable {
                origin: self.origin(declarator_id.clone()),
                modifiers: Modifiers::empty(),
                ty,
                simple_name: required_token(&declarator_id, SyntaxKind::Identifier)?
                    .text()
                    .to_string(),
                initializer: None,
            });
        }
        Ok(parameters)
    }

    // --- Enums ---------------------------------------------------------------

    fn enum_declaration(
        &self,
        modifiers: Modifiers,
        node: &SyntaxNode,
    ) -> Result<ClassDecl, BuildError> {
        expect_kind(node, SyntaxKind::EnumDeclaration)?;
        let enum_token = required_token(node, SyntaxKind::Identifier)?;
        let enum_type = self.identifier(&enum_token)?;
        let mut members = Vec::new();
        let enum_body = required_child(node, SyntaxKind::EnumBody)?;
        if let Some(constants) = child_of_kind(&enum_body, SyntaxKind::EnumConstants) {
            for constant in children_of_kind(&constants, SyntaxKind::EnumConstant) {
                members.push(Member::EnumConstant(self.enum_constant(&enum_type, &constant)?));
            }
        }
        if let Some(declarations) = child_of_kind(&enum_body, SyntaxKind::EnumBodyDeclarations) {
            members.extend(self.class_body(&declarations)?);
        }
        let super_interfaces = match token_of_kind(node, SyntaxKind::ImplementsKw) {
            Some(implements) => self.class_type_list(&self.node_after(&implements)?)?,
            None => Vec::new(),
        };
        Ok(ClassDecl {
            origin: self.origin(node.clone()),
            kind: Kind::Enum,
            modifiers,
            simple_name: Some(enum_type.name().to_string()),
            super_class: None,
            super_interfaces,
            members,
        })
    }

    /// Each constant desugars into a variable of the enum type whose
    /// initializer is a `new E(args) { body }` invocation.
    fn enum_constant(
        &self,
        enum_type: &Identifier,
        node: &SyntaxNode,
    ) -> Result<EnumConstant, BuildError> {
        expect_kind(node, SyntaxKind::EnumConstant)?;
        let arguments = match child_of_kind(node, SyntaxKind::Arguments) {
            Some(args) => self.arguments(&args)?,
            None => Vec::new(),
        };
        let class_body = match child_of_kind(node, SyntaxKind::ClassBody) {
            Some(body) => Some(Box::new(ClassDecl {
                origin: self.origin(body.clone()),
                kind: Kind::Class,
                modifiers: Modifiers::empty(),
                simple_name: None,
                super_class: None,
                super_interfaces: Vec::new(),
                members: self.class_body(&body)?,
            })),
            None => None,
        };
        Ok(EnumConstant {
            origin: self.origin(node.clone()),
            modifiers: Modifiers::empty(),
            ty: Expression::Identifier(enum_type.clone()),
            simple_name: required_token(node, SyntaxKind::Identifier)?.text().to_string(),
            initializer: NewClass {
                origin: self.origin(node.clone()),
                enclosing_expression: None,
                arguments,
                class_body,
            },
        })
    }

    // --- Interfaces ----------------------------------------------------------

    fn interface_declaration(
        &self,
        modifiers: Modifiers,
        node: &SyntaxNode,
    ) -> Result<ClassDecl, BuildError> {
        expect_kind(node, SyntaxKind::InterfaceDeclaration)?;
        let simple_name = required_token(node, SyntaxKind::Identifier)?.text().to_string();
        let mut members = Vec::new();
        let body = required_child(node, SyntaxKind::InterfaceBody)?;
        for declaration in children_of_kind(&body, SyntaxKind::InterfaceBodyDeclaration) {
            let member_modifiers = self.modifiers_of(&declaration)?;
            if let Some(member_decl) =
                child_of_kind(&declaration, SyntaxKind::InterfaceMemberDecl)
            {
                self.append_interface_member(member_modifiers, &mut members, &member_decl)?;
            }
        }
        let super_interfaces = match token_of_kind(node, SyntaxKind::ExtendsKw) {
            Some(extends) => self.class_type_list(&self.node_after(&extends)?)?,
            None => Vec::new(),
        };
        Ok(ClassDecl {
            origin: self.origin(node.clone()),
            kind: Kind::Interface,
            modifiers,
            simple_name: Some(simple_name),
            super_class: None,
            super_interfaces,
            members,
        })
    }

    fn append_interface_member(
        &self,
        modifiers: Modifiers,
        members: &mut Vec<Member>,
        node: &SyntaxNode,
    ) -> Result<(), BuildError> {
        expect_kind(node, SyntaxKind::InterfaceMemberDecl)?;
        if let Some(declaration) = first_of_kinds(
            node,
            &[
                SyntaxKind::InterfaceDeclaration,
                SyntaxKind::ClassDeclaration,
                SyntaxKind::EnumDeclaration,
                SyntaxKind::AnnotationTypeDeclaration,
            ],
        )
        .and_then(SyntaxElement::into_node)
        {
            members.push(Member::Class(self.type_declaration(modifiers, &declaration)?));
            return Ok(());
        }

        if let Some(declaration) = child_of_kind(node, SyntaxKind::InterfaceMethodOrFieldDecl) {
            let rest = required_child(&declaration, SyntaxKind::InterfaceMethodOrFieldRest)?;
            if let Some(method_rest) =
                child_of_kind(&rest, SyntaxKind::InterfaceMethodDeclaratorRest)
            {
                members.push(Member::Method(self.method_declarator(
                    modifiers,
                    first_of_kinds(&declaration, &[SyntaxKind::Type, SyntaxKind::VoidKw]),
                    &required_token(&declaration, SyntaxKind::Identifier)?,
                    &method_rest,
                )?));
            } else {
                self.append_constant_declarations(&modifiers, members, &declaration)?;
            }
            return Ok(());
        }

        if let Some(declaration) = child_of_kind(node, SyntaxKind::InterfaceGenericMethodDecl) {
            // Type parameters are erased in this pass.
            members.push(Member::Method(self.method_declarator(
                modifiers,
                first_of_kinds(&declaration, &[SyntaxKind::Type, SyntaxKind::VoidKw]),
                &required_token(&declaration, SyntaxKind::Identifier)?,
                &required_child(&declaration, SyntaxKind::InterfaceMethodDeclaratorRest)?,
            )?));
            return Ok(());
        }

        if let Some(declaration) =
            child_of_kind(node, SyntaxKind::VoidInterfaceMethodDeclaratorsRest)
        {
            members.push(Member::Method(self.method_declarator(
                modifiers,
                token_of_kind(node, SyntaxKind::VoidKw).map(SyntaxElement::from),
                &required_token(node, SyntaxKind::Identifier)?,
                &declaration,
            )?));
            return Ok(());
        }

        Err(BuildError::MalformedAst(node.kind()))
    }

    /// Interface constants and annotation-type constants: one `Variable` per
    /// `ConstantDeclaratorRest` descendant, whose name is the identifier
    /// written immediately before it.
    fn append_constant_declarations(
        &self,
        modifiers: &Modifiers,
        members: &mut Vec<Member>,
        node: &SyntaxNode,
    ) -> Result<(), BuildError> {
        expect_kind_in(
            node,
            &[
                SyntaxKind::InterfaceMethodOrFieldDecl,
                SyntaxKind::AnnotationTypeElementRest,
            ],
        )?;
        let ty = self.reference_type(&required_child(node, SyntaxKind::Type)?)?;
        for rest in descendants_of_kind(node, SyntaxKind::ConstantDeclaratorRest) {
            let identifier = prev_in_tree(&SyntaxElement::from(rest.clone()))
                .and_then(SyntaxElement::into_token)
                .filter(|token| token.kind() == SyntaxKind::Identifier)
                .ok_or(BuildError::MalformedAst(rest.kind()))?;
            let dimensions = children_of_kind(&rest, SyntaxKind::Dim).count();
            let initializer = self
                .variable_initializer(&required_child(&rest, SyntaxKind::VariableInitializer)?)?;
            members.push(Member::Variable(Variable {
                origin: self.origin(rest.clone()),
                modifiers: modifiers.clone(),
                ty: self.apply_dim(ty.clone(), dimensions),
                simple_name: identifier.text().to_string(),
                initializer: Some(initializer),
            }));
        }
        Ok(())
    }

    // --- Annotation types ----------------------------------------------------

    fn annotation_type_declaration(
        &self,
        modifiers: Modifiers,
        node: &SyntaxNode,
    ) -> Result<ClassDecl, BuildError> {
        expect_kind(node, SyntaxKind::AnnotationTypeDeclaration)?;
        let simple_name = required_token(node, SyntaxKind::Identifier)?.text().to_string();
        let mut members = Vec::new();
        let body = required_child(node, SyntaxKind::AnnotationTypeBody)?;
        for declaration in children_of_kind(&body, SyntaxKind::AnnotationTypeElementDeclaration) {
            if let Some(rest) =
                child_of_kind(&declaration, SyntaxKind::AnnotationTypeElementRest)
            {
                self.append_annotation_type_element(&mut members, &rest)?;
            }
        }
        Ok(ClassDecl {
            origin: self.origin(node.clone()),
            kind: Kind::AnnotationType,
            modifiers,
            simple_name: Some(simple_name),
            super_class: None,
            super_interfaces: Vec::new(),
            members,
        })
    }

    fn append_annotation_type_element(
        &self,
        members: &mut Vec<Member>,
        node: &SyntaxNode,
    ) -> Result<(), BuildError> {
        expect_kind(node, SyntaxKind::AnnotationTypeElementRest)?;
        if let Some(declaration) = first_of_kinds(
            node,
            &[
                SyntaxKind::InterfaceDeclaration,
                SyntaxKind::ClassDeclaration,
                SyntaxKind::EnumDeclaration,
                SyntaxKind::AnnotationTypeDeclaration,
            ],
        )
        .and_then(SyntaxElement::into_node)
        {
            members.push(Member::Class(
                self.type_declaration(Modifiers::empty(), &declaration)?,
            ));
            return Ok(());
        }

        let method_or_constant =
            required_child(node, SyntaxKind::AnnotationMethodOrConstantRest)?;
        if let Some(method_rest) =
            child_of_kind(&method_or_constant, SyntaxKind::AnnotationMethodRest)
        {
            let ty = required_child(node, SyntaxKind::Type)?;
            let name = required_token(node, SyntaxKind::Identifier)?;
            members.push(Member::Method(MethodDecl {
                origin: self.origin(method_rest.clone()),
                modifiers: Modifiers::empty(),
                return_type: Some(self.reference_type(&ty)?),
                simple_name: name.text().to_string(),
                parameters: Vec::new(),
                block: None,
                throws: Vec::new(),
                // Annotation element defaults are not lowered in this pass.
                default_value: None,
            }));
        } else {
            self.append_constant_declarations(&Modifiers::empty(), members, node)?;
        }
        Ok(())
    }

    // --- Statements ----------------------------------------------------------

    fn block(&self, node: &SyntaxNode) -> Result<Block, BuildError> {
        expect_kind(node, SyntaxKind::Block)?;
        Ok(Block {
            origin: self.origin(node.clone()),
            kind: Kind::Block,
            body: self.block_statements(&required_child(node, SyntaxKind::BlockStatements)?)?,
        })
    }

    fn block_statements(&self, node: &SyntaxNode) -> Result<Vec<Statement>, BuildError> {
        expect_kind(node, SyntaxKind::BlockStatements)?;
        let mut statements = Vec::new();
        for block_statement in children_of_kind(node, SyntaxKind::BlockStatement) {
            let inner = first_of_kinds(
                &block_statement,
                &[
                    SyntaxKind::Statement,
                    SyntaxKind::LocalVariableDeclarationStatement,
                    SyntaxKind::ClassDeclaration,
                    SyntaxKind::EnumDeclaration,
                ],
            )
            .and_then(SyntaxElement::into_node)
            .ok_or(BuildError::MalformedAst(block_statement.kind()))?;
            match inner.kind() {
                SyntaxKind::Statement => statements.push(self.statement(&inner)?),
                SyntaxKind::LocalVariableDeclarationStatement => {
                    let modifiers = self.modifiers_of(&inner)?;
                    let ty = self.reference_type(&required_child(&inner, SyntaxKind::Type)?)?;
                    let declarators =
                        required_child(&inner, SyntaxKind::VariableDeclarators)?;
                    for variable in self.variable_declarators(&modifiers, &ty, &declarators)? {
                        statements.push(Statement::Variable(variable));
                    }
                }
                SyntaxKind::ClassDeclaration => statements.push(Statement::Class(
                    self.class_declaration(Modifiers::empty(), &inner)?,
                )),
                SyntaxKind::EnumDeclaration => statements.push(Statement::Class(
                    self.enum_declaration(Modifiers::empty(), &inner)?,
                )),
                other => return Err(BuildError::MalformedAst(other)),
            }
        }
        Ok(statements)
    }

    /// The parentheses of `if`/`while`/`do`/`switch`/`synchronized` headers
    /// are statement syntax, not expression structure: the lowered condition
    /// is the expression between them. Parenthesized primaries keep their
    /// own node.
    fn par_expression_inner(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::ParExpression)?;
        self.expression(&required_child(node, SyntaxKind::Expression)?)
    }

    fn statement(&self, node: &SyntaxNode) -> Result<Statement, BuildError> {
        expect_kind(node, SyntaxKind::Statement)?;
        let child = first_significant_child(node)
            .and_then(SyntaxElement::into_node)
            .ok_or(BuildError::MalformedAst(node.kind()))?;
        match child.kind() {
            SyntaxKind::Block => Ok(Statement::Block(self.block(&child)?)),
            SyntaxKind::EmptyStatement => Ok(Statement::Empty(EmptyStatement {
                origin: self.origin(child.clone()),
            })),
            SyntaxKind::LabeledStatement => Ok(Statement::Labeled(LabeledStatement {
                origin: self.origin(child.clone()),
                label: required_token(&child, SyntaxKind::Identifier)?.text().to_string(),
                statement: Box::new(
                    self.statement(&required_child(&child, SyntaxKind::Statement)?)?,
                ),
            })),
            SyntaxKind::ExpressionStatement => Ok(Statement::Expression(ExpressionStatement {
                origin: self.origin(child.clone()),
                expression: self
                    .expression(&required_child(&child, SyntaxKind::StatementExpression)?)?,
            })),
            SyntaxKind::IfStatement => {
                let branches: Vec<SyntaxNode> =
                    children_of_kind(&child, SyntaxKind::Statement).collect();
                let then_statement = branches
                    .first()
                    .ok_or(BuildError::MalformedAst(child.kind()))?;
                let else_statement = match branches.get(1) {
                    Some(branch) => Some(Box::new(self.statement(branch)?)),
                    None => None,
                };
                Ok(Statement::If(IfStatement {
                    origin: self.origin(child.clone()),
                    condition: self
                        .par_expression_inner(&required_child(&child, SyntaxKind::ParExpression)?)?,
                    then_statement: Box::new(self.statement(then_statement)?),
                    else_statement,
                }))
            }
            SyntaxKind::AssertStatement => {
                let expressions: Vec<SyntaxNode> =
                    children_of_kind(&child, SyntaxKind::Expression).collect();
                let condition = expressions
                    .first()
                    .ok_or(BuildError::MalformedAst(child.kind()))?;
                let detail = match expressions.get(1) {
                    Some(expression) => Some(self.expression(expression)?),
                    None => None,
                };
                Ok(Statement::Assert(AssertStatement {
                    origin: self.origin(child.clone()),
                    condition: self.expression(condition)?,
                    detail,
                }))
            }
            SyntaxKind::SwitchStatement => self.switch_statement(&child),
            SyntaxKind::WhileStatement => Ok(Statement::While(WhileStatement {
                origin: self.origin(child.clone()),
                condition: self
                    .par_expression_inner(&required_child(&child, SyntaxKind::ParExpression)?)?,
                statement: Box::new(
                    self.statement(&required_child(&child, SyntaxKind::Statement)?)?,
                ),
            })),
            SyntaxKind::DoStatement => Ok(Statement::DoWhile(DoWhileStatement {
                origin: self.origin(child.clone()),
                statement: Box::new(
                    self.statement(&required_child(&child, SyntaxKind::Statement)?)?,
                ),
                condition: self
                    .par_expression_inner(&required_child(&child, SyntaxKind::ParExpression)?)?,
            })),
            SyntaxKind::ForStatement => self.for_statement(&child),
            SyntaxKind::BreakStatement => Ok(Statement::Break(BreakStatement {
                origin: self.origin(child.clone()),
                label: token_of_kind(&child, SyntaxKind::Identifier)
                    .map(|token| token.text().to_string()),
            })),
            SyntaxKind::ContinueStatement => Ok(Statement::Continue(ContinueStatement {
                origin: self.origin(child.clone()),
                label: token_of_kind(&child, SyntaxKind::Identifier)
                    .map(|token| token.text().to_string()),
            })),
            SyntaxKind::ReturnStatement => {
                let expression = match child_of_kind(&child, SyntaxKind::Expression) {
                    Some(expression) => Some(self.expression(&expression)?),
                    None => None,
                };
                Ok(Statement::Return(ReturnStatement {
                    origin: self.origin(child.clone()),
                    expression,
                }))
            }
            SyntaxKind::ThrowStatement => Ok(Statement::Throw(ThrowStatement {
                origin: self.origin(child.clone()),
                expression: self.expression(&required_child(&child, SyntaxKind::Expression)?)?,
            })),
            SyntaxKind::SynchronizedStatement => {
                Ok(Statement::Synchronized(SynchronizedStatement {
                    origin: self.origin(child.clone()),
                    expression: self
                        .par_expression_inner(&required_child(&child, SyntaxKind::ParExpression)?)?,
                    block: self.block(&required_child(&child, SyntaxKind::Block)?)?,
                }))
            }
            SyntaxKind::TryStatement => self.try_statement(&child),
            other => Err(BuildError::MalformedAst(other)),
        }
    }

    /// Accumulates pending labels and closes a group at every non-empty
    /// statement list; trailing fall-through labels form a final group with
    /// an empty body.
    fn switch_statement(&self, node: &SyntaxNode) -> Result<Statement, BuildError> {
        let expression =
            self.par_expression_inner(&required_child(node, SyntaxKind::ParExpression)?)?;
        let groups = required_child(node, SyntaxKind::SwitchBlockStatementGroups)?;
        let mut cases = Vec::new();
        let mut labels: Vec<CaseLabel> = Vec::new();
        for group in children_of_kind(&groups, SyntaxKind::SwitchBlockStatementGroup) {
            let label_node = required_child(&group, SyntaxKind::SwitchLabel)?;
            let expression = match child_of_kind(&label_node, SyntaxKind::ConstantExpression) {
                Some(constant) => Some(self.expression(&constant)?),
                None => None,
            };
            labels.push(CaseLabel {
                origin: self.origin(group.clone()),
                expression,
            });
            let block_statements = required_child(&group, SyntaxKind::BlockStatements)?;
            if significant_children(&block_statements).next().is_some() {
                let origin = labels[0].origin.clone();
                cases.push(CaseGroup {
                    origin,
                    labels: std::mem::take(&mut labels),
                    body: self.block_statements(&block_statements)?,
                });
            }
        }
        if !labels.is_empty() {
            let origin = labels[0].origin.clone();
            cases.push(CaseGroup {
                origin,
                labels,
                body: Vec::new(),
            });
        }
        Ok(Statement::Switch(SwitchStatement {
            origin: self.origin(node.clone()),
            expression,
            cases,
        }))
    }

    fn for_statement(&self, node: &SyntaxNode) -> Result<Statement, BuildError> {
        let Some(parameter) = child_of_kind(node, SyntaxKind::FormalParameter) else {
            let initializer = match child_of_kind(node, SyntaxKind::ForInit) {
                None => Vec::new(),
                Some(for_init) => {
                    if has_direct_child(&for_init, SyntaxKind::VariableDeclarators) {
                        let modifiers = self.modifiers_of(&for_init)?;
                        let ty =
                            self.reference_type(&required_child(&for_init, SyntaxKind::Type)?)?;
                        let declarators =
                            required_child(&for_init, SyntaxKind::VariableDeclarators)?;
                        self.variable_declarators(&modifiers, &ty, &declarators)?
                            .into_iter()
                            .map(Statement::Variable)
                            .collect()
                    } else {
                        self.statement_expressions(&for_init)?
                    }
                }
            };
            let condition = match child_of_kind(node, SyntaxKind::Expression) {
                Some(expression) => Some(self.expression(&expression)?),
                None => None,
            };
            let update = match child_of_kind(node, SyntaxKind::ForUpdate) {
                Some(for_update) => self.statement_expressions(&for_update)?,
                None => Vec::new(),
            };
            return Ok(Statement::For(ForStatement {
                origin: self.origin(node.clone()),
                initializer,
                condition,
                update,
                statement: Box::new(
                    self.statement(&required_child(node, SyntaxKind::Statement)?)?,
                ),
            }));
        };

        let variable = Variable {
            origin: self.origin(parameter.clone()),
            modifiers: Modifiers::empty(),
            ty: self.reference_type(&required_child(&parameter, SyntaxKind::Type)?)?,
            simple_name: required_token(
                &required_child(&parameter, SyntaxKind::VariableDeclaratorId)?,
                SyntaxKind::Identifier,
            )?
            .text()
            .to_string(),
            initializer: None,
        };
        Ok(Statement::EnhancedFor(EnhancedForStatement {
            origin: self.origin(node.clone()),
            variable,
            expression: self.expression(&required_child(node, SyntaxKind::Expression)?)?,
            statement: Box::new(self.statement(&required_child(node, SyntaxKind::Statement)?)?),
        }))
    }

    fn statement_expressions(&self, node: &SyntaxNode) -> Result<Vec<Statement>, BuildError> {
        expect_kind_in(node, &[SyntaxKind::ForInit, SyntaxKind::ForUpdate])?;
        children_of_kind(node, SyntaxKind::StatementExpression)
            .map(|statement_expression| {
                Ok(Statement::Expression(ExpressionStatement {
                    origin: self.origin(statement_expression.clone()),
                    expression: self.expression(&statement_expression)?,
                }))
            })
            .collect()
    }

    fn try_statement(&self, node: &SyntaxNode) -> Result<Statement, BuildError> {
        let node = match child_of_kind(node, SyntaxKind::TryWithResourcesStatement) {
            Some(inner) => inner,
            None => node.clone(),
        };
        let mut catches = Vec::new();
        for catch_node in children_of_kind(&node, SyntaxKind::CatchClause) {
            let parameter_node = required_child(&catch_node, SyntaxKind::CatchFormalParameter)?;
            let catch_type = required_child(&parameter_node, SyntaxKind::CatchType)?;
            // Only the first alternative of a union type is modelled.
            let parameter = Variable {
                origin: self.origin(parameter_node.clone()),
                modifiers: Modifiers::empty(),
                ty: self.qualified_identifier(&required_child(
                    &catch_type,
                    SyntaxKind::QualifiedIdentifier,
                )?)?,
                simple_name: required_token(
                    &required_child(&parameter_node, SyntaxKind::VariableDeclaratorId)?,
                    SyntaxKind::Identifier,
                )?
                .text()
                .to_string(),
                initializer: None,
            };
            catches.push(CatchClause {
                origin: self.origin(catch_node.clone()),
                parameter,
                block: self.block(&required_child(&catch_node, SyntaxKind::Block)?)?,
            });
        }
        let finally_block = match child_of_kind(&node, SyntaxKind::Finally) {
            Some(finally) => Some(self.block(&required_child(&finally, SyntaxKind::Block)?)?),
            None => None,
        };
        let resources = match child_of_kind(&node, SyntaxKind::ResourceSpecification) {
            Some(specification) => self.resource_specification(&specification)?,
            None => Vec::new(),
        };
        Ok(Statement::Try(TryStatement {
            origin: self.origin(node.clone()),
            resources,
            block: self.block(&required_child(&node, SyntaxKind::Block)?)?,
            catches,
            finally_block,
        }))
    }

    fn resource_specification(&self, node: &SyntaxNode) -> Result<Vec<Variable>, BuildError> {
        expect_kind(node, SyntaxKind::ResourceSpecification)?;
        children_of_kind(node, SyntaxKind::Resource)
            .map(|resource| {
                Ok(Variable {
                    origin: self.origin(resource.clone()),
                    modifiers: Modifiers::empty(),
                    ty: self.class_type(&required_child(&resource, SyntaxKind::ClassType)?)?,
                    simple_name: required_token(
                        &required_child(&resource, SyntaxKind::VariableDeclaratorId)?,
                        SyntaxKind::Identifier,
                    )?
                    .text()
                    .to_string(),
                    initializer: Some(
                        self.expression(&required_child(&resource, SyntaxKind::Expression)?)?,
                    ),
                })
            })
            .collect()
    }

    // --- Expressions ---------------------------------------------------------

    fn expression(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        let mut node = node.clone();
        if matches!(
            node.kind(),
            SyntaxKind::ConstantExpression | SyntaxKind::StatementExpression
        ) {
            let wrapper = required_child(&node, SyntaxKind::Expression)?;
            node = first_significant_child(&wrapper)
                .and_then(SyntaxElement::into_node)
                .ok_or(BuildError::MalformedAst(wrapper.kind()))?;
        } else if node.kind() == SyntaxKind::Expression {
            node = first_significant_child(&node)
                .and_then(SyntaxElement::into_node)
                .ok_or(BuildError::MalformedAst(node.kind()))?;
        }

        match node.kind() {
            SyntaxKind::ParExpression => Ok(Expression::Parenthesized(Parenthesized {
                origin: self.origin(node.clone()),
                expression: Box::new(
                    self.expression(&required_child(&node, SyntaxKind::Expression)?)?,
                ),
            })),
            SyntaxKind::Primary => self.primary(&node),
            kind if kind.is_binary_expression_rule() => self.binary_expression(&node),
            SyntaxKind::ConditionalExpression => self.conditional_expression(&node),
            SyntaxKind::AssignmentExpression => self.assignment_expression(&node),
            SyntaxKind::UnaryExpression => self.unary_expression(&node),
            other => Err(BuildError::MalformedAst(other)),
        }
    }

    /// Folds `p0 op0 p1 op1 … pn` into a left-leaning tree, iteratively so
    /// long operator chains cost no stack. `instanceof` cannot be chained
    /// and is handled as a leaf shape.
    fn binary_expression(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        if token_of_kind(node, SyntaxKind::InstanceofKw).is_some() {
            let operand = first_significant_child(node)
                .and_then(SyntaxElement::into_node)
                .ok_or(BuildError::MalformedAst(node.kind()))?;
            return Ok(Expression::InstanceOf(InstanceOf {
                origin: self.origin(node.clone()),
                expression: Box::new(self.expression(&operand)?),
                ty: Box::new(
                    self.reference_type(&required_child(node, SyntaxKind::ReferenceType)?)?,
                ),
            }));
        }

        let children: Vec<SyntaxElement> = significant_children(node).collect();
        let first = children.first().ok_or(BuildError::MalformedAst(node.kind()))?;
        let mut expression = self.expression(as_node(first)?)?;
        let mut index = 2;
        while index < children.len() {
            let operator = as_token(&children[index - 1])?;
            let kind = binary_kind(operator.kind())?;
            expression = Expression::Binary(BinaryExpression {
                origin: self.origin(node.clone()),
                left_operand: Box::new(expression),
                kind,
                right_operand: Box::new(self.expression(as_node(&children[index])?)?),
            });
            index += 2;
        }
        Ok(expression)
    }

    /// Right-associative fold stepping backwards by four children:
    /// `c1 ? a : c2 ? b : d` nests to the right.
    fn conditional_expression(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        let children: Vec<SyntaxElement> = significant_children(node).collect();
        let last = children.last().ok_or(BuildError::MalformedAst(node.kind()))?;
        let mut expression = self.expression(as_node(last)?)?;
        let mut index = children.len() as isize - 5;
        while index >= 0 {
            let i = index as usize;
            expression = Expression::Conditional(ConditionalExpression {
                origin: self.origin(node.clone()),
                condition: Box::new(self.expression(as_node(&children[i])?)?),
                true_expression: Box::new(self.expression(as_node(&children[i + 2])?)?),
                false_expression: Box::new(expression),
            });
            index -= 4;
        }
        Ok(expression)
    }

    /// Right-associative fold in steps of two: `a = b = c` nests to the
    /// right. The operator token sits inside an `AssignmentOperator` node.
    fn assignment_expression(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        let children: Vec<SyntaxElement> = significant_children(node).collect();
        let last = children.last().ok_or(BuildError::MalformedAst(node.kind()))?;
        let mut expression = self.expression(as_node(last)?)?;
        let mut index = children.len() as isize - 3;
        while index >= 0 {
            let i = index as usize;
            let operator_node = as_node(&children[i + 1])?;
            let operator = first_significant_child(operator_node)
                .and_then(SyntaxElement::into_token)
                .ok_or(BuildError::MalformedAst(operator_node.kind()))?;
            expression = Expression::Assignment(AssignmentExpression {
                origin: self.origin(node.clone()),
                variable: Box::new(self.expression(as_node(&children[i])?)?),
                kind: assignment_kind(operator.kind())?,
                expression: Box::new(expression),
            });
            index -= 2;
        }
        Ok(expression)
    }

    /// Cast / prefix / postfix trichotomy.
    fn unary_expression(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        if has_direct_child(node, SyntaxKind::Type) {
            // ( Type ) operand
            let children: Vec<SyntaxElement> = significant_children(node).collect();
            let operand = children
                .get(3)
                .ok_or(BuildError::MalformedAst(node.kind()))?;
            return Ok(Expression::TypeCast(TypeCast {
                origin: self.origin(node.clone()),
                ty: Box::new(self.reference_type(&required_child(node, SyntaxKind::Type)?)?),
                expression: Box::new(self.expression(as_node(operand)?)?),
            }));
        }

        if let Some(prefix) = child_of_kind(node, SyntaxKind::PrefixOp) {
            let operator = first_significant_child(&prefix)
                .and_then(SyntaxElement::into_token)
                .ok_or(BuildError::MalformedAst(prefix.kind()))?;
            let children: Vec<SyntaxElement> = significant_children(node).collect();
            let operand = children
                .get(1)
                .ok_or(BuildError::MalformedAst(node.kind()))?;
            return Ok(Expression::Unary(UnaryExpression {
                origin: self.origin(node.clone()),
                kind: prefix_kind(operator.kind())?,
                expression: Box::new(self.expression(as_node(operand)?)?),
            }));
        }

        let first = first_significant_child(node)
            .and_then(SyntaxElement::into_node)
            .ok_or(BuildError::MalformedAst(node.kind()))?;
        let mut result = self.expression(&first)?;
        for selector in children_of_kind(node, SyntaxKind::Selector) {
            result = self.apply_selector(result, &selector)?;
        }
        for postfix in children_of_kind(node, SyntaxKind::PostfixOp) {
            let operator = first_significant_child(&postfix)
                .and_then(SyntaxElement::into_token)
                .ok_or(BuildError::MalformedAst(postfix.kind()))?;
            result = Expression::Unary(UnaryExpression {
                origin: self.origin(node.clone()),
                kind: postfix_kind(operator.kind())?,
                expression: Box::new(result),
            });
        }
        Ok(result)
    }

    fn primary(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::Primary)?;
        let first = first_significant_child(node).ok_or(BuildError::MalformedAst(node.kind()))?;
        match &first {
            NodeOrToken::Node(child) => match child.kind() {
                SyntaxKind::ParExpression => self.expression(child),
                SyntaxKind::Literal => self.literal(child),
                SyntaxKind::QualifiedIdentifier => self.qualified_identifier_primary(node, child),
                SyntaxKind::BasicType => self.class_literal(node, &first),
                other => Err(BuildError::MalformedAst(other)),
            },
            NodeOrToken::Token(token) => match token.kind() {
                SyntaxKind::ThisKw => {
                    let identifier = Expression::Identifier(self.identifier(token)?);
                    match child_of_kind(node, SyntaxKind::Arguments) {
                        // this(arguments)
                        Some(arguments) => Ok(Expression::MethodInvocation(MethodInvocation {
                            origin: self.origin(node.clone()),
                            method_select: Box::new(identifier),
                            arguments: self.arguments(&arguments)?,
                        })),
                        None => Ok(identifier),
                    }
                }
                SyntaxKind::SuperKw => self.apply_super_suffix(
                    Expression::Identifier(self.identifier(token)?),
                    &required_child(node, SyntaxKind::SuperSuffix)?,
                ),
                SyntaxKind::NewKw => self.creator(&required_child(node, SyntaxKind::Creator)?),
                SyntaxKind::VoidKw => self.class_literal(node, &first),
                other => Err(BuildError::MalformedAst(other)),
            },
        }
    }

    /// `int.class`, `int[].class`, `void.class`.
    fn class_literal(
        &self,
        node: &SyntaxNode,
        type_element: &SyntaxElement,
    ) -> Result<Expression, BuildError> {
        let basic = Expression::PrimitiveType(self.basic_type(type_element)?);
        let dimensions = children_of_kind(node, SyntaxKind::Dim).count();
        let class_token = required_token(node, SyntaxKind::ClassKw)?;
        Ok(Expression::MemberSelect(MemberSelect {
            origin: self.origin(node.clone()),
            expression: Box::new(self.apply_dim(basic, dimensions)),
            identifier: self.identifier(&class_token)?,
        }))
    }

    fn qualified_identifier_primary(
        &self,
        node: &SyntaxNode,
        qualified: &SyntaxNode,
    ) -> Result<Expression, BuildError> {
        let identifier = self.qualified_identifier(qualified)?;
        let Some(suffix) = child_of_kind(node, SyntaxKind::IdentifierSuffix) else {
            return Ok(identifier);
        };
        let first =
            first_significant_child(&suffix).ok_or(BuildError::MalformedAst(suffix.kind()))?;
        match first.kind() {
            SyntaxKind::LBracket => {
                if let Some(class_token) = token_of_kind(&suffix, SyntaxKind::ClassKw) {
                    // id[].class
                    let dimensions = children_of_kind(&suffix, SyntaxKind::Dim).count() + 1;
                    Ok(Expression::MemberSelect(MemberSelect {
                        origin: self.origin(node.clone()),
                        expression: Box::new(self.apply_dim(identifier, dimensions)),
                        identifier: self.identifier(&class_token)?,
                    }))
                } else {
                    // id[expression]
                    Ok(Expression::ArrayAccess(ArrayAccess {
                        origin: self.origin(node.clone()),
                        expression: Box::new(identifier),
                        index: Box::new(
                            self.expression(&required_child(&suffix, SyntaxKind::Expression)?)?,
                        ),
                    }))
                }
            }
            SyntaxKind::Arguments => {
                // id(arguments)
                Ok(Expression::MethodInvocation(MethodInvocation {
                    origin: self.origin(node.clone()),
                    method_select: Box::new(identifier),
                    arguments: self.arguments(as_node(&first)?)?,
                }))
            }
            SyntaxKind::Dot => {
                if let Some(class_token) = token_of_kind(&suffix, SyntaxKind::ClassKw) {
                    // id.class
                    Ok(Expression::MemberSelect(MemberSelect {
                        origin: self.origin(node.clone()),
                        expression: Box::new(identifier),
                        identifier: self.identifier(&class_token)?,
                    }))
                } else if let Some(invocation) =
                    child_of_kind(&suffix, SyntaxKind::ExplicitGenericInvocation)
                {
                    // id.<T>…
                    self.apply_explicit_generic_invocation(identifier, &invocation)
                } else if let Some(this_token) = token_of_kind(&suffix, SyntaxKind::ThisKw) {
                    // id.this
                    Ok(Expression::MemberSelect(MemberSelect {
                        origin: self.origin(node.clone()),
                        expression: Box::new(identifier),
                        identifier: self.identifier(&this_token)?,
                    }))
                } else if let Some(super_token) = token_of_kind(&suffix, SyntaxKind::SuperKw) {
                    // id.super(arguments)
                    Ok(Expression::MethodInvocation(MethodInvocation {
                        origin: self.origin(node.clone()),
                        method_select: Box::new(Expression::MemberSelect(MemberSelect {
                            origin: self.origin(node.clone()),
                            expression: Box::new(identifier),
                            identifier: self.identifier(&super_token)?,
                        })),
                        arguments: self
                            .arguments(&required_child(&suffix, SyntaxKind::Arguments)?)?,
                    }))
                } else if has_direct_child(&suffix, SyntaxKind::NewKw) {
                    // id.new Inner(arguments)
                    let inner = required_child(&suffix, SyntaxKind::InnerCreator)?;
                    self.apply_class_creator_rest(
                        Some(identifier),
                        &required_child(&inner, SyntaxKind::ClassCreatorRest)?,
                    )
                } else {
                    Err(BuildError::MalformedAst(suffix.kind()))
                }
            }
            other => Err(BuildError::MalformedAst(other)),
        }
    }

    fn apply_selector(
        &self,
        expression: Expression,
        selector: &SyntaxNode,
    ) -> Result<Expression, BuildError> {
        expect_kind(selector, SyntaxKind::Selector)?;
        if let Some(arguments) = child_of_kind(selector, SyntaxKind::Arguments) {
            // .name(arguments)
            let identifier = self.identifier(&required_token(selector, SyntaxKind::Identifier)?)?;
            return Ok(Expression::MethodInvocation(MethodInvocation {
                origin: self.origin(selector.clone()),
                method_select: Box::new(Expression::MemberSelect(MemberSelect {
                    origin: self.origin(selector.clone()),
                    expression: Box::new(expression),
                    identifier,
                })),
                arguments: self.arguments(&arguments)?,
            }));
        }
        if let Some(name) = token_of_kind(selector, SyntaxKind::Identifier) {
            return Ok(Expression::MemberSelect(MemberSelect {
                origin: self.origin(selector.clone()),
                expression: Box::new(expression),
                identifier: self.identifier(&name)?,
            }));
        }
        if let Some(invocation) = child_of_kind(selector, SyntaxKind::ExplicitGenericInvocation) {
            return self.apply_explicit_generic_invocation(expression, &invocation);
        }
        if let Some(this_token) = token_of_kind(selector, SyntaxKind::ThisKw) {
            return Ok(Expression::MemberSelect(MemberSelect {
                origin: self.origin(selector.clone()),
                expression: Box::new(expression),
                identifier: self.identifier(&this_token)?,
            }));
        }
        if let Some(super_suffix) = child_of_kind(selector, SyntaxKind::SuperSuffix) {
            let super_token = required_token(selector, SyntaxKind::SuperKw)?;
            return self.apply_super_suffix(
                Expression::MemberSelect(MemberSelect {
                    origin: self.origin(selector.clone()),
                    expression: Box::new(expression),
                    identifier: self.identifier(&super_token)?,
                }),
                &super_suffix,
            );
        }
        if let Some(dim_expr) = child_of_kind(selector, SyntaxKind::DimExpr) {
            return Ok(Expression::ArrayAccess(ArrayAccess {
                origin: self.origin(selector.clone()),
                expression: Box::new(expression),
                index: Box::new(
                    self.expression(&required_child(&dim_expr, SyntaxKind::Expression)?)?,
                ),
            }));
        }
        Err(BuildError::MalformedAst(SyntaxKind::Selector))
    }

    /// `super(args)`, `super.field`, `super.method(args)`.
    fn apply_super_suffix(
        &self,
        expression: Expression,
        node: &SyntaxNode,
    ) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::SuperSuffix)?;
        if let Some(arguments) = child_of_kind(node, SyntaxKind::Arguments) {
            let method_select = match token_of_kind(node, SyntaxKind::Identifier) {
                Some(name) => Expression::MemberSelect(MemberSelect {
                    origin: self.origin(node.clone()),
                    expression: Box::new(expression),
                    identifier: self.identifier(&name)?,
                }),
                None => expression,
            };
            Ok(Expression::MethodInvocation(MethodInvocation {
                origin: self.origin(node.clone()),
                method_select: Box::new(method_select),
                arguments: self.arguments(&arguments)?,
            }))
        } else {
            Ok(Expression::MemberSelect(MemberSelect {
                origin: self.origin(node.clone()),
                expression: Box::new(expression),
                identifier: self.identifier(&required_token(node, SyntaxKind::Identifier)?)?,
            }))
        }
    }

    fn apply_explicit_generic_invocation(
        &self,
        expression: Expression,
        node: &SyntaxNode,
    ) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::ExplicitGenericInvocation)?;
        // Type arguments are erased in this pass.
        let suffix = required_child(node, SyntaxKind::ExplicitGenericInvocationSuffix)?;
        if let Some(super_suffix) = child_of_kind(&suffix, SyntaxKind::SuperSuffix) {
            let super_token = required_token(&suffix, SyntaxKind::SuperKw)?;
            let expression = Expression::MemberSelect(MemberSelect {
                origin: self.origin(node.clone()),
                expression: Box::new(expression),
                identifier: self.identifier(&super_token)?,
            });
            self.apply_super_suffix(expression, &super_suffix)
        } else {
            Ok(Expression::MethodInvocation(MethodInvocation {
                origin: self.origin(node.clone()),
                method_select: Box::new(Expression::MemberSelect(MemberSelect {
                    origin: self.origin(node.clone()),
                    expression: Box::new(expression),
                    identifier: self
                        .identifier(&required_token(&suffix, SyntaxKind::Identifier)?)?,
                })),
                arguments: self.arguments(&required_child(&suffix, SyntaxKind::Arguments)?)?,
            }))
        }
    }

    fn creator(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::Creator)?;
        if let Some(rest) = child_of_kind(node, SyntaxKind::ClassCreatorRest) {
            return self.apply_class_creator_rest(None, &rest);
        }
        let Some(rest) = child_of_kind(node, SyntaxKind::ArrayCreatorRest) else {
            return Err(BuildError::MalformedAst(node.kind()));
        };
        let type_element = prev_significant_sibling(&SyntaxElement::from(rest.clone()))
            .ok_or(BuildError::MalformedAst(node.kind()))?;
        let ty = match &type_element {
            NodeOrToken::Node(type_node) if type_node.kind() == SyntaxKind::BasicType => {
                Expression::PrimitiveType(self.basic_type(&type_element)?)
            }
            NodeOrToken::Node(type_node) => self.class_type(type_node)?,
            NodeOrToken::Token(token) => return Err(BuildError::MalformedAst(token.kind())),
        };
        if let Some(initializer) = child_of_kind(&rest, SyntaxKind::ArrayInitializer) {
            self.array_initializer(Some(ty), &initializer)
        } else {
            let mut dimensions =
                vec![self.expression(&required_child(&rest, SyntaxKind::Expression)?)?];
            for dim_expr in children_of_kind(&rest, SyntaxKind::DimExpr) {
                dimensions
                    .push(self.expression(&required_child(&dim_expr, SyntaxKind::Expression)?)?);
            }
            Ok(Expression::NewArray(NewArray {
                origin: self.origin(node.clone()),
                ty: Some(Box::new(ty)),
                dimensions,
                initializers: Vec::new(),
            }))
        }
    }

    fn apply_class_creator_rest(
        &self,
        enclosing_expression: Option<Expression>,
        node: &SyntaxNode,
    ) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::ClassCreatorRest)?;
        let class_body = match child_of_kind(node, SyntaxKind::ClassBody) {
            Some(body) => Some(Box::new(ClassDecl {
                origin: self.origin(node.clone()),
                kind: Kind::Class,
                modifiers: Modifiers::empty(),
                simple_name: None,
                super_class: None,
                super_interfaces: Vec::new(),
                members: self.class_body(&body)?,
            })),
            None => None,
        };
        Ok(Expression::NewClass(NewClass {
            origin: self.origin(node.clone()),
            enclosing_expression: enclosing_expression.map(Box::new),
            arguments: self.arguments(&required_child(node, SyntaxKind::Arguments)?)?,
            class_body,
        }))
    }

    fn array_initializer(
        &self,
        ty: Option<Expression>,
        node: &SyntaxNode,
    ) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::ArrayInitializer)?;
        let mut initializers = Vec::new();
        for initializer in children_of_kind(node, SyntaxKind::VariableInitializer) {
            initializers.push(self.variable_initializer(&initializer)?);
        }
        Ok(Expression::NewArray(NewArray {
            origin: self.origin(node.clone()),
            ty: ty.map(Box::new),
            dimensions: Vec::new(),
            initializers,
        }))
    }

    fn variable_initializer(&self, node: &SyntaxNode) -> Result<Expression, BuildError> {
        expect_kind(node, SyntaxKind::VariableInitializer)?;
        let first = first_significant_child(node)
            .and_then(SyntaxElement::into_node)
            .ok_or(BuildError::MalformedAst(node.kind()))?;
        match first.kind() {
            SyntaxKind::Expression => self.expression(&first),
            SyntaxKind::ArrayInitializer => self.array_initializer(None, &first),
            other => Err(BuildError::MalformedAst(other)),
        }
    }

    fn arguments(&self, node: &SyntaxNode) -> Result<Vec<Expression>, BuildError> {
        expect_kind(node, SyntaxKind::Arguments)?;
        children_of_kind(node, SyntaxKind::Expression)
            .map(|argument| self.expression(&argument))
            .collect()
    }
}
