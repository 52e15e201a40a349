use pretty_assertions::assert_eq;

use robusta_checks::{
    CaseInsensitiveComparisonCheck, CheckList, EqualsOverridenWithHashCodeCheck,
    IfConditionAlwaysTrueOrFalseCheck, NestedBlocksCheck,
};
use robusta_syntax::cst::{node, token, tree, GreenElement, SyntaxNode};
use robusta_syntax::scanner::{run_checks, FileScanner, Issue};
use robusta_syntax::tree::{CompilationUnit, Member, Statement, TreeNode};
use robusta_syntax::{build_compilation_unit, SyntaxKind as K};

// --- Concrete-tree fixtures --------------------------------------------------

fn ws(text: &str) -> GreenElement {
    token(K::Whitespace, text)
}

fn ident(name: &str) -> GreenElement {
    token(K::Identifier, name)
}

fn qualified(names: &[&str]) -> GreenElement {
    let mut children = Vec::new();
    for (index, name) in names.iter().enumerate() {
        if index > 0 {
            children.push(token(K::Dot, "."));
        }
        children.push(ident(name));
    }
    node(K::QualifiedIdentifier, children)
}

fn name_primary(names: &[&str]) -> GreenElement {
    node(K::Primary, vec![qualified(names)])
}

fn wrap_expression(inner: GreenElement) -> GreenElement {
    node(K::Expression, vec![inner])
}

fn statement(inner: GreenElement) -> GreenElement {
    node(K::Statement, vec![inner])
}

// A Statement wrapped as one entry of a block's statement list.
fn block_entry(inner: GreenElement) -> GreenElement {
    node(
        K::BlockStatement,
        vec![node(K::Statement, vec![inner])],
    )
}

fn block_with(entries: Vec<GreenElement>) -> GreenElement {
    node(
        K::Block,
        vec![
            token(K::LBrace, "{"),
            node(K::BlockStatements, entries),
            token(K::RBrace, "}"),
        ],
    )
}

fn arguments(list: Vec<GreenElement>) -> GreenElement {
    let mut children = vec![token(K::LParen, "(")];
    for (index, argument) in list.into_iter().enumerate() {
        if index > 0 {
            children.push(token(K::Comma, ","));
        }
        children.push(wrap_expression(argument));
    }
    children.push(token(K::RParen, ")"));
    node(K::Arguments, children)
}

fn empty_formal_parameters() -> GreenElement {
    node(
        K::FormalParameters,
        vec![token(K::LParen, "("), token(K::RParen, ")")],
    )
}

fn class_body(members: Vec<GreenElement>) -> GreenElement {
    let mut children = vec![token(K::LBrace, "{")];
    children.extend(members);
    children.push(token(K::RBrace, "}"));
    node(K::ClassBody, children)
}

/// `void <name>() { <entries> }` as a class member.
fn void_method(name: &str, entries: Vec<GreenElement>) -> GreenElement {
    node(
        K::ClassBodyDeclaration,
        vec![node(
            K::MemberDecl,
            vec![
                token(K::VoidKw, "void"),
                ident(name),
                node(
                    K::VoidMethodDeclaratorRest,
                    vec![
                        empty_formal_parameters(),
                        node(K::MethodBody, vec![block_with(entries)]),
                    ],
                ),
            ],
        )],
    )
}

/// A bodyless typed method as a class member, with formal parameters.
fn typed_method(
    return_type: GreenElement,
    name: &str,
    parameters: Vec<GreenElement>,
) -> GreenElement {
    let mut formal = vec![token(K::LParen, "(")];
    formal.extend(parameters);
    formal.push(token(K::RParen, ")"));
    node(
        K::ClassBodyDeclaration,
        vec![node(
            K::MemberDecl,
            vec![
                node(K::Type, vec![return_type]),
                ident(name),
                node(
                    K::MethodDeclaratorRest,
                    vec![
                        node(K::FormalParameters, formal),
                        node(
                            K::MethodBody,
                            vec![block_with(vec![])],
                        ),
                    ],
                ),
            ],
        )],
    )
}

fn object_parameter(name: &str) -> GreenElement {
    node(
        K::FormalParameter,
        vec![
            node(K::Type, vec![node(K::ClassType, vec![ident("Object")])]),
            node(K::VariableDeclaratorId, vec![ident(name)]),
        ],
    )
}

fn class_unit(members: Vec<GreenElement>) -> SyntaxNode {
    tree(
        K::CompilationUnit,
        vec![node(
            K::TypeDeclaration,
            vec![node(
                K::ClassDeclaration,
                vec![token(K::ClassKw, "class"), ident("A"), class_body(members)],
            )],
        )],
    )
}

fn run_check(unit: &CompilationUnit, check: Box<dyn FileScanner>) -> Vec<Issue> {
    let mut checks = vec![check];
    run_checks(unit, &mut checks)
}

// --- S1145 -------------------------------------------------------------------

#[test]
fn reports_if_with_parenthesized_boolean_condition_at_its_line() {
    // class A { void m() {\n if ((true)) {} else ; } }
    let inner_parens = node(
        K::Primary,
        vec![node(
            K::ParExpression,
            vec![
                token(K::LParen, "("),
                wrap_expression(node(
                    K::Primary,
                    vec![node(K::Literal, vec![token(K::TrueKw, "true")])],
                )),
                token(K::RParen, ")"),
            ],
        )],
    );
    let if_statement = node(
        K::IfStatement,
        vec![
            token(K::IfKw, "if"),
            node(
                K::ParExpression,
                vec![
                    token(K::LParen, "("),
                    wrap_expression(inner_parens),
                    token(K::RParen, ")"),
                ],
            ),
            statement(block_with(vec![])),
            token(K::ElseKw, "else"),
            statement(node(K::EmptyStatement, vec![token(K::Semicolon, ";")])),
        ],
    );
    let unit = class_unit(vec![void_method(
        "m",
        vec![ws("\n"), block_entry(if_statement)],
    )]);
    let ast = build_compilation_unit(&unit).unwrap();

    // The reported line is the if statement's own line.
    let Member::Method(method) = &ast.types()[0].members()[0] else {
        panic!("expected a method");
    };
    let Statement::If(if_statement) = &method.block().unwrap().body()[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(if_statement.line(), 2);

    let issues = run_check(&ast, Box::new(IfConditionAlwaysTrueOrFalseCheck));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule_key.to_string(), "java:S1145");
    assert_eq!(issues[0].message, "Remove this if statement.");
    assert_eq!(issues[0].line, 2);
}

#[test]
fn ignores_if_conditions_that_are_not_boolean_literals() {
    let if_statement = node(
        K::IfStatement,
        vec![
            token(K::IfKw, "if"),
            node(
                K::ParExpression,
                vec![
                    token(K::LParen, "("),
                    wrap_expression(name_primary(&["flag"])),
                    token(K::RParen, ")"),
                ],
            ),
            statement(block_with(vec![])),
        ],
    );
    let unit = class_unit(vec![void_method("m", vec![block_entry(if_statement)])]);
    let ast = build_compilation_unit(&unit).unwrap();
    assert!(run_check(&ast, Box::new(IfConditionAlwaysTrueOrFalseCheck)).is_empty());
}

// --- S1199 -------------------------------------------------------------------

#[test]
fn reports_blocks_nested_directly_in_blocks() {
    let nested = block_entry(node(
        K::Block,
        vec![
            token(K::LBrace, "{"),
            node(K::BlockStatements, vec![]),
            token(K::RBrace, "}"),
        ],
    ));
    let unit = class_unit(vec![void_method("m", vec![nested])]);
    let ast = build_compilation_unit(&unit).unwrap();
    let issues = run_check(&ast, Box::new(NestedBlocksCheck));
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].message,
        "Extract this nested code block into a method."
    );
}

#[test]
fn method_bodies_are_not_nested_blocks() {
    let unit = class_unit(vec![void_method("m", vec![])]);
    let ast = build_compilation_unit(&unit).unwrap();
    assert!(run_check(&ast, Box::new(NestedBlocksCheck)).is_empty());
}

// --- S1157 -------------------------------------------------------------------

fn expression_statement(expression: GreenElement) -> GreenElement {
    node(
        K::ExpressionStatement,
        vec![
            node(K::StatementExpression, vec![wrap_expression(expression)]),
            token(K::Semicolon, ";"),
        ],
    )
}

fn selector_call(name: &str, args: Vec<GreenElement>) -> GreenElement {
    node(
        K::Selector,
        vec![token(K::Dot, "."), ident(name), arguments(args)],
    )
}

#[test]
fn reports_case_changing_equals_comparisons() {
    // a.toUpperCase().equals(b);
    let on_receiver = node(
        K::UnaryExpression,
        vec![
            name_primary(&["a"]),
            selector_call("toUpperCase", vec![]),
            selector_call("equals", vec![name_primary(&["b"])]),
        ],
    );
    // a.equals(b.toLowerCase());
    let argument_call = node(
        K::UnaryExpression,
        vec![
            name_primary(&["b"]),
            selector_call("toLowerCase", vec![]),
        ],
    );
    let on_argument = node(
        K::Primary,
        vec![
            qualified(&["a", "equals"]),
            node(K::IdentifierSuffix, vec![arguments(vec![argument_call])]),
        ],
    );
    let unit = class_unit(vec![void_method(
        "m",
        vec![
            block_entry(expression_statement(on_receiver)),
            block_entry(expression_statement(on_argument)),
        ],
    )]);
    let ast = build_compilation_unit(&unit).unwrap();
    let issues = run_check(&ast, Box::new(CaseInsensitiveComparisonCheck));
    assert_eq!(issues.len(), 2);
}

#[test]
fn plain_equals_comparisons_are_fine() {
    let plain = node(
        K::UnaryExpression,
        vec![
            name_primary(&["a"]),
            selector_call("equals", vec![name_primary(&["b"])]),
        ],
    );
    let unit = class_unit(vec![void_method(
        "m",
        vec![block_entry(expression_statement(plain))],
    )]);
    let ast = build_compilation_unit(&unit).unwrap();
    assert!(run_check(&ast, Box::new(CaseInsensitiveComparisonCheck)).is_empty());
}

// --- S1206 -------------------------------------------------------------------

#[test]
fn reports_equals_without_hash_code() {
    let equals = typed_method(
        node(K::BasicType, vec![token(K::BooleanKw, "boolean")]),
        "equals",
        vec![object_parameter("o")],
    );
    let unit = class_unit(vec![equals]);
    let ast = build_compilation_unit(&unit).unwrap();
    let issues = run_check(&ast, Box::new(EqualsOverridenWithHashCodeCheck));
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].message,
        "This class overrides \"equals()\" and should therefore also override \"hashCode()\"."
    );
}

#[test]
fn reports_hash_code_without_equals() {
    let hash_code = typed_method(
        node(K::BasicType, vec![token(K::IntKw, "int")]),
        "hashCode",
        vec![],
    );
    let unit = class_unit(vec![hash_code]);
    let ast = build_compilation_unit(&unit).unwrap();
    let issues = run_check(&ast, Box::new(EqualsOverridenWithHashCodeCheck));
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].message,
        "This class overrides \"hashCode()\" and should therefore also override \"equals()\"."
    );
}

#[test]
fn equals_and_hash_code_together_are_fine() {
    let equals = typed_method(
        node(K::BasicType, vec![token(K::BooleanKw, "boolean")]),
        "equals",
        vec![object_parameter("o")],
    );
    let hash_code = typed_method(
        node(K::BasicType, vec![token(K::IntKw, "int")]),
        "hashCode",
        vec![],
    );
    let unit = class_unit(vec![equals, hash_code]);
    let ast = build_compilation_unit(&unit).unwrap();
    assert!(run_check(&ast, Box::new(EqualsOverridenWithHashCodeCheck)).is_empty());
}

// --- Registry ----------------------------------------------------------------

#[test]
fn check_list_registers_every_rule_once() {
    let checks = CheckList::all();
    let mut keys: Vec<String> = checks
        .iter()
        .map(|check| check.rule_key().to_string())
        .collect();
    assert_eq!(keys.len(), 4);
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 4);
    assert!(keys.contains(&"java:S1145".to_string()));
}
