use rowan::Language;

/// Unified syntax kind for tokens and grammar-rule nodes of the concrete tree.
///
/// This enum is intentionally "fat": the tree builder dispatches on the full
/// closed set of grammar productions the upstream parser emits, so every
/// terminal and non-terminal needs a stable kind. Values are only meaningful
/// within a process; nothing here is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- Trivia ---
    Whitespace,
    LineComment,
    BlockComment,
    DocComment,

    // --- Identifiers & literals ---
    Identifier,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,

    // --- Keywords ---
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    GotoKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,

    // Literal keywords.
    TrueKw,
    FalseKw,
    NullKw,

    // --- Separators ---
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,

    // --- Operators ---
    Question,
    Colon,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Tilde,
    Bang,

    Eq,
    EqEq,
    BangEq,

    Less,
    LessEq,
    Greater,
    GreaterEq,

    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,

    PlusPlus,
    MinusMinus,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    LeftShift,
    RightShift,
    UnsignedRightShift,
    LeftShiftEq,
    RightShiftEq,
    UnsignedRightShiftEq,

    // --- Special ---
    Error,

    // --- Compilation unit ---
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration,
    TypeDeclaration,
    QualifiedIdentifier,
    QualifiedIdentifierList,

    // --- Class declarations ---
    ClassDeclaration,
    ClassBody,
    ClassBodyDeclaration,
    ClassInitDeclaration,
    MemberDecl,
    FieldDeclaration,
    MethodDeclaratorRest,
    VoidMethodDeclaratorRest,
    ConstructorDeclaratorRest,
    GenericMethodOrConstructorRest,
    MethodBody,

    // --- Interface declarations ---
    InterfaceDeclaration,
    InterfaceBody,
    InterfaceBodyDeclaration,
    InterfaceMemberDecl,
    InterfaceMethodOrFieldDecl,
    InterfaceMethodOrFieldRest,
    InterfaceMethodDeclaratorRest,
    VoidInterfaceMethodDeclaratorsRest,
    InterfaceGenericMethodDecl,
    ConstantDeclaratorsRest,
    ConstantDeclarator,
    ConstantDeclaratorRest,

    // --- Enum declarations ---
    EnumDeclaration,
    EnumBody,
    EnumConstants,
    EnumConstant,
    EnumBodyDeclarations,

    // --- Annotation type declarations ---
    AnnotationTypeDeclaration,
    AnnotationTypeBody,
    AnnotationTypeElementDeclaration,
    AnnotationTypeElementRest,
    AnnotationMethodOrConstantRest,
    AnnotationMethodRest,
    DefaultValue,
    Annotation,

    // --- Variables & parameters ---
    Modifier,
    FormalParameters,
    FormalParameter,
    VariableDeclaratorId,
    VariableDeclarators,
    VariableDeclarator,
    VariableInitializer,
    ArrayInitializer,

    // --- Types ---
    Type,
    ReferenceType,
    BasicType,
    ClassType,
    ClassTypeList,
    Dim,
    DimExpr,
    TypeArguments,
    TypeArgument,
    NonWildcardTypeArguments,
    TypeParameters,

    // --- Statements ---
    Block,
    BlockStatements,
    BlockStatement,
    LocalVariableDeclarationStatement,
    Statement,
    EmptyStatement,
    LabeledStatement,
    ExpressionStatement,
    IfStatement,
    AssertStatement,
    SwitchStatement,
    SwitchBlockStatementGroups,
    SwitchBlockStatementGroup,
    SwitchLabel,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForInit,
    ForUpdate,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    SynchronizedStatement,
    TryStatement,
    TryWithResourcesStatement,
    ResourceSpecification,
    Resource,
    CatchClause,
    CatchFormalParameter,
    CatchType,
    Finally,

    // --- Expressions ---
    Arguments,
    Expression,
    ConstantExpression,
    StatementExpression,
    AssignmentExpression,
    AssignmentOperator,
    ConditionalExpression,
    ConditionalOrExpression,
    ConditionalAndExpression,
    InclusiveOrExpression,
    ExclusiveOrExpression,
    AndExpression,
    EqualityExpression,
    RelationalExpression,
    ShiftExpression,
    AdditiveExpression,
    MultiplicativeExpression,
    UnaryExpression,
    PrefixOp,
    PostfixOp,
    Primary,
    ParExpression,
    IdentifierSuffix,
    ExplicitGenericInvocation,
    ExplicitGenericInvocationSuffix,
    Selector,
    SuperSuffix,
    Creator,
    InnerCreator,
    ClassCreatorRest,
    ArrayCreatorRest,
    Literal,

    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::DocComment
        )
    }

    /// True for the binary-family rule nodes folded by the expression builder.
    pub fn is_binary_expression_rule(self) -> bool {
        matches!(
            self,
            SyntaxKind::ConditionalOrExpression
                | SyntaxKind::ConditionalAndExpression
                | SyntaxKind::InclusiveOrExpression
                | SyntaxKind::ExclusiveOrExpression
                | SyntaxKind::AndExpression
                | SyntaxKind::EqualityExpression
                | SyntaxKind::RelationalExpression
                | SyntaxKind::ShiftExpression
                | SyntaxKind::AdditiveExpression
                | SyntaxKind::MultiplicativeExpression
        )
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "abstract" => SyntaxKind::AbstractKw,
            "assert" => SyntaxKind::AssertKw,
            "boolean" => SyntaxKind::BooleanKw,
            "break" => SyntaxKind::BreakKw,
            "byte" => SyntaxKind::ByteKw,
            "case" => SyntaxKind::CaseKw,
            "catch" => SyntaxKind::CatchKw,
            "char" => SyntaxKind::CharKw,
            "class" => SyntaxKind::ClassKw,
            "const" => SyntaxKind::ConstKw,
            "continue" => SyntaxKind::ContinueKw,
            "default" => SyntaxKind::DefaultKw,
            "do" => SyntaxKind::DoKw,
            "double" => SyntaxKind::DoubleKw,
            "else" => SyntaxKind::ElseKw,
            "enum" => SyntaxKind::EnumKw,
            "extends" => SyntaxKind::ExtendsKw,
            "final" => SyntaxKind::FinalKw,
            "finally" => SyntaxKind::FinallyKw,
            "float" => SyntaxKind::FloatKw,
            "for" => SyntaxKind::ForKw,
            "goto" => SyntaxKind::GotoKw,
            "if" => SyntaxKind::IfKw,
            "implements" => SyntaxKind::ImplementsKw,
            "import" => SyntaxKind::ImportKw,
            "instanceof" => SyntaxKind::InstanceofKw,
            "int" => SyntaxKind::IntKw,
            "interface" => SyntaxKind::InterfaceKw,
            "long" => SyntaxKind::LongKw,
            "native" => SyntaxKind::NativeKw,
            "new" => SyntaxKind::NewKw,
            "package" => SyntaxKind::PackageKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "return" => SyntaxKind::ReturnKw,
            "short" => SyntaxKind::ShortKw,
            "static" => SyntaxKind::StaticKw,
            "strictfp" => SyntaxKind::StrictfpKw,
            "super" => SyntaxKind::SuperKw,
            "switch" => SyntaxKind::SwitchKw,
            "synchronized" => SyntaxKind::SynchronizedKw,
            "this" => SyntaxKind::ThisKw,
            "throw" => SyntaxKind::ThrowKw,
            "throws" => SyntaxKind::ThrowsKw,
            "transient" => SyntaxKind::TransientKw,
            "try" => SyntaxKind::TryKw,
            "void" => SyntaxKind::VoidKw,
            "volatile" => SyntaxKind::VolatileKw,
            "while" => SyntaxKind::WhileKw,

            "true" => SyntaxKind::TrueKw,
            "false" => SyntaxKind::FalseKw,
            "null" => SyntaxKind::NullKw,

            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for the Java concrete tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaLanguage {}

impl Language for JavaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        if raw.0 < SyntaxKind::__Last as u16 {
            // SAFETY: the numeric value has been checked against the enum range.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
        } else {
            SyntaxKind::Error
        }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}
