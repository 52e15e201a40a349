use crate::syntax_kind::SyntaxKind;

/// Failure raised while lowering a concrete tree into the typed tree.
///
/// Both variants mark structurally impossible input: a concrete tree produced
/// by the upstream grammar never triggers them. The builder does not recover;
/// a partial typed tree is never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A concrete node does not have the shape its grammar rule promises.
    #[error("malformed syntax tree at {0:?}")]
    MalformedAst(SyntaxKind),
    /// A punctuation token outside the operator category it was looked up in.
    #[error("unknown operator token {0:?}")]
    UnknownOperator(SyntaxKind),
}
