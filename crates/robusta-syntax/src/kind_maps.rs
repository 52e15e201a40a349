//! Token-kind to tree-kind tables.
//!
//! Pure, total functions over the closed token domains. Anything outside the
//! requested category fails closed with [`BuildError::UnknownOperator`] (or
//! [`BuildError::MalformedAst`] for non-operator tables) instead of being
//! guessed at.

use crate::error::BuildError;
use crate::syntax_kind::SyntaxKind;
use crate::tree::{Kind, Modifier};

/// Maps a literal terminal to its tree kind.
///
/// `true` and `false` share [`Kind::BooleanLiteral`].
pub fn literal_kind(token: SyntaxKind) -> Result<Kind, BuildError> {
    Ok(match token {
        SyntaxKind::IntLiteral => Kind::IntLiteral,
        SyntaxKind::LongLiteral => Kind::LongLiteral,
        SyntaxKind::FloatLiteral => Kind::FloatLiteral,
        SyntaxKind::DoubleLiteral => Kind::DoubleLiteral,
        SyntaxKind::TrueKw | SyntaxKind::FalseKw => Kind::BooleanLiteral,
        SyntaxKind::CharLiteral => Kind::CharLiteral,
        SyntaxKind::StringLiteral => Kind::StringLiteral,
        SyntaxKind::NullKw => Kind::NullLiteral,
        other => return Err(BuildError::MalformedAst(other)),
    })
}

/// Maps a binary operator token to its tree kind.
pub fn binary_kind(token: SyntaxKind) -> Result<Kind, BuildError> {
    Ok(match token {
        SyntaxKind::Star => Kind::Multiply,
        SyntaxKind::Slash => Kind::Divide,
        SyntaxKind::Percent => Kind::Remainder,
        SyntaxKind::Plus => Kind::Plus,
        SyntaxKind::Minus => Kind::Minus,
        SyntaxKind::LeftShift => Kind::LeftShift,
        SyntaxKind::RightShift => Kind::RightShift,
        SyntaxKind::UnsignedRightShift => Kind::UnsignedRightShift,
        SyntaxKind::Less => Kind::LessThan,
        SyntaxKind::Greater => Kind::GreaterThan,
        SyntaxKind::LessEq => Kind::LessThanOrEqualTo,
        SyntaxKind::GreaterEq => Kind::GreaterThanOrEqualTo,
        SyntaxKind::EqEq => Kind::EqualTo,
        SyntaxKind::BangEq => Kind::NotEqualTo,
        SyntaxKind::Amp => Kind::And,
        SyntaxKind::Caret => Kind::Xor,
        SyntaxKind::Pipe => Kind::Or,
        SyntaxKind::AmpAmp => Kind::ConditionalAnd,
        SyntaxKind::PipePipe => Kind::ConditionalOr,
        other => return Err(BuildError::UnknownOperator(other)),
    })
}

/// Maps a prefix operator token to its tree kind.
pub fn prefix_kind(token: SyntaxKind) -> Result<Kind, BuildError> {
    Ok(match token {
        SyntaxKind::PlusPlus => Kind::PrefixIncrement,
        SyntaxKind::MinusMinus => Kind::PrefixDecrement,
        SyntaxKind::Plus => Kind::UnaryPlus,
        SyntaxKind::Minus => Kind::UnaryMinus,
        SyntaxKind::Tilde => Kind::BitwiseComplement,
        SyntaxKind::Bang => Kind::LogicalComplement,
        other => return Err(BuildError::UnknownOperator(other)),
    })
}

/// Maps a postfix operator token to its tree kind.
pub fn postfix_kind(token: SyntaxKind) -> Result<Kind, BuildError> {
    Ok(match token {
        SyntaxKind::PlusPlus => Kind::PostfixIncrement,
        SyntaxKind::MinusMinus => Kind::PostfixDecrement,
        other => return Err(BuildError::UnknownOperator(other)),
    })
}

/// Maps an assignment operator token to its tree kind.
pub fn assignment_kind(token: SyntaxKind) -> Result<Kind, BuildError> {
    Ok(match token {
        SyntaxKind::Eq => Kind::Assignment,
        SyntaxKind::StarEq => Kind::MultiplyAssignment,
        SyntaxKind::SlashEq => Kind::DivideAssignment,
        SyntaxKind::PercentEq => Kind::RemainderAssignment,
        SyntaxKind::PlusEq => Kind::PlusAssignment,
        SyntaxKind::MinusEq => Kind::MinusAssignment,
        SyntaxKind::LeftShiftEq => Kind::LeftShiftAssignment,
        SyntaxKind::RightShiftEq => Kind::RightShiftAssignment,
        SyntaxKind::UnsignedRightShiftEq => Kind::UnsignedRightShiftAssignment,
        SyntaxKind::AmpEq => Kind::AndAssignment,
        SyntaxKind::CaretEq => Kind::XorAssignment,
        SyntaxKind::PipeEq => Kind::OrAssignment,
        other => return Err(BuildError::UnknownOperator(other)),
    })
}

/// Maps a declaration-modifier keyword to its [`Modifier`].
pub fn modifier_kind(token: SyntaxKind) -> Result<Modifier, BuildError> {
    Ok(match token {
        SyntaxKind::PublicKw => Modifier::Public,
        SyntaxKind::ProtectedKw => Modifier::Protected,
        SyntaxKind::PrivateKw => Modifier::Private,
        SyntaxKind::AbstractKw => Modifier::Abstract,
        SyntaxKind::StaticKw => Modifier::Static,
        SyntaxKind::FinalKw => Modifier::Final,
        SyntaxKind::TransientKw => Modifier::Transient,
        SyntaxKind::VolatileKw => Modifier::Volatile,
        SyntaxKind::SynchronizedKw => Modifier::Synchronized,
        SyntaxKind::NativeKw => Modifier::Native,
        SyntaxKind::StrictfpKw => Modifier::Strictfp,
        other => return Err(BuildError::MalformedAst(other)),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BINARY_TOKENS: &[SyntaxKind] = &[
        SyntaxKind::Star,
        SyntaxKind::Slash,
        SyntaxKind::Percent,
        SyntaxKind::Plus,
        SyntaxKind::Minus,
        SyntaxKind::LeftShift,
        SyntaxKind::RightShift,
        SyntaxKind::UnsignedRightShift,
        SyntaxKind::Less,
        SyntaxKind::Greater,
        SyntaxKind::LessEq,
        SyntaxKind::GreaterEq,
        SyntaxKind::EqEq,
        SyntaxKind::BangEq,
        SyntaxKind::Amp,
        SyntaxKind::Caret,
        SyntaxKind::Pipe,
        SyntaxKind::AmpAmp,
        SyntaxKind::PipePipe,
    ];

    const ASSIGNMENT_TOKENS: &[SyntaxKind] = &[
        SyntaxKind::Eq,
        SyntaxKind::StarEq,
        SyntaxKind::SlashEq,
        SyntaxKind::PercentEq,
        SyntaxKind::PlusEq,
        SyntaxKind::MinusEq,
        SyntaxKind::LeftShiftEq,
        SyntaxKind::RightShiftEq,
        SyntaxKind::UnsignedRightShiftEq,
        SyntaxKind::AmpEq,
        SyntaxKind::CaretEq,
        SyntaxKind::PipeEq,
    ];

    #[test]
    fn binary_operators_are_total_and_distinct() {
        let kinds: Vec<_> = BINARY_TOKENS
            .iter()
            .map(|&token| binary_kind(token).unwrap())
            .collect();
        let mut deduped = kinds.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(kinds.len(), 19);
        assert_eq!(deduped.len(), kinds.len());
    }

    #[test]
    fn assignment_operators_are_total_and_distinct() {
        let kinds: Vec<_> = ASSIGNMENT_TOKENS
            .iter()
            .map(|&token| assignment_kind(token).unwrap())
            .collect();
        let mut deduped = kinds.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(kinds.len(), 12);
        assert_eq!(deduped.len(), kinds.len());
    }

    #[test]
    fn prefix_and_postfix_operators_are_total_and_distinct() {
        let prefix: Vec<_> = [
            SyntaxKind::PlusPlus,
            SyntaxKind::MinusMinus,
            SyntaxKind::Plus,
            SyntaxKind::Minus,
            SyntaxKind::Tilde,
            SyntaxKind::Bang,
        ]
        .iter()
        .map(|&token| prefix_kind(token).unwrap())
        .collect();
        let postfix: Vec<_> = [SyntaxKind::PlusPlus, SyntaxKind::MinusMinus]
            .iter()
            .map(|&token| postfix_kind(token).unwrap())
            .collect();

        let mut all = prefix.clone();
        all.extend(&postfix);
        let mut deduped = all.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(all.len(), 8);
        assert_eq!(deduped.len(), all.len());
    }

    #[test]
    fn wrong_category_fails_closed() {
        assert_eq!(
            binary_kind(SyntaxKind::PlusPlus),
            Err(BuildError::UnknownOperator(SyntaxKind::PlusPlus))
        );
        assert_eq!(
            prefix_kind(SyntaxKind::Star),
            Err(BuildError::UnknownOperator(SyntaxKind::Star))
        );
        assert_eq!(
            postfix_kind(SyntaxKind::Bang),
            Err(BuildError::UnknownOperator(SyntaxKind::Bang))
        );
        assert_eq!(
            assignment_kind(SyntaxKind::EqEq),
            Err(BuildError::UnknownOperator(SyntaxKind::EqEq))
        );
    }

    #[test]
    fn literals_cover_every_literal_terminal() {
        assert_eq!(literal_kind(SyntaxKind::IntLiteral), Ok(Kind::IntLiteral));
        assert_eq!(literal_kind(SyntaxKind::LongLiteral), Ok(Kind::LongLiteral));
        assert_eq!(
            literal_kind(SyntaxKind::FloatLiteral),
            Ok(Kind::FloatLiteral)
        );
        assert_eq!(
            literal_kind(SyntaxKind::DoubleLiteral),
            Ok(Kind::DoubleLiteral)
        );
        assert_eq!(literal_kind(SyntaxKind::TrueKw), Ok(Kind::BooleanLiteral));
        assert_eq!(literal_kind(SyntaxKind::FalseKw), Ok(Kind::BooleanLiteral));
        assert_eq!(literal_kind(SyntaxKind::CharLiteral), Ok(Kind::CharLiteral));
        assert_eq!(
            literal_kind(SyntaxKind::StringLiteral),
            Ok(Kind::StringLiteral)
        );
        assert_eq!(literal_kind(SyntaxKind::NullKw), Ok(Kind::NullLiteral));
    }

    #[test]
    fn modifiers_cover_the_declaration_keywords() {
        let tokens = [
            SyntaxKind::PublicKw,
            SyntaxKind::ProtectedKw,
            SyntaxKind::PrivateKw,
            SyntaxKind::AbstractKw,
            SyntaxKind::StaticKw,
            SyntaxKind::FinalKw,
            SyntaxKind::TransientKw,
            SyntaxKind::VolatileKw,
            SyntaxKind::SynchronizedKw,
            SyntaxKind::NativeKw,
            SyntaxKind::StrictfpKw,
        ];
        let mut modifiers: Vec<_> = tokens
            .iter()
            .map(|&token| modifier_kind(token).unwrap())
            .collect();
        modifiers.sort();
        modifiers.dedup();
        assert_eq!(modifiers.len(), tokens.len());
        assert!(modifier_kind(SyntaxKind::ClassKw).is_err());
    }
}
