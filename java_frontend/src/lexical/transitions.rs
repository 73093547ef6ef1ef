//! Lexer states and the dense `(state, class) -> action` table
//!
//! Rows are declared as a default action followed by specific entries; a
//! later entry overrides an earlier one. After all rows are filled, every
//! state that would consume end of input is rewritten to fail, so the
//! automaton can never advance past the last character.

use super::classes::{CharClass, NCLASS};
use crate::tokens::{AffiliationStyle, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LexState {
    Initial,
    Identifier,
    Space,
    CarriageReturn,
    Slash,
    LineComment,
    BlockComment,
    BlockCommentStar,

    Zero,
    OctalInt,
    DecimalInt,
    HexPrefix,
    HexInt,
    HexFraction,
    BinPrefix,
    BinInt,
    Dot,
    Ellipsis2,
    Fraction,
    ExponentMark,
    ExponentSign,
    Exponent,

    StringOpen1,
    StringOpen2,
    StringBody,
    StringEscape,
    TextBlockOpen,
    TextBlockBody,
    TextBlockQuote1,
    TextBlockQuote2,
    TextBlockEscape,
    CharOpen,
    CharBody,
    CharEscape,

    Plus,
    Minus,
    Star,
    Percent,
    Caret,
    Bang,
    Eq,
    Amp,
    Pipe,
    Lt,
    Shl,
    Gt,
    Shr,
    UShr,
    Colon,
}

pub const NSTATE: usize = LexState::Colon as usize + 1;

/// Lexical failure raised directly by the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexFault {
    InvalidCharacter,
    InvalidNumber,
    UnterminatedString,
    UnterminatedChar,
    UnterminatedTextBlock,
    UnterminatedComment,
    InvalidCharLiteral,
    InvalidTextBlockOpening,
    UnexpectedEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Consume the character and stay
    Advance,
    /// Consume the character and move to a state
    Shift(LexState),
    /// Reduce the pending text to a token without consuming
    Emit(TokenKind),
    /// Consume, then reduce to a token
    Include(TokenKind),
    /// Reduce the pending text to an affiliation without consuming
    Affiliate(AffiliationStyle),
    /// Consume, then reduce to an affiliation
    IncludeAffiliate(AffiliationStyle),
    /// End of input in the initial state
    Finish,
    Fail(LexFault),
}

pub static TRANSITIONS: [[Action; NCLASS]; NSTATE] = build_table();

#[inline]
pub fn action(state: LexState, class: CharClass) -> Action {
    TRANSITIONS[state as usize][class as usize]
}

#[rustfmt::skip]
const fn build_table() -> [[Action; NCLASS]; NSTATE] {
    use Action::*;
    use CharClass as C;
    use LexState as S;
    use TokenKind as K;

    let mut t = [[Fail(LexFault::InvalidCharacter); NCLASS]; NSTATE];

    macro_rules! row {
        ($st:expr, default => $to:expr) => {{
            let mut c = 0;
            while c < NCLASS {
                t[$st as usize][c] = $to;
                c += 1;
            }
        }};
    }
    macro_rules! tr {
        ($st:expr, [$($c:expr),+ $(,)?] => $to:expr) => {
            $( t[$st as usize][$c as usize] = $to; )+
        };
    }
    macro_rules! digits {
        ($st:expr => $to:expr) => {
            tr!($st, [C::Zero, C::OctDigit, C::Digit89] => $to);
        };
    }
    macro_rules! ident_chars {
        ($st:expr => $to:expr) => {
            tr!($st, [
                C::Zero, C::OctDigit, C::Digit89, C::HexLetter, C::LetterB, C::LetterD,
                C::LetterE, C::LetterF, C::LetterL, C::LetterX, C::LetterP, C::OtherLetter,
                C::IdentPart, C::Underscore, C::Dollar,
            ] => $to);
        };
    }
    macro_rules! hex_digits {
        ($st:expr => $to:expr) => {
            tr!($st, [
                C::Zero, C::OctDigit, C::Digit89, C::HexLetter, C::LetterB, C::LetterD,
                C::LetterE, C::LetterF,
            ] => $to);
        };
    }
    // Operator with an optional trailing `=`
    macro_rules! op_eq {
        ($st:expr, $single:expr, $with_eq:expr) => {
            row!($st, default => Emit($single));
            tr!($st, [C::Eq] => Include($with_eq));
        };
    }

    // Initial dispatch
    ident_chars!(S::Initial => Shift(S::Identifier));
    tr!(S::Initial, [C::IdentPart] => Fail(LexFault::InvalidCharacter));
    tr!(S::Initial, [C::Zero] => Shift(S::Zero));
    tr!(S::Initial, [C::OctDigit, C::Digit89] => Shift(S::DecimalInt));
    tr!(S::Initial, [C::Eof] => Finish);
    tr!(S::Initial, [C::Space] => Shift(S::Space));
    tr!(S::Initial, [C::Newline] => IncludeAffiliate(AffiliationStyle::Newline));
    tr!(S::Initial, [C::CarriageReturn] => Shift(S::CarriageReturn));
    tr!(S::Initial, [C::Slash] => Shift(S::Slash));
    tr!(S::Initial, [C::Dot] => Shift(S::Dot));
    tr!(S::Initial, [C::Quote] => Shift(S::StringOpen1));
    tr!(S::Initial, [C::Apostrophe] => Shift(S::CharOpen));
    tr!(S::Initial, [C::LParen] => Include(K::LParen));
    tr!(S::Initial, [C::RParen] => Include(K::RParen));
    tr!(S::Initial, [C::LBrace] => Include(K::LBrace));
    tr!(S::Initial, [C::RBrace] => Include(K::RBrace));
    tr!(S::Initial, [C::LBracket] => Include(K::LBracket));
    tr!(S::Initial, [C::RBracket] => Include(K::RBracket));
    tr!(S::Initial, [C::Semicolon] => Include(K::Semicolon));
    tr!(S::Initial, [C::Comma] => Include(K::Comma));
    tr!(S::Initial, [C::At] => Include(K::At));
    tr!(S::Initial, [C::Tilde] => Include(K::Tilde));
    tr!(S::Initial, [C::Question] => Include(K::Question));
    tr!(S::Initial, [C::Colon] => Shift(S::Colon));
    tr!(S::Initial, [C::Plus] => Shift(S::Plus));
    tr!(S::Initial, [C::Minus] => Shift(S::Minus));
    tr!(S::Initial, [C::Star] => Shift(S::Star));
    tr!(S::Initial, [C::Percent] => Shift(S::Percent));
    tr!(S::Initial, [C::Caret] => Shift(S::Caret));
    tr!(S::Initial, [C::Bang] => Shift(S::Bang));
    tr!(S::Initial, [C::Eq] => Shift(S::Eq));
    tr!(S::Initial, [C::Amp] => Shift(S::Amp));
    tr!(S::Initial, [C::Pipe] => Shift(S::Pipe));
    tr!(S::Initial, [C::Lt] => Shift(S::Lt));
    tr!(S::Initial, [C::Gt] => Shift(S::Gt));

    row!(S::Identifier, default => Emit(K::Identifier));
    ident_chars!(S::Identifier => Advance);

    // Trivia
    row!(S::Space, default => Affiliate(AffiliationStyle::Space));
    tr!(S::Space, [C::Space] => Advance);

    row!(S::CarriageReturn, default => Affiliate(AffiliationStyle::Newline));
    tr!(S::CarriageReturn, [C::Newline] => IncludeAffiliate(AffiliationStyle::Newline));

    row!(S::Slash, default => Emit(K::Slash));
    tr!(S::Slash, [C::Slash] => Shift(S::LineComment));
    tr!(S::Slash, [C::Star] => Shift(S::BlockComment));
    tr!(S::Slash, [C::Eq] => Include(K::SlashEq));

    row!(S::LineComment, default => Advance);
    tr!(S::LineComment, [C::Newline, C::CarriageReturn, C::Eof]
        => Affiliate(AffiliationStyle::LineComment));

    row!(S::BlockComment, default => Advance);
    tr!(S::BlockComment, [C::Star] => Shift(S::BlockCommentStar));
    tr!(S::BlockComment, [C::Eof] => Fail(LexFault::UnterminatedComment));

    row!(S::BlockCommentStar, default => Shift(S::BlockComment));
    tr!(S::BlockCommentStar, [C::Star] => Advance);
    tr!(S::BlockCommentStar, [C::Slash] => IncludeAffiliate(AffiliationStyle::BlockComment));
    tr!(S::BlockCommentStar, [C::Eof] => Fail(LexFault::UnterminatedComment));

    // Numbers. Identifier characters glued to a number are an error.
    row!(S::Zero, default => Emit(K::IntLiteral));
    ident_chars!(S::Zero => Fail(LexFault::InvalidNumber));
    digits!(S::Zero => Shift(S::OctalInt));
    tr!(S::Zero, [C::Underscore] => Shift(S::OctalInt));
    tr!(S::Zero, [C::LetterX] => Shift(S::HexPrefix));
    tr!(S::Zero, [C::LetterB] => Shift(S::BinPrefix));
    tr!(S::Zero, [C::Dot] => Shift(S::Fraction));
    tr!(S::Zero, [C::LetterE] => Shift(S::ExponentMark));
    tr!(S::Zero, [C::LetterL] => Include(K::LongLiteral));
    tr!(S::Zero, [C::LetterF] => Include(K::FloatLiteral));
    tr!(S::Zero, [C::LetterD] => Include(K::DoubleLiteral));

    // Octal and decimal share a shape; octal digits are checked when decoding
    row!(S::OctalInt, default => Emit(K::IntLiteral));
    ident_chars!(S::OctalInt => Fail(LexFault::InvalidNumber));
    digits!(S::OctalInt => Advance);
    tr!(S::OctalInt, [C::Underscore] => Advance);
    tr!(S::OctalInt, [C::Dot] => Shift(S::Fraction));
    tr!(S::OctalInt, [C::LetterE] => Shift(S::ExponentMark));
    tr!(S::OctalInt, [C::LetterL] => Include(K::LongLiteral));
    tr!(S::OctalInt, [C::LetterF] => Include(K::FloatLiteral));
    tr!(S::OctalInt, [C::LetterD] => Include(K::DoubleLiteral));

    row!(S::DecimalInt, default => Emit(K::IntLiteral));
    ident_chars!(S::DecimalInt => Fail(LexFault::InvalidNumber));
    digits!(S::DecimalInt => Advance);
    tr!(S::DecimalInt, [C::Underscore] => Advance);
    tr!(S::DecimalInt, [C::Dot] => Shift(S::Fraction));
    tr!(S::DecimalInt, [C::LetterE] => Shift(S::ExponentMark));
    tr!(S::DecimalInt, [C::LetterL] => Include(K::LongLiteral));
    tr!(S::DecimalInt, [C::LetterF] => Include(K::FloatLiteral));
    tr!(S::DecimalInt, [C::LetterD] => Include(K::DoubleLiteral));

    row!(S::HexPrefix, default => Fail(LexFault::InvalidNumber));
    hex_digits!(S::HexPrefix => Shift(S::HexInt));
    tr!(S::HexPrefix, [C::Dot] => Shift(S::HexFraction));

    row!(S::HexInt, default => Emit(K::IntLiteral));
    ident_chars!(S::HexInt => Fail(LexFault::InvalidNumber));
    hex_digits!(S::HexInt => Advance);
    tr!(S::HexInt, [C::Underscore] => Advance);
    tr!(S::HexInt, [C::LetterL] => Include(K::LongLiteral));
    tr!(S::HexInt, [C::LetterP] => Shift(S::ExponentMark));
    tr!(S::HexInt, [C::Dot] => Shift(S::HexFraction));

    // A hex float requires its binary exponent
    row!(S::HexFraction, default => Fail(LexFault::InvalidNumber));
    hex_digits!(S::HexFraction => Advance);
    tr!(S::HexFraction, [C::Underscore] => Advance);
    tr!(S::HexFraction, [C::LetterP] => Shift(S::ExponentMark));

    row!(S::BinPrefix, default => Fail(LexFault::InvalidNumber));
    digits!(S::BinPrefix => Shift(S::BinInt));

    row!(S::BinInt, default => Emit(K::IntLiteral));
    ident_chars!(S::BinInt => Fail(LexFault::InvalidNumber));
    digits!(S::BinInt => Advance);
    tr!(S::BinInt, [C::Underscore] => Advance);
    tr!(S::BinInt, [C::LetterL] => Include(K::LongLiteral));

    row!(S::Dot, default => Emit(K::Dot));
    digits!(S::Dot => Shift(S::Fraction));
    tr!(S::Dot, [C::Dot] => Shift(S::Ellipsis2));

    row!(S::Ellipsis2, default => Fail(LexFault::InvalidCharacter));
    tr!(S::Ellipsis2, [C::Dot] => Include(K::Ellipsis));

    row!(S::Fraction, default => Emit(K::DoubleLiteral));
    ident_chars!(S::Fraction => Fail(LexFault::InvalidNumber));
    digits!(S::Fraction => Advance);
    tr!(S::Fraction, [C::Underscore] => Advance);
    tr!(S::Fraction, [C::LetterE] => Shift(S::ExponentMark));
    tr!(S::Fraction, [C::LetterF] => Include(K::FloatLiteral));
    tr!(S::Fraction, [C::LetterD] => Include(K::DoubleLiteral));

    row!(S::ExponentMark, default => Fail(LexFault::InvalidNumber));
    digits!(S::ExponentMark => Shift(S::Exponent));
    tr!(S::ExponentMark, [C::Plus, C::Minus] => Shift(S::ExponentSign));

    row!(S::ExponentSign, default => Fail(LexFault::InvalidNumber));
    digits!(S::ExponentSign => Shift(S::Exponent));

    row!(S::Exponent, default => Emit(K::DoubleLiteral));
    ident_chars!(S::Exponent => Fail(LexFault::InvalidNumber));
    digits!(S::Exponent => Advance);
    tr!(S::Exponent, [C::Underscore] => Advance);
    tr!(S::Exponent, [C::LetterF] => Include(K::FloatLiteral));
    tr!(S::Exponent, [C::LetterD] => Include(K::DoubleLiteral));

    // Strings and text blocks
    row!(S::StringOpen1, default => Shift(S::StringBody));
    tr!(S::StringOpen1, [C::Quote] => Shift(S::StringOpen2));
    tr!(S::StringOpen1, [C::Backslash] => Shift(S::StringEscape));
    tr!(S::StringOpen1, [C::Newline, C::CarriageReturn, C::Eof]
        => Fail(LexFault::UnterminatedString));

    // `""` is the empty string unless a third quote opens a text block
    row!(S::StringOpen2, default => Emit(K::StringLiteral));
    tr!(S::StringOpen2, [C::Quote] => Shift(S::TextBlockOpen));

    row!(S::StringBody, default => Advance);
    tr!(S::StringBody, [C::Quote] => Include(K::StringLiteral));
    tr!(S::StringBody, [C::Backslash] => Shift(S::StringEscape));
    tr!(S::StringBody, [C::Newline, C::CarriageReturn, C::Eof]
        => Fail(LexFault::UnterminatedString));

    row!(S::StringEscape, default => Shift(S::StringBody));
    tr!(S::StringEscape, [C::Newline, C::CarriageReturn, C::Eof]
        => Fail(LexFault::UnterminatedString));

    row!(S::TextBlockOpen, default => Fail(LexFault::InvalidTextBlockOpening));
    tr!(S::TextBlockOpen, [C::Space] => Advance);
    tr!(S::TextBlockOpen, [C::Newline, C::CarriageReturn] => Shift(S::TextBlockBody));
    tr!(S::TextBlockOpen, [C::Eof] => Fail(LexFault::UnterminatedTextBlock));

    row!(S::TextBlockBody, default => Advance);
    tr!(S::TextBlockBody, [C::Quote] => Shift(S::TextBlockQuote1));
    tr!(S::TextBlockBody, [C::Backslash] => Shift(S::TextBlockEscape));
    tr!(S::TextBlockBody, [C::Eof] => Fail(LexFault::UnterminatedTextBlock));

    row!(S::TextBlockQuote1, default => Shift(S::TextBlockBody));
    tr!(S::TextBlockQuote1, [C::Quote] => Shift(S::TextBlockQuote2));
    tr!(S::TextBlockQuote1, [C::Backslash] => Shift(S::TextBlockEscape));
    tr!(S::TextBlockQuote1, [C::Eof] => Fail(LexFault::UnterminatedTextBlock));

    row!(S::TextBlockQuote2, default => Shift(S::TextBlockBody));
    tr!(S::TextBlockQuote2, [C::Quote] => Include(K::TextBlock));
    tr!(S::TextBlockQuote2, [C::Backslash] => Shift(S::TextBlockEscape));
    tr!(S::TextBlockQuote2, [C::Eof] => Fail(LexFault::UnterminatedTextBlock));

    row!(S::TextBlockEscape, default => Shift(S::TextBlockBody));
    tr!(S::TextBlockEscape, [C::Eof] => Fail(LexFault::UnterminatedTextBlock));

    // Character literals
    row!(S::CharOpen, default => Shift(S::CharBody));
    tr!(S::CharOpen, [C::Apostrophe] => Fail(LexFault::InvalidCharLiteral));
    tr!(S::CharOpen, [C::Backslash] => Shift(S::CharEscape));
    tr!(S::CharOpen, [C::Newline, C::CarriageReturn, C::Eof]
        => Fail(LexFault::UnterminatedChar));

    row!(S::CharBody, default => Advance);
    tr!(S::CharBody, [C::Apostrophe] => Include(K::CharLiteral));
    tr!(S::CharBody, [C::Backslash] => Shift(S::CharEscape));
    tr!(S::CharBody, [C::Newline, C::CarriageReturn, C::Eof]
        => Fail(LexFault::UnterminatedChar));

    row!(S::CharEscape, default => Shift(S::CharBody));
    tr!(S::CharEscape, [C::Newline, C::CarriageReturn, C::Eof]
        => Fail(LexFault::UnterminatedChar));

    // Operators extend greedily
    row!(S::Plus, default => Emit(K::Plus));
    tr!(S::Plus, [C::Plus] => Include(K::PlusPlus));
    tr!(S::Plus, [C::Eq] => Include(K::PlusEq));

    row!(S::Minus, default => Emit(K::Minus));
    tr!(S::Minus, [C::Minus] => Include(K::MinusMinus));
    tr!(S::Minus, [C::Eq] => Include(K::MinusEq));
    tr!(S::Minus, [C::Gt] => Include(K::Arrow));

    op_eq!(S::Star, K::Star, K::StarEq);
    op_eq!(S::Percent, K::Percent, K::PercentEq);
    op_eq!(S::Caret, K::Caret, K::CaretEq);
    op_eq!(S::Bang, K::Bang, K::NotEq);
    op_eq!(S::Eq, K::Assign, K::EqEq);
    op_eq!(S::Shl, K::Shl, K::ShlEq);
    op_eq!(S::UShr, K::UShr, K::UShrEq);

    op_eq!(S::Amp, K::Amp, K::AmpEq);
    tr!(S::Amp, [C::Amp] => Include(K::AndAnd));

    op_eq!(S::Pipe, K::Pipe, K::PipeEq);
    tr!(S::Pipe, [C::Pipe] => Include(K::OrOr));

    op_eq!(S::Lt, K::Lt, K::LtEq);
    tr!(S::Lt, [C::Lt] => Shift(S::Shl));

    op_eq!(S::Gt, K::Gt, K::GtEq);
    tr!(S::Gt, [C::Gt] => Shift(S::Shr));

    op_eq!(S::Shr, K::Shr, K::ShrEq);
    tr!(S::Shr, [C::Gt] => Shift(S::UShr));

    row!(S::Colon, default => Emit(K::Colon));
    tr!(S::Colon, [C::Colon] => Include(K::ColonColon));

    // No state may consume end of input
    let mut s = 0;
    while s < NSTATE {
        if matches!(t[s][C::Eof as usize], Advance | Shift(_) | Include(_) | IncludeAffiliate(_)) {
            t[s][C::Eof as usize] = Fail(LexFault::UnexpectedEnd);
        }
        s += 1;
    }

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::classes::ALL_CLASSES;

    #[test]
    fn test_no_state_consumes_end_of_input() {
        for row in TRANSITIONS.iter() {
            let on_eof = row[CharClass::Eof as usize];
            assert!(
                !matches!(
                    on_eof,
                    Action::Advance
                        | Action::Shift(_)
                        | Action::Include(_)
                        | Action::IncludeAffiliate(_)
                ),
                "{:?}",
                on_eof
            );
        }
    }

    #[test]
    fn test_only_initial_finishes() {
        for (index, row) in TRANSITIONS.iter().enumerate() {
            for class in ALL_CLASSES {
                if row[class as usize] == Action::Finish {
                    assert_eq!(index, LexState::Initial as usize);
                    assert_eq!(class, CharClass::Eof);
                }
            }
        }
    }

    #[test]
    fn test_number_prefix_dispatch() {
        assert_eq!(action(LexState::Zero, CharClass::LetterX), Action::Shift(LexState::HexPrefix));
        assert_eq!(action(LexState::Zero, CharClass::LetterB), Action::Shift(LexState::BinPrefix));
        assert_eq!(action(LexState::HexInt, CharClass::LetterF), Action::Advance);
        assert_eq!(
            action(LexState::DecimalInt, CharClass::LetterF),
            Action::Include(TokenKind::FloatLiteral)
        );
        assert_eq!(
            action(LexState::HexFraction, CharClass::Semicolon),
            Action::Fail(LexFault::InvalidNumber)
        );
    }

    #[test]
    fn test_operator_chains() {
        assert_eq!(action(LexState::Gt, CharClass::Gt), Action::Shift(LexState::Shr));
        assert_eq!(action(LexState::Shr, CharClass::Gt), Action::Shift(LexState::UShr));
        assert_eq!(action(LexState::UShr, CharClass::Eq), Action::Include(TokenKind::UShrEq));
        assert_eq!(action(LexState::Minus, CharClass::Gt), Action::Include(TokenKind::Arrow));
        assert_eq!(action(LexState::Colon, CharClass::Eof), Action::Emit(TokenKind::Colon));
    }
}
