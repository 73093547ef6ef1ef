//! Character classes used as the column key of the transition table

use unicode_xid::UnicodeXID;

/// Category of a code point. Only ever used to index `TRANSITIONS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CharClass {
    Eof,
    /// Space, tab and form feed
    Space,
    Newline,
    CarriageReturn,
    Zero,
    /// `1`..=`7`
    OctDigit,
    /// `8` and `9`
    Digit89,
    /// Hex letters without another role: `a`, `c` and their upper case
    HexLetter,
    LetterB,
    LetterD,
    LetterE,
    LetterF,
    LetterL,
    LetterX,
    LetterP,
    OtherLetter,
    /// Identifier continuation that cannot start an identifier
    IdentPart,
    Underscore,
    Dollar,
    Dot,
    Quote,
    Apostrophe,
    Backslash,
    Slash,
    Star,
    Plus,
    Minus,
    Eq,
    Gt,
    Lt,
    Bang,
    Amp,
    Pipe,
    Caret,
    Percent,
    Tilde,
    Question,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    At,
    Other,
}

pub const NCLASS: usize = CharClass::Other as usize + 1;

/// Every class in discriminant order
pub const ALL_CLASSES: [CharClass; NCLASS] = {
    use CharClass::*;
    [
        Eof, Space, Newline, CarriageReturn, Zero, OctDigit, Digit89, HexLetter, LetterB,
        LetterD, LetterE, LetterF, LetterL, LetterX, LetterP, OtherLetter, IdentPart, Underscore,
        Dollar, Dot, Quote, Apostrophe, Backslash, Slash, Star, Plus, Minus, Eq, Gt, Lt, Bang,
        Amp, Pipe, Caret, Percent, Tilde, Question, Colon, LParen, RParen, LBrace, RBrace,
        LBracket, RBracket, Semicolon, Comma, At, Other,
    ]
};

#[rustfmt::skip]
static ASCII: [CharClass; 128] = {
    use CharClass::*;
    let mut t = [Other; 128];

    t[b' ' as usize] = Space;
    t[b'\t' as usize] = Space;
    t[0x0C] = Space;
    t[b'\n' as usize] = Newline;
    t[b'\r' as usize] = CarriageReturn;

    t[b'0' as usize] = Zero;
    let mut i = b'1'; while i <= b'7' { t[i as usize] = OctDigit; i += 1; }
    t[b'8' as usize] = Digit89;
    t[b'9' as usize] = Digit89;

    let mut i = b'a'; while i <= b'z' { t[i as usize] = OtherLetter; i += 1; }
    let mut i = b'A'; while i <= b'Z' { t[i as usize] = OtherLetter; i += 1; }
    t[b'a' as usize] = HexLetter; t[b'A' as usize] = HexLetter;
    t[b'c' as usize] = HexLetter; t[b'C' as usize] = HexLetter;
    t[b'b' as usize] = LetterB;   t[b'B' as usize] = LetterB;
    t[b'd' as usize] = LetterD;   t[b'D' as usize] = LetterD;
    t[b'e' as usize] = LetterE;   t[b'E' as usize] = LetterE;
    t[b'f' as usize] = LetterF;   t[b'F' as usize] = LetterF;
    t[b'l' as usize] = LetterL;   t[b'L' as usize] = LetterL;
    t[b'x' as usize] = LetterX;   t[b'X' as usize] = LetterX;
    t[b'p' as usize] = LetterP;   t[b'P' as usize] = LetterP;
    t[b'_' as usize] = Underscore;
    t[b'$' as usize] = Dollar;

    t[b'.' as usize] = Dot;
    t[b'"' as usize] = Quote;
    t[b'\'' as usize] = Apostrophe;
    t[b'\\' as usize] = Backslash;
    t[b'/' as usize] = Slash;
    t[b'*' as usize] = Star;
    t[b'+' as usize] = Plus;
    t[b'-' as usize] = Minus;
    t[b'=' as usize] = Eq;
    t[b'>' as usize] = Gt;
    t[b'<' as usize] = Lt;
    t[b'!' as usize] = Bang;
    t[b'&' as usize] = Amp;
    t[b'|' as usize] = Pipe;
    t[b'^' as usize] = Caret;
    t[b'%' as usize] = Percent;
    t[b'~' as usize] = Tilde;
    t[b'?' as usize] = Question;
    t[b':' as usize] = Colon;
    t[b'(' as usize] = LParen;
    t[b')' as usize] = RParen;
    t[b'{' as usize] = LBrace;
    t[b'}' as usize] = RBrace;
    t[b'[' as usize] = LBracket;
    t[b']' as usize] = RBracket;
    t[b';' as usize] = Semicolon;
    t[b',' as usize] = Comma;
    t[b'@' as usize] = At;
    t
};

/// Class of the next code point, `None` meaning end of input
#[inline]
pub fn classify(ch: Option<char>) -> CharClass {
    match ch {
        None => CharClass::Eof,
        Some(c) if c.is_ascii() => ASCII[c as usize],
        Some(c) if c.is_xid_start() => CharClass::OtherLetter,
        Some(c) if c.is_xid_continue() => CharClass::IdentPart,
        Some(_) => CharClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_classes_in_discriminant_order() {
        for (index, class) in ALL_CLASSES.iter().enumerate() {
            assert_eq!(*class as usize, index);
        }
    }

    #[test]
    fn test_ascii_classes() {
        assert_eq!(classify(Some('0')), CharClass::Zero);
        assert_eq!(classify(Some('7')), CharClass::OctDigit);
        assert_eq!(classify(Some('9')), CharClass::Digit89);
        assert_eq!(classify(Some('X')), CharClass::LetterX);
        assert_eq!(classify(Some('c')), CharClass::HexLetter);
        assert_eq!(classify(Some('q')), CharClass::OtherLetter);
        assert_eq!(classify(Some('\u{0C}')), CharClass::Space);
        assert_eq!(classify(Some('#')), CharClass::Other);
        assert_eq!(classify(None), CharClass::Eof);
    }

    #[test]
    fn test_unicode_identifier_classes() {
        assert_eq!(classify(Some('é')), CharClass::OtherLetter);
        assert_eq!(classify(Some('λ')), CharClass::OtherLetter);
        // combining acute accent continues but cannot start
        assert_eq!(classify(Some('\u{0301}')), CharClass::IdentPart);
        assert_eq!(classify(Some('€')), CharClass::Other);
    }
}
