//! Character classification tables for the scanner
//!
//! Maps a code point to a bitset of lexical properties. ASCII resolves through
//! a 128-entry table built at compile time; everything above delegates to the
//! precomputed Unicode ID_Start/ID_Continue data (the `unicode-xid` crate) plus
//! the small closed sets of supplemental line terminators and whitespace.

use bitflags::bitflags;

bitflags! {
    /// Lexical properties of a single code point
    ///
    /// Flags are combined with bitwise OR; callers test membership with
    /// [`CharFlags::contains`]. Lookup is O(1) for the full code point range.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharFlags: u16 {
        /// May begin an identifier
        const ID_START = 1 << 0;
        /// May continue an identifier
        const ID_CONTINUE = 1 << 1;
        /// Terminates a line (LF, CR, LS, PS)
        const LINE_TERMINATOR = 1 << 2;
        /// Insignificant whitespace other than line terminators
        const WHITESPACE = 1 << 3;
        /// Decimal digit `0`-`9`
        const DECIMAL = 1 << 4;
        /// Hexadecimal digit `0`-`9a-fA-F`
        const HEX = 1 << 5;
        /// Octal digit `0`-`7`
        const OCTAL = 1 << 6;
        /// Binary digit `0` or `1`
        const BINARY = 1 << 7;
        /// Exponent marker `e` or `E`
        const EXPONENT = 1 << 8;
        /// Underscore in its numeric-separator role
        const SEPARATOR = 1 << 9;
        /// String or template quote character
        const QUOTE = 1 << 10;
        /// Ends a JSX text chunk (`{`, `}`, `<`, `>`)
        const JSX_SPECIAL = 1 << 11;
        /// Hyphen, valid inside JSX identifiers
        const HYPHEN = 1 << 12;
    }
}

const fn ascii_flags(byte: u8) -> CharFlags {
    let mut bits: u16 = 0;

    if matches!(byte, b'a'..=b'z' | b'A'..=b'Z' | b'$' | b'_') {
        bits |= CharFlags::ID_START.bits() | CharFlags::ID_CONTINUE.bits();
    }
    if byte.is_ascii_digit() {
        bits |= CharFlags::ID_CONTINUE.bits() | CharFlags::DECIMAL.bits();
    }
    if byte.is_ascii_hexdigit() {
        bits |= CharFlags::HEX.bits();
    }
    if matches!(byte, b'0'..=b'7') {
        bits |= CharFlags::OCTAL.bits();
    }
    if matches!(byte, b'0' | b'1') {
        bits |= CharFlags::BINARY.bits();
    }
    if matches!(byte, b'e' | b'E') {
        bits |= CharFlags::EXPONENT.bits();
    }
    if byte == b'_' {
        bits |= CharFlags::SEPARATOR.bits();
    }
    if matches!(byte, b'"' | b'\'' | b'`') {
        bits |= CharFlags::QUOTE.bits();
    }
    if matches!(byte, b'{' | b'}' | b'<' | b'>') {
        bits |= CharFlags::JSX_SPECIAL.bits();
    }
    if byte == b'-' {
        bits |= CharFlags::HYPHEN.bits();
    }
    if matches!(byte, b'\n' | b'\r') {
        bits |= CharFlags::LINE_TERMINATOR.bits();
    }
    if matches!(byte, b' ' | b'\t' | 0x0B | 0x0C) {
        bits |= CharFlags::WHITESPACE.bits();
    }

    CharFlags::from_bits_retain(bits)
}

static ASCII_TABLE: [CharFlags; 128] = {
    let mut table = [CharFlags::empty(); 128];
    let mut i = 0;
    while i < 128 {
        table[i] = ascii_flags(i as u8);
        i += 1;
    }
    table
};

/// Classify a code point into its set of lexical properties
pub fn classify(c: char) -> CharFlags {
    if (c as u32) < 128 {
        return ASCII_TABLE[c as usize];
    }

    let mut flags = CharFlags::empty();
    if unicode_xid::UnicodeXID::is_xid_start(c) {
        flags |= CharFlags::ID_START | CharFlags::ID_CONTINUE;
    } else if is_supplemental_id_continue(c) {
        flags |= CharFlags::ID_CONTINUE;
    }
    if matches!(c, '\u{2028}' | '\u{2029}') {
        flags |= CharFlags::LINE_TERMINATOR;
    }
    if is_supplemental_whitespace(c) {
        flags |= CharFlags::WHITESPACE;
    }
    flags
}

fn is_supplemental_id_continue(c: char) -> bool {
    // ZWNJ and ZWJ are IdentifierPart but not XID_Continue
    c == '\u{200C}' || c == '\u{200D}' || unicode_xid::UnicodeXID::is_xid_continue(c)
}

fn is_supplemental_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Check if a character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_xid::UnicodeXID::is_xid_start(c)
}

/// Check if a character can continue an identifier
pub fn is_identifier_part(c: char) -> bool {
    c == '_' || c == '$' || is_supplemental_id_continue(c)
}

/// Check if a character is an ECMAScript line terminator
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Check if a character is ECMAScript whitespace (excluding line terminators)
pub fn is_whitespace(c: char) -> bool {
    classify(c).contains(CharFlags::WHITESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_identifier_flags() {
        assert!(classify('a').contains(CharFlags::ID_START));
        assert!(classify('Z').contains(CharFlags::ID_START));
        assert!(classify('$').contains(CharFlags::ID_START));
        assert!(classify('_').contains(CharFlags::ID_START));
        assert!(!classify('1').contains(CharFlags::ID_START));
        assert!(classify('1').contains(CharFlags::ID_CONTINUE));
        assert!(!classify('#').contains(CharFlags::ID_CONTINUE));
    }

    #[test]
    fn test_digit_classes() {
        assert!(classify('7').contains(CharFlags::DECIMAL | CharFlags::OCTAL));
        assert!(!classify('8').contains(CharFlags::OCTAL));
        assert!(classify('1').contains(CharFlags::BINARY));
        assert!(!classify('2').contains(CharFlags::BINARY));
        assert!(classify('f').contains(CharFlags::HEX));
        assert!(classify('F').contains(CharFlags::HEX));
        assert!(!classify('g').contains(CharFlags::HEX));
        assert!(classify('e').contains(CharFlags::EXPONENT));
        assert!(classify('E').contains(CharFlags::EXPONENT));
    }

    #[test]
    fn test_separator_and_quotes() {
        assert!(classify('_').contains(CharFlags::SEPARATOR));
        assert!(classify('"').contains(CharFlags::QUOTE));
        assert!(classify('\'').contains(CharFlags::QUOTE));
        assert!(classify('`').contains(CharFlags::QUOTE));
    }

    #[test]
    fn test_jsx_flags() {
        assert!(classify('<').contains(CharFlags::JSX_SPECIAL));
        assert!(classify('}').contains(CharFlags::JSX_SPECIAL));
        assert!(classify('-').contains(CharFlags::HYPHEN));
    }

    #[test]
    fn test_line_terminators() {
        assert!(is_line_terminator('\n'));
        assert!(is_line_terminator('\r'));
        assert!(is_line_terminator('\u{2028}'));
        assert!(is_line_terminator('\u{2029}'));
        assert!(!is_line_terminator(' '));
        assert!(classify('\u{2028}').contains(CharFlags::LINE_TERMINATOR));
    }

    #[test]
    fn test_whitespace() {
        assert!(is_whitespace(' '));
        assert!(is_whitespace('\t'));
        assert!(is_whitespace('\u{00A0}'));
        assert!(is_whitespace('\u{FEFF}'));
        assert!(is_whitespace('\u{3000}'));
        assert!(!is_whitespace('\n'));
        assert!(!is_whitespace('a'));
    }

    #[test]
    fn test_unicode_identifiers() {
        assert!(is_identifier_start('é'));
        assert!(is_identifier_start('中'));
        assert!(is_identifier_start('λ'));
        assert!(!is_identifier_start('\u{200C}'));
        assert!(is_identifier_part('\u{200C}'));
        assert!(is_identifier_part('\u{200D}'));
        assert!(is_identifier_part('्'));
        assert!(!is_identifier_part(' '));
    }

    #[test]
    fn test_classify_above_ascii() {
        assert!(classify('中').contains(CharFlags::ID_START));
        assert!(classify('्').contains(CharFlags::ID_CONTINUE));
        assert!(!classify('—').contains(CharFlags::ID_CONTINUE));
    }
}
