//! ECMAScript scanner
//!
//! This module implements the lexical grammar: identifiers with Unicode
//! escapes, every numeric literal form, strings and templates with full
//! escape cooking, regular expressions, comments and the `#!` line. The
//! scanner is a pull scanner: the parser requests one token at a time and
//! tells the scanner whether a `/` at the current position starts a regular
//! expression or a division operator, since only the parser knows which
//! grammar production it sits in.

mod token;

pub use token::{Comment, CommentKind, Keyword, Token, TokenKind, TokenRecord, TokenValue};

use num_traits::Num;

use crate::ast::Loc;
use crate::context::Context;
use crate::error::{messages, Error, Result, SourceLocation};
use crate::options::Options;
use crate::unicode::{self, CharFlags};

/// A resumable scanner position, used for bounded lookahead
#[derive(Debug, Clone, Copy)]
pub struct LexerState {
    pos: usize,
    line: u32,
    column: u32,
    line_start: usize,
    newline_before: bool,
    seen_token: bool,
}

/// A scanner over ECMAScript source text
pub struct Lexer<'src> {
    /// Source code being scanned
    source: &'src str,
    /// Source as bytes for faster access
    bytes: &'src [u8],
    /// Current position in bytes
    pos: usize,
    /// Current line number (1-indexed)
    line: u32,
    /// Current column number (0-indexed)
    column: u32,
    /// Start of current line in bytes
    line_start: usize,
    /// Parse options; the scanner consults `web_compat` and `loc`
    options: Options,
    /// Line terminator seen since the previous token's end
    newline_before: bool,
    /// At least one token has been produced
    seen_token: bool,
    /// Collect skipped comments for the parser to drain
    collect_comments: bool,
    /// Comments skipped since the last drain
    comments: Vec<Comment>,
    /// First invalid escape of the current template chunk; templates scan to
    /// completion so that tagged templates can keep an undefined cooked value
    template_error: Option<Error>,
    /// Current string literal cooked a legacy octal or `\8`/`\9` escape
    scanned_octal: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new scanner for the given source code
    pub fn new(source: &'src str, options: Options) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 0,
            line_start: 0,
            options,
            newline_before: false,
            seen_token: false,
            collect_comments: false,
            comments: Vec::new(),
            template_error: None,
            scanned_octal: false,
        }
    }

    /// Turn comment collection on or off
    pub fn set_collect_comments(&mut self, collect: bool) {
        self.collect_comments = collect;
    }

    /// Drain the comments skipped since the last call
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// Take the invalid-escape error recorded by the last template chunk
    pub fn take_template_error(&mut self) -> Option<Error> {
        self.template_error.take()
    }

    /// Capture the scanner position for later restoration
    pub fn state(&self) -> LexerState {
        LexerState {
            pos: self.pos,
            line: self.line,
            column: self.column,
            line_start: self.line_start,
            newline_before: self.newline_before,
            seen_token: self.seen_token,
        }
    }

    /// Rewind to a previously captured position
    pub fn restore(&mut self, state: LexerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.column = state.column;
        self.line_start = state.line_start;
        self.newline_before = state.newline_before;
        self.seen_token = state.seen_token;
    }

    /// Get current source location
    fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    /// The scanner's resting position. Immediately after a token is scanned
    /// this is that token's end, which the parser records for node spans.
    pub fn position(&self) -> SourceLocation {
        self.location()
    }

    /// Create a lexer error with source context
    fn error(&self, message: impl Into<String>, location: SourceLocation) -> Error {
        Error::lexer_error_with_context(message, location, self.source)
    }

    /// Check if we've reached the end of input
    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        if self.is_eof() {
            None
        } else {
            self.source[self.pos..].chars().next()
        }
    }

    /// Peek at next character (one ahead)
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advance and return current character, tracking line/column
    ///
    /// `\r\n` counts as a single line terminator: the `\r` defers the line
    /// bump to the `\n` that follows it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        match c {
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
                self.line_start = self.pos;
            }
            '\r' => {
                if self.peek() == Some('\n') {
                    self.column += 1;
                } else {
                    self.line += 1;
                    self.column = 0;
                    self.line_start = self.pos;
                }
            }
            _ => self.column += 1,
        }
        Some(c)
    }

    /// Build a token from `start` to the current position
    fn token_at(&self, kind: TokenKind, start: usize, location: SourceLocation) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start..self.pos],
            location,
            newline_before: self.newline_before,
            escaped: false,
            octal: false,
            value: TokenValue::None,
        }
    }

    /// Record a skipped comment
    fn record_comment(
        &mut self,
        kind: CommentKind,
        start: usize,
        start_loc: SourceLocation,
        value_start: usize,
    ) {
        if !self.collect_comments {
            return;
        }
        let value_end = match kind {
            // Strip the trailing `*/`
            CommentKind::MultiLine => self.pos - 2,
            _ => self.pos,
        };
        let loc = self.options.loc.then(|| Loc {
            start: start_loc.into(),
            end: self.location().into(),
        });
        self.comments.push(Comment {
            kind,
            value: self.source[value_start..value_end].to_string(),
            start,
            end: self.pos,
            loc,
        });
    }

    /// Consume a `#!` line at offset 0 as a hashbang comment
    fn skip_hashbang(&mut self) {
        if self.pos != 0 || !self.source.starts_with("#!") {
            return;
        }
        let start_loc = self.location();
        self.advance();
        self.advance();
        let value_start = self.pos;
        while let Some(c) = self.peek() {
            if unicode::is_line_terminator(c) {
                break;
            }
            self.advance();
        }
        self.record_comment(CommentKind::Hashbang, 0, start_loc, value_start);
    }

    /// Skip whitespace and comments, tracking line terminators for ASI
    fn skip_whitespace_and_comments(&mut self, ctx: Context) -> Result<()> {
        let html_comments = self.options.web_compat && !ctx.has_module();
        loop {
            while let Some(c) = self.peek() {
                if unicode::is_line_terminator(c) {
                    self.newline_before = true;
                    self.advance();
                } else if unicode::is_whitespace(c) {
                    self.advance();
                } else {
                    break;
                }
            }

            if self.peek() == Some('/') {
                if self.peek_next() == Some('/') {
                    self.skip_line_comment(CommentKind::SingleLine, 2);
                    continue;
                }
                if self.peek_next() == Some('*') {
                    self.skip_block_comment()?;
                    continue;
                }
            }

            // Annex B HTML-like comments, script goal only
            if html_comments && self.source[self.pos..].starts_with("<!--") {
                self.skip_line_comment(CommentKind::HtmlOpen, 4);
                continue;
            }
            if html_comments
                && (self.newline_before || !self.seen_token)
                && self.source[self.pos..].starts_with("-->")
            {
                self.skip_line_comment(CommentKind::HtmlClose, 3);
                continue;
            }

            return Ok(());
        }
    }

    /// Consume a line comment whose opener is `opener_len` bytes long
    fn skip_line_comment(&mut self, kind: CommentKind, opener_len: usize) {
        let start = self.pos;
        let start_loc = self.location();
        for _ in 0..opener_len {
            self.advance();
        }
        let value_start = self.pos;
        while let Some(c) = self.peek() {
            if unicode::is_line_terminator(c) {
                break;
            }
            self.advance();
        }
        self.record_comment(kind, start, start_loc, value_start);
    }

    /// Consume a `/* ... */` comment
    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        let start_loc = self.location();
        self.advance(); // /
        self.advance(); // *
        let value_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error(messages::UNTERMINATED_COMMENT, start_loc)),
                Some('*') if self.peek_next() == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                Some(c) => {
                    if unicode::is_line_terminator(c) {
                        self.newline_before = true;
                    }
                    self.advance();
                }
            }
        }
        self.record_comment(CommentKind::MultiLine, start, start_loc, value_start);
        Ok(())
    }

    /// Get the next token
    ///
    /// `allow_regex` decides how a `/` at the current position is read: as
    /// the start of a regular expression literal, or as a division operator.
    pub fn next_token(&mut self, ctx: Context, allow_regex: bool) -> Result<Token<'src>> {
        self.newline_before = false;
        if self.pos == 0 {
            self.skip_hashbang();
        }
        self.skip_whitespace_and_comments(ctx)?;

        if self.is_eof() {
            return Ok(self.token_at(TokenKind::Eof, self.pos, self.location()));
        }

        let start = self.pos;
        let start_loc = self.location();
        let Some(c) = self.peek() else {
            return Ok(self.token_at(TokenKind::Eof, start, start_loc));
        };
        let flags = unicode::classify(c);

        let token = if flags.contains(CharFlags::ID_START) || c == '\\' {
            self.scan_identifier()?
        } else if flags.contains(CharFlags::DECIMAL)
            || (c == '.' && self.peek_next().is_some_and(|n| n.is_ascii_digit()))
        {
            self.scan_number(ctx)?
        } else if flags.contains(CharFlags::QUOTE) {
            if c == '`' {
                self.scan_template()?
            } else {
                self.scan_string(ctx, c)?
            }
        } else if c == '#' {
            self.scan_private_name()?
        } else if c == '/' && allow_regex {
            self.scan_regex()?
        } else {
            self.scan_punctuator(c, start, start_loc)?
        };

        self.seen_token = true;
        Ok(token)
    }

    /// Scan a single- or multi-character punctuator
    fn scan_punctuator(
        &mut self,
        c: char,
        start: usize,
        start_loc: SourceLocation,
    ) -> Result<Token<'src>> {
        self.advance();

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,
            '?' => {
                if self.peek() == Some('.') && self.peek_next().is_none_or(|n| !n.is_ascii_digit())
                {
                    self.advance();
                    TokenKind::QuestionDot
                } else if self.peek() == Some('?') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::QuestionQuestionEquals
                    } else {
                        TokenKind::QuestionQuestion
                    }
                } else {
                    TokenKind::Question
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::DotDotDot
                } else {
                    TokenKind::Dot
                }
            }
            '+' => {
                if self.peek() == Some('+') {
                    self.advance();
                    TokenKind::PlusPlus
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::PlusEquals
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.peek() == Some('-') {
                    self.advance();
                    TokenKind::MinusMinus
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::MinusEquals
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::StarStarEquals
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::StarEquals
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::SlashEquals
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::PercentEquals
                } else {
                    TokenKind::Percent
                }
            }
            '<' => {
                if self.peek() == Some('<') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::LessLessEquals
                    } else {
                        TokenKind::LessLess
                    }
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::LessEquals
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.peek() == Some('>') {
                    self.advance();
                    if self.peek() == Some('>') {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                            TokenKind::GreaterGreaterGreaterEquals
                        } else {
                            TokenKind::GreaterGreaterGreater
                        }
                    } else if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::GreaterGreaterEquals
                    } else {
                        TokenKind::GreaterGreater
                    }
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::GreaterEquals
                } else {
                    TokenKind::Greater
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::EqualsEqualsEquals
                    } else {
                        TokenKind::EqualsEquals
                    }
                } else if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Equals
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::BangEqualsEquals
                    } else {
                        TokenKind::BangEquals
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::AmpersandAmpersandEquals
                    } else {
                        TokenKind::AmpersandAmpersand
                    }
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::AmpersandEquals
                } else {
                    TokenKind::Ampersand
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::PipePipeEquals
                    } else {
                        TokenKind::PipePipe
                    }
                } else if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::PipeEquals
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::CaretEquals
                } else {
                    TokenKind::Caret
                }
            }
            _ => {
                return Err(self.error(messages::invalid_character(c), start_loc));
            }
        };

        Ok(self.token_at(kind, start, start_loc))
    }

    /// Scan an identifier or keyword, decoding `\u` escapes
    fn scan_identifier(&mut self) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();

        let decoded = self.scan_identifier_tail(start, true)?;
        let text = &self.source[start..self.pos];
        let name = decoded.as_deref().unwrap_or(text);
        let kind = match Keyword::from_text(name) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        };

        Ok(Token {
            kind,
            text,
            location: start_loc,
            newline_before: self.newline_before,
            escaped: decoded.is_some(),
            octal: false,
            value: match decoded {
                Some(name) => TokenValue::String(name),
                None => TokenValue::None,
            },
        })
    }

    /// Scan identifier characters from the current position
    ///
    /// Returns the decoded name when at least one `\u` escape was consumed;
    /// unescaped identifiers borrow their text from the source instead.
    fn scan_identifier_tail(&mut self, start: usize, mut first: bool) -> Result<Option<String>> {
        let mut decoded: Option<String> = None;

        loop {
            match self.peek() {
                Some('\\') => {
                    let escape_loc = self.location();
                    let mut buf = decoded
                        .take()
                        .unwrap_or_else(|| self.source[start..self.pos].to_string());
                    self.advance();
                    if self.peek() != Some('u') {
                        return Err(self.error(messages::INVALID_ESCAPE, escape_loc));
                    }
                    self.advance();
                    let code = self.scan_code_point()?;
                    let c = char::from_u32(code)
                        .ok_or_else(|| self.error(messages::INVALID_UNICODE_ESCAPE, escape_loc))?;
                    let valid = if first {
                        unicode::is_identifier_start(c)
                    } else {
                        unicode::is_identifier_part(c)
                    };
                    if !valid {
                        return Err(self.error(messages::INVALID_UNICODE_ESCAPE, escape_loc));
                    }
                    buf.push(c);
                    decoded = Some(buf);
                    first = false;
                }
                Some(c) => {
                    let valid = if first {
                        unicode::is_identifier_start(c)
                    } else {
                        unicode::is_identifier_part(c)
                    };
                    if !valid {
                        break;
                    }
                    if let Some(buf) = decoded.as_mut() {
                        buf.push(c);
                    }
                    self.advance();
                    first = false;
                }
                None => break,
            }
        }

        Ok(decoded)
    }

    /// Scan a `#name` private name
    fn scan_private_name(&mut self) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();
        self.advance(); // #

        match self.peek() {
            Some(c) if unicode::is_identifier_start(c) => {}
            Some('\\') => {}
            _ => return Err(self.error(messages::invalid_character('#'), start_loc)),
        }

        let name_start = self.pos;
        let decoded = self.scan_identifier_tail(name_start, true)?;

        Ok(Token {
            kind: TokenKind::PrivateName,
            text: &self.source[start..self.pos],
            location: start_loc,
            newline_before: self.newline_before,
            escaped: decoded.is_some(),
            octal: false,
            value: match decoded {
                Some(name) => TokenValue::String(name),
                None => TokenValue::None,
            },
        })
    }

    /// Scan the digits of one radix class, validating `_` separators
    ///
    /// A separator must sit between two digits of the class. Returns whether
    /// any digit was consumed.
    fn scan_digits(&mut self, mask: CharFlags) -> Result<bool> {
        let mut any = false;
        let mut last_was_separator = false;

        loop {
            match self.peek() {
                Some(c) if unicode::classify(c).contains(mask) => {
                    any = true;
                    last_was_separator = false;
                    self.advance();
                }
                Some(c) if unicode::classify(c).contains(CharFlags::SEPARATOR) => {
                    if !any || last_was_separator {
                        return Err(
                            self.error(messages::INVALID_NUMERIC_SEPARATOR, self.location())
                        );
                    }
                    last_was_separator = true;
                    self.advance();
                }
                _ => break,
            }
        }

        if last_was_separator {
            return Err(self.error(messages::INVALID_NUMERIC_SEPARATOR, self.location()));
        }
        Ok(any)
    }

    /// Reject identifier characters glued onto the end of a number
    fn check_number_end(&self) -> Result<()> {
        if let Some(c) = self.peek() {
            if unicode::is_identifier_start(c) || c.is_ascii_digit() || c == '\\' {
                return Err(self.error(messages::IDENTIFIER_AFTER_NUMBER, self.location()));
            }
        }
        Ok(())
    }

    /// Scan a numeric literal
    fn scan_number(&mut self, ctx: Context) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();

        if self.peek() == Some('0') {
            match self.peek_next() {
                Some('x') | Some('X') => {
                    return self.scan_radix_number(start, start_loc, 16, CharFlags::HEX)
                }
                Some('b') | Some('B') => {
                    return self.scan_radix_number(start, start_loc, 2, CharFlags::BINARY)
                }
                Some('o') | Some('O') => {
                    return self.scan_radix_number(start, start_loc, 8, CharFlags::OCTAL)
                }
                Some(c) if c.is_ascii_digit() => {
                    return self.scan_legacy_octal(ctx, start, start_loc)
                }
                _ => {}
            }
        }

        let mut is_integer = true;

        if self.peek() == Some('.') {
            // `.5` form; the dispatcher guaranteed a digit follows
            is_integer = false;
            self.advance();
            self.scan_digits(CharFlags::DECIMAL)?;
        } else {
            self.scan_digits(CharFlags::DECIMAL)?;
            if self.peek() == Some('.') {
                is_integer = false;
                self.advance();
                self.scan_digits(CharFlags::DECIMAL)?;
            }
        }

        if self
            .peek()
            .is_some_and(|c| unicode::classify(c).contains(CharFlags::EXPONENT))
        {
            is_integer = false;
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !self.scan_digits(CharFlags::DECIMAL)? {
                return Err(self.error(messages::MISSING_EXPONENT, self.location()));
            }
        }

        if self.peek() == Some('n') {
            if !is_integer {
                return Err(self.error(messages::INVALID_BIGINT, start_loc));
            }
            let digits = &self.source[start..self.pos];
            self.advance(); // n
            self.check_number_end()?;
            let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
            let value = num_bigint::BigInt::from_str_radix(&cleaned, 10)
                .map_err(|_| self.error(messages::INVALID_BIGINT, start_loc))?;
            let mut token = self.token_at(TokenKind::BigIntLiteral, start, start_loc);
            token.value = TokenValue::BigInt(value);
            return Ok(token);
        }

        self.check_number_end()?;

        let text = &self.source[start..self.pos];
        let value = if text.contains('_') {
            let cleaned: String = text.chars().filter(|c| *c != '_').collect();
            lexical_core::parse::<f64>(cleaned.as_bytes())
        } else {
            lexical_core::parse::<f64>(text.as_bytes())
        }
        .map_err(|_| self.error(messages::INVALID_NUMBER, start_loc))?;

        let mut token = self.token_at(TokenKind::NumberLiteral, start, start_loc);
        token.value = TokenValue::Number(value);
        Ok(token)
    }

    /// Scan a `0x`/`0o`/`0b` literal after the leading zero
    fn scan_radix_number(
        &mut self,
        start: usize,
        start_loc: SourceLocation,
        radix: u32,
        mask: CharFlags,
    ) -> Result<Token<'src>> {
        self.advance(); // 0
        self.advance(); // x, o, or b
        let digits_start = self.pos;
        if !self.scan_digits(mask)? {
            return Err(self.error(messages::MISSING_DIGITS, start_loc));
        }
        let digits = &self.source[digits_start..self.pos];

        if self.peek() == Some('n') {
            self.advance();
            self.check_number_end()?;
            let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
            let value = num_bigint::BigInt::from_str_radix(&cleaned, radix)
                .map_err(|_| self.error(messages::INVALID_BIGINT, start_loc))?;
            let mut token = self.token_at(TokenKind::BigIntLiteral, start, start_loc);
            token.value = TokenValue::BigInt(value);
            return Ok(token);
        }

        self.check_number_end()?;
        let value = digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0f64, |acc, digit| acc * f64::from(radix) + f64::from(digit));
        let mut token = self.token_at(TokenKind::NumberLiteral, start, start_loc);
        token.value = TokenValue::Number(value);
        Ok(token)
    }

    /// Scan a legacy `0NN` octal or `08`-style decimal, sloppy mode only
    fn scan_legacy_octal(
        &mut self,
        ctx: Context,
        start: usize,
        start_loc: SourceLocation,
    ) -> Result<Token<'src>> {
        self.advance(); // 0
        let mut is_octal = true;
        while let Some(c) = self.peek() {
            match c {
                '0'..='7' => {
                    self.advance();
                }
                '8' | '9' => {
                    is_octal = false;
                    self.advance();
                }
                '_' => {
                    return Err(self.error(messages::INVALID_NUMERIC_SEPARATOR, self.location()))
                }
                _ => break,
            }
        }

        if ctx.has_strict() {
            return Err(self.error(messages::STRICT_OCTAL_LITERAL, start_loc));
        }
        if self.peek() == Some('n') {
            return Err(self.error(messages::INVALID_BIGINT, start_loc));
        }

        // `08.5` and `09e2` reparse as plain decimals
        if !is_octal && matches!(self.peek(), Some('.') | Some('e') | Some('E')) {
            if self.peek() == Some('.') {
                self.advance();
                self.scan_digits(CharFlags::DECIMAL)?;
            }
            if self
                .peek()
                .is_some_and(|c| unicode::classify(c).contains(CharFlags::EXPONENT))
            {
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                if !self.scan_digits(CharFlags::DECIMAL)? {
                    return Err(self.error(messages::MISSING_EXPONENT, self.location()));
                }
            }
        }

        self.check_number_end()?;

        let text = &self.source[start..self.pos];
        let value = if is_octal {
            text.chars()
                .filter_map(|c| c.to_digit(8))
                .fold(0f64, |acc, digit| acc * 8.0 + f64::from(digit))
        } else {
            lexical_core::parse::<f64>(text.as_bytes())
                .map_err(|_| self.error(messages::INVALID_NUMBER, start_loc))?
        };

        let mut token = self.token_at(TokenKind::NumberLiteral, start, start_loc);
        token.value = TokenValue::Number(value);
        Ok(token)
    }

    /// Scan a string literal, cooking escape sequences
    fn scan_string(&mut self, ctx: Context, quote: char) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();
        self.advance(); // opening quote
        self.scanned_octal = false;
        let mut cooked = String::new();

        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error(messages::UNTERMINATED_STRING, start_loc));
                }
                Some('\\') => {
                    self.advance();
                    if let Some(c) = self.scan_escape(ctx, false)? {
                        cooked.push(c);
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    cooked.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token {
            kind: TokenKind::StringLiteral,
            text: &self.source[start..self.pos],
            location: start_loc,
            newline_before: self.newline_before,
            escaped: false,
            octal: self.scanned_octal,
            value: TokenValue::String(cooked),
        })
    }

    /// Decode one escape sequence after the backslash
    ///
    /// Returns `None` for line continuations and for template escapes that
    /// only invalidate the cooked value. Inside templates, invalid escapes
    /// are recorded in `template_error` instead of failing immediately, so
    /// that tagged templates can accept them with an undefined cooked value.
    fn scan_escape(&mut self, ctx: Context, in_template: bool) -> Result<Option<char>> {
        let escape_loc = self.location();
        let Some(c) = self.advance() else {
            return Err(self.error(messages::UNEXPECTED_END, escape_loc));
        };

        match c {
            'n' => Ok(Some('\n')),
            't' => Ok(Some('\t')),
            'r' => Ok(Some('\r')),
            'b' => Ok(Some('\u{8}')),
            'f' => Ok(Some('\u{C}')),
            'v' => Ok(Some('\u{B}')),
            'x' => {
                let mut value: u32 = 0;
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            self.advance();
                        }
                        None => {
                            return self.invalid_escape(
                                messages::INVALID_HEX_ESCAPE,
                                escape_loc,
                                in_template,
                            );
                        }
                    }
                }
                Ok(char::from_u32(value).or(Some('\u{FFFD}')))
            }
            'u' => {
                let code = match self.scan_code_point() {
                    Ok(code) => code,
                    Err(err) => {
                        if in_template {
                            self.template_error.get_or_insert(err);
                            return Ok(None);
                        }
                        return Err(err);
                    }
                };
                Ok(Some(self.combine_surrogates(code)))
            }
            '0'..='7' => {
                // `\0` not followed by a digit is just NUL
                if c == '0' && !self.peek().is_some_and(|n| n.is_ascii_digit()) {
                    return Ok(Some('\0'));
                }
                if in_template {
                    return self.invalid_escape(messages::TEMPLATE_OCTAL_ESCAPE, escape_loc, true);
                }
                if ctx.has_strict() {
                    return Err(self.error(messages::STRICT_OCTAL_ESCAPE, escape_loc));
                }
                self.scanned_octal = true;
                let mut value = c as u32 - '0' as u32;
                if let Some(d) = self.peek().filter(|n| ('0'..='7').contains(n)) {
                    value = value * 8 + (d as u32 - '0' as u32);
                    self.advance();
                    if c <= '3' {
                        if let Some(d) = self.peek().filter(|n| ('0'..='7').contains(n)) {
                            value = value * 8 + (d as u32 - '0' as u32);
                            self.advance();
                        }
                    }
                }
                Ok(char::from_u32(value).or(Some('\u{FFFD}')))
            }
            '8' | '9' => {
                if in_template {
                    return self.invalid_escape(messages::TEMPLATE_OCTAL_ESCAPE, escape_loc, true);
                }
                if ctx.has_strict() {
                    return Err(self.error(messages::STRICT_OCTAL_ESCAPE, escape_loc));
                }
                self.scanned_octal = true;
                Ok(Some(c))
            }
            '\n' | '\u{2028}' | '\u{2029}' => Ok(None),
            '\r' => {
                if self.peek() == Some('\n') {
                    self.advance();
                }
                Ok(None)
            }
            _ => Ok(Some(c)),
        }
    }

    /// Fail, or record a template cooked-value error and continue
    fn invalid_escape(
        &mut self,
        message: &str,
        location: SourceLocation,
        in_template: bool,
    ) -> Result<Option<char>> {
        let err = self.error(message, location);
        if in_template {
            self.template_error.get_or_insert(err);
            Ok(None)
        } else {
            Err(err)
        }
    }

    /// Pair a high surrogate from a `\u` escape with a following `\u` low
    /// surrogate, producing the supplementary character; lone surrogates
    /// cook as U+FFFD because they have no UTF-8 form
    fn combine_surrogates(&mut self, first: u32) -> char {
        if !(0xD800..=0xDBFF).contains(&first) {
            return char::from_u32(first).unwrap_or('\u{FFFD}');
        }
        if self.peek() == Some('\\') && self.peek_next() == Some('u') {
            let saved = self.state();
            self.advance();
            self.advance();
            if let Ok(second) = self.scan_code_point() {
                if (0xDC00..=0xDFFF).contains(&second) {
                    let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
                    return char::from_u32(combined).unwrap_or('\u{FFFD}');
                }
            }
            self.restore(saved);
        }
        '\u{FFFD}'
    }

    /// Scan the value of a `\u` escape: `uXXXX` or `u{X...}`
    fn scan_code_point(&mut self) -> Result<u32> {
        let loc = self.location();
        if self.peek() == Some('{') {
            self.advance();
            let mut value: u32 = 0;
            let mut any = false;
            while let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) {
                value = value.saturating_mul(16).saturating_add(digit);
                if value > 0x0010_FFFF {
                    return Err(self.error(messages::INVALID_UNICODE_ESCAPE, loc));
                }
                any = true;
                self.advance();
            }
            if !any || self.peek() != Some('}') {
                return Err(self.error(messages::INVALID_UNICODE_ESCAPE, loc));
            }
            self.advance();
            Ok(value)
        } else {
            let mut value: u32 = 0;
            for _ in 0..4 {
                match self.peek().and_then(|c| c.to_digit(16)) {
                    Some(digit) => {
                        value = value * 16 + digit;
                        self.advance();
                    }
                    None => return Err(self.error(messages::INVALID_UNICODE_ESCAPE, loc)),
                }
            }
            Ok(value)
        }
    }

    /// Scan a template literal from its opening backtick
    fn scan_template(&mut self) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();
        self.advance(); // `
        self.scan_template_chunk(start, start_loc, true)
    }

    /// Resume template scanning after the `}` that closed a substitution
    ///
    /// The parser calls this instead of `next_token` when the `}` it is
    /// looking at belongs to an open template.
    pub fn rescan_template_continuation(&mut self) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();
        self.scan_template_chunk(start, start_loc, false)
    }

    /// Scan template characters up to a backtick or `${`
    fn scan_template_chunk(
        &mut self,
        start: usize,
        start_loc: SourceLocation,
        head: bool,
    ) -> Result<Token<'src>> {
        self.template_error = None;
        let mut cooked = String::new();
        let kind;

        loop {
            match self.peek() {
                None => return Err(self.error(messages::UNTERMINATED_TEMPLATE, start_loc)),
                Some('`') => {
                    self.advance();
                    kind = if head {
                        TokenKind::TemplateLiteral
                    } else {
                        TokenKind::TemplateTail
                    };
                    break;
                }
                Some('$') if self.peek_next() == Some('{') => {
                    self.advance();
                    self.advance();
                    kind = if head {
                        TokenKind::TemplateHead
                    } else {
                        TokenKind::TemplateMiddle
                    };
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if let Some(c) = self.scan_escape(Context::empty(), true)? {
                        cooked.push(c);
                    }
                }
                Some('\r') => {
                    // CR and CRLF both cook (and raw-normalize) to LF
                    self.advance();
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    cooked.push('\n');
                }
                Some(c) => {
                    cooked.push(c);
                    self.advance();
                }
            }
        }

        let value = if self.template_error.is_some() {
            TokenValue::Template(None)
        } else {
            TokenValue::Template(Some(cooked))
        };

        Ok(Token {
            kind,
            text: &self.source[start..self.pos],
            location: start_loc,
            newline_before: self.newline_before,
            escaped: false,
            octal: false,
            value,
        })
    }

    /// Scan a regular expression literal from its opening `/`
    fn scan_regex(&mut self) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();
        self.advance(); // /
        let body_start = self.pos;
        let mut in_class = false;

        loop {
            match self.peek() {
                None => return Err(self.error(messages::UNTERMINATED_REGEX, start_loc)),
                Some(c) if unicode::is_line_terminator(c) => {
                    return Err(self.error(messages::NEWLINE_IN_REGEX, start_loc));
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        None => return Err(self.error(messages::UNTERMINATED_REGEX, start_loc)),
                        Some(c) if unicode::is_line_terminator(c) => {
                            return Err(self.error(messages::NEWLINE_IN_REGEX, start_loc));
                        }
                        _ => {
                            self.advance();
                        }
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => break,
                _ => {
                    self.advance();
                }
            }
        }

        let body_end = self.pos;
        self.advance(); // closing /

        let flags_start = self.pos;
        let mut seen: u32 = 0;
        while let Some(c) = self.peek() {
            if !unicode::is_identifier_part(c) {
                break;
            }
            let flag_loc = self.location();
            match c {
                'd' | 'g' | 'i' | 'm' | 's' | 'u' | 'v' | 'y' => {
                    let bit = 1u32 << (c as u32 - 'a' as u32);
                    if seen & bit != 0 {
                        return Err(self.error(messages::duplicate_regex_flag(c), flag_loc));
                    }
                    seen |= bit;
                }
                _ => return Err(self.error(messages::invalid_regex_flag(c), flag_loc)),
            }
            self.advance();
        }

        let u_bit = 1u32 << ('u' as u32 - 'a' as u32);
        let v_bit = 1u32 << ('v' as u32 - 'a' as u32);
        if seen & u_bit != 0 && seen & v_bit != 0 {
            return Err(self.error(messages::REGEX_FLAG_U_AND_V, start_loc));
        }

        Ok(Token {
            kind: TokenKind::RegexLiteral,
            text: &self.source[start..self.pos],
            location: start_loc,
            newline_before: self.newline_before,
            escaped: false,
            octal: false,
            value: TokenValue::Regex {
                pattern: self.source[body_start..body_end].to_string(),
                flags: self.source[flags_start..self.pos].to_string(),
            },
        })
    }

    /// Scan the next token in JSX child position: text, `<`, `{`, or a stray
    /// `>` or `}` that JSX text must escape
    pub fn next_jsx_child(&mut self) -> Result<Token<'src>> {
        self.newline_before = false;
        if self.is_eof() {
            return Ok(self.token_at(TokenKind::Eof, self.pos, self.location()));
        }

        let start = self.pos;
        let start_loc = self.location();
        let Some(first) = self.peek() else {
            return Ok(self.token_at(TokenKind::Eof, start, start_loc));
        };

        if unicode::classify(first).contains(CharFlags::JSX_SPECIAL) {
            self.advance();
            let kind = match first {
                '<' => TokenKind::Less,
                '{' => TokenKind::LeftBrace,
                '>' => TokenKind::Greater,
                _ => TokenKind::RightBrace,
            };
            return Ok(self.token_at(kind, start, start_loc));
        }

        while let Some(c) = self.peek() {
            if unicode::classify(c).contains(CharFlags::JSX_SPECIAL) {
                break;
            }
            self.advance();
        }

        let text = &self.source[start..self.pos];
        Ok(Token {
            kind: TokenKind::JsxText,
            text,
            location: start_loc,
            newline_before: false,
            escaped: false,
            octal: false,
            value: TokenValue::String(text.to_string()),
        })
    }

    /// Scan the next token inside a JSX tag
    ///
    /// Tag identifiers admit hyphens, and attribute strings keep their raw
    /// contents without escape processing.
    pub fn next_jsx_tag_token(&mut self) -> Result<Token<'src>> {
        self.newline_before = false;
        self.skip_whitespace_and_comments(Context::empty())?;

        if self.is_eof() {
            return Ok(self.token_at(TokenKind::Eof, self.pos, self.location()));
        }

        let start = self.pos;
        let start_loc = self.location();
        let Some(c) = self.peek() else {
            return Ok(self.token_at(TokenKind::Eof, start, start_loc));
        };
        let flags = unicode::classify(c);

        if flags.contains(CharFlags::QUOTE) && c != '`' {
            return self.scan_jsx_string(c);
        }

        if flags.contains(CharFlags::ID_START) {
            while let Some(c) = self.peek() {
                let flags = unicode::classify(c);
                if !flags.intersects(CharFlags::ID_CONTINUE | CharFlags::HYPHEN) {
                    break;
                }
                self.advance();
            }
            return Ok(self.token_at(TokenKind::Identifier, start, start_loc));
        }

        self.advance();
        let kind = match c {
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '=' => TokenKind::Equals,
            '/' => TokenKind::Slash,
            '>' => TokenKind::Greater,
            '<' => TokenKind::Less,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            _ => return Err(self.error(messages::invalid_character(c), start_loc)),
        };
        Ok(self.token_at(kind, start, start_loc))
    }

    /// Scan a JSX attribute string; newlines are allowed and no escapes apply
    fn scan_jsx_string(&mut self, quote: char) -> Result<Token<'src>> {
        let start = self.pos;
        let start_loc = self.location();
        self.advance(); // opening quote
        let value_start = self.pos;

        loop {
            match self.peek() {
                None => return Err(self.error(messages::UNTERMINATED_STRING, start_loc)),
                Some(c) if c == quote => break,
                _ => {
                    self.advance();
                }
            }
        }

        let value = self.source[value_start..self.pos].to_string();
        self.advance(); // closing quote

        Ok(Token {
            kind: TokenKind::StringLiteral,
            text: &self.source[start..self.pos],
            location: start_loc,
            newline_before: false,
            escaped: false,
            octal: false,
            value: TokenValue::String(value),
        })
    }
}
