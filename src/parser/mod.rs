//! ECMAScript parser
//!
//! This module implements a recursive descent parser over the pull scanner.
//! Statements and declarations live in [`stmt`], the operator-precedence
//! expression grammar in [`expr`], and the JSX extension in [`jsx`]; this
//! file owns the parser state, token plumbing, automatic semicolon
//! insertion, bounded lookahead, and the directive prologue.
//!
//! The parser holds exactly one token of lookahead. Grammar context travels
//! as a [`Context`] bitmask passed by value into every production, so
//! entering a nested region (a generator body, a `for` head, a class) is a
//! matter of deriving a new mask rather than mutating shared flags.

mod expr;
mod jsx;
mod stmt;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::ast::{
    Expression, Identifier, LiteralValue, NodeMeta, Program, SourceType, Span, Statement,
};
use crate::context::Context;
use crate::error::{messages, Error, Result, SourceLocation};
use crate::lexer::{Comment, Keyword, Lexer, LexerState, Token, TokenKind, TokenRecord};
use crate::options::Options;

/// Parse source text as a script
pub fn parse_script(source: &str, options: Options) -> Result<Program> {
    Parser::new(source, options).parse_program(false)
}

/// Parse source text as a module
pub fn parse_module(source: &str, options: Options) -> Result<Program> {
    Parser::new(source, options).parse_program(true)
}

/// Parse source text, choosing the goal from [`Options::module`]
pub fn parse(source: &str, options: Options) -> Result<Program> {
    let module = options.module;
    Parser::new(source, options).parse_program(module)
}

/// A resumable snapshot of the parser, used for bounded lookahead
///
/// Restoring rewinds the scanner and drops token records captured during
/// the abandoned attempt. Comments are deduplicated by a high-water mark
/// instead, so a comment inside a reparsed region is still reported once.
struct ParserState<'src> {
    lexer: LexerState,
    token: Token<'src>,
    token_start: LexerState,
    token_end: SourceLocation,
    prev_token_end: SourceLocation,
    tokens_len: usize,
    cover: CoverState,
}

/// Positions of syntax that is an error in an object or array literal but
/// legal in the destructuring pattern the same text may turn out to be.
/// Recorded instead of reported, then either cleared by reinterpretation
/// or raised once the covering expression commits to being an expression.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CoverState {
    /// First `{ key = value }` shorthand initializer
    shorthand_init: Option<SourceLocation>,
    /// Second plain `__proto__` property of one object literal
    duplicate_proto: Option<SourceLocation>,
}

/// One class body's private names
///
/// Declarations collect while the body parses. Uses resolve against this
/// and enclosing class bodies only when the body closes, since a method
/// may reference a field declared after it.
#[derive(Debug, Default)]
struct PrivateScope {
    /// Declared names mapped to their accessor-shape bits, for the rule
    /// that one getter and one setter of equal staticness may share a name
    declared: FxHashMap<String, u8>,
    /// `#name` references not yet matched to a declaration
    used: Vec<(String, SourceLocation)>,
}

/// A recursive descent parser for ECMAScript
pub struct Parser<'src> {
    /// Source code (kept for error messages and raw text slices)
    source: &'src str,
    /// The scanner this parser pulls from
    lexer: Lexer<'src>,
    /// Parse options
    options: Options,
    /// Current lookahead token
    token: Token<'src>,
    /// Scanner state captured immediately before the current token was
    /// scanned, so the token can be rescanned under a different
    /// interpretation (`/` as regex, lookahead under strict mode)
    token_start: LexerState,
    /// End position of the current token
    token_end: SourceLocation,
    /// End position of the most recently consumed token; node spans close
    /// here, and inserted semicolons are reported at this offset
    prev_token_end: SourceLocation,
    /// Captured token stream, when requested
    tokens: Vec<TokenRecord>,
    /// Captured comments, when requested
    comments: Vec<Comment>,
    /// High-water mark of comment end offsets already reported, so rescans
    /// and abandoned lookahead do not report a comment twice
    comment_watermark: usize,
    /// High-water mark of token end offsets already streamed to the token
    /// callback
    token_watermark: usize,
    /// Labels currently in scope; the value records the position of a
    /// `continue` that targeted the label, validated once the labeled body
    /// is known to be (or not be) an iteration statement
    labels: FxHashMap<String, Option<SourceLocation>>,
    /// Whether the most recently parsed labeled statement labeled an
    /// iteration statement, for chained labels
    last_label_was_iteration: bool,
    /// Names exported so far by the current module
    exported_names: FxHashSet<String>,
    /// Pattern-only syntax seen inside the expression currently being parsed
    cover: CoverState,
    /// Private-name scopes for the classes currently being parsed, innermost
    /// last
    private_scopes: Vec<PrivateScope>,
    /// Called with the offset of each automatically inserted semicolon
    semicolon_hook: Option<Box<dyn FnMut(usize) + 'src>>,
    /// Called once per skipped comment
    comment_hook: Option<Box<dyn FnMut(&Comment) + 'src>>,
    /// Called once per consumed token
    token_hook: Option<Box<dyn FnMut(&TokenRecord) + 'src>>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source code
    pub fn new(source: &'src str, options: Options) -> Self {
        let mut lexer = Lexer::new(source, options.clone());
        lexer.set_collect_comments(options.comments);
        let start = SourceLocation {
            line: 1,
            column: 0,
            offset: 0,
        };
        let token_start = lexer.state();
        Self {
            source,
            lexer,
            options,
            token: Token {
                kind: TokenKind::Eof,
                text: "",
                location: start,
                newline_before: false,
                escaped: false,
                octal: false,
                value: crate::lexer::TokenValue::None,
            },
            token_start,
            token_end: start,
            prev_token_end: start,
            tokens: Vec::new(),
            comments: Vec::new(),
            comment_watermark: 0,
            token_watermark: 0,
            labels: FxHashMap::default(),
            last_label_was_iteration: false,
            exported_names: FxHashSet::default(),
            cover: CoverState::default(),
            private_scopes: Vec::new(),
            semicolon_hook: None,
            comment_hook: None,
            token_hook: None,
        }
    }

    /// Report the offset of every automatically inserted semicolon
    pub fn on_inserted_semicolon(mut self, hook: impl FnMut(usize) + 'src) -> Self {
        self.semicolon_hook = Some(Box::new(hook));
        self
    }

    /// Stream each skipped comment as it is passed over
    pub fn on_comment(mut self, hook: impl FnMut(&Comment) + 'src) -> Self {
        self.lexer.set_collect_comments(true);
        self.comment_hook = Some(Box::new(hook));
        self
    }

    /// Stream each token as it is consumed
    pub fn on_token(mut self, hook: impl FnMut(&TokenRecord) + 'src) -> Self {
        self.token_hook = Some(Box::new(hook));
        self
    }

    /// Parse the source as a complete program under the given goal
    pub fn parse_program(&mut self, module_goal: bool) -> Result<Program> {
        self.options.validate(module_goal)?;

        let mut ctx = Context::default();
        if module_goal {
            ctx |= Context::MODULE | Context::STRICT | Context::AWAIT;
        }
        ctx = ctx.union_strict_if(self.options.implied_strict);
        ctx = ctx.and_return(self.options.global_return);

        debug!(module_goal, strict = ctx.has_strict(), "parsing program");

        self.prime(ctx)?;

        let mut body = Vec::new();
        ctx = self.parse_directive_prologue(ctx, &mut body)?;
        self.parse_statement_list(ctx, &mut body)?;
        if self.token.kind != TokenKind::Eof {
            return Err(self.unexpected());
        }

        let start = SourceLocation {
            line: 1,
            column: 0,
            offset: 0,
        };
        let span = Span::new(start, self.token.location);
        Ok(Program {
            meta: self.meta_at("Program", span),
            source_type: if module_goal {
                SourceType::Module
            } else {
                SourceType::Script
            },
            body,
            tokens: self
                .options
                .tokens
                .then(|| std::mem::take(&mut self.tokens)),
            comments: self
                .options
                .comments
                .then(|| std::mem::take(&mut self.comments)),
        })
    }

    // ========== Token Access ==========

    /// Load the first token without recording a consumption
    fn prime(&mut self, ctx: Context) -> Result<()> {
        self.token_start = self.lexer.state();
        self.token = self.lexer.next_token(ctx, false)?;
        self.token_end = self.lexer.position();
        self.flush_comments();
        Ok(())
    }

    /// Consume the current token and scan the next one
    ///
    /// The next token is always scanned with `/` as a division operator;
    /// expression starts rescan via [`Self::relex_regex`] when they need the
    /// regular expression interpretation instead.
    fn bump(&mut self, ctx: Context) -> Result<Token<'src>> {
        self.record_consumed();
        self.prev_token_end = self.token_end;
        self.token_start = self.lexer.state();
        let next = self.lexer.next_token(ctx, false)?;
        self.token_end = self.lexer.position();
        let consumed = std::mem::replace(&mut self.token, next);
        self.flush_comments();
        Ok(consumed)
    }

    /// Rescan the current `/` or `/=` token as a regular expression literal
    fn relex_regex(&mut self, ctx: Context) -> Result<()> {
        self.lexer.restore(self.token_start);
        self.token = self.lexer.next_token(ctx, true)?;
        self.token_end = self.lexer.position();
        self.flush_comments();
        Ok(())
    }

    /// Rescan the current token after the surrounding code turned strict,
    /// so a lookahead scanned under sloppy rules is re-judged
    fn relex_current(&mut self, ctx: Context) -> Result<()> {
        self.lexer.restore(self.token_start);
        self.token = self.lexer.next_token(ctx, false)?;
        self.token_end = self.lexer.position();
        self.flush_comments();
        Ok(())
    }

    /// Consume the `}` closing a template substitution and scan the next
    /// template chunk that starts immediately after it
    fn bump_template(&mut self) -> Result<Token<'src>> {
        self.record_consumed();
        self.prev_token_end = self.token_end;
        self.token_start = self.lexer.state();
        let chunk = self.lexer.rescan_template_continuation()?;
        self.token_end = self.lexer.position();
        let consumed = std::mem::replace(&mut self.token, chunk);
        self.flush_comments();
        Ok(consumed)
    }

    /// Consume the current token and scan the next one in JSX child position
    fn bump_jsx_child(&mut self) -> Result<Token<'src>> {
        self.record_consumed();
        self.prev_token_end = self.token_end;
        self.token_start = self.lexer.state();
        let next = self.lexer.next_jsx_child()?;
        self.token_end = self.lexer.position();
        let consumed = std::mem::replace(&mut self.token, next);
        self.flush_comments();
        Ok(consumed)
    }

    /// Consume the current token and scan the next one inside a JSX tag
    fn bump_jsx_tag(&mut self) -> Result<Token<'src>> {
        self.record_consumed();
        self.prev_token_end = self.token_end;
        self.token_start = self.lexer.state();
        let next = self.lexer.next_jsx_tag_token()?;
        self.token_end = self.lexer.position();
        let consumed = std::mem::replace(&mut self.token, next);
        self.flush_comments();
        Ok(consumed)
    }

    /// Capture and stream the token about to be consumed
    fn record_consumed(&mut self) {
        if self.token.kind == TokenKind::Eof {
            return;
        }
        if !self.options.tokens && self.token_hook.is_none() {
            return;
        }
        let span = self.token_span();
        let record = TokenRecord {
            token_type: self.token.kind.record_type(),
            value: self.token.text.to_string(),
            start: self.options.ranges.then_some(span.start.offset),
            end: self.options.ranges.then_some(span.end.offset),
            loc: self.options.loc.then(|| span.into()),
        };
        if self.token.end() > self.token_watermark {
            self.token_watermark = self.token.end();
            if let Some(hook) = self.token_hook.as_mut() {
                hook(&record);
            }
        }
        if self.options.tokens {
            self.tokens.push(record);
        }
    }

    /// Report comments collected by the scanner since the last flush
    fn flush_comments(&mut self) {
        if self.comment_hook.is_none() && !self.options.comments {
            return;
        }
        for comment in self.lexer.take_comments() {
            if comment.end <= self.comment_watermark {
                continue;
            }
            self.comment_watermark = comment.end;
            if let Some(hook) = self.comment_hook.as_mut() {
                hook(&comment);
            }
            if self.options.comments {
                self.comments.push(comment);
            }
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    /// Check for an unescaped keyword; a keyword spelled with an escape
    /// sequence never matches its syntactic role
    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.token.kind == TokenKind::Keyword(keyword) && !self.token.escaped
    }

    fn expect(&mut self, ctx: Context, kind: TokenKind) -> Result<Token<'src>> {
        if self.token.kind == kind {
            self.bump(ctx)
        } else {
            Err(self.error(
                messages::expected_token(
                    kind.as_display_str(),
                    self.token.kind.as_display_str(),
                ),
                self.token.location,
            ))
        }
    }

    fn expect_keyword(&mut self, ctx: Context, keyword: Keyword) -> Result<Token<'src>> {
        if self.token.kind == TokenKind::Keyword(keyword) {
            if self.token.escaped {
                return Err(self.error(messages::KEYWORD_ESCAPE, self.token.location));
            }
            self.bump(ctx)
        } else {
            Err(self.error(
                messages::expected_token(keyword.as_str(), self.token.kind.as_display_str()),
                self.token.location,
            ))
        }
    }

    fn consume(&mut self, ctx: Context, kind: TokenKind) -> Result<bool> {
        if self.token.kind == kind {
            self.bump(ctx)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume_keyword(&mut self, ctx: Context, keyword: Keyword) -> Result<bool> {
        if self.at_keyword(keyword) {
            self.bump(ctx)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a statement-terminating semicolon, inserting one when the
    /// grammar allows
    ///
    /// Insertion happens before a `}`, at end of input, or when at least one
    /// line terminator separates the previous token from the current one.
    /// Each insertion is reported at the previous token's end offset.
    fn consume_semicolon(&mut self, ctx: Context) -> Result<()> {
        if self.token.kind == TokenKind::Semicolon {
            self.bump(ctx)?;
            return Ok(());
        }
        if self.token.newline_before
            || matches!(self.token.kind, TokenKind::RightBrace | TokenKind::Eof)
        {
            self.notify_inserted_semicolon();
            return Ok(());
        }
        Err(self.error(messages::EXPECTED_SEMICOLON, self.token.location))
    }

    fn notify_inserted_semicolon(&mut self) {
        trace!(offset = self.prev_token_end.offset, "inserted semicolon");
        if let Some(hook) = self.semicolon_hook.as_mut() {
            hook(self.prev_token_end.offset);
        }
    }

    // ========== Lookahead ==========

    fn save_state(&self) -> ParserState<'src> {
        ParserState {
            lexer: self.lexer.state(),
            token: self.token.clone(),
            token_start: self.token_start,
            token_end: self.token_end,
            prev_token_end: self.prev_token_end,
            tokens_len: self.tokens.len(),
            cover: self.cover,
        }
    }

    fn load_state(&mut self, state: ParserState<'src>) {
        trace!(offset = state.token.location.offset, "lookahead restore");
        self.lexer.restore(state.lexer);
        self.token = state.token;
        self.token_start = state.token_start;
        self.token_end = state.token_end;
        self.prev_token_end = state.prev_token_end;
        self.tokens.truncate(state.tokens_len);
        self.cover = state.cover;
    }

    /// Attempt a parse that may need to be abandoned; on failure the parser
    /// rewinds to where it was and the caller takes the other branch
    fn try_parse<T>(&mut self, parse_fn: impl FnOnce(&mut Self) -> Result<T>) -> Option<T> {
        let saved = self.save_state();
        match parse_fn(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.load_state(saved);
                None
            }
        }
    }

    // ========== Errors ==========

    /// Create a parse error with source context
    fn error(&self, message: impl Into<String>, location: SourceLocation) -> Error {
        Error::parse_error_with_context(message, location, self.source)
    }

    /// Create an early error (a static-semantics violation) with context
    fn early_error(&self, message: impl Into<String>, location: SourceLocation) -> Error {
        Error::early_error_with_context(message, location, self.source)
    }

    /// Create a goal-mismatch error with context
    fn goal_error(&self, message: impl Into<String>, location: SourceLocation) -> Error {
        Error::goal_error_with_context(message, location, self.source)
    }

    /// An "unexpected token" error at the current token
    fn unexpected(&self) -> Error {
        self.error(
            messages::unexpected_token(self.token.kind.as_display_str()),
            self.token.location,
        )
    }

    // ========== Node construction ==========

    /// The span of the current token
    fn token_span(&self) -> Span {
        Span::new(self.token.location, self.token_end)
    }

    /// Node metadata closing at the previously consumed token
    fn meta(&self, kind: &'static str, start: SourceLocation) -> NodeMeta {
        self.meta_at(kind, Span::new(start, self.prev_token_end))
    }

    /// Node metadata for an exact span
    fn meta_at(&self, kind: &'static str, span: Span) -> NodeMeta {
        NodeMeta {
            kind,
            span,
            start: self.options.ranges.then_some(span.start.offset),
            end: self.options.ranges.then_some(span.end.offset),
            loc: self.options.loc.then(|| span.into()),
        }
    }

    /// Raw source text for a node span, when raw capture is on
    fn raw(&self, span: Span) -> Option<String> {
        self.options
            .raw
            .then(|| self.source[span.start.offset..span.end.offset].to_string())
    }

    // ========== Identifiers ==========

    /// Reject the current token if it cannot serve as an identifier here
    fn check_identifier(&self, ctx: Context) -> Result<()> {
        self.check_identifier_token(&self.token, ctx)
    }

    /// Reject a token that cannot serve as an identifier in this context
    ///
    /// Escaped reserved words are rejected outright; conditionally reserved
    /// words (`yield`, `await`, `let`, `static`, and the strict-mode set)
    /// are judged against the context.
    fn check_identifier_token(&self, token: &Token<'src>, ctx: Context) -> Result<()> {
        let keyword = match token.kind {
            TokenKind::Identifier => return Ok(()),
            TokenKind::Keyword(keyword) => keyword,
            _ => {
                return Err(self.error(
                    messages::unexpected_token(token.kind.as_display_str()),
                    token.location,
                ))
            }
        };

        if keyword.is_reserved() {
            let message = if token.escaped {
                messages::KEYWORD_ESCAPE
            } else {
                messages::UNEXPECTED_RESERVED_WORD
            };
            return Err(self.error(message, token.location));
        }

        match keyword {
            Keyword::Yield => {
                if ctx.has_strict() {
                    Err(self.early_error(messages::UNEXPECTED_STRICT_RESERVED, token.location))
                } else if ctx.has_yield() {
                    Err(self.error(messages::UNEXPECTED_RESERVED_WORD, token.location))
                } else {
                    Ok(())
                }
            }
            Keyword::Await => {
                if ctx.has_module() || ctx.has_await() || ctx.has_static_block() {
                    Err(self.error(messages::UNEXPECTED_RESERVED_WORD, token.location))
                } else {
                    Ok(())
                }
            }
            keyword if keyword.is_strict_reserved() => {
                if ctx.has_strict() {
                    Err(self.early_error(messages::UNEXPECTED_STRICT_RESERVED, token.location))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Parse an identifier in reference (expression) position
    fn parse_identifier_reference(&mut self, ctx: Context) -> Result<Identifier> {
        self.check_identifier(ctx)?;
        let token = self.bump(ctx)?;
        Ok(self.identifier_node(&token))
    }

    /// Parse an identifier that introduces a binding
    ///
    /// Same rules as a reference, plus the strict-mode ban on rebinding
    /// `eval` and `arguments`.
    fn parse_binding_identifier(&mut self, ctx: Context) -> Result<Identifier> {
        self.check_identifier(ctx)?;
        if ctx.has_strict() {
            let name = self.token.identifier_name();
            if name == "eval" || name == "arguments" {
                return Err(
                    self.early_error(messages::UNEXPECTED_EVAL_ARGUMENTS, self.token.location)
                );
            }
        }
        let token = self.bump(ctx)?;
        Ok(self.identifier_node(&token))
    }

    /// Parse an IdentifierName: any identifier or keyword, as after `.`
    fn parse_identifier_name(&mut self, ctx: Context) -> Result<Identifier> {
        match self.token.kind {
            TokenKind::Identifier | TokenKind::Keyword(_) => {
                let token = self.bump(ctx)?;
                Ok(self.identifier_node(&token))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Build an identifier node from a just-consumed token
    fn identifier_node(&self, token: &Token<'src>) -> Identifier {
        Identifier {
            meta: self.meta("Identifier", token.location),
            name: token.identifier_name().to_string(),
        }
    }

    // ========== Directive prologue ==========

    /// Parse the run of leading string-literal expression statements
    ///
    /// Each one gets its `directive` field set to the raw text between the
    /// quotes. A `"use strict"` directive (spelled exactly, no escapes)
    /// switches the returned context to strict; at that point any earlier
    /// prologue string that cooked a legacy octal escape becomes an error,
    /// and the lookahead token is rescanned under strict rules.
    fn parse_directive_prologue(
        &mut self,
        mut ctx: Context,
        body: &mut Vec<Statement>,
    ) -> Result<Context> {
        let mut octal_escapes: Vec<SourceLocation> = Vec::new();

        while self.token.kind == TokenKind::StringLiteral {
            let token_start = self.token.location;
            let token_end_offset = self.token.end();
            let text = self.token.text;
            let raw_inner = text[1..text.len() - 1].to_string();
            let octal = self.token.octal;

            let mut stmt = self.parse_statement(ctx, true)?;

            let is_directive = match &stmt {
                Statement::Expression(inner) => match &inner.expression {
                    Expression::Literal(literal) => {
                        matches!(literal.value, LiteralValue::String(_))
                            && literal.meta.span.start.offset == token_start.offset
                            && literal.meta.span.end.offset == token_end_offset
                    }
                    _ => false,
                },
                _ => false,
            };

            if !is_directive {
                body.push(stmt);
                return Ok(ctx);
            }

            if let Statement::Expression(inner) = &mut stmt {
                inner.directive = Some(raw_inner.clone());
            }
            body.push(stmt);

            if raw_inner == "use strict" {
                if let Some(location) = octal_escapes.first() {
                    return Err(self.early_error(messages::STRICT_OCTAL_ESCAPE, *location));
                }
                if !ctx.has_strict() {
                    ctx = ctx.union_strict_if(true);
                    self.relex_current(ctx)?;
                }
            } else if octal {
                octal_escapes.push(token_start);
            }
        }

        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(source: &str) -> Result<Program> {
        parse_script(source, Options::default())
    }

    #[test]
    fn test_empty_program() {
        let program = script("").unwrap();
        assert_eq!(program.body.len(), 0);
        assert_eq!(program.source_type, SourceType::Script);
    }

    #[test]
    fn test_module_goal() {
        let program = parse_module("export const x = 1;", Options::default()).unwrap();
        assert_eq!(program.source_type, SourceType::Module);
    }

    #[test]
    fn test_goal_from_options() {
        let options = Options {
            module: true,
            ..Options::default()
        };
        let program = parse("let x = 1;", options).unwrap();
        assert_eq!(program.source_type, SourceType::Module);
    }

    #[test]
    fn test_directive_prologue_sets_field() {
        let program = script("'use strict';\nlet x = 1;").unwrap();
        match &program.body[0] {
            Statement::Expression(stmt) => {
                assert_eq!(stmt.directive.as_deref(), Some("use strict"));
            }
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_directive_with_escape_does_not_enable_strict() {
        // "use\u{20}strict" is a directive but not the strict one
        assert!(script("'use\\u{20}strict'; with (x) {}").is_ok());
        assert!(script("'use strict'; with (x) {}").is_err());
    }

    #[test]
    fn test_string_expression_is_not_directive() {
        let program = script("'a' + 'b';").unwrap();
        match &program.body[0] {
            Statement::Expression(stmt) => assert!(stmt.directive.is_none()),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_retroactive_octal_in_prologue() {
        assert!(script("'\\101'; 'use strict';").is_err());
        assert!(script("'\\101'; 'ordinary';").is_ok());
    }

    #[test]
    fn test_strict_lookahead_rescan() {
        // the token after the directive was scanned before strict mode
        // turned on and must be re-judged
        assert!(script("'use strict'; 0777").is_err());
        assert!(script("0777; 'use strict';").is_ok());
    }

    #[test]
    fn test_inserted_semicolon_offsets() {
        let source = "\"use strict\"\nself.a;\nself.b";
        let mut offsets = Vec::new();
        let mut parser =
            Parser::new(source, Options::default()).on_inserted_semicolon(|offset| {
                offsets.push(offset);
            });
        parser.parse_program(false).unwrap();
        drop(parser);
        assert_eq!(offsets, vec![12, source.len()]);
    }

    #[test]
    fn test_no_insertion_without_newline() {
        assert!(script("let x = 1 let y = 2").is_err());
        assert!(script("let x = 1\nlet y = 2").is_ok());
    }

    #[test]
    fn test_strict_reserved_bindings() {
        assert!(script("'use strict'; var yield = 1;").is_err());
        assert!(script("'use strict'; var package = 1;").is_err());
        assert!(script("var yield = 1;").is_ok());
        assert!(script("var package = 1;").is_ok());
        assert!(parse_module("var await = 1;", Options::default()).is_err());
    }

    #[test]
    fn test_eval_arguments_strict_binding() {
        assert!(script("'use strict'; var eval = 1;").is_err());
        assert!(script("'use strict'; let arguments = 1;").is_err());
        assert!(script("var eval = 1;").is_ok());
    }

    #[test]
    fn test_token_capture() {
        let options = Options {
            tokens: true,
            ranges: true,
            ..Options::default()
        };
        let program = parse_script("let x = 42;", options).unwrap();
        let tokens = program.tokens.unwrap();
        let types: Vec<&str> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec!["Keyword", "Identifier", "Punctuator", "Numeric", "Punctuator"]
        );
        assert_eq!(tokens[3].value, "42");
        assert_eq!(tokens[3].start, Some(8));
        assert_eq!(tokens[3].end, Some(10));
    }

    #[test]
    fn test_comment_capture_and_hook() {
        let options = Options {
            comments: true,
            ..Options::default()
        };
        let mut streamed = Vec::new();
        let mut parser =
            Parser::new("// a\nlet x = 1; /* b */", options).on_comment(|comment| {
                streamed.push(comment.value.clone());
            });
        let program = parser.parse_program(false).unwrap();
        drop(parser);
        let captured = program.comments.unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(streamed, vec![" a", " b"]);
    }

    #[test]
    fn test_web_compat_rejected_for_modules() {
        let options = Options {
            web_compat: true,
            ..Options::default()
        };
        assert!(parse_module("let x = 1;", options).is_err());
    }
}
