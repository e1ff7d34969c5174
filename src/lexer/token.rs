//! Token definitions for the ECMAScript scanner

use num_bigint::BigInt;
use serde::Serialize;

use crate::ast::Loc;
use crate::error::SourceLocation;

/// A token produced by the scanner
///
/// Tokens live for exactly one lookahead slot: the parser consumes them as
/// they are pulled and never retains more than the current token plus the
/// previous token's end position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    /// The kind of token
    pub kind: TokenKind,
    /// The raw source text of the token
    pub text: &'src str,
    /// Location of the token start in source
    pub location: SourceLocation,
    /// True iff at least one line terminator occurred between the previous
    /// token's end and this token's start. The single fact ASI depends on.
    pub newline_before: bool,
    /// True iff the token contains a Unicode escape sequence (identifiers and
    /// keywords only; a reserved word spelled with an escape is rejected where
    /// the keyword itself is required)
    pub escaped: bool,
    /// True iff a string token cooked a legacy octal or `\8`/`\9` escape in
    /// sloppy mode. A later `"use strict"` directive in the same prologue
    /// turns that escape into an error retroactively.
    pub octal: bool,
    /// Decoded payload for literal-carrying tokens
    pub value: TokenValue,
}

impl<'src> Token<'src> {
    /// Byte offset of the first character
    pub fn start(&self) -> usize {
        self.location.offset
    }

    /// Byte offset one past the last character
    pub fn end(&self) -> usize {
        self.location.offset + self.text.len()
    }

    /// The identifier name, decoded if the token carried escapes
    pub fn identifier_name(&self) -> &str {
        match &self.value {
            TokenValue::String(decoded) => decoded,
            _ => self.text,
        }
    }
}

/// Decoded literal payload attached to a token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No payload (punctuators, plain identifiers, keywords)
    None,
    /// Numeric literal value
    Number(f64),
    /// BigInt literal value
    BigInt(BigInt),
    /// Cooked string value, or decoded identifier text for escaped identifiers
    String(String),
    /// Template chunk: cooked text, or `None` when the chunk contains an
    /// escape sequence that is only valid in tagged position
    Template(Option<String>),
    /// Regular expression literal body and flags
    Regex { pattern: String, flags: String },
}

/// The kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Numeric literal (42, 3.14, 0xFF)
    NumberLiteral,
    /// BigInt literal (42n)
    BigIntLiteral,
    /// String literal ("hello", 'world')
    StringLiteral,
    /// Template literal with no substitutions (`hello`)
    TemplateLiteral,
    /// Template head (`hello ${)
    TemplateHead,
    /// Template middle (} middle ${)
    TemplateMiddle,
    /// Template tail (} tail`)
    TemplateTail,
    /// Regular expression literal (/pattern/flags)
    RegexLiteral,
    /// JSX text chunk between tags
    JsxText,

    // Identifiers and keywords
    /// Identifier (foo, bar, $baz)
    Identifier,
    /// Private name (#foo, #bar)
    PrivateName,
    /// Keyword (let, const, function, etc.)
    Keyword(Keyword),

    // Comment-equivalent leading token
    /// `#!` line at offset 0
    Hashbang,

    // Punctuators
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `.`
    Dot,
    /// `...`
    DotDotDot,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `?.`
    QuestionDot,
    /// `??`
    QuestionQuestion,
    /// `??=`
    QuestionQuestionEquals,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,

    // Comparison operators
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEquals,
    /// `>=`
    GreaterEquals,
    /// `==`
    EqualsEquals,
    /// `===`
    EqualsEqualsEquals,
    /// `!=`
    BangEquals,
    /// `!==`
    BangEqualsEquals,

    // Bitwise operators
    /// `&`
    Ampersand,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `<<`
    LessLess,
    /// `>>`
    GreaterGreater,
    /// `>>>`
    GreaterGreaterGreater,

    // Logical operators
    /// `!`
    Bang,
    /// `&&`
    AmpersandAmpersand,
    /// `||`
    PipePipe,

    // Assignment operators
    /// `=`
    Equals,
    /// `+=`
    PlusEquals,
    /// `-=`
    MinusEquals,
    /// `*=`
    StarEquals,
    /// `**=`
    StarStarEquals,
    /// `/=`
    SlashEquals,
    /// `%=`
    PercentEquals,
    /// `<<=`
    LessLessEquals,
    /// `>>=`
    GreaterGreaterEquals,
    /// `>>>=`
    GreaterGreaterGreaterEquals,
    /// `&=`
    AmpersandEquals,
    /// `|=`
    PipeEquals,
    /// `^=`
    CaretEquals,
    /// `&&=`
    AmpersandAmpersandEquals,
    /// `||=`
    PipePipeEquals,

    // Arrow
    /// `=>`
    Arrow,

    // End of file
    /// End of input
    Eof,
}

/// ECMAScript keywords, reserved and contextual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Reserved keywords
    Await,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Return,
    Static,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,

    // Reserved only in strict mode
    Implements,
    Interface,
    Package,
    Private,
    Protected,
    Public,

    // Contextual keywords
    As,
    Async,
    From,
    Get,
    Meta,
    Of,
    Set,
    Target,
}

impl Keyword {
    /// Map identifier text onto the fixed keyword set
    pub fn from_text(text: &str) -> Option<Keyword> {
        let keyword = match text {
            "await" => Keyword::Await,
            "break" => Keyword::Break,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "debugger" => Keyword::Debugger,
            "default" => Keyword::Default,
            "delete" => Keyword::Delete,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "enum" => Keyword::Enum,
            "export" => Keyword::Export,
            "extends" => Keyword::Extends,
            "false" => Keyword::False,
            "finally" => Keyword::Finally,
            "for" => Keyword::For,
            "function" => Keyword::Function,
            "if" => Keyword::If,
            "import" => Keyword::Import,
            "in" => Keyword::In,
            "instanceof" => Keyword::Instanceof,
            "let" => Keyword::Let,
            "new" => Keyword::New,
            "null" => Keyword::Null,
            "return" => Keyword::Return,
            "static" => Keyword::Static,
            "super" => Keyword::Super,
            "switch" => Keyword::Switch,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "true" => Keyword::True,
            "try" => Keyword::Try,
            "typeof" => Keyword::Typeof,
            "var" => Keyword::Var,
            "void" => Keyword::Void,
            "while" => Keyword::While,
            "with" => Keyword::With,
            "yield" => Keyword::Yield,
            "implements" => Keyword::Implements,
            "interface" => Keyword::Interface,
            "package" => Keyword::Package,
            "private" => Keyword::Private,
            "protected" => Keyword::Protected,
            "public" => Keyword::Public,
            "as" => Keyword::As,
            "async" => Keyword::Async,
            "from" => Keyword::From,
            "get" => Keyword::Get,
            "meta" => Keyword::Meta,
            "of" => Keyword::Of,
            "set" => Keyword::Set,
            "target" => Keyword::Target,
            _ => return None,
        };
        Some(keyword)
    }

    /// Check if this keyword is reserved in every context
    ///
    /// `await`, `yield`, `let` and `static` are excluded: their reservedness
    /// depends on goal, strictness and surrounding generators/async functions,
    /// which the parser decides from its context value.
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Keyword::Break
                | Keyword::Case
                | Keyword::Catch
                | Keyword::Class
                | Keyword::Const
                | Keyword::Continue
                | Keyword::Debugger
                | Keyword::Default
                | Keyword::Delete
                | Keyword::Do
                | Keyword::Else
                | Keyword::Enum
                | Keyword::Export
                | Keyword::Extends
                | Keyword::False
                | Keyword::Finally
                | Keyword::For
                | Keyword::Function
                | Keyword::If
                | Keyword::Import
                | Keyword::In
                | Keyword::Instanceof
                | Keyword::New
                | Keyword::Null
                | Keyword::Return
                | Keyword::Super
                | Keyword::Switch
                | Keyword::This
                | Keyword::Throw
                | Keyword::True
                | Keyword::Try
                | Keyword::Typeof
                | Keyword::Var
                | Keyword::Void
                | Keyword::While
                | Keyword::With
        )
    }

    /// Check if this keyword is additionally reserved in strict-mode code
    pub fn is_strict_reserved(&self) -> bool {
        matches!(
            self,
            Keyword::Implements
                | Keyword::Interface
                | Keyword::Let
                | Keyword::Package
                | Keyword::Private
                | Keyword::Protected
                | Keyword::Public
                | Keyword::Static
                | Keyword::Yield
        )
    }

    /// Get the string representation of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Await => "await",
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Catch => "catch",
            Keyword::Class => "class",
            Keyword::Const => "const",
            Keyword::Continue => "continue",
            Keyword::Debugger => "debugger",
            Keyword::Default => "default",
            Keyword::Delete => "delete",
            Keyword::Do => "do",
            Keyword::Else => "else",
            Keyword::Enum => "enum",
            Keyword::Export => "export",
            Keyword::Extends => "extends",
            Keyword::False => "false",
            Keyword::Finally => "finally",
            Keyword::For => "for",
            Keyword::Function => "function",
            Keyword::If => "if",
            Keyword::Import => "import",
            Keyword::In => "in",
            Keyword::Instanceof => "instanceof",
            Keyword::Let => "let",
            Keyword::New => "new",
            Keyword::Null => "null",
            Keyword::Return => "return",
            Keyword::Static => "static",
            Keyword::Super => "super",
            Keyword::Switch => "switch",
            Keyword::This => "this",
            Keyword::Throw => "throw",
            Keyword::True => "true",
            Keyword::Try => "try",
            Keyword::Typeof => "typeof",
            Keyword::Var => "var",
            Keyword::Void => "void",
            Keyword::While => "while",
            Keyword::With => "with",
            Keyword::Yield => "yield",
            Keyword::Implements => "implements",
            Keyword::Interface => "interface",
            Keyword::Package => "package",
            Keyword::Private => "private",
            Keyword::Protected => "protected",
            Keyword::Public => "public",
            Keyword::As => "as",
            Keyword::Async => "async",
            Keyword::From => "from",
            Keyword::Get => "get",
            Keyword::Meta => "meta",
            Keyword::Of => "of",
            Keyword::Set => "set",
            Keyword::Target => "target",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TokenKind {
    /// Check if this token is an assignment operator
    pub fn is_assignment_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Equals
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::StarStarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
                | TokenKind::LessLessEquals
                | TokenKind::GreaterGreaterEquals
                | TokenKind::GreaterGreaterGreaterEquals
                | TokenKind::AmpersandEquals
                | TokenKind::PipeEquals
                | TokenKind::CaretEquals
                | TokenKind::AmpersandAmpersandEquals
                | TokenKind::PipePipeEquals
                | TokenKind::QuestionQuestionEquals
        )
    }

    /// Check if this token starts an expression
    pub fn can_start_expression(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::PrivateName
                | TokenKind::NumberLiteral
                | TokenKind::BigIntLiteral
                | TokenKind::StringLiteral
                | TokenKind::TemplateLiteral
                | TokenKind::TemplateHead
                | TokenKind::RegexLiteral
                | TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Keyword(Keyword::True)
                | TokenKind::Keyword(Keyword::False)
                | TokenKind::Keyword(Keyword::Null)
                | TokenKind::Keyword(Keyword::This)
                | TokenKind::Keyword(Keyword::Super)
                | TokenKind::Keyword(Keyword::New)
                | TokenKind::Keyword(Keyword::Import)
                | TokenKind::Keyword(Keyword::Function)
                | TokenKind::Keyword(Keyword::Class)
                | TokenKind::Keyword(Keyword::Async)
                | TokenKind::Keyword(Keyword::Typeof)
                | TokenKind::Keyword(Keyword::Void)
                | TokenKind::Keyword(Keyword::Delete)
                | TokenKind::Keyword(Keyword::Await)
                | TokenKind::Keyword(Keyword::Yield)
        )
    }

    /// Human-readable token text for diagnostics
    pub fn as_display_str(&self) -> &'static str {
        match self {
            TokenKind::NumberLiteral => "number",
            TokenKind::BigIntLiteral => "bigint",
            TokenKind::StringLiteral => "string",
            TokenKind::TemplateLiteral => "template",
            TokenKind::TemplateHead => "template",
            TokenKind::TemplateMiddle => "template",
            TokenKind::TemplateTail => "template",
            TokenKind::RegexLiteral => "regular expression",
            TokenKind::JsxText => "JSX text",
            TokenKind::Identifier => "identifier",
            TokenKind::PrivateName => "private name",
            TokenKind::Keyword(k) => k.as_str(),
            TokenKind::Hashbang => "#!",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::DotDotDot => "...",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::QuestionDot => "?.",
            TokenKind::QuestionQuestion => "??",
            TokenKind::QuestionQuestionEquals => "??=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEquals => "<=",
            TokenKind::GreaterEquals => ">=",
            TokenKind::EqualsEquals => "==",
            TokenKind::EqualsEqualsEquals => "===",
            TokenKind::BangEquals => "!=",
            TokenKind::BangEqualsEquals => "!==",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::LessLess => "<<",
            TokenKind::GreaterGreater => ">>",
            TokenKind::GreaterGreaterGreater => ">>>",
            TokenKind::Bang => "!",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Equals => "=",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::StarEquals => "*=",
            TokenKind::StarStarEquals => "**=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::LessLessEquals => "<<=",
            TokenKind::GreaterGreaterEquals => ">>=",
            TokenKind::GreaterGreaterGreaterEquals => ">>>=",
            TokenKind::AmpersandEquals => "&=",
            TokenKind::PipeEquals => "|=",
            TokenKind::CaretEquals => "^=",
            TokenKind::AmpersandAmpersandEquals => "&&=",
            TokenKind::PipePipeEquals => "||=",
            TokenKind::Arrow => "=>",
            TokenKind::Eof => "end of input",
        }
    }

    /// Token category name used by the captured token stream
    pub fn record_type(&self) -> &'static str {
        match self {
            TokenKind::NumberLiteral => "Numeric",
            TokenKind::BigIntLiteral => "BigInt",
            TokenKind::StringLiteral => "String",
            TokenKind::TemplateLiteral
            | TokenKind::TemplateHead
            | TokenKind::TemplateMiddle
            | TokenKind::TemplateTail => "Template",
            TokenKind::RegexLiteral => "RegularExpression",
            TokenKind::JsxText => "JSXText",
            TokenKind::Identifier => "Identifier",
            TokenKind::PrivateName => "PrivateName",
            TokenKind::Keyword(Keyword::True) | TokenKind::Keyword(Keyword::False) => "Boolean",
            TokenKind::Keyword(Keyword::Null) => "Null",
            TokenKind::Keyword(_) => "Keyword",
            TokenKind::Hashbang => "Hashbang",
            TokenKind::Eof => "EOF",
            _ => "Punctuator",
        }
    }
}

/// Comment classification for capture and streaming callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    /// `// ...`
    SingleLine,
    /// `/* ... */`
    MultiLine,
    /// `<!--` to end of line (web-compat scripts)
    #[serde(rename = "HTMLOpen")]
    HtmlOpen,
    /// Line-leading `-->` to end of line (web-compat scripts)
    #[serde(rename = "HTMLClose")]
    HtmlClose,
    /// `#!` line at offset 0
    #[serde(rename = "HashbangComment")]
    Hashbang,
}

/// A skipped comment, captured when requested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Comment text without its delimiters
    pub value: String,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Loc>,
}

/// One entry of the captured flat token stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    #[serde(rename = "type")]
    pub token_type: &'static str,
    /// Raw source text of the token
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Loc>,
}
