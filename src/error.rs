//! Error types for the Cinnabar ECMAScript parser

use std::fmt;
use thiserror::Error;

/// Source location in ECMAScript code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (0-indexed, ESTree convention)
    pub column: u32,
    /// Byte offset in source
    pub offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Format a source context with caret pointer for errors
pub fn format_error_context(source: &str, location: &SourceLocation) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let line_idx = (location.line.saturating_sub(1)) as usize;

    if line_idx >= lines.len() {
        return String::new();
    }

    let mut result = String::new();
    let line_num_width = format!("{}", location.line + 1).len().max(3);

    // Show 1 line before if available
    if line_idx > 0 {
        result.push_str(&format!(
            "{:>width$} | {}\n",
            location.line - 1,
            lines[line_idx - 1],
            width = line_num_width
        ));
    }

    // Show the error line
    result.push_str(&format!(
        "{:>width$} | {}\n",
        location.line,
        lines[line_idx],
        width = line_num_width
    ));

    // Show the caret pointer
    let pointer_offset = location.column as usize;
    result.push_str(&format!(
        "{:>width$} | {}^\n",
        "",
        " ".repeat(pointer_offset),
        width = line_num_width
    ));

    // Show 1 line after if available
    if line_idx + 1 < lines.len() {
        result.push_str(&format!(
            "{:>width$} | {}\n",
            location.line + 1,
            lines[line_idx + 1],
            width = line_num_width
        ));
    }

    result
}

/// Main error type for Cinnabar
///
/// Every variant raised while scanning or parsing carries the best-available
/// source position. One entry-point call yields either a complete tree or
/// exactly one of these; there is no recovery mode and no partial result.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// Lexical error - malformed literal, unterminated string/template/comment,
    /// invalid escape or character
    #[error("SyntaxError: {message} at {location}{}", if source_context.is_empty() { String::new() } else { format!("\n{}", source_context) })]
    LexerError {
        message: String,
        location: SourceLocation,
        source_context: String,
    },

    /// Syntactic error - unexpected or missing token
    #[error("SyntaxError: {message} at {location}{}", if source_context.is_empty() { String::new() } else { format!("\n{}", source_context) })]
    ParseError {
        message: String,
        location: SourceLocation,
        source_context: String,
    },

    /// Static-semantic (early) error - strict-mode violation, duplicate binding,
    /// invalid assignment target, reserved-word misuse, invalid regex flags
    #[error("SyntaxError: {message} at {location}{}", if source_context.is_empty() { String::new() } else { format!("\n{}", source_context) })]
    EarlyError {
        message: String,
        location: SourceLocation,
        source_context: String,
    },

    /// Goal mismatch - construct valid only under the other goal symbol
    /// (e.g. `import` in a script)
    #[error("SyntaxError: {message} at {location}{}", if source_context.is_empty() { String::new() } else { format!("\n{}", source_context) })]
    GoalError {
        message: String,
        location: SourceLocation,
        source_context: String,
    },

    /// Invalid parser configuration, rejected before scanning begins
    #[error("OptionsError: {0}")]
    OptionsError(String),
}

impl Error {
    /// Create a new lexer error
    pub fn lexer_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Error::LexerError {
            message: message.into(),
            location,
            source_context: String::new(),
        }
    }

    /// Create a new lexer error with source context
    pub fn lexer_error_with_context(
        message: impl Into<String>,
        location: SourceLocation,
        source: &str,
    ) -> Self {
        Error::LexerError {
            message: message.into(),
            source_context: format_error_context(source, &location),
            location,
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Error::ParseError {
            message: message.into(),
            location,
            source_context: String::new(),
        }
    }

    /// Create a new parse error with source context
    pub fn parse_error_with_context(
        message: impl Into<String>,
        location: SourceLocation,
        source: &str,
    ) -> Self {
        Error::ParseError {
            message: message.into(),
            source_context: format_error_context(source, &location),
            location,
        }
    }

    /// Create a new early (static-semantic) error with source context
    pub fn early_error_with_context(
        message: impl Into<String>,
        location: SourceLocation,
        source: &str,
    ) -> Self {
        Error::EarlyError {
            message: message.into(),
            source_context: format_error_context(source, &location),
            location,
        }
    }

    /// Create a new goal-mismatch error with source context
    pub fn goal_error_with_context(
        message: impl Into<String>,
        location: SourceLocation,
        source: &str,
    ) -> Self {
        Error::GoalError {
            message: message.into(),
            source_context: format_error_context(source, &location),
            location,
        }
    }

    /// Create a new options error
    pub fn options_error(message: impl Into<String>) -> Self {
        Error::OptionsError(message.into())
    }

    /// Add source context to an existing error
    pub fn with_source_context(self, source: &str) -> Self {
        match self {
            Error::LexerError {
                message, location, ..
            } => Error::LexerError {
                message,
                source_context: format_error_context(source, &location),
                location,
            },
            Error::ParseError {
                message, location, ..
            } => Error::ParseError {
                message,
                source_context: format_error_context(source, &location),
                location,
            },
            Error::EarlyError {
                message, location, ..
            } => Error::EarlyError {
                message,
                source_context: format_error_context(source, &location),
                location,
            },
            Error::GoalError {
                message, location, ..
            } => Error::GoalError {
                message,
                source_context: format_error_context(source, &location),
                location,
            },
            other => other,
        }
    }

    /// The catalogue message without position or context
    pub fn message(&self) -> &str {
        match self {
            Error::LexerError { message, .. }
            | Error::ParseError { message, .. }
            | Error::EarlyError { message, .. }
            | Error::GoalError { message, .. } => message,
            Error::OptionsError(message) => message,
        }
    }

    /// The source location of the failure, if it has one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::LexerError { location, .. }
            | Error::ParseError { location, .. }
            | Error::EarlyError { location, .. }
            | Error::GoalError { location, .. } => Some(*location),
            Error::OptionsError(_) => None,
        }
    }

    /// Byte offset of the failure (0 for configuration errors)
    pub fn index(&self) -> usize {
        self.location().map(|l| l.offset).unwrap_or(0)
    }

    /// 1-indexed line of the failure (0 for configuration errors)
    pub fn line(&self) -> u32 {
        self.location().map(|l| l.line).unwrap_or(0)
    }

    /// 0-indexed column of the failure (0 for configuration errors)
    pub fn column(&self) -> u32 {
        self.location().map(|l| l.column).unwrap_or(0)
    }
}

/// Result type alias for Cinnabar
pub type Result<T> = std::result::Result<T, Error>;

/// Standardized error message templates
///
/// These constants provide consistent error messages following JavaScript
/// conventions. Use the helper functions below to generate formatted messages.
#[allow(dead_code)]
pub mod messages {
    // Lexical errors
    pub const UNEXPECTED_END: &str = "Unexpected end of input";
    pub const UNTERMINATED_STRING: &str = "Unterminated string literal";
    pub const UNTERMINATED_TEMPLATE: &str = "Unterminated template literal";
    pub const UNTERMINATED_COMMENT: &str = "Unterminated multi-line comment";
    pub const UNTERMINATED_REGEX: &str = "Unterminated regular expression literal";
    pub const INVALID_ESCAPE: &str = "Invalid escape sequence";
    pub const INVALID_UNICODE_ESCAPE: &str = "Invalid Unicode escape sequence";
    pub const INVALID_HEX_ESCAPE: &str = "Invalid hexadecimal escape sequence";
    pub const STRICT_OCTAL_LITERAL: &str = "Octal literals are not allowed in strict mode";
    pub const STRICT_OCTAL_ESCAPE: &str = "Octal escape sequences are not allowed in strict mode";
    pub const TEMPLATE_OCTAL_ESCAPE: &str =
        "Octal escape sequences are not allowed in template strings";
    pub const INVALID_BIGINT: &str =
        "Invalid BigInt literal: exponents, decimal points and legacy octal forms are not allowed";
    pub const MISSING_DIGITS: &str = "Missing digits after numeric literal prefix";
    pub const MISSING_EXPONENT: &str = "Missing digits after exponent indicator";
    pub const INVALID_NUMERIC_SEPARATOR: &str = "Invalid numeric separator placement";
    pub const INVALID_NUMBER: &str = "Invalid numeric literal";
    pub const IDENTIFIER_AFTER_NUMBER: &str =
        "Identifier starts immediately after numeric literal";
    pub const KEYWORD_ESCAPE: &str = "Keyword must not contain escaped characters";
    pub const NEWLINE_IN_REGEX: &str = "Regular expressions may not contain line terminators";
    pub const REGEX_FLAG_U_AND_V: &str =
        "Regular expression flags 'u' and 'v' cannot be combined";

    // Syntactic errors
    pub const UNEXPECTED_TOKEN: &str = "Unexpected token";
    pub const UNEXPECTED_RESERVED_WORD: &str = "Unexpected reserved word";
    pub const UNEXPECTED_STRICT_RESERVED: &str =
        "Unexpected reserved word in strict mode";
    pub const UNEXPECTED_EVAL_ARGUMENTS: &str =
        "'eval' and 'arguments' cannot be bound in strict mode";
    pub const TRAILING_COMMA_AFTER_REST: &str = "Rest element may not have a trailing comma";
    pub const REST_MUST_BE_LAST: &str = "Rest element must be last element";
    pub const INVALID_EXPONENTIATION: &str =
        "Unary expressions cannot be the left operand of an exponentiation expression without parentheses";
    pub const NULLISH_WITH_LOGICAL: &str =
        "Nullish coalescing operator may not be mixed with '&&' or '||' without parentheses";
    pub const NEWLINE_AFTER_THROW: &str = "Illegal newline after throw";
    pub const NEWLINE_AFTER_ARROW_HEAD: &str = "No line break is allowed before '=>'";
    pub const MULTIPLE_DEFAULTS: &str = "More than one default clause in switch statement";
    pub const ILLEGAL_RETURN: &str = "Illegal return statement";
    pub const ILLEGAL_BREAK: &str = "Illegal break statement";
    pub const ILLEGAL_CONTINUE: &str =
        "Illegal continue statement: no surrounding iteration statement";
    pub const CONTINUE_LABEL_NOT_ITERATION: &str =
        "Illegal continue statement: label does not denote an iteration statement";
    pub const EXPECTED_SEMICOLON: &str = "Expected a semicolon or a line terminator";
    pub const FUNCTION_SINGLE_STATEMENT: &str =
        "Function declarations are only allowed at the top level or inside a block";
    pub const LEXICAL_SINGLE_STATEMENT: &str =
        "Lexical declaration cannot appear in a single-statement context";
    pub const MISSING_CATCH_OR_FINALLY: &str = "Missing catch or finally after try";

    // Early (static-semantic) errors
    pub const INVALID_LEFT_HAND_SIDE: &str = "Invalid left-hand side in assignment";
    pub const INVALID_ASSIGNMENT_PREFIX: &str =
        "Invalid left-hand side expression in prefix operation";
    pub const INVALID_ASSIGNMENT_POSTFIX: &str =
        "Invalid left-hand side expression in postfix operation";
    pub const INVALID_DESTRUCTURING_TARGET: &str = "Invalid destructuring assignment target";
    pub const STRICT_WITH: &str = "'with' statements are not allowed in strict mode";
    pub const STRICT_DELETE: &str =
        "Delete of an unqualified identifier is not allowed in strict mode";
    pub const DUPLICATE_PARAMETER: &str =
        "Duplicate parameter name not allowed in this context";
    pub const CONST_WITHOUT_INIT: &str = "Missing initializer in const declaration";
    pub const DESTRUCTURING_WITHOUT_INIT: &str =
        "Missing initializer in destructuring declaration";
    pub const LET_LEXICAL_BINDING: &str = "'let' is not allowed as a lexical binding name";
    pub const FOR_IN_LOOP_INIT: &str =
        "for-in loop variable declaration may not have an initializer";
    pub const FOR_OF_LOOP_INIT: &str =
        "for-of loop variable declaration may not have an initializer";
    pub const FOR_IN_OF_DECLARATIONS: &str =
        "for-in and for-of loops may only declare one binding";
    pub const FOR_AWAIT_OF: &str = "'for await' is only valid with 'of' loops";
    pub const FOR_OF_LET: &str =
        "The left-hand side of a for-of loop may not start with 'let'";
    pub const FOR_OF_ASYNC: &str = "The left-hand side of a for-of loop may not be 'async'";
    pub const SHORTHAND_INITIALIZER: &str = "Invalid shorthand property initializer";
    pub const REST_DEFAULT_INIT: &str = "Rest parameter may not have a default initializer";
    pub const GETTER_NO_PARAMS: &str = "Getter must not have any formal parameters";
    pub const SETTER_ONE_PARAM: &str = "Setter must have exactly one formal parameter";
    pub const SETTER_REST_PARAM: &str = "Setter function argument must not be a rest parameter";
    pub const USE_STRICT_NON_SIMPLE: &str =
        "Illegal 'use strict' directive in function with non-simple parameter list";
    pub const DUPLICATE_CONSTRUCTOR: &str = "A class may only have one constructor";
    pub const CONSTRUCTOR_SPECIAL_METHOD: &str =
        "Class constructor may not be an accessor, generator or async method";
    pub const CLASS_STATIC_PROTOTYPE: &str =
        "Classes may not have a static property named 'prototype'";
    pub const CLASS_FIELD_CONSTRUCTOR: &str =
        "Classes may not have a field named 'constructor'";
    pub const CLASS_PRIVATE_CONSTRUCTOR: &str =
        "Classes may not have an element named '#constructor'";
    pub const DELETE_PRIVATE_NAME: &str = "Private fields can not be deleted";
    pub const PRIVATE_OUTSIDE_CLASS: &str = "Private names are only allowed in class bodies";
    pub const YIELD_IN_PARAMETERS: &str = "Yield expression not allowed in formal parameters";
    pub const AWAIT_IN_PARAMETERS: &str =
        "Await expression not allowed in formal parameters";
    pub const TAGGED_TEMPLATE_IN_CHAIN: &str =
        "Tagged template expressions are not permitted in an optional chain";
    pub const OPTIONAL_CHAIN_ASSIGNMENT: &str =
        "The left-hand side of an assignment expression may not be an optional chain";
    pub const NEW_OPTIONAL_CHAIN: &str = "Invalid optional chain from new expression";
    pub const SUPER_OUTSIDE_METHOD: &str = "'super' keyword unexpected here";
    pub const NEW_TARGET_OUTSIDE_FUNCTION: &str =
        "new.target expression is not allowed here";
    pub const DUPLICATE_PROTO: &str =
        "Duplicate __proto__ fields are not allowed in object literals";

    // Goal-mismatch errors
    pub const IMPORT_OUTSIDE_MODULE: &str =
        "'import' may appear only with 'sourceType: module'";
    pub const EXPORT_OUTSIDE_MODULE: &str =
        "'export' may appear only with 'sourceType: module'";
    pub const MODULE_ITEM_NOT_TOP_LEVEL: &str =
        "'import' and 'export' may only appear at the top level";
    pub const IMPORT_META_OUTSIDE_MODULE: &str = "Cannot use 'import.meta' outside a module";
    pub const AWAIT_OUTSIDE_ASYNC: &str =
        "'await' is only allowed within async functions and at the top levels of modules";
    pub const JSX_EMPTY_ATTRIBUTE: &str =
        "JSX attributes must only be assigned a non-empty expression";

    /// Format an "Unexpected token 'x'" error message
    pub fn unexpected_token(token: &str) -> String {
        format!("{} '{}'", UNEXPECTED_TOKEN, token)
    }

    /// Format an "Expected 'x', found 'y'" error message
    pub fn expected_token(expected: &str, found: &str) -> String {
        format!("Expected '{}', found '{}'", expected, found)
    }

    /// Format an "Invalid character 'x'" error message
    pub fn invalid_character(c: char) -> String {
        format!("Invalid character '{}'", c)
    }

    /// Format an "Undefined label 'x'" error message
    pub fn undefined_label(label: &str) -> String {
        format!("Undefined label '{}'", label)
    }

    /// Format a "Label 'x' has already been declared" error message
    pub fn duplicate_label(label: &str) -> String {
        format!("Label '{}' has already been declared", label)
    }

    /// Format a "Duplicate export 'x'" error message
    pub fn duplicate_export(name: &str) -> String {
        format!("Duplicate export '{}'", name)
    }

    /// Format an "Identifier 'x' has already been declared" error message
    pub fn duplicate_binding(name: &str) -> String {
        format!("Identifier '{}' has already been declared", name)
    }

    /// Format a "Duplicate private name '#x'" error message
    pub fn duplicate_private_name(name: &str) -> String {
        format!("Duplicate private name '#{}'", name)
    }

    /// Format an "Expected corresponding JSX closing tag" error message
    pub fn jsx_mismatched_closing(name: &str) -> String {
        format!("Expected corresponding JSX closing tag for '<{}>'", name)
    }

    /// Format a "Private field '#x' must be declared in an enclosing class" error message
    pub fn undefined_private_name(name: &str) -> String {
        format!("Private field '#{}' must be declared in an enclosing class", name)
    }

    /// Format an "Invalid regular expression flag 'x'" error message
    pub fn invalid_regex_flag(flag: char) -> String {
        format!("Invalid regular expression flag '{}'", flag)
    }

    /// Format a "Duplicate regular expression flag 'x'" error message
    pub fn duplicate_regex_flag(flag: char) -> String {
        format!("Duplicate regular expression flag '{}'", flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(line: u32, column: u32, offset: usize) -> SourceLocation {
        SourceLocation {
            line,
            column,
            offset,
        }
    }

    #[test]
    fn test_caret_points_at_the_column() {
        let source = "let a = 1;\nlet b = @;\nlet c = 3;";
        let rendered = format_error_context(source, &location(2, 8, 19));
        assert_eq!(
            rendered,
            "  1 | let a = 1;\n  2 | let b = @;\n    |         ^\n  3 | let c = 3;\n"
        );
    }

    #[test]
    fn test_context_empty_past_the_last_line() {
        assert_eq!(format_error_context("1;", &location(9, 0, 0)), "");
    }

    #[test]
    fn test_accessors_and_display() {
        let error = Error::parse_error(messages::UNEXPECTED_END, location(1, 4, 4));
        assert_eq!(error.message(), messages::UNEXPECTED_END);
        assert_eq!(error.index(), 4);
        assert_eq!(error.line(), 1);
        assert_eq!(error.column(), 4);
        assert_eq!(
            error.to_string(),
            "SyntaxError: Unexpected end of input at 1:4"
        );

        let options = Error::options_error("bad combination");
        assert_eq!(options.message(), "bad combination");
        assert_eq!(options.location(), None);
        assert_eq!(options.index(), 0);
        assert_eq!(options.to_string(), "OptionsError: bad combination");
    }

    #[test]
    fn test_with_source_context_attaches_a_snippet() {
        let source = "a @";
        let error = Error::lexer_error(messages::UNEXPECTED_TOKEN, location(1, 2, 2))
            .with_source_context(source);
        let rendered = error.to_string();
        assert!(rendered.contains("SyntaxError: Unexpected token at 1:2"));
        assert!(rendered.contains("  1 | a @\n"));
        assert!(rendered.contains("|   ^"));
    }
}
