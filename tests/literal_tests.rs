//! Literal scanning: numbers, bigints, strings, regexes, and templates

mod common;
use common::{expression, script, script_err, script_with};

use cinnabar::ast::{Expression, LiteralValue, Statement};
use cinnabar::error::messages;
use cinnabar::Options;
use num_bigint::BigInt;

/// Parse one expression statement and return its literal value
fn literal(source: &str) -> LiteralValue {
    let Expression::Literal(literal) = expression(source) else {
        panic!("expected a literal in: {}", source);
    };
    literal.value
}

mod numbers {
    use super::*;

    #[test]
    fn test_numeric_forms() {
        assert_eq!(literal("42;"), LiteralValue::Number(42.0));
        assert_eq!(literal("0x10;"), LiteralValue::Number(16.0));
        assert_eq!(literal("0o17;"), LiteralValue::Number(15.0));
        assert_eq!(literal("0b101;"), LiteralValue::Number(5.0));
        assert_eq!(literal("1e3;"), LiteralValue::Number(1000.0));
        assert_eq!(literal("1.5e-2;"), LiteralValue::Number(0.015));
        assert_eq!(literal(".5;"), LiteralValue::Number(0.5));
        assert_eq!(literal("5.;"), LiteralValue::Number(5.0));
    }

    #[test]
    fn test_numeric_separators() {
        assert_eq!(literal("1_000_000;"), LiteralValue::Number(1_000_000.0));
        assert_eq!(literal("0xFF_FF;"), LiteralValue::Number(65535.0));
    }

    #[test]
    fn test_separator_placement_is_checked() {
        assert_eq!(
            script_err("1__2;").message(),
            messages::INVALID_NUMERIC_SEPARATOR
        );
        assert_eq!(
            script_err("1_;").message(),
            messages::INVALID_NUMERIC_SEPARATOR
        );
    }

    #[test]
    fn test_legacy_octal_in_sloppy_mode() {
        assert_eq!(literal("010;"), LiteralValue::Number(8.0));
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(script_err("0x;").message(), messages::MISSING_DIGITS);
        assert_eq!(script_err("1e;").message(), messages::MISSING_EXPONENT);
        assert_eq!(
            script_err("3in x;").message(),
            messages::IDENTIFIER_AFTER_NUMBER
        );
    }
}

mod bigints {
    use super::*;

    #[test]
    fn test_bigint_forms() {
        assert_eq!(literal("10n;"), LiteralValue::BigInt(BigInt::from(10)));
        assert_eq!(literal("0x20n;"), LiteralValue::BigInt(BigInt::from(32)));
        assert_eq!(
            literal("1_000n;"),
            LiteralValue::BigInt(BigInt::from(1000))
        );
    }

    #[test]
    fn test_bigint_survives_f64_precision() {
        let value = literal("9007199254740993n;");
        let LiteralValue::BigInt(big) = value else {
            panic!("expected bigint");
        };
        assert_eq!(big.to_string(), "9007199254740993");
    }

    #[test]
    fn test_fractional_bigint_rejected() {
        assert_eq!(script_err("2017.8n;").message(), messages::INVALID_BIGINT);
    }

    #[test]
    fn test_exponent_bigint_rejected() {
        assert_eq!(script_err("0e0n;").message(), messages::INVALID_BIGINT);
    }

    #[test]
    fn test_legacy_octal_bigint_rejected() {
        assert_eq!(script_err("017n;").message(), messages::INVALID_BIGINT);
    }
}

mod strings {
    use super::*;

    #[test]
    fn test_escape_cooking() {
        assert_eq!(
            literal("\"a\\x41b\";"),
            LiteralValue::String("aAb".to_string())
        );
        assert_eq!(
            literal("\"\\u0041\";"),
            LiteralValue::String("A".to_string())
        );
        assert_eq!(
            literal("\"\\u{1F600}\";"),
            LiteralValue::String("\u{1F600}".to_string())
        );
        assert_eq!(
            literal("\"a\\nb\\tc\";"),
            LiteralValue::String("a\nb\tc".to_string())
        );
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(
            literal("\"a\\\nb\";"),
            LiteralValue::String("ab".to_string())
        );
    }

    #[test]
    fn test_bad_escapes() {
        assert_eq!(
            script_err("\"\\u{110000}\";").message(),
            messages::INVALID_UNICODE_ESCAPE
        );
        assert_eq!(
            script_err("\"\\xZZ\";").message(),
            messages::INVALID_HEX_ESCAPE
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            script_err("\"abc").message(),
            messages::UNTERMINATED_STRING
        );
        assert_eq!(
            script_err("\"ab\ncd\";").message(),
            messages::UNTERMINATED_STRING
        );
    }
}

mod raw_text {
    use super::*;

    #[test]
    fn test_raw_kept_verbatim_when_requested() {
        let options = Options {
            raw: true,
            ..Options::default()
        };
        let program = script_with("\"foo\";", options);
        let Statement::Expression(statement) = &program.body[0] else {
            panic!("expected expression statement");
        };
        let Expression::Literal(literal) = &statement.expression else {
            panic!("expected literal");
        };
        assert_eq!(literal.raw.as_deref(), Some("\"foo\""));
        assert_eq!(literal.value, LiteralValue::String("foo".to_string()));
    }

    #[test]
    fn test_raw_preserves_the_spelling_of_numbers() {
        let options = Options {
            raw: true,
            ..Options::default()
        };
        let program = script_with("0x10;", options);
        let Statement::Expression(statement) = &program.body[0] else {
            panic!("expected expression statement");
        };
        let Expression::Literal(literal) = &statement.expression else {
            panic!("expected literal");
        };
        assert_eq!(literal.raw.as_deref(), Some("0x10"));
    }

    #[test]
    fn test_raw_absent_by_default() {
        let Expression::Literal(literal) = expression("\"foo\";") else {
            panic!("expected literal");
        };
        assert!(literal.raw.is_none());
    }
}

mod regexes {
    use super::*;

    #[test]
    fn test_regex_literal() {
        assert_eq!(
            literal("/ab+c/gi;"),
            LiteralValue::Regex {
                pattern: "ab+c".to_string(),
                flags: "gi".to_string(),
            }
        );
    }

    #[test]
    fn test_division_stays_division() {
        // `a / b / c` is two divisions, never a regex
        let Expression::Binary(outer) = expression("a / b / c;") else {
            panic!("expected binary expression");
        };
        assert!(matches!(&outer.left, Expression::Binary(_)));
        assert!(matches!(&outer.right, Expression::Identifier(_)));
    }

    #[test]
    fn test_regex_after_function_declaration() {
        // after a declaration's closing brace a slash starts a regex
        let program = script("function f(){} /regex/");
        assert_eq!(program.body.len(), 2);
        let Statement::Expression(statement) = &program.body[1] else {
            panic!("expected expression statement");
        };
        let Expression::Literal(literal) = &statement.expression else {
            panic!("expected regex literal");
        };
        assert!(matches!(literal.value, LiteralValue::Regex { .. }));
    }

    #[test]
    fn test_regex_flag_validation() {
        assert_eq!(
            script_err("/a/uv;").message(),
            messages::REGEX_FLAG_U_AND_V
        );
    }

    #[test]
    fn test_line_terminators_terminate() {
        assert_eq!(
            script_err("/a\nb/;").message(),
            messages::NEWLINE_IN_REGEX
        );
    }
}

mod templates {
    use super::*;

    #[test]
    fn test_template_chunks() {
        let Expression::TemplateLiteral(template) = expression("`a${b}c${d}e`;") else {
            panic!("expected template literal");
        };
        assert_eq!(template.quasis.len(), 3);
        assert_eq!(template.expressions.len(), 2);
        assert_eq!(template.quasis[0].value.cooked.as_deref(), Some("a"));
        assert_eq!(template.quasis[2].value.raw, "e");
        assert!(template.quasis[2].tail);
        assert!(!template.quasis[0].tail);
    }

    #[test]
    fn test_cooked_escapes() {
        let Expression::TemplateLiteral(template) = expression("`a\\n${b}`;") else {
            panic!("expected template literal");
        };
        assert_eq!(template.quasis[0].value.cooked.as_deref(), Some("a\n"));
        assert_eq!(template.quasis[0].value.raw, "a\\n");
    }

    #[test]
    fn test_invalid_escape_needs_a_tag() {
        assert!(script_err("`\\u`;").message().contains("escape"));

        let Expression::TaggedTemplate(tagged) = expression("tag`\\u`;") else {
            panic!("expected tagged template");
        };
        assert!(tagged.quasi.quasis[0].value.cooked.is_none());
        assert_eq!(tagged.quasi.quasis[0].value.raw, "\\u");
    }

    #[test]
    fn test_unterminated_template() {
        assert_eq!(
            script_err("`abc").message(),
            messages::UNTERMINATED_TEMPLATE
        );
    }
}

mod hashbang {
    use super::*;
    use cinnabar::lexer::CommentKind;

    #[test]
    fn test_hashbang_at_offset_zero() {
        let program = script("#!/usr/bin/env node\n1;");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_hashbang_collected_as_a_comment() {
        let options = Options {
            comments: true,
            ..Options::default()
        };
        let program = script_with("#!x\n1;", options);
        let comments = program.comments.unwrap();
        assert_eq!(comments[0].kind, CommentKind::Hashbang);
        assert_eq!(comments[0].start, 0);
        assert_eq!(comments[0].value, "x");
    }

    #[test]
    fn test_hashbang_only_at_offset_zero() {
        assert!(cinnabar::parse_script("1;\n#!x", Options::default()).is_err());
    }
}
