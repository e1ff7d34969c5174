//! Parse options: position tracking, capture buffers, and streaming callbacks

mod common;
use common::{script, script_with};

use cinnabar::ast::{Expression, Statement};
use cinnabar::error::Error;
use cinnabar::lexer::CommentKind;
use cinnabar::{parse, Options, Parser};

mod token_capture {
    use super::*;

    #[test]
    fn test_token_stream_capture() {
        assert!(script("let x = 1;").tokens.is_none());

        let program = script_with(
            "let x = 1;",
            Options {
                tokens: true,
                ..Options::default()
            },
        );
        let tokens = program.tokens.unwrap();
        let types: Vec<&str> = tokens.iter().map(|t| t.token_type).collect();
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(
            types,
            vec!["Keyword", "Identifier", "Punctuator", "Numeric", "Punctuator"]
        );
        // no EOF entry; values hold raw source text
        assert_eq!(values, vec!["let", "x", "=", "1", ";"]);
    }

    #[test]
    fn test_token_classification() {
        let program = script_with(
            "\"s\"; 0x10; 10n; /re/g; `t`; true; null; foo;",
            Options {
                tokens: true,
                ..Options::default()
            },
        );
        let tokens = program.tokens.unwrap();
        let types: Vec<&str> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                "String",
                "Punctuator",
                "Numeric",
                "Punctuator",
                "BigInt",
                "Punctuator",
                "RegularExpression",
                "Punctuator",
                "Template",
                "Punctuator",
                "Boolean",
                "Punctuator",
                "Null",
                "Punctuator",
                "Identifier",
                "Punctuator",
            ]
        );
        assert_eq!(tokens[0].value, "\"s\"");
        assert_eq!(tokens[6].value, "/re/g");
        assert_eq!(tokens[8].value, "`t`");
    }

    #[test]
    fn test_token_positions_follow_position_options() {
        let plain = script_with(
            "let x = 1;",
            Options {
                tokens: true,
                ..Options::default()
            },
        );
        let record = &plain.tokens.unwrap()[1];
        assert_eq!(record.start, None);
        assert_eq!(record.end, None);
        assert_eq!(record.loc, None);

        let tracked = script_with(
            "let x = 1;",
            Options {
                tokens: true,
                ranges: true,
                loc: true,
                ..Options::default()
            },
        );
        let record = &tracked.tokens.unwrap()[1];
        assert_eq!(record.value, "x");
        assert_eq!(record.start, Some(4));
        assert_eq!(record.end, Some(5));
        let loc = record.loc.unwrap();
        assert_eq!((loc.start.line, loc.start.column), (1, 4));
        assert_eq!((loc.end.line, loc.end.column), (1, 5));
    }
}

mod comment_capture {
    use super::*;

    #[test]
    fn test_comment_kinds_and_text() {
        assert!(script("// c\n1;").comments.is_none());

        let program = script_with(
            "// line\n/* block */ 1;",
            Options {
                comments: true,
                ..Options::default()
            },
        );
        let comments = program.comments.unwrap();
        assert_eq!(comments.len(), 2);

        assert_eq!(comments[0].kind, CommentKind::SingleLine);
        assert_eq!(comments[0].value, " line");
        assert_eq!((comments[0].start, comments[0].end), (0, 7));

        assert_eq!(comments[1].kind, CommentKind::MultiLine);
        assert_eq!(comments[1].value, " block ");
        assert_eq!((comments[1].start, comments[1].end), (8, 19));
    }

    #[test]
    fn test_comment_locations_follow_the_loc_option() {
        let program = script_with(
            "/* a */ 1;",
            Options {
                comments: true,
                loc: true,
                ..Options::default()
            },
        );
        let comments = program.comments.unwrap();
        let loc = comments[0].loc.unwrap();
        assert_eq!((loc.start.line, loc.start.column), (1, 0));
        assert_eq!((loc.end.line, loc.end.column), (1, 7));

        let untracked = script_with(
            "/* a */ 1;",
            Options {
                comments: true,
                ..Options::default()
            },
        );
        assert_eq!(untracked.comments.unwrap()[0].loc, None);
    }

    #[test]
    fn test_html_comments_recorded_under_web_compat() {
        let program = script_with(
            "<!-- a\n1;\n--> b\n2;",
            Options {
                web_compat: true,
                comments: true,
                ..Options::default()
            },
        );
        assert_eq!(program.body.len(), 2);
        let comments = program.comments.unwrap();
        let kinds: Vec<CommentKind> = comments.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CommentKind::HtmlOpen, CommentKind::HtmlClose]);
        assert_eq!(comments[0].value, " a");
        assert_eq!(comments[1].value, " b");
    }
}

mod callbacks {
    use super::*;

    #[test]
    fn test_on_token_streams_each_token_once() {
        // arrow reinterpretation rewinds the scanner; the stream must not
        // repeat the tokens it saw twice
        let mut types = Vec::new();
        Parser::new("(x) => x", Options::default())
            .on_token(|record| types.push(record.token_type))
            .parse_program(false)
            .unwrap();
        assert_eq!(
            types,
            vec!["Punctuator", "Identifier", "Punctuator", "Punctuator", "Identifier"]
        );
    }

    #[test]
    fn test_on_comment_streams_without_capture() {
        let mut kinds = Vec::new();
        let program = Parser::new("// a\n1; /* b */", Options::default())
            .on_comment(|comment| kinds.push(comment.kind))
            .parse_program(false)
            .unwrap();
        assert_eq!(kinds, vec![CommentKind::SingleLine, CommentKind::MultiLine]);
        // the hook alone does not turn on the capture buffer
        assert!(program.comments.is_none());
    }

    #[test]
    fn test_hook_records_follow_position_options() {
        let mut starts = Vec::new();
        Parser::new(
            "a\nb",
            Options {
                ranges: true,
                ..Options::default()
            },
        )
        .on_token(|record| starts.push(record.start))
        .parse_program(false)
        .unwrap();
        assert_eq!(starts, vec![Some(0), Some(2)]);
    }
}

mod node_positions {
    use super::*;

    #[test]
    fn test_nodes_carry_offsets_only_on_request() {
        let plain = script("ab;");
        assert_eq!(plain.meta.start, None);
        assert_eq!(plain.meta.end, None);
        assert_eq!(plain.meta.loc, None);

        let tracked = script_with(
            "ab;",
            Options {
                ranges: true,
                ..Options::default()
            },
        );
        assert_eq!(tracked.meta.start, Some(0));
        assert_eq!(tracked.meta.end, Some(3));
        let Statement::Expression(statement) = &tracked.body[0] else {
            panic!("expected expression statement");
        };
        let Expression::Identifier(ident) = &statement.expression else {
            panic!("expected identifier");
        };
        assert_eq!(ident.meta.start, Some(0));
        assert_eq!(ident.meta.end, Some(2));
        assert_eq!(ident.meta.loc, None);
    }

    #[test]
    fn test_loc_lines_and_columns() {
        let program = script_with(
            "a;\nbb;",
            Options {
                loc: true,
                ..Options::default()
            },
        );
        let Statement::Expression(statement) = &program.body[1] else {
            panic!("expected expression statement");
        };
        let Expression::Identifier(ident) = &statement.expression else {
            panic!("expected identifier");
        };
        let loc = ident.meta.loc.unwrap();
        assert_eq!((loc.start.line, loc.start.column), (2, 0));
        assert_eq!((loc.end.line, loc.end.column), (2, 2));
        assert_eq!(ident.meta.start, None);
    }
}

mod validation {
    use super::*;

    #[test]
    fn test_web_compat_requires_the_script_goal() {
        let err = parse(
            "1;",
            Options {
                web_compat: true,
                module: true,
                ..Options::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::OptionsError(_)));
        assert_eq!(err.message(), "'web_compat' applies only to the script goal");
        assert_eq!(err.location(), None);
        assert_eq!(err.index(), 0);
    }

    #[test]
    fn test_validation_runs_before_scanning() {
        // a source that cannot even lex still reports the option clash
        let err = parse(
            "\"unterminated",
            Options {
                web_compat: true,
                module: true,
                ..Options::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::OptionsError(_)));
    }
}
