//! Strict mode activation and the early errors it brings

mod common;
use common::{module_err, script, script_err};

use cinnabar::error::messages;
use cinnabar::{parse_script, Options};

mod activation {
    use super::*;
    use cinnabar::ast::Statement;

    #[test]
    fn test_directive_is_recognized_and_recorded() {
        let program = script("\"use strict\"; var x = 1;");
        let Statement::Expression(directive) = &program.body[0] else {
            panic!("expected directive statement");
        };
        assert_eq!(directive.directive.as_deref(), Some("use strict"));
    }

    #[test]
    fn test_directive_must_match_raw_text() {
        // an escape breaks the directive, so strict never activates
        let program = script("\"use \\u0073trict\"; var yield = 1;");
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_later_prologue_members_still_count() {
        let err = script_err("\"first\"; \"use strict\"; var package = 1;");
        assert_eq!(err.message(), messages::UNEXPECTED_STRICT_RESERVED);
    }

    #[test]
    fn test_module_goal_is_always_strict() {
        let err = module_err("var package = 1;");
        assert_eq!(err.message(), messages::UNEXPECTED_STRICT_RESERVED);
    }

    #[test]
    fn test_implied_strict_option() {
        let options = Options {
            implied_strict: true,
            ..Options::default()
        };
        let err = parse_script("eval = 1;", options).unwrap_err();
        assert_eq!(err.message(), messages::UNEXPECTED_EVAL_ARGUMENTS);
    }

    #[test]
    fn test_function_bodies_inherit_strictness() {
        let err = script_err("\"use strict\"; function f() { var interface = 1; }");
        assert_eq!(err.message(), messages::UNEXPECTED_STRICT_RESERVED);
    }
}

mod reserved_words {
    use super::*;

    #[test]
    fn test_yield_binding_rejected() {
        let err = script_err("\"use strict\"; var yield = 1;");
        assert_eq!(err.message(), messages::UNEXPECTED_STRICT_RESERVED);
    }

    #[test]
    fn test_package_binding_rejected() {
        let err = script_err("\"use strict\"; var package = 1;");
        assert_eq!(err.message(), messages::UNEXPECTED_STRICT_RESERVED);
    }

    #[test]
    fn test_sloppy_mode_allows_both() {
        let program = script("var yield = 1; var package = 2;");
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_eval_and_arguments_cannot_be_assigned() {
        let err = script_err("\"use strict\"; arguments = 1;");
        assert_eq!(err.message(), messages::UNEXPECTED_EVAL_ARGUMENTS);
    }

    #[test]
    fn test_eval_and_arguments_cannot_be_bound() {
        let err = script_err("\"use strict\"; function eval() {}");
        assert_eq!(err.message(), messages::UNEXPECTED_EVAL_ARGUMENTS);
        let err = script_err("\"use strict\"; let { arguments } = x;");
        assert_eq!(err.message(), messages::UNEXPECTED_EVAL_ARGUMENTS);
    }
}

mod statements {
    use super::*;

    #[test]
    fn test_with_requires_sloppy_mode() {
        assert_eq!(script("with (a) {}").body.len(), 1);
        let err = script_err("\"use strict\"; with (a) {}");
        assert_eq!(err.message(), messages::STRICT_WITH);
    }

    #[test]
    fn test_delete_of_plain_identifier_rejected() {
        let err = script_err("\"use strict\"; delete x;");
        assert_eq!(err.message(), messages::STRICT_DELETE);
        // member deletes stay legal
        assert_eq!(script("\"use strict\"; delete x.y;").body.len(), 2);
    }

    #[test]
    fn test_duplicate_parameters_rejected() {
        let err = script_err("\"use strict\"; function f(a, a) {}");
        assert_eq!(err.message(), messages::DUPLICATE_PARAMETER);
        // sloppy simple parameter lists may repeat names
        assert_eq!(script("function f(a, a) {}").body.len(), 1);
    }
}

mod octal {
    use super::*;

    #[test]
    fn test_octal_literals_rejected() {
        let err = script_err("\"use strict\"; var x = 010;");
        assert_eq!(err.message(), messages::STRICT_OCTAL_LITERAL);
    }

    #[test]
    fn test_octal_escapes_rejected() {
        let err = script_err("\"use strict\"; var s = \"\\07\";");
        assert_eq!(err.message(), messages::STRICT_OCTAL_ESCAPE);
    }

    #[test]
    fn test_octal_escape_in_the_prologue_itself() {
        // the escape precedes the directive, but strict mode covers the
        // whole prologue retroactively
        let err = script_err("\"\\07\"; \"use strict\";");
        assert_eq!(err.message(), messages::STRICT_OCTAL_ESCAPE);
    }

    #[test]
    fn test_sloppy_mode_allows_legacy_octal() {
        assert_eq!(script("var x = 010;").body.len(), 1);
    }
}

mod late_activation {
    use super::*;

    #[test]
    fn test_parameters_are_rechecked() {
        let err = script_err("function f(package) { \"use strict\"; }");
        assert_eq!(err.message(), messages::UNEXPECTED_STRICT_RESERVED);
    }

    #[test]
    fn test_duplicate_parameters_are_rechecked() {
        let err = script_err("function f(a, a) { \"use strict\"; }");
        assert_eq!(err.message(), messages::DUPLICATE_PARAMETER);
    }

    #[test]
    fn test_non_simple_parameters_forbid_the_directive() {
        let err = script_err("function f(a = 1) { \"use strict\"; }");
        assert_eq!(err.message(), messages::USE_STRICT_NON_SIMPLE);
    }

    #[test]
    fn test_function_name_is_rechecked() {
        let err = script_err("function interface() { \"use strict\"; }");
        assert_eq!(err.message(), messages::UNEXPECTED_STRICT_RESERVED);
    }
}
