//! Statement and declaration parsing

mod common;
use common::{script, script_err, script_with};

use cinnabar::ast::{ForTarget, Statement, VariableKind};
use cinnabar::error::messages;
use cinnabar::Options;

mod declarations {
    use super::*;

    #[test]
    fn test_declaration_kinds() {
        let program = script("var a; let b = 1; const c = 2;");
        let kinds: Vec<VariableKind> = program
            .body
            .iter()
            .map(|statement| {
                let Statement::VariableDeclaration(declaration) = statement else {
                    panic!("expected a variable declaration");
                };
                declaration.kind
            })
            .collect();
        assert_eq!(
            kinds,
            vec![VariableKind::Var, VariableKind::Let, VariableKind::Const]
        );
    }

    #[test]
    fn test_multiple_declarators() {
        let program = script("let a = 1, b, c = 3;");
        let Statement::VariableDeclaration(declaration) = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(declaration.declarations.len(), 3);
        assert!(declaration.declarations[1].init.is_none());
    }

    #[test]
    fn test_const_requires_an_initializer() {
        assert_eq!(
            script_err("const c;").message(),
            messages::CONST_WITHOUT_INIT
        );
    }

    #[test]
    fn test_destructuring_requires_an_initializer() {
        assert_eq!(
            script_err("var [a];").message(),
            messages::DESTRUCTURING_WITHOUT_INIT
        );
        assert_eq!(script("var [a] = xs;").body.len(), 1);
    }

    #[test]
    fn test_let_is_not_a_lexical_binding_name() {
        assert_eq!(
            script_err("let let = 1;").message(),
            messages::LET_LEXICAL_BINDING
        );
        // but remains an ordinary identifier in sloppy code
        assert_eq!(script("var let = 1; let = 2;").body.len(), 2);
    }

    #[test]
    fn test_function_and_class_declarations() {
        let program = script("function f() {} class C extends f {}");
        assert!(matches!(
            program.body[0],
            Statement::FunctionDeclaration(_)
        ));
        assert!(matches!(program.body[1], Statement::ClassDeclaration(_)));
    }

    #[test]
    fn test_async_and_generator_declarations() {
        let program = script("async function a() {} function* g() {} async function* ag() {}");
        assert_eq!(program.body.len(), 3);
        let Statement::FunctionDeclaration(function) = &program.body[2] else {
            panic!("expected function declaration");
        };
        assert!(function.is_async && function.is_generator);
    }
}

mod loops {
    use super::*;

    #[test]
    fn test_classic_for_clauses_are_optional() {
        assert_eq!(script("for (;;) break;").body.len(), 1);
        assert_eq!(script("for (let i = 0; i < 9; i++) {}").body.len(), 1);
    }

    #[test]
    fn test_for_in_and_for_of_targets() {
        let program = script("for (const k in obj) {} for (x of xs) {}");
        let Statement::ForIn(for_in) = &program.body[0] else {
            panic!("expected for-in");
        };
        assert!(matches!(for_in.left, ForTarget::VariableDeclaration(_)));
        let Statement::ForOf(for_of) = &program.body[1] else {
            panic!("expected for-of");
        };
        assert!(matches!(for_of.left, ForTarget::Pattern(_)));
        assert!(!for_of.is_await);
    }

    #[test]
    fn test_for_await_needs_of_and_async() {
        let program = script("async function f() { for await (const x of xs) {} }");
        assert_eq!(program.body.len(), 1);
        assert_eq!(
            script_err("async function f() { for await (const x in xs) {} }").message(),
            messages::FOR_AWAIT_OF
        );
    }

    #[test]
    fn test_loop_declarations_bind_once() {
        assert_eq!(
            script_err("for (let a, b of xs) {}").message(),
            messages::FOR_IN_OF_DECLARATIONS
        );
        assert_eq!(
            script_err("for (const x = 1 of xs) {}").message(),
            messages::FOR_OF_LOOP_INIT
        );
    }

    #[test]
    fn test_for_of_left_restrictions() {
        assert_eq!(
            script_err("for (let.a of xs) {}").message(),
            messages::FOR_OF_LET
        );
        assert_eq!(
            script_err("for (async of xs) {}").message(),
            messages::FOR_OF_ASYNC
        );
        // `for (async.x of xs)` is not the bare `async` case
        assert_eq!(script("for (async.x of xs) {}").body.len(), 1);
    }

    #[test]
    fn test_while_and_do_while() {
        let program = script("while (a) b; do c(); while (d);");
        assert!(matches!(program.body[0], Statement::While(_)));
        assert!(matches!(program.body[1], Statement::DoWhile(_)));
    }
}

mod labels_and_jumps {
    use super::*;

    #[test]
    fn test_labeled_break_and_continue() {
        let source = "outer: for (;;) { inner: for (;;) { continue outer; break inner; } }";
        assert_eq!(script(source).body.len(), 1);
    }

    #[test]
    fn test_undefined_label() {
        assert_eq!(
            script_err("for (;;) break missing;").message(),
            messages::undefined_label("missing")
        );
    }

    #[test]
    fn test_duplicate_label() {
        assert_eq!(
            script_err("a: a: ;").message(),
            messages::duplicate_label("a")
        );
    }

    #[test]
    fn test_continue_needs_an_iteration_label() {
        assert_eq!(
            script_err("block: { while (0) continue block; }").message(),
            messages::CONTINUE_LABEL_NOT_ITERATION
        );
        // chained labels on a loop all count as iteration labels
        assert_eq!(script("a: b: while (0) continue a;").body.len(), 1);
    }

    #[test]
    fn test_jumps_need_a_context() {
        assert_eq!(script_err("break;").message(), messages::ILLEGAL_BREAK);
        assert_eq!(
            script_err("continue;").message(),
            messages::ILLEGAL_CONTINUE
        );
        assert_eq!(script_err("return;").message(), messages::ILLEGAL_RETURN);
        // switch admits break but not continue
        assert_eq!(script("switch (a) { default: break; }").body.len(), 1);
        assert_eq!(
            script_err("switch (a) { default: continue; }").message(),
            messages::ILLEGAL_CONTINUE
        );
    }

    #[test]
    fn test_global_return_option() {
        let options = Options {
            global_return: true,
            ..Options::default()
        };
        assert_eq!(script_with("return 1;", options).body.len(), 1);
    }
}

mod switch_and_try {
    use super::*;

    #[test]
    fn test_switch_cases() {
        let program = script("switch (x) { case 1: a(); break; case 2: default: b(); }");
        let Statement::Switch(switch) = &program.body[0] else {
            panic!("expected switch");
        };
        assert_eq!(switch.cases.len(), 3);
        assert!(switch.cases[2].test.is_none());
        assert!(switch.cases[1].consequent.is_empty());
    }

    #[test]
    fn test_switch_allows_one_default() {
        assert_eq!(
            script_err("switch (x) { default: default: }").message(),
            messages::MULTIPLE_DEFAULTS
        );
    }

    #[test]
    fn test_try_forms() {
        let program = script("try { a(); } catch (e) { b(); } finally { c(); }");
        let Statement::Try(try_statement) = &program.body[0] else {
            panic!("expected try");
        };
        assert!(try_statement.handler.is_some());
        assert!(try_statement.finalizer.is_some());
    }

    #[test]
    fn test_catch_binding_is_optional() {
        let program = script("try {} catch {}");
        let Statement::Try(try_statement) = &program.body[0] else {
            panic!("expected try");
        };
        assert!(try_statement.handler.as_ref().unwrap().param.is_none());
    }

    #[test]
    fn test_catch_destructuring() {
        assert_eq!(script("try {} catch ({ message }) {}").body.len(), 1);
    }

    #[test]
    fn test_try_requires_a_handler_or_finalizer() {
        assert_eq!(
            script_err("try { a(); }").message(),
            messages::MISSING_CATCH_OR_FINALLY
        );
    }
}

mod single_statement_contexts {
    use super::*;

    #[test]
    fn test_lexical_declarations_need_a_block() {
        assert_eq!(
            script_err("if (a) let x = 1;").message(),
            messages::LEXICAL_SINGLE_STATEMENT
        );
        assert_eq!(script("if (a) { let x = 1; }").body.len(), 1);
    }

    #[test]
    fn test_function_declarations_need_a_block_by_default() {
        assert_eq!(
            script_err("if (a) function f() {}").message(),
            messages::FUNCTION_SINGLE_STATEMENT
        );
    }

    #[test]
    fn test_web_compat_relaxes_if_bodies() {
        let options = Options {
            web_compat: true,
            ..Options::default()
        };
        assert_eq!(script_with("if (a) function f() {}", options).body.len(), 1);
    }

    #[test]
    fn test_var_is_a_plain_statement() {
        assert_eq!(script("if (a) var x = 1;").body.len(), 1);
    }
}

mod miscellaneous {
    use super::*;

    #[test]
    fn test_empty_debugger_and_block() {
        let program = script("; debugger; { }");
        assert!(matches!(program.body[0], Statement::Empty(_)));
        assert!(matches!(program.body[1], Statement::Debugger(_)));
        assert!(matches!(program.body[2], Statement::Block(_)));
    }

    #[test]
    fn test_if_else_chains() {
        let program = script("if (a) b(); else if (c) d(); else e();");
        let Statement::If(if_statement) = &program.body[0] else {
            panic!("expected if");
        };
        assert!(matches!(
            if_statement.alternate,
            Some(Statement::If(_))
        ));
    }

    #[test]
    fn test_html_comments_under_web_compat() {
        let options = Options {
            web_compat: true,
            ..Options::default()
        };
        let program = script_with("<!-- lead\na();\n--> trail\nb();", options);
        assert_eq!(program.body.len(), 2);
        assert!(cinnabar::parse_script("<!-- lead\na();", Options::default()).is_err());
    }
}
