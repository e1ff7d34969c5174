//! ESTree shape of the serialized JSON tree

use serde_json::{json, Value};

use cinnabar::{parse_module, parse_script, Options};

fn tree(source: &str, options: Options) -> Value {
    serde_json::to_value(parse_script(source, options).unwrap()).unwrap()
}

fn expression(source: &str, options: Options) -> Value {
    tree(source, options)["body"][0]["expression"].clone()
}

fn raw_options() -> Options {
    Options {
        raw: true,
        ..Options::default()
    }
}

mod envelope {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_program_envelope() {
        let script = tree("1;", Options::default());
        assert_eq!(script["type"], json!("Program"));
        assert_eq!(script["sourceType"], json!("script"));
        assert_eq!(script["body"].as_array().unwrap().len(), 1);
        // capture buffers only appear when requested
        assert!(script.get("tokens").is_none());
        assert!(script.get("comments").is_none());

        let module: Value =
            serde_json::to_value(parse_module("1;", Options::default()).unwrap()).unwrap();
        assert_eq!(module["sourceType"], json!("module"));
    }

    #[test]
    fn test_positions_are_opt_in() {
        let plain = tree("ab;", Options::default());
        let statement = &plain["body"][0];
        assert!(statement.get("start").is_none());
        assert!(statement.get("end").is_none());
        assert!(statement.get("loc").is_none());

        let tracked = tree(
            "ab;",
            Options {
                ranges: true,
                loc: true,
                ..Options::default()
            },
        );
        let statement = &tracked["body"][0];
        assert_eq!(statement["start"], json!(0));
        assert_eq!(statement["end"], json!(3));
        assert_eq!(
            statement["loc"],
            json!({
                "start": { "line": 1, "column": 0 },
                "end": { "line": 1, "column": 3 },
            })
        );
    }

    #[test]
    fn test_directive_member_records_its_text() {
        let program = tree("'use strict';\n1;", Options::default());
        assert_eq!(program["body"][0]["directive"], json!("use strict"));
        assert!(program["body"][1].get("directive").is_none());
    }
}

mod literals {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_literal_payloads() {
        assert_eq!(expression("1.5;", Options::default())["value"], json!(1.5));
        assert_eq!(
            expression("\"hi\";", Options::default())["value"],
            json!("hi")
        );
        assert_eq!(
            expression("true;", Options::default())["value"],
            json!(true)
        );
        assert_eq!(
            expression("null;", raw_options()),
            json!({ "type": "Literal", "value": null, "raw": "null" })
        );
    }

    #[test]
    fn test_bigint_payload() {
        assert_eq!(
            expression("10n;", raw_options()),
            json!({
                "type": "Literal",
                "value": null,
                "bigint": "10",
                "raw": "10n",
            })
        );
    }

    #[test]
    fn test_regex_payload() {
        assert_eq!(
            expression("/ab/gi;", raw_options()),
            json!({
                "type": "Literal",
                "value": null,
                "regex": { "pattern": "ab", "flags": "gi" },
                "raw": "/ab/gi",
            })
        );
    }

    #[test]
    fn test_template_elements() {
        let template = expression("`a${b}`;", Options::default());
        assert_eq!(
            template["quasis"],
            json!([
                {
                    "type": "TemplateElement",
                    "value": { "raw": "a", "cooked": "a" },
                    "tail": false,
                },
                {
                    "type": "TemplateElement",
                    "value": { "raw": "", "cooked": "" },
                    "tail": true,
                },
            ])
        );
        assert_eq!(template["expressions"][0]["name"], json!("b"));

        // a tagged template keeps an uncookable quasi as null
        let tagged = expression("tag`\\u`;", Options::default());
        assert_eq!(tagged["type"], json!("TaggedTemplateExpression"));
        assert_eq!(
            tagged["quasi"]["quasis"][0]["value"],
            json!({ "raw": "\\u", "cooked": null })
        );
    }
}

mod node_shapes {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_operator_strings() {
        assert_eq!(
            expression("a **= b;", Options::default())["operator"],
            json!("**=")
        );
        assert_eq!(
            expression("a !== b;", Options::default())["operator"],
            json!("!==")
        );
        assert_eq!(
            expression("a >>> b;", Options::default())["operator"],
            json!(">>>")
        );
        let unary = expression("delete a.b;", Options::default());
        assert_eq!(unary["operator"], json!("delete"));
        assert_eq!(unary["prefix"], json!(true));
    }

    #[test]
    fn test_function_flags() {
        let program = tree("async function f(a = 1) {}", Options::default());
        let function = &program["body"][0];
        assert_eq!(function["type"], json!("FunctionDeclaration"));
        assert_eq!(function["async"], json!(true));
        assert_eq!(function["generator"], json!(false));
        assert_eq!(function["expression"], json!(false));
        assert_eq!(function["id"]["name"], json!("f"));
        assert_eq!(function["params"][0]["type"], json!("AssignmentPattern"));

        let arrow = expression("x => x;", Options::default());
        assert_eq!(arrow["type"], json!("ArrowFunctionExpression"));
        assert_eq!(arrow["expression"], json!(true));
        assert_eq!(arrow["id"], Value::Null);
    }

    #[test]
    fn test_for_of_await_flag() {
        let module: Value = serde_json::to_value(
            parse_module("for await (const x of xs) {}", Options::default()).unwrap(),
        )
        .unwrap();
        let for_of = &module["body"][0];
        assert_eq!(for_of["type"], json!("ForOfStatement"));
        assert_eq!(for_of["await"], json!(true));

        let plain = tree("for (const x of xs) {}", Options::default());
        assert_eq!(plain["body"][0]["await"], json!(false));
    }

    #[test]
    fn test_optional_chain_shape() {
        let chain = expression("a?.b;", Options::default());
        assert_eq!(chain["type"], json!("ChainExpression"));
        assert_eq!(chain["expression"]["type"], json!("MemberExpression"));
        assert_eq!(chain["expression"]["optional"], json!(true));
        assert_eq!(chain["expression"]["computed"], json!(false));
    }

    #[test]
    fn test_class_member_flags() {
        let program = tree(
            "class C { static m() {} get g() {} }",
            Options::default(),
        );
        let members = &program["body"][0]["body"]["body"];
        assert_eq!(members[0]["type"], json!("MethodDefinition"));
        assert_eq!(members[0]["static"], json!(true));
        assert_eq!(members[0]["kind"], json!("method"));
        assert_eq!(members[1]["kind"], json!("get"));
        assert_eq!(members[1]["static"], json!(false));
    }

    #[test]
    fn test_variable_declaration_kind() {
        let program = tree("const a = 1, b = 2;", Options::default());
        let declaration = &program["body"][0];
        assert_eq!(declaration["type"], json!("VariableDeclaration"));
        assert_eq!(declaration["kind"], json!("const"));
        assert_eq!(
            declaration["declarations"][1]["type"],
            json!("VariableDeclarator")
        );
        assert_eq!(declaration["declarations"][1]["init"]["value"], json!(2.0));
    }
}

mod invariants {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_equivalent_sources_share_one_tree() {
        let compact = "const xs = [1, 2].map(v => v * 2);";
        let spaced = "const xs = [ 1,\n             2 ].map( v  =>  v * 2 ) ;";
        // default form carries no positions or raw text, so only structure
        // is compared
        assert_eq!(
            tree(compact, Options::default()),
            tree(spaced, Options::default())
        );

        let first = parse_script(compact, Options::default()).unwrap();
        let second = parse_script(compact, Options::default()).unwrap();
        assert_eq!(first, second);
    }

    /// Walk a serialized tree asserting every ranged node sits inside the
    /// range of its nearest ranged ancestor
    fn check_containment(node: &Value, lo: u64, hi: u64) {
        match node {
            Value::Object(map) => {
                let bounds = match (
                    map.get("start").and_then(Value::as_u64),
                    map.get("end").and_then(Value::as_u64),
                ) {
                    (Some(start), Some(end)) => {
                        assert!(start <= end, "inverted range {start}..{end}");
                        assert!(
                            lo <= start && end <= hi,
                            "range {start}..{end} escapes its parent {lo}..{hi}"
                        );
                        (start, end)
                    }
                    _ => (lo, hi),
                };
                for value in map.values() {
                    check_containment(value, bounds.0, bounds.1);
                }
            }
            Value::Array(items) => {
                for item in items {
                    check_containment(item, lo, hi);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_ranges_nest_inside_their_parents() {
        let source = "class Point {\n  scale(k = 1) { return `${this.x * k},${this.y * k}`; }\n}\nfor (const [i, v] of pairs) {\n  try { consume(v); } catch ({ message }) { report(message, i); }\n}\n";
        let program = tree(
            source,
            Options {
                ranges: true,
                ..Options::default()
            },
        );
        assert_eq!(program["start"], json!(0));
        assert_eq!(program["end"], json!(source.len()));
        check_containment(&program, 0, source.len() as u64);
    }
}
