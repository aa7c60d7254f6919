//! Runs emitted programs in V8 against the mock runtime in `host.js`.
//!
//! Every statement is translated, printed and evaluated at global scope, so
//! the printed text itself is what gets tested. Forks queued by a statement
//! run before its value is read back as plain JSON.

use deno_core::{v8, FastString, JsRuntime, RuntimeOptions};
use ember_ast::Expr;
use ember_target::Program;
use serde::Deserialize;
use serde_json::Value;

use crate::config::TranslatorOptions;
use crate::driver::{emit, Translator};

const MOCK_RUNTIME: &str = include_str!("host.js");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Ok(Value),
    Error(String),
}

pub(crate) struct Host {
    pub translator: Translator,
    js: JsRuntime,
}

impl Host {
    pub fn new() -> Self {
        Self::with_options(TranslatorOptions::default())
    }

    pub fn with_options(options: TranslatorOptions) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut js = JsRuntime::new(RuntimeOptions::default());
        let install = format!(
            "{}\nvar {} = emberHost.runtime;\n",
            MOCK_RUNTIME, options.runtime_name
        );
        js.execute_script("[ember:host]", FastString::from(install))
            .expect("mock runtime loads");
        Self {
            translator: Translator::new(options),
            js,
        }
    }

    fn execute(&mut self, source: String) -> Result<v8::Global<v8::Value>, String> {
        self.js
            .execute_script("[ember]", FastString::from(source))
            .map_err(|err| err.to_string())
    }

    /// Evaluate `source`, which must produce a string.
    fn string(&mut self, source: String) -> Result<String, String> {
        let value = self.execute(source)?;
        let scope = &mut self.js.handle_scope();
        let local = v8::Local::new(scope, value);
        if !local.is_string() {
            return Err("script did not produce a string".to_string());
        }
        Ok(local.to_rust_string_lossy(scope))
    }

    /// Make `name` resolvable through `runtime.resolveName`. `value` is
    /// JavaScript that may use the helpers `pending`, `resolved`, `failed`
    /// and `record`.
    pub fn define(&mut self, name: &str, value: &str) {
        let source = format!(
            "emberHost.define({}, emberHost.evaluate({}));",
            json_string(name),
            json_string(value)
        );
        self.execute(source).expect("definition evaluates");
    }

    /// Run emitted JavaScript; its completion value comes back as JSON.
    pub fn run_script(&mut self, script: &str) -> Result<Value, String> {
        let text = self.string(format!("emberHost.run({})", json_string(script)))?;
        let outcome: Outcome = serde_json::from_str(&text).map_err(|err| err.to_string())?;
        match outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Error(message) => Err(format!("uncaught {}", message)),
        }
    }

    /// Translate and run `statements` one at a time; the value of the last
    /// one is returned.
    pub fn run(&mut self, statements: Vec<Expr>) -> Result<Value, String> {
        let mut last = Value::Null;
        for statement in &statements {
            let stmts = self
                .translator
                .translate_statement(statement)
                .map_err(|err| format!("translation failed: {}", err))?;
            let mut program = Program::new();
            stmts.into_iter().for_each(|stmt| program.push(stmt));
            let script = emit(&program, self.translator.options());
            last = self.run_script(&script)?;
        }
        Ok(last)
    }

    pub fn eval(&mut self, expr: Expr) -> Result<Value, String> {
        self.run(vec![expr])
    }

    /// Asynchronous steps in the order they happened.
    pub fn events(&mut self) -> Vec<String> {
        let text = self
            .string("JSON.stringify(emberHost.events)".to_string())
            .expect("event log reads");
        serde_json::from_str(&text).expect("event log is a list of strings")
    }
}

fn json_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmitMode, ErrorMode};
    use ember_ast::{
        Aggregator, AwaitBinding, BinaryOperator, CatchClause, ExprKind, LetValue, Position,
        SelectionCase, Slot, UnaryOperator,
    };
    use serde_json::json;
    use std::collections::VecDeque;

    fn bin(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        Expr::binary(op, left, right)
    }

    fn ints(values: &[i64]) -> Vec<Expr> {
        values.iter().copied().map(Expr::integer).collect()
    }

    fn fault(message: &str) -> Expr {
        Expr::synthetic(ExprKind::Fault {
            error: Box::new(Expr::string(message)),
        })
    }

    /// `note(label)` records `label` in the event log and returns it.
    fn with_note(host: &mut Host) {
        host.define("note", "function (label) { record(label); return label; }");
    }

    #[test]
    fn test_literals_survive_translation() {
        let mut host = Host::new();
        assert_eq!(host.eval(Expr::integer(42)).unwrap(), json!(42));
        assert_eq!(host.eval(Expr::integer(-7)).unwrap(), json!(-7));
        assert_eq!(host.eval(Expr::real(2.5)).unwrap(), json!(2.5));
        assert_eq!(host.eval(Expr::boolean(true)).unwrap(), json!(true));
        assert_eq!(host.eval(Expr::void()).unwrap(), Value::Null);
        assert_eq!(
            host.eval(Expr::string("say \"hi\"\n\ttwice")).unwrap(),
            json!("say \"hi\"\n\ttwice")
        );
    }

    #[test]
    fn test_folded_and_runtime_operators_agree() {
        use BinaryOperator::*;

        let operators = [
            Plus,
            Minus,
            Multiply,
            Modulo,
            And,
            Or,
            Xor,
            LessThan,
            LessThanOrEqual,
            GreaterThan,
            GreaterThanOrEqual,
            ValueEquality,
            ValueInequality,
        ];
        let operands = [(6, 7), (-13, 4), (0, 5), (9, 9)];

        let mut host = Host::new();
        host.run(vec![
            Expr::let_value("a", Expr::integer(0)),
            Expr::let_value("b", Expr::integer(0)),
        ])
        .unwrap();

        for (a, b) in operands {
            host.run(vec![
                Expr::assign(Expr::ident("a"), Expr::integer(a)),
                Expr::assign(Expr::ident("b"), Expr::integer(b)),
            ])
            .unwrap();

            for op in operators {
                let folded = host.eval(bin(op, Expr::integer(a), Expr::integer(b))).unwrap();
                let computed = host.eval(bin(op, Expr::ident("a"), Expr::ident("b"))).unwrap();
                assert_eq!(folded, computed, "{:?} on {} and {}", op, a, b);
            }
        }
    }

    #[test]
    fn test_unary_operators() {
        let mut host = Host::new();
        host.run(vec![Expr::let_value("n", Expr::integer(4))]).unwrap();
        let unary = |op| Expr::unary(op, Expr::ident("n"));
        assert_eq!(host.eval(unary(UnaryOperator::Minus)).unwrap(), json!(-4));
        assert_eq!(host.eval(unary(UnaryOperator::Square)).unwrap(), json!(16));
        assert_eq!(host.eval(unary(UnaryOperator::VoidCheck)).unwrap(), json!(false));
        assert_eq!(host.eval(unary(UnaryOperator::TypeOf)).unwrap(), json!("integer"));
    }

    #[test]
    fn test_increment_updates_variable() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::let_value("n", Expr::integer(1)),
                Expr::unary(UnaryOperator::Increment, Expr::ident("n")),
                Expr::ident("n"),
            ])
            .unwrap();
        assert_eq!(value, json!(2));
    }

    #[test]
    fn test_compound_assignment() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::let_value("total", Expr::integer(10)),
                bin(BinaryOperator::PlusAssign, Expr::ident("total"), Expr::integer(5)),
                bin(BinaryOperator::MultiplyAssign, Expr::ident("total"), Expr::integer(2)),
                Expr::ident("total"),
            ])
            .unwrap();
        assert_eq!(value, json!(30));
    }

    #[test]
    fn test_constants_are_inlined() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::constant("k", Expr::integer(3)),
                bin(BinaryOperator::Multiply, Expr::ident("k"), Expr::integer(2)),
            ])
            .unwrap();
        assert_eq!(value, json!(6));
    }

    #[test]
    fn test_contract_valued_let_can_be_reassigned() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::let_value("t", Expr::ident("integer")),
                Expr::assign(Expr::ident("t"), Expr::ident("real")),
                Expr::ident("t"),
            ])
            .unwrap();
        assert_eq!(value, json!("real"));
    }

    #[test]
    fn test_short_circuit_skips_later_operands() {
        let mut host = Host::new();
        let value = host
            .eval(bin(BinaryOperator::AndAlso, Expr::boolean(false), fault("unreachable")))
            .unwrap();
        assert_eq!(value, json!(false));

        let value = host
            .run(vec![
                Expr::let_value("x", Expr::integer(0)),
                bin(
                    BinaryOperator::OrElse,
                    Expr::integer(5),
                    Expr::assign(Expr::ident("x"), Expr::integer(1)),
                ),
            ])
            .unwrap();
        assert_eq!(value, json!(5));
        assert_eq!(host.eval(Expr::ident("x")).unwrap(), json!(0));
    }

    #[test]
    fn test_short_circuit_yields_deciding_operand() {
        let mut host = Host::new();
        let chain = bin(
            BinaryOperator::AndAlso,
            bin(BinaryOperator::AndAlso, Expr::integer(1), Expr::string("two")),
            Expr::integer(3),
        );
        assert_eq!(host.eval(chain).unwrap(), json!(3));

        let chain = bin(
            BinaryOperator::OrElse,
            bin(BinaryOperator::OrElse, Expr::void(), Expr::integer(0)),
            Expr::string(""),
        );
        assert_eq!(host.eval(chain).unwrap(), json!(""));
    }

    #[test]
    fn test_short_circuit_waits_for_pending_promise() {
        let mut host = Host::new();
        host.define("ready", "pending(true)");
        with_note(&mut host);

        let value = host
            .eval(bin(
                BinaryOperator::AndAlso,
                Expr::ident("ready"),
                Expr::call(Expr::ident("note"), vec![Expr::string("right")]),
            ))
            .unwrap();

        // The chain forks on the pending operand; the right operand only
        // runs once the promise settles.
        assert_eq!(value["$class"], "Promise");
        assert_eq!(value["value"], "right");
        assert_eq!(host.events(), ["fork", "settle", "right"]);
    }

    #[test]
    fn test_short_circuit_stops_after_pending_falsy_operand() {
        let mut host = Host::new();
        host.define("ready", "pending(0)");
        with_note(&mut host);

        let value = host
            .eval(bin(
                BinaryOperator::AndAlso,
                Expr::ident("ready"),
                Expr::call(Expr::ident("note"), vec![Expr::string("right")]),
            ))
            .unwrap();
        assert_eq!(value["value"], 0);
        assert_eq!(host.events(), ["fork", "settle"]);
    }

    #[test]
    fn test_short_circuit_faults_on_failed_promise() {
        let mut host = Host::new();
        host.define("broken", "failed('boom')");
        let err = host
            .eval(bin(BinaryOperator::OrElse, Expr::ident("broken"), Expr::integer(1)))
            .unwrap_err();
        assert!(err.contains("boom"), "{}", err);
    }

    #[test]
    fn test_repeat_aggregates_break_values() {
        let mut host = Host::new();
        let body = || Expr::break_with(None, ints(&[10, 20, 30]));

        let sum = host
            .eval(Expr::repeat(
                None,
                body(),
                Some(Aggregator::Operator(BinaryOperator::Plus)),
            ))
            .unwrap();
        assert_eq!(sum, json!(60));

        let raw = host.eval(Expr::repeat(None, body(), None)).unwrap();
        assert_eq!(raw, json!([10, 20, 30]));
    }

    #[test]
    fn test_repeat_with_counter() {
        let mut host = Host::new();
        let i = || Expr::ident("i");
        let body = Expr::block(vec![
            Expr::assign(i(), bin(BinaryOperator::Plus, i(), Expr::integer(1))),
            Expr::conditional(
                bin(BinaryOperator::LessThan, i(), Expr::integer(3)),
                Expr::continue_with(None, vec![i()]),
                Some(Expr::break_with(
                    None,
                    vec![bin(BinaryOperator::Multiply, i(), Expr::integer(10))],
                )),
            ),
        ]);
        let value = host
            .run(vec![
                Expr::let_value("i", Expr::integer(0)),
                Expr::repeat(None, body, None),
            ])
            .unwrap();
        assert_eq!(value, json!([1, 2, 30]));
    }

    #[test]
    fn test_named_break_leaves_outer_loop() {
        let mut host = Host::new();
        let inner = Expr::repeat(
            None,
            Expr::break_with(Some(Expr::ident("outer")), ints(&[7])),
            None,
        );
        let value = host.eval(Expr::repeat(Some("outer"), inner, None)).unwrap();
        assert_eq!(value, json!([7]));
    }

    #[test]
    fn test_for_each_with_custom_aggregator() {
        let mut host = Host::new();
        host.define("items", "[1, 2, 3]");

        let doubled = Expr::continue_with(
            None,
            vec![bin(BinaryOperator::Multiply, Expr::ident("item"), Expr::integer(2))],
        );
        let max = Expr::function(
            &["a", "b"],
            Expr::conditional(
                bin(BinaryOperator::GreaterThan, Expr::ident("a"), Expr::ident("b")),
                Expr::ident("a"),
                Some(Expr::ident("b")),
            ),
        );

        let sum = host
            .eval(Expr::for_each(
                "item",
                Expr::ident("items"),
                doubled.clone(),
                Some(Aggregator::Operator(BinaryOperator::Plus)),
            ))
            .unwrap();
        assert_eq!(sum, json!(12));

        let largest = host
            .eval(Expr::for_each(
                "item",
                Expr::ident("items"),
                doubled,
                Some(Aggregator::Custom(Box::new(max))),
            ))
            .unwrap();
        assert_eq!(largest, json!(6));
    }

    #[test]
    fn test_conditional_values() {
        let mut host = Host::new();
        let value = host
            .eval(Expr::conditional(
                Expr::boolean(true),
                Expr::integer(1),
                Some(Expr::integer(2)),
            ))
            .unwrap();
        assert_eq!(value, json!(1));

        let value = host
            .eval(Expr::conditional(Expr::integer(0), Expr::integer(1), None))
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_conditional_reads_property_condition() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::property("flag", Some(Expr::boolean(false)), None),
                Expr::conditional(
                    Expr::ident("flag"),
                    Expr::string("on"),
                    Some(Expr::string("off")),
                ),
            ])
            .unwrap();
        assert_eq!(value, json!("off"));
    }

    #[test]
    fn test_property_accessors() {
        let mut host = Host::new();
        let store = || Expr::ident("store");
        let value = host
            .run(vec![
                Expr::let_value("store", Expr::integer(0)),
                Expr::property(
                    "p",
                    Some(bin(BinaryOperator::Multiply, store(), Expr::integer(2))),
                    Some(Expr::assign(store(), Expr::ident("value"))),
                ),
                Expr::assign(Expr::ident("p"), Expr::integer(5)),
                bin(BinaryOperator::Plus, Expr::ident("p"), Expr::integer(1)),
            ])
            .unwrap();
        assert_eq!(value, json!(11));
        assert_eq!(host.eval(store()).unwrap(), json!(5));
    }

    #[test]
    fn test_functions_and_recursion() {
        let mut host = Host::new();
        let n = || Expr::ident("n");
        let factorial = Expr::function(
            &["n"],
            Expr::conditional(
                bin(BinaryOperator::LessThanOrEqual, n(), Expr::integer(1)),
                Expr::integer(1),
                Some(bin(
                    BinaryOperator::Multiply,
                    n(),
                    Expr::call(
                        Expr::synthetic(ExprKind::Callee),
                        vec![bin(BinaryOperator::Minus, n(), Expr::integer(1))],
                    ),
                )),
            ),
        );
        let value = host
            .run(vec![
                Expr::let_value("factorial", factorial),
                Expr::call(Expr::ident("factorial"), ints(&[5])),
            ])
            .unwrap();
        assert_eq!(value, json!(120));
    }

    #[test]
    fn test_function_calls_itself_by_name() {
        let mut host = Host::new();
        let n = || Expr::ident("n");
        let fact = Expr::function(
            &["n"],
            Expr::conditional(
                bin(BinaryOperator::LessThanOrEqual, n(), Expr::integer(1)),
                Expr::integer(1),
                Some(bin(
                    BinaryOperator::Multiply,
                    n(),
                    Expr::call(
                        Expr::ident("fact"),
                        vec![bin(BinaryOperator::Minus, n(), Expr::integer(1))],
                    ),
                )),
            ),
        );
        let value = host
            .run(vec![
                Expr::let_value("fact", fact),
                Expr::call(Expr::ident("fact"), ints(&[5])),
            ])
            .unwrap();
        assert_eq!(value, json!(120));
    }

    #[test]
    fn test_result_slot_overrides_body_value() {
        let mut host = Host::new();
        let body = Expr::block(vec![
            Expr::assign(Expr::ident("result"), Expr::string("early")),
            Expr::string("late"),
        ]);
        let value = host.eval(Expr::call(Expr::function(&[], body), vec![])).unwrap();
        assert_eq!(value, json!("early"));
    }

    #[test]
    fn test_closures_capture_block_locals() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::let_value(
                    "make",
                    Expr::function(
                        &["start"],
                        Expr::block(vec![
                            Expr::let_value("count", Expr::ident("start")),
                            Expr::function(
                                &[],
                                bin(
                                    BinaryOperator::PlusAssign,
                                    Expr::ident("count"),
                                    Expr::integer(1),
                                ),
                            ),
                        ]),
                    ),
                ),
                Expr::let_value("next", Expr::call(Expr::ident("make"), ints(&[10]))),
                Expr::call(Expr::ident("next"), vec![]),
                Expr::call(Expr::ident("next"), vec![]),
            ])
            .unwrap();
        assert_eq!(value, json!(12));
    }

    #[test]
    fn test_try_catch_finally() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::let_value("cleaned", Expr::boolean(false)),
                Expr::try_catch(
                    fault("boom"),
                    Some(CatchClause::new(Some("e"), Expr::ident("e"))),
                    Some(Expr::assign(Expr::ident("cleaned"), Expr::boolean(true))),
                ),
            ])
            .unwrap();
        assert_eq!(value, json!("boom"));
        assert_eq!(host.eval(Expr::ident("cleaned")).unwrap(), json!(true));
    }

    #[test]
    fn test_uncaught_fault_propagates() {
        let mut host = Host::new();
        let err = host
            .eval(Expr::try_catch(fault("boom"), None, Some(Expr::integer(1))))
            .unwrap_err();
        assert!(err.contains("boom"), "{}", err);
    }

    #[test]
    fn test_selection() {
        let mut host = Host::new();
        let select = |target: i64| {
            Expr::synthetic(ExprKind::Selection {
                target: Box::new(Expr::integer(target)),
                comparer: None,
                cases: vec![
                    SelectionCase {
                        values: ints(&[1, 2]),
                        handler: Expr::string("small"),
                    },
                    SelectionCase {
                        values: ints(&[3]),
                        handler: Expr::string("three"),
                    },
                ],
                default: Some(Box::new(Expr::string("other"))),
            })
        };
        assert_eq!(host.eval(select(2)).unwrap(), json!("small"));
        assert_eq!(host.eval(select(3)).unwrap(), json!("three"));
        assert_eq!(host.eval(select(9)).unwrap(), json!("other"));
    }

    #[test]
    fn test_containers_and_member_access() {
        let mut host = Host::new();
        let slot = |name: &str, value: i64| Slot {
            name: name.to_string(),
            contract: None,
            value: LetValue::Value(Box::new(Expr::integer(value))),
            pos: Position::UNKNOWN,
        };
        let value = host
            .run(vec![
                Expr::let_value(
                    "point",
                    Expr::synthetic(ExprKind::Container {
                        slots: vec![slot("x", 3), slot("y", 4)],
                    }),
                ),
                Expr::assign(Expr::member(Expr::ident("point"), "x"), Expr::integer(30)),
                bin(
                    BinaryOperator::Plus,
                    Expr::member(Expr::ident("point"), "x"),
                    Expr::member(Expr::ident("point"), "y"),
                ),
            ])
            .unwrap();
        assert_eq!(value, json!(34));
    }

    #[test]
    fn test_await_settles_promises() {
        let mut host = Host::new();
        host.define("answer", "pending(41)");
        let value = host
            .eval(Expr::synthetic(ExprKind::Await {
                bindings: vec![AwaitBinding {
                    name: "x".to_string(),
                    contract: None,
                    value: Expr::ident("answer"),
                    pos: Position::UNKNOWN,
                }],
                body: Box::new(bin(BinaryOperator::Plus, Expr::ident("x"), Expr::integer(1))),
                handler: None,
            }))
            .unwrap();
        assert_eq!(value, json!(42));
        assert_eq!(host.events(), ["await"]);
    }

    #[test]
    fn test_fork_creates_promise() {
        let mut host = Host::new();
        let value = host
            .eval(Expr::synthetic(ExprKind::Fork {
                body: Box::new(Expr::integer(5)),
                queue: None,
            }))
            .unwrap();
        assert_eq!(value["$class"], "Promise");
        assert_eq!(value["value"], 5);
        assert_eq!(host.events(), ["newPromise"]);
    }

    #[test]
    fn test_with_layer_reads_target_members() {
        let mut host = Host::new();
        host.define("config", "{ port: 8080 }");
        // Outer names are looked up on the layer first.
        let value = host
            .run(vec![
                Expr::let_value("port", Expr::integer(1)),
                Expr::synthetic(ExprKind::With {
                    target: Box::new(Expr::ident("config")),
                    body: Box::new(bin(BinaryOperator::Plus, Expr::ident("port"), Expr::integer(1))),
                }),
            ])
            .unwrap();
        assert_eq!(value, json!(8081));
        assert_eq!(host.eval(Expr::ident("port")).unwrap(), json!(1));
    }

    #[test]
    fn test_failed_statement_does_not_poison_later_ones() {
        let mut host = Host::new();
        host.run(vec![Expr::let_value("a", Expr::integer(1))]).unwrap();

        let failed = host.run(vec![Expr::block(vec![
            Expr::let_value("b", Expr::integer(2)),
            Expr::break_with(None, vec![]),
        ])]);
        assert!(failed.unwrap_err().starts_with("translation failed"));

        let value = host
            .run(vec![
                Expr::let_value("b", Expr::integer(3)),
                bin(BinaryOperator::Plus, Expr::ident("a"), Expr::ident("b")),
            ])
            .unwrap();
        assert_eq!(value, json!(4));
    }

    #[test]
    fn test_shadowing_in_nested_function_is_allowed() {
        let mut host = Host::new();
        let value = host
            .run(vec![
                Expr::let_value("x", Expr::integer(1)),
                Expr::call(
                    Expr::function(
                        &[],
                        Expr::block(vec![
                            Expr::let_value("x", Expr::integer(2)),
                            Expr::ident("x"),
                        ]),
                    ),
                    vec![],
                ),
            ])
            .unwrap();
        assert_eq!(value, json!(2));
        assert_eq!(host.eval(Expr::ident("x")).unwrap(), json!(1));
    }

    #[test]
    fn test_debug_mode_positions_reach_runtime() {
        let options = TranslatorOptions {
            debug: true,
            ..TranslatorOptions::default()
        };
        let mut host = Host::with_options(options);
        let err = host
            .eval(Expr::ident("nowhere").at(Position::new(7, 3)))
            .unwrap_err();
        assert!(err.contains("unresolved name 'nowhere'"), "{}", err);
    }

    #[test]
    fn test_run_immediately_program() {
        let options = TranslatorOptions {
            runtime_name: "rt".into(),
            emit_mode: EmitMode::RunImmediately,
            runtime_entry: "emberHost.runtime".into(),
            error_mode: ErrorMode::Tolerant,
            ..TranslatorOptions::default()
        };
        let mut host = Host::with_options(options);
        with_note(&mut host);

        let mut source: VecDeque<Expr> = vec![
            Expr::let_value("a", Expr::integer(20)),
            Expr::call(
                Expr::ident("note"),
                vec![bin(BinaryOperator::Plus, Expr::ident("a"), Expr::integer(22))],
            ),
        ]
        .into();
        let translation = host.translator.translate_program(&mut source);
        assert!(translation.is_ok());

        let script = emit(&translation.program, host.translator.options());
        assert!(script.starts_with("(function (rt) {"), "{}", script);
        host.run_script(&script).unwrap();
        assert_eq!(host.events(), ["42"]);
    }
}
