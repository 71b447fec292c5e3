use std::thread;

use grol::interpreter::evaluator::core::State;

/// Deep recursion in the tree walker needs more than the default test stack.
const TEST_STACK_SIZE: usize = 64 << 20;

/// Runs `f` on a fresh state with captured output, on a thread with a large
/// stack.
fn with_state<T, F>(f: F) -> T
    where T: Send + 'static,
          F: FnOnce(&mut State) -> T + Send + 'static
{
    thread::Builder::new().stack_size(TEST_STACK_SIZE)
                          .spawn(move || {
                              let mut state = State::new();
                              state.capture_output();
                              f(&mut state)
                          })
                          .expect("failed to spawn evaluation thread")
                          .join()
                          .expect("evaluation panicked")
}

/// Evaluates `src` in a fresh state and returns the printed value or error.
fn eval(src: &str) -> Result<String, String> {
    let src = src.to_string();
    with_state(move |state| {
        state.eval_source(&src)
             .map(|v| v.to_string())
             .map_err(|e| e.to_string())
    })
}

/// Evaluates `src` and returns everything it printed.
fn output(src: &str) -> String {
    let mut state = State::new();
    state.capture_output();
    if let Err(e) = state.eval_source(src) {
        panic!("Script failed: {e}");
    }
    state.take_output()
}

fn assert_value(src: &str, expected: &str) {
    match eval(src) {
        Ok(v) => assert_eq!(v, expected, "value of {src}"),
        Err(e) => panic!("Script failed: {src}\nError: {e}"),
    }
}

fn assert_error(src: &str, expected: &str) {
    match eval(src) {
        Ok(v) => panic!("Script succeeded with {v} but was expected to fail: {src}"),
        Err(e) => assert_eq!(e, expected, "error of {src}"),
    }
}

fn assert_success(src: &str) {
    if let Err(e) = eval(src) {
        panic!("Script failed: {src}\nError: {e}");
    }
}

fn assert_failure(src: &str) {
    if let Ok(v) = eval(src) {
        panic!("Script succeeded with {v} but was expected to fail: {src}")
    }
}

#[test]
fn end_to_end_scenarios() {
    assert_value("5 + 5 + 5 + 5 - 10", "10");
    assert_value("fact = func(n){ if n<=1 {1} else {n*fact(n-1)} }; fact(5)", "120");
    assert_value("newAdder = func(x){ func(y){ x+y } }; addTwo=newAdder(2); addTwo(2)", "4");
    assert_value(r#"unless = macro(c,a,b){ quote(if !(unquote(c)) { unquote(a) } else { unquote(b) }) }; unless(10>5, "no", "yes")"#,
                 r#""yes""#);
    assert_value(r#"m = {"one":1, "two":2}; m["two"] + m["one"]"#, "3");
    assert_value("f = func(n){ if n<2 {return 1}; n*f(n-1) }; f(50.0)",
                 "3.0414093201713376e64");
}

#[test]
fn integer_arithmetic() {
    assert_value("7 / 2", "3");
    assert_value("-21 % 5", "-1");
    assert_value("2 * (3 + 4) - 1", "13");
    assert_value("-(-5)", "5");
    assert_value("9223372036854775807 + 1", "-9223372036854775808");
    assert_value("0x1F + 0b101 + 1_000", "1036");
    assert_error("1 / 0", "<err: division by zero>");
    assert_error("1 % 0", "<err: division by zero>");
}

#[test]
fn float_arithmetic() {
    assert_value("7.0 / 2", "3.5");
    assert_value("1 + .5", "1.5");
    assert_value("2.0 * 3", "6.0");
    assert_value("1.0 / 0", "Inf");
    assert_value("3 == 3.0", "true");
    assert_value("1 < 2.5", "true");
}

#[test]
fn increments() {
    assert_value("i=1; i++ + ++i", "4");
    assert_value("i=5; i--; i", "4");
    assert_value("i=5; --i", "4");
    assert_value("i=5; j = i++; j", "5");
}

#[test]
fn strings() {
    assert_value(r#""ab" + "cd""#, r#""abcd""#);
    assert_value(r#"len("héllo")"#, "5");
    assert_value(r#""héllo"[1]"#, r#""é""#);
    assert_value("`a\\tb`", r#""a\\tb""#);
    assert_value(r#"first("abc") + rest("abc")"#, r#""abc""#);
    assert_failure(r#""a" - "b""#);
    assert_error(r#""a" * 2"#, "<err: unknown operator: STRING * INTEGER>");
}

#[test]
fn booleans_and_logic() {
    assert_value("!true", "false");
    assert_value("1 < 2 && 2 < 3", "true");
    assert_value("1 > 2 || 2 > 3", "false");
    assert_value("false && undefined_name", "false");
    assert_value("true || undefined_name", "true");
    assert_failure("!1");
    assert_failure("1 && true");
}

#[test]
fn conditions_must_be_booleans() {
    assert_value("if 1 < 2 { 10 } else { 20 }", "10");
    assert_value("if 1 > 2 { 10 }", "nil");
    assert_value("x = 5; if x < 3 { 1 } else if x < 6 { 2 } else { 3 }", "2");
    assert_error("if 1 { 10 }", "<err: condition is not a boolean: 1>");
}

#[test]
fn arrays() {
    assert_value("[1, 2, 3][1]", "2");
    assert_value("[1,2,3][-1]", "nil");
    assert_value("[1,2,3][3]", "nil");
    assert_value("[1, 2] + [3]", "[1,2,3]");
    assert_value("[1, 2] + 3", "[1,2,3]");
    assert_value("len([1, 2, 3])", "3");
    assert_value("first([])", "nil");
    assert_value("rest([1])", "[]");
    assert_value("a = [1, 2, 3]; a[1] = 20; a", "[1,20,3]");
    assert_value("a = [1, 2]; b = a; b[0] = 9; a", "[1,2]");
    assert_value("a = [[1, 2], [3]]; a[0][1] = 5; a", "[[1,5],[3]]");
}

#[test]
fn maps() {
    assert_value(r#"{"k":1}["missing"]"#, "nil");
    assert_value(r#"m = {"b": 1, "a": 2}; m.a"#, "2");
    assert_value(r#"m = {"b": 1, "a": 2}; m["c"] = 3; m"#, r#"{"b":1,"a":2,"c":3}"#);
    assert_value(r#"{"a": 1, "b": 2} + {"b": 3, "c": 4}"#, r#"{"a":1,"b":3,"c":4}"#);
    assert_value(r#"first({"x": 1, "y": 2})"#, r#"{"key":"x","value":1}"#);
    assert_value(r#"len({1: "a", true: "b"})"#, "2");
    assert_value(r#"{[1, 2]: "pair"}[[1, 2]]"#, r#""pair""#);
    assert_failure(r#"{nil: 1}"#);
}

#[test]
fn functions_and_closures() {
    assert_value("add = func(a, b) { a + b }; add(2, 3)", "5");
    assert_value("counter = func() { c = 0; func() { c = c + 1; c } }; f = counter(); f(); f()", "1");
    assert_value("func twice(x) { x * 2 }; twice(21)", "42");
    assert_value("f = func(x) { return x + 1; 99 }; f(1)", "2");
    assert_value("fact = func(n) { if n <= 1 { return 1 }; n * self(n - 1) }; fact(10)",
                 "3628800");
    assert_value("x = 1; f = func() { x = 2; x }; f() + x", "3");
}

#[test]
fn variadic_functions() {
    assert_value("f = func(a, ..) { [a, ..] }; f(1, 2, 3)", "[1,[2,3]]");
    assert_value("f = func(..) { len(..) }; f()", "0");
    assert_value("sum = func(..) { s = 0; i = 0; for i < len(..) { s = s + ..[i]; i++ }; s }; sum(1, 2, 3, 4)",
                 "10");
    assert_value("add = func(a, b) { a + b }; pass = func(..) { add(..) }; pass(2, 5)",
                 "7");
}

#[test]
fn arity_errors() {
    assert_error("myfunc = func(a, b) { a + b }; myfunc(1)",
                 "<err: wrong number of arguments for myfunc. got=1, want=2>");
    assert_error("f = func(a, ..) { a }; f()",
                 "<err: wrong number of arguments for f. got=0, want at least=1>");
    assert_error("len(1, 2)", "<err: wrong number of arguments for len. got=2, want=1>");
}

#[test]
fn constants() {
    assert_success("ONE=1;ONE=1");
    assert_error("ONE=1;ONE=2", "<err: attempt to change constant ONE from 1 to 2>");
    assert_error("func FOO(x){x}; func FOO(x){x+1}",
                 "<err: attempt to change constant FOO from func FOO(x){x} to func FOO(x){x+1}>");
    assert_value("PI > 3.14 && PI < 3.15", "true");
    assert_value("X = 1; f = func(X) { X * 10 }; [f(2), X]", "[20,1]");
    assert_value("N = 3; f = func(..) { N + len(..) }; f(1, 2)", "5");
}

#[test]
fn errors_carry_the_call_stack() {
    assert_error("f = func(x) { 1 / x }; g = func(x) { f(x) }; g(0)",
                 "<err: division by zero, stack below:>\nf\ng");
    assert_error("f = func(x) { 1 / x }; f(0)", "<err: division by zero in f>");
    assert_error("y = x + 1", "<err: identifier not found: x>");
    assert_error(r#"error("bad", 42)"#, "<err: bad 42>");
    assert_error("5()", "<err: not a function: INTEGER>");
}

#[test]
fn loops() {
    assert_value("i = 0; s = 0; for i < 5 { i++; s = s + i }; s", "15");
    assert_value("i = 0; s = 0; for i < 5 { i++; if i % 2 == 0 { continue }; s = s + i }; s",
                 "9");
    assert_value("i = 0; for true { i++; if i == 7 { break } }; i", "7");
    assert_error("break", "<err: break outside of a loop>");
    assert_error("f = func() { continue }; i = 0; for i < 3 { i++; f() }",
                 "<err: continue outside of a loop in f>");
}

#[test]
fn assignment_scopes() {
    assert_value("x = 1; if true { x = 2 }; x", "2");
    assert_value("x = 1; f = func() { x = 5 }; f(); x", "1");
    assert_error("1 + 2 = 3", "Error on line 1: cannot assign to `1+2`.");
}

#[test]
fn max_depth_is_an_error() {
    let err = with_state(|state| {
                  state.set_max_depth(50);
                  state.eval_source("f = func(n) { f(n + 1) }; f(0)")
                       .unwrap_err()
                       .to_string()
              });
    assert!(err.starts_with("<err: max depth 50 exceeded, stack below:>\nf\n"), "{err}");
}

#[test]
fn cancellation_stops_loops() {
    let mut state = State::new();
    state.cancel_handle()
         .store(true, std::sync::atomic::Ordering::Relaxed);
    let err = state.eval_source("for true { 1 }").unwrap_err();
    assert_eq!(err.to_string(), "<err: evaluation cancelled>");

    assert_eq!(state.eval_source("i = 0; for i < 3 { i++ }; i").unwrap().to_string(), "3");
}

#[test]
fn deadline_stops_loops() {
    let mut state = State::new();
    state.set_max_duration(std::time::Duration::from_millis(20));
    let err = state.eval_source("for true { 1 }").unwrap_err();
    assert_eq!(err.to_string(), "<err: evaluation deadline exceeded>");

    assert_eq!(state.eval_source("i = 0; for i < 3 { i++ }; i").unwrap().to_string(), "3");
}

#[test]
fn printing() {
    assert_eq!(output(r#"print("a", 1); println(" b")"#), "a 1  b\n");
    assert_eq!(output(r#"puts("x", [1, "y"])"#), "x\n[1,\"y\"]\n");
    assert_eq!(output("println()"), "\n");

    let mut state = State::new();
    state.capture_output();
    state.set_no_log(true);
    state.eval_source(r#"log("logged", 3)"#).unwrap();
    assert_eq!(state.take_output(), "logged 3\n");
}

#[test]
fn extensions() {
    assert_value("sqrt(16)", "4.0");
    assert_value("pow(2, 10)", "1024.0");
    assert_value("round(2.6)", "3");
    assert_value("abs(-3)", "3");
    assert_error(r#"sqrt("x")"#,
                 "<err: wrong type of argument 1 for sqrt: got=STRING, want FLOAT>");
}

#[test]
fn state_persists_between_sources() {
    let mut state = State::new();
    state.eval_source("x = 40; inc = func(v) { v + 1 }").unwrap();
    let v = state.eval_source("inc(x) + 1").unwrap();
    assert_eq!(v.to_string(), "42");
    assert!(state.get("inc").is_some());
}

#[test]
fn globals_are_counted_apart_from_the_seeded_names() {
    let mut state = State::new();
    assert!(state.has_no_globals());
    state.eval_source(r#"s = "héllo"; a = [1, 2, 3]"#).unwrap();
    assert_eq!(state.globals_len(), 2);
    assert_eq!(state.eval_source("len(s) + len(a)").unwrap().to_string(), "8");
    assert_eq!(state.globals_len(), 2);
    assert!(!state.has_no_globals());
}

#[test]
fn saved_globals_evaluate_back() {
    let mut state = State::new();
    state.eval_source(r#"a = 1.5; b = [1, "two", {"k": true}]"#).unwrap();
    let mut saved = Vec::new();
    state.save_globals(&mut saved).unwrap();
    let saved = String::from_utf8(saved).unwrap();

    let mut restored = State::new();
    restored.eval_source(&saved).unwrap();
    assert_eq!(restored.get("a"), state.get("a"));
    assert_eq!(restored.get("b"), state.get("b"));
}
