use grol::interpreter::evaluator::core::State;

fn eval(state: &mut State, src: &str) -> Result<String, String> {
    state.eval_source(src)
         .map(|v| v.to_string())
         .map_err(|e| e.to_string())
}

fn assert_value(src: &str, expected: &str) {
    let mut state = State::new();
    match eval(&mut state, src) {
        Ok(v) => assert_eq!(v, expected, "value of {src}"),
        Err(e) => panic!("Script failed: {src}\nError: {e}"),
    }
}

fn assert_error(src: &str, expected: &str) {
    let mut state = State::new();
    match eval(&mut state, src) {
        Ok(v) => panic!("Script succeeded with {v} but was expected to fail: {src}"),
        Err(e) => assert_eq!(e, expected, "error of {src}"),
    }
}

#[test]
fn quote_keeps_code() {
    assert_value("quote(1 + 2)", "quote(1+2)");
    assert_value("quote(foo(bar) * 3)", "quote(foo(bar)*3)");
    assert_value("quote(unquote(4))", "quote(4)");
    assert_value("quote(unquote(1 + 2) + 3)", "quote(3+3)");
    assert_value("quote(unquote(true) == false)", "quote(true==false)");
    assert_value(r#"quote(unquote("s") + unquote(1.5))"#, r#"quote("s"+1.5)"#);
    assert_value("quote(unquote(nil))", "quote(nil)");
    assert_value("quote(unquote([1, -2]))", "quote([1,-2])");
    assert_value(r#"quote(unquote({"a": [true]}))"#, r#"quote({"a":[true]})"#);
}

#[test]
fn unquote_splices_quotes() {
    assert_value("q = quote(a + b); quote(unquote(q) * 2)", "quote((a+b)*2)");
    assert_value("q = quote(4 + 4); quote(unquote(q))", "quote(4+4)");
    assert_value("quote(unquote(quote(x)))", "quote(x)");
}

#[test]
fn unquote_errors() {
    assert_error("unquote(1)", "<err: unquote outside of quote>");
    assert_error("f = func() { 1 }; quote(unquote(f))",
                 "<err: cannot convert FUNC back into code>");
    assert_error("quote(unquote(1, 2))",
                 "<err: wrong number of arguments for unquote. got=2, want=1>");
    assert_error("quote(1, 2)", "<err: wrong number of arguments for quote. got=2, want=1>");
}

#[test]
fn unless() {
    let unless = r#"unless = macro(c, a, b) { quote(if !(unquote(c)) { unquote(a) } else { unquote(b) }) };"#;
    assert_value(&format!(r#"{unless} unless(10 > 5, "no", "yes")"#), r#""yes""#);
    assert_value(&format!(r#"{unless} unless(10 < 5, "no", "yes")"#), r#""no""#);
}

#[test]
fn macro_arguments_are_not_evaluated() {
    assert_value("second = macro(a, b) { quote(unquote(b)) }; second(not_defined_anywhere, 3)",
                 "3");
    assert_value("code = macro(e) { e }; code(1 + 2)", "3");
}

#[test]
fn nested_macro_calls_expand_inside_out() {
    assert_value("double = macro(x) { quote(unquote(x) * 2) }; double(double(1))", "4");
    assert_value("double = macro(x) { quote(unquote(x) * 2) }; f = func(n) { double(n) + 1 }; f(5)",
                 "11");
}

#[test]
fn macro_bodies_must_return_quotes() {
    assert_error("m = macro() { 1 }; m()", "<err: macro must return a quote, got INTEGER>");
    assert_error("m = macro(a) { quote(unquote(a)) }; m(1, 2)",
                 "<err: wrong number of arguments for macro. got=2, want=1>");
}

#[test]
fn macros_are_not_values() {
    let mut state = State::new();
    assert_eq!(eval(&mut state, "m = macro() { quote(7) }; m()"), Ok("7".to_string()));
    assert!(state.get("m").is_none());
    // Definitions stay available to later programs.
    assert_eq!(eval(&mut state, "m() * 6"), Ok("42".to_string()));
}

#[test]
fn macros_expand_before_the_program_runs() {
    let src = "addn = macro(x) { quote(unquote(x) + unquote(N)) }; addn(5)";
    assert_error(&format!("N = 10; {src}"), "<err: identifier not found: N>");

    let mut state = State::new();
    eval(&mut state, "N = 10").unwrap();
    assert_eq!(eval(&mut state, src), Ok("15".to_string()));
}
