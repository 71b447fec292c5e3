use std::thread;

use grol::interpreter::evaluator::core::State;

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

fn run(state: &mut State, src: &str) -> String {
    match state.eval_source(src) {
        Ok(v) => v.to_string(),
        Err(e) => panic!("Script failed: {src}\nError: {e}"),
    }
}

#[test]
fn fibonacci_is_linear() {
    let (value, entries, hits) = with_state(|state| {
        let v = run(state, "fib = func(x) { if x <= 1 { return x }; fib(x - 1) + fib(x - 2) }; fib(30)");
        (v, state.cache().len(), state.cache().hits())
    });
    assert_eq!(value, "832040");
    assert_eq!(entries, 31);
    assert_eq!(hits, 28);
}

#[test]
fn repeated_calls_hit_the_cache() {
    with_state(|state| {
        run(state, "f = func(x) { x * 2 }");
        assert_eq!(run(state, "f(3)"), "6");
        assert_eq!(run(state, "f(3)"), "6");
        assert_eq!(state.cache().hits(), 1);
        assert_eq!(state.cache().misses(), 1);

        state.reset_cache();
        assert!(state.cache().is_empty());
        assert_eq!(run(state, "f(3)"), "6");
        assert_eq!(state.cache().len(), 1);
    });
}

#[test]
fn output_prevents_caching() {
    let (out, entries) = with_state(|state| {
        run(state, "f = func(x) { println(x); x }; g = func(x) { f(x) + 1 }; g(1); g(1); f(2)");
        (state.take_output(), state.cache().len())
    });
    assert_eq!(out, "1\n1\n2\n");
    assert_eq!(entries, 0);
}

#[test]
fn uncacheable_extensions_prevent_caching() {
    let entries = with_state(|state| {
        run(state, "now = func() { time() }; now(); now()");
        state.cache().len()
    });
    assert_eq!(entries, 0);
}

#[test]
fn pure_extensions_allow_caching() {
    let entries = with_state(|state| {
        run(state, "hyp = func(a, b) { sqrt(a * a + b * b) }; hyp(3, 4)");
        state.cache().len()
    });
    assert_eq!(entries, 1);
}

#[test]
fn unhashable_arguments_bypass_the_cache() {
    with_state(|state| {
        assert_eq!(run(state, "f = func(a) { len(a) }; f([1, 2, 3, 4, 5, 6, 7, 8, 9])"), "9");
        assert_eq!(run(state, "f(nil)"), "0");
        assert_eq!(run(state, "g = func(a, b, c, d, e) { a + e }; g(1, 2, 3, 4, 5)"), "6");
        assert_eq!(state.cache().len(), 0);

        assert_eq!(run(state, "f([1, 2])"), "2");
        assert_eq!(state.cache().len(), 1);
    });
}

#[test]
fn closures_do_not_share_results() {
    let value = with_state(|state| {
        run(state, "adder = func(x) { func(y) { x + y } }; a1 = adder(1); a2 = adder(2); [a1(10), a2(10)]")
    });
    assert_eq!(value, "[11,12]");
}

#[test]
fn errors_are_not_cached() {
    with_state(|state| {
        run(state, "f = func(x) { 10 / x }");
        assert!(state.eval_source("f(0)").is_err());
        assert!(state.eval_source("f(0)").is_err());
        assert_eq!(state.cache().len(), 0);
        assert_eq!(run(state, "f(5)"), "2");
    });
}

#[test]
fn reading_outer_variables_prevents_caching() {
    let (value, entries) = with_state(|state| {
        let v = run(state, "i = 0; sq = func() { i * i }; r = []; for i < 4 { r = r + sq(); i++ }; r");
        (v, state.cache().len())
    });
    assert_eq!(value, "[0,1,4,9]");
    assert_eq!(entries, 0);
}

#[test]
fn constants_and_functions_keep_caching() {
    with_state(|state| {
        run(state, "K = 3; triple = func(x) { x * K }; six = func() { triple(2) }");
        assert_eq!(run(state, "six() + six()"), "12");
        assert_eq!(state.cache().len(), 2);
        assert_eq!(state.cache().hits(), 1);
    });
}
