use std::{
    cell::RefCell,
    io::{self, Cursor, Write},
    rc::Rc,
    sync::Arc,
    time::Instant,
};

use grol::{
    error::{RegistryError, RuntimeError},
    interpreter::{
        evaluator::core::{Output, State},
        extension::registry::{ArgType, Extension, Registry},
        parser::parse_program,
        value::core::Value,
    },
};

fn scale(_: &mut State, extension: &Extension, args: &[Value]) -> Result<Value, RuntimeError> {
    let factor = extension.client_data
                          .as_ref()
                          .and_then(|data| data.downcast_ref::<i64>())
                          .copied()
                          .unwrap_or(1);
    match args {
        [Value::Integer(i)] => Ok(Value::Integer(i * factor)),
        _ => Ok(Value::Null),
    }
}

fn count(_: &mut State, _: &Extension, args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::from(args.len() as i64))
}

fn custom_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(Extension::new("scale", 1, Some(1), vec![ArgType::Integer], scale)
                          .with_client_data(Arc::new(2_i64)))
            .unwrap();
    registry.register(Extension::new("count", 0, None, Vec::new(), count))
            .unwrap();
    registry
}

#[test]
fn registration_is_checked() {
    let mut registry = custom_registry();
    assert_eq!(registry.len(), 2);

    let again = registry.register(Extension::new("scale", 1, Some(1), vec![ArgType::Any], scale));
    assert_eq!(again, Err(RegistryError::AlreadyDefined { name: "scale".to_string() }));

    let keyword = registry.register(Extension::new("if", 0, Some(0), Vec::new(), count));
    assert!(matches!(keyword, Err(RegistryError::InvalidName { .. })));
    let digit = registry.register(Extension::new("9lives", 0, Some(0), Vec::new(), count));
    assert!(matches!(digit, Err(RegistryError::InvalidName { .. })));

    let bounds = registry.register(Extension::new("bad", 2, Some(1), vec![ArgType::Any; 2], count));
    assert!(matches!(bounds, Err(RegistryError::InvalidArity { .. })));
    let types = registry.register(Extension::new("bad", 2, None, vec![ArgType::Any], count));
    assert!(matches!(types, Err(RegistryError::InvalidArity { .. })));

    assert_eq!(registry.len(), 2);
}

#[test]
fn custom_registry_replaces_defaults() {
    let mut state = State::with_registry(Arc::new(custom_registry()));
    assert_eq!(state.eval_source("scale(21)").unwrap(), Value::Integer(42));
    assert_eq!(state.eval_source("scale").unwrap().to_string(), "scale(INTEGER)");
    assert_eq!(state.eval_source("count").unwrap().to_string(), "count(..)");
    assert_eq!(state.eval_source("sqrt(4)").unwrap_err().to_string(),
               "<err: identifier not found: sqrt>");
    assert_eq!(state.eval_source("scale(1.5)").unwrap_err().to_string(),
               "<err: wrong type of argument 1 for scale: got=FLOAT, want INTEGER>");
    assert_eq!(state.eval_source("scale()").unwrap_err().to_string(),
               "<err: wrong number of arguments for scale. got=0, want=1>");
}

#[test]
fn variadic_extensions_receive_spread_arguments() {
    let mut state = State::with_registry(Arc::new(custom_registry()));
    let v = state.eval_source("f = func(a, ..) { count(..) }; [count(), count(1, 2), f(1, 2, 3)]")
                 .unwrap();
    assert_eq!(v.to_string(), "[0,2,2]");
}

#[test]
fn global_registry_is_shared() {
    let a = Registry::global();
    let b = Registry::global();
    assert!(Arc::ptr_eq(&a, &b));
    for name in ["sin", "cos", "sqrt", "pow", "ln", "exp", "round", "trunc", "read", "eof", "flush", "time"] {
        assert!(a.get(name).is_some(), "missing extension {name}");
    }
    assert!(a.get("read").is_some_and(|e| e.no_cache));
    assert!(a.get("sqrt").is_some_and(|e| !e.no_cache));
}

#[test]
fn math_extensions() {
    let mut state = State::new();
    assert_eq!(state.eval_source("floor(2.7) + ceil(0.2)").unwrap(), Value::Float(3.0));
    assert_eq!(state.eval_source("trunc(-2.7)").unwrap(), Value::Float(-2.0));
    assert_eq!(state.eval_source("round(-2.5)").unwrap(), Value::Integer(-3));
    assert_eq!(state.eval_source("exp(0)").unwrap(), Value::Float(1.0));
    assert_eq!(state.eval_source("ln(1)").unwrap(), Value::Float(0.0));
    assert_eq!(state.eval_source("abs(-2.5)").unwrap(), Value::Float(2.5));
    assert!(state.eval_source("round(NaN)").is_err());
}

#[test]
fn read_and_eof() {
    let mut state = State::new();
    state.set_input(Box::new(Cursor::new("one\ntwo")));
    let v = state.eval_source("a = read(); b = read(); c = eof(); d = read(); [a, b, c, d, eof(), eof()]")
                 .unwrap();
    assert_eq!(v.to_string(), r#"["one\n","two",true,"",true,false]"#);
}

#[test]
fn time_is_positive() {
    let mut state = State::new();
    assert_eq!(state.eval_source("time() > 0").unwrap(), Value::Boolean(true));
}

/// Writer whose contents stay readable after it is handed to a state.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn output_goes_to_any_writer() {
    let buffer = SharedBuffer::default();
    let mut state = State::new();
    state.set_output(Output::Writer(Box::new(buffer.clone())));
    state.eval_source(r#"println("to the writer"); flush()"#).unwrap();
    assert_eq!(String::from_utf8(buffer.0.borrow().clone()).unwrap(), "to the writer\n");
    assert_eq!(state.take_output(), "");
}

#[test]
fn errors_as_values() {
    let mut state = State::new();
    let v = state.eval_to_value(parse_program("f = func() { 1 / 0 }; f()").unwrap());
    assert!(matches!(v, Value::Error(_)));
    assert_eq!(v.to_string(), "<err: division by zero in f>");
}

#[test]
fn deadline_in_the_past_stops_at_once() {
    let mut state = State::new();
    state.set_deadline(Some(Instant::now()));
    assert_eq!(state.eval_source("for true { 1 }").unwrap_err().to_string(),
               "<err: evaluation deadline exceeded>");

    assert_eq!(state.eval_source("1 + 1").unwrap(), Value::Integer(2));
}
