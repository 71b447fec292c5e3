use std::{error::Error, fs, io::BufRead, time::Duration};

use crate::{
    ast::Node,
    error::ParseErrors,
    interpreter::{
        evaluator::core::{DEFAULT_MAX_DEPTH, State},
        lexer::{LexMode, Lexer},
        parser::{Parser, parse_program},
        value::core::Value,
    },
};

/// How sources are processed, usually filled from the command line.
#[derive(Debug, Clone)]
pub struct Options {
    /// Print the formatted program instead of evaluating it.
    pub format:       bool,
    /// Print the program with every operator parenthesised before evaluating.
    pub show_parse:   bool,
    /// Use the single line layout for `format` and `show_parse`.
    pub compact:      bool,
    /// Maximum function call depth.
    pub max_depth:    usize,
    /// Stop each evaluation after this long.
    pub max_duration: Option<Duration>,
    /// Write `log(...)` output to the program output.
    pub no_log:       bool,
    /// Keep one state for every source instead of a fresh state for each.
    pub shared_state: bool,
    /// Print the value of each evaluated source when it is not `nil`.
    pub print_result: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { format:       false,
               show_parse:   false,
               compact:      false,
               max_depth:    DEFAULT_MAX_DEPTH,
               max_duration: None,
               no_log:       false,
               shared_state: false,
               print_result: false, }
    }
}

/// Creates a state configured by `options`.
#[must_use]
pub fn new_state(options: &Options) -> State {
    let mut state = State::new();
    state.set_max_depth(options.max_depth);
    state.set_no_log(options.no_log);
    state
}

/// Parses and runs one source.
///
/// # Parameters
/// - `state`: The state to evaluate in; definitions stay in it.
/// - `source`: The program text.
/// - `options`: What to print and the evaluation limits.
///
/// # Returns
/// The value of the program, or `nil` when it was only formatted.
///
/// # Errors
/// The parse errors, or the runtime error that stopped evaluation.
///
/// # Example
/// ```
/// use grol::{
///     interpreter::value::core::Value,
///     runner::{Options, new_state, run_source},
/// };
///
/// let options = Options::default();
/// let mut state = new_state(&options);
/// state.capture_output();
///
/// let v = run_source(&mut state, "println(\"hi\"); 6 * 7", &options).unwrap();
/// assert_eq!(v, Value::Integer(42));
/// assert_eq!(state.take_output(), "hi\n");
/// ```
pub fn run_source(state: &mut State, source: &str, options: &Options) -> Result<Value, Box<dyn Error>> {
    let program = parse_program(source)?;
    if options.show_parse {
        state.write_out(&(program.format_parenthesized() + "\n"))?;
    }
    if options.format {
        let mut text = program.format(options.compact);
        if options.compact {
            text.push('\n');
        }
        state.write_out(&text)?;
        state.flush_output()?;
        return Ok(Value::Null);
    }
    if let Some(duration) = options.max_duration {
        state.set_max_duration(duration);
    }
    let value = state.eval_program(program)?;
    if options.print_result && !matches!(value, Value::Null) {
        state.write_out(&(value.to_string() + "\n"))?;
    }
    state.flush_output()?;
    Ok(value)
}

/// Reads and runs a source file.
///
/// # Errors
/// Failure to read the file, or any error of [`run_source`].
pub fn run_file(state: &mut State, path: &str, options: &Options) -> Result<Value, Box<dyn Error>> {
    log::debug!("running {path}");
    let source = fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    run_source(state, &source, options)
}

/// Runs input line by line.
///
/// Lines are accumulated until they form complete statements, so a function
/// body can span several lines. Each complete chunk is evaluated and its
/// value printed when it is not `nil`. Errors are reported and do not stop
/// the loop.
///
/// # Returns
/// The number of chunks that failed.
///
/// # Errors
/// Failure to read `input`.
///
/// # Example
/// ```
/// use grol::runner::{Options, new_state, run_lines};
///
/// let options = Options::default();
/// let mut state = new_state(&options);
/// state.capture_output();
///
/// let input = "f = func(x) {\n  x * 2\n}\nf(21)\n1/0\n";
/// let failed = run_lines(&mut state, input.as_bytes(), &options).unwrap();
/// assert_eq!(failed, 1);
/// assert!(state.take_output().starts_with("func(x){x*2}\n42\n"));
/// ```
pub fn run_lines(state: &mut State, mut input: impl BufRead, options: &Options) -> Result<usize, Box<dyn Error>> {
    let mut pending = String::new();
    let mut failed = 0;
    loop {
        let read = input.read_line(&mut pending)?;
        if read == 0 && pending.trim().is_empty() {
            return Ok(failed);
        }
        let (program, errors, more) = {
            let mode = if read == 0 { LexMode::Complete } else { LexMode::Line };
            let mut parser = Parser::new(Lexer::with_mode(&pending, mode));
            let program = parser.parse_program();
            let more = parser.continuation_needed();
            (program, parser.into_errors(), more)
        };
        if more && read != 0 {
            continue;
        }
        let result = if errors.is_empty() {
            eval_chunk(state, program, options)
        } else {
            Err(ParseErrors(errors).into())
        };
        if !report(state, result) {
            failed += 1;
        }
        pending.clear();
    }
}

fn eval_chunk(state: &mut State, program: Node, options: &Options) -> Result<(), Box<dyn Error>> {
    if let Some(duration) = options.max_duration {
        state.set_max_duration(duration);
    }
    let value = state.eval_program(program)?;
    if !matches!(value, Value::Null) {
        state.write_out(&(value.to_string() + "\n"))?;
    }
    Ok(())
}

/// Writes the error of a chunk to the output. Returns whether the chunk
/// succeeded.
fn report(state: &mut State, result: Result<(), Box<dyn Error>>) -> bool {
    let Err(e) = result.and_then(|()| Ok(state.flush_output()?)) else {
        return true;
    };
    log::debug!("chunk failed: {e}");
    if let Err(write_error) = state.write_out(&format!("{e}\n")) {
        log::error!("{write_error}");
    }
    false
}
