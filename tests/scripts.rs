use std::{fs, thread};

use grol::runner::{Options, new_state, run_source};
use walkdir::WalkDir;

const TEST_STACK_SIZE: usize = 64 << 20;

/// Runs one script in a fresh state; scripts report failures with `error()`.
fn run_script(source: String) -> Result<String, String> {
    thread::Builder::new().stack_size(TEST_STACK_SIZE)
                          .spawn(move || {
                              let options = Options { max_depth: 10_000,
                                                      ..Options::default() };
                              let mut state = new_state(&options);
                              state.capture_output();
                              run_source(&mut state, &source, &options).map(|_| state.take_output())
                                                                       .map_err(|e| e.to_string())
                          })
                          .expect("failed to spawn evaluation thread")
                          .join()
                          .expect("script panicked")
}

#[test]
fn scripts_run_without_errors() {
    let mut count = 0;

    for entry in WalkDir::new("tests/scripts").into_iter()
                                              .filter_map(Result::ok)
                                              .filter(|e| e.path().extension().is_some_and(|ext| ext == "gr"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;
        if let Err(e) = run_script(source) {
            panic!("Script {path:?} failed:\n{e}");
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn scripts_print_expected_output() {
    let source = fs::read_to_string("tests/scripts/output.gr").expect("missing output.gr");
    let expected = fs::read_to_string("tests/scripts/output.expected").expect("missing output.expected");
    assert_eq!(run_script(source), Ok(expected));
}
