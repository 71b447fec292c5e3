use std::{io, process, thread, time::Duration};

use clap::Parser;
use grol::runner::{Options, new_state, run_file, run_lines, run_source};

/// Stack of the evaluation thread, large enough for deep recursion.
const EVAL_STACK_SIZE: usize = 1 << 30;

/// grol is a small dynamic language with closures, macros and automatic
/// memoization.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script files to run; `-` reads standard input line by line.
    files: Vec<String>,

    /// Evaluates this program and prints its value.
    #[arg(short, long, value_name = "PROGRAM")]
    eval: Option<String>,

    /// Prints the sources formatted instead of running them.
    #[arg(long)]
    format: bool,

    /// Prints each program fully parenthesised before running it.
    #[arg(long)]
    parse: bool,

    /// Uses the single line layout for --format and --parse.
    #[arg(short, long)]
    compact: bool,

    /// Keeps definitions from one file for the next.
    #[arg(long)]
    shared_state: bool,

    /// Maximum function call depth.
    #[arg(long, default_value_t = 10_000)]
    max_depth: usize,

    /// Stops each evaluation after this many seconds.
    #[arg(long, value_name = "SECS")]
    max_duration: Option<f64>,

    /// Writes log() output to standard output instead of the logger.
    #[arg(long)]
    no_log: bool,

    /// More logging; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn options(&self) -> Options {
        Options { format:       self.format,
                  show_parse:   self.parse,
                  compact:      self.compact,
                  max_depth:    self.max_depth,
                  max_duration: self.max_duration
                                    .filter(|secs| secs.is_finite() && *secs > 0.0)
                                    .map(Duration::from_secs_f64),
                  no_log:       self.no_log,
                  shared_state: self.shared_state,
                  print_result: false, }
    }

    const fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Runs every requested source, returning whether all succeeded.
fn run(args: &Args) -> bool {
    let options = args.options();
    let mut state = new_state(&options);
    let mut ok = true;

    if let Some(program) = &args.eval {
        let options = Options { print_result: true,
                                ..options.clone() };
        if let Err(e) = run_source(&mut state, program, &options) {
            eprintln!("{e}");
            ok = false;
        }
    }

    for path in &args.files {
        if !options.shared_state {
            state = new_state(&options);
        }
        let result = if path == "-" {
            run_lines(&mut state, io::BufReader::new(io::stdin()), &options).map(|failed| failed == 0)
        } else {
            run_file(&mut state, path, &options).map(|_| true)
        };
        match result {
            Ok(all_ok) => ok &= all_ok,
            Err(e) => {
                eprintln!("{path}: {e}");
                ok = false;
            },
        }
    }
    ok
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level())).init();

    if args.eval.is_none() && args.files.is_empty() {
        eprintln!("Nothing to run: pass files, `-` for standard input, or -e PROGRAM.");
        process::exit(1);
    }

    let worker = thread::Builder::new().name("grol-eval".to_string())
                                       .stack_size(EVAL_STACK_SIZE)
                                       .spawn(move || run(&args));
    let ok = match worker.map(thread::JoinHandle::join) {
        Ok(Ok(ok)) => ok,
        Ok(Err(_)) => {
            log::error!("evaluation thread panicked");
            false
        },
        Err(e) => {
            log::error!("cannot start evaluation thread: {e}");
            false
        },
    };
    if !ok {
        process::exit(1);
    }
}
