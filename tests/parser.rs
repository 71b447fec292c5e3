use grol::{
    error::ParseError,
    interpreter::{
        lexer::{LexMode, Lexer},
        parser::{MAX_NESTING, Parser, parse_program},
    },
};

fn parenthesized(src: &str) -> String {
    match parse_program(src) {
        Ok(program) => program.format_parenthesized(),
        Err(e) => panic!("Parse failed: {src}\nError: {e}"),
    }
}

fn compact(src: &str) -> String {
    match parse_program(src) {
        Ok(program) => program.format(true),
        Err(e) => panic!("Parse failed: {src}\nError: {e}"),
    }
}

fn errors(src: &str) -> Vec<ParseError> {
    match parse_program(src) {
        Ok(program) => panic!("Parse succeeded but was expected to fail: {program}"),
        Err(e) => e.0,
    }
}

/// Parses `src` in line mode and reports whether more input is needed.
fn needs_more(src: &str) -> bool {
    let mut parser = Parser::new(Lexer::with_mode(src, LexMode::Line));
    parser.parse_program();
    parser.continuation_needed()
}

#[test]
fn operator_precedence() {
    assert_eq!(parenthesized("1+2*3"), "(1+(2*3))");
    assert_eq!(parenthesized("1*2+3"), "((1*2)+3)");
    assert_eq!(parenthesized("1-2-3"), "((1-2)-3)");
    assert_eq!(parenthesized("a=b=3"), "(a=(b=3))");
    assert_eq!(parenthesized("-a*b"), "((-a)*b)");
    assert_eq!(parenthesized("!a==b"), "((!a)==b)");
    assert_eq!(parenthesized("a<b==c>d"), "((a<b)==(c>d))");
    assert_eq!(parenthesized("a||b&&c"), "(a||(b&&c))");
    assert_eq!(parenthesized("x=1+2<4&&y"), "(x=(((1+2)<4)&&y))");
    assert_eq!(parenthesized("a+f(b*c)[0]"), "(a+f((b*c))[0])");
}

#[test]
fn grouping_is_kept_where_needed() {
    assert_eq!(compact("(1 + 2) * 3"), "(1+2)*3");
    assert_eq!(compact("1 + (2 * 3)"), "1+2*3");
    assert_eq!(compact("1 - (2 - 3)"), "1-(2-3)");
    assert_eq!(compact("a - -b"), "a-(-b)");
}

#[test]
fn calls_need_adjacent_parens() {
    assert_eq!(compact("f(1)"), "f(1)");
    assert_eq!(compact("(3)\n(4)"), "3;4");
    assert_eq!(compact("a [1]"), "a;[1]");
    assert_eq!(compact("a[1]"), "a[1]");
}

#[test]
fn field_access_is_indexing() {
    assert_eq!(compact("m.key"), r#"m["key"]"#);
    assert_eq!(compact("m.a.b = 1"), r#"m["a"]["b"]=1"#);
}

#[test]
fn statements_and_literals() {
    assert_eq!(compact("x := [1, 2.5, \"s\", true]"), r#"x:=[1,2.5,"s",true]"#);
    assert_eq!(compact(r#"{"a": 1, 2: [3]}"#), r#"{"a":1,2:[3]}"#);
    assert_eq!(compact("f = func(a, b, ..) { return a }"), "f=func(a,b,..){return a}");
    assert_eq!(compact("func named(x) { x }"), "func named(x){x}");
    assert_eq!(compact("m = macro(x) { quote(unquote(x)) }"), "m=macro(x){quote(unquote(x))}");
    assert_eq!(compact("if a { 1 } else if b { 2 } else { 3 }"), "if a{1}else if b{2}else{3}");
    assert_eq!(compact("for i < 3 { i++; continue }"), "for i<3{i++;continue}");
    assert_eq!(compact("x = 1 // one\ny = 2"), "x=1;y=2");
}

#[test]
fn long_format() {
    let program = parse_program("f=func(x){if x>1{return x}// big\nx*2}").unwrap();
    assert_eq!(program.format(false),
               "f = func(x) {\n\tif x > 1 {\n\t\treturn x\n\t} // big\n\tx * 2\n}\n");
}

#[test]
fn format_round_trips() {
    let sources = ["fact = func(n) { if n <= 1 { return 1 }; n * fact(n - 1) }; fact(5)",
                   "a = [1, [2, 3], {\"k\": -4.5}]; a[1][0] + len(a)",
                   "unless = macro(c, a, b) { quote(if !(unquote(c)) { unquote(a) } else { unquote(b) }) }",
                   "i = 0; for i < 10 { i++; if i % 2 == 0 { continue }; println(i) }",
                   "x = -(-3) - -2; y = !(1 < 2) || x >= 3 && true",
                   "s = \"tab\\there\\n\" + `raw`; m = {\"s\": s}.s",
                   "f = func(..) { g(..) }; g = func(a, ..) { [a, ..] }"];
    for src in sources {
        let first = parse_program(src).unwrap();
        for compact in [true, false] {
            let printed = first.format(compact);
            let second = parse_program(&printed).unwrap_or_else(|e| panic!("{printed}\n{e}"));
            assert_eq!(second.format(compact), printed, "round trip of {src}");
            assert_eq!(second.format_parenthesized(), first.format_parenthesized());
        }
    }
}

#[test]
fn errors_have_lines() {
    let errs = errors("x = ;");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].line(), 1);
    assert!(matches!(errs[0], ParseError::NoPrefixParse { .. }));
}

#[test]
fn recovers_after_errors() {
    let errs = errors("x = ;\ny = 2\nz = )\nw = 4");
    assert_eq!(errs.len(), 2);
    assert_eq!(errs[0].line(), 1);
    assert_eq!(errs[1].line(), 3);
}

#[test]
fn invalid_targets() {
    assert_eq!(errors("1 + 2 = 3"),
               vec![ParseError::InvalidAssignmentTarget { target: "1+2".to_string(),
                                                          line:   1, }]);
    assert!(matches!(errors("3++")[0], ParseError::InvalidIncrementTarget { .. }));
    assert!(matches!(errors("func(a, 1) {}")[0], ParseError::InvalidParameter { .. }));
    assert!(matches!(errors("macro(a, ..) {}")[0], ParseError::InvalidParameter { .. }));
}

#[test]
fn lexical_errors_surface() {
    assert!(matches!(errors("x = @")[0], ParseError::IllegalToken { .. }));
    assert!(matches!(errors("\"abc")[0], ParseError::UnterminatedString { .. }));
    assert!(matches!(errors("\"\\q\"")[0], ParseError::InvalidEscape { .. }));
    assert!(matches!(errors("f(")[0], ParseError::UnexpectedEndOfInput { .. }));
    assert_eq!(errors("x = ;").first().map(ToString::to_string),
               Some("Error on line 1: no prefix parse function for `;` found.".to_string()));
}

#[test]
fn line_mode_continuation() {
    assert!(needs_more("f = func(x) {"));
    assert!(needs_more("f = func(x) {\n  x *"));
    assert!(needs_more("x = 1 +"));
    assert!(needs_more("a = [1, 2,"));
    assert!(needs_more("s = \"open"));
    assert!(needs_more("if x {\n 1\n} else"));
    assert!(!needs_more("x = 1"));
    assert!(!needs_more("f = func(x) {\n  x * 2\n}"));
    assert!(!needs_more("x = )"));
}

#[test]
fn argument_lists_skip_comments_and_trailing_commas() {
    assert_eq!(compact("f(1, /* one */ 2, 3, /* end */)"), "f(1,2,3)");
    assert_eq!(compact("[1, 2,]"), "[1,2]");
    assert_eq!(compact("f()"), "f()");
}

/// Runs `f` on a thread with room for deeply nested input.
fn on_big_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new().stack_size(64 << 20)
                               .spawn(f)
                               .expect("failed to spawn parser thread")
                               .join()
                               .expect("parser panicked")
}

#[test]
fn deep_nesting_is_an_error() {
    let too_deep = on_big_stack(|| {
        vec![errors(&"[".repeat(2000)),
             errors(&format!("{}1{}", "(".repeat(2000), ")".repeat(2000))),
             errors(&format!("{}true", "!".repeat(500))),
             errors(&format!("x = 1\n{}", "f(".repeat(MAX_NESTING + 1)))]
    });
    for (i, found) in too_deep.iter().enumerate() {
        let line = if i == 3 { 2 } else { 1 };
        assert_eq!(found, &vec![ParseError::NestedTooDeeply { line }]);
    }
    assert_eq!(too_deep[0][0].to_string(), "Error on line 1: expressions nested too deeply.");

    let nested = MAX_NESTING - 2;
    let ok = on_big_stack(move || {
        parse_program(&format!("{}1{}", "(".repeat(nested), ")".repeat(nested))).is_ok()
        && parse_program(&format!("{}{}", "[".repeat(nested), "]".repeat(nested))).is_ok()
    });
    assert!(ok);
}
