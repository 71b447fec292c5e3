use std::rc::Rc;

use grol::interpreter::{
    lexer::{LexError, LexMode, Lexer},
    token::{Token, TokenKind, TokenRef},
};

/// Every token of `src` up to, not including, the end token.
fn tokens(src: &str, mode: LexMode) -> Vec<TokenRef> {
    let mut lexer = Lexer::with_mode(src, mode);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        if matches!(token.kind(), TokenKind::Eof | TokenKind::Eol) {
            return tokens;
        }
        tokens.push(token);
    }
}

fn kinds(src: &str) -> Vec<TokenKind> {
    tokens(src, LexMode::Complete).iter().map(|t| t.kind()).collect()
}

#[test]
fn operators_and_delimiters() {
    use TokenKind::*;
    assert_eq!(kinds("= + - ! * / % < > , ; ( ) { } [ ] : ."),
               vec![Assign, Plus, Minus, Bang, Asterisk, Slash, Percent, Lt, Gt, Comma,
                    Semicolon, LParen, RParen, LBrace, RBrace, LBracket, RBracket, Colon, Dot]);
    assert_eq!(kinds("<= >= == != ++ -- .. && || :="),
               vec![LtEq, GtEq, Eq, NotEq, Incr, Decr, DotDot, And, Or, Define]);
    assert_eq!(kinds("i+++j"), vec![Ident, Incr, Plus, Ident]);
}

#[test]
fn keywords_and_builtins() {
    use TokenKind::*;
    assert_eq!(kinds("func macro if else for return true false break continue"),
               vec![Func, Macro, If, Else, For, Return, True, False, Break, Continue]);
    assert_eq!(kinds("len first rest print println log puts error quote unquote"),
               vec![Len, First, Rest, Print, Println, Log, Puts, Error, Quote, Unquote]);
    assert_eq!(kinds("funcs iffy _x x1"), vec![Ident, Ident, Ident, Ident]);
}

#[test]
fn numbers() {
    let toks = tokens("42 0x1F 0b101 1_000 3.14 .5 1e9 2.5e-3", LexMode::Complete);
    let pairs: Vec<(TokenKind, &str)> = toks.iter().map(|t| (t.kind(), t.literal())).collect();
    assert_eq!(pairs,
               vec![(TokenKind::Int, "42"),
                    (TokenKind::Int, "0x1F"),
                    (TokenKind::Int, "0b101"),
                    (TokenKind::Int, "1_000"),
                    (TokenKind::Float, "3.14"),
                    (TokenKind::Float, ".5"),
                    (TokenKind::Float, "1e9"),
                    (TokenKind::Float, "2.5e-3")]);
}

#[test]
fn strings_resolve_escapes() {
    let toks = tokens(r#""a\tb\n" "q\"x" "\x41é" `raw\n`"#, LexMode::Complete);
    let literals: Vec<&str> = toks.iter().map(|t| t.literal()).collect();
    assert_eq!(literals, vec!["a\tb\n", "q\"x", "Aé", "raw\\n"]);
    assert!(toks.iter().all(|t| t.kind() == TokenKind::Str));
}

#[test]
fn bad_strings_are_illegal() {
    let mut lexer = Lexer::new(r#""bad \q escape" 1"#);
    assert_eq!(lexer.next_token().kind(), TokenKind::Illegal);
    assert_eq!(lexer.last_error(), Some(LexError::InvalidEscape));
    assert_eq!(lexer.next_token().kind(), TokenKind::Int);

    let mut lexer = Lexer::new("\"open");
    assert_eq!(lexer.next_token().kind(), TokenKind::Illegal);
    assert_eq!(lexer.last_error(), Some(LexError::UnterminatedString));
    assert_eq!(lexer.next_token().kind(), TokenKind::Eof);
}

#[test]
fn unterminated_string_in_line_mode_asks_for_more() {
    let mut lexer = Lexer::with_mode("x = \"open", LexMode::Line);
    assert_eq!(lexer.next_token().kind(), TokenKind::Ident);
    assert_eq!(lexer.next_token().kind(), TokenKind::Assign);
    assert_eq!(lexer.next_token().kind(), TokenKind::Eol);
    assert!(lexer.unterminated_string());
}

#[test]
fn comments() {
    let toks = tokens("x // trailing\n/* block\ncomment */ y", LexMode::Complete);
    let pairs: Vec<(TokenKind, &str)> = toks.iter().map(|t| (t.kind(), t.literal())).collect();
    assert_eq!(pairs,
               vec![(TokenKind::Ident, "x"),
                    (TokenKind::LineComment, "// trailing"),
                    (TokenKind::BlockComment, "/* block\ncomment */"),
                    (TokenKind::Ident, "y")]);
}

#[test]
fn whitespace_and_line_tracking() {
    let mut lexer = Lexer::new("a b\n  c(d)");
    lexer.next_token();
    assert!(!lexer.had_whitespace());

    lexer.next_token();
    assert!(lexer.had_whitespace());
    assert!(!lexer.had_newline());

    let c = lexer.next_token();
    assert_eq!(c.literal(), "c");
    assert!(lexer.had_newline());
    assert_eq!(lexer.line(), 2);

    assert_eq!(lexer.next_token().kind(), TokenKind::LParen);
    assert!(!lexer.had_whitespace());
}

#[test]
fn end_token_repeats() {
    let mut lexer = Lexer::new("1");
    lexer.next_token();
    assert_eq!(lexer.next_token().kind(), TokenKind::Eof);
    assert_eq!(lexer.next_token().kind(), TokenKind::Eof);

    let mut lexer = Lexer::with_mode("", LexMode::Line);
    assert_eq!(lexer.next_token().kind(), TokenKind::Eol);
    assert_eq!(lexer.next_token().kind(), TokenKind::Eol);
}

#[test]
fn tokens_are_interned() {
    let first = tokens("foo + 1", LexMode::Complete);
    let second = tokens("1 + foo", LexMode::Complete);
    assert!(Rc::ptr_eq(&first[0], &second[2]));
    assert!(Rc::ptr_eq(&first[1], &second[1]));
    assert!(Rc::ptr_eq(&first[1], &Token::of(TokenKind::Plus)));
    assert!(!Rc::ptr_eq(&first[0], &Token::intern(TokenKind::Str, "foo")));
}

#[test]
fn literal_tokens_are_not_kept() {
    let first = tokens(r#""abc" 42 // note"#, LexMode::Complete);
    let second = tokens(r#""abc" 42 // note"#, LexMode::Complete);
    for (a, b) in first.iter().zip(&second).take(3) {
        assert_eq!(a, b);
        assert!(!Rc::ptr_eq(a, b), "{a} was interned");
    }
    assert!(TokenKind::Str.is_literal());
    assert!(!TokenKind::Ident.is_literal());
}

#[test]
fn lexing_is_total() {
    let inputs = ["@#$", "\"", "`", "/*", "\\", "0x", "1..2", "é ü ∑", "\u{0}\u{7f}", "a\r\nb"];
    for input in inputs {
        for mode in [LexMode::Complete, LexMode::Line] {
            let mut lexer = Lexer::with_mode(input, mode);
            let mut steps = 0;
            while !matches!(lexer.next_token().kind(), TokenKind::Eof | TokenKind::Eol) {
                steps += 1;
                assert!(steps <= input.len(), "lexer did not stop on {input:?}");
            }
        }
    }
}
