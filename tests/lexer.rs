use kbm_rs::{
    Context, Diagnostic, Error, Function, LexError, LexErrorKind, Lexer, Modifiers, Qualifier,
    Severity, Span, TokenKind, tokenize,
};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(&Context::new(), input)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Ident(s.to_string())
}

#[test]
fn full_binding() {
    assert_eq!(
        kinds("@!o -> exec \"firefox\" \"https://example.com\""),
        vec![
            TokenKind::Mod(Modifiers::META),
            TokenKind::Mod(Modifiers::SHIFT),
            ident("o"),
            TokenKind::Arrow,
            TokenKind::Func(Function::Exec),
            TokenKind::StrLit("firefox".to_string()),
            TokenKind::StrLit("https://example.com".to_string()),
        ]
    );
}

#[test]
fn all_sigils() {
    assert_eq!(
        kinds("^!~@"),
        vec![
            TokenKind::Mod(Modifiers::CTRL),
            TokenKind::Mod(Modifiers::SHIFT),
            TokenKind::Mod(Modifiers::SUPER),
            TokenKind::Mod(Modifiers::META),
        ]
    );
}

#[test]
fn key_punctuation() {
    assert_eq!(
        kinds("` = [ ] \\ ; ' , . /"),
        r"`=[]\;',./".chars().map(TokenKind::Punct).collect::<Vec<_>>()
    );
}

#[test]
fn numbers_are_unsigned() {
    assert_eq!(
        kinds("jump -50 999999"),
        vec![
            TokenKind::Func(Function::Jump),
            TokenKind::Punct('-'),
            TokenKind::Num(50),
            TokenKind::Num(999_999),
        ]
    );
}

#[test]
fn largest_integer() {
    assert_eq!(kinds("9223372036854775807"), vec![TokenKind::Num(i64::MAX)]);
    let err = tokenize(&Context::new(), "9223372036854775808").unwrap_err();
    assert!(matches!(
        err,
        Error::Lex(LexError {
            kind: LexErrorKind::IntegerOverflow,
            span: Span {
                line: 1,
                column: 1,
                len: 19,
            },
        })
    ));
}

#[test]
fn identifiers_with_digits_and_underscores() {
    assert_eq!(kinds("f12 num_0 _x"), vec![ident("f12"), ident("num_0"), ident("_x")]);
}

#[test]
fn reserved_words_are_case_sensitive() {
    assert_eq!(
        kinds("norepeat NoRepeat"),
        vec![TokenKind::Qual(Qualifier::NoRepeat), ident("NoRepeat")]
    );
}

#[test]
fn comment_directly_after_token() {
    assert_eq!(kinds("q# comment"), vec![ident("q")]);
}

#[test]
fn hash_inside_string_is_not_a_comment() {
    assert_eq!(kinds("\"a # b\""), vec![TokenKind::StrLit("a # b".to_string())]);
}

#[test]
fn crlf_line_endings() {
    let tokens = tokenize(&Context::new(), "q -> quit\r\nw -> click\r\n").expect("tokenize");
    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[3].span, Span::new(2, 1, 1));
}

#[test]
fn unterminated_before_crlf() {
    let err = tokenize(&Context::new(), "\"abc\r\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Lex(LexError {
            kind: LexErrorKind::UnterminatedString,
            span: Span {
                line: 1,
                column: 5,
                ..
            },
        })
    ));
}

#[test]
fn continuation_over_crlf() {
    assert_eq!(
        kinds("\"ab\\\r\ncd\""),
        vec![TokenKind::StrLit("abcd".to_string())]
    );
}

#[test]
fn multiline_literal_span_runs_to_end_of_first_line() {
    let tokens = tokenize(&Context::new(), "x \"ab\\\ncd\"").expect("tokenize");
    assert_eq!(tokens[1].span, Span::new(1, 3, 4));
}

#[test]
fn next_line_skips_blank_lines() {
    let ctx = Context::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut lexer = Lexer::new(&ctx, "t", "\n  \nfirst\n\t\nsecond\n".as_bytes(), &mut sink);
    assert_eq!(lexer.line_number(), 0);
    assert!(lexer.next_line().expect("read"));
    assert_eq!(lexer.line_number(), 3);
    assert!(lexer.next_line().expect("read"));
    assert_eq!(lexer.line_number(), 5);
    assert!(!lexer.next_line().expect("read"));
    assert_eq!(lexer.line_number(), 5);
}

#[test]
fn scan_until_end() {
    let ctx = Context::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut lexer = Lexer::new(&ctx, "t", "a\nb".as_bytes(), &mut sink);
    assert_eq!(lexer.scan().expect("scan").map(|t| t.kind), Some(ident("a")));
    assert_eq!(lexer.scan().expect("scan").map(|t| t.kind), Some(ident("b")));
    assert_eq!(lexer.scan().expect("scan"), None);
    assert_eq!(lexer.scan().expect("scan"), None);
}

#[test]
fn truncation_warns_once() {
    let ctx = Context::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let input = format!("\"{}\" q", "z".repeat(3000));
    let mut lexer = Lexer::new(&ctx, "t", input.as_bytes(), &mut sink);
    let literal = lexer.scan().expect("scan").expect("token");
    let TokenKind::StrLit(value) = literal.kind else {
        panic!("expected string literal");
    };
    assert_eq!(value.len(), 1023);
    let next = lexer.scan().expect("scan").expect("token");
    assert_eq!(next.kind, ident("q"));
    drop(lexer);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].severity, Severity::Warning);
}

#[test]
fn truncation_never_splits_characters() {
    // 1022 ASCII bytes leave one byte free: a two-byte char must not fit.
    let input = format!("\"{}é\"", "a".repeat(1022));
    let tokens = tokenize(&Context::new(), &input).expect("tokenize");
    let TokenKind::StrLit(value) = &tokens[0].kind else {
        panic!("expected string literal");
    };
    assert_eq!(value.len(), 1022);
}

#[test]
fn lex_errors_are_reported_to_sink() {
    let ctx = Context::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut lexer = Lexer::new(&ctx, "t", "q -> \"open".as_bytes(), &mut sink);
    let mut result = Ok(None);
    for _ in 0..4 {
        result = lexer.scan();
        if result.is_err() {
            break;
        }
    }
    assert!(result.is_err());
    drop(lexer);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].severity, Severity::Error);
    assert_eq!(sink[0].message, "unterminated string literal");
}
