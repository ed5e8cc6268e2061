use tern::ast::{Expr, Stmt, Suffix};
use tern::lexer::TokenKind;
use tern::{Config, Error, Expected, Grouping, ParseError, ParseLimits, parse_source};

fn parse(source: &str) -> Result<tern::Ast, Error> {
    parse_source(source, &Config::default())
}

fn dump(source: &str) -> String {
    parse(source).unwrap().to_string()
}

#[test]
fn test_end_to_end_while_loop() {
    let expected = "\
Stmts
  Stmt
    While
      Term
        Id 'a'
      Block
        Stmts
          Stmt
            Assign '='
              Id 'b'
              Binary '+'
                Term
                  Id 'b'
                Num '1'
";
    assert_eq!(dump("while a { b = b + 1 }"), expected);
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "\
counter = 0
add = fn(n step: 1) { return n + step }
for i = 0 to 10 step 2 {
    if i == 4 continue else counter = add(counter)
}
items: [1, 'two', { three = 3 }]
for k in items.keys() log.print(k, items[k])
";
    let first = parse(source).unwrap();
    let second = parse(source).unwrap();
    assert_eq!(first.root, second.root);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_list_children_keep_source_order() {
    let ast = parse("f(a, b, c)").unwrap();
    let Stmt::Expr(Expr::Term(term)) = &ast.root.0[0] else {
        panic!("expected a term statement");
    };
    let [Suffix::Call(args)] = term.suffixes.as_slice() else {
        panic!("expected a single call suffix");
    };
    let names: Vec<&str> = args
        .0
        .iter()
        .map(|arg| match arg {
            Expr::Term(t) => ast.name(t.head),
            _ => panic!("expected identifiers"),
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_assignment_disambiguation() {
    let ast = parse("x = 1\nx()\nx.y").unwrap();
    assert!(matches!(ast.root.0[0], Stmt::Assign { .. }));
    assert!(matches!(&ast.root.0[1], Stmt::Expr(Expr::Term(t)) if t.suffixes.len() == 1));
    assert!(matches!(
        &ast.root.0[2],
        Stmt::Expr(Expr::Term(t)) if matches!(t.suffixes[..], [Suffix::Member(_)])
    ));
}

#[test]
fn test_for_forms() {
    let ast = parse(
        "for i in a x\nfor i of a x\nfor i = 0 to 10 step 2 x\nfor i = 0 to 10 x",
    )
    .unwrap();
    let stmts = &ast.root.0;
    assert!(matches!(stmts[0], Stmt::ForIn { .. }));
    assert!(matches!(stmts[1], Stmt::ForOf { .. }));
    assert!(matches!(stmts[2], Stmt::ForTo { step: Some(_), .. }));
    assert!(matches!(stmts[3], Stmt::ForTo { step: None, .. }));
}

#[test]
fn test_right_associative_chain() {
    let expected = "\
Stmts
  Stmt
    Binary '+'
      Num '1'
      Binary '+'
        Num '2'
        Num '3'
";
    assert_eq!(dump("1 + 2 + 3"), expected);
}

#[test]
fn test_precedence_option() {
    let mut config = Config::default();
    config.options.grouping = Grouping::Precedence;

    let ast = parse_source("1 + 2 + 3", &config).unwrap();
    let Stmt::Expr(Expr::Binary { lhs, rhs, .. }) = &ast.root.0[0] else {
        panic!("expected binary expression");
    };
    assert!(matches!(**lhs, Expr::Binary { .. }));
    assert!(matches!(**rhs, Expr::Num(_)));
}

#[test]
fn test_fail_fast_on_missing_paren() {
    let err = parse("(1 + 2").unwrap_err();
    let Error::Parse(ParseError::Syntax(err)) = err else {
        panic!("expected a syntax error, got {:?}", err);
    };
    assert_eq!(err.expected, Expected::Token(TokenKind::RParen));
    assert_eq!(err.found, TokenKind::Eof);
    assert_eq!((err.line, err.column), (1, 7));
}

#[test]
fn test_error_position_on_later_line() {
    let err = parse("x = 1\ny = [1 2]").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error at 2:8: expected ',', found number '2'"
    );
}

#[test]
fn test_lex_errors_surface() {
    let err = parse("x = \"unterminated").unwrap_err();
    assert!(matches!(err, Error::Lex(_)));
}

#[test]
fn test_config_limits_apply() {
    let config = Config::from_toml_str("[limits]\nmax_nesting_depth = 8\n").unwrap();
    let err = parse_source("x = [[[[[[1]]]]]]", &config).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::NestingTooDeep { max: 8, .. })
    ));
}

fn max_depth_config() -> Config {
    Config::from_toml_str(&format!(
        "[limits]\nmax_nesting_depth = {}\n",
        ParseLimits::MAX_NESTING_DEPTH
    ))
    .unwrap()
}

fn nested_array(levels: usize) -> String {
    format!("x = {}1{}", "[".repeat(levels), "]".repeat(levels))
}

#[test]
fn test_deepest_allowed_limit_errors_instead_of_overflowing() {
    let config = max_depth_config();
    let err = parse_source(&nested_array(4_000), &config).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::NestingTooDeep { max, .. }) if max == ParseLimits::MAX_NESTING_DEPTH
    ));
}

#[test]
fn test_deep_nesting_within_raised_limit_parses() {
    let config = max_depth_config();
    let ast = parse_source(&nested_array(600), &config).unwrap();
    assert!(matches!(&ast.root.0[0], Stmt::Assign { value: Expr::Array(_), .. }));
}

#[test]
fn test_long_operator_chain_counts_against_depth() {
    let source = vec!["a"; 300].join(" + ");

    let err = parse(&source).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::NestingTooDeep { .. })));
    assert!(err.to_string().contains("chained operators"));

    // Precedence grouping loops over equal operators instead of recursing
    let mut config = Config::default();
    config.options.grouping = Grouping::Precedence;
    assert!(parse_source(&source, &config).is_ok());
}
