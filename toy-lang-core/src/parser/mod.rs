pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::{Identifier, Program};
use crate::lexer::{Token, TokenKind};
pub use error::{Expected, ParseError};
use statements::parse_declaration;

/// Recursive-descent parser over a token sequence. Fails fast on the first
/// error; there is no recovery.
pub struct Parser {
    iter: std::iter::Peekable<std::vec::IntoIter<Token>>,
    // Returned by `peek` once the stream is exhausted, so callers always see
    // an `Eof` even if the sequence was built without one.
    eof: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let line = tokens.last().map_or(1, |token| token.line);
        Self {
            iter: tokens.into_iter().peekable(),
            eof: Token::eof(line),
        }
    }

    pub(crate) fn peek(&mut self) -> &Token {
        self.iter.peek().unwrap_or(&self.eof)
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes the next token; `Eof` is never consumed.
    pub(crate) fn advance(&mut self) -> Token {
        match self.iter.next_if(|token| token.kind != TokenKind::Eof) {
            Some(token) => token,
            None => self.peek().clone(),
        }
    }

    pub(crate) fn next_if_kind(&mut self, kind: TokenKind) -> Option<Token> {
        self.iter.next_if(|token| token.kind == kind)
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.next_if_kind(kind) {
            Some(token) => Ok(token),
            None => Err(ParseError::unexpected_token(kind, self.peek().clone())),
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Identifier, ParseError> {
        match self.next_if_kind(TokenKind::Ident) {
            Some(token) => Ok(Identifier { name: token.lexeme }),
            None => Err(ParseError::unexpected_other(
                Expected::Identifier,
                self.peek().clone(),
            )),
        }
    }

    /// Parses `element (, element)*` up to and including `terminator`.
    /// An immediate terminator yields an empty list; trailing commas are
    /// rejected.
    pub(crate) fn parse_comma_separated<T>(
        &mut self,
        parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
        terminator: TokenKind,
    ) -> Result<Vec<T>, ParseError> {
        let mut elements = Vec::new();
        if self.next_if_kind(terminator).is_some() {
            return Ok(elements);
        }

        loop {
            elements.push(parse_element(self)?);
            if self.next_if_kind(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect_token(terminator)?;
        Ok(elements)
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::Eof) {
            statements.push(parse_declaration(self)?);
        }

        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::{Expected, ParseError, Parser};
    use crate::ast::{Expression, Literal, Program, Statement};
    use crate::lexer::{tokenize, Token, TokenKind};

    fn parse(input: &str) -> Result<Program, ParseError> {
        let tokens = tokenize(input).unwrap();
        Parser::new(tokens).parse_program()
    }

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let program = parse(input).unwrap();

            assert_eq!(program.to_string(), expected)
        }
    }

    fn test_errors(tests: Vec<(&str, ParseError)>) {
        for (input, expected) in tests {
            assert_eq!(parse(input), Err(expected), "input: {input}")
        }
    }

    #[test]
    fn test_expression_precedence() {
        let tests = vec![
            ("3 + 2 * 4;", "(3.0 + (2.0 * 4.0));\n"),
            ("3 > 2 == 4;", "((3.0 > 2.0) == 4.0);\n"),
            ("-a * b;", "((-a) * b);\n"),
            ("!-a;", "(!(-a));\n"),
            ("a + b + c;", "((a + b) + c);\n"),
            ("a + b - c;", "((a + b) - c);\n"),
            ("a * b / c;", "((a * b) / c);\n"),
            ("a + b / c;", "(a + (b / c));\n"),
            (
                "a + b * c + d / e - f;",
                "(((a + (b * c)) + (d / e)) - f);\n",
            ),
            ("3 + 4; -5 * 5;", "(3.0 + 4.0);\n((-5.0) * 5.0);\n"),
            ("5 > 4 == 3 < 4;", "((5.0 > 4.0) == (3.0 < 4.0));\n"),
            ("5 <= 4 != 3 >= 4;", "((5.0 <= 4.0) != (3.0 >= 4.0));\n"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5;",
                "((3.0 + (4.0 * 5.0)) == ((3.0 * 1.0) + (4.0 * 5.0)));\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_grouping() {
        let tests = vec![
            ("1 + (2 + 3) + 4;", "((1.0 + (2.0 + 3.0)) + 4.0);\n"),
            ("(5 + 5) * 2;", "((5.0 + 5.0) * 2.0);\n"),
            ("2 / (5 + 5);", "(2.0 / (5.0 + 5.0));\n"),
            ("-(5 + 5);", "(-(5.0 + 5.0));\n"),
            ("!(true == true);", "(!(true == true));\n"),
            ("null == false;", "(null == false);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_assignment() {
        let tests = vec![
            ("a = 1 + 2;", "(a = (1.0 + 2.0));\n"),
            ("a = b = 3;", "(a = (b = 3.0));\n"),
            ("a = b == c;", "(a = (b == c));\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_expression() {
        let tests = vec![
            ("a + add(b * c) + d;", "((a + add((b * c))) + d);\n"),
            (
                "add(a, b, 1, 2 * 3, add(6, 7 * 8));",
                "add(a, b, 1.0, (2.0 * 3.0), add(6.0, (7.0 * 8.0)));\n",
            ),
            ("f()(1);", "f()(1.0);\n"),
            ("-f(1);", "(-f(1.0));\n"),
            ("(f)();", "f();\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_statements() {
        let tests = vec![
            ("var a = 1;", "var a = 1.0;\n"),
            ("var a;", "var a;\n"),
            ("print 3;", "print 3.0;\n"),
            ("{ var a = 1; { a; } }", "{ var a = 1.0; { a; } }\n"),
            ("{}", "{ }\n"),
            ("return;", "return;\n"),
            ("return a + 1;", "return (a + 1.0);\n"),
            (
                "if (1 == 2) { print 3; } else { print 4; }",
                "if (1.0 == 2.0) { print 3.0; } else { print 4.0; }\n",
            ),
            ("if (a) print a;", "if a print a;\n"),
            (
                "while (i < 5) { print i; i = i + 1; }",
                "while (i < 5.0) { print i; (i = (i + 1.0)); }\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_function_declaration() {
        let tests = vec![
            (
                "fn add(a, b) { return a + b; }",
                "fn add(a, b) { return (a + b); }\n",
            ),
            ("fn f() {}", "fn f() { }\n"),
            (
                "fn outer() { fn inner() { return 1; } var x = inner(); }",
                "fn outer() { fn inner() { return 1.0; } var x = inner(); }\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let program = parse("if (a) if (b) print 1; else print 2;").unwrap();

        let [Statement::If {
            consequence,
            alternative: None,
            ..
        }] = program.statements.as_slice()
        else {
            panic!("expected a single if without else, got {program:?}");
        };
        assert!(matches!(
            consequence.as_ref(),
            Statement::If {
                alternative: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_for_desugaring() {
        let tests = vec![
            (
                "for (var i = 0; i < 5; i = i + 1) print i;",
                "{ var i = 0.0; while (i < 5.0) { print i; (i = (i + 1.0)); } }\n",
            ),
            ("for (;;) print 1;", "while true print 1.0;\n"),
            ("for (i = 0; ; ) {}", "{ (i = 0.0); while true { } }\n"),
            (
                "for (; i < 2; ) { print i; }",
                "while (i < 2.0) { print i; }\n",
            ),
            (
                "for (; ; i = i + 1) print i;",
                "while true { print i; (i = (i + 1.0)); }\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_match_expression() {
        let tests = vec![
            (
                "match 1 { case 1 => 2, case 3 => 4 };",
                "match 1.0 { case 1.0 => 2.0, case 3.0 => 4.0 };\n",
            ),
            ("match x {};", "match x { };\n"),
            ("match x { case 1 => 2, };", "match x { case 1.0 => 2.0 };\n"),
            (
                "match x { case 1 => 2 case 3 => 4 };",
                "match x { case 1.0 => 2.0, case 3.0 => 4.0 };\n",
            ),
            (
                "match (1 + 1) { case 2 => 2 * 2, case 3 => 0 };",
                "match (1.0 + 1.0) { case 2.0 => (2.0 * 2.0), case 3.0 => 0.0 };\n",
            ),
            (
                "var y = match x { case a => b };",
                "var y = match x { case a => b };\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_match_cases_keep_structure() {
        let program = parse("match 1 { case 1 => 2, case 3 => 4 };").unwrap();

        let [Statement::Expression(Expression::Match { cases, .. })] =
            program.statements.as_slice()
        else {
            panic!("expected a match expression statement, got {program:?}");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].pattern, Expression::Literal(Literal::Number(1.0)));
        assert_eq!(cases[0].body, Expression::Literal(Literal::Number(2.0)));
    }

    #[test]
    fn test_syntax_errors() {
        let tests = vec![
            (
                "1 + ;",
                ParseError::unexpected_other(
                    Expected::Expression,
                    Token::new(TokenKind::SemiColon, ";", 1),
                ),
            ),
            (
                "var 1 = 2;",
                ParseError::unexpected_other(
                    Expected::Identifier,
                    Token::new(TokenKind::Number, "1", 1),
                ),
            ),
            (
                "print 1",
                ParseError::unexpected_token(TokenKind::SemiColon, Token::eof(1)),
            ),
            (
                "1 = 2;",
                ParseError::InvalidAssignmentTarget(Token::new(TokenKind::Assign, "=", 1)),
            ),
            (
                "a + b = 3;",
                ParseError::InvalidAssignmentTarget(Token::new(TokenKind::Assign, "=", 1)),
            ),
            (
                "if 1 print 2;",
                ParseError::unexpected_token(
                    TokenKind::LParen,
                    Token::new(TokenKind::Number, "1", 1),
                ),
            ),
            (
                "{ print 1;\n",
                ParseError::unexpected_token(TokenKind::RBrace, Token::eof(2)),
            ),
            (
                "fn f(a, ) {}",
                ParseError::unexpected_other(
                    Expected::Identifier,
                    Token::new(TokenKind::RParen, ")", 1),
                ),
            ),
            (
                "fn f(a b) {}",
                ParseError::unexpected_token(
                    TokenKind::RParen,
                    Token::new(TokenKind::Ident, "b", 1),
                ),
            ),
            (
                "fn f() { return 1;",
                ParseError::unexpected_token(TokenKind::RBrace, Token::eof(1)),
            ),
            (
                "match 1 { 1 => 2 };",
                ParseError::unexpected_token(
                    TokenKind::Case,
                    Token::new(TokenKind::Number, "1", 1),
                ),
            ),
            (
                "match 1 { case 1 2 };",
                ParseError::unexpected_token(
                    TokenKind::FatArrow,
                    Token::new(TokenKind::Number, "2", 1),
                ),
            ),
            (
                "a and b;",
                ParseError::unexpected_token(
                    TokenKind::SemiColon,
                    Token::new(TokenKind::And, "and", 1),
                ),
            ),
            (
                "for (var i = 0; i < 1) print i;",
                ParseError::unexpected_token(
                    TokenKind::SemiColon,
                    Token::new(TokenKind::RParen, ")", 1),
                ),
            ),
        ];

        test_errors(tests)
    }

    #[test]
    fn test_error_reports_line() {
        let error = parse("var a = 1;\n\nprint a\n").unwrap_err();

        assert_eq!(error.line(), 4);
        assert_eq!(
            error.to_string(),
            "Expected ';', got end of input at line 4"
        );

        let error = parse("var a = 1;\nvar = 2;").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expected identifier, got '=' at line 2"
        );
    }

    #[test]
    fn test_tokens_without_eof() {
        let tokens = vec![
            Token::new(TokenKind::Print, "print", 1),
            Token::new(TokenKind::Number, "1", 1),
            Token::new(TokenKind::SemiColon, ";", 1),
        ];

        let program = Parser::new(tokens).parse_program().unwrap();
        assert_eq!(program.to_string(), "print 1.0;\n");
    }

    #[test]
    fn test_number_literals_render_as_decimals() {
        let tests = vec![
            ("7;", "7.0;\n"),
            ("2.50;", "2.5;\n"),
            ("10000000000000000;", "10000000000000000.0;\n"),
            ("0.0000001;", "0.0000001;\n"),
        ];

        test_parsing(tests)
    }

    proptest! {
        #[test]
        fn test_number_literal_round_trip(text in "[0-9]{1,9}(\\.[0-9]{1,9})?") {
            let program = parse(&format!("{text};")).unwrap();
            let expected: f64 = text.parse().unwrap();
            prop_assert_eq!(
                program.statements,
                vec![Statement::Expression(Expression::Literal(Literal::Number(expected)))]
            );
        }

        #[test]
        fn test_parse_is_idempotent(a in 0u32..100, b in 0u32..100, c in 0u32..100) {
            let source = format!("var x = {a}; fn f(y) {{ return y * {b}; }} print f(x) - {c};");
            prop_assert_eq!(parse(&source), parse(&source));
        }
    }
}
