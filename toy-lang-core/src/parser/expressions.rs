use super::error::Expected;
use crate::ast::{BinaryOperator, Expression, Identifier, Literal, MatchCase, UnaryOperator};
use crate::lexer::TokenKind;
use crate::parser::{ParseError, Parser};

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equality,
    Comparison,
    Term,
    Factor,
}

fn binary_operator(token: TokenKind) -> Option<(BinaryOperator, Precedence)> {
    match token {
        TokenKind::Equal => Some((BinaryOperator::Equal, Precedence::Equality)),
        TokenKind::NotEqual => Some((BinaryOperator::NotEqual, Precedence::Equality)),
        TokenKind::GreaterThan => Some((BinaryOperator::GreaterThan, Precedence::Comparison)),
        TokenKind::GreaterEqual => Some((BinaryOperator::GreaterEqual, Precedence::Comparison)),
        TokenKind::LessThan => Some((BinaryOperator::LessThan, Precedence::Comparison)),
        TokenKind::LessEqual => Some((BinaryOperator::LessEqual, Precedence::Comparison)),
        TokenKind::Plus => Some((BinaryOperator::Plus, Precedence::Term)),
        TokenKind::Minus => Some((BinaryOperator::Minus, Precedence::Term)),
        TokenKind::Asterisk => Some((BinaryOperator::Multiply, Precedence::Factor)),
        TokenKind::Slash => Some((BinaryOperator::Divide, Precedence::Factor)),
        _ => None,
    }
}

pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_assignment(parser)
}

fn parse_assignment(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_binary(parser, Precedence::Lowest)?;

    let Some(equals) = parser.next_if_kind(TokenKind::Assign) else {
        return Ok(expression);
    };
    let value = parse_assignment(parser)?;

    match expression {
        Expression::Variable(identifier) => Ok(Expression::Assignment {
            identifier,
            value: Box::new(value),
        }),
        _ => Err(ParseError::InvalidAssignmentTarget(equals)),
    }
}

/// Parses binary operators binding tighter than `precedence`. Operators of
/// equal precedence stop the inner loop, which makes every level
/// left-associative.
fn parse_binary(parser: &mut Parser, precedence: Precedence) -> Result<Expression, ParseError> {
    let mut left_expression = parse_unary(parser)?;

    loop {
        let Some((operator, next_precedence)) = binary_operator(parser.peek().kind) else {
            break;
        };
        if precedence >= next_precedence {
            break;
        }

        parser.advance();
        let right_expression = parse_binary(parser, next_precedence)?;
        left_expression =
            Expression::Binary(operator, Box::new(left_expression), Box::new(right_expression));
    }

    Ok(left_expression)
}

fn parse_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let operator = match parser.peek().kind {
        TokenKind::Bang => UnaryOperator::Bang,
        TokenKind::Minus => UnaryOperator::Minus,
        _ => return parse_call(parser),
    };
    parser.advance();

    Ok(Expression::Unary(operator, Box::new(parse_unary(parser)?)))
}

fn parse_call(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut expression = parse_primary(parser)?;

    while parser.next_if_kind(TokenKind::LParen).is_some() {
        let arguments = parser.parse_comma_separated(parse_expression, TokenKind::RParen)?;
        expression = Expression::Call {
            callee: Box::new(expression),
            arguments,
        };
    }

    Ok(expression)
}

fn parse_primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let token = parser.advance();
    match token.kind {
        TokenKind::Number => match token.lexeme.parse() {
            Ok(value) => Ok(Expression::Literal(Literal::Number(value))),
            Err(_) => Err(ParseError::InvalidNumberLiteral(token)),
        },
        TokenKind::True => Ok(Expression::Literal(Literal::Boolean(true))),
        TokenKind::False => Ok(Expression::Literal(Literal::Boolean(false))),
        TokenKind::Null => Ok(Expression::Literal(Literal::Null)),
        TokenKind::Ident => Ok(Expression::Variable(Identifier { name: token.lexeme })),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::Match => parse_match_expression(parser),
        _ => Err(ParseError::unexpected_other(Expected::Expression, token)),
    }
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

fn parse_match_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let subject = Box::new(parse_expression(parser)?);

    parser.expect_token(TokenKind::LBrace)?;

    let mut cases = Vec::new();
    while !parser.check(TokenKind::RBrace) && !parser.check(TokenKind::Eof) {
        cases.push(parse_match_case(parser)?);
        // Separating commas are optional, a trailing one is allowed.
        parser.next_if_kind(TokenKind::Comma);
    }
    parser.expect_token(TokenKind::RBrace)?;

    Ok(Expression::Match { subject, cases })
}

fn parse_match_case(parser: &mut Parser) -> Result<MatchCase, ParseError> {
    parser.expect_token(TokenKind::Case)?;
    let pattern = parse_expression(parser)?;

    parser.expect_token(TokenKind::FatArrow)?;
    let body = parse_expression(parser)?;

    Ok(MatchCase { pattern, body })
}
