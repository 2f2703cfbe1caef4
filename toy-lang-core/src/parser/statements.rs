use std::rc::Rc;

use crate::ast::{
    BlockStatement, Expression, FunctionDeclaration, Literal, Statement, VarStatement,
};
use crate::lexer::TokenKind;
use crate::parser::expressions::parse_expression;
use crate::parser::{ParseError, Parser};

pub fn parse_declaration(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.peek().kind {
        TokenKind::Var => Ok(Statement::Var(parse_var_declaration(parser)?)),
        TokenKind::Function => Ok(Statement::Function(Rc::new(
            parse_function_declaration(parser)?,
        ))),
        _ => parse_statement(parser),
    }
}

pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.peek().kind {
        TokenKind::Print => parse_print_statement(parser),
        TokenKind::If => parse_if_statement(parser),
        TokenKind::While => parse_while_statement(parser),
        TokenKind::For => parse_for_statement(parser),
        TokenKind::LBrace => {
            parser.expect_token(TokenKind::LBrace)?;
            Ok(Statement::Block(parse_block(parser)?))
        }
        TokenKind::Return => parse_return_statement(parser),
        _ => parse_expression_statement(parser),
    }
}

fn parse_var_declaration(parser: &mut Parser) -> Result<VarStatement, ParseError> {
    parser.expect_token(TokenKind::Var)?;
    let identifier = parser.parse_ident()?;
    let initializer = match parser.next_if_kind(TokenKind::Assign) {
        Some(_) => Some(parse_expression(parser)?),
        None => None,
    };
    parser.expect_token(TokenKind::SemiColon)?;

    Ok(VarStatement {
        identifier,
        initializer,
    })
}

fn parse_function_declaration(parser: &mut Parser) -> Result<FunctionDeclaration, ParseError> {
    parser.expect_token(TokenKind::Function)?;
    let name = parser.parse_ident()?;

    parser.expect_token(TokenKind::LParen)?;
    let parameters =
        parser.parse_comma_separated(|parser| parser.parse_ident(), TokenKind::RParen)?;

    parser.expect_token(TokenKind::LBrace)?;
    let body = parse_block(parser)?;

    Ok(FunctionDeclaration {
        name,
        parameters,
        body,
    })
}

/// Parses declarations up to the closing brace. The opening brace must
/// already be consumed.
fn parse_block(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let mut statements = Vec::new();

    while !parser.check(TokenKind::RBrace) && !parser.check(TokenKind::Eof) {
        statements.push(parse_declaration(parser)?);
    }
    parser.expect_token(TokenKind::RBrace)?;

    Ok(BlockStatement { statements })
}

fn parse_print_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect_token(TokenKind::Print)?;
    let expression = parse_expression(parser)?;
    parser.expect_token(TokenKind::SemiColon)?;

    Ok(Statement::Print(expression))
}

fn parse_parenthesized_condition(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(condition)
}

fn parse_if_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect_token(TokenKind::If)?;
    let condition = parse_parenthesized_condition(parser)?;

    let consequence = Box::new(parse_statement(parser)?);
    // A nested `if` has already taken any `else` that belongs to it.
    let alternative = match parser.next_if_kind(TokenKind::Else) {
        Some(_) => Some(Box::new(parse_statement(parser)?)),
        None => None,
    };

    Ok(Statement::If {
        condition,
        consequence,
        alternative,
    })
}

fn parse_while_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect_token(TokenKind::While)?;
    let condition = parse_parenthesized_condition(parser)?;
    let body = Box::new(parse_statement(parser)?);

    Ok(Statement::While { condition, body })
}

/// A parsed `for` header and body. It never leaves the parser: `desugar`
/// turns it into blocks and a `while` loop.
struct ForLoop {
    initializer: Option<Statement>,
    condition: Option<Expression>,
    increment: Option<Expression>,
    body: Statement,
}

impl ForLoop {
    fn desugar(self) -> Statement {
        let body = match self.increment {
            Some(increment) => Statement::Block(BlockStatement {
                statements: vec![self.body, Statement::Expression(increment)],
            }),
            None => self.body,
        };

        let condition = self
            .condition
            .unwrap_or(Expression::Literal(Literal::Boolean(true)));
        let looping = Statement::While {
            condition,
            body: Box::new(body),
        };

        match self.initializer {
            Some(initializer) => Statement::Block(BlockStatement {
                statements: vec![initializer, looping],
            }),
            None => looping,
        }
    }
}

fn parse_for_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect_token(TokenKind::For)?;
    parser.expect_token(TokenKind::LParen)?;

    let initializer = match parser.peek().kind {
        TokenKind::SemiColon => {
            parser.advance();
            None
        }
        TokenKind::Var => Some(Statement::Var(parse_var_declaration(parser)?)),
        _ => Some(parse_expression_statement(parser)?),
    };

    let condition = if parser.check(TokenKind::SemiColon) {
        None
    } else {
        Some(parse_expression(parser)?)
    };
    parser.expect_token(TokenKind::SemiColon)?;

    let increment = if parser.check(TokenKind::RParen) {
        None
    } else {
        Some(parse_expression(parser)?)
    };
    parser.expect_token(TokenKind::RParen)?;

    let body = parse_statement(parser)?;

    Ok(ForLoop {
        initializer,
        condition,
        increment,
        body,
    }
    .desugar())
}

fn parse_return_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.expect_token(TokenKind::Return)?;
    let value = if parser.check(TokenKind::SemiColon) {
        None
    } else {
        Some(parse_expression(parser)?)
    };
    parser.expect_token(TokenKind::SemiColon)?;

    Ok(Statement::Return(value))
}

fn parse_expression_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let expression = parse_expression(parser)?;
    parser.expect_token(TokenKind::SemiColon)?;

    Ok(Statement::Expression(expression))
}
