use super::error;
use super::error::ParseError;
use super::statements::parse_statement;
use crate::ast::{BlockStatement, Expression, Identifier, InfixOperationKind, PrefixOperationKind};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

pub fn precedence_of(token: &TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let Some(token) = parser.iter.next() else {
        return Err(ParseError::premature_end_expected_expression());
    };
    let mut left = prefix_parsing(token, parser)?;

    loop {
        let Some(next) = parser.iter.peek() else {
            break;
        };
        if next.kind == TokenKind::SemiColon || precedence >= precedence_of(&next.kind) {
            break;
        }

        let kind = next.kind.clone();
        parser.iter.next();
        left = infix_parsing(kind, left, parser)?;
    }

    Ok(left)
}

pub fn prefix_parsing(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::Ident(name) => Ok(Expression::Identifier(Identifier { name })),
        TokenKind::Int(digits) => Ok(Expression::IntegerLiteral(digits.parse()?)),
        TokenKind::String(literal) => {
            Ok(Expression::StringLiteral(literal.trim_matches('"').to_owned()))
        }
        TokenKind::True => Ok(Expression::BooleanLiteral(true)),
        TokenKind::False => Ok(Expression::BooleanLiteral(false)),
        TokenKind::Bang => parse_prefix_operation(PrefixOperationKind::Bang, parser),
        TokenKind::Minus => parse_prefix_operation(PrefixOperationKind::Minus, parser),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::LBracket => parse_array_literal(parser),
        TokenKind::LBrace => parse_hash_literal(parser),
        TokenKind::If => parse_if_expression(parser),
        TokenKind::Function => parse_function_literal(parser),
        TokenKind::Macro => parse_macro_literal(parser),
        _ => Err(ParseError::NoPrefixFunction(token)),
    }
}

fn infix_parsing(
    kind: TokenKind,
    left: Expression,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    use crate::ast::InfixOperationKind as InfixKind;

    match kind {
        TokenKind::Plus => infix_operation(TokenKind::Plus, InfixKind::Plus, left, parser),
        TokenKind::Minus => infix_operation(TokenKind::Minus, InfixKind::Minus, left, parser),
        TokenKind::LessThan => {
            infix_operation(TokenKind::LessThan, InfixKind::LessThan, left, parser)
        }
        TokenKind::GreaterThan => infix_operation(
            TokenKind::GreaterThan,
            InfixKind::GreaterThan,
            left,
            parser,
        ),
        TokenKind::Equal => infix_operation(TokenKind::Equal, InfixKind::Equal, left, parser),
        TokenKind::NotEqual => {
            infix_operation(TokenKind::NotEqual, InfixKind::NotEqual, left, parser)
        }
        TokenKind::Asterisk => {
            infix_operation(TokenKind::Asterisk, InfixKind::Multiply, left, parser)
        }
        TokenKind::Slash => infix_operation(TokenKind::Slash, InfixKind::Divide, left, parser),
        TokenKind::LParen => parse_call_expression(left, parser),
        TokenKind::LBracket => parse_index_expression(left, parser),
        // Only tokens with a precedence above Lowest are consumed by the
        // infix loop, and every one of them is handled above.
        other => unreachable!("no infix parse function for token {:?}", other),
    }
}

fn parse_prefix_operation(
    kind: PrefixOperationKind,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    Ok(Expression::PrefixOperation(
        kind,
        Box::new(parse_expression(parser, Precedence::Prefix)?),
    ))
}

fn infix_operation(
    token: TokenKind,
    kind: InfixOperationKind,
    left: Expression,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let precedence = precedence_of(&token);

    Ok(Expression::InfixOperation(
        kind,
        Box::new(left),
        Box::new(parse_expression(parser, precedence)?),
    ))
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    separator: TokenKind,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    loop {
        match parser.iter.peek() {
            Some(next) if next.kind == terminator => {
                parser.iter.next();
                return Ok(elements);
            }
            None => {
                return Err(ParseError::PrematureEndOfInput {
                    expected: error::Expected::Token(terminator),
                })
            }
            _ => {
                elements.push(parse_element(parser)?);
            }
        }

        match parser.iter.next() {
            Some(next) if next.kind == separator => continue,
            Some(next) if next.kind == terminator => return Ok(elements),
            next => return Err(ParseError::unexpected_token(separator, next)),
        }
    }
}

fn parse_array_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let elements = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral(elements))
}

fn parse_hash_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let pairs = parse_sequence(
        parser,
        |parser| {
            let key = parse_expression(parser, Precedence::Lowest)?;
            parser.expect_token(TokenKind::Colon)?;
            let value = parse_expression(parser, Precedence::Lowest)?;
            Ok((key, value))
        },
        TokenKind::Comma,
        TokenKind::RBrace,
    )?;
    Ok(Expression::HashLiteral(pairs))
}

fn parse_if_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);

    parser.expect_token(TokenKind::LBrace)?;
    let consequence = parse_block_statement(parser)?;

    let alternative = if parser
        .iter
        .next_if(|token| token.kind == TokenKind::Else)
        .is_some()
    {
        parser.expect_token(TokenKind::LBrace)?;
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

pub fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let statements = parse_sequence(
        parser,
        parse_statement,
        TokenKind::SemiColon,
        TokenKind::RBrace,
    )?;
    Ok(BlockStatement { statements })
}

fn parse_function_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let (parameters, body) = parse_parameters_and_body(parser)?;
    Ok(Expression::FunctionLiteral { parameters, body })
}

fn parse_macro_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let (parameters, body) = parse_parameters_and_body(parser)?;
    Ok(Expression::MacroLiteral { parameters, body })
}

fn parse_parameters_and_body(
    parser: &mut Parser,
) -> Result<(Vec<Identifier>, BlockStatement), ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_ident().map(|name| Identifier { name }),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    parser.expect_token(TokenKind::LBrace)?;
    let body = parse_block_statement(parser)?;

    Ok((parameters, body))
}

fn parse_call_expression(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        function: Box::new(left),
        arguments,
    })
}

fn parse_index_expression(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::IndexExpression {
        left: Box::new(left),
        index: Box::new(index),
    })
}
