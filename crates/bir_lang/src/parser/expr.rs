//! Expression grammar: precedence climbing from `or` (loosest) down through
//! `and`, equality, relational, additive, multiplicative, unary `not`, to
//! postfix call/index/member/`as` and primary expressions.

use crate::ast::{BinaryOp, Expr, ExprRef, UnaryOp};
use crate::error::ParseError;
use crate::token::TokenKind;

use super::Parser;

pub(super) fn parse_expression<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    parse_or(p)
}

fn parse_or<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let mut left = parse_and(p)?;
    while p.check(TokenKind::Or) {
        let position = p.position();
        p.advance();
        let right = parse_and(p)?;
        left = p.arenas.exprs.alloc(Expr::Binary(BinaryOp::Or, left, right, position));
    }
    Ok(left)
}

fn parse_and<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let mut left = parse_equality(p)?;
    while p.check(TokenKind::And) {
        let position = p.position();
        p.advance();
        let right = parse_equality(p)?;
        left = p.arenas.exprs.alloc(Expr::Binary(BinaryOp::And, left, right, position));
    }
    Ok(left)
}

fn parse_equality<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let mut left = parse_relational(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Equal => BinaryOp::Eq,
            TokenKind::Different => BinaryOp::NotEq,
            _ => break,
        };
        let position = p.position();
        p.advance();
        let right = parse_relational(p)?;
        left = p.arenas.exprs.alloc(Expr::Binary(op, left, right, position));
    }
    Ok(left)
}

fn parse_relational<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let mut left = parse_additive(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::LessEqual => BinaryOp::LtEq,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::GreaterEqual => BinaryOp::GtEq,
            _ => break,
        };
        let position = p.position();
        p.advance();
        let right = parse_additive(p)?;
        left = p.arenas.exprs.alloc(Expr::Binary(op, left, right, position));
    }
    Ok(left)
}

fn parse_additive<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let mut left = parse_multiplicative(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            _ => break,
        };
        let position = p.position();
        p.advance();
        let right = parse_multiplicative(p)?;
        left = p.arenas.exprs.alloc(Expr::Binary(op, left, right, position));
    }
    Ok(left)
}

fn parse_multiplicative<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let mut left = parse_unary(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Multiply => BinaryOp::Mul,
            TokenKind::Divide => BinaryOp::Div,
            _ => break,
        };
        let position = p.position();
        p.advance();
        let right = parse_unary(p)?;
        left = p.arenas.exprs.alloc(Expr::Binary(op, left, right, position));
    }
    Ok(left)
}

fn parse_unary<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    if p.check(TokenKind::Not) {
        let position = p.position();
        p.advance();
        let operand = parse_unary(p)?;
        return Ok(p.arenas.exprs.alloc(Expr::Unary(UnaryOp::Not, operand, position)));
    }
    parse_postfix(p)
}

fn parse_postfix<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let mut expr = parse_primary(p)?;
    loop {
        match p.peek_kind() {
            TokenKind::OpenParen => {
                p.advance();
                let mut args = Vec::new();
                if !p.check(TokenKind::CloseParen) {
                    args.push(parse_expression(p)?);
                    while p.check(TokenKind::Comma) {
                        p.advance();
                        args.push(parse_expression(p)?);
                    }
                }
                let position = p.position();
                p.expect(TokenKind::CloseParen, "')'")?;
                expr = p.arenas.exprs.alloc(Expr::Call(expr, args, position));
            }
            TokenKind::Dot => {
                p.advance();
                let position = p.position();
                let name_token = p.expect(TokenKind::Identifier, "identifier")?;
                let name = p.resolve_text(&name_token);
                expr = p
                    .arenas
                    .exprs
                    .alloc(Expr::MemberAccess(expr, name, position, Default::default()));
            }
            TokenKind::OpenBracket => {
                p.advance();
                let index = parse_expression(p)?;
                let position = p.position();
                p.expect(TokenKind::CloseBracket, "']'")?;
                expr = p.arenas.exprs.alloc(Expr::Index(expr, index, position));
            }
            TokenKind::As if p.in_condition_head.get() => {
                let position = p.position();
                p.advance();
                let ty = super::decl::parse_type(p)?;
                expr = p.arenas.exprs.alloc(Expr::As(expr, ty, position));
            }
            _ => break,
        }
    }
    Ok(expr)
}

fn parse_primary<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    let position = p.position();
    match p.peek_kind() {
        TokenKind::IntLiteral => {
            let token = p.advance();
            let text = p.resolve_str(&token);
            let value: i64 = text.parse().unwrap_or(0);
            Ok(p.arenas.exprs.alloc(Expr::IntLit(value, position)))
        }
        TokenKind::FloatLiteral => {
            let token = p.advance();
            let text = p.resolve_str(&token);
            let value: f64 = text.parse().unwrap_or(0.0);
            Ok(p.arenas.exprs.alloc(Expr::FloatLit(value, position)))
        }
        TokenKind::StringLiteral => {
            let token = p.advance();
            Ok(p.arenas.exprs.alloc(Expr::StringLit(token.text, position)))
        }
        TokenKind::True => {
            p.advance();
            Ok(p.arenas.exprs.alloc(Expr::BoolLit(true, position)))
        }
        TokenKind::False => {
            p.advance();
            Ok(p.arenas.exprs.alloc(Expr::BoolLit(false, position)))
        }
        TokenKind::Identifier => {
            let token = p.advance();
            let name = p.resolve_text(&token);
            Ok(p
                .arenas
                .exprs
                .alloc(Expr::Variable(name, position, Default::default())))
        }
        TokenKind::OpenParen => {
            p.advance();
            let inner = parse_expression(p)?;
            p.expect(TokenKind::CloseParen, "')'")?;
            Ok(inner)
        }
        _ => Err(ParseError::InvalidExpression { position }),
    }
}

/// A single literal token, as used by top-level `const` declarations.
pub(super) fn parse_literal<'a>(p: &mut Parser<'a>) -> Result<ExprRef<'a>, ParseError> {
    match p.peek_kind() {
        TokenKind::IntLiteral
        | TokenKind::FloatLiteral
        | TokenKind::StringLiteral
        | TokenKind::True
        | TokenKind::False => parse_primary(p),
        _ => Err(ParseError::InvalidExpression { position: p.position() }),
    }
}

#[cfg(test)]
mod tests {
    use bir_base::Interner;

    use crate::lexer::Lexer;
    use crate::parser::{AstArenas, Parser};

    fn parse_expr_src(src: &str) -> String {
        let mut interner = Interner::new();
        let tokens = Lexer::new(src, &mut interner).tokenize().unwrap();
        let arenas = AstArenas::new();
        let mut parser = Parser::new(tokens, &interner, &arenas);
        let expr = super::parse_expression(&mut parser).unwrap();
        format!("{:?}", expr)
    }

    #[test]
    fn respects_multiplicative_over_additive_precedence() {
        let debug = parse_expr_src("1 + 2 * 3");
        assert!(debug.contains("Add"));
    }

    #[test]
    fn left_associates_equal_precedence_operators() {
        let debug = parse_expr_src("1 - 2 - 3");
        // Outer node is the second `-`, whose left operand is `1 - 2`.
        assert!(debug.starts_with("Binary(Sub, Binary(Sub,"));
    }

    #[test]
    fn parses_call_and_member_chain() {
        let debug = parse_expr_src("a.b(1, 2)");
        assert!(debug.contains("Call"));
        assert!(debug.contains("MemberAccess"));
    }

    #[test]
    fn parses_parenthesized_grouping() {
        let debug = parse_expr_src("(1 + 2) * 3");
        assert!(debug.starts_with("Binary(Mul,"));
    }
}
