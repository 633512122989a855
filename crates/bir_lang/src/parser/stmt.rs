//! Statement grammar: `Block`, `VarDecl`, local `Const`, `If`, `While`,
//! `For`, `With`, `Return`, `ExprStmt`.

use crate::ast::{ElseBranch, Stmt, StmtRef};
use crate::error::ParseError;
use crate::token::TokenKind;

use super::expr::{parse_expression, parse_literal};
use super::Parser;

pub(super) fn parse_block<'a>(p: &mut Parser<'a>) -> Result<&'a [StmtRef<'a>], ParseError> {
    p.expect(TokenKind::OpenBrace, "'{'")?;
    let mut stmts = Vec::new();
    while !p.check(TokenKind::CloseBrace) {
        stmts.push(parse_stmt(p)?);
    }
    p.expect(TokenKind::CloseBrace, "'}'")?;
    Ok(p.arenas.stmt_lists.alloc_slice(stmts))
}

/// Parses `expr` with the condition-head flag set, so `as Type` casts are
/// recognized for the duration of this one expression (§4.2).
fn parse_condition_expr<'a>(p: &mut Parser<'a>) -> Result<crate::ast::ExprRef<'a>, ParseError> {
    let previous = p.in_condition_head.get();
    p.in_condition_head.set(true);
    let result = parse_expression(p);
    p.in_condition_head.set(previous);
    result
}

fn parse_stmt<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    match p.peek_kind() {
        TokenKind::Var => parse_var_decl(p),
        TokenKind::Const => parse_local_const(p),
        TokenKind::If => parse_if(p),
        TokenKind::While => parse_while(p),
        TokenKind::For => parse_for(p),
        TokenKind::With => parse_with(p),
        TokenKind::Return => parse_return(p),
        _ => parse_expr_stmt(p),
    }
}

fn parse_var_decl<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    p.expect(TokenKind::Var, "'var'")?;
    let name = super::decl::parse_ident_symbol(p)?;
    let ty = super::decl::parse_optional_type_spec(p)?;
    let init = if p.check(TokenKind::Assign) {
        p.advance();
        Some(parse_expression(p)?)
    } else {
        None
    };
    if ty.is_none() && init.is_none() {
        return Err(ParseError::UnexpectedToken {
            expected: "type annotation or initializer".to_string(),
            found: format!("{:?}", p.peek_kind()),
            position,
        });
    }
    Ok(p.arenas.stmts.alloc(Stmt::VarDecl {
        name,
        ty,
        init,
        position,
        symbol: Default::default(),
    }))
}

fn parse_local_const<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    p.expect(TokenKind::Const, "'const'")?;
    let name = super::decl::parse_ident_symbol(p)?;
    let ty = super::decl::parse_optional_type_spec(p)?;
    p.expect(TokenKind::Assign, "'='")?;
    let value = parse_literal(p)?;
    Ok(p.arenas.stmts.alloc(Stmt::ConstDecl {
        name,
        ty,
        value,
        position,
        symbol: Default::default(),
    }))
}

fn parse_if<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    p.expect(TokenKind::If, "'if'")?;
    let cond = parse_condition_expr(p)?;
    let then_block = parse_block(p)?;
    let else_branch = if p.check(TokenKind::Else) {
        p.advance();
        if p.check(TokenKind::If) {
            Some(ElseBranch::If(parse_if(p)?))
        } else {
            Some(ElseBranch::Block(parse_block(p)?))
        }
    } else {
        None
    };
    Ok(p.arenas.stmts.alloc(Stmt::If {
        cond,
        then_block,
        else_branch,
        position,
    }))
}

fn parse_while<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    p.expect(TokenKind::While, "'while'")?;
    let cond = parse_condition_expr(p)?;
    let body = parse_block(p)?;
    let else_block = if p.check(TokenKind::Else) {
        p.advance();
        Some(parse_block(p)?)
    } else {
        None
    };
    Ok(p.arenas.stmts.alloc(Stmt::While {
        cond,
        body,
        else_block,
        position,
    }))
}

fn parse_for<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    p.expect(TokenKind::For, "'for'")?;
    let var = super::decl::parse_ident_symbol(p)?;
    let ty = super::decl::parse_optional_type_spec(p)?;
    p.expect(TokenKind::In, "'in'")?;
    let iterable = parse_expression(p)?;
    let body = parse_block(p)?;
    Ok(p.arenas.stmts.alloc(Stmt::For {
        var,
        ty,
        iterable,
        body,
        position,
        symbol: Default::default(),
    }))
}

fn parse_with<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    p.expect(TokenKind::With, "'with'")?;
    let expr = parse_condition_expr(p)?;
    let body = if p.check(TokenKind::OpenBrace) {
        Some(parse_block(p)?)
    } else {
        None
    };
    Ok(p.arenas.stmts.alloc(Stmt::With { expr, body, position }))
}

fn parse_return<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    p.expect(TokenKind::Return, "'return'")?;
    let value = if p.check(TokenKind::CloseBrace) {
        None
    } else {
        Some(parse_expression(p)?)
    };
    Ok(p.arenas.stmts.alloc(Stmt::Return { value, position }))
}

/// `Expr ('=' Expr)?`: a bare expression statement, or an assignment when a
/// top-level `=` follows. The left-hand side is parsed once as an ordinary
/// expression and only reinterpreted as an lvalue by the checker.
fn parse_expr_stmt<'a>(p: &mut Parser<'a>) -> Result<StmtRef<'a>, ParseError> {
    let position = p.position();
    let expr = parse_expression(p)?;
    if p.check(TokenKind::Assign) {
        p.advance();
        let value = parse_expression(p)?;
        Ok(p.arenas.stmts.alloc(Stmt::Assignment {
            target: expr,
            value,
            position,
        }))
    } else {
        Ok(p.arenas.stmts.alloc(Stmt::ExprStmt { expr, position }))
    }
}

#[cfg(test)]
mod tests {
    use bir_base::Interner;

    use crate::lexer::Lexer;
    use crate::parser::{AstArenas, Parser};

    fn parse_block_src(src: &str) -> String {
        let mut interner = Interner::new();
        let tokens = Lexer::new(src, &mut interner).tokenize().unwrap();
        let arenas = AstArenas::new();
        let mut parser = Parser::new(tokens, &interner, &arenas);
        let block = super::parse_block(&mut parser).unwrap();
        format!("{:?}", block)
    }

    #[test]
    fn parses_var_decl_with_type_and_initializer() {
        let debug = parse_block_src("{ var x: int = 1 }");
        assert!(debug.contains("VarDecl"));
    }

    #[test]
    fn rejects_var_decl_without_type_or_init() {
        let mut interner = Interner::new();
        let tokens = Lexer::new("{ var x }", &mut interner).tokenize().unwrap();
        let arenas = AstArenas::new();
        let mut parser = Parser::new(tokens, &interner, &arenas);
        assert!(super::parse_block(&mut parser).is_err());
    }

    #[test]
    fn parses_if_else_if_chain() {
        let debug = parse_block_src("{ if a { return 1 } else if b { return 2 } else { return 3 } }");
        assert!(debug.contains("ElseBranch"));
    }

    #[test]
    fn recognizes_as_cast_only_in_condition_head() {
        let debug = parse_block_src("{ if x as Shape { return 1 } }");
        assert!(debug.contains("As("));
    }

    #[test]
    fn parses_assignment_vs_bare_expr_stmt() {
        let debug = parse_block_src("{ x = 1 foo() }");
        assert!(debug.contains("Assignment"));
        assert!(debug.contains("ExprStmt"));
    }

    #[test]
    fn parses_for_in_loop() {
        let debug = parse_block_src("{ for item in items { return item } }");
        assert!(debug.contains("Stmt::For") || debug.contains("For {"));
    }
}
